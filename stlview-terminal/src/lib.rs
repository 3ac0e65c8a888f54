/// Terminal front end for the STL wireframe viewer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::path::Path;
use stlview_core::{
    Axis, Canvas, OrthoView, ProjectionKind, Scene, TransformRequest, ViewerConfig,
};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Degrees per rotation key press
pub const ROTATE_STEP: f64 = 15.0;
/// Fraction of the viewport moved per pan key press
pub const PAN_STEP: f64 = 0.1;
/// Zoom ratio per key press
pub const ZOOM_STEP: f64 = 1.25;

/// What a key press asks the scene to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Transform(TransformRequest),
    Projection(ProjectionKind),
    ToggleView,
    Recenter,
    Quit,
}

/// Key binding table; pan distances scale with the viewport
pub fn action_for(code: KeyCode, viewport: (u32, u32)) -> Option<Action> {
    let pan_x = viewport.0 as f64 * PAN_STEP;
    let pan_y = viewport.1 as f64 * PAN_STEP;
    let rotate = |axis, degrees| Action::Transform(TransformRequest::Rotate { axis, degrees });
    let pan = |dx, dy| Action::Transform(TransformRequest::Translate { dx, dy, dz: 0.0 });
    let zoom = |factor| Action::Transform(TransformRequest::Zoom { factor });
    let ortho = |view| Action::Transform(TransformRequest::Ortho(view));

    let action = match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Up => rotate(Axis::X, ROTATE_STEP),
        KeyCode::Down => rotate(Axis::X, -ROTATE_STEP),
        KeyCode::Left => rotate(Axis::Y, ROTATE_STEP),
        KeyCode::Right => rotate(Axis::Y, -ROTATE_STEP),
        KeyCode::Char(',') => rotate(Axis::Z, ROTATE_STEP),
        KeyCode::Char('.') => rotate(Axis::Z, -ROTATE_STEP),
        KeyCode::Char('w') => pan(0.0, -pan_y),
        KeyCode::Char('s') => pan(0.0, pan_y),
        KeyCode::Char('a') => pan(-pan_x, 0.0),
        KeyCode::Char('d') => pan(pan_x, 0.0),
        // Scaling divides coordinates by the factor
        KeyCode::Char('+') | KeyCode::Char('=') => zoom(1.0 / ZOOM_STEP),
        KeyCode::Char('-') => zoom(ZOOM_STEP),
        KeyCode::Char('1') => ortho(OrthoView::Top),
        KeyCode::Char('2') => ortho(OrthoView::Bottom),
        KeyCode::Char('3') => ortho(OrthoView::Left),
        KeyCode::Char('4') => ortho(OrthoView::Right),
        KeyCode::Char('5') => ortho(OrthoView::Front),
        KeyCode::Char('6') => ortho(OrthoView::Back),
        KeyCode::Char('i') => Action::Projection(ProjectionKind::Isometric),
        KeyCode::Char('m') => Action::Projection(ProjectionKind::Dimetric),
        KeyCode::Char('t') => Action::Projection(ProjectionKind::Trimetric),
        KeyCode::Char('v') => Action::ToggleView,
        KeyCode::Char('c') => Action::Recenter,
        _ => return None,
    };
    Some(action)
}

/// Set up `tracing` output, to `log_file` when given, otherwise stderr
///
/// `RUST_LOG` overrides the default `warn` level.
pub fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let fmt_layer = fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_target(true)
                .with_level(true)
                .with_line_number(true)
                .with_ansi(false);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        None => {
            let fmt_layer = fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}

/// Interactive viewer: one full redraw per key press
pub struct TerminalApp {
    scene: Scene,
    canvas: Canvas,
    renderer: AsciiRenderer,
    running: bool,
    status: String,
}

impl TerminalApp {
    pub fn new(scene: Scene, config: &ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            scene,
            canvas: config.canvas(),
            // Last row is the status line
            renderer: AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize),
            running: true,
            status: String::new(),
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        if let Err(e) = self.scene.initial_plot(&mut self.canvas) {
            self.status = e.to_string();
        }
        self.render()?;

        while self.running {
            match event::read()? {
                Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    ..
                }) => self.handle_key(code),
                Event::Resize(width, height) => {
                    self.renderer
                        .resize(width as usize, height.saturating_sub(1) as usize);
                }
                _ => continue,
            }
            if self.running {
                self.render()?;
            }
        }

        Ok(())
    }

    /// Run the full pipeline for one key press, keeping any error for the status line
    pub fn handle_key(&mut self, code: KeyCode) {
        let Some(action) = action_for(code, self.scene.viewport()) else {
            return;
        };
        tracing::debug!("Key {:?} -> {:?}", code, action);

        let result = match action {
            Action::Quit => {
                self.running = false;
                Ok(())
            }
            Action::Transform(request) => self.scene.apply_transform(request, &mut self.canvas),
            Action::Projection(kind) => {
                self.scene.set_projection(kind);
                self.scene.redraw(&mut self.canvas)
            }
            Action::ToggleView => {
                self.scene.set_view_mode(self.scene.view_mode().toggled());
                self.scene.redraw(&mut self.canvas)
            }
            Action::Recenter => self.scene.recenter(&mut self.canvas),
        };

        self.status = match result {
            Ok(()) => String::new(),
            Err(e) => {
                tracing::warn!("{}", e);
                e.to_string()
            }
        };
    }

    fn render(&mut self) -> io::Result<()> {
        self.renderer.rasterize(&self.canvas);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0), terminal::Clear(ClearType::All))?;
        self.renderer.draw(&mut stdout)?;

        let (_, height) = terminal::size()?;
        queue!(
            stdout,
            cursor::MoveTo(0, height.saturating_sub(1)),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "STLView | {} | {} | {} faces | arrows ,. rotate  wasd pan  +- zoom  1-6 ortho  i/m/t proj  v view  c recenter  q quit {}",
                self.scene.projection(),
                self.scene.view_mode(),
                self.scene.working().len(),
                self.status
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
