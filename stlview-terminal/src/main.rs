/// STLView Terminal - wireframe viewer for ASCII STL files
///
/// Controls:
///   - Arrow keys, `,` `.`: Rotate about X, Y, Z
///   - WASD: Pan
///   - `+` / `-`: Zoom
///   - 1-6: Top, bottom, left, right, front, back views
///   - i / m / t: Isometric, dimetric, trimetric projection
///   - v: Toggle wireframe / hidden-line
///   - c: Recenter
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use stlview_core::{ProjectionKind, Scene, ViewMode, ViewerConfig};
use stlview_terminal::{init_logging, TerminalApp};

#[derive(Parser)]
#[command(name = "stlview-terminal")]
#[command(about = "Wireframe viewer for ASCII STL files")]
struct Cli {
    /// ASCII STL file to open
    path: PathBuf,

    /// JSON viewer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Projection: iso, di or tri
    #[arg(long)]
    projection: Option<ProjectionKind>,

    /// View mode: wire or hide
    #[arg(long)]
    view: Option<ViewMode>,

    /// Pixel surface width
    #[arg(long)]
    width: Option<u32>,

    /// Pixel surface height
    #[arg(long)]
    height: Option<u32>,

    /// Render once to this PNG and exit
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Write logs here instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn viewer_config(&self) -> Result<ViewerConfig> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ViewerConfig::default(),
        };
        if let Some(projection) = self.projection {
            config.projection = projection;
        }
        if let Some(view) = self.view {
            config.view_mode = view;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        config.validate().context("Invalid viewer settings")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = cli.viewer_config()?;
    let mut scene = Scene::new(&config)?;
    scene
        .load(&cli.path)
        .with_context(|| format!("Failed to open {}", cli.path.display()))?;

    if let Some(out) = &cli.snapshot {
        let mut canvas = config.canvas();
        scene.initial_plot(&mut canvas)?;
        canvas
            .save_png(out)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        println!(
            "Rendered {} faces ({} pixels) to {}",
            scene.working().len(),
            canvas.lit_count(),
            out.display()
        );
        return Ok(());
    }

    let mut app = TerminalApp::new(scene, &config)?;
    app.run()?;

    Ok(())
}
