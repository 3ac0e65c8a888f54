/// Scene controller: loaded geometry plus the current camera settings
use std::path::Path;

use crate::canvas::Canvas;
use crate::config::ViewerConfig;
use crate::error::{ensure_finite, Error, Result};
use crate::geometry::Geometry;
use crate::orient::orient;
use crate::projection::{check_fz, perspective, Projected, ProjectionKind, ProjectionParams};
use crate::raster::{draw_lines, visible_faces, ClipRect, PixelPoint, ViewMode};
use crate::stl;
use crate::transform::TransformRequest;

/// Owns the immutable baseline geometry, the cumulatively transformed
/// working copy and the projection settings
///
/// Every mutation validates first; a rejected request leaves the scene as
/// it was.
#[derive(Debug, Clone)]
pub struct Scene {
    baseline: Geometry,
    working: Geometry,
    projection: ProjectionKind,
    view_mode: ViewMode,
    params: ProjectionParams,
    width: u32,
    height: u32,
}

impl Scene {
    pub fn new(config: &ViewerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            baseline: Geometry::new(),
            working: Geometry::new(),
            projection: config.projection,
            view_mode: config.view_mode,
            params: config.projection_params(),
            width: config.width,
            height: config.height,
        })
    }

    /// Load an ASCII STL file; on failure the current geometry is kept
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match stl::load(path).and_then(|geometry| self.replace_geometry(geometry)) {
            Ok(()) => {
                tracing::info!("Loaded {} ({} faces)", path.display(), self.baseline.len());
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Rejected {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Same as [`Scene::load`] for STL text already in memory
    pub fn load_str(&mut self, text: &str) -> Result<()> {
        let geometry = stl::parse_ascii_stl(text)?;
        self.replace_geometry(geometry)
    }

    /// Install already-parsed geometry as the new baseline
    pub fn set_geometry(&mut self, geometry: Geometry) -> Result<()> {
        self.replace_geometry(geometry)
    }

    fn replace_geometry(&mut self, geometry: Geometry) -> Result<()> {
        let working = orient(&geometry, self.width, self.height)?;
        self.baseline = geometry;
        self.working = working;
        Ok(())
    }

    pub fn baseline(&self) -> &Geometry {
        &self.baseline
    }

    pub fn working(&self) -> &Geometry {
        &self.working
    }

    pub fn projection(&self) -> ProjectionKind {
        self.projection
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn params(&self) -> ProjectionParams {
        self.params
    }

    pub fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// First draw after a load
    pub fn initial_plot(&self, canvas: &mut Canvas) -> Result<()> {
        self.redraw(canvas)
    }

    /// Apply a cumulative transform to the working geometry, then redraw
    pub fn apply_transform(&mut self, request: TransformRequest, canvas: &mut Canvas) -> Result<()> {
        self.check_canvas(canvas)?;
        request.validate()?;
        self.working = request.apply(&self.working)?;
        tracing::debug!("Applied {:?}", request);
        self.redraw(canvas)
    }

    /// Discard every transform and re-orient from the baseline
    pub fn recenter(&mut self, canvas: &mut Canvas) -> Result<()> {
        self.check_canvas(canvas)?;
        self.working = orient(&self.baseline, self.width, self.height)?;
        tracing::info!("Recentered {} faces", self.working.len());
        self.redraw(canvas)
    }

    pub fn set_projection(&mut self, kind: ProjectionKind) {
        tracing::debug!("Projection {} -> {}", self.projection, kind);
        self.projection = kind;
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Trimetric angles in degrees; any finite value is accepted
    pub fn set_trimetric_params(&mut self, phi: f64, theta: f64) -> Result<()> {
        ensure_finite("trimetric phi", phi)?;
        ensure_finite("trimetric theta", theta)?;
        self.params.phi = phi;
        self.params.theta = theta;
        Ok(())
    }

    pub fn set_dimetric_param(&mut self, fz: f64) -> Result<()> {
        check_fz(fz)?;
        self.params.fz = fz;
        Ok(())
    }

    /// Working geometry under the current projection
    pub fn project(&self) -> Result<Projected> {
        perspective(self.projection, &self.working, &self.params)
    }

    /// Indices of faces drawn under the current settings
    pub fn visible_faces(&self) -> Result<Vec<usize>> {
        let projected = self.project()?;
        Ok(visible_faces(&projected.geometry, &projected.camera, self.view_mode))
    }

    /// Pixel list for the current state, in center-origin coordinates
    pub fn render(&self) -> Result<Vec<PixelPoint>> {
        let projected = self.project()?;
        let rect = ClipRect::for_viewport(self.width, self.height);
        Ok(draw_lines(
            &projected.geometry,
            &projected.camera,
            self.view_mode,
            &rect,
        ))
    }

    /// Render the current state into `canvas` as one complete frame
    pub fn redraw(&self, canvas: &mut Canvas) -> Result<()> {
        self.check_canvas(canvas)?;
        let points = self.render()?;
        canvas.present(&points);
        tracing::debug!(
            "Redraw: {} projection, {} mode, {} points",
            self.projection,
            self.view_mode,
            points.len()
        );
        Ok(())
    }

    fn check_canvas(&self, canvas: &Canvas) -> Result<()> {
        if (canvas.width(), canvas.height()) != (self.width, self.height) {
            return Err(Error::Domain(format!(
                "canvas is {}x{}, scene viewport is {}x{}",
                canvas.width(),
                canvas.height(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{Axis, OrthoView};

    fn cube_scene() -> (Scene, Canvas) {
        let config = ViewerConfig::default();
        let mut scene = Scene::new(&config).unwrap();
        scene.set_geometry(Geometry::cube(1.0)).unwrap();
        (scene, config.canvas())
    }

    #[test]
    fn test_defaults_from_config() {
        let scene = Scene::new(&ViewerConfig::default()).unwrap();
        assert_eq!(scene.projection(), ProjectionKind::Isometric);
        assert_eq!(scene.view_mode(), ViewMode::HiddenLine);
        assert!(scene.working().is_empty());
    }

    #[test]
    fn test_initial_plot_draws() {
        let (scene, mut canvas) = cube_scene();
        scene.initial_plot(&mut canvas).unwrap();
        assert!(canvas.lit_count() > 0);
    }

    #[test]
    fn test_failed_transform_leaves_state() {
        let (mut scene, mut canvas) = cube_scene();
        let before = scene.working().clone();
        let err = scene.apply_transform(TransformRequest::Zoom { factor: 0.0 }, &mut canvas);
        assert!(matches!(err, Err(Error::Domain(_))));
        assert_eq!(scene.working(), &before);
    }

    #[test]
    fn test_failed_load_leaves_state() {
        let (mut scene, _) = cube_scene();
        let before = scene.working().clone();
        assert!(scene.load_str("facet normal 0 0 1\n").is_err());
        assert_eq!(scene.working(), &before);
        assert_eq!(scene.baseline(), &Geometry::cube(1.0));
    }

    #[test]
    fn test_transforms_accumulate_and_recenter_restores() {
        let (mut scene, mut canvas) = cube_scene();
        let oriented = scene.working().clone();
        scene
            .apply_transform(TransformRequest::Rotate { axis: Axis::Y, degrees: 30.0 }, &mut canvas)
            .unwrap();
        scene
            .apply_transform(TransformRequest::Translate { dx: 20.0, dy: 0.0, dz: 0.0 }, &mut canvas)
            .unwrap();
        scene
            .apply_transform(TransformRequest::Ortho(OrthoView::Top), &mut canvas)
            .unwrap();
        assert_ne!(scene.working(), &oriented);

        scene.recenter(&mut canvas).unwrap();
        assert_eq!(scene.working(), &oriented);
    }

    #[test]
    fn test_setter_validation() {
        let (mut scene, _) = cube_scene();
        assert!(scene.set_dimetric_param(1.5).is_err());
        assert_eq!(scene.params().fz, 0.375);
        scene.set_dimetric_param(0.5).unwrap();
        assert_eq!(scene.params().fz, 0.5);

        assert!(scene.set_trimetric_params(f64::NAN, 10.0).is_err());
        scene.set_trimetric_params(400.0, -20.0).unwrap();
        assert_eq!(scene.params().phi, 400.0);
    }

    #[test]
    fn test_canvas_size_mismatch() {
        let (scene, _) = cube_scene();
        let mut small = Canvas::new(300, 300, [0; 3], [255; 3]);
        assert!(matches!(scene.redraw(&mut small), Err(Error::Domain(_))));
    }

    #[test]
    fn test_wireframe_draws_more() {
        let (mut scene, _) = cube_scene();
        let hidden = scene.render().unwrap().len();
        scene.set_view_mode(ViewMode::Wireframe);
        let wire = scene.render().unwrap().len();
        assert!(wire > hidden);
        assert_eq!(scene.visible_faces().unwrap().len(), 12);
    }
}
