/// Viewer configuration
///
/// Loaded from JSON; every key is optional and falls back to the defaults
/// below.
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::canvas::Canvas;
use crate::error::{ensure_finite, Error, Result};
use crate::projection::{check_fz, ProjectionKind, ProjectionParams};
use crate::raster::{ViewMode, CLIP_MARGIN};

/// Startup settings for a [`crate::Scene`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub projection: ProjectionKind,
    pub view_mode: ViewMode,
    /// Degrees about Y
    pub trimetric_phi: f64,
    /// Degrees about X
    pub trimetric_theta: f64,
    pub dimetric_fz: f64,
    pub width: u32,
    pub height: u32,
    pub foreground: [u8; 3],
    pub background: [u8; 3],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let params = ProjectionParams::default();
        Self {
            projection: ProjectionKind::Isometric,
            view_mode: ViewMode::HiddenLine,
            trimetric_phi: params.phi,
            trimetric_theta: params.theta,
            dimetric_fz: params.fz,
            width: 1000,
            height: 800,
            foreground: [0, 0, 0],
            background: [255, 255, 255],
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        check_fz(self.dimetric_fz)?;
        ensure_finite("trimetric phi", self.trimetric_phi)?;
        ensure_finite("trimetric theta", self.trimetric_theta)?;
        let min = 2 * CLIP_MARGIN;
        if self.width <= min || self.height <= min {
            return Err(Error::Domain(format!(
                "viewport {}x{} leaves no room inside the {CLIP_MARGIN}px margin",
                self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn projection_params(&self) -> ProjectionParams {
        ProjectionParams {
            fz: self.dimetric_fz,
            phi: self.trimetric_phi,
            theta: self.trimetric_theta,
        }
    }

    /// A blank canvas sized and colored for this configuration
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height, self.foreground, self.background)
    }
}
