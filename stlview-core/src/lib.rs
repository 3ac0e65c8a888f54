/// STLView Core Library - wireframe rendering pipeline for ASCII STL models
///
/// Parses STL text into a face list, orients it in the viewport, applies
/// cumulative homogeneous transforms, projects it with an axonometric camera
/// and rasterizes the visible edges into a pixel buffer.

pub mod canvas;
pub mod config;
pub mod error;
pub mod geometry;
pub mod orient;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use canvas::Canvas;
pub use config::ViewerConfig;
pub use error::{Error, Result};
pub use geometry::{Face, Geometry, Vertex};
pub use projection::{ProjectionKind, ProjectionParams};
pub use raster::{PixelPoint, ViewMode};
pub use scene::Scene;
pub use transform::{Axis, OrthoView, TransformRequest};
