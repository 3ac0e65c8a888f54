/// Wireframe rasterization: face visibility, outcode clipping and
/// Bresenham line generation
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::geometry::{xyz, Face, Geometry, Vertex};

/// Inset from every edge of the pixel surface, in pixels
pub const CLIP_MARGIN: u32 = 50;

/// Which faces get drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Every edge of every face
    #[serde(rename = "wire")]
    Wireframe,
    /// Only faces turned toward the camera
    #[default]
    #[serde(rename = "hide")]
    HiddenLine,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Wireframe => ViewMode::HiddenLine,
            ViewMode::HiddenLine => ViewMode::Wireframe,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewMode::Wireframe => "wire",
            ViewMode::HiddenLine => "hide",
        })
    }
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "wire" => Ok(ViewMode::Wireframe),
            "hide" => Ok(ViewMode::HiddenLine),
            other => Err(Error::Domain(format!("unknown view mode '{other}'"))),
        }
    }
}

/// Integer screen coordinate, origin at the viewport center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for PixelPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Segment that survived clipping, endpoints inside the clip rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// Clip rectangle, centered on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl ClipRect {
    /// Region `CLIP_MARGIN` pixels inside a `width` x `height` surface
    ///
    /// Half extents are whole pixels so rounded endpoints stay inside.
    pub fn for_viewport(width: u32, height: u32) -> Self {
        let half_w = (width.saturating_sub(2 * CLIP_MARGIN) / 2) as f64;
        let half_h = (height.saturating_sub(2 * CLIP_MARGIN) / 2) as f64;
        Self {
            xmin: -half_w,
            xmax: half_w,
            ymin: -half_h,
            ymax: half_h,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.outcode(x, y) == INSIDE
    }

    fn outcode(&self, x: f64, y: f64) -> u8 {
        let mut code = INSIDE;
        if x < self.xmin {
            code |= LEFT;
        } else if x > self.xmax {
            code |= RIGHT;
        }
        if y < self.ymin {
            code |= BELOW;
        } else if y > self.ymax {
            code |= ABOVE;
        }
        code
    }
}

const INSIDE: u8 = 0b0000;
const LEFT: u8 = 0b0001;
const RIGHT: u8 = 0b0010;
const BELOW: u8 = 0b0100;
const ABOVE: u8 = 0b1000;

/// Cohen-Sutherland clip of `(x1, y1)-(x2, y2)` against `rect`
///
/// Endpoints may lie arbitrarily far outside the rectangle; they are only
/// narrowed to `i32` once clipped. Returns `None` when no part of the
/// segment lies inside.
pub fn clip_line(x1: f64, y1: f64, x2: f64, y2: f64, rect: &ClipRect) -> Option<ClippedSegment> {
    let (mut x1, mut y1, mut x2, mut y2) = (x1, y1, x2, y2);
    let mut code1 = rect.outcode(x1, y1);
    let mut code2 = rect.outcode(x2, y2);

    while (code1 | code2) != INSIDE {
        if (code1 & code2) != INSIDE {
            return None;
        }

        let code_out = if code1 != INSIDE { code1 } else { code2 };
        let (x, y) = if code_out & ABOVE != 0 {
            (x1 + (x2 - x1) * (rect.ymax - y1) / (y2 - y1), rect.ymax)
        } else if code_out & BELOW != 0 {
            (x1 + (x2 - x1) * (rect.ymin - y1) / (y2 - y1), rect.ymin)
        } else if code_out & RIGHT != 0 {
            (rect.xmax, y1 + (y2 - y1) * (rect.xmax - x1) / (x2 - x1))
        } else {
            (rect.xmin, y1 + (y2 - y1) * (rect.xmin - x1) / (x2 - x1))
        };

        if code_out == code1 {
            (x1, y1) = (x, y);
            code1 = rect.outcode(x1, y1);
        } else {
            (x2, y2) = (x, y);
            code2 = rect.outcode(x2, y2);
        }
    }

    Some(ClippedSegment {
        x1: x1.round() as i32,
        y1: y1.round() as i32,
        x2: x2.round() as i32,
        y2: y2.round() as i32,
    })
}

/// Bresenham line from `(x0, y0)` to `(x1, y1)`, both endpoints included,
/// in the order the endpoints were given
pub fn line_points(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<PixelPoint> {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let (mut x0, mut y0, mut x1, mut y1) = if steep {
        (y0, x0, y1, x1)
    } else {
        (x0, y0, x1, y1)
    };

    let reversed = x0 > x1;
    if reversed {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let dy = (y1 - y0).abs();
    let ystep = if y0 < y1 { 1 } else { -1 };
    let mut error = dx / 2;
    let mut y = y0;

    let mut points = Vec::with_capacity(dx as usize + 1);
    for x in x0..=x1 {
        points.push(if steep {
            PixelPoint::new(y, x)
        } else {
            PixelPoint::new(x, y)
        });
        error -= dy;
        if error < 0 {
            y += ystep;
            error += dx;
        }
    }

    if reversed {
        points.reverse();
    }
    points
}

/// Whether `face` is drawn for this camera and view mode
///
/// A face is kept when its normal points against the camera vector.
pub fn is_visible(face: &Face, camera: &Vector3<f64>, mode: ViewMode) -> bool {
    mode == ViewMode::Wireframe || xyz(&face.normal).dot(camera) < 0.0
}

/// Indices of the faces that survive hidden-line removal
pub fn visible_faces(geometry: &Geometry, camera: &Vector3<f64>, mode: ViewMode) -> Vec<usize> {
    geometry
        .faces()
        .iter()
        .enumerate()
        .filter(|(_, face)| is_visible(face, camera, mode))
        .map(|(i, _)| i)
        .collect()
}

/// Round a projected vertex to whole pixels, ties to even, still unbounded
fn to_pixel(v: &Vertex) -> (f64, f64) {
    (v[0].round_ties_even(), v[1].round_ties_even())
}

/// Clipped edges of every visible face, three per face in winding order
pub fn visible_segments(
    projected: &Geometry,
    camera: &Vector3<f64>,
    mode: ViewMode,
    rect: &ClipRect,
) -> Vec<ClippedSegment> {
    projected
        .faces()
        .iter()
        .filter(|face| is_visible(face, camera, mode))
        .flat_map(|face| face.edges())
        .filter_map(|(a, b)| {
            let (x1, y1) = to_pixel(&a);
            let (x2, y2) = to_pixel(&b);
            clip_line(x1, y1, x2, y2, rect)
        })
        .collect()
}

/// Flattened pixel list for every visible, clipped edge of `projected`
pub fn draw_lines(
    projected: &Geometry,
    camera: &Vector3<f64>,
    mode: ViewMode,
    rect: &ClipRect,
) -> Vec<PixelPoint> {
    visible_segments(projected, camera, mode, rect)
        .into_iter()
        .flat_map(|s| line_points(s.x1, s.y1, s.x2, s.y2))
        .collect()
}
