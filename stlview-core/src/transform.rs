/// Homogeneous 4x4 transforms in row-vector convention (`v' = v * M`)
///
/// Composition reads left to right: `v * A * B` applies `A` first.
use nalgebra::Matrix4;
use std::fmt;
use std::str::FromStr;

use crate::error::{ensure_finite, Error, Result};
use crate::geometry::{Geometry, Vertex};

/// Coordinate axis for rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// The six orthographic views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrthoView {
    Top,
    Bottom,
    Left,
    Right,
    Front,
    Back,
}

impl OrthoView {
    pub const ALL: [OrthoView; 6] = [
        OrthoView::Top,
        OrthoView::Bottom,
        OrthoView::Left,
        OrthoView::Right,
        OrthoView::Front,
        OrthoView::Back,
    ];

    /// Axis zeroed by the flattening matrix
    pub fn flattened_axis(self) -> Axis {
        match self {
            OrthoView::Top | OrthoView::Bottom => Axis::Y,
            OrthoView::Left | OrthoView::Right => Axis::X,
            OrthoView::Front | OrthoView::Back => Axis::Z,
        }
    }

    /// Rotation applied after flattening, if any
    pub fn companion_rotation(self) -> Option<(Axis, f64)> {
        match self {
            OrthoView::Top => Some((Axis::X, 90.0)),
            OrthoView::Bottom => Some((Axis::X, -90.0)),
            OrthoView::Left => Some((Axis::Y, 90.0)),
            OrthoView::Right => Some((Axis::Y, -90.0)),
            OrthoView::Back => Some((Axis::Y, 180.0)),
            OrthoView::Front => None,
        }
    }
}

impl fmt::Display for OrthoView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrthoView::Top => "top",
            OrthoView::Bottom => "bottom",
            OrthoView::Left => "left",
            OrthoView::Right => "right",
            OrthoView::Front => "front",
            OrthoView::Back => "back",
        };
        f.write_str(name)
    }
}

impl FromStr for OrthoView {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        OrthoView::ALL
            .into_iter()
            .find(|view| view.to_string() == s)
            .ok_or_else(|| Error::domain(format!("unknown orthographic view '{s}'")))
    }
}

/// A user-requested change to the working geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformRequest {
    Translate { dx: f64, dy: f64, dz: f64 },
    Rotate { axis: Axis, degrees: f64 },
    Zoom { factor: f64 },
    Ortho(OrthoView),
}

impl TransformRequest {
    /// Check the payload without touching any geometry
    pub fn validate(&self) -> Result<()> {
        match *self {
            TransformRequest::Translate { dx, dy, dz } => {
                ensure_finite("dx", dx)?;
                ensure_finite("dy", dy)?;
                ensure_finite("dz", dz)
            }
            TransformRequest::Rotate { degrees, .. } => ensure_finite("angle", degrees),
            TransformRequest::Zoom { factor } => check_scale_factor(factor),
            TransformRequest::Ortho(_) => Ok(()),
        }
    }

    /// Apply this request to a copy of `geometry`
    pub fn apply(&self, geometry: &Geometry) -> Result<Geometry> {
        match *self {
            TransformRequest::Translate { dx, dy, dz } => translate(geometry, dx, dy, dz),
            TransformRequest::Rotate { axis, degrees } => rotate(geometry, axis, degrees),
            TransformRequest::Zoom { factor } => scale(geometry, factor),
            TransformRequest::Ortho(view) => Ok(ortho_flatten(geometry, view)),
        }
    }
}

/// The single place a vertex meets a matrix
#[inline]
pub fn apply(v: &Vertex, m: &Matrix4<f64>) -> Vertex {
    v * m
}

/// Translation row in the bottom of the matrix
pub fn translation_matrix(dx: f64, dy: f64, dz: f64) -> Matrix4<f64> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        dx, dy, dz, 1.0,
    )
}

/// Uniform scale that divides `x`, `y` and `z` by `factor`
///
/// Built as `diag(1, 1, 1, factor) / factor`, so `w` stays 1.
pub fn scale_matrix(factor: f64) -> Matrix4<f64> {
    let mut m = Matrix4::identity();
    m[(3, 3)] = factor;
    m / factor
}

/// Right-hand rotation about `axis`, angle in radians
pub fn rotation_matrix(axis: Axis, radians: f64) -> Matrix4<f64> {
    let (s, c) = radians.sin_cos();
    match axis {
        Axis::X => Matrix4::new(
            1.0, 0.0, 0.0, 0.0, //
            0.0, c, s, 0.0, //
            0.0, -s, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ),
        Axis::Y => Matrix4::new(
            c, 0.0, -s, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            s, 0.0, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ),
        Axis::Z => Matrix4::new(
            c, s, 0.0, 0.0, //
            -s, c, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ),
    }
}

/// Diagonal matrix that zeroes one axis
pub fn flatten_matrix(axis: Axis) -> Matrix4<f64> {
    let mut m = Matrix4::identity();
    let i = match axis {
        Axis::X => 0,
        Axis::Y => 1,
        Axis::Z => 2,
    };
    m[(i, i)] = 0.0;
    m
}

/// Multiply every vertex by `m`; normals untouched
pub fn transform_vertices(geometry: &Geometry, m: &Matrix4<f64>) -> Geometry {
    geometry.map_vertices(|v| apply(v, m))
}

/// Multiply every vertex and every normal by the same `m`
pub fn transform_rigid(geometry: &Geometry, m: &Matrix4<f64>) -> Geometry {
    transform_vertices(geometry, m).map_normals(|n| apply(n, m))
}

pub fn translate(geometry: &Geometry, dx: f64, dy: f64, dz: f64) -> Result<Geometry> {
    ensure_finite("dx", dx)?;
    ensure_finite("dy", dy)?;
    ensure_finite("dz", dz)?;
    Ok(transform_vertices(
        geometry,
        &translation_matrix(dx, dy, dz),
    ))
}

/// Uniformly divide vertex coordinates by `factor`
pub fn scale(geometry: &Geometry, factor: f64) -> Result<Geometry> {
    check_scale_factor(factor)?;
    Ok(transform_vertices(geometry, &scale_matrix(factor)))
}

/// Rotate vertices and normals about `axis` by `degrees`
pub fn rotate(geometry: &Geometry, axis: Axis, degrees: f64) -> Result<Geometry> {
    ensure_finite("angle", degrees)?;
    Ok(transform_rigid(
        geometry,
        &rotation_matrix(axis, degrees.to_radians()),
    ))
}

/// Collapse onto the view plane, then turn the result to face the viewer
pub fn ortho_flatten(geometry: &Geometry, view: OrthoView) -> Geometry {
    let flat = transform_vertices(geometry, &flatten_matrix(view.flattened_axis()));
    match view.companion_rotation() {
        Some((axis, degrees)) => {
            transform_rigid(&flat, &rotation_matrix(axis, degrees.to_radians()))
        }
        None => flat,
    }
}

fn check_scale_factor(factor: f64) -> Result<()> {
    ensure_finite("scale factor", factor)?;
    if factor == 0.0 {
        return Err(Error::domain("scale factor must be non-zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{vertex, Face};
    use approx::assert_relative_eq;

    fn assert_vertex_eq(a: &Vertex, b: &Vertex) {
        assert_relative_eq!(*a, *b, epsilon = 1e-9);
    }

    #[test]
    fn test_translation_row() {
        let v = apply(&vertex(1.0, 2.0, 3.0), &translation_matrix(10.0, -2.0, 0.5));
        assert_vertex_eq(&v, &vertex(11.0, 0.0, 3.5));
    }

    #[test]
    fn test_scale_divides() {
        let v = apply(&vertex(4.0, -8.0, 2.0), &scale_matrix(2.0));
        assert_vertex_eq(&v, &vertex(2.0, -4.0, 1.0));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let cube = Geometry::cube(1.0);
        assert!(matches!(scale(&cube, 0.0), Err(Error::Domain(_))));
        assert!(scale(&cube, f64::NAN).is_err());
    }

    #[test]
    fn test_rotation_directions() {
        let quarter = 90f64.to_radians();
        let x = vertex(1.0, 0.0, 0.0);
        let y = vertex(0.0, 1.0, 0.0);
        // Row-vector convention: rotating about Z by +90 sends X to Y
        assert_vertex_eq(&apply(&x, &rotation_matrix(Axis::Z, quarter)), &y);
        assert_vertex_eq(
            &apply(&y, &rotation_matrix(Axis::X, quarter)),
            &vertex(0.0, 0.0, 1.0),
        );
        assert_vertex_eq(
            &apply(&vertex(0.0, 0.0, 1.0), &rotation_matrix(Axis::Y, quarter)),
            &x,
        );
    }

    #[test]
    fn test_rotate_moves_normals() {
        let cube = Geometry::cube(1.0);
        let turned = rotate(&cube, Axis::Z, 90.0).unwrap();
        let before = cube.faces()[10].normal;
        let after = turned.faces()[10].normal;
        assert_vertex_eq(&after, &apply(&before, &rotation_matrix(Axis::Z, 90f64.to_radians())));
    }

    #[test]
    fn test_translate_keeps_normals() {
        let cube = Geometry::cube(1.0);
        let moved = translate(&cube, 5.0, 5.0, 5.0).unwrap();
        assert!(cube.normals().eq(moved.normals()));
    }

    #[test]
    fn test_ortho_front_zeroes_z() {
        let cube = Geometry::cube(1.0);
        let front = ortho_flatten(&cube, OrthoView::Front);
        assert!(front.vertices().all(|v| v[2] == 0.0));
        assert!(cube.normals().eq(front.normals()));
    }

    #[test]
    fn test_ortho_top_lands_in_xy_plane() {
        let cube = Geometry::cube(1.0);
        let top = ortho_flatten(&cube, OrthoView::Top);
        assert!(top.vertices().all(|v| v[2].abs() < 1e-12));
    }

    #[test]
    fn test_ortho_side_views_land_in_xy_plane() {
        let cube = Geometry::cube(1.0);
        for view in [OrthoView::Left, OrthoView::Right, OrthoView::Back, OrthoView::Bottom] {
            let flat = ortho_flatten(&cube, view);
            assert!(flat.vertices().all(|v| v[2].abs() < 1e-12), "{view}");
        }
    }

    #[test]
    fn test_ortho_view_directions() {
        let face = Face::new(
            vertex(1.0, 2.0, 3.0),
            vertex(1.0, 2.0, 3.0),
            vertex(1.0, 2.0, 3.0),
            vertex(4.0, 5.0, 6.0),
        );
        let geometry: Geometry = [face].into_iter().collect();

        // (view, flattened vertex after the companion turn, rotated normal)
        let cases = [
            (OrthoView::Top, vertex(1.0, -3.0, 0.0), vertex(4.0, -6.0, 5.0)),
            (OrthoView::Bottom, vertex(1.0, 3.0, 0.0), vertex(4.0, 6.0, -5.0)),
            (OrthoView::Left, vertex(3.0, 2.0, 0.0), vertex(6.0, 5.0, -4.0)),
            (OrthoView::Right, vertex(-3.0, 2.0, 0.0), vertex(-6.0, 5.0, 4.0)),
            (OrthoView::Front, vertex(1.0, 2.0, 0.0), vertex(4.0, 5.0, 6.0)),
            (OrthoView::Back, vertex(-1.0, 2.0, 0.0), vertex(-4.0, 5.0, -6.0)),
        ];
        for (view, expected_vertex, expected_normal) in cases {
            let flat = ortho_flatten(&geometry, view);
            let result = &flat.faces()[0];
            assert_relative_eq!(result.vertices[0], expected_vertex, epsilon = 1e-9);
            assert_relative_eq!(result.normal, expected_normal, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_ortho_left_matches_positive_y_turn() {
        let cube = Geometry::cube(1.0);
        let left = ortho_flatten(&cube, OrthoView::Left);
        let turn = rotation_matrix(Axis::Y, 90f64.to_radians());
        for (before, after) in cube.normals().zip(left.normals()) {
            assert_vertex_eq(after, &apply(before, &turn));
        }
        let point = Geometry::from_iter([Face::new(
            vertex(0.0, 0.0, 1.0),
            vertex(0.0, 0.0, 1.0),
            vertex(0.0, 0.0, 1.0),
            vertex(0.0, 0.0, 1.0),
        )]);
        let moved = ortho_flatten(&point, OrthoView::Left);
        assert_vertex_eq(&moved.faces()[0].vertices[0], &vertex(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ortho_view_parse() {
        for view in OrthoView::ALL {
            assert_eq!(view.to_string().parse::<OrthoView>().unwrap(), view);
        }
        assert!("diagonal".parse::<OrthoView>().is_err());
    }

    #[test]
    fn test_request_validation() {
        assert!(TransformRequest::Zoom { factor: 0.0 }.validate().is_err());
        assert!(TransformRequest::Translate { dx: 1.0, dy: f64::NAN, dz: 0.0 }
            .validate()
            .is_err());
        assert!(TransformRequest::Rotate { axis: Axis::X, degrees: 15.0 }
            .validate()
            .is_ok());
    }
}
