/// Axonometric camera projections (isometric, dimetric, trimetric)
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::SQRT_2;
use std::fmt;
use std::str::FromStr;

use crate::error::{ensure_finite, Error, Result};
use crate::geometry::{vertex, Geometry};
use crate::transform::{apply, flatten_matrix, rotation_matrix, transform_vertices, Axis};

/// Projection family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProjectionKind {
    #[default]
    #[serde(rename = "iso")]
    Isometric,
    #[serde(rename = "di")]
    Dimetric,
    #[serde(rename = "tri")]
    Trimetric,
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProjectionKind::Isometric => "iso",
            ProjectionKind::Dimetric => "di",
            ProjectionKind::Trimetric => "tri",
        };
        f.write_str(name)
    }
}

impl FromStr for ProjectionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "iso" => Ok(ProjectionKind::Isometric),
            "di" => Ok(ProjectionKind::Dimetric),
            "tri" => Ok(ProjectionKind::Trimetric),
            other => Err(Error::domain(format!("unknown projection '{other}'"))),
        }
    }
}

/// Inputs read by the dimetric and trimetric projections
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    /// Dimetric foreshortening factor, in (0, sqrt 2)
    pub fz: f64,
    /// Trimetric rotation about Y, degrees
    pub phi: f64,
    /// Trimetric rotation about X, degrees
    pub theta: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            fz: 0.375,
            phi: 45.0,
            theta: 35.0,
        }
    }
}

/// Check a dimetric foreshortening factor
///
/// Beyond the (0, sqrt 2) range, `fz > 1` is also rejected: the rotation
/// about Y would need `asin` of a value above 1.
pub fn check_fz(fz: f64) -> Result<()> {
    ensure_finite("fz", fz)?;
    if fz <= 0.0 || fz >= SQRT_2 {
        return Err(Error::domain(format!("fz must lie in (0, sqrt(2)), got {fz}")));
    }
    if fz / (2.0 - fz * fz).sqrt() > 1.0 {
        return Err(Error::domain(format!("fz {fz} has no real dimetric angle")));
    }
    Ok(())
}

/// Rotation angles `(phi, theta)` in radians for a projection kind
pub fn angles(kind: ProjectionKind, params: &ProjectionParams) -> Result<(f64, f64)> {
    match kind {
        ProjectionKind::Isometric => Ok((
            45f64.to_radians(),
            30f64.to_radians().tan().asin(),
        )),
        ProjectionKind::Dimetric => {
            let fz = params.fz;
            check_fz(fz)?;
            let theta = (fz / SQRT_2).asin();
            let phi = (fz / (2.0 - fz * fz).sqrt()).asin();
            Ok((phi, theta))
        }
        ProjectionKind::Trimetric => {
            ensure_finite("phi", params.phi)?;
            ensure_finite("theta", params.theta)?;
            Ok((params.phi.to_radians(), params.theta.to_radians()))
        }
    }
}

/// Result of projecting geometry onto the screen plane
#[derive(Debug, Clone)]
pub struct Projected {
    /// Vertices with `z = 0`; normals carried through unchanged
    pub geometry: Geometry,
    /// View direction expressed in model axes, for face visibility
    pub camera: Vector3<f64>,
}

/// Project `geometry` with `rotY(phi) * rotX(theta) * flattenZ`
///
/// The camera vector is the canonical `(0, 0, -1)` pushed through the same
/// rotations in reverse order, with its `z` negated.
pub fn perspective(
    kind: ProjectionKind,
    geometry: &Geometry,
    params: &ProjectionParams,
) -> Result<Projected> {
    let (phi, theta) = angles(kind, params)?;
    let rot_y = rotation_matrix(Axis::Y, phi);
    let rot_x = rotation_matrix(Axis::X, theta);

    let view: Matrix4<f64> = rot_y * rot_x * flatten_matrix(Axis::Z);
    let projected = transform_vertices(geometry, &view);

    let c = apply(&apply(&vertex(0.0, 0.0, -1.0), &rot_x), &rot_y);
    let camera = Vector3::new(c[0], c[1], -c[2]);

    Ok(Projected {
        geometry: projected,
        camera,
    })
}
