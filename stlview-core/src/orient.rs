/// Initial placement: center on the origin and fit the viewport
use crate::error::Result;
use crate::geometry::Geometry;
use crate::projection::{perspective, ProjectionKind, ProjectionParams};
use crate::transform::{scale, translate};

/// Center `baseline` on the origin and scale it so its isometric
/// silhouette fits half of the viewport
///
/// The isometric pass is only used to measure; the returned geometry is
/// not projected. Geometry with no positive projected extent (empty, or a
/// single point) comes back centered but unscaled.
pub fn orient(baseline: &Geometry, width: u32, height: u32) -> Result<Geometry> {
    let Some((min, max)) = baseline.bounds() else {
        return Ok(baseline.clone());
    };
    let center = (min + max) * 0.5;
    let centered = translate(baseline, -center.x, -center.y, -center.z)?;

    let iso = perspective(
        ProjectionKind::Isometric,
        &centered,
        &ProjectionParams::default(),
    )?;
    let (max_x, max_y) = iso
        .geometry
        .vertices()
        .fold((f64::MIN, f64::MIN), |(mx, my), v| (mx.max(v[0]), my.max(v[1])));

    let fit = if max_x >= max_y {
        (0.5 * width as f64) / (2.0 * max_x)
    } else {
        (0.5 * height as f64) / (2.0 * max_y)
    };
    if !fit.is_finite() || fit <= 0.0 {
        tracing::debug!("Degenerate extent ({max_x}, {max_y}), skipping fit");
        return Ok(centered);
    }

    tracing::debug!("Orienting: center {:?}, fit scale {fit}", center.as_slice());
    scale(&centered, 1.0 / fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_centers_bounding_box() {
        let cube = Geometry::cube(10.0);
        let oriented = orient(&cube, 1000, 800).unwrap();
        let (min, max) = oriented.bounds().unwrap();
        assert_relative_eq!(min + max, nalgebra::Vector3::zeros(), epsilon = 1e-9);
    }

    #[test]
    fn test_fit_is_independent_of_input_size() {
        let small = orient(&Geometry::cube(1.0), 1000, 800).unwrap();
        let large = orient(&Geometry::cube(250.0), 1000, 800).unwrap();
        for (a, b) in small.vertices().zip(large.vertices()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_silhouette_fits_half_viewport() {
        let oriented = orient(&Geometry::cube(3.0), 1000, 800).unwrap();
        let iso = perspective(
            ProjectionKind::Isometric,
            &oriented,
            &ProjectionParams::default(),
        )
        .unwrap();
        let max_x = iso.geometry.vertices().map(|v| v[0]).fold(f64::MIN, f64::max);
        let max_y = iso.geometry.vertices().map(|v| v[1]).fold(f64::MIN, f64::max);
        // An isometric cube is taller than wide, so height drives the fit
        assert!(max_y > max_x);
        assert_relative_eq!(max_y, 200.0, epsilon = 1e-9);
        assert_relative_eq!(max_x, 100.0 * 3f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_normals_untouched() {
        let cube = Geometry::cube(4.0);
        let oriented = orient(&cube, 600, 600).unwrap();
        assert!(cube.normals().eq(oriented.normals()));
    }

    #[test]
    fn test_empty_geometry() {
        let oriented = orient(&Geometry::new(), 600, 600).unwrap();
        assert!(oriented.is_empty());
    }
}
