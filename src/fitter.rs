/*

    Fit a bounding primitive to a selection of vertices.

    Given the selected vertices in the local frame of their object,
    the object's world matrix and world scale, compute where a
    box/sphere/capsule/cylinder enclosing the selection should be
    placed and how large it should be. Pure computation, the scene
    is never touched here.

    @date: Oct, 2025
    @author: bartu
*/

use crate::bbox::BBox;
use crate::error::FitError;
use crate::numeric::{transform_dir, transform_point};
use crate::shapes::{PrimitiveShape, ShapeKind};
use crate::transform::rotation_of;
use crate::prelude::*;

/// Result of fitting, ready to be handed to a mesh builder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedPrimitive {
    pub shape: PrimitiveShape,
    /// Location of the new primitive, set directly in its parent's space
    pub center: Vector3,
    /// Rotation of the world transform, always a unit quaternion
    pub orientation: Quaternion,
}

pub fn fit_primitive(
    points: &[Vector3],
    world_transform: &Matrix4,
    world_scale: Vector3,
    kind: ShapeKind,
) -> Result<FittedPrimitive, FitError> {

    let local_bbox = BBox::from_points(points).ok_or(FitError::EmptyPointSet)?;
    let bbmin_local = local_bbox.min();
    let bbmax_local = local_bbox.max();

    let bbmin = transform_point(world_transform, &bbmin_local);
    let bbmax = transform_point(world_transform, &bbmax_local);

    // Linear part is applied on top of the world space corners
    let radius = (transform_dir(world_transform, &bbmax).x - transform_dir(world_transform, &bbmin).x) / 2.0;
    // Diagonal of the box, not a principal axis length
    let height = bbmin.distance(bbmax);
    let center = (bbmin + bbmax) / 2.0;

    let shape = match kind {
        ShapeKind::Box => {
            let min = bbmin_local * world_scale;
            let max = bbmax_local * world_scale;
            let box_center = (min + max) / 2.0;
            PrimitiveShape::Box { min: min - box_center, max: max - box_center }
        }
        ShapeKind::Sphere => PrimitiveShape::Sphere { radius: height / 2.0 },
        // Cap radii are not subtracted from the height
        ShapeKind::Capsule => PrimitiveShape::Capsule { radius, height },
        ShapeKind::Cylinder => PrimitiveShape::Cylinder { radius, height },
    };

    let orientation = rotation_of(world_transform);

    debug!("Fitted {} to {} points: {:?}, center {}", kind, points.len(), shape, center);
    Ok(FittedPrimitive { shape, center, orientation })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::approx_eq_vec;
    use crate::transform::axis_angle_degrees;
    use strum::IntoEnumIterator;

    fn unit_cube_corners() -> Vec<Vector3> {
        vec![Vector3::new(-1., -1., -1.), Vector3::new(1., 1., 1.)]
    }

    #[test]
    fn test_center_is_bbox_mean_under_identity() {
        let pts = vec![
            Vector3::new(2., 0., 1.),
            Vector3::new(4., -2., 3.),
            Vector3::new(3., 6., 2.),
        ];
        for kind in ShapeKind::iter() {
            let fit = fit_primitive(&pts, &Matrix4::IDENTITY, Vector3::ONE, kind).unwrap();
            assert!(approx_eq_vec(&fit.center, &Vector3::new(3., 2., 2.)));
        }
    }

    #[test]
    fn test_box_corners() {
        let fit = fit_primitive(&unit_cube_corners(), &Matrix4::IDENTITY, Vector3::ONE, ShapeKind::Box).unwrap();
        match fit.shape {
            PrimitiveShape::Box { min, max } => {
                assert!(approx_eq_vec(&min, &Vector3::splat(-1.)));
                assert!(approx_eq_vec(&max, &Vector3::splat(1.)));
            }
            other => panic!("Expected a box, got {:?}", other),
        }
    }

    #[test]
    fn test_box_is_centered_and_scaled() {
        // Off-center selection, the box corners are still around the box's own center
        let pts = vec![Vector3::new(1., 1., 1.), Vector3::new(3., 2., 5.)];
        let scale = Vector3::new(2., 1., 0.5);
        let fit = fit_primitive(&pts, &Matrix4::from_scale(scale), scale, ShapeKind::Box).unwrap();
        let PrimitiveShape::Box { min, max } = fit.shape else { panic!("Expected a box") };
        assert!(approx_eq_vec(&min, &Vector3::new(-2., -0.5, -1.)));
        assert!(approx_eq_vec(&max, &Vector3::new(2., 0.5, 1.)));
        assert!(approx_eq_vec(&(min + max), &Vector3::ZERO));
    }

    #[test]
    fn test_box_does_not_bake_rotation() {
        let rot = axis_angle_degrees(Vector3::Z, 45.);
        let mat = Matrix4::from_quat(rot);
        let fit = fit_primitive(&unit_cube_corners(), &mat, Vector3::ONE, ShapeKind::Box).unwrap();
        let PrimitiveShape::Box { max, .. } = fit.shape else { panic!("Expected a box") };
        assert!(approx_eq_vec(&max, &Vector3::ONE));
        assert!(approx_zero(1.0 - fit.orientation.dot(rot).abs()));
    }

    #[test]
    fn test_sphere_radius_is_half_diagonal() {
        let pts = vec![Vector3::ZERO, Vector3::new(4., 0., 0.), Vector3::new(1., 0., 0.)];
        let fit = fit_primitive(&pts, &Matrix4::IDENTITY, Vector3::ONE, ShapeKind::Sphere).unwrap();
        assert_eq!(fit.shape, PrimitiveShape::Sphere { radius: 2.0 });
    }

    #[test]
    fn test_cylinder_and_capsule_dimensions() {
        let mat = Matrix4::from_scale_rotation_translation(
            Vector3::new(2., 1., 3.),
            axis_angle_degrees(Vector3::Y, 20.),
            Vector3::new(10., -4., 1.),
        );
        let pts = vec![Vector3::new(-1., 0., 2.), Vector3::new(0.5, 3., -1.), Vector3::new(1., 1., 0.)];

        let bbmin = transform_point(&mat, &Vector3::new(-1., 0., -1.));
        let bbmax = transform_point(&mat, &Vector3::new(1., 3., 2.));
        let expected_radius = (transform_dir(&mat, &bbmax).x - transform_dir(&mat, &bbmin).x) / 2.0;
        let expected_height = bbmin.distance(bbmax);

        for kind in [ShapeKind::Capsule, ShapeKind::Cylinder] {
            let fit = fit_primitive(&pts, &mat, Vector3::new(2., 1., 3.), kind).unwrap();
            assert_eq!(fit.shape.kind(), kind);
            assert!(approx_zero(fit.shape.radius().unwrap() - expected_radius));
            assert!(approx_zero(fit.shape.height().unwrap() - expected_height));
        }
    }

    #[test]
    fn test_capsule_radius_is_half_x_extent_without_rotation() {
        let mat = Matrix4::from_translation(Vector3::new(7., 7., 7.));
        let fit = fit_primitive(&unit_cube_corners(), &mat, Vector3::ONE, ShapeKind::Capsule).unwrap();
        assert_eq!(fit.shape.radius(), Some(1.0));
        assert!(approx_zero(fit.shape.height().unwrap() - 12.0_f64.sqrt()));
        assert!(approx_eq_vec(&fit.center, &Vector3::splat(7.)));
    }

    #[test]
    fn test_empty_point_set_fails_for_every_kind() {
        for kind in ShapeKind::iter() {
            let res = fit_primitive(&[], &Matrix4::IDENTITY, Vector3::ONE, kind);
            assert_eq!(res, Err(FitError::EmptyPointSet));
        }
    }

    #[test]
    fn test_single_point() {
        let p = Vector3::new(1., 2., 3.);
        let fit = fit_primitive(&[p], &Matrix4::IDENTITY, Vector3::ONE, ShapeKind::Sphere).unwrap();
        assert_eq!(fit.shape, PrimitiveShape::Sphere { radius: 0.0 });
        assert_eq!(fit.center, p);
    }

    #[test]
    fn test_flattened_axis_keeps_orientation_finite() {
        let scale = Vector3::new(1., 1., 0.);
        let rot = axis_angle_degrees(Vector3::Z, 30.);
        let pts = vec![Vector3::new(-1., -2., -3.), Vector3::new(1., 2., 3.)];

        for mat in [Matrix4::from_scale(scale), Matrix4::from_quat(rot) * Matrix4::from_scale(scale)] {
            for kind in ShapeKind::iter() {
                let fit = fit_primitive(&pts, &mat, scale, kind).unwrap();
                assert!(fit.orientation.is_finite() && fit.orientation.is_normalized());
                assert!(fit.center.is_finite());
            }
        }

        let fit = fit_primitive(&pts, &Matrix4::from_scale(scale), scale, ShapeKind::Box).unwrap();
        assert!(approx_zero(1.0 - fit.orientation.dot(Quaternion::IDENTITY).abs()));
        assert_eq!(fit.shape, PrimitiveShape::Box { min: Vector3::new(-1., -2., 0.), max: Vector3::new(1., 2., 0.) });

        let fit = fit_primitive(&pts, &(Matrix4::from_quat(rot) * Matrix4::from_scale(scale)), scale, ShapeKind::Sphere).unwrap();
        assert!(approx_zero(1.0 - fit.orientation.dot(rot).abs()));
    }
}
