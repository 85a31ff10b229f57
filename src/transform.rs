/*

    Affine transforms of scene objects.

    An object stores its local transform as translation, rotation
    and (possibly non-uniform) scale. World matrices are obtained by
    chaining parent matrices: world = parent_world * local.

    @date: Oct, 2025
    @author: bartu
*/

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3,
    pub rotation: Quaternion,
    pub scale: Vector3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vector3::ZERO,
        rotation: Quaternion::IDENTITY,
        scale: Vector3::ONE,
    };

    pub fn from_translation(translation: Vector3) -> Self {
        Self { translation, ..Self::IDENTITY }
    }

    pub fn with_rotation(mut self, rotation: Quaternion) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }

    /// Decompose an affine matrix. Shear is lost.
    pub fn from_matrix(mat: &Matrix4) -> Self {
        let (scale, rotation, translation) = mat.to_scale_rotation_translation();
        Self { translation, rotation, scale }
    }

    pub fn to_matrix(&self) -> Matrix4 {
        Matrix4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Scale factors of an affine matrix, i.e. the lengths of its basis columns.
pub fn world_scale(mat: &Matrix4) -> Vector3 {
    Vector3::new(
        mat.x_axis.truncate().length(),
        mat.y_axis.truncate().length(),
        mat.z_axis.truncate().length(),
    )
}

/// Rotation part of an affine matrix.
///
/// A basis column flattened to zero scale has no direction, it is
/// rebuilt from the remaining columns so the result is always a unit
/// quaternion. With every column flattened the rotation is identity.
pub fn rotation_of(mat: &Matrix4) -> Quaternion {
    let mut axes = [mat.x_axis.truncate(), mat.y_axis.truncate(), mat.z_axis.truncate()];
    let flat: Vec<usize> = (0..3).filter(|&i| approx_zero(axes[i].length_squared())).collect();

    match flat.len() {
        0 => return Transform::from_matrix(mat).rotation,
        3 => {
            warn!("World matrix has zero scale on every axis, using identity rotation");
            return Quaternion::IDENTITY;
        }
        2 => {
            let kept = (0..3).find(|i| !flat.contains(i)).unwrap_or(0);
            let (other, _) = axes[kept].normalize().any_orthonormal_pair();
            axes[(kept + 1) % 3] = other;
        }
        _ => {}
    }

    // Exactly one axis left to rebuild, right handed from the other two
    for i in 0..3 {
        if approx_zero(axes[i].length_squared()) {
            axes[i] = axes[(i + 1) % 3].cross(axes[(i + 2) % 3]);
        }
    }
    let [x, y, z] = axes.map(|a| a.normalize_or_zero());
    if x == Vector3::ZERO || y == Vector3::ZERO || z == Vector3::ZERO {
        warn!("World matrix basis is degenerate, using identity rotation");
        return Quaternion::IDENTITY;
    }

    Quaternion::from_mat3(&Matrix3::from_cols(x, y, z)).normalize()
}

/// Rotation of `angle_deg` degrees around `axis` (right handed).
pub fn axis_angle_degrees(axis: Vector3, angle_deg: Float) -> Quaternion {
    if approx_zero(axis.length_squared()) {
        warn!("Rotation axis is zero, falling back to identity rotation");
        return Quaternion::IDENTITY;
    }
    Quaternion::from_axis_angle(axis.normalize(), angle_deg.to_radians())
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::approx_eq_vec;

    #[test]
    fn test_roundtrip_through_matrix() {
        let t = Transform::from_translation(Vector3::new(1., -2., 3.))
            .with_rotation(axis_angle_degrees(Vector3::Z, 30.))
            .with_scale(Vector3::new(2., 1., 0.5));
        let back = Transform::from_matrix(&t.to_matrix());
        assert!(approx_eq_vec(&back.translation, &t.translation));
        assert!(approx_eq_vec(&back.scale, &t.scale));
        assert!(approx_zero(1.0 - back.rotation.dot(t.rotation).abs()));
    }

    #[test]
    fn test_world_scale_ignores_rotation() {
        let mat = Transform::IDENTITY
            .with_rotation(axis_angle_degrees(Vector3::new(1., 1., 0.), 77.))
            .with_scale(Vector3::new(3., 4., 5.))
            .to_matrix();
        assert!(approx_eq_vec(&world_scale(&mat), &Vector3::new(3., 4., 5.)));
    }

    #[test]
    fn test_rotation_of_flattened_axis() {
        let rot = axis_angle_degrees(Vector3::new(0., 1., 1.), 40.);
        for scale in [Vector3::new(1., 1., 0.), Vector3::new(2., 0., 3.), Vector3::new(0., 0., 5.)] {
            let mat = Transform::IDENTITY.with_rotation(rot).with_scale(scale).to_matrix();
            let q = rotation_of(&mat);
            assert!(q.is_finite() && q.is_normalized());
            if scale.x != 0.0 {
                // Surviving columns keep their direction
                assert!(approx_eq_vec(&(q * Vector3::X), &(rot * Vector3::X)));
            }
        }
        assert!(approx_zero(1.0 - rotation_of(&Matrix4::from_scale(Vector3::new(1., 1., 0.))).dot(Quaternion::IDENTITY).abs()));
        assert_eq!(rotation_of(&Matrix4::from_scale(Vector3::ZERO)), Quaternion::IDENTITY);
    }

    #[test]
    fn test_rotation_of_regular_matrix() {
        let rot = axis_angle_degrees(Vector3::X, 65.);
        let mat = Transform::from_translation(Vector3::ONE).with_rotation(rot).with_scale(Vector3::splat(3.)).to_matrix();
        assert!(approx_zero(1.0 - rotation_of(&mat).dot(rot).abs()));
    }

    #[test]
    fn test_rotation_is_right_handed() {
        let q = axis_angle_degrees(Vector3::Z, 90.);
        assert!(approx_eq_vec(&(q * Vector3::X), &Vector3::Y));
        assert_eq!(axis_angle_degrees(Vector3::ZERO, 45.), Quaternion::IDENTITY);
    }
}
