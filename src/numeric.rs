/*

    Declare numeric types used throughout this repo.

    WARNING: If you like to use f32 instead of f64
    during computations, you need to change all of these:
    pub type Float = f32;
    pub type Vector3 = Vec3;
    pub type Quaternion = Quat;

    @date: 2 Oct, 2025
    @author: Bartu
*/

use bevy_math::{DMat3, DMat4, DQuat, DVec3, DVec4};
pub type Float = f64; // WARNING: If you want to change it to f32, don't forget to update Vector3 and Matrix types
pub type Vector3 = DVec3;
pub type Vector4 = DVec4;
pub type Matrix3 = DMat3;
pub type Matrix4 = DMat4;
pub type Quaternion = DQuat;

pub fn approx_zero(x: Float) -> bool {
    x.abs() < 1e-8
}

pub fn approx_eq_vec(a: &Vector3, b: &Vector3) -> bool {
    approx_zero(a.distance(*b))
}

pub fn transform_point(mat: &Matrix4, v: &Vector3) -> Vector3 {
    let v4 = Vector4::new(v.x, v.y, v.z, 1.0);
    let r = *mat * v4;
    Vector3::new(r.x, r.y, r.z)
}

pub fn transform_dir(mat: &Matrix4, v: &Vector3) -> Vector3 {
    // Only difference from transform_point is that last component
    // w = 0, so translation is dropped
    let v4 = Vector4::new(v.x, v.y, v.z, 0.0);
    let r = *mat * v4;
    Vector3::new(r.x, r.y, r.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_vs_dir() {
        let mat = Matrix4::from_translation(Vector3::new(1., 2., 3.));
        let v = Vector3::new(1., 1., 1.);
        assert!(approx_eq_vec(&transform_point(&mat, &v), &Vector3::new(2., 3., 4.)));
        assert!(approx_eq_vec(&transform_dir(&mat, &v), &v));
    }
}
