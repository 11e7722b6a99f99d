//! 3D transformation matrices for placing meshes in a scene
use nalgebra::{Matrix4, Point3, Vector3};

/// Euler rotation around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerRotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl EulerRotation {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
}

impl Default for EulerRotation {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from Euler angles
    pub fn rotation(rotation: &EulerRotation) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // Apply rotations in order: X, Y, Z
        rz * ry * rx
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    pub fn scale(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    pub fn uniform_scale(s: f32) -> Matrix4<f32> {
        Matrix4::new_scaling(s)
    }

    /// Compose a local matrix: scale first, then rotate, then translate
    pub fn compose(
        translation: &Vector3<f32>,
        rotation: &EulerRotation,
        scale: &Vector3<f32>,
    ) -> Matrix4<f32> {
        Matrix4::new_translation(translation)
            * Self::rotation(rotation)
            * Matrix4::new_nonuniform_scaling(scale)
    }
}

/// Apply a 4x4 transform to a point, including the homogeneous divide
pub fn apply_point(matrix: &Matrix4<f32>, point: &Point3<f32>) -> Point3<f32> {
    matrix.transform_point(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation(&EulerRotation::zero());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_translation_moves_point() {
        let m = Transform::translation(1.0, -2.0, 3.5);
        let p = apply_point(&m, &Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p, Point3::new(2.0, -1.0, 4.5));
    }

    #[test]
    fn test_compose_order() {
        // Scale by 2, rotate a quarter turn about z, then translate along x.
        let m = Transform::compose(
            &Vector3::new(10.0, 0.0, 0.0),
            &EulerRotation::new(0.0, 0.0, FRAC_PI_2),
            &Vector3::new(2.0, 2.0, 2.0),
        );
        let p = apply_point(&m, &Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(10.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_uniform_scale() {
        let m = Transform::uniform_scale(3.0);
        let p = apply_point(&m, &Point3::new(1.0, 2.0, -1.0));
        assert_relative_eq!(p, Point3::new(3.0, 6.0, -3.0));
    }
}
