//! Math utilities and types
//!
//! Provides the homogeneous point and matrix types used by the transform pipeline.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix4,
    Perspective3,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type, used for homogeneous vertices
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Integer screen-space point (x, y, depth, w) handed to the rasterizer
pub type ScreenPoint = Vector4<i32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::*;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Build a homogeneous point (w = 1)
    pub fn point(x: f32, y: f32, z: f32) -> Vec4 {
        Vec4::new(x, y, z, 1.0)
    }

    /// Build a homogeneous direction (w = 0), unaffected by translation
    pub fn direction(x: f32, y: f32, z: f32) -> Vec4 {
        Vec4::new(x, y, z, 0.0)
    }

    /// Divide x, y, z by the vertex's own w and force w to 1
    ///
    /// A zero w leaves x, y, z untouched; the vertex still leaves with w == 1.
    pub fn perspective_divide(vertex: &mut Vec4) {
        if vertex.w != 0.0 {
            let divisor = 1.0 / vertex.w;
            vertex.x *= divisor;
            vertex.y *= divisor;
            vertex.z *= divisor;
        }
        vertex.w = 1.0;
    }
}

/// Extension trait for Mat4 with the affine building blocks of the node pipeline
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a right-handed perspective projection (camera looks down -Z, NDC z in [-1, 1])
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Create a translation matrix
    fn translation(offset: &Vec3) -> Mat4;

    /// Create a per-axis scaling matrix
    fn scaling(x: f32, y: f32, z: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Perspective3::new(aspect, fov_y, near, far).to_homogeneous()
    }

    fn translation(offset: &Vec3) -> Mat4 {
        Mat4::new_translation(offset)
    }

    fn scaling(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_nonuniform_scaling(&Vec3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_rotation_y_quarter_turn() {
        // Right-handed: +X rotated 90 degrees around +Y lands on -Z
        let rotated = Mat4::rotation_y(constants::PI / 2.0) * utils::point(1.0, 0.0, 0.0);
        assert_relative_eq!(rotated, utils::point(0.0, 0.0, -1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_direction_ignores_translation() {
        let translate = Mat4::translation(&Vec3::new(5.0, -3.0, 2.0));
        let moved = translate * utils::direction(0.0, 1.0, 0.0);
        assert_relative_eq!(moved, utils::direction(0.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_perspective_divide_uses_vertex_w() {
        let mut vertex = Vec4::new(2.0, 4.0, -6.0, 2.0);
        utils::perspective_divide(&mut vertex);
        assert_relative_eq!(vertex, Vec4::new(1.0, 2.0, -3.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_perspective_divide_zero_w() {
        let mut vertex = Vec4::new(2.0, 4.0, -6.0, 0.0);
        utils::perspective_divide(&mut vertex);
        assert_eq!(vertex, Vec4::new(2.0, 4.0, -6.0, 1.0));
    }

    #[test]
    fn test_perspective_maps_near_and_far_planes() {
        let projection = Mat4::perspective(utils::deg_to_rad(90.0), 1.0, 1.0, 10.0);

        let mut near = projection * utils::point(0.0, 0.0, -1.0);
        utils::perspective_divide(&mut near);
        assert_relative_eq!(near.z, -1.0, epsilon = 1e-5);

        let mut far = projection * utils::point(0.0, 0.0, -10.0);
        utils::perspective_divide(&mut far);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-5);
    }
}
