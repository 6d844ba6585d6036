//! Lighting system
//!
//! One point light per frame and a scalar ambient term. Shading is evaluated
//! per vertex with a Lambert term:
//!
//! ```text
//! intensity = clamp(max(dot(n, l), 0) + ambient, 0, 1)
//! ```
//!
//! `l` is the light's position taken as a direction from the origin, not the
//! vector from the surface to the light. This keeps the lighting identical for
//! every vertex of a mesh, as the classic z-buffer demo does.

use crate::foundation::math::Vec3;
use crate::render::primitives::Color;

/// Point light descriptor
///
/// Immutable after construction. Rotation and scale are carried from the scene
/// description but do not take part in shading.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    position: Vec3,
    rotation: Vec3,
    scale: f32,
    intensity: f32,
}

impl Light {
    /// Create a light
    ///
    /// # Arguments
    /// * `position` - Light position, also used as the light direction
    /// * `rotation` - Euler angles in radians (unused by shading)
    /// * `scale` - Uniform scale (unused by shading)
    /// * `intensity` - Light intensity scalar
    pub fn new(position: Vec3, rotation: Vec3, scale: f32, intensity: f32) -> Self {
        Self {
            position,
            rotation,
            scale,
            intensity,
        }
    }

    /// Create a light at a position with no rotation and unit scale
    pub fn point(position: Vec3, intensity: f32) -> Self {
        Self::new(position, Vec3::zeros(), 1.0, intensity)
    }

    /// Light position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Light orientation as Euler angles in radians
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Light scale
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Light intensity
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Normalized light direction, or `None` for a light at the origin
    pub fn direction(&self) -> Option<Vec3> {
        self.position.try_normalize(f32::EPSILON)
    }
}

/// Lambert intensity for one vertex
///
/// `normal` is the world-space normal; it does not need to be normalized.
/// `light_direction` must already be normalized. A missing light direction or a
/// degenerate normal contributes no diffuse light, leaving only the ambient term.
pub fn lambert_intensity(normal: &Vec3, light_direction: Option<&Vec3>, ambient_intensity: f32) -> f32 {
    let diffuse = match (normal.try_normalize(f32::EPSILON), light_direction) {
        (Some(n), Some(l)) => n.dot(l).max(0.0),
        _ => 0.0,
    };
    (diffuse + ambient_intensity).clamp(0.0, 1.0)
}

/// Shade a base color for one vertex
pub fn shade(base: Color, normal: &Vec3, light_direction: Option<&Vec3>, ambient_intensity: f32) -> Color {
    base.scaled(lambert_intensity(normal, light_direction, ambient_intensity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perpendicular_normal_gives_ambient() {
        let light = Light::point(Vec3::new(0.0, 10.0, 0.0), 1.0);
        let direction = light.direction().unwrap();
        let normal = Vec3::new(1.0, 0.0, 0.0);

        assert_eq!(lambert_intensity(&normal, Some(&direction), 0.25), 0.25);
        assert_eq!(lambert_intensity(&normal, Some(&direction), 1.5), 1.0);
        assert_eq!(lambert_intensity(&normal, Some(&direction), -0.5), 0.0);
    }

    #[test]
    fn test_facing_light_saturates() {
        let direction = Vec3::new(0.0, 0.0, 1.0);
        let normal = Vec3::new(0.0, 0.0, 3.0); // not unit length on purpose
        assert_relative_eq!(lambert_intensity(&normal, Some(&direction), 0.2), 1.0);
    }

    #[test]
    fn test_back_lit_normal_clamped_to_ambient() {
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let normal = Vec3::new(0.0, -1.0, 0.0);
        assert_relative_eq!(lambert_intensity(&normal, Some(&direction), 0.1), 0.1);
    }

    #[test]
    fn test_oblique_light() {
        let light = Light::point(Vec3::new(1.0, 1.0, 0.0), 1.0);
        let direction = light.direction().unwrap();
        let normal = Vec3::new(0.0, 1.0, 0.0);
        assert_relative_eq!(
            lambert_intensity(&normal, Some(&direction), 0.0),
            std::f32::consts::FRAC_1_SQRT_2,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_light_at_origin_has_no_direction() {
        let light = Light::point(Vec3::zeros(), 1.0);
        assert!(light.direction().is_none());
        assert_relative_eq!(lambert_intensity(&Vec3::y(), None, 0.3), 0.3);
    }

    #[test]
    fn test_shade_scales_channels() {
        let direction = Vec3::new(0.0, 1.0, 0.0);
        let shaded = shade(Color::rgb(200, 100, 50), &Vec3::new(1.0, 0.0, 0.0), Some(&direction), 0.5);
        assert_eq!(shaded, Color::rgb(100, 50, 25));
    }
}
