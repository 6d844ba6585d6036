//! # Perspective Camera
//!
//! Holds the projection parameters the view supplies to every node once per
//! frame. The camera sits at the origin looking down -Z; nodes place
//! themselves in front of it through their own transforms.

use crate::core::config::CameraConfig;
use crate::foundation::math::{Mat4, Mat4Ext, utils};

/// Perspective camera
///
/// Only the projection is modelled. The aspect ratio follows the viewport and
/// is refreshed by the view whenever the viewport is resized.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Field of view angle in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera
    ///
    /// # Arguments
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Build a camera from configuration and the current viewport aspect ratio
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self::perspective(config.fov_degrees, aspect, config.near, config.far)
    }

    /// Update camera aspect ratio for viewport changes
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
        log::trace!("Camera aspect ratio updated to: {}", aspect);
    }

    /// Generate the projection matrix
    ///
    /// Recomputed on every call; the view asks for it once per frame.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), 800.0 / 600.0)
    }
}
