//! Mapping from normalized device coordinates to integer screen coordinates

use crate::foundation::math::{Mat4, Mat4Ext, ScreenPoint, Vec3, Vec4};

/// Scale applied to NDC depth so the depth buffer sees a wide integer range
pub const DEPTH_SCALE: f32 = 100_000_000.0;

/// Viewport transform: `translation(w/2, h/2, 0) * scaling(w/2, h/2, DEPTH_SCALE)`
///
/// NDC x and y in [-1, 1] land on [0, width] and [0, height] with y pointing up;
/// depth in [-1, 1] spreads over [-DEPTH_SCALE, DEPTH_SCALE].
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenMapping {
    width: u32,
    height: u32,
    transform: Mat4,
}

impl ScreenMapping {
    /// Build the mapping for the current viewport size
    pub fn for_viewport(width: u32, height: u32) -> Self {
        let half_width = width as f32 / 2.0;
        let half_height = height as f32 / 2.0;

        let scaling = Mat4::scaling(half_width, half_height, DEPTH_SCALE);
        let translation = Mat4::translation(&Vec3::new(half_width, half_height, 0.0));

        Self {
            width,
            height,
            transform: translation * scaling,
        }
    }

    /// Viewport width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Viewport height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The composed viewport matrix
    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    /// Map an NDC vertex (w = 1) to floating-point screen space
    pub fn map(&self, ndc: &Vec4) -> Vec4 {
        self.transform * ndc
    }

    /// Truncate a floating-point screen vertex to integer screen coordinates
    pub fn to_screen_point(screen: &Vec4) -> ScreenPoint {
        ScreenPoint::new(screen.x as i32, screen.y as i32, screen.z as i32, 1)
    }
}
