//! Per-frame inputs and outputs of the scene pipeline

use crate::foundation::math::{Mat4, Vec3};
use std::ops::AddAssign;

/// Lighting and projection environment for one update pass
///
/// Built by the [`View`](super::View) once per frame and passed down the tree
/// by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContext {
    /// Camera projection for this frame
    pub projection: Mat4,
    /// Normalized direction of the active light, `None` when there is no usable light
    pub light_direction: Option<Vec3>,
    /// Ambient term added to every vertex
    pub ambient_intensity: f32,
}

impl FrameContext {
    /// Create a frame context
    pub fn new(projection: Mat4, light_direction: Option<Vec3>, ambient_intensity: f32) -> Self {
        Self {
            projection,
            light_direction,
            ambient_intensity,
        }
    }
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new(Mat4::identity(), None, 0.0)
    }
}

/// Triangle counts gathered during one paint pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Polygons handed to the rasterizer
    pub submitted: usize,
    /// Triangles rejected by the back-face test
    pub culled: usize,
    /// Front faces that fell entirely outside the viewport
    pub clipped_away: usize,
    /// Front faces that needed clipping and survived it
    pub clipped_partially: usize,
}

impl FrameStats {
    /// Total triangles considered
    pub fn total(&self) -> usize {
        self.submitted + self.culled + self.clipped_away
    }
}

impl AddAssign for FrameStats {
    fn add_assign(&mut self, other: Self) {
        self.submitted += other.submitted;
        self.culled += other.culled;
        self.clipped_away += other.clipped_away;
        self.clipped_partially += other.clipped_partially;
    }
}
