//! 2D viewport clipping
//!
//! Sutherland-Hodgman sweep of a convex polygon against the four viewport
//! half-planes, in screen space. Each half-plane is written as
//! `a * x + b * y + c >= 0`. For a `width` x `height` viewport the kept region is
//! `0 <= x <= width` and `0 <= y <= height`:
//!
//! | pass   | a  | b  | c      |
//! |--------|----|----|--------|
//! | left   |  1 |  0 | 0      |
//! | right  | -1 |  0 | width  |
//! | bottom |  0 |  1 | 0      |
//! | top    |  0 | -1 | height |

use crate::foundation::math::{Vec3, utils};
use crate::render::primitives::Color;

/// Screen-space polygon vertex with the attributes interpolated along clipped edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipVertex {
    /// Screen x, screen y and mapped depth
    pub position: Vec3,
    /// Shaded vertex color
    pub color: Color,
}

impl ClipVertex {
    /// Create a clip vertex
    pub fn new(position: Vec3, color: Color) -> Self {
        Self { position, color }
    }

    /// Vertex at parameter `t` along the edge from `self` to `other`
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: Vec3::new(
                utils::lerp(self.position.x, other.position.x, t),
                utils::lerp(self.position.y, other.position.y, t),
                utils::lerp(self.position.z, other.position.z, t),
            ),
            color: self.color.lerp(other.color, t),
        }
    }
}

/// Half-plane `a * x + b * y + c >= 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlane {
    /// X coefficient
    pub a: f32,
    /// Y coefficient
    pub b: f32,
    /// Constant term
    pub c: f32,
}

impl HalfPlane {
    /// Create a half-plane
    pub const fn new(a: f32, b: f32, c: f32) -> Self {
        Self { a, b, c }
    }

    /// Signed distance (scaled by the coefficient norm) of a point to the boundary
    pub fn signed_distance(&self, x: f32, y: f32) -> f32 {
        self.a * x + self.b * y + self.c
    }

    /// Whether the point lies on the kept side or on the boundary
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.signed_distance(x, y) >= 0.0
    }
}

/// The four viewport half-planes in sweep order: left, right, bottom, top
pub fn viewport_half_planes(width: f32, height: f32) -> [HalfPlane; 4] {
    [
        HalfPlane::new(1.0, 0.0, 0.0),
        HalfPlane::new(-1.0, 0.0, width),
        HalfPlane::new(0.0, 1.0, 0.0),
        HalfPlane::new(0.0, -1.0, height),
    ]
}

/// Clip a polygon against one half-plane
///
/// Walks the edges of `input` in order (closing the loop from the last vertex
/// back to the first), keeping inside vertices and inserting the interpolated
/// intersection wherever an edge straddles the boundary. The result replaces the
/// contents of `output`; its length is returned.
pub fn clip_with_line_2d(input: &[ClipVertex], plane: &HalfPlane, output: &mut Vec<ClipVertex>) -> usize {
    output.clear();

    let Some(last) = input.last() else {
        return 0;
    };

    let mut previous = last;
    let mut previous_distance = plane.signed_distance(previous.position.x, previous.position.y);

    for current in input {
        let current_distance = plane.signed_distance(current.position.x, current.position.y);
        // Only a strict sign change crosses; a vertex on the boundary is kept as is
        let crosses = (previous_distance > 0.0 && current_distance < 0.0)
            || (previous_distance < 0.0 && current_distance > 0.0);

        if crosses {
            let t = previous_distance / (previous_distance - current_distance);
            output.push(previous.lerp(current, t));
        }
        if current_distance >= 0.0 {
            output.push(*current);
        }

        previous = current;
        previous_distance = current_distance;
    }

    output.len()
}

/// Reusable four-pass viewport clipper
///
/// Owns its scratch buffers so clipping a triangle per frame does not allocate
/// once the buffers have grown to their working size.
#[derive(Debug, Clone)]
pub struct ViewportClipper {
    planes: [HalfPlane; 4],
    front: Vec<ClipVertex>,
    back: Vec<ClipVertex>,
}

impl ViewportClipper {
    /// Create a clipper for a `width` x `height` viewport
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            planes: viewport_half_planes(width, height),
            front: Vec::with_capacity(8),
            back: Vec::with_capacity(8),
        }
    }

    /// The half-planes used by the sweep
    pub fn planes(&self) -> &[HalfPlane; 4] {
        &self.planes
    }

    /// Whether a screen point lies inside (or on the border of) the viewport
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.planes.iter().all(|plane| plane.contains(x, y))
    }

    /// Clip a convex polygon against the viewport
    ///
    /// Returns the clipped polygon. A result with fewer than three vertices means
    /// the polygon was clipped away; the sweep stops at the first pass that
    /// leaves fewer than three vertices.
    pub fn clip(&mut self, polygon: &[ClipVertex]) -> &[ClipVertex] {
        self.front.clear();
        self.front.extend_from_slice(polygon);

        for plane in &self.planes {
            let count = clip_with_line_2d(&self.front, plane, &mut self.back);
            std::mem::swap(&mut self.front, &mut self.back);
            if count < 3 {
                break;
            }
        }

        &self.front
    }
}
