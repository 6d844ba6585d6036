//! Back-face culling
//!
//! Triangles are tested in projected 2D space. With y pointing up on screen,
//! a positive signed area marks a front face; zero-area (edge-on) triangles
//! count as back faces and are culled with them.

use crate::foundation::math::Vec4;

/// Twice the signed area of the projected triangle `v0, v1, v2`
pub fn signed_area(v0: &Vec4, v1: &Vec4, v2: &Vec4) -> f32 {
    (v1.x - v0.x) * (v2.y - v0.y) - (v2.x - v0.x) * (v1.y - v0.y)
}

/// Whether the triangle whose corners are `triangle[0..3]` in `vertices` faces the viewer
///
/// # Panics
/// Panics if `triangle` has fewer than three indices or an index is out of bounds;
/// both are buffer invariants the caller maintains.
pub fn is_frontface(vertices: &[Vec4], triangle: &[usize]) -> bool {
    let v0 = &vertices[triangle[0]];
    let v1 = &vertices[triangle[1]];
    let v2 = &vertices[triangle[2]];

    signed_area(v0, v1, v2) > 0.0
}
