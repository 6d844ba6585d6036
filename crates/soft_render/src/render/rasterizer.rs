//! Rasterizer sink and the software framebuffer implementing it
//!
//! The scene pipeline only talks to the [`Rasterizer`] trait: one `clear` per
//! frame, a `set_color` + `fill_convex_polygon_z_buffer` pair per accepted
//! polygon, and a final `present`. [`FrameBuffer`] is the in-memory
//! implementation used by the viewer and the tests.

use crate::foundation::math::ScreenPoint;
use crate::render::primitives::Color;
use std::path::Path;

/// Destination of the per-frame polygon stream
pub trait Rasterizer {
    /// Current viewport size as `(width, height)`
    fn viewport(&self) -> (u32, u32);

    /// Reset color and depth for a new frame
    fn clear(&mut self);

    /// Color used by subsequent fills
    fn set_color(&mut self, color: Color);

    /// Depth-buffered fill of the convex polygon `points[indices[0]], points[indices[1]], ...`
    fn fill_convex_polygon_z_buffer(&mut self, points: &[ScreenPoint], indices: &[usize]);

    /// Hand the finished frame to its consumer
    fn present(&mut self);
}

/// RGBA8 color buffer with a 32-bit integer depth buffer
///
/// Row 0 is the bottom of the image (y grows upward, matching screen space).
/// Smaller depth values are closer to the viewer.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    clear_color: Color,
    current_color: Color,
    color: Vec<Color>,
    depth: Vec<i32>,
    presented_frames: u64,
}

impl FrameBuffer {
    /// Create a cleared framebuffer
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            clear_color: Color::BLACK,
            current_color: Color::WHITE,
            color: vec![Color::BLACK; len],
            depth: vec![i32::MAX; len],
            presented_frames: 0,
        }
    }

    /// Set the color `clear` fills the buffer with
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self.color.fill(color);
        self
    }

    /// Reallocate for a new viewport size; contents are cleared
    pub fn resize(&mut self, width: u32, height: u32) {
        let len = (width as usize) * (height as usize);
        self.width = width;
        self.height = height;
        self.color = vec![self.clear_color; len];
        self.depth = vec![i32::MAX; len];
        log::debug!("Framebuffer resized to {}x{}", width, height);
    }

    /// Number of frames presented so far
    pub fn presented_frames(&self) -> u64 {
        self.presented_frames
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y as usize) * (self.width as usize) + x as usize)
    }

    /// Color at pixel `(x, y)`, with `y` counted from the bottom
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.color[i])
    }

    /// Depth at pixel `(x, y)`, with `y` counted from the bottom
    pub fn depth(&self, x: u32, y: u32) -> Option<i32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Copy the color buffer into an image with row 0 at the top
    pub fn to_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let row = self.height - 1 - y;
            image::Rgba(self.color[(row as usize) * (self.width as usize) + x as usize].to_array())
        })
    }

    /// Save the color buffer as an image file, format picked from the extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.to_image().save(path)
    }

    fn fill_triangle(&mut self, p0: &ScreenPoint, p1: &ScreenPoint, p2: &ScreenPoint) {
        let area = edge(p0, p1, p2.x, p2.y);
        if area == 0 || self.width == 0 || self.height == 0 {
            return;
        }

        let max_x = i64::from(self.width) - 1;
        let max_y = i64::from(self.height) - 1;
        let min_x = i64::from(p0.x.min(p1.x).min(p2.x)).max(0);
        let min_y = i64::from(p0.y.min(p1.y).min(p2.y)).max(0);
        let end_x = i64::from(p0.x.max(p1.x).max(p2.x)).min(max_x);
        let end_y = i64::from(p0.y.max(p1.y).max(p2.y)).min(max_y);

        let area = area as f64;
        for y in min_y..=end_y {
            for x in min_x..=end_x {
                let w0 = edge(p1, p2, x, y);
                let w1 = edge(p2, p0, x, y);
                let w2 = edge(p0, p1, x, y);

                // Inside when every edge function agrees with the triangle's winding
                let inside = if area > 0.0 {
                    w0 >= 0 && w1 >= 0 && w2 >= 0
                } else {
                    w0 <= 0 && w1 <= 0 && w2 <= 0
                };
                if !inside {
                    continue;
                }

                let z = (w0 as f64 * f64::from(p0.z) + w1 as f64 * f64::from(p1.z) + w2 as f64 * f64::from(p2.z)) / area;
                let z = z.round() as i32;

                let index = (y as usize) * (self.width as usize) + x as usize;
                if z < self.depth[index] {
                    self.depth[index] = z;
                    self.color[index] = self.current_color;
                }
            }
        }
    }
}

/// Edge function of point `(x, y)` against the directed edge `a -> b`
fn edge(a: &ScreenPoint, b: &ScreenPoint, x: impl Into<i64>, y: impl Into<i64>) -> i64 {
    let (ax, ay) = (i64::from(a.x), i64::from(a.y));
    let (bx, by) = (i64::from(b.x), i64::from(b.y));
    (bx - ax) * (y.into() - ay) - (by - ay) * (x.into() - ax)
}

impl Rasterizer for FrameBuffer {
    fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.color.fill(self.clear_color);
        self.depth.fill(i32::MAX);
    }

    fn set_color(&mut self, color: Color) {
        self.current_color = color;
    }

    fn fill_convex_polygon_z_buffer(&mut self, points: &[ScreenPoint], indices: &[usize]) {
        if indices.len() < 3 {
            return;
        }

        // Fan triangulation is exact for convex polygons
        let first = points[indices[0]];
        for pair in indices[1..].windows(2) {
            let (second, third) = (points[pair[0]], points[pair[1]]);
            self.fill_triangle(&first, &second, &third);
        }
    }

    fn present(&mut self) {
        self.presented_frames += 1;
        log::trace!("Presented frame {}", self.presented_frames);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32, z: i32) -> ScreenPoint {
        ScreenPoint::new(x, y, z, 1)
    }

    #[test]
    fn test_fill_covers_interior_only() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.set_color(Color::rgb(255, 0, 0));
        fb.fill_convex_polygon_z_buffer(&[p(0, 0, 0), p(8, 0, 0), p(0, 8, 0)], &[0, 1, 2]);

        assert_eq!(fb.pixel(1, 1), Some(Color::rgb(255, 0, 0)));
        assert_eq!(fb.pixel(8, 8), Some(Color::BLACK));
    }

    #[test]
    fn test_fill_accepts_either_winding() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.set_color(Color::WHITE);
        fb.fill_convex_polygon_z_buffer(&[p(0, 0, 0), p(0, 8, 0), p(8, 0, 0)], &[0, 1, 2]);
        assert_eq!(fb.pixel(2, 2), Some(Color::WHITE));
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        let mut fb = FrameBuffer::new(10, 10);
        let square = [p(0, 0, 0), p(9, 0, 0), p(9, 9, 0), p(0, 9, 0)];
        let far: Vec<_> = square.iter().map(|v| p(v.x, v.y, 500)).collect();
        let near: Vec<_> = square.iter().map(|v| p(v.x, v.y, -500)).collect();

        fb.set_color(Color::rgb(0, 255, 0));
        fb.fill_convex_polygon_z_buffer(&near, &[0, 1, 2, 3]);
        fb.set_color(Color::rgb(255, 0, 0));
        fb.fill_convex_polygon_z_buffer(&far, &[0, 1, 2, 3]);

        assert_eq!(fb.pixel(5, 5), Some(Color::rgb(0, 255, 0)));
        assert_eq!(fb.depth(5, 5), Some(-500));
    }

    #[test]
    fn test_offscreen_points_are_clamped() {
        let mut fb = FrameBuffer::new(4, 4);
        fb.set_color(Color::WHITE);
        fb.fill_convex_polygon_z_buffer(&[p(-100, -100, 0), p(100, -100, 0), p(0, 100, 0)], &[0, 1, 2]);
        assert_eq!(fb.pixel(2, 1), Some(Color::WHITE));
    }

    #[test]
    fn test_clear_resets_depth_and_color() {
        let mut fb = FrameBuffer::new(4, 4).with_clear_color(Color::rgb(0, 0, 255));
        fb.fill_convex_polygon_z_buffer(&[p(0, 0, 1), p(3, 0, 1), p(0, 3, 1)], &[0, 1, 2]);
        fb.clear();

        assert_eq!(fb.pixel(0, 0), Some(Color::rgb(0, 0, 255)));
        assert_eq!(fb.depth(0, 0), Some(i32::MAX));
    }

    #[test]
    fn test_image_export_flips_rows() {
        let mut fb = FrameBuffer::new(2, 2);
        // Bottom-left pixel
        fb.color[0] = Color::WHITE;

        let image = fb.to_image();
        assert_eq!(image.get_pixel(0, 1).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_present_counts_frames() {
        let mut fb = FrameBuffer::new(1, 1);
        fb.present();
        fb.present();
        assert_eq!(fb.presented_frames(), 2);
    }
}
