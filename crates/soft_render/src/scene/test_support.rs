//! Rasterizer double that records what the pipeline submits

use crate::foundation::math::ScreenPoint;
use crate::render::primitives::Color;
use crate::render::rasterizer::Rasterizer;

/// One recorded fill call, with the indexed points resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub color: Color,
    pub points: Vec<ScreenPoint>,
}

/// Calls received during a frame, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Clear,
    SetColor,
    Fill,
    Present,
}

pub struct RecordingRasterizer {
    pub width: u32,
    pub height: u32,
    pub calls: Vec<Call>,
    pub fills: Vec<Fill>,
    color: Color,
}

impl RecordingRasterizer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
            fills: Vec::new(),
            color: Color::BLACK,
        }
    }
}

impl Rasterizer for RecordingRasterizer {
    fn viewport(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.calls.push(Call::Clear);
        self.fills.clear();
    }

    fn set_color(&mut self, color: Color) {
        self.calls.push(Call::SetColor);
        self.color = color;
    }

    fn fill_convex_polygon_z_buffer(&mut self, points: &[ScreenPoint], indices: &[usize]) {
        self.calls.push(Call::Fill);
        self.fills.push(Fill {
            color: self.color,
            points: indices.iter().map(|&i| points[i]).collect(),
        });
    }

    fn present(&mut self) {
        self.calls.push(Call::Present);
    }
}
