//! Core primitive types for rendering
//!
//! This module contains fundamental data structures used throughout
//! the rendering pipeline: colors, the camera, and per-node mesh buffers.

pub mod color;
pub mod camera;
pub mod mesh;

// Re-export commonly used types
pub use color::Color;
pub use camera::Camera;
pub use mesh::{MeshBuffers, MeshError};
