//! # Rendering System
//!
//! The per-triangle half of the software pipeline and the sink it feeds.
//!
//! ## Architecture
//!
//! - **Primitives**: Colors, the perspective camera, and per-node mesh buffers
//! - **Lighting**: Point light descriptor and the per-vertex Lambert term
//! - **Screen**: NDC to integer screen-space mapping
//! - **Visibility**: Back-face test on projected triangles
//! - **Clipping**: Four-pass Sutherland-Hodgman sweep against the viewport
//! - **Rasterizer**: Sink trait and the in-memory z-buffered framebuffer

// Core primitives
pub mod primitives;

pub mod lighting;
pub mod screen;
pub mod visibility;
pub mod clipping;
pub mod rasterizer;

// Core rendering types that applications need
pub use primitives::{Camera, Color, MeshBuffers, MeshError};
pub use primitives::mesh::MeshData;
pub use lighting::Light;
pub use screen::ScreenMapping;
pub use clipping::{ClipVertex, HalfPlane, ViewportClipper};
pub use rasterizer::{FrameBuffer, Rasterizer};
