//! # Soft Render
//!
//! A software 3D scene renderer. A tree of meshes and a point light are
//! transformed, lit per vertex, back-face culled, clipped to the viewport and
//! handed to a z-buffered polygon fill.
//!
//! ## Features
//!
//! - **Scene Graph**: Nodes own their children and pass their world transform down
//! - **Lambert Lighting**: Per-vertex diffuse term from the first light plus ambient
//! - **Viewport Clipping**: Sutherland-Hodgman sweep against the four screen edges
//! - **Pluggable Output**: Any [`Rasterizer`](render::Rasterizer); an in-memory framebuffer is included
//! - **Asset Loading**: OBJ meshes and XML scene descriptions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use soft_render::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::default();
//!     let mut framebuffer = FrameBuffer::new(config.viewport.width, config.viewport.height);
//!     let mut view = View::from_scene_file(config, "resources/demo.xml")?;
//!
//!     view.update();
//!     view.paint(&mut framebuffer);
//!     framebuffer.save("frame.png")?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod assets;
pub mod render;
pub mod scene;

/// Common imports for renderer users
pub mod prelude {
    pub use crate::{
        assets::{ObjError, ObjLoader, SceneDescription, SceneError},
        core::{ApplicationConfig, Config, ConfigError},
        foundation::math::{Mat4, Vec3, Vec4},
        render::{Camera, Color, FrameBuffer, Light, MeshBuffers, Rasterizer, ScreenMapping},
        scene::{FrameContext, FrameStats, SceneNode, View, ViewError},
    };
}
