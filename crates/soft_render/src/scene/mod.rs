//! Scene graph and frame orchestration
//!
//! ## Architecture
//!
//! ```text
//! View (lights, roots, camera)
//!      ↓ update: FrameContext
//! SceneNode tree (parent world → child world)
//!      ↓ paint: ScreenMapping
//! Rasterizer
//! ```
//!
//! Every frame runs one update pass over all roots, then one paint pass. A
//! node finalizes its own world transform before handing it to its children.

mod frame;
mod node;
mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use frame::{FrameContext, FrameStats};
pub use node::SceneNode;
pub use view::{View, ViewError};
