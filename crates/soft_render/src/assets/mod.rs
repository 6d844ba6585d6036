//! Asset loading
//!
//! Readers for the two file formats a scene is built from: triangulated OBJ
//! meshes and the XML scene description that places them.

pub mod obj_loader;
pub mod scene_loader;

pub use obj_loader::{ObjLoader, ObjError};
pub use scene_loader::{
    SceneDescription, MeshDescription, LightDescription, SceneError,
};
