//! # Core Module
//!
//! Shared configuration types used by the renderer and the applications
//! built on top of it.

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    EngineConfig,
    ViewportConfig,
    CameraConfig,
    LightingConfig,
    AssetConfig,
    Config,
    ConfigError,
    ConfigFormat,
};
