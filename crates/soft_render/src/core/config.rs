//! # Unified Configuration System
//!
//! All configuration structures of the renderer in one place. Every section is
//! serializable (TOML or RON through the [`Config`] trait), has defaults that
//! match the classic z-buffer demo setup, and can be validated before use.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: Logging
//! - **Viewport Config**: Framebuffer dimensions
//! - **Camera Config**: Projection parameters
//! - **Lighting Config**: Ambient term shared by every node
//! - **Asset Config**: Where mesh files are resolved from

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError, ConfigFormat};

/// # Engine Configuration
///
/// Core behavior that is not tied to a single subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Viewport Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Framebuffer width in pixels
    pub width: u32,
    /// Framebuffer height in pixels
    pub height: u32,
    /// RGBA color the framebuffer is cleared to every frame
    pub clear_color: [u8; 4],
}

impl ViewportConfig {
    /// Create a viewport configuration with the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clear_color: [0, 0, 255, 255],
        }
    }

    /// Set the clear color
    pub fn with_clear_color(mut self, color: [u8; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Aspect ratio (width / height)
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!("Viewport must not be empty: {}x{}", self.width, self.height));
        }
        Ok(())
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// # Camera Configuration
///
/// Perspective projection parameters, applied once per frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance to the near clipping plane
    pub near: f32,
    /// Distance to the far clipping plane
    pub far: f32,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
}

impl CameraConfig {
    /// Create a camera configuration
    pub fn new(near: f32, far: f32, fov_degrees: f32) -> Self {
        Self { near, far, fov_degrees }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.near <= 0.0 {
            return Err(format!("Near plane must be positive, got {}", self.near));
        }
        if self.far <= self.near {
            return Err(format!("Far plane ({}) must be beyond near plane ({})", self.far, self.near));
        }
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(format!("Field of view must be in (0, 180) degrees, got {}", self.fov_degrees));
        }
        Ok(())
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new(0.3, 1000.0, 90.0)
    }
}

/// # Lighting Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Ambient intensity added to every vertex's diffuse term
    pub ambient_intensity: f32,
}

impl LightingConfig {
    /// Create a lighting configuration
    pub fn new(ambient_intensity: f32) -> Self {
        Self { ambient_intensity }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.ambient_intensity.is_finite() || self.ambient_intensity < 0.0 {
            return Err(format!("Ambient intensity must be a non-negative number, got {}", self.ambient_intensity));
        }
        Ok(())
    }
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self::new(0.2)
    }
}

/// # Asset Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory mesh references are resolved against; `None` means next to the scene file
    pub resources_dir: Option<String>,
}

impl AssetConfig {
    /// Create a new asset configuration
    pub fn new() -> Self {
        Self { resources_dir: None }
    }

    /// Set the resources directory
    pub fn with_resources_dir(mut self, dir: impl Into<String>) -> Self {
        self.resources_dir = Some(dir.into());
        self
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all renderer subsystems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Viewport configuration
    pub viewport: ViewportConfig,
    /// Camera configuration
    pub camera: CameraConfig,
    /// Lighting configuration
    pub lighting: LightingConfig,
    /// Asset system configuration
    pub assets: AssetConfig,
}

impl ApplicationConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewport.validate().map_err(ConfigError::Invalid)?;
        self.camera.validate().map_err(ConfigError::Invalid)?;
        self.lighting.validate().map_err(ConfigError::Invalid)?;
        Ok(())
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ApplicationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.viewport.width, 800);
        assert_eq!(config.viewport.height, 600);
        assert!((config.camera.fov_degrees - 90.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let text = "[viewport]\nwidth = 320\nheight = 240\n\n[lighting]\nambient_intensity = 0.5\n";
        let config = ApplicationConfig::parse(text, ConfigFormat::Toml).unwrap();

        assert_eq!(config.viewport.width, 320);
        assert_eq!(config.viewport.height, 240);
        assert!((config.lighting.ambient_intensity - 0.5).abs() < f32::EPSILON);
        assert!((config.camera.near - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.engine.log_level, "info");
    }

    #[test]
    fn test_defaults_survive_toml_serialization() {
        let text = ApplicationConfig::default().to_string_as(ConfigFormat::Toml).unwrap();
        let config = ApplicationConfig::parse(&text, ConfigFormat::Toml).unwrap();
        assert_eq!(config.viewport.clear_color, [0, 0, 255, 255]);
        assert!(config.assets.resources_dir.is_none());
    }

    #[test]
    fn test_builder_setters() {
        let engine = EngineConfig::new().with_log_level("warn");
        let assets = AssetConfig::new().with_resources_dir("assets/meshes");

        assert_eq!(engine.log_level, "warn");
        assert_eq!(assets.resources_dir.as_deref(), Some("assets/meshes"));
    }

    #[test]
    fn test_ron_format() {
        let text = "(camera: (near: 1.0, far: 50.0, fov_degrees: 60.0))";
        let config = ApplicationConfig::parse(text, ConfigFormat::Ron).unwrap();
        assert!((config.camera.far - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = ApplicationConfig::load_from_file("viewer.ini");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validation_rejects_inverted_planes() {
        let mut config = ApplicationConfig::default();
        config.camera = CameraConfig::new(10.0, 1.0, 90.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let path = std::env::temp_dir().join(format!("soft_render_config_{}.toml", std::process::id()));

        let config = ApplicationConfig {
            viewport: ViewportConfig::new(640, 480),
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        let reloaded = ApplicationConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(reloaded.viewport.width, 640);
        assert_eq!(reloaded.viewport.height, 480);
    }
}
