//! View - frame orchestrator
//!
//! Owns the lights, the root nodes and the camera. One frame is one
//! [`View::update`] followed by one [`View::paint`]:
//!
//! 1. `update` builds a [`FrameContext`] from the camera and the first light and
//!    pushes it through every root (each root recurses into its children).
//! 2. `paint` clears the rasterizer, maps every node to the rasterizer's current
//!    viewport, submits the surviving triangles and presents.

use crate::assets::scene_loader::{SceneDescription, SceneError};
use crate::config::{Config, ConfigError};
use crate::core::config::ApplicationConfig;
use crate::render::lighting::Light;
use crate::render::primitives::Camera;
use crate::render::rasterizer::Rasterizer;
use crate::render::screen::ScreenMapping;
use crate::scene::frame::{FrameContext, FrameStats};
use crate::scene::node::SceneNode;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while assembling a view
#[derive(Error, Debug)]
pub enum ViewError {
    /// The scene description could not be loaded
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// The configuration is unusable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Scene orchestrator
#[derive(Debug, Clone)]
pub struct View {
    config: ApplicationConfig,
    camera: Camera,
    width: u32,
    height: u32,
    lights: Vec<Light>,
    roots: Vec<SceneNode>,
    frame: u64,
}

impl View {
    /// Create an empty view from a validated configuration
    pub fn new(config: ApplicationConfig) -> Result<Self, ViewError> {
        config.validate()?;

        let camera = Camera::from_config(&config.camera, config.viewport.aspect());
        Ok(Self {
            width: config.viewport.width,
            height: config.viewport.height,
            camera,
            config,
            lights: Vec::new(),
            roots: Vec::new(),
            frame: 0,
        })
    }

    /// Build a view from a parsed scene description
    ///
    /// Model paths are resolved against `base_dir`. Mesh load failures do not
    /// fail the build; the affected nodes carry a diagnostic instead.
    pub fn from_description(
        config: ApplicationConfig,
        description: &SceneDescription,
        base_dir: &Path,
    ) -> Result<Self, ViewError> {
        let mut view = Self::new(config)?;

        for mesh in &description.meshes {
            view.add_model(SceneNode::from_description(mesh, base_dir)?);
        }
        for light in &description.lights {
            view.add_light(light.to_light());
        }

        let failed = view.count_failed_nodes();
        log::info!(
            "Scene built: {} root node(s), {} light(s), {} node(s) without geometry",
            view.roots.len(),
            view.lights.len(),
            failed
        );
        if view.primary_light().and_then(Light::direction).is_none() {
            log::warn!("Scene has no usable light; only ambient lighting applies");
        }

        Ok(view)
    }

    /// Build a view from scene text
    pub fn from_scene_str(config: ApplicationConfig, text: &str, base_dir: &Path) -> Result<Self, ViewError> {
        let description = SceneDescription::parse(text)?;
        Self::from_description(config, &description, base_dir)
    }

    /// Load a scene file
    ///
    /// Models resolve against the configured resources directory, or the scene
    /// file's own directory when none is configured.
    pub fn from_scene_file<P: AsRef<Path>>(config: ApplicationConfig, path: P) -> Result<Self, ViewError> {
        let path = path.as_ref();
        let base_dir = match &config.assets.resources_dir {
            Some(dir) => PathBuf::from(dir),
            None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
        };

        log::info!("Loading scene {} (models from {})", path.display(), base_dir.display());
        let description = SceneDescription::load(path)?;
        Self::from_description(config, &description, &base_dir)
    }

    /// Load the configuration file then the scene file
    pub fn from_files<P: AsRef<Path>>(config_path: &str, scene_path: P) -> Result<Self, ViewError> {
        let config = ApplicationConfig::load_from_file(config_path)?;
        Self::from_scene_file(config, scene_path)
    }

    /// Add a root node
    pub fn add_model(&mut self, node: SceneNode) {
        log::debug!("Added root node '{}'", node.name());
        self.roots.push(node);
    }

    /// Add a light; only the first light shades the scene
    pub fn add_light(&mut self, light: Light) {
        if !self.lights.is_empty() {
            log::debug!("Light {} added but only light 0 is used for shading", self.lights.len());
        }
        self.lights.push(light);
    }

    /// The light that shades the scene
    pub fn primary_light(&self) -> Option<&Light> {
        self.lights.first()
    }

    /// All lights in insertion order
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Root nodes in insertion order
    pub fn roots(&self) -> &[SceneNode] {
        &self.roots
    }

    /// Root lookup by name
    pub fn root(&self, name: &str) -> Option<&SceneNode> {
        self.roots.iter().find(|node| node.name() == name)
    }

    /// Camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Configuration the view was built with
    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    /// Viewport size used for the aspect ratio
    pub fn viewport_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Frames painted so far
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Change the viewport size; the next update picks up the new aspect ratio
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resize to {}x{}", width, height);
            return;
        }

        self.width = width;
        self.height = height;
        self.camera.set_aspect_ratio(width as f32 / height as f32);
        log::debug!("View resized to {}x{}", width, height);
    }

    /// Lighting and projection for the coming update
    pub fn frame_context(&self) -> FrameContext {
        FrameContext::new(
            self.camera.projection_matrix(),
            self.primary_light().and_then(Light::direction),
            self.config.lighting.ambient_intensity,
        )
    }

    /// Transform and light every node
    pub fn update(&mut self) {
        let context = self.frame_context();
        for root in &mut self.roots {
            root.update(&context);
        }
    }

    /// Submit the scene to `rasterizer` and present it
    pub fn paint<R: Rasterizer + ?Sized>(&mut self, rasterizer: &mut R) -> FrameStats {
        let (width, height) = rasterizer.viewport();
        if (width, height) != (self.width, self.height) {
            self.resize(width, height);
        }
        let mapping = ScreenMapping::for_viewport(width, height);

        rasterizer.clear();

        let mut stats = FrameStats::default();
        for root in &mut self.roots {
            stats += root.paint(&mapping, rasterizer);
        }

        rasterizer.present();
        self.frame += 1;

        log::debug!(
            "Frame {}: {} submitted, {} culled, {} clipped away, {} clipped partially",
            self.frame,
            stats.submitted,
            stats.culled,
            stats.clipped_away,
            stats.clipped_partially
        );
        stats
    }

    /// One full frame: update then paint
    pub fn render_frame<R: Rasterizer + ?Sized>(&mut self, rasterizer: &mut R) -> FrameStats {
        self.update();
        self.paint(rasterizer)
    }

    fn count_failed_nodes(&self) -> usize {
        fn count(node: &SceneNode) -> usize {
            usize::from(node.diagnostic().is_some()) + node.children().values().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }
}

impl Default for View {
    fn default() -> Self {
        let config = ApplicationConfig::default();
        Self {
            camera: Camera::from_config(&config.camera, config.viewport.aspect()),
            width: config.viewport.width,
            height: config.viewport.height,
            config,
            lights: Vec::new(),
            roots: Vec::new(),
            frame: 0,
        }
    }
}
