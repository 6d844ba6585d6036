//! Scene node: one mesh with a local pose and an owned subtree
//!
//! A node is built once from mesh buffers and an initial pose. Every frame the
//! owner calls [`SceneNode::update`] on each root, which composes
//!
//! ```text
//! world = parent_world * T(position) * Rx * Ry * Rz * S(scale)
//! clip  = projection * world
//! ```
//!
//! transforms and lights the vertices, then recurses into the children with
//! the freshly computed `world` as their parent input. [`SceneNode::paint`]
//! maps the result to the screen, culls, clips and submits triangles.

use crate::assets::obj_loader::ObjLoader;
use crate::assets::scene_loader::{MeshDescription, SceneError};
use crate::foundation::math::{Mat4, Mat4Ext, ScreenPoint, Vec3, Vec4, utils};
use crate::render::clipping::{ClipVertex, ViewportClipper};
use crate::render::lighting;
use crate::render::primitives::{Color, MeshBuffers};
use crate::render::rasterizer::Rasterizer;
use crate::render::screen::ScreenMapping;
use crate::render::visibility;
use crate::scene::frame::{FrameContext, FrameStats};
use std::collections::BTreeMap;
use std::path::Path;

/// A mesh instance in the scene hierarchy
#[derive(Debug, Clone)]
pub struct SceneNode {
    name: String,

    // Local pose; angles in radians
    position: Vec3,
    rotation: Vec3,
    rotation_speed: f32,
    scale: f32,

    mesh: MeshBuffers,

    world: Mat4,
    clip_transform: Mat4,

    // Per-frame buffers, sized once to `mesh.len()`
    ndc_vertices: Vec<Vec4>,
    world_normals: Vec<Vec3>,
    shaded_colors: Vec<Color>,
    screen_vertices: Vec<Vec4>,
    display_vertices: Vec<ScreenPoint>,

    clipper: ViewportClipper,
    clipper_size: (u32, u32),
    clipped_points: Vec<ScreenPoint>,
    clipped_indices: Vec<usize>,

    children: BTreeMap<String, SceneNode>,
    diagnostic: Option<String>,
}

impl SceneNode {
    /// Create a node at the origin with identity rotation and unit scale
    pub fn new(name: impl Into<String>, mesh: MeshBuffers) -> Self {
        let count = mesh.len();
        Self {
            name: name.into(),
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            rotation_speed: 0.0,
            scale: 1.0,
            mesh,
            world: Mat4::identity(),
            clip_transform: Mat4::identity(),
            ndc_vertices: vec![Vec4::zeros(); count],
            world_normals: vec![Vec3::zeros(); count],
            shaded_colors: vec![Color::BLACK; count],
            screen_vertices: vec![Vec4::zeros(); count],
            display_vertices: vec![ScreenPoint::zeros(); count],
            clipper: ViewportClipper::new(0.0, 0.0),
            clipper_size: (0, 0),
            clipped_points: Vec::with_capacity(8),
            clipped_indices: Vec::with_capacity(8),
            children: BTreeMap::new(),
            diagnostic: None,
        }
    }

    /// Create a node whose geometry could not be loaded
    ///
    /// The node renders nothing but still passes its transform to its children.
    pub fn failed(name: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        let mut node = Self::new(name, MeshBuffers::empty());
        node.diagnostic = Some(diagnostic.into());
        node
    }

    /// Load an OBJ mesh into a new node
    ///
    /// A load failure never aborts: the node comes back empty with its
    /// diagnostic set to the loader's error message.
    pub fn from_obj<P: AsRef<Path>>(name: impl Into<String>, path: P, color: Color) -> Self {
        let name = name.into();
        let path = path.as_ref();

        match ObjLoader::load_mesh_buffers(path, color) {
            Ok(mesh) => {
                log::debug!("Node '{}': {} triangles from {}", name, mesh.triangle_count(), path.display());
                Self::new(name, mesh)
            }
            Err(e) => {
                log::warn!("Node '{}' renders empty: {}", name, e);
                Self::failed(name, e.to_string())
            }
        }
    }

    /// Build a node and its subtree from a parsed scene description
    ///
    /// Relative model paths are resolved against `base_dir`.
    pub fn from_description(description: &MeshDescription, base_dir: &Path) -> Result<Self, SceneError> {
        let mut node = Self::from_obj(&description.name, base_dir.join(&description.model), description.color)
            .with_position(description.position)
            .with_rotation(description.rotation.map(utils::deg_to_rad))
            .with_scale(description.scale)
            .with_rotation_speed(utils::deg_to_rad(description.rotation_speed));

        for child in &description.children {
            node.add_child(Self::from_description(child, base_dir)?)?;
        }

        Ok(node)
    }

    /// Set the local position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the local rotation (radians around X, Y and Z)
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the Y-axis spin added on every update (radians)
    pub fn with_rotation_speed(mut self, speed: f32) -> Self {
        self.rotation_speed = speed;
        self
    }

    /// Attach an owned child; names must be unique among siblings
    pub fn add_child(&mut self, child: SceneNode) -> Result<(), SceneError> {
        if self.children.contains_key(&child.name) {
            return Err(SceneError::DuplicateName(child.name));
        }
        self.children.insert(child.name.clone(), child);
        Ok(())
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mesh load failure message, if any
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local rotation in radians
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Uniform scale
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Y-axis spin per update in radians
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    /// Mesh buffers
    pub fn mesh(&self) -> &MeshBuffers {
        &self.mesh
    }

    /// Children keyed by name
    pub fn children(&self) -> &BTreeMap<String, SceneNode> {
        &self.children
    }

    /// Child lookup by name
    pub fn child(&self, name: &str) -> Option<&SceneNode> {
        self.children.get(name)
    }

    /// Mutable child lookup by name
    pub fn child_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        self.children.get_mut(name)
    }

    /// World transform from the last update
    pub fn world_transform(&self) -> &Mat4 {
        &self.world
    }

    /// Transform applied to normals: the world transform, without projection
    pub fn normals_transform(&self) -> &Mat4 {
        &self.world
    }

    /// Projection composed with the world transform, from the last update
    pub fn clip_transform(&self) -> &Mat4 {
        &self.clip_transform
    }

    /// Vertices after the perspective divide (w == 1)
    pub fn ndc_vertices(&self) -> &[Vec4] {
        &self.ndc_vertices
    }

    /// Lit per-vertex colors from the last update
    pub fn shaded_colors(&self) -> &[Color] {
        &self.shaded_colors
    }

    /// Floating-point screen vertices from the last paint
    pub fn screen_vertices(&self) -> &[Vec4] {
        &self.screen_vertices
    }

    /// Integer screen vertices from the last paint
    pub fn display_vertices(&self) -> &[ScreenPoint] {
        &self.display_vertices
    }

    /// Per-frame update of a root node
    pub fn update(&mut self, context: &FrameContext) {
        self.update_with_parent(&Mat4::identity(), context);
    }

    /// Per-frame update with the parent's world transform as input
    ///
    /// The node's own world transform is final before any child runs.
    pub fn update_with_parent(&mut self, parent_world: &Mat4, context: &FrameContext) {
        self.rotation.y += self.rotation_speed;

        let rotation_x = Mat4::rotation_x(self.rotation.x);
        let rotation_y = Mat4::rotation_y(self.rotation.y);
        let rotation_z = Mat4::rotation_z(self.rotation.z);

        self.world = parent_world
            * Mat4::translation(&self.position)
            * rotation_x
            * rotation_y
            * rotation_z
            * Mat4::scaling(self.scale, self.scale, self.scale);
        self.clip_transform = context.projection * self.world;

        if self.diagnostic.is_none() {
            self.transform_and_light(context);
        }

        let world = self.world;
        for child in self.children.values_mut() {
            child.update_with_parent(&world, context);
        }
    }

    fn transform_and_light(&mut self, context: &FrameContext) {
        let light_direction = context.light_direction.as_ref();

        let vertices = self
            .mesh
            .positions()
            .iter()
            .zip(self.mesh.normals())
            .zip(self.mesh.colors());
        let outputs = self
            .ndc_vertices
            .iter_mut()
            .zip(self.world_normals.iter_mut())
            .zip(self.shaded_colors.iter_mut());

        for (((position, normal), base), ((ndc, world_normal), shaded)) in vertices.zip(outputs) {
            *ndc = self.clip_transform * position;
            utils::perspective_divide(ndc);

            *world_normal = (self.world * normal).xyz();
            *shaded = lighting::shade(*base, world_normal, light_direction, context.ambient_intensity);
        }

        log::trace!("Node '{}': transformed {} vertices", self.name, self.mesh.len());
    }

    /// Map, cull, clip and submit this node's triangles, then its children's
    pub fn paint<R: Rasterizer + ?Sized>(&mut self, mapping: &ScreenMapping, rasterizer: &mut R) -> FrameStats {
        let mut stats = FrameStats::default();

        if self.diagnostic.is_none() && !self.mesh.is_empty() {
            stats += self.paint_triangles(mapping, rasterizer);
        }

        for child in self.children.values_mut() {
            stats += child.paint(mapping, rasterizer);
        }

        stats
    }

    fn paint_triangles<R: Rasterizer + ?Sized>(&mut self, mapping: &ScreenMapping, rasterizer: &mut R) -> FrameStats {
        let size = (mapping.width(), mapping.height());
        if self.clipper_size != size {
            self.clipper = ViewportClipper::new(size.0 as f32, size.1 as f32);
            self.clipper_size = size;
        }

        for ((ndc, screen), display) in self
            .ndc_vertices
            .iter()
            .zip(self.screen_vertices.iter_mut())
            .zip(self.display_vertices.iter_mut())
        {
            *screen = mapping.map(ndc);
            *display = ScreenMapping::to_screen_point(screen);
        }

        let mut stats = FrameStats::default();

        for triangle in self.mesh.index_order().chunks_exact(3) {
            if !visibility::is_frontface(&self.screen_vertices, triangle) {
                stats.culled += 1;
                continue;
            }

            // The sink fills one color per polygon, even when clipping interpolated others
            let color = self.shaded_colors[triangle[0]];

            let inside = triangle.iter().all(|&i| {
                let v = &self.screen_vertices[i];
                self.clipper.contains(v.x, v.y)
            });
            if inside {
                rasterizer.set_color(color);
                rasterizer.fill_convex_polygon_z_buffer(&self.display_vertices, triangle);
                stats.submitted += 1;
                continue;
            }

            let polygon = [triangle[0], triangle[1], triangle[2]]
                .map(|i| ClipVertex::new(self.screen_vertices[i].xyz(), self.shaded_colors[i]));
            let clipped = self.clipper.clip(&polygon);
            if clipped.len() < 3 {
                stats.clipped_away += 1;
                continue;
            }

            self.clipped_points.clear();
            self.clipped_points.extend(clipped.iter().map(|v| {
                ScreenPoint::new(v.position.x as i32, v.position.y as i32, v.position.z as i32, 1)
            }));
            self.clipped_indices.clear();
            self.clipped_indices.extend(0..self.clipped_points.len());

            rasterizer.set_color(color);
            rasterizer.fill_convex_polygon_z_buffer(&self.clipped_points, &self.clipped_indices);
            stats.submitted += 1;
            stats.clipped_partially += 1;
        }

        log::trace!(
            "Node '{}': {} submitted, {} culled, {} clipped away",
            self.name,
            stats.submitted,
            stats.culled,
            stats.clipped_away
        );
        stats
    }
}
