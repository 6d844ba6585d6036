//! Mesh buffers for the software pipeline
//!
//! Loaded meshes arrive indexed: flat position and normal arrays plus one
//! (position index, normal index) pair per triangle corner. The pipeline works
//! on a pre-expanded triangle soup instead, where triangle `k` occupies slots
//! `[3k, 3k + 3)` of parallel position/normal/color arrays. `index_order` is the
//! contiguous `0..N` sequence the paint pass walks in steps of three.

use crate::foundation::math::{Vec4, utils};
use crate::render::primitives::Color;
use thiserror::Error;

/// Errors raised while expanding indexed mesh data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// A corner referenced a position that does not exist
    #[error("Position index {index} out of range ({count} positions)")]
    PositionIndexOutOfRange {
        /// Offending index
        index: usize,
        /// Number of positions available
        count: usize,
    },

    /// A corner referenced a normal that does not exist
    #[error("Normal index {index} out of range ({count} normals)")]
    NormalIndexOutOfRange {
        /// Offending index
        index: usize,
        /// Number of normals available
        count: usize,
    },
}

/// Indexed triangle mesh as produced by the mesh loader
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,

    /// Vertex normals
    pub normals: Vec<[f32; 3]>,

    /// One `(position_index, normal_index)` pair per triangle corner
    pub corners: Vec<(usize, usize)>,
}

impl MeshData {
    /// Number of complete triangles described by the corners
    pub fn triangle_count(&self) -> usize {
        self.corners.len() / 3
    }
}

/// Pre-expanded per-node vertex buffers
///
/// Invariant: `positions`, `normals`, `colors` and `index_order` always have the
/// same length, and that length is a multiple of three.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
    positions: Vec<Vec4>,
    normals: Vec<Vec4>,
    colors: Vec<Color>,
    index_order: Vec<usize>,
}

impl MeshBuffers {
    /// Empty geometry, used by nodes whose mesh failed to load
    pub fn empty() -> Self {
        Self::default()
    }

    /// Expand indexed mesh data into triangle-soup buffers with a uniform base color
    ///
    /// Trailing corners that do not complete a triangle are dropped.
    pub fn from_mesh_data(data: &MeshData, color: Color) -> Result<Self, MeshError> {
        let corner_count = data.triangle_count() * 3;

        let mut positions = Vec::with_capacity(corner_count);
        let mut normals = Vec::with_capacity(corner_count);

        for &(position_index, normal_index) in &data.corners[..corner_count] {
            let p = data.positions.get(position_index).ok_or(MeshError::PositionIndexOutOfRange {
                index: position_index,
                count: data.positions.len(),
            })?;
            let n = data.normals.get(normal_index).ok_or(MeshError::NormalIndexOutOfRange {
                index: normal_index,
                count: data.normals.len(),
            })?;

            positions.push(utils::point(p[0], p[1], p[2]));
            normals.push(utils::direction(n[0], n[1], n[2]));
        }

        Ok(Self {
            positions,
            normals,
            colors: vec![color; corner_count],
            index_order: (0..corner_count).collect(),
        })
    }

    /// Number of vertex slots
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the buffers hold no geometry
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.index_order.len() / 3
    }

    /// Model-space positions (w = 1)
    pub fn positions(&self) -> &[Vec4] {
        &self.positions
    }

    /// Model-space normals (w = 0)
    pub fn normals(&self) -> &[Vec4] {
        &self.normals
    }

    /// Per-vertex base colors
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Iteration order, `0..len()`
    pub fn index_order(&self) -> &[usize] {
        &self.index_order
    }
}
