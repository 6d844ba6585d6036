//! OBJ file loader for 3D models

use crate::render::primitives::mesh::{MeshData, MeshBuffers, MeshError};
use crate::render::primitives::Color;
use std::io::BufRead;
use std::path::Path;
use thiserror::Error;

/// Mesh loading errors
///
/// The display strings double as the diagnostic stored on nodes whose mesh
/// failed to load.
#[derive(Error, Debug)]
pub enum ObjError {
    /// The OBJ parser rejected the file
    #[error("Failed to load {path}: {source}")]
    Load {
        /// Source of the mesh
        path: String,
        /// Parser error
        #[source]
        source: tobj::LoadError,
    },

    /// The file contains no shapes
    #[error("There are no shapes in {0}")]
    NoShapes(String),

    /// The shapes contain no vertex positions
    #[error("There are no vertices in {0}")]
    NoVertices(String),

    /// Some shape comes without per-corner normals
    #[error("There are no normals in {0}")]
    NoNormals(String),

    /// The indexed data could not be expanded
    #[error("Invalid mesh data: {0}")]
    Mesh(#[from] MeshError),
}

/// OBJ loader backed by `tobj`
pub struct ObjLoader;

impl ObjLoader {
    fn load_options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ..Default::default()
        }
    }

    /// Load an OBJ file into indexed mesh data
    ///
    /// Every shape in the file is kept; their arrays are concatenated.
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<MeshData, ObjError> {
        let path = path.as_ref();
        let name = path.display().to_string();

        let (models, _materials) = tobj::load_obj(path, &Self::load_options())
            .map_err(|source| ObjError::Load { path: name.clone(), source })?;

        Self::collect(&models, &name)
    }

    /// Load OBJ data from a reader; material libraries are not resolved
    pub fn load_obj_buf<R: BufRead>(reader: &mut R, name: &str) -> Result<MeshData, ObjError> {
        let (models, _materials) = tobj::load_obj_buf(reader, &Self::load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|source| ObjError::Load { path: name.to_string(), source })?;

        Self::collect(&models, name)
    }

    /// Load an OBJ file straight into pipeline buffers with a uniform base color
    pub fn load_mesh_buffers<P: AsRef<Path>>(path: P, color: Color) -> Result<MeshBuffers, ObjError> {
        let data = Self::load_obj(path)?;
        Ok(MeshBuffers::from_mesh_data(&data, color)?)
    }

    fn collect(models: &[tobj::Model], name: &str) -> Result<MeshData, ObjError> {
        if models.is_empty() {
            return Err(ObjError::NoShapes(name.to_string()));
        }

        let mut data = MeshData::default();

        for model in models {
            let mesh = &model.mesh;
            if mesh.normal_indices.len() != mesh.indices.len() {
                return Err(ObjError::NoNormals(name.to_string()));
            }

            let position_offset = data.positions.len();
            let normal_offset = data.normals.len();

            data.positions.extend(mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]));
            data.normals.extend(mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]));
            data.corners.extend(
                mesh.indices
                    .iter()
                    .zip(&mesh.normal_indices)
                    .map(|(&v, &n)| (position_offset + v as usize, normal_offset + n as usize)),
            );

            log::trace!(
                "OBJ shape '{}' in {}: {} positions, {} normals, {} corners",
                model.name,
                name,
                mesh.positions.len() / 3,
                mesh.normals.len() / 3,
                mesh.indices.len()
            );
        }

        if data.positions.is_empty() {
            return Err(ObjError::NoVertices(name.to_string()));
        }
        if data.normals.is_empty() {
            return Err(ObjError::NoNormals(name.to_string()));
        }

        log::debug!("Loaded {}: {} triangles from {} shape(s)", name, data.triangle_count(), models.len());
        Ok(data)
    }
}
