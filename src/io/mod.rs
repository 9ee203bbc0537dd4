//! Mesh file I/O.
//!
//! This module loads and saves meshes; PLY (ASCII) is the supported
//! format.
//!
//! Loading follows the construction contract of the mesh kernel: the file
//! is parsed into a face-vertex list, built through the deduplicating
//! builder, then — in this order — the triangles are oriented coherently
//! and the aggregate properties are computed. A mesh coming out of
//! [`load`] is therefore fully normalized.
//!
//! There is no partial-success mode: any parse or build error aborts the
//! whole load.
//!
//! ```no_run
//! use sliver::io::{load, save};
//!
//! let mesh = load("model.ply").unwrap();
//! save(&mesh, "output.ply").unwrap();
//! ```

pub mod ply;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::TriMesh;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Load a mesh from a file with automatic format detection.
pub fn load<P: AsRef<Path>>(path: P) -> Result<TriMesh> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    let mut mesh = match format {
        Format::Ply => ply::load(path),
    }?;

    // Finalization order matters: orient over the finished topology,
    // then derive the aggregates.
    mesh.orient_triangles_coherently();
    mesh.compute_properties();

    Ok(mesh)
}

/// Save a mesh to a file with automatic format detection.
pub fn save<P: AsRef<Path>>(mesh: &TriMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    match format {
        Format::Ply => ply::save(mesh, path),
    }
}
