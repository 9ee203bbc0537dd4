//! Error types for sliver.
//!
//! This module defines all error types used throughout the library.
//!
//! Two classes of failure deliberately do *not* appear here: element lookups
//! that miss (checked accessors return `Option` instead) and refused edge
//! collapses (reported through
//! [`CollapseOutcome`](crate::mesh::CollapseOutcome), since a refusal is a
//! defined no-op rather than an error).

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The mesh has no faces.
    #[error("mesh has no faces")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// An edge already has two incident triangles and a third was linked.
    #[error("edge ({v1}, {v2}) has more than two incident triangles")]
    NonManifoldEdge {
        /// First vertex of the edge.
        v1: usize,
        /// Second vertex of the edge.
        v2: usize,
    },

    /// Two consecutive contour vertices are not connected by a mesh edge.
    ///
    /// Contours fed to region growing must consist of actual mesh edges.
    #[error("contour vertices {from} and {to} share no mesh edge")]
    MalformedContour {
        /// The contour vertex the walk came from.
        from: usize,
        /// The contour vertex that could not be reached.
        to: usize,
    },

    /// A contour has no interior triangle on its left, so it does not
    /// enclose a region.
    #[error("contour {contour} is not closed (no interior triangle found)")]
    OpenContour {
        /// Index of the offending contour in the input list.
        contour: usize,
    },

    /// An annotation references a vertex that no longer exists.
    #[error("annotation {annotation} references removed vertex {vertex}")]
    DanglingAnnotation {
        /// Id of the annotation.
        annotation: u32,
        /// The stale vertex index.
        vertex: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading a mesh or annotation set from a file.
    #[error("failed to load {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving a mesh or annotation set to a file.
    #[error("failed to save {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid mesh state for the requested operation.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}
