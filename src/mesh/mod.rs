//! Core mesh data structures.
//!
//! This module provides the adjacency-explicit triangle mesh representation
//! and its structural algorithms.
//!
//! # Overview
//!
//! The primary type is [`TriMesh`]. Unlike a half-edge structure, the mesh
//! stores full undirected edges: a [`Vertex`] holds one incident edge, an
//! [`Edge`] holds its two endpoints and up to two incident triangles, and a
//! [`Triangle`] holds three edges forming a cycle. Triangle corners are
//! derived from the edge cycle rather than stored, so edge rewiring can
//! never leave a triangle's corner list stale.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe dense indices — [`VertexId`],
//! [`EdgeId`], [`TriangleId`] — which double as element identity. An
//! all-ones sentinel encodes "no element" (mesh boundary, isolated vertex).
//!
//! # Construction
//!
//! Meshes are built from face-vertex lists, typically by file I/O:
//!
//! ```
//! use sliver::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_edges(), 3);
//! ```
//!
//! # Structural algorithms
//!
//! The mesh itself carries the operations that must maintain its
//! invariants: one-ring traversal, coherent orientation
//! ([`TriMesh::orient_triangles_coherently`]), edge collapse
//! ([`TriMesh::collapse_edge`]), and flagged-element compaction
//! ([`TriMesh::compact`]). Algorithms that only read the mesh (region
//! growing, outlines, paths, smoothing) live in [`crate::algo`].

mod builder;
mod collapse;
mod elements;
mod index;
mod orient;
mod traversal;
mod trimesh;

pub use builder::{build_from_triangles, to_face_vertex, TriangulationResult};
pub use collapse::CollapseOutcome;
pub use elements::{Edge, ElementFlags, Triangle, Vertex};
pub use index::{EdgeId, TriangleId, VertexId};
pub use trimesh::{CompactionMap, TriMesh};
