//! # Sliver
//!
//! A semantic triangle-mesh processing library.
//!
//! Sliver provides an adjacency-explicit triangle mesh — vertices, full
//! undirected edges, and triangles whose corners are derived from their
//! edge cycle — together with the structural algorithms that keep such a
//! mesh a valid manifold, and a semantic annotation layer that attaches
//! point/line/surface regions to it.
//!
//! ## Features
//!
//! - **Topology kernel**: typed dense indices, one-ring traversal in
//!   angular order, coherent orientation propagation, edge collapse with
//!   link-condition and normal-flip rollback, flagged-element compaction
//! - **Algorithms**: contour-bounded region growing, outline extraction
//!   (its inverse), label-correcting shortest paths with pluggable
//!   metrics, uniform and cotangent Laplacian smoothing
//! - **Annotations**: a closed point/line/surface sum type with JSON
//!   persistence, resolved against the mesh on demand
//! - **I/O**: ASCII PLY loading and saving with build-time manifold checks
//!
//! ## Quick Start
//!
//! ```no_run
//! use sliver::prelude::*;
//!
//! // Load a mesh (oriented and property-annotated on the way in).
//! let mesh = sliver::io::load("model.ply").unwrap();
//!
//! println!("Vertices: {}", mesh.num_vertices());
//! println!("Triangles: {}", mesh.num_triangles());
//!
//! // Walk a one-ring.
//! let v = VertexId::new(0);
//! for neighbor in mesh.vertex_neighbors(v) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use sliver::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3]];
//!
//! let mesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_edges(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod annotation;
pub mod error;
pub mod geom;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use sliver::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        laplacian_smooth, outlines, region_growing, region_growing_multi, shortest_path,
        DistanceMetric, PathOptions, SmoothOptions,
    };
    pub use crate::annotation::{Annotation, AnnotationKind, AnnotationSet};
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_triangles, to_face_vertex, CollapseOutcome, Edge, EdgeId, ElementFlags,
        TriMesh, Triangle, TriangleId, Vertex, VertexId,
    };
}

// Re-export nalgebra for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_unit_square_scenario() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3]];

        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_edges(), 5);

        let diagonal = mesh.common_edge(VertexId::new(0), VertexId::new(2));
        assert!(diagonal.is_valid());
        let e = mesh.edge(diagonal);
        assert!(e.t1.is_valid());
        assert!(e.t2.is_valid());

        assert!((mesh.edge_length(diagonal) - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_tetrahedron_is_closed() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];

        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_triangles(), 4);
        // Closed surface: E = 3F/2.
        assert_eq!(mesh.num_edges(), 6);
        assert!(mesh.is_valid());

        for v in mesh.vertex_ids() {
            assert!(
                !mesh.is_boundary_vertex(v),
                "vertex {:?} should not be on boundary",
                v
            );
        }
    }
}
