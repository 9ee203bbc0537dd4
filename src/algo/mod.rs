//! Mesh algorithms.
//!
//! Read-mostly algorithms over a [`TriMesh`](crate::mesh::TriMesh):
//!
//! - **Region growing**: flood fill bounded by a contour, single- or
//!   multi-loop ([`region_growing`], [`region_growing_multi`])
//! - **Outline extraction**: boundary loops of a triangle set, the inverse
//!   of region growing ([`outlines`])
//! - **Shortest path**: label-correcting search with pluggable metrics and
//!   an approximate directed mode ([`shortest_path`])
//! - **Smoothing**: uniform and cotangent Laplacian smoothing
//!   ([`smooth::laplacian_smooth`])
//!
//! Structural algorithms that rewrite the mesh (orientation propagation,
//! edge collapse, compaction) live on the mesh type itself, in
//! [`crate::mesh`].

pub mod outline;
pub mod path;
pub mod region;
pub mod smooth;

pub use outline::outlines;
pub use path::{shortest_path, DistanceMetric, PathOptions};
pub use region::{region_growing, region_growing_multi};
pub use smooth::{laplacian_smooth, SmoothOptions, WeightKind};
