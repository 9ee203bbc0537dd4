//! Laplacian mesh smoothing.
//!
//! Iteratively moves each vertex towards a weighted average of its one-ring
//! neighbours. Two weighting schemes are supported:
//!
//! - [`WeightKind::Uniform`]: every neighbour counts equally; the vertex
//!   moves towards the plain centroid. Fast, shrinks the mesh over many
//!   iterations.
//! - [`WeightKind::Cotangent`]: the classic cotangent weights, which
//!   respect the local triangle shapes and smooth tangentially with much
//!   less drift.
//!
//! # Example
//!
//! ```
//! use sliver::algo::smooth::{laplacian_smooth, SmoothOptions};
//! use sliver::mesh::build_from_triangles;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 0.7), // bumped centre
//! ];
//! let faces = vec![[4, 0, 1], [4, 1, 2], [4, 2, 3], [4, 3, 0]];
//! let mut mesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! laplacian_smooth(&mut mesh, &SmoothOptions::default().with_iterations(3));
//! assert!(mesh.position(sliver::mesh::VertexId::new(4)).z < 0.7);
//! ```

use nalgebra::Point3;
use rayon::prelude::*;

use crate::mesh::{TriMesh, VertexId};

/// Laplacian weighting scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightKind {
    /// Equal weight for every neighbour.
    #[default]
    Uniform,
    /// Cotangent weights over the one-ring.
    Cotangent,
}

/// Options for Laplacian smoothing.
#[derive(Debug, Clone)]
pub struct SmoothOptions {
    /// Number of smoothing iterations.
    pub iterations: usize,

    /// Step factor in `(0, 1]`: how far each vertex moves towards its
    /// weighted neighbour average per iteration.
    pub step: f64,

    /// Weighting scheme.
    pub weight: WeightKind,

    /// Keep boundary vertices pinned.
    pub preserve_boundary: bool,

    /// Compute the per-iteration position pass in parallel.
    pub parallel: bool,
}

impl Default for SmoothOptions {
    fn default() -> Self {
        Self {
            iterations: 1,
            step: 0.5,
            weight: WeightKind::Uniform,
            preserve_boundary: true,
            parallel: true,
        }
    }
}

impl SmoothOptions {
    /// Set the number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the step factor (clamped to `[0, 1]`).
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step.clamp(0.0, 1.0);
        self
    }

    /// Set the weighting scheme.
    pub fn with_weight(mut self, weight: WeightKind) -> Self {
        self.weight = weight;
        self
    }

    /// Let boundary vertices move too.
    pub fn allow_boundary_movement(mut self) -> Self {
        self.preserve_boundary = false;
        self
    }

    /// Run the position pass single-threaded.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Smooth the mesh in place.
pub fn laplacian_smooth(mesh: &mut TriMesh, options: &SmoothOptions) {
    if options.iterations == 0 || options.step == 0.0 {
        return;
    }

    let boundary: Vec<bool> = if options.preserve_boundary {
        mesh.vertex_ids()
            .map(|v| mesh.is_boundary_vertex(v))
            .collect()
    } else {
        vec![false; mesh.num_vertices()]
    };

    let n = mesh.num_vertices();
    for _ in 0..options.iterations {
        let step = |i: usize| {
            let v = VertexId::new(i);
            if boundary[i] {
                *mesh.position(v)
            } else {
                match options.weight {
                    WeightKind::Uniform => uniform_step(mesh, v, options.step),
                    WeightKind::Cotangent => cotangent_step(mesh, v, options.step),
                }
            }
        };

        let new_positions: Vec<Point3<f64>> = if options.parallel {
            (0..n).into_par_iter().map(step).collect()
        } else {
            (0..n).map(step).collect()
        };

        for (i, pos) in new_positions.into_iter().enumerate() {
            mesh.set_position(VertexId::new(i), pos);
        }
    }
}

/// Move `v` towards the centroid of its neighbours.
fn uniform_step(mesh: &TriMesh, v: VertexId, step: f64) -> Point3<f64> {
    let p = *mesh.position(v);
    let neighbors = mesh.vertex_neighbors(v);
    if neighbors.is_empty() {
        return p;
    }

    let mut centroid = nalgebra::Vector3::zeros();
    for &n in &neighbors {
        centroid += mesh.position(n).coords;
    }
    centroid /= neighbors.len() as f64;

    p + (centroid - p.coords) * step
}

/// Move `v` along its cotangent-weighted Laplacian.
fn cotangent_step(mesh: &TriMesh, v: VertexId, step: f64) -> Point3<f64> {
    let p = *mesh.position(v);
    let ring = mesh.vertex_edges(v);
    if ring.is_empty() {
        return p;
    }

    let mut laplacian = nalgebra::Vector3::zeros();
    let mut total_weight = 0.0;

    for &e in &ring {
        let w = mesh.opposite_vertex(e, v);
        let q = mesh.position(w);

        // Cotangents of the angles opposite the edge, one per side.
        let mut weight = 0.0;
        let edge = mesh.edge(e);
        for t in [edge.t1, edge.t2] {
            if !t.is_valid() {
                continue;
            }
            let apex = mesh.triangle_opposite_vertex(t, e);
            if !apex.is_valid() {
                continue;
            }
            let a = mesh.position(apex);
            let u = p - a;
            let r = q - a;
            let cross = u.cross(&r).norm();
            if cross > 1e-12 {
                weight += u.dot(&r) / cross;
            }
        }

        if weight > 0.0 {
            laplacian += (q - p) * weight;
            total_weight += weight;
        }
    }

    if total_weight <= 1e-12 {
        return p;
    }

    p + laplacian / total_weight * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;

    /// Square fan with the centre vertex pushed out of plane.
    fn bumped_fan() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 0.5, 0.7),
        ];
        let faces = vec![[4, 0, 1], [4, 1, 2], [4, 2, 3], [4, 3, 0]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_uniform_flattens_bump() {
        let mut mesh = bumped_fan();
        let center = VertexId::new(4);
        let before = mesh.position(center).z;

        laplacian_smooth(&mut mesh, &SmoothOptions::default().sequential());

        let after = mesh.position(center).z;
        assert!(after < before);
        // step 0.5 towards a planar ring halves the height.
        assert!((after - before * 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_boundary_is_pinned_by_default() {
        let mut mesh = bumped_fan();
        let corners: Vec<_> = (0..4)
            .map(|i| *mesh.position(VertexId::new(i)))
            .collect();

        laplacian_smooth(
            &mut mesh,
            &SmoothOptions::default().with_iterations(5).sequential(),
        );

        for (i, before) in corners.iter().enumerate() {
            assert!((mesh.position(VertexId::new(i)) - before).norm() < 1e-12);
        }
    }

    #[test]
    fn test_boundary_moves_when_allowed() {
        let mut mesh = bumped_fan();
        let corner = VertexId::new(0);
        let before = *mesh.position(corner);

        laplacian_smooth(
            &mut mesh,
            &SmoothOptions::default()
                .allow_boundary_movement()
                .sequential(),
        );

        assert!((mesh.position(corner) - before).norm() > 1e-6);
    }

    #[test]
    fn test_zero_iterations_is_noop() {
        let mut mesh = bumped_fan();
        let before = *mesh.position(VertexId::new(4));

        laplacian_smooth(&mut mesh, &SmoothOptions::default().with_iterations(0));

        assert!((mesh.position(VertexId::new(4)) - before).norm() < 1e-12);
    }

    #[test]
    fn test_cotangent_flattens_bump() {
        let mut mesh = bumped_fan();
        let center = VertexId::new(4);
        let before = mesh.position(center).z;

        laplacian_smooth(
            &mut mesh,
            &SmoothOptions::default()
                .with_weight(WeightKind::Cotangent)
                .with_iterations(10)
                .sequential(),
        );

        let after = mesh.position(center).z;
        assert!(after < before);
        assert!(after >= -1e-9);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut seq = bumped_fan();
        let mut par = bumped_fan();

        let base = SmoothOptions::default().with_iterations(3);
        laplacian_smooth(&mut seq, &base.clone().sequential());
        laplacian_smooth(&mut par, &base);

        for v in seq.vertex_ids() {
            assert!((seq.position(v) - par.position(v)).norm() < 1e-12);
        }
    }
}
