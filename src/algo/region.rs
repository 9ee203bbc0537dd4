//! Region growing: flood fill bounded by a contour.
//!
//! Given a closed contour of mesh vertices and a seed triangle known to lie
//! inside it, [`region_growing`] collects every triangle reachable from the
//! seed without crossing a contour edge. [`region_growing_multi`] is the
//! variant used by surface annotations: it takes several boundary loops at
//! once (an outer boundary plus hole boundaries), seeds itself from each
//! loop, and floods the area between them.
//!
//! All bookkeeping (which edges are boundary, which triangles are taken)
//! lives in algorithm-local sets, so the mesh is never marked and an early
//! error return cannot leave stale state behind.
//!
//! Contours must consist of actual mesh edges: a consecutive vertex pair
//! with no common edge is a usage error, reported as
//! [`MeshError::MalformedContour`].

use std::collections::{HashSet, VecDeque};

use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, TriMesh, TriangleId, VertexId};

/// Collect the contour's edges into `boundary`.
///
/// The contour may either repeat its first vertex at the end or leave the
/// closing segment implicit; both spellings mark the same edge set.
fn mark_contour_edges(
    mesh: &TriMesh,
    contour: &[VertexId],
    boundary: &mut HashSet<EdgeId>,
) -> Result<()> {
    if contour.len() < 2 {
        return Ok(());
    }

    let closed = contour.first() == contour.last();
    let pairs = if closed {
        contour.len() - 1
    } else {
        contour.len()
    };

    for i in 0..pairs {
        let from = contour[i];
        let to = contour[(i + 1) % contour.len()];
        if from == to {
            continue;
        }
        let e = mesh.common_edge(from, to);
        if !e.is_valid() {
            return Err(MeshError::MalformedContour {
                from: from.index(),
                to: to.index(),
            });
        }
        boundary.insert(e);
    }

    Ok(())
}

/// Flood outward from the seeds, never crossing a boundary edge.
fn flood(
    mesh: &TriMesh,
    boundary: &HashSet<EdgeId>,
    seeds: &[TriangleId],
) -> Vec<TriangleId> {
    let mut taken = vec![false; mesh.num_triangles()];
    let mut region = Vec::new();
    let mut queue = VecDeque::new();

    for &seed in seeds {
        if !taken[seed.index()] {
            taken[seed.index()] = true;
            region.push(seed);
            queue.push_back(seed);
        }
    }

    while let Some(t) = queue.pop_front() {
        let mut e = mesh.triangle(t).e1;
        for _ in 0..3 {
            if !boundary.contains(&e) {
                let neighbor = mesh.opposite_triangle(e, t);
                // An invalid neighbour means the mesh itself ends here.
                if neighbor.is_valid() && !taken[neighbor.index()] {
                    taken[neighbor.index()] = true;
                    region.push(neighbor);
                    queue.push_back(neighbor);
                }
            }
            e = mesh.next_edge(t, e);
        }
    }

    region
}

/// Grow a region from `seed`, bounded by `contour`.
///
/// Returns the triangles inside the contour, in breadth-first discovery
/// order starting at the seed.
///
/// # Errors
///
/// [`MeshError::MalformedContour`] if two consecutive contour vertices are
/// not mesh-adjacent.
pub fn region_growing(
    mesh: &TriMesh,
    contour: &[VertexId],
    seed: TriangleId,
) -> Result<Vec<TriangleId>> {
    let mut boundary = HashSet::new();
    mark_contour_edges(mesh, contour, &mut boundary)?;
    Ok(flood(mesh, &boundary, &[seed]))
}

/// Grow the region enclosed by several boundary loops at once.
///
/// The loops are ordered counter-clockwise, so the enclosed area lies on
/// the left of each loop's first edge; that left triangle seeds the flood.
/// With an outer boundary plus hole boundaries this selects the surface
/// between them.
///
/// # Errors
///
/// [`MeshError::MalformedContour`] for non-adjacent consecutive vertices,
/// [`MeshError::OpenContour`] when a loop has no left triangle to seed
/// from (the loop does not enclose any mesh area).
pub fn region_growing_multi(
    mesh: &TriMesh,
    contours: &[Vec<VertexId>],
) -> Result<Vec<TriangleId>> {
    let mut boundary = HashSet::new();
    let mut seeds = Vec::with_capacity(contours.len());

    for (ci, contour) in contours.iter().enumerate() {
        if contour.len() < 2 {
            return Err(MeshError::OpenContour { contour: ci });
        }
        let first = mesh.common_edge(contour[0], contour[1]);
        if !first.is_valid() {
            return Err(MeshError::MalformedContour {
                from: contour[0].index(),
                to: contour[1].index(),
            });
        }
        let seed = mesh.left_triangle(first, contour[0]);
        if !seed.is_valid() {
            return Err(MeshError::OpenContour { contour: ci });
        }
        seeds.push(seed);
        mark_contour_edges(mesh, contour, &mut boundary)?;
    }

    Ok(flood(mesh, &boundary, &seeds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;
    use nalgebra::Point3;

    /// A 3×3 grid of squares, each split into two triangles (18 total).
    fn grid_mesh(n: usize) -> TriMesh {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }

        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                let v10 = v00 + 1;
                let v01 = v00 + (n + 1);
                let v11 = v01 + 1;
                faces.push([v00, v10, v11]);
                faces.push([v00, v11, v01]);
            }
        }

        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn vid(i: usize) -> VertexId {
        VertexId::new(i)
    }

    #[test]
    fn test_whole_mesh_without_contour() {
        let mesh = grid_mesh(3);
        let region = region_growing(&mesh, &[], TriangleId::new(0)).unwrap();
        assert_eq!(region.len(), mesh.num_triangles());
    }

    #[test]
    fn test_contour_bounds_the_flood() {
        let mesh = grid_mesh(3);
        // The centre square of the 3×3 grid: vertices 5, 6, 10, 9
        // (grid row stride is 4), wound counter-clockwise.
        let contour = vec![vid(5), vid(6), vid(10), vid(9), vid(5)];

        // Seed with the lower triangle of the centre square.
        let seed = mesh.triangle_by_vertices(vid(5), vid(6), vid(10));
        assert!(seed.is_valid());

        let region = region_growing(&mesh, &contour, seed).unwrap();
        assert_eq!(region.len(), 2);

        let other = mesh.triangle_by_vertices(vid(5), vid(10), vid(9));
        assert!(region.contains(&seed));
        assert!(region.contains(&other));
    }

    #[test]
    fn test_open_contour_spelling() {
        let mesh = grid_mesh(3);
        // Same contour without the repeated first vertex.
        let contour = vec![vid(5), vid(6), vid(10), vid(9)];
        let seed = mesh.triangle_by_vertices(vid(5), vid(6), vid(10));
        let region = region_growing(&mesh, &contour, seed).unwrap();
        assert_eq!(region.len(), 2);
    }

    #[test]
    fn test_malformed_contour_is_typed_error() {
        let mesh = grid_mesh(3);
        // Vertices 5 and 15 are not mesh-adjacent.
        let contour = vec![vid(5), vid(15), vid(5)];
        let result = region_growing(&mesh, &contour, TriangleId::new(0));
        assert!(matches!(
            result,
            Err(MeshError::MalformedContour { from: 5, to: 15 })
        ));
    }

    #[test]
    fn test_multi_contour_with_hole() {
        let mesh = grid_mesh(3);
        // Outer boundary: the full grid rim, counter-clockwise.
        let outer = vec![
            vid(0),
            vid(1),
            vid(2),
            vid(3),
            vid(7),
            vid(11),
            vid(15),
            vid(14),
            vid(13),
            vid(12),
            vid(8),
            vid(4),
            vid(0),
        ];
        // Hole: the centre square, wound the opposite way so the enclosed
        // region lies outside it.
        let hole = vec![vid(5), vid(9), vid(10), vid(6), vid(5)];

        let region = region_growing_multi(&mesh, &[outer, hole]).unwrap();
        // Everything except the two centre triangles.
        assert_eq!(region.len(), mesh.num_triangles() - 2);
    }

    #[test]
    fn test_multi_contour_rejects_degenerate_loop() {
        let mesh = grid_mesh(3);
        let result = region_growing_multi(&mesh, &[vec![vid(5)]]);
        assert!(matches!(result, Err(MeshError::OpenContour { contour: 0 })));
    }

    #[test]
    fn test_no_flags_left_behind() {
        let mesh = grid_mesh(3);
        let contour = vec![vid(5), vid(6), vid(10), vid(9), vid(5)];
        let seed = mesh.triangle_by_vertices(vid(5), vid(6), vid(10));
        region_growing(&mesh, &contour, seed).unwrap();

        // Scratch state is local: no element carries any flag afterwards.
        assert!(mesh.edges().all(|(_, e)| e.flags.is_empty()));
        assert!(mesh.triangles().all(|(_, t)| t.flags.is_empty()));
    }
}
