//! Outline extraction: boundary loops of a triangle set.
//!
//! [`outlines`] is the inverse of region growing: given an arbitrary set of
//! triangles it returns the boundary loop(s) of that set as ordered, closed
//! vertex sequences. Loops are normalized so that the set lies to their
//! left, which is exactly the contour convention
//! [`region_growing`](crate::algo::region_growing) consumes — growing a
//! region from a contour and extracting its outlines round-trips (up to the
//! loop's starting point).
//!
//! The algorithm walks the set once, recording a directed edge for every
//! triangle edge whose opposite triangle is missing or outside the set,
//! then stitches those directed edges into closed loops and flips any loop
//! that ended up with the set on its right.

use std::collections::HashSet;

use crate::mesh::{TriMesh, TriangleId, VertexId};

/// Extract the boundary loop(s) of a triangle set.
///
/// Each returned loop is closed (its first vertex is repeated at the end)
/// and oriented with the set on its left. The empty set yields no loops.
pub fn outlines(mesh: &TriMesh, set: &[TriangleId]) -> Vec<Vec<VertexId>> {
    let inside: HashSet<TriangleId> = set.iter().copied().collect();

    // Directed boundary edges: from the vertex the triangle's cycle enters
    // the edge through, to the one it leaves through. With the set's
    // triangles coherently wound, each loop comes out consistently
    // directed.
    let mut pool: Vec<(VertexId, VertexId)> = Vec::new();
    for &t in set {
        let mut e = mesh.triangle(t).e1;
        for _ in 0..3 {
            let neighbor = mesh.opposite_triangle(e, t);
            if !neighbor.is_valid() || !inside.contains(&neighbor) {
                let prev = mesh.prev_edge(t, e);
                let from = mesh.common_vertex(prev, e);
                pool.push((from, mesh.opposite_vertex(e, from)));
            }
            e = mesh.next_edge(t, e);
        }
    }

    // Stitch the pool into closed loops, consuming matched edges.
    let mut loops: Vec<Vec<VertexId>> = Vec::new();
    while let Some(&(start, mut current)) = pool.first() {
        pool.swap_remove(0);
        let mut outline = vec![start];

        while current != start {
            outline.push(current);
            let next = pool
                .iter()
                .position(|&(from, _)| from == current)
                .or_else(|| pool.iter().position(|&(_, to)| to == current));
            match next {
                Some(i) => {
                    let (from, to) = pool.swap_remove(i);
                    current = if from == current { to } else { from };
                }
                None => break, // open chain: malformed set, emit what we have
            }
        }
        outline.push(outline[0]);
        loops.push(outline);
    }

    // Normalize: every loop keeps the set on its left. The recorded
    // direction already does for coherently wound sets, but a stitch that
    // walked an edge backwards (or an incoherent set) is repaired here.
    for outline in &mut loops {
        let mut bordering = TriangleId::invalid();
        for i in 1..outline.len() {
            let e = mesh.common_edge(outline[i - 1], outline[i]);
            if !e.is_valid() {
                continue;
            }
            let left = mesh.left_triangle(e, outline[i - 1]);
            if left.is_valid() {
                bordering = left;
                break;
            }
        }
        if !bordering.is_valid() || !inside.contains(&bordering) {
            outline.reverse();
        }
    }

    loops
}
