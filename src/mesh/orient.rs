//! Coherent triangle orientation.
//!
//! Triangle orientation is encoded by edge order and is only meaningful
//! mesh-wide: two triangles sharing an edge are coherently oriented when
//! their cycles traverse the shared edge in opposite directions.
//! [`TriMesh::orient_triangles_coherently`] normalizes the whole mesh by
//! flipping triangles during a breadth-first sweep of the adjacency graph.

use std::collections::VecDeque;

use super::index::TriangleId;
use super::TriMesh;

impl TriMesh {
    /// Whether two adjacent triangles wind consistently across their
    /// shared edge.
    ///
    /// Returns `true` when the triangles are not adjacent at all — there
    /// is nothing to contradict.
    pub fn is_coherently_oriented(&self, t: TriangleId, other: TriangleId) -> bool {
        let e = self.common_edge_of_triangles(t, other);
        if !e.is_valid() {
            return true;
        }

        // The (entering, leaving) corners of the shared edge in each
        // triangle's cycle. Matching directions means opposed winding.
        let t_in = self.common_vertex(self.prev_edge(t, e), e);
        let t_out = self.common_vertex(self.next_edge(t, e), e);
        let o_in = self.common_vertex(self.prev_edge(other, e), e);
        let o_out = self.common_vertex(self.next_edge(other, e), e);

        !(t_in == o_in && t_out == o_out)
    }

    /// Flip the orientation of a single triangle by swapping its second
    /// and third edges.
    #[inline]
    pub fn orient_triangle(&mut self, t: TriangleId) {
        self.triangle_mut(t).orient();
    }

    /// Make all triangles mutually coherently oriented.
    ///
    /// Breadth-first sweep over the triangle adjacency graph: each visited
    /// triangle imposes its winding on unvisited neighbours, flipping them
    /// when they disagree. The sweep restarts from the next unvisited
    /// triangle until every connected component is covered, so each
    /// component ends up internally coherent (components are independent:
    /// no orientation relation exists between them).
    ///
    /// Running this twice is a no-op the second time.
    pub fn orient_triangles_coherently(&mut self) {
        let n = self.num_triangles();
        let mut visited = vec![false; n];
        let mut queue = VecDeque::new();

        for seed in 0..n {
            if visited[seed] {
                continue;
            }
            visited[seed] = true;
            queue.push_back(TriangleId::new(seed));

            while let Some(t) = queue.pop_front() {
                let mut e = self.triangle(t).e1;
                for _ in 0..3 {
                    let neighbor = self.opposite_triangle(e, t);
                    if neighbor.is_valid() && !visited[neighbor.index()] {
                        if !self.is_coherently_oriented(t, neighbor) {
                            self.orient_triangle(neighbor);
                        }
                        visited[neighbor.index()] = true;
                        queue.push_back(neighbor);
                    }
                    e = self.next_edge(t, e);
                }
            }
        }
    }
}
