//! Adjacency queries and one-ring traversal.
//!
//! Everything here reads the mesh through the edge/triangle graph: an edge
//! knows its two endpoints and up to two incident triangles, a triangle
//! knows its three edges, and a vertex knows one incident edge (`e0`). All
//! richer adjacency — a vertex's incident edges in angular order, its
//! neighbouring vertices, its triangle fan — is derived by walking that
//! graph, starting from `e0`.
//!
//! # Left and right triangles
//!
//! An edge's two incident triangles are stored in arbitrary order; "left"
//! and "right" only exist relative to a query vertex. Standing at vertex
//! `v` and looking along the edge towards its other endpoint, the left
//! triangle is the one whose cycle, walked forward from `v`, reaches the
//! opposite endpoint next; the right triangle reaches `v` *from* the
//! opposite endpoint. These two relative queries are what give the radial
//! walk its direction.
//!
//! # Termination
//!
//! On a manifold mesh (with or without boundary) the radial walk always
//! terminates: it either returns to `e0` (interior vertex, closed fan) or
//! hits the boundary on both sides (open fan). A corrupted mesh with
//! inconsistent incidence could make the walk cycle; rather than hanging,
//! the walk is bounded by the total edge count and returns the truncated
//! ring.

use std::collections::HashSet;

use super::index::{EdgeId, TriangleId, VertexId};
use super::TriMesh;

impl TriMesh {
    // ==================== Edge-level queries ====================

    /// The endpoint of `e` opposite to `v`, or invalid if `v` is not an
    /// endpoint of `e`.
    #[inline]
    pub fn opposite_vertex(&self, e: EdgeId, v: VertexId) -> VertexId {
        self.edge(e).opposite_vertex(v)
    }

    /// The vertex shared by two edges, or invalid if they share none.
    pub fn common_vertex(&self, a: EdgeId, b: EdgeId) -> VertexId {
        let ea = self.edge(a);
        let eb = self.edge(b);
        if eb.has_vertex(ea.v1) {
            ea.v1
        } else if eb.has_vertex(ea.v2) {
            ea.v2
        } else {
            VertexId::invalid()
        }
    }

    /// The edge connecting two vertices, or invalid if they are not
    /// mesh-adjacent.
    ///
    /// Both endpoints' fans are searched: on a boundary vertex a one-sided
    /// walk can miss edges reachable only from the other side.
    pub fn common_edge(&self, a: VertexId, b: VertexId) -> EdgeId {
        for e in self.vertex_edges(a) {
            if self.edge(e).has_vertex(b) {
                return e;
            }
        }
        for e in self.vertex_edges(b) {
            if self.edge(e).has_vertex(a) {
                return e;
            }
        }
        EdgeId::invalid()
    }

    /// The triangle on the left of `e` relative to `v`: the incident
    /// triangle whose cycle, walked forward from `v`, reaches the opposite
    /// endpoint of `e` next. Invalid if there is none (boundary).
    pub fn left_triangle(&self, e: EdgeId, v: VertexId) -> TriangleId {
        let far = self.opposite_vertex(e, v);
        let edge = self.edge(e);
        for t in [edge.t1, edge.t2] {
            if t.is_valid() && self.next_vertex(t, v) == far {
                return t;
            }
        }
        TriangleId::invalid()
    }

    /// The triangle on the right of `e` relative to `v`: the incident
    /// triangle whose cycle reaches `v` from the opposite endpoint.
    /// Invalid if there is none (boundary).
    pub fn right_triangle(&self, e: EdgeId, v: VertexId) -> TriangleId {
        let far = self.opposite_vertex(e, v);
        let edge = self.edge(e);
        for t in [edge.t1, edge.t2] {
            if t.is_valid() && self.prev_vertex(t, v) == far {
                return t;
            }
        }
        TriangleId::invalid()
    }

    /// The triangle on the other side of `e` from `t`, or invalid.
    #[inline]
    pub fn opposite_triangle(&self, e: EdgeId, t: TriangleId) -> TriangleId {
        self.edge(e).opposite_triangle(t)
    }

    /// Whether `e` borders at most one triangle.
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId) -> bool {
        self.edge(e).is_boundary()
    }

    // ==================== Triangle-level queries ====================

    /// The three derived vertices of a triangle: V1 = e3∩e1, V2 = e1∩e2,
    /// V3 = e2∩e3.
    pub fn triangle_vertices(&self, t: TriangleId) -> [VertexId; 3] {
        let tri = self.triangle(t);
        [
            self.common_vertex(tri.e3, tri.e1),
            self.common_vertex(tri.e1, tri.e2),
            self.common_vertex(tri.e2, tri.e3),
        ]
    }

    /// The vertex after `v` in the triangle's cycle, or invalid if `v` is
    /// not a corner of `t`.
    pub fn next_vertex(&self, t: TriangleId, v: VertexId) -> VertexId {
        let [v1, v2, v3] = self.triangle_vertices(t);
        if v == v1 {
            v2
        } else if v == v2 {
            v3
        } else if v == v3 {
            v1
        } else {
            VertexId::invalid()
        }
    }

    /// The vertex before `v` in the triangle's cycle, or invalid if `v` is
    /// not a corner of `t`.
    pub fn prev_vertex(&self, t: TriangleId, v: VertexId) -> VertexId {
        let [v1, v2, v3] = self.triangle_vertices(t);
        if v == v1 {
            v3
        } else if v == v2 {
            v1
        } else if v == v3 {
            v2
        } else {
            VertexId::invalid()
        }
    }

    /// The edge after `e` in the triangle's cycle.
    #[inline]
    pub fn next_edge(&self, t: TriangleId, e: EdgeId) -> EdgeId {
        self.triangle(t).next_edge(e)
    }

    /// The edge before `e` in the triangle's cycle.
    #[inline]
    pub fn prev_edge(&self, t: TriangleId, e: EdgeId) -> EdgeId {
        self.triangle(t).prev_edge(e)
    }

    /// The edge of `t` not touching `v`, or invalid if `v` is not a corner.
    pub fn opposite_edge(&self, t: TriangleId, v: VertexId) -> EdgeId {
        let tri = self.triangle(t);
        let e1 = self.edge(tri.e1);
        let e2 = self.edge(tri.e2);
        let e3 = self.edge(tri.e3);
        if !e1.has_vertex(v) && (e2.has_vertex(v) || e3.has_vertex(v)) {
            tri.e1
        } else if !e2.has_vertex(v) && (e1.has_vertex(v) || e3.has_vertex(v)) {
            tri.e2
        } else if !e3.has_vertex(v) && (e1.has_vertex(v) || e2.has_vertex(v)) {
            tri.e3
        } else {
            EdgeId::invalid()
        }
    }

    /// The corner of `t` not on edge `e`, or invalid if `e` is not one of
    /// `t`'s edges.
    pub fn triangle_opposite_vertex(&self, t: TriangleId, e: EdgeId) -> VertexId {
        let tri = self.triangle(t);
        if e == tri.e1 {
            self.common_vertex(tri.e2, tri.e3)
        } else if e == tri.e2 {
            self.common_vertex(tri.e1, tri.e3)
        } else if e == tri.e3 {
            self.common_vertex(tri.e1, tri.e2)
        } else {
            VertexId::invalid()
        }
    }

    /// The edge shared by two triangles, or invalid if they are not
    /// adjacent.
    pub fn common_edge_of_triangles(&self, t: TriangleId, other: TriangleId) -> EdgeId {
        let tri = self.triangle(t);
        let o = self.triangle(other);
        for e in [tri.e1, tri.e2, tri.e3] {
            if o.has_edge(e) {
                return e;
            }
        }
        EdgeId::invalid()
    }

    /// The triangle spanned by three vertices, or invalid if none exists.
    pub fn triangle_by_vertices(&self, a: VertexId, b: VertexId, c: VertexId) -> TriangleId {
        let e = self.common_edge(a, b);
        if !e.is_valid() {
            return TriangleId::invalid();
        }
        let edge = self.edge(e);
        for t in [edge.t1, edge.t2] {
            if t.is_valid() && self.triangle_vertices(t).contains(&c) {
                return t;
            }
        }
        TriangleId::invalid()
    }

    /// Collect every triangle incident to at least one of the given
    /// vertices, in discovery order, without duplicates.
    pub fn triangles_of_vertices(&self, vertices: &[VertexId]) -> Vec<TriangleId> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for &v in vertices {
            for t in self.vertex_triangles(v) {
                if seen.insert(t) {
                    found.push(t);
                }
            }
        }
        found
    }

    // ==================== One-ring traversal ====================

    /// Enumerate the edges incident to `v`, in angular order around it.
    ///
    /// The walk starts at `v`'s entry edge `e0` and steps from edge to
    /// edge through each left triangle. For an interior vertex it comes
    /// back around to `e0` and the result is the full closed fan. When it
    /// hits the boundary first, the walk restarts from `e0` in the other
    /// direction through right triangles, prepending edges, so the result
    /// is the open fan ordered from one boundary edge to the other.
    ///
    /// An isolated vertex yields an empty list.
    pub fn vertex_edges(&self, v: VertexId) -> Vec<EdgeId> {
        let mut ring = Vec::new();
        let e0 = self.vertex(v).edge;
        if !e0.is_valid() {
            return ring;
        }

        let guard = self.num_edges() + 1;
        let mut e = e0;
        let mut closed = false;
        loop {
            ring.push(e);
            let far = self.opposite_vertex(e, v);
            let left = self.left_triangle(e, v);
            if !left.is_valid() {
                break;
            }
            e = self.opposite_edge(left, far);
            if !e.is_valid() {
                break;
            }
            if e == e0 {
                closed = true;
                break;
            }
            if ring.len() >= guard {
                break;
            }
        }
        if closed {
            return ring;
        }

        // Boundary fan: sweep the other direction and prepend.
        let mut e = e0;
        loop {
            let far = self.opposite_vertex(e, v);
            let right = self.right_triangle(e, v);
            if !right.is_valid() {
                break;
            }
            e = self.opposite_edge(right, far);
            if !e.is_valid() || e == e0 {
                break;
            }
            ring.insert(0, e);
            if ring.len() >= guard {
                break;
            }
        }

        ring
    }

    /// Enumerate the vertices adjacent to `v`, in angular order.
    pub fn vertex_neighbors(&self, v: VertexId) -> Vec<VertexId> {
        self.vertex_edges(v)
            .into_iter()
            .map(|e| self.opposite_vertex(e, v))
            .collect()
    }

    /// Enumerate the triangles incident to `v`, in angular order.
    ///
    /// Each ring edge contributes its left triangle relative to `v`; on a
    /// boundary vertex the last edge has none, so the fan has one triangle
    /// fewer than it has edges.
    pub fn vertex_triangles(&self, v: VertexId) -> Vec<TriangleId> {
        self.vertex_edges(v)
            .into_iter()
            .map(|e| self.left_triangle(e, v))
            .filter(|t| t.is_valid())
            .collect()
    }

    /// Whether `v` lies on the mesh boundary.
    ///
    /// Isolated vertices count as boundary.
    pub fn is_boundary_vertex(&self, v: VertexId) -> bool {
        let ring = self.vertex_edges(v);
        if ring.is_empty() {
            return true;
        }
        ring.iter().any(|&e| self.is_boundary_edge(e))
    }

    /// Collect the vertices within `rings` edge hops of `v`, excluding `v`
    /// itself, in breadth-first order.
    pub fn vertex_neighborhood(&self, v: VertexId, rings: usize) -> Vec<VertexId> {
        let mut neighborhood = Vec::new();
        if rings == 0 {
            return neighborhood;
        }

        let mut seen = HashSet::new();
        seen.insert(v);
        for n in self.vertex_neighbors(v) {
            if seen.insert(n) {
                neighborhood.push(n);
            }
        }

        let mut frontier_start = 0;
        for _ in 1..rings {
            let frontier_end = neighborhood.len();
            for i in frontier_start..frontier_end {
                let u = neighborhood[i];
                for n in self.vertex_neighbors(u) {
                    if seen.insert(n) {
                        neighborhood.push(n);
                    }
                }
            }
            frontier_start = frontier_end;
        }

        neighborhood
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;
    use nalgebra::Point3;

    /// Four triangles fanned around a centre vertex (index 4). The centre
    /// is interior; the square corners are boundary vertices.
    fn fan_mesh() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
        ];
        let faces = vec![[4, 0, 1], [4, 1, 2], [4, 2, 3], [4, 3, 0]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    fn square_mesh() -> TriMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3]];
        build_from_triangles(&vertices, &faces).unwrap()
    }

    #[test]
    fn test_triangle_vertex_consistency() {
        let mesh = fan_mesh();
        for t in mesh.triangle_ids() {
            let [v1, v2, v3] = mesh.triangle_vertices(t);
            assert!(v1.is_valid() && v2.is_valid() && v3.is_valid());
            assert!(v1 != v2 && v2 != v3 && v1 != v3);

            // Each pair of consecutive edges shares exactly one vertex.
            let tri = *mesh.triangle(t);
            for (a, b) in [(tri.e1, tri.e2), (tri.e2, tri.e3), (tri.e3, tri.e1)] {
                let shared = mesh.common_vertex(a, b);
                assert!(shared.is_valid());
                let ea = *mesh.edge(a);
                let eb = *mesh.edge(b);
                let both = [ea.v1, ea.v2]
                    .iter()
                    .filter(|&&x| eb.has_vertex(x))
                    .count();
                assert_eq!(both, 1);
            }
        }
    }

    #[test]
    fn test_interior_one_ring_closure() {
        let mesh = fan_mesh();
        let center = VertexId::new(4);

        let ring = mesh.vertex_edges(center);
        let triangles = mesh.vertex_triangles(center);
        assert_eq!(ring.len(), 4);
        assert_eq!(triangles.len(), 4);
        assert!(!mesh.is_boundary_vertex(center));

        // Walking left triangles around the ring returns to the start:
        // each edge's successor in the fan is the next list entry.
        for (i, &e) in ring.iter().enumerate() {
            let far = mesh.opposite_vertex(e, center);
            let left = mesh.left_triangle(e, center);
            assert!(left.is_valid());
            let next = mesh.opposite_edge(left, far);
            assert_eq!(next, ring[(i + 1) % ring.len()]);
        }
    }

    #[test]
    fn test_boundary_one_ring_is_open_fan() {
        let mesh = fan_mesh();
        let corner = VertexId::new(0);

        let ring = mesh.vertex_edges(corner);
        // Corner 0 touches edges to vertices 1, 4 and 3.
        assert_eq!(ring.len(), 3);
        assert!(mesh.is_boundary_vertex(corner));

        // The fan is ordered boundary edge → interior → boundary edge.
        assert!(mesh.is_boundary_edge(ring[0]));
        assert!(!mesh.is_boundary_edge(ring[1]));
        assert!(mesh.is_boundary_edge(ring[2]));

        // Two incident triangles, one per wedge.
        assert_eq!(mesh.vertex_triangles(corner).len(), 2);
    }

    #[test]
    fn test_isolated_vertex_ring_is_empty() {
        let mut mesh = fan_mesh();
        let lone = mesh.add_vertex(Point3::new(9.0, 9.0, 9.0));
        assert!(mesh.vertex_edges(lone).is_empty());
        assert!(mesh.vertex_neighbors(lone).is_empty());
        assert!(mesh.is_boundary_vertex(lone));
    }

    #[test]
    fn test_left_and_right_triangle_partition() {
        let mesh = square_mesh();
        let diagonal = mesh.common_edge(VertexId::new(0), VertexId::new(2));
        assert!(diagonal.is_valid());

        let v0 = VertexId::new(0);
        let left = mesh.left_triangle(diagonal, v0);
        let right = mesh.right_triangle(diagonal, v0);
        assert!(left.is_valid());
        assert!(right.is_valid());
        assert_ne!(left, right);

        // Relative to the opposite endpoint the roles swap.
        let v2 = VertexId::new(2);
        assert_eq!(mesh.left_triangle(diagonal, v2), right);
        assert_eq!(mesh.right_triangle(diagonal, v2), left);

        // Crossing the edge from one triangle lands in the other.
        assert_eq!(mesh.opposite_triangle(diagonal, left), right);
    }

    #[test]
    fn test_common_edge_misses() {
        let mesh = square_mesh();
        // 1 and 3 are opposite corners with no connecting edge.
        assert!(!mesh.common_edge(VertexId::new(1), VertexId::new(3)).is_valid());
    }

    #[test]
    fn test_triangle_by_vertices() {
        let mesh = square_mesh();
        let t = mesh.triangle_by_vertices(VertexId::new(0), VertexId::new(1), VertexId::new(2));
        assert_eq!(t, TriangleId::new(0));
        let missing =
            mesh.triangle_by_vertices(VertexId::new(0), VertexId::new(1), VertexId::new(3));
        assert!(!missing.is_valid());
    }

    #[test]
    fn test_opposite_edge_and_vertex() {
        let mesh = square_mesh();
        let t = TriangleId::new(0); // (0, 1, 2)
        let e = mesh.opposite_edge(t, VertexId::new(0));
        assert!(e.is_valid());
        let edge = mesh.edge(e);
        assert!(edge.has_vertex(VertexId::new(1)) && edge.has_vertex(VertexId::new(2)));
        assert_eq!(mesh.triangle_opposite_vertex(t, e), VertexId::new(0));
    }

    #[test]
    fn test_vertex_neighborhood_rings() {
        let mesh = fan_mesh();
        let corner = VertexId::new(0);

        let one_ring = mesh.vertex_neighborhood(corner, 1);
        assert_eq!(one_ring.len(), 3); // 1, 4, 3

        let two_rings = mesh.vertex_neighborhood(corner, 2);
        assert_eq!(two_rings.len(), 4); // vertex 2 joins in the second ring

        assert!(mesh.vertex_neighborhood(corner, 0).is_empty());
    }

    #[test]
    fn test_triangles_of_vertices() {
        let mesh = fan_mesh();
        let all = mesh.triangles_of_vertices(&[VertexId::new(4)]);
        assert_eq!(all.len(), 4);

        let some = mesh.triangles_of_vertices(&[VertexId::new(0)]);
        assert_eq!(some.len(), 2);
    }
}
