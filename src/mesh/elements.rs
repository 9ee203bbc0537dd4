//! Mesh element types.
//!
//! A [`TriMesh`](super::TriMesh) is built from three element kinds:
//!
//! - [`Vertex`]: a position plus one incident edge (`edge`, the classic
//!   `e0`), the entry point of every one-ring walk.
//! - [`Edge`]: two endpoint vertices and up to two incident triangles.
//!   `t1`/`t2` carry no intrinsic left/right meaning; which triangle is
//!   "left" of an edge is always relative to a query vertex and computed
//!   by [`TriMesh::left_triangle`](super::TriMesh::left_triangle).
//! - [`Triangle`]: three edges forming a cycle. Its vertices are *derived*
//!   from consecutive-edge intersection, never stored, which is what keeps
//!   edge rewiring (collapse, compaction) from ever desynchronizing a
//!   triangle's corner list.
//!
//! Elements carry a small set of persistent [`ElementFlags`]. Flags that
//! the original-style algorithms would use as scratch space (visited marks,
//! boundary marks) are *not* part of this set: algorithms keep such state
//! in local arrays so that they are reentrant and cannot leave the mesh
//! dirty on an error path.

use nalgebra::Point3;

use super::index::{EdgeId, TriangleId, VertexId};

bitflags::bitflags! {
    /// Persistent per-element flags.
    ///
    /// These survive across algorithm invocations; nothing in the crate
    /// clears them behind the caller's back.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ElementFlags: u8 {
        /// Element selected by the caller (free for application use).
        const SELECTED = 1;
        /// Element consumed by a previous extraction; the shortest-path
        /// search can be told to avoid vertices carrying this flag.
        const USED = 1 << 1;
        /// Element lies on a hole boundary.
        const ON_HOLE = 1 << 2;
        /// Element is scheduled for removal by the next
        /// [`compact`](super::TriMesh::compact) pass.
        const TO_BE_REMOVED = 1 << 3;
    }
}

/// A vertex of the mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One incident edge, the starting point for one-ring walks.
    /// Invalid for isolated vertices.
    pub edge: EdgeId,

    /// Persistent flags.
    pub flags: ElementFlags,
}

impl Vertex {
    /// Create a new, not yet connected vertex at the given position.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            edge: EdgeId::invalid(),
            flags: ElementFlags::empty(),
        }
    }

    /// Create a new vertex from coordinates.
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Whether this vertex has no incident edge.
    #[inline]
    pub fn is_isolated(&self) -> bool {
        !self.edge.is_valid()
    }
}

/// An edge connecting two vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// First endpoint.
    pub v1: VertexId,
    /// Second endpoint.
    pub v2: VertexId,
    /// First incident triangle (invalid on the boundary side).
    pub t1: TriangleId,
    /// Second incident triangle (invalid on the boundary side).
    pub t2: TriangleId,
    /// Persistent flags.
    pub flags: ElementFlags,
}

impl Edge {
    /// Create a new edge between two vertices, with no incident triangles.
    pub fn new(v1: VertexId, v2: VertexId) -> Self {
        Self {
            v1,
            v2,
            t1: TriangleId::invalid(),
            t2: TriangleId::invalid(),
            flags: ElementFlags::empty(),
        }
    }

    /// Whether `v` is one of this edge's endpoints.
    #[inline]
    pub fn has_vertex(&self, v: VertexId) -> bool {
        self.v1 == v || self.v2 == v
    }

    /// The endpoint opposite to `v`, or invalid if `v` is not an endpoint.
    #[inline]
    pub fn opposite_vertex(&self, v: VertexId) -> VertexId {
        if self.v1 == v {
            self.v2
        } else if self.v2 == v {
            self.v1
        } else {
            VertexId::invalid()
        }
    }

    /// Replace endpoint `from` with `to`. Returns false if `from` is not
    /// an endpoint.
    pub fn replace_vertex(&mut self, from: VertexId, to: VertexId) -> bool {
        if self.v1 == from {
            self.v1 = to;
            true
        } else if self.v2 == from {
            self.v2 = to;
            true
        } else {
            false
        }
    }

    /// Whether `t` is one of this edge's incident triangles.
    #[inline]
    pub fn has_triangle(&self, t: TriangleId) -> bool {
        (self.t1.is_valid() && self.t1 == t) || (self.t2.is_valid() && self.t2 == t)
    }

    /// The incident triangle on the other side of `t`, or invalid.
    #[inline]
    pub fn opposite_triangle(&self, t: TriangleId) -> TriangleId {
        if self.t1 == t {
            self.t2
        } else if self.t2 == t {
            self.t1
        } else {
            TriangleId::invalid()
        }
    }

    /// Replace incident triangle `from` with `to`. Returns false if `from`
    /// is not incident.
    pub fn replace_triangle(&mut self, from: TriangleId, to: TriangleId) -> bool {
        if self.t1 == from {
            self.t1 = to;
            true
        } else if self.t2 == from {
            self.t2 = to;
            true
        } else {
            false
        }
    }

    /// Link a triangle into the first free incidence slot. Returns false
    /// if both slots are taken (non-manifold configuration).
    pub fn link_triangle(&mut self, t: TriangleId) -> bool {
        if !self.t1.is_valid() {
            self.t1 = t;
            true
        } else if !self.t2.is_valid() {
            self.t2 = t;
            true
        } else {
            false
        }
    }

    /// Whether this edge borders at most one triangle.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.t1.is_valid() || !self.t2.is_valid()
    }
}

/// A triangle defined by its three edges.
///
/// Consecutive edges share exactly one vertex: `e1`∩`e2` = V2,
/// `e2`∩`e3` = V3, `e3`∩`e1` = V1. Orientation is encoded by the edge
/// order; swapping `e2` and `e3` flips it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First edge (V1 → V2).
    pub e1: EdgeId,
    /// Second edge (V2 → V3).
    pub e2: EdgeId,
    /// Third edge (V3 → V1).
    pub e3: EdgeId,
    /// Persistent flags.
    pub flags: ElementFlags,
}

impl Triangle {
    /// Create a new triangle over three edges.
    pub fn new(e1: EdgeId, e2: EdgeId, e3: EdgeId) -> Self {
        Self {
            e1,
            e2,
            e3,
            flags: ElementFlags::empty(),
        }
    }

    /// Whether `e` is one of this triangle's edges.
    #[inline]
    pub fn has_edge(&self, e: EdgeId) -> bool {
        self.e1 == e || self.e2 == e || self.e3 == e
    }

    /// The edge after `e` in the cycle, or invalid if `e` is not here.
    #[inline]
    pub fn next_edge(&self, e: EdgeId) -> EdgeId {
        if e == self.e1 {
            self.e2
        } else if e == self.e2 {
            self.e3
        } else if e == self.e3 {
            self.e1
        } else {
            EdgeId::invalid()
        }
    }

    /// The edge before `e` in the cycle, or invalid if `e` is not here.
    #[inline]
    pub fn prev_edge(&self, e: EdgeId) -> EdgeId {
        if e == self.e1 {
            self.e3
        } else if e == self.e2 {
            self.e1
        } else if e == self.e3 {
            self.e2
        } else {
            EdgeId::invalid()
        }
    }

    /// Replace edge `from` with `to`. Returns false if `from` is not one
    /// of the three edges.
    pub fn replace_edge(&mut self, from: EdgeId, to: EdgeId) -> bool {
        if self.e1 == from {
            self.e1 = to;
            true
        } else if self.e2 == from {
            self.e2 = to;
            true
        } else if self.e3 == from {
            self.e3 = to;
            true
        } else {
            false
        }
    }

    /// Flip this triangle's orientation by swapping `e2` and `e3`.
    #[inline]
    pub fn orient(&mut self) {
        std::mem::swap(&mut self.e2, &mut self.e3);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_isolated() {
        let v = Vertex::from_coords(1.0, 2.0, 3.0);
        assert_eq!(v.position, Point3::new(1.0, 2.0, 3.0));
        assert!(v.is_isolated());
    }

    #[test]
    fn test_edge_opposite_vertex() {
        let e = Edge::new(VertexId::new(3), VertexId::new(8));
        assert_eq!(e.opposite_vertex(VertexId::new(3)), VertexId::new(8));
        assert_eq!(e.opposite_vertex(VertexId::new(8)), VertexId::new(3));
        assert!(!e.opposite_vertex(VertexId::new(5)).is_valid());
    }

    #[test]
    fn test_edge_triangle_cap() {
        let mut e = Edge::new(VertexId::new(0), VertexId::new(1));
        assert!(e.link_triangle(TriangleId::new(0)));
        assert!(e.link_triangle(TriangleId::new(1)));
        // Third incidence is refused: 2-manifold cap.
        assert!(!e.link_triangle(TriangleId::new(2)));
        assert!(!e.is_boundary());
    }

    #[test]
    fn test_triangle_edge_cycle() {
        let t = Triangle::new(EdgeId::new(0), EdgeId::new(1), EdgeId::new(2));
        assert_eq!(t.next_edge(EdgeId::new(0)), EdgeId::new(1));
        assert_eq!(t.next_edge(EdgeId::new(2)), EdgeId::new(0));
        assert_eq!(t.prev_edge(EdgeId::new(0)), EdgeId::new(2));
        assert!(!t.next_edge(EdgeId::new(9)).is_valid());
    }

    #[test]
    fn test_triangle_orient_swaps() {
        let mut t = Triangle::new(EdgeId::new(0), EdgeId::new(1), EdgeId::new(2));
        t.orient();
        assert_eq!(t.e2, EdgeId::new(2));
        assert_eq!(t.e3, EdgeId::new(1));
    }

    #[test]
    fn test_flags() {
        let mut v = Vertex::from_coords(0.0, 0.0, 0.0);
        assert!(v.flags.is_empty());
        v.flags.insert(ElementFlags::USED);
        assert!(v.flags.contains(ElementFlags::USED));
        v.flags.remove(ElementFlags::USED);
        assert!(v.flags.is_empty());
    }
}
