//! Edge collapse.
//!
//! Contracts an edge `(v1, v2)` into `v1`, removing the edge and its two
//! incident triangles and re-routing all of `v2`'s remaining edges to `v1`.
//!
//! Two safety gates protect the mesh:
//!
//! - the **link condition** (exactly two vertices adjacent to both
//!   endpoints) is checked up front; violating configurations would produce
//!   a non-manifold result, so the collapse is refused before any mutation;
//! - after rewiring, the normals of every surviving triangle that touched
//!   either endpoint are compared against their pre-collapse values; if any
//!   flipped, the whole rewiring is rolled back and the collapse is
//!   refused.
//!
//! Both refusals are defined no-op outcomes: the mesh is left exactly as it
//! was. A successful collapse does not remove anything immediately; the
//! dead elements are flagged [`TO_BE_REMOVED`](ElementFlags::TO_BE_REMOVED)
//! and reclaimed by the next [`TriMesh::compact`] pass.

use std::collections::HashSet;

use super::elements::{Edge, ElementFlags, Triangle, Vertex};
use super::index::{EdgeId, TriangleId, VertexId};
use super::TriMesh;

/// Result of an edge collapse attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseOutcome {
    /// The edge was contracted; dead elements are flagged for removal.
    Collapsed,
    /// The endpoints do not share exactly two neighbours (or the edge is
    /// on the boundary); collapsing would break the manifold. Nothing was
    /// changed.
    LinkConditionViolated,
    /// Contracting would have inverted a neighbouring triangle; the
    /// rewiring was rolled back and nothing is changed.
    WouldFlipNormal,
}

/// Pre-mutation copies of every element the collapse may touch.
struct Snapshot {
    vertices: Vec<(VertexId, Vertex)>,
    edges: Vec<(EdgeId, Edge)>,
    triangles: Vec<(TriangleId, Triangle)>,
}

impl Snapshot {
    fn restore(self, mesh: &mut TriMesh) {
        for (id, v) in self.vertices {
            *mesh.vertex_mut(id) = v;
        }
        for (id, e) in self.edges {
            *mesh.edge_mut(id) = e;
        }
        for (id, t) in self.triangles {
            *mesh.triangle_mut(id) = t;
        }
    }
}

impl TriMesh {
    /// Collapse `edge`, contracting its second endpoint into its first.
    ///
    /// On success the collapsed edge, its two incident triangles, the two
    /// interior border edges and the vanished vertex are flagged
    /// `TO_BE_REMOVED`; call [`compact`](Self::compact) to reclaim them.
    /// On refusal the mesh is untouched.
    pub fn collapse_edge(&mut self, edge: EdgeId) -> CollapseOutcome {
        let (v1, v2) = {
            let e = self.edge(edge);
            (e.v1, e.v2)
        };

        // Link condition: the endpoints must share exactly the two fan
        // vertices of the triangles being removed.
        let n1: HashSet<VertexId> = self
            .vertex_neighbors(v1)
            .into_iter()
            .filter(|&n| n != v2)
            .collect();
        let n2: HashSet<VertexId> = self
            .vertex_neighbors(v2)
            .into_iter()
            .filter(|&n| n != v1)
            .collect();
        if n1.intersection(&n2).count() != 2 {
            return CollapseOutcome::LinkConditionViolated;
        }

        // An incoherently oriented pair can resolve to the same triangle
        // on both sides; refuse rather than rewire garbage.
        let lt = self.left_triangle(edge, v1);
        let rt = self.right_triangle(edge, v1);
        if !lt.is_valid() || !rt.is_valid() || lt == rt {
            return CollapseOutcome::LinkConditionViolated;
        }

        let vl = self.triangle_opposite_vertex(lt, edge);
        let vr = self.triangle_opposite_vertex(rt, edge);

        // The four edges bordering the doomed triangles. b1/b3 vanish with
        // them; b2/b4 survive and inherit their outward neighbours.
        let b1 = self.opposite_edge(lt, v1); // (v2, vl)
        let b2 = self.opposite_edge(lt, v2); // (v1, vl)
        let b3 = self.opposite_edge(rt, v1); // (v2, vr)
        let b4 = self.opposite_edge(rt, v2); // (v1, vr)

        let b1_outward = self.opposite_triangle(b1, lt);
        let b3_outward = self.opposite_triangle(b3, rt);

        // Every surviving triangle touching an endpoint gets its normal
        // re-checked after the rewiring.
        let mut affected: Vec<TriangleId> = Vec::new();
        let mut seen = HashSet::new();
        for t in self
            .vertex_triangles(v1)
            .into_iter()
            .chain(self.vertex_triangles(v2))
        {
            if t != lt && t != rt && seen.insert(t) {
                affected.push(t);
            }
        }
        let normals_before: Vec<_> = affected
            .iter()
            .map(|&t| self.triangle_normal_raw(t))
            .collect();

        let v2_edges = self.vertex_edges(v2);

        // Snapshot everything the rewiring can touch, so a flip detection
        // can restore the exact prior state.
        let mut snapshot = Snapshot {
            vertices: [v1, v2, vl, vr]
                .iter()
                .map(|&v| (v, self.vertex(v).clone()))
                .collect(),
            edges: v2_edges
                .iter()
                .chain([b2, b4].iter())
                .map(|&e| (e, *self.edge(e)))
                .collect(),
            triangles: Vec::new(),
        };
        for t in [b1_outward, b3_outward] {
            if t.is_valid() {
                snapshot.triangles.push((t, *self.triangle(t)));
            }
        }

        // Re-route v2's remaining edges to v1.
        for &ve in &v2_edges {
            if ve != edge && ve != b1 && ve != b3 {
                self.edge_mut(ve).replace_vertex(v2, v1);
            }
        }

        // Bypass the doomed triangles: the surviving border edges adopt
        // the outward neighbours of the vanishing ones.
        self.edge_mut(b2).replace_triangle(lt, b1_outward);
        if b1_outward.is_valid() {
            self.triangle_mut(b1_outward).replace_edge(b1, b2);
        }
        self.edge_mut(b4).replace_triangle(rt, b3_outward);
        if b3_outward.is_valid() {
            self.triangle_mut(b3_outward).replace_edge(b3, b4);
        }

        // Entry edges of the surviving corner vertices may have pointed at
        // a removed edge.
        self.vertex_mut(v1).edge = b2;
        self.vertex_mut(vl).edge = b2;
        self.vertex_mut(vr).edge = b4;

        // Geometric validation: refuse any collapse that inverts a
        // neighbouring triangle.
        let flipped = affected
            .iter()
            .zip(&normals_before)
            .any(|(&t, before)| before.dot(&self.triangle_normal_raw(t)) <= 0.0);
        if flipped {
            snapshot.restore(self);
            return CollapseOutcome::WouldFlipNormal;
        }

        self.vertex_mut(v2).flags.insert(ElementFlags::TO_BE_REMOVED);
        for e in [edge, b1, b3] {
            self.edge_mut(e).flags.insert(ElementFlags::TO_BE_REMOVED);
        }
        for t in [lt, rt] {
            self.triangle_mut(t)
                .flags
                .insert(ElementFlags::TO_BE_REMOVED);
        }

        CollapseOutcome::Collapsed
    }
}
