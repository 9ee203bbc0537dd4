//! Mesh construction utilities.
//!
//! This module builds a [`TriMesh`] from face-vertex lists, the shape in
//! which mesh files and external triangulators deliver geometry.
//!
//! Construction works the way the loaders expect: all vertices go in
//! first, then each face looks its three edges up in a per-vertex
//! incident-edge index, creating an edge only the first time the
//! (unordered) vertex pair is seen. An edge accepts at most two incident
//! triangles; a third is a hard
//! [`NonManifoldEdge`](MeshError::NonManifoldEdge) error.
//!
//! After building, loaders are expected to call
//! [`TriMesh::orient_triangles_coherently`] and then
//! [`TriMesh::compute_properties`], in that order (see [`crate::io`]).

use nalgebra::Point3;

use crate::error::{MeshError, Result};

use super::index::{EdgeId, VertexId};
use super::TriMesh;

/// Build a mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as `[v0, v1, v2]` indices
///
/// # Example
/// ```
/// use sliver::mesh::{build_from_triangles, TriMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_edges(), 3);
/// assert_eq!(mesh.num_triangles(), 1);
/// ```
pub fn build_from_triangles(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<TriMesh> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex {
                    face: fi,
                    vertex: vi,
                });
            }
        }
        if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    let mut mesh = TriMesh::with_capacity(vertices.len(), faces.len());
    for &pos in vertices {
        mesh.add_vertex(pos);
    }

    let mut incident: Vec<Vec<EdgeId>> = vec![Vec::new(); vertices.len()];
    link_faces(&mut mesh, faces, &mut incident)?;

    Ok(mesh)
}

/// Convert a mesh back to a face-vertex representation.
///
/// Returns a (vertices, faces) tuple.
pub fn to_face_vertex(mesh: &TriMesh) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f64>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let faces: Vec<[usize; 3]> = mesh
        .triangle_ids()
        .map(|t| {
            let [v1, v2, v3] = mesh.triangle_vertices(t);
            [v1.index(), v2.index(), v3.index()]
        })
        .collect();

    (vertices, faces)
}

/// Output of an external planar triangulation backend.
///
/// The backend receives a polygon (outer boundary, holes, constraints) and
/// hands back a flat triangle list over the point set it was given plus any
/// Steiner points it had to insert. The crate does not triangulate; it only
/// knows how to splice such a result into an existing mesh.
#[derive(Debug, Clone, Default)]
pub struct TriangulationResult {
    /// Steiner points inserted by the backend, appended to the mesh as new
    /// vertices in order.
    pub added_points: Vec<Point3<f64>>,

    /// Triangles as indices into the mesh's vertex arena; indices at or
    /// past the pre-existing vertex count address `added_points`.
    pub triangles: Vec<[usize; 3]>,
}

impl TriMesh {
    /// Splice a triangulation backend's output into this mesh.
    ///
    /// Appends the Steiner points as vertices and links every triangle
    /// through the same edge-deduplicating procedure the loaders use.
    /// Existing edges are reused; a triangle that would give an edge a
    /// third incidence aborts with
    /// [`NonManifoldEdge`](MeshError::NonManifoldEdge). A failed splice
    /// leaves the mesh partially extended — callers treat it as poisoned,
    /// matching the no-partial-success policy of bulk loads.
    pub fn insert_triangulation(&mut self, result: &TriangulationResult) -> Result<()> {
        for &p in &result.added_points {
            self.add_vertex(p);
        }

        for (fi, face) in result.triangles.iter().enumerate() {
            for &vi in face {
                if vi >= self.num_vertices() {
                    return Err(MeshError::InvalidVertexIndex {
                        face: fi,
                        vertex: vi,
                    });
                }
            }
        }

        // Index the edges already present so the new triangles reuse them.
        let mut incident: Vec<Vec<EdgeId>> = vec![Vec::new(); self.num_vertices()];
        for (eid, e) in self.edges() {
            incident[e.v1.index()].push(eid);
        }

        link_faces(self, &result.triangles, &mut incident)
    }
}

/// Look up or create the three edges of each face and link the triangles.
///
/// `incident` maps each vertex to the edges recorded under it; an edge is
/// listed under the first endpoint it was created from, so lookups probe
/// both endpoints' lists.
fn link_faces(
    mesh: &mut TriMesh,
    faces: &[[usize; 3]],
    incident: &mut [Vec<EdgeId>],
) -> Result<()> {
    for face in faces {
        let va = VertexId::new(face[0]);
        let vb = VertexId::new(face[1]);
        let vc = VertexId::new(face[2]);

        let e1 = lookup_or_create(mesh, incident, va, vb);
        let e2 = lookup_or_create(mesh, incident, vb, vc);
        let e3 = lookup_or_create(mesh, incident, vc, va);

        mesh.vertex_mut(va).edge = e1;
        mesh.vertex_mut(vb).edge = e2;
        mesh.vertex_mut(vc).edge = e3;

        let t = mesh.add_triangle(e1, e2, e3);
        for e in [e1, e2, e3] {
            if !mesh.edge_mut(e).link_triangle(t) {
                let edge = mesh.edge(e);
                return Err(MeshError::NonManifoldEdge {
                    v1: edge.v1.index(),
                    v2: edge.v2.index(),
                });
            }
        }
    }

    Ok(())
}

/// Find the undirected edge between `a` and `b`, creating it under `a`'s
/// incident list when it is seen for the first time.
fn lookup_or_create(
    mesh: &mut TriMesh,
    incident: &mut [Vec<EdgeId>],
    a: VertexId,
    b: VertexId,
) -> EdgeId {
    for &e in &incident[a.index()] {
        if mesh.edge(e).has_vertex(b) {
            return e;
        }
    }
    for &e in &incident[b.index()] {
        if mesh.edge(e).has_vertex(a) {
            return e;
        }
    }
    let e = mesh.add_edge(a, b);
    incident[a.index()].push(e);
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::TriangleId;

    fn single_triangle() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2]];
        (vertices, faces)
    }

    fn unit_square() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3]];
        (vertices, faces)
    }

    #[test]
    fn test_single_triangle() {
        let (vertices, faces) = single_triangle();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_edges(), 3);
        assert_eq!(mesh.num_triangles(), 1);
        assert!(mesh.is_valid());

        for v in mesh.vertex_ids() {
            assert!(mesh.is_boundary_vertex(v));
        }
    }

    #[test]
    fn test_unit_square_scenario() {
        // Two triangles sharing the diagonal: 5 edges total, and the
        // diagonal is the one interior edge.
        let (vertices, faces) = unit_square();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_edges(), 5);
        assert_eq!(mesh.num_triangles(), 2);
        assert!(mesh.is_valid());

        let diagonal = mesh.common_edge(VertexId::new(0), VertexId::new(2));
        assert!(diagonal.is_valid());
        let e = mesh.edge(diagonal);
        assert!(e.t1.is_valid());
        assert!(e.t2.is_valid());

        assert!((mesh.edge_length(diagonal) - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_edge_dedup_is_first_seen() {
        let (vertices, faces) = unit_square();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        // The diagonal was created by face 0 as (2, 0) and reused by
        // face 1; endpoints keep their original order.
        let diagonal = mesh.common_edge(VertexId::new(0), VertexId::new(2));
        let e = mesh.edge(diagonal);
        assert_eq!(e.v1, VertexId::new(2));
        assert_eq!(e.v2, VertexId::new(0));
        assert_eq!(e.t1, TriangleId::new(0));
        assert_eq!(e.t2, TriangleId::new(1));
    }

    #[test]
    fn test_empty_faces_rejected() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let result = build_from_triangles(&vertices, &[]);
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 2]];
        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = single_triangle();
        let faces = vec![[0, 0, 2]];
        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_third_triangle_on_edge_rejected() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        // Three triangles all claiming edge (0, 1).
        let faces = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]];
        let result = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MeshError::NonManifoldEdge { .. })));
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = unit_square();
        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);

        assert_eq!(vertices.len(), out_verts.len());
        assert_eq!(faces.len(), out_faces.len());

        for (v_in, v_out) in vertices.iter().zip(out_verts.iter()) {
            assert!((v_in - v_out).norm() < 1e-10);
        }

        // Rebuilding from the extracted lists gives the same topology.
        let rebuilt = build_from_triangles(&out_verts, &out_faces).unwrap();
        assert_eq!(rebuilt.num_edges(), mesh.num_edges());
        assert!(rebuilt.is_valid());
    }

    #[test]
    fn test_insert_triangulation() {
        // Start from one triangle and splice in a backend result that
        // fills the rest of a square with a Steiner point in the middle.
        let (vertices, _) = unit_square();
        let mut mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();

        let result = TriangulationResult {
            added_points: vec![Point3::new(0.4, 0.6, 0.0)],
            triangles: vec![[0, 2, 4], [2, 3, 4], [3, 0, 4]],
        };
        mesh.insert_triangulation(&result).unwrap();

        assert_eq!(mesh.num_vertices(), 5);
        assert_eq!(mesh.num_triangles(), 4);
        assert!(mesh.is_valid());

        // The pre-existing edge (2, 0) was reused, not duplicated.
        let diagonal = mesh.common_edge(VertexId::new(0), VertexId::new(2));
        let e = mesh.edge(diagonal);
        assert!(e.t1.is_valid() && e.t2.is_valid());
    }

    #[test]
    fn test_insert_triangulation_rejects_bad_index() {
        let (vertices, _) = unit_square();
        let mut mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();

        let result = TriangulationResult {
            added_points: vec![],
            triangles: vec![[0, 2, 9]],
        };
        assert!(matches!(
            mesh.insert_triangulation(&result),
            Err(MeshError::InvalidVertexIndex { .. })
        ));
    }
}
