//! The triangle mesh container.
//!
//! [`TriMesh`] owns three dense arenas (vertices, edges, triangles) and all
//! cross-references between elements are typed indices into those arenas.
//! Elements are created exclusively through the mesh's factory methods and
//! removed in two phases: algorithms flag elements
//! [`TO_BE_REMOVED`](ElementFlags::TO_BE_REMOVED), and a later
//! [`compact`](TriMesh::compact) pass drops every flagged element, renumbers
//! the arenas, and rewrites all cross-references.
//!
//! The mesh also carries cached aggregate properties (bounding box, edge
//! length range) and a lazily built KD-tree over vertex positions for
//! nearest-neighbour queries. Neither cache is invalidated automatically by
//! structural edits; callers re-run [`TriMesh::compute_properties`] /
//! [`TriMesh::init_spatial_index`] after bulk mutations.

use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::{Point3, Vector3};

use crate::geom;

use super::elements::{Edge, ElementFlags, Triangle, Vertex};
use super::index::{EdgeId, TriangleId, VertexId};

/// Slack accepted on barycentric coordinates when classifying a point
/// against a triangle.
const BARYCENTRIC_EPSILON: f64 = 1e-6;

/// A triangle mesh with explicit vertex/edge/triangle adjacency.
pub struct TriMesh {
    /// All vertices in the mesh.
    pub(crate) vertices: Vec<Vertex>,

    /// All edges in the mesh.
    pub(crate) edges: Vec<Edge>,

    /// All triangles in the mesh.
    pub(crate) triangles: Vec<Triangle>,

    /// Cached axis-aligned bounding box (min, max corners).
    aabb: Option<(Point3<f64>, Point3<f64>)>,

    /// Cached (shortest, longest) edge length.
    edge_length_range: Option<(f64, f64)>,

    /// Lazily built KD-tree over vertex positions.
    spatial: Option<KdTree<f64, 3>>,
}

impl Default for TriMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TriMesh {
    fn clone(&self) -> Self {
        // The spatial index is rebuilt on demand rather than cloned.
        Self {
            vertices: self.vertices.clone(),
            edges: self.edges.clone(),
            triangles: self.triangles.clone(),
            aabb: self.aabb,
            edge_length_range: self.edge_length_range,
            spatial: None,
        }
    }
}

impl std::fmt::Debug for TriMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriMesh")
            .field("vertices", &self.vertices.len())
            .field("edges", &self.edges.len())
            .field("triangles", &self.triangles.len())
            .finish()
    }
}

impl TriMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            triangles: Vec::new(),
            aabb: None,
            edge_length_range: None,
            spatial: None,
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_triangles: usize) -> Self {
        // E ≈ 3F/2 for a closed mesh, a little more with boundary.
        let num_edges = num_triangles + num_triangles / 2 + 3;
        Self {
            vertices: Vec::with_capacity(num_vertices),
            edges: Vec::with_capacity(num_edges),
            triangles: Vec::with_capacity(num_triangles),
            aabb: None,
            edge_length_range: None,
            spatial: None,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Get a vertex by id. Panics on an out-of-range id; use
    /// [`get_vertex`](Self::get_vertex) for a checked lookup.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by id.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.index()]
    }

    /// Checked vertex lookup; `None` for invalid or out-of-range ids.
    #[inline]
    pub fn get_vertex(&self, id: VertexId) -> Option<&Vertex> {
        if id.is_valid() {
            self.vertices.get(id.index())
        } else {
            None
        }
    }

    /// Get an edge by id. Panics on an out-of-range id; use
    /// [`get_edge`](Self::get_edge) for a checked lookup.
    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Get a mutable edge by id.
    #[inline]
    pub fn edge_mut(&mut self, id: EdgeId) -> &mut Edge {
        &mut self.edges[id.index()]
    }

    /// Checked edge lookup; `None` for invalid or out-of-range ids.
    #[inline]
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        if id.is_valid() {
            self.edges.get(id.index())
        } else {
            None
        }
    }

    /// Get a triangle by id. Panics on an out-of-range id; use
    /// [`get_triangle`](Self::get_triangle) for a checked lookup.
    #[inline]
    pub fn triangle(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id.index()]
    }

    /// Get a mutable triangle by id.
    #[inline]
    pub fn triangle_mut(&mut self, id: TriangleId) -> &mut Triangle {
        &mut self.triangles[id.index()]
    }

    /// Checked triangle lookup; `None` for invalid or out-of-range ids.
    #[inline]
    pub fn get_triangle(&self, id: TriangleId) -> Option<&Triangle> {
        if id.is_valid() {
            self.triangles.get(id.index())
        } else {
            None
        }
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// Set the position of a vertex.
    #[inline]
    pub fn set_position(&mut self, v: VertexId, pos: Point3<f64>) {
        self.vertex_mut(v).position = pos;
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex ids.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their ids.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all edge ids.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all edges with their ids.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e))
    }

    /// Iterate over all triangle ids.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId> + '_ {
        (0..self.triangles.len()).map(TriangleId::new)
    }

    /// Iterate over all triangles with their ids.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId, &Triangle)> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .map(|(i, t)| (TriangleId::new(i), t))
    }

    // ==================== Factories ====================

    /// Add a new vertex and return its id.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        id
    }

    /// Add a new edge between two vertices and return its id.
    ///
    /// The edge starts with no incident triangles; linking is the builder's
    /// job (see [`build_from_triangles`](super::build_from_triangles)).
    pub fn add_edge(&mut self, v1: VertexId, v2: VertexId) -> EdgeId {
        let id = EdgeId::new(self.edges.len());
        self.edges.push(Edge::new(v1, v2));
        id
    }

    /// Add a new triangle over three edges and return its id.
    ///
    /// The edges' incidence slots are not touched; linking is the builder's
    /// job.
    pub fn add_triangle(&mut self, e1: EdgeId, e2: EdgeId, e3: EdgeId) -> TriangleId {
        let id = TriangleId::new(self.triangles.len());
        self.triangles.push(Triangle::new(e1, e2, e3));
        id
    }

    // ==================== Geometry ====================

    /// Compute the length of an edge.
    pub fn edge_length(&self, e: EdgeId) -> f64 {
        let edge = self.edge(e);
        (self.position(edge.v1) - self.position(edge.v2)).norm()
    }

    /// Compute the midpoint of an edge.
    pub fn edge_midpoint(&self, e: EdgeId) -> Point3<f64> {
        let edge = self.edge(e);
        let p1 = self.position(edge.v1);
        let p2 = self.position(edge.v2);
        Point3::from((p1.coords + p2.coords) * 0.5)
    }

    /// Get the positions of a triangle's three (derived) vertices.
    pub fn triangle_positions(&self, t: TriangleId) -> [Point3<f64>; 3] {
        let [v1, v2, v3] = self.triangle_vertices(t);
        [*self.position(v1), *self.position(v2), *self.position(v3)]
    }

    /// Compute the raw (area-weighted, unnormalized) normal of a triangle.
    pub fn triangle_normal_raw(&self, t: TriangleId) -> Vector3<f64> {
        let [p1, p2, p3] = self.triangle_positions(t);
        (p2 - p1).cross(&(p3 - p2))
    }

    /// Compute the unit normal of a triangle.
    pub fn triangle_normal(&self, t: TriangleId) -> Vector3<f64> {
        self.triangle_normal_raw(t).normalize()
    }

    /// Compute the area of a triangle.
    pub fn triangle_area(&self, t: TriangleId) -> f64 {
        0.5 * self.triangle_normal_raw(t).norm()
    }

    /// Compute the centroid of a triangle.
    pub fn triangle_centroid(&self, t: TriangleId) -> Point3<f64> {
        let [p1, p2, p3] = self.triangle_positions(t);
        Point3::from((p1.coords + p2.coords + p3.coords) / 3.0)
    }

    /// Compute the normal at a vertex as the normalized mean of its
    /// incident triangle normals.
    pub fn vertex_normal(&self, v: VertexId) -> Vector3<f64> {
        let mut normal = Vector3::zeros();
        for t in self.vertex_triangles(v) {
            normal += self.triangle_normal(t);
        }
        normal.normalize()
    }

    /// Project a point onto a triangle's plane.
    pub fn project_on_triangle(&self, t: TriangleId, p: &Point3<f64>) -> Point3<f64> {
        let normal = self.triangle_normal(t);
        let origin = self.triangle_centroid(t);
        p - normal * (p - origin).dot(&normal)
    }

    /// Compute the barycentric coordinates of `p` relative to a triangle.
    ///
    /// The coordinates are signed: a point outside the triangle (in its
    /// plane) gets one or more negative components. `p` is expected to lie
    /// in the triangle's plane; project it first otherwise.
    pub fn triangle_barycentric(&self, t: TriangleId, p: &Point3<f64>) -> [f64; 3] {
        let n = self.triangle_normal(t);
        let [a, b, c] = self.triangle_positions(t);
        let double_area = (b - a).cross(&(c - a)).norm();

        let pa = a - p;
        let pb = b - p;
        let pc = c - p;
        let signed = |cross: Vector3<f64>| {
            if n.dot(&cross) >= 0.0 {
                cross.norm() / double_area
            } else {
                -cross.norm() / double_area
            }
        };

        [
            signed(pb.cross(&pc)),
            signed(pc.cross(&pa)),
            signed(pa.cross(&pb)),
        ]
    }

    /// Whether `p` lies inside a triangle (within a small tolerance).
    pub fn triangle_contains_point(&self, t: TriangleId, p: &Point3<f64>) -> bool {
        let [alpha, beta, gamma] = self.triangle_barycentric(t, p);
        let about_one = 1.0 + BARYCENTRIC_EPSILON;
        alpha >= 0.0
            && alpha <= about_one
            && beta >= 0.0
            && beta <= about_one
            && gamma >= 0.0
            && gamma <= about_one
            && alpha + beta + gamma <= about_one
    }

    /// Distance from `p` to the closest point of a triangle.
    ///
    /// Projects onto the triangle's plane and clamps to the nearest edge
    /// or corner when the projection falls outside.
    pub fn triangle_distance_from_point(&self, t: TriangleId, p: &Point3<f64>) -> f64 {
        let projected = self.project_on_triangle(t, p);
        let [alpha, beta, gamma] = self.triangle_barycentric(t, &projected);
        let [a, b, c] = self.triangle_positions(t);

        let about_one = 1.0 + BARYCENTRIC_EPSILON;
        let inside = alpha >= 0.0
            && alpha <= about_one
            && beta >= 0.0
            && beta <= about_one
            && gamma >= 0.0
            && gamma <= about_one
            && alpha + beta + gamma <= about_one;

        let closest = if inside {
            projected
        } else if alpha >= 0.0 && beta < 0.0 && gamma < 0.0 {
            a
        } else if alpha < 0.0 && beta >= 0.0 && gamma < 0.0 {
            b
        } else if alpha < 0.0 && beta < 0.0 && gamma >= 0.0 {
            c
        } else if alpha >= 0.0 && beta >= 0.0 && gamma < 0.0 {
            geom::closest_point_on_segment(&projected, &a, &b)
        } else if alpha < 0.0 && beta >= 0.0 && gamma >= 0.0 {
            geom::closest_point_on_segment(&projected, &b, &c)
        } else {
            geom::closest_point_on_segment(&projected, &c, &a)
        };

        (p - closest).norm()
    }

    /// Compute the bounding box of the mesh.
    ///
    /// Returns `None` for an empty mesh. This always recomputes; see
    /// [`compute_properties`](Self::compute_properties) for the cached
    /// variant.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        if self.vertices.is_empty() {
            return None;
        }

        let mut min = self.vertices[0].position;
        let mut max = self.vertices[0].position;

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.triangle_ids().map(|t| self.triangle_area(t)).sum()
    }

    // ==================== Cached properties ====================

    /// Recompute and cache the bounding box and the edge length range.
    ///
    /// Loaders call this once after construction; callers doing structural
    /// edits call it again themselves.
    pub fn compute_properties(&mut self) {
        self.aabb = self.bounding_box();

        self.edge_length_range = if self.edges.is_empty() {
            None
        } else {
            let mut min = f64::MAX;
            let mut max = 0.0_f64;
            for e in self.edge_ids() {
                let len = self.edge_length(e);
                min = min.min(len);
                max = max.max(len);
            }
            Some((min, max))
        };
    }

    /// The min corner of the cached bounding box, if computed.
    pub fn min(&self) -> Option<Point3<f64>> {
        self.aabb.map(|(min, _)| min)
    }

    /// The max corner of the cached bounding box, if computed.
    pub fn max(&self) -> Option<Point3<f64>> {
        self.aabb.map(|(_, max)| max)
    }

    /// The cached length of the shortest edge, if computed.
    pub fn min_edge_length(&self) -> Option<f64> {
        self.edge_length_range.map(|(min, _)| min)
    }

    /// The cached length of the longest edge, if computed.
    pub fn max_edge_length(&self) -> Option<f64> {
        self.edge_length_range.map(|(_, max)| max)
    }

    /// The diagonal length of the cached bounding box, if computed.
    pub fn aabb_diagonal_length(&self) -> Option<f64> {
        self.aabb.map(|(min, max)| (max - min).norm())
    }

    // ==================== Removal ====================

    /// Drop every element flagged `TO_BE_REMOVED`, renumber the arenas,
    /// and rewrite all cross-references.
    ///
    /// Returns a [`CompactionMap`] from old to new vertex ids so that
    /// external consumers (annotations) can follow the renumbering. Cached
    /// properties and the spatial index are invalidated.
    pub fn compact(&mut self) -> CompactionMap {
        let keep = |flags: ElementFlags| !flags.contains(ElementFlags::TO_BE_REMOVED);

        // Triangles first: edges must forget removed incidences.
        let mut tri_map = vec![TriangleId::invalid(); self.triangles.len()];
        let mut kept_triangles = Vec::with_capacity(self.triangles.len());
        for (i, t) in self.triangles.iter().enumerate() {
            if keep(t.flags) {
                tri_map[i] = TriangleId::new(kept_triangles.len());
                kept_triangles.push(*t);
            }
        }
        self.triangles = kept_triangles;
        for e in &mut self.edges {
            if e.t1.is_valid() {
                e.t1 = tri_map[e.t1.index()];
            }
            if e.t2.is_valid() {
                e.t2 = tri_map[e.t2.index()];
            }
        }

        // Edges second: triangles and vertex entry points follow.
        let mut edge_map = vec![EdgeId::invalid(); self.edges.len()];
        let mut kept_edges = Vec::with_capacity(self.edges.len());
        for (i, e) in self.edges.iter().enumerate() {
            if keep(e.flags) {
                edge_map[i] = EdgeId::new(kept_edges.len());
                kept_edges.push(*e);
            }
        }
        self.edges = kept_edges;
        for t in &mut self.triangles {
            if t.e1.is_valid() {
                t.e1 = edge_map[t.e1.index()];
            }
            if t.e2.is_valid() {
                t.e2 = edge_map[t.e2.index()];
            }
            if t.e3.is_valid() {
                t.e3 = edge_map[t.e3.index()];
            }
        }
        for v in &mut self.vertices {
            if v.edge.is_valid() {
                v.edge = edge_map[v.edge.index()];
            }
        }

        // Vertices last.
        let mut vert_map = vec![None; self.vertices.len()];
        let mut kept_vertices = Vec::with_capacity(self.vertices.len());
        for (i, v) in self.vertices.iter().enumerate() {
            if keep(v.flags) {
                vert_map[i] = Some(VertexId::new(kept_vertices.len()));
                kept_vertices.push(v.clone());
            }
        }
        self.vertices = kept_vertices;
        for e in &mut self.edges {
            e.v1 = vert_map
                .get(e.v1.index())
                .copied()
                .flatten()
                .unwrap_or_else(VertexId::invalid);
            e.v2 = vert_map
                .get(e.v2.index())
                .copied()
                .flatten()
                .unwrap_or_else(VertexId::invalid);
        }

        self.aabb = None;
        self.edge_length_range = None;
        self.spatial = None;

        CompactionMap { vertices: vert_map }
    }

    /// Remove vertices with no incident edge.
    ///
    /// Flags isolated vertices and runs a [`compact`](Self::compact) pass,
    /// so any element already flagged `TO_BE_REMOVED` is dropped in the
    /// same sweep. Returns the number of isolated vertices removed and the
    /// compaction map.
    pub fn remove_isolated_vertices(&mut self) -> (usize, CompactionMap) {
        let mut removed = 0;
        for v in &mut self.vertices {
            if v.is_isolated() {
                v.flags.insert(ElementFlags::TO_BE_REMOVED);
                removed += 1;
            }
        }
        (removed, self.compact())
    }

    // ==================== Spatial queries ====================

    /// Build (or rebuild) the KD-tree over vertex positions.
    ///
    /// Queries build the index lazily on first use; after structural edits
    /// the caller must invoke this explicitly, the mesh does not
    /// auto-invalidate.
    pub fn init_spatial_index(&mut self) {
        let mut tree: KdTree<f64, 3> = KdTree::new();
        for (i, v) in self.vertices.iter().enumerate() {
            let p = &v.position;
            tree.add(&[p.x, p.y, p.z], i as u64);
        }
        self.spatial = Some(tree);
    }

    fn spatial_index(&mut self) -> &KdTree<f64, 3> {
        if self.spatial.is_none() {
            self.init_spatial_index();
        }
        self.spatial.as_ref().unwrap()
    }

    /// Find the vertex closest to a query point.
    ///
    /// Returns `None` for an empty mesh.
    pub fn closest_vertex(&mut self, p: &Point3<f64>) -> Option<VertexId> {
        if self.vertices.is_empty() {
            return None;
        }
        let nearest = self
            .spatial_index()
            .nearest_one::<SquaredEuclidean>(&[p.x, p.y, p.z]);
        Some(VertexId::new(nearest.item as usize))
    }

    /// Find the vertices nearest to a query point.
    ///
    /// With `radius > 0` only vertices within that distance are returned,
    /// closest first, at most `max_number` of them (`max_number == 0`
    /// removes the cap). With `radius <= 0` exactly the `max_number`
    /// nearest vertices are returned.
    pub fn nearest_vertices(
        &mut self,
        p: &Point3<f64>,
        max_number: usize,
        radius: f64,
    ) -> Vec<VertexId> {
        if self.vertices.is_empty() {
            return Vec::new();
        }
        let query = [p.x, p.y, p.z];
        let tree = self.spatial_index();

        if radius > 0.0 {
            let mut found: Vec<VertexId> = tree
                .within::<SquaredEuclidean>(&query, radius * radius)
                .into_iter()
                .map(|n| VertexId::new(n.item as usize))
                .collect();
            if max_number > 0 {
                found.truncate(max_number);
            }
            found
        } else {
            tree.nearest_n::<SquaredEuclidean>(&query, max_number)
                .into_iter()
                .map(|n| VertexId::new(n.item as usize))
                .collect()
        }
    }

    /// Find all vertices within `threshold` of the segment `[a, b]`.
    pub fn vertices_close_to_line(
        &self,
        a: &Point3<f64>,
        b: &Point3<f64>,
        threshold: f64,
    ) -> Vec<VertexId> {
        self.vertices()
            .filter(|(_, v)| geom::distance_from_segment(&v.position, a, b) <= threshold)
            .map(|(id, _)| id)
            .collect()
    }

    // ==================== Validation ====================

    /// Check that all connectivity is consistent.
    pub fn is_valid(&self) -> bool {
        // Vertices: the incident edge must actually touch the vertex.
        for (vid, v) in self.vertices() {
            if v.edge.is_valid() {
                match self.get_edge(v.edge) {
                    Some(e) if e.has_vertex(vid) => {}
                    _ => return false,
                }
            }
        }

        // Edges: endpoints in range and distinct; incident triangles must
        // reference the edge back.
        for (eid, e) in self.edges() {
            if !e.v1.is_valid() || !e.v2.is_valid() || e.v1 == e.v2 {
                return false;
            }
            if e.v1.index() >= self.vertices.len() || e.v2.index() >= self.vertices.len() {
                return false;
            }
            for t in [e.t1, e.t2] {
                if t.is_valid() {
                    match self.get_triangle(t) {
                        Some(tri) if tri.has_edge(eid) => {}
                        _ => return false,
                    }
                }
            }
        }

        // Triangles: consecutive edges must share exactly one vertex and
        // the derived corners must be distinct.
        for t in self.triangle_ids() {
            let tri = self.triangle(t);
            for e in [tri.e1, tri.e2, tri.e3] {
                if !e.is_valid() || e.index() >= self.edges.len() {
                    return false;
                }
            }
            let [v1, v2, v3] = self.triangle_vertices(t);
            if !v1.is_valid() || !v2.is_valid() || !v3.is_valid() {
                return false;
            }
            if v1 == v2 || v2 == v3 || v1 == v3 {
                return false;
            }
        }

        true
    }
}

/// Mapping from pre-compaction to post-compaction vertex ids.
///
/// Returned by [`TriMesh::compact`]; consumers holding vertex references
/// (annotations) use it to follow the renumbering.
#[derive(Debug, Clone)]
pub struct CompactionMap {
    vertices: Vec<Option<VertexId>>,
}

impl CompactionMap {
    /// Map an old vertex id to its new id, or `None` if it was removed.
    pub fn map_vertex(&self, v: VertexId) -> Option<VertexId> {
        self.vertices.get(v.index()).copied().flatten()
    }

    /// Number of vertices removed by the compaction.
    pub fn removed_vertices(&self) -> usize {
        self.vertices.iter().filter(|m| m.is_none()).count()
    }
}
