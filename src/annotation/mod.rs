//! Semantic annotations over a mesh.
//!
//! An [`Annotation`] attaches a meaning ("door", "ridge line", "roof") to a
//! part of a mesh, referencing mesh vertices by id. The three shapes an
//! annotation can take form a closed sum type, matched exhaustively:
//!
//! - [`AnnotationKind::Point`]: a set of individual vertices
//! - [`AnnotationKind::Line`]: one or more polylines
//! - [`AnnotationKind::Surface`]: an area described by its boundary
//!   loop(s), resolved to triangles on demand through region growing
//!
//! Annotations are consumers of the mesh: they hold no mesh state and the
//! mesh knows nothing about them. The one coupling point is compaction —
//! after [`TriMesh::compact`] renumbers vertices, [`Annotation::remap`]
//! translates the stored ids using the returned
//! [`CompactionMap`](crate::mesh::CompactionMap).
//!
//! Persistence lives in [`json`]: annotation sets serialize to a JSON
//! document in which vertex references are plain integers.

pub mod json;

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::algo::region::region_growing_multi;
use crate::error::{MeshError, Result};
use crate::mesh::{CompactionMap, TriMesh, TriangleId, VertexId};

/// The geometric carrier of an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnnotationKind {
    /// Individual vertices.
    Point {
        /// The annotated vertices.
        vertices: Vec<VertexId>,
    },
    /// Polylines over mesh vertices.
    Line {
        /// Each polyline as a run of successive, mesh-adjacent vertices.
        polylines: Vec<Vec<VertexId>>,
    },
    /// A surface region described by its boundary loops.
    Surface {
        /// Closed boundary loops (first = outer, rest = holes), wound so
        /// the region lies on their left. Empty means the whole mesh.
        outlines: Vec<Vec<VertexId>>,
    },
}

/// A semantic region attached to a mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Stable identifier, unique within an [`AnnotationSet`].
    pub id: u32,
    /// Human-readable label.
    pub tag: String,
    /// Display colour (RGB).
    pub color: [u8; 3],
    /// The annotated geometry.
    pub kind: AnnotationKind,
}

impl Annotation {
    /// Create a point annotation.
    pub fn points(id: u32, tag: impl Into<String>, vertices: Vec<VertexId>) -> Self {
        Self {
            id,
            tag: tag.into(),
            color: [0, 0, 0],
            kind: AnnotationKind::Point { vertices },
        }
    }

    /// Create a line annotation.
    pub fn lines(id: u32, tag: impl Into<String>, polylines: Vec<Vec<VertexId>>) -> Self {
        Self {
            id,
            tag: tag.into(),
            color: [0, 0, 0],
            kind: AnnotationKind::Line { polylines },
        }
    }

    /// Create a surface annotation from its boundary loops.
    pub fn surface(id: u32, tag: impl Into<String>, outlines: Vec<Vec<VertexId>>) -> Self {
        Self {
            id,
            tag: tag.into(),
            color: [0, 0, 0],
            kind: AnnotationKind::Surface { outlines },
        }
    }

    /// Set the display colour.
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }

    /// Every vertex this annotation touches.
    ///
    /// For surfaces that is the boundary loops plus the enclosed interior
    /// vertices; resolving the interior runs region growing and therefore
    /// needs a well-formed boundary.
    pub fn involved_vertices(&self, mesh: &TriMesh) -> Result<Vec<VertexId>> {
        match &self.kind {
            AnnotationKind::Point { vertices } => Ok(vertices.clone()),
            AnnotationKind::Line { polylines } => {
                Ok(polylines.iter().flatten().copied().collect())
            }
            AnnotationKind::Surface { outlines } => {
                // Loops are closed (first vertex repeated), so dedup.
                let mut vertices: Vec<VertexId> = Vec::new();
                for &v in outlines.iter().flatten() {
                    if !vertices.contains(&v) {
                        vertices.push(v);
                    }
                }
                let on_boundary: std::collections::HashSet<VertexId> =
                    vertices.iter().copied().collect();
                for t in self.triangles(mesh)? {
                    for v in mesh.triangle_vertices(t) {
                        if !on_boundary.contains(&v) && !vertices.contains(&v) {
                            vertices.push(v);
                        }
                    }
                }
                Ok(vertices)
            }
        }
    }

    /// Whether the annotation touches the given vertex.
    pub fn involves_vertex(&self, mesh: &TriMesh, v: VertexId) -> Result<bool> {
        Ok(self.involved_vertices(mesh)?.contains(&v))
    }

    /// The triangles this annotation covers.
    ///
    /// Surfaces resolve their boundary loops through region growing (an
    /// empty loop list means the entire mesh); point and line annotations
    /// cover every triangle incident to one of their vertices.
    pub fn triangles(&self, mesh: &TriMesh) -> Result<Vec<TriangleId>> {
        match &self.kind {
            AnnotationKind::Surface { outlines } => {
                if outlines.is_empty() {
                    Ok(mesh.triangle_ids().collect())
                } else {
                    region_growing_multi(mesh, outlines)
                }
            }
            AnnotationKind::Point { vertices } => Ok(mesh.triangles_of_vertices(vertices)),
            AnnotationKind::Line { polylines } => {
                let flat: Vec<VertexId> = polylines.iter().flatten().copied().collect();
                Ok(mesh.triangles_of_vertices(&flat))
            }
        }
    }

    /// The centroid of the annotation's involved vertices, if any.
    pub fn center(&self, mesh: &TriMesh) -> Result<Option<Point3<f64>>> {
        let vertices = self.involved_vertices(mesh)?;
        if vertices.is_empty() {
            return Ok(None);
        }
        let mut sum = nalgebra::Vector3::zeros();
        for &v in &vertices {
            sum += mesh.position(v).coords;
        }
        Ok(Some(Point3::from(sum / vertices.len() as f64)))
    }

    /// Translate all vertex references after a mesh compaction.
    ///
    /// Fails with [`MeshError::DanglingAnnotation`] if any referenced
    /// vertex was removed; the annotation is left unchanged in that case.
    pub fn remap(&mut self, map: &CompactionMap) -> Result<()> {
        let remap_one = |v: VertexId| {
            map.map_vertex(v).ok_or(MeshError::DanglingAnnotation {
                annotation: self.id,
                vertex: v.index(),
            })
        };

        let remapped = match &self.kind {
            AnnotationKind::Point { vertices } => AnnotationKind::Point {
                vertices: vertices
                    .iter()
                    .map(|&v| remap_one(v))
                    .collect::<Result<_>>()?,
            },
            AnnotationKind::Line { polylines } => AnnotationKind::Line {
                polylines: polylines
                    .iter()
                    .map(|line| line.iter().map(|&v| remap_one(v)).collect::<Result<_>>())
                    .collect::<Result<_>>()?,
            },
            AnnotationKind::Surface { outlines } => AnnotationKind::Surface {
                outlines: outlines
                    .iter()
                    .map(|loop_| loop_.iter().map(|&v| remap_one(v)).collect::<Result<_>>())
                    .collect::<Result<_>>()?,
            },
        };

        self.kind = remapped;
        Ok(())
    }

    /// Check that every referenced vertex exists in the mesh.
    pub fn validate(&self, mesh: &TriMesh) -> Result<()> {
        let referenced: Vec<VertexId> = match &self.kind {
            AnnotationKind::Point { vertices } => vertices.clone(),
            AnnotationKind::Line { polylines } => {
                polylines.iter().flatten().copied().collect()
            }
            AnnotationKind::Surface { outlines } => {
                outlines.iter().flatten().copied().collect()
            }
        };
        for v in referenced {
            if mesh.get_vertex(v).is_none() {
                return Err(MeshError::DanglingAnnotation {
                    annotation: self.id,
                    vertex: v.index(),
                });
            }
        }
        Ok(())
    }
}

/// An ordered collection of annotations with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSet {
    annotations: Vec<Annotation>,
}

impl AnnotationSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Add an annotation. Refuses duplicated ids.
    pub fn add(&mut self, annotation: Annotation) -> Result<()> {
        if self.get(annotation.id).is_some() {
            return Err(MeshError::InvalidState(format!(
                "annotation id {} already present",
                annotation.id
            )));
        }
        self.annotations.push(annotation);
        Ok(())
    }

    /// Look an annotation up by id.
    pub fn get(&self, id: u32) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: u32) -> Option<&mut Annotation> {
        self.annotations.iter_mut().find(|a| a.id == id)
    }

    /// Remove an annotation by id. Returns whether one was removed.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != id);
        self.annotations.len() != before
    }

    /// Iterate over the annotations in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// Remap every annotation after a mesh compaction.
    ///
    /// Stops at the first annotation with a dangling reference; already
    /// remapped annotations keep their new ids, so treat an error as fatal
    /// for the set.
    pub fn remap(&mut self, map: &CompactionMap) -> Result<()> {
        for a in &mut self.annotations {
            a.remap(map)?;
        }
        Ok(())
    }

    /// Check every annotation against the mesh.
    pub fn validate(&self, mesh: &TriMesh) -> Result<()> {
        for a in &self.annotations {
            a.validate(mesh)?;
        }
        Ok(())
    }
}
