//! JSON persistence for annotation sets.
//!
//! An [`AnnotationSet`] serializes to a single JSON document; vertex
//! references are stored as plain integer indices into the mesh's vertex
//! arena, so a file only stays meaningful alongside the mesh it was
//! written for (compaction renumbers — remap before saving, or validate
//! after loading).
//!
//! ```json
//! {
//!   "annotations": [
//!     {
//!       "id": 0,
//!       "tag": "roof",
//!       "color": [255, 0, 0],
//!       "kind": { "type": "Surface", "outlines": [[3, 4, 9, 3]] }
//!     }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{MeshError, Result};

use super::AnnotationSet;

/// Serialize an annotation set to a JSON string.
pub fn to_json_string(set: &AnnotationSet) -> Result<String> {
    serde_json::to_string_pretty(set).map_err(|e| MeshError::InvalidState(e.to_string()))
}

/// Deserialize an annotation set from a JSON string.
pub fn from_json_string(json: &str) -> Result<AnnotationSet> {
    serde_json::from_str(json).map_err(|e| MeshError::InvalidState(e.to_string()))
}

/// Save an annotation set to a JSON file.
pub fn save<P: AsRef<Path>>(set: &AnnotationSet, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, set).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load an annotation set from a JSON file.
///
/// The loaded set is not checked against any mesh; call
/// [`AnnotationSet::validate`] with the target mesh afterwards.
pub fn load<P: AsRef<Path>>(path: P) -> Result<AnnotationSet> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{Annotation, AnnotationKind};
    use crate::mesh::VertexId;

    fn sample_set() -> AnnotationSet {
        let mut set = AnnotationSet::new();
        set.add(
            Annotation::points(0, "landmarks", vec![VertexId::new(2), VertexId::new(5)])
                .with_color([255, 0, 0]),
        )
        .unwrap();
        set.add(Annotation::lines(
            1,
            "seam",
            vec![vec![VertexId::new(0), VertexId::new(1), VertexId::new(2)]],
        ))
        .unwrap();
        set.add(Annotation::surface(
            2,
            "patch",
            vec![vec![
                VertexId::new(5),
                VertexId::new(6),
                VertexId::new(10),
                VertexId::new(9),
                VertexId::new(5),
            ]],
        ))
        .unwrap();
        set
    }

    #[test]
    fn test_string_round_trip() {
        let set = sample_set();
        let json = to_json_string(&set).unwrap();
        let back = from_json_string(&json).unwrap();
        assert_eq!(set, back);
    }

    #[test]
    fn test_vertex_ids_serialize_as_integers() {
        let set = sample_set();
        let json = to_json_string(&set).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let points = &value["annotations"][0]["kind"];
        assert_eq!(points["type"], "Point");
        assert_eq!(points["vertices"][0], 2);
        assert_eq!(points["vertices"][1], 5);

        let surface = &value["annotations"][2]["kind"];
        assert_eq!(surface["type"], "Surface");
        assert_eq!(surface["outlines"][0][0], 5);
    }

    #[test]
    fn test_file_round_trip() {
        let set = sample_set();
        let path = std::env::temp_dir().join("sliver_annotations_test.json");

        save(&set, &path).unwrap();
        let back = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(set, back);
    }

    #[test]
    fn test_malformed_json_is_load_error() {
        assert!(from_json_string("{\"annotations\": [{]}").is_err());
    }

    #[test]
    fn test_kind_tagging() {
        let json = r#"{
            "annotations": [
                {
                    "id": 9,
                    "tag": "door",
                    "color": [0, 128, 0],
                    "kind": { "type": "Line", "polylines": [[1, 2], [3, 4]] }
                }
            ]
        }"#;
        let set = from_json_string(json).unwrap();
        let a = set.get(9).unwrap();
        assert_eq!(a.tag, "door");
        match &a.kind {
            AnnotationKind::Line { polylines } => {
                assert_eq!(polylines.len(), 2);
                assert_eq!(polylines[0], vec![VertexId::new(1), VertexId::new(2)]);
            }
            _ => panic!("expected a line annotation"),
        }
    }
}
