//! Index types for mesh elements.
//!
//! This module provides type-safe index wrappers for vertices, edges, and
//! triangles. An index doubles as the element's identity: elements live in
//! dense arenas owned by the mesh, and every cross-reference between
//! elements is one of these indices. The all-ones bit pattern is reserved
//! as an invalid/null sentinel, so `Option` never inflates the arenas.
//!
//! Indices serialize as their raw `u32` value, which is what the annotation
//! persistence format stores.

use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct VertexId(u32);

/// A type-safe edge index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct EdgeId(u32);

/// A type-safe triangle index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct TriangleId(u32);

const INVALID: u32 = u32::MAX;

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            ///
            /// # Panics
            /// Panics in debug builds if the value collides with the
            /// invalid sentinel.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Create an invalid/null index.
            #[inline]
            pub fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the raw underlying value.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(EdgeId, "E");
impl_index_type!(TriangleId, "T");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id() {
        let v = VertexId::new(42);
        assert_eq!(v.index(), 42);
        assert!(v.is_valid());

        let invalid = VertexId::invalid();
        assert!(!invalid.is_valid());
    }

    #[test]
    fn test_type_safety() {
        // Different types with the same raw value stay distinct types.
        let v = VertexId::new(0);
        let e = EdgeId::new(0);
        let t = TriangleId::new(0);

        assert_eq!(v.index(), e.index());
        assert_eq!(e.index(), t.index());
    }

    #[test]
    fn test_debug_format() {
        let e = EdgeId::new(7);
        assert_eq!(format!("{:?}", e), "E(7)");

        let invalid = TriangleId::invalid();
        assert_eq!(format!("{:?}", invalid), "T(INVALID)");
    }

    #[test]
    fn test_serde_transparent() {
        let v = VertexId::new(11);
        assert_eq!(serde_json::to_string(&v).unwrap(), "11");
        let back: VertexId = serde_json::from_str("11").unwrap();
        assert_eq!(back, v);
    }
}
