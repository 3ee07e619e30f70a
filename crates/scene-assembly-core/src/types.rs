//! Core type definitions

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Globally unique identifier of a model element (a submesh or tree node)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create an ElementId from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier shared by every revision of the same logical element
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedId(String);

impl SharedId {
    /// Create a SharedId from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SharedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SharedId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl Borrow<str> for SharedId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Type alias for metadata record identifiers referenced from tree nodes
pub type MetadataId = String;

/// Type alias for one resolved metadata property set
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// Position of an element's vertices inside a batched fragment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshLocation {
    /// Name of the fragment holding the vertices
    pub fragment: String,

    /// Local submesh ordinal inside that fragment
    pub local_index: u32,
}

impl MeshLocation {
    /// Create a new mesh location
    pub fn new(fragment: impl Into<String>, local_index: u32) -> Self {
        Self {
            fragment: fragment.into(),
            local_index,
        }
    }
}

impl fmt::Display for MeshLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.fragment, self.local_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_element_id_serializes_as_plain_string() {
        let id = ElementId::new("6b6d7837-ef2e-43b8-a608-788581a95531");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"6b6d7837-ef2e-43b8-a608-788581a95531\"");
    }

    #[test]
    fn test_element_id_borrow_lookup() {
        let mut map = HashMap::new();
        map.insert(ElementId::new("E1"), 1);
        assert_eq!(map.get("E1"), Some(&1));
    }

    #[test]
    fn test_mesh_location_display() {
        let location = MeshLocation::new("F", 3);
        assert_eq!(location.to_string(), "F[3]");
    }
}
