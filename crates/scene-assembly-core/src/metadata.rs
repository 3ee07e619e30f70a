//! Metadata field search results

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ElementId;

/// Value found by a field search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchValue {
    #[serde(default)]
    pub value: Value,
}

/// One hit of a metadata field search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataSearchResult {
    /// Id of the metadata record
    #[serde(rename = "_id")]
    pub id: String,

    /// Value of the searched field
    #[serde(default)]
    pub metadata: SearchValue,

    /// Elements referencing the record
    #[serde(default)]
    pub parents: Vec<ElementId>,
}

impl MetadataSearchResult {
    pub fn new(id: impl Into<String>, value: Value) -> Self {
        Self {
            id: id.into(),
            metadata: SearchValue { value },
            parents: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<ElementId>) -> Self {
        self.parents.push(parent.into());
        self
    }

    /// The searched field's value
    pub fn value(&self) -> &Value {
        &self.metadata.value
    }
}
