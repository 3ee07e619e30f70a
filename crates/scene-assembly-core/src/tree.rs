//! Element hierarchy and its lookup indices
//!
//! The tree is fetched once per model and indexed in a single depth-first
//! pass: unique id to node, and shared id to unique id. Nodes are reference
//! counted so both the hierarchy and the index point at the same allocation.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{ElementId, MetadataId, SharedId};

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Node of the element hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Path of unique ids from the root, as published by the service
    #[serde(default)]
    pub path: String,

    /// Unique id
    #[serde(rename = "_id")]
    pub id: ElementId,

    /// Shared id, absent for some synthetic nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_id: Option<SharedId>,

    /// Type tag (e.g. "transformation", "mesh")
    #[serde(rename = "type", default)]
    pub node_type: String,

    /// Children in document order
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Arc<TreeNode>>,

    /// Metadata record references
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<MetadataId>,
}

impl TreeNode {
    /// Create a leaf node
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: String::new(),
            id: id.into(),
            shared_id: None,
            node_type: String::new(),
            children: Vec::new(),
            meta: Vec::new(),
        }
    }

    /// Set the shared id
    pub fn with_shared_id(mut self, shared_id: impl Into<String>) -> Self {
        self.shared_id = Some(SharedId::new(shared_id));
        self
    }

    /// Set the type tag
    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = node_type.into();
        self
    }

    /// Add a metadata reference
    pub fn with_meta(mut self, metadata_id: impl Into<MetadataId>) -> Self {
        self.meta.push(metadata_id.into());
        self
    }

    /// Add a child
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    /// Whether the node carries metadata references
    pub fn has_metadata(&self) -> bool {
        !self.meta.is_empty()
    }
}

/// An element hierarchy with its id indices
#[derive(Debug, Clone)]
pub struct ElementTree {
    root: Arc<TreeNode>,
    nodes: HashMap<ElementId, Arc<TreeNode>>,
    shared_to_unique: HashMap<SharedId, ElementId>,
}

impl ElementTree {
    /// Index a tree in one depth-first pass
    ///
    /// Both indices are populated together. Nodes without a shared id are left
    /// out of the shared-id index. Input is assumed acyclic.
    pub fn build(root: TreeNode) -> Self {
        let root = Arc::new(root);
        let mut nodes = HashMap::new();
        let mut shared_to_unique = HashMap::new();

        let mut stack = vec![Arc::clone(&root)];
        while let Some(node) = stack.pop() {
            if let Some(shared_id) = &node.shared_id {
                shared_to_unique.insert(shared_id.clone(), node.id.clone());
            }
            stack.extend(node.children.iter().rev().cloned());
            nodes.insert(node.id.clone(), node);
        }

        Self {
            root,
            nodes,
            shared_to_unique,
        }
    }

    /// Root node
    pub fn root(&self) -> &Arc<TreeNode> {
        &self.root
    }

    /// Node with the given unique id
    pub fn node(&self, id: &str) -> Option<&Arc<TreeNode>> {
        self.nodes.get(id)
    }

    /// Unique id of the node carrying a shared id
    pub fn unique_id_for(&self, shared_id: &str) -> Option<&ElementId> {
        self.shared_to_unique.get(shared_id)
    }

    /// Metadata references of a node; empty for unknown ids
    pub fn metadata_refs(&self, id: &str) -> &[MetadataId] {
        self.nodes
            .get(id)
            .map(|node| node.meta.as_slice())
            .unwrap_or(&[])
    }

    /// Number of indexed nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty (never true for a built tree)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes indexed by shared id
    pub fn shared_id_count(&self) -> usize {
        self.shared_to_unique.len()
    }
}
