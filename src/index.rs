//! Identifier index over the document graph.
//!
//! Project elements declare one of two identifiers and refer to each other
//! through matching reference attributes:
//!
//! | Declared by  | Referenced by |
//! |--------------|---------------|
//! | `ObjectID`   | `ObjectRef`   |
//! | `ObjectUID`  | `ObjectURef`  |
//!
//! [`ObjectIndex`] maps both identifier spaces to [`NodeId`]s so references
//! can be dereferenced in O(1). A reference that names no element is a miss
//! (`None`), never an error.

use std::collections::HashMap;

use crate::document::{Document, NodeId};

/// Primary identifier attribute.
pub const ID_ATTR: &str = "ObjectID";
/// Secondary identifier attribute.
pub const UID_ATTR: &str = "ObjectUID";
/// Attributes that carry a reference to another element, in lookup order.
pub const REF_ATTRS: [&str; 2] = ["ObjectRef", "ObjectURef"];

/// Two-space identifier index, built once per document.
#[derive(Debug, Clone, Default)]
pub struct ObjectIndex {
    by_id: HashMap<String, NodeId>,
    by_uid: HashMap<String, NodeId>,
}

impl ObjectIndex {
    /// Index every element of the document in a single pass.
    ///
    /// When an identifier is declared twice the later element wins.
    pub fn build(doc: &Document) -> Self {
        let mut index = Self::default();
        for (id, node) in doc.iter() {
            if let Some(oid) = node.attr(ID_ATTR).filter(|v| !v.is_empty()) {
                index.by_id.insert(oid.to_string(), id);
            }
            if let Some(uid) = node.attr(UID_ATTR).filter(|v| !v.is_empty()) {
                index.by_uid.insert(uid.to_string(), id);
            }
        }
        index
    }

    /// Look up a primary identifier.
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.by_id.get(id).copied()
    }

    /// Look up a secondary identifier.
    pub fn by_uid(&self, uid: &str) -> Option<NodeId> {
        self.by_uid.get(uid).copied()
    }

    /// Resolve a reference token, checking the primary space first.
    ///
    /// Some schemas reuse the same token in both spaces for different
    /// elements; the primary space takes priority.
    pub fn resolve(&self, reference: &str) -> Option<NodeId> {
        self.by_id(reference).or_else(|| self.by_uid(reference))
    }

    /// Resolve the reference carried by `node` itself, if any.
    pub fn resolve_node(&self, doc: &Document, node: NodeId) -> Option<NodeId> {
        self.resolve(reference_of(doc, node)?)
    }

    /// Number of indexed primary identifiers.
    pub fn id_count(&self) -> usize {
        self.by_id.len()
    }

    /// Number of indexed secondary identifiers.
    pub fn uid_count(&self) -> usize {
        self.by_uid.len()
    }
}

/// The reference token an element carries in `ObjectRef` or `ObjectURef`.
pub fn reference_of(doc: &Document, node: NodeId) -> Option<&str> {
    REF_ATTRS
        .iter()
        .find_map(|attr| doc.attr(node, attr))
        .filter(|v| !v.is_empty())
}
