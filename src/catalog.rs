//! Sequence discovery and lookup by display name.

use std::collections::HashMap;

use log::debug;

use crate::document::{Document, NodeId};
use crate::index::{ID_ATTR, UID_ATTR};

/// Tag of the element that holds a sequence's track groups.
pub(crate) const TRACK_GROUPS: &str = "TrackGroups";

/// Check if a node is a sequence object.
///
/// Sequence objects have a tag ending in `Sequence` and either declare an
/// identifier or own track groups. Value fields such as
/// `<Sequence>42</Sequence>` inside clip items are not sequences.
pub fn is_sequence(doc: &Document, node: NodeId) -> bool {
    let Some(n) = doc.node(node) else {
        return false;
    };
    n.tag.ends_with("Sequence")
        && (n.attr(ID_ATTR).is_some()
            || n.attr(UID_ATTR).is_some()
            || doc.child(node, TRACK_GROUPS).is_some())
}

/// Display name of a sequence: the direct `Name` child, else the first
/// named descendant.
pub fn sequence_name(doc: &Document, node: NodeId) -> Option<&str> {
    if let Some(name) = doc.child_text(node, "Name").map(str::trim)
        && !name.is_empty()
    {
        return Some(name);
    }
    doc.descendants(node)
        .filter(|&d| doc.tag(d) == "Name")
        .find_map(|d| doc.text(d))
}

/// All named sequences of a document.
///
/// Names are not unique in a project; when two sequences share a name the
/// one appearing later in the document wins. Sequences carrying a numeric
/// `<ID>` child are also indexed by that value.
#[derive(Debug, Clone, Default)]
pub struct SequenceCatalog {
    by_name: HashMap<String, NodeId>,
    by_id_value: HashMap<String, NodeId>,
}

impl SequenceCatalog {
    /// Collect every named sequence in a single traversal.
    pub fn discover(doc: &Document) -> Self {
        let mut by_name = HashMap::new();
        let mut by_id_value = HashMap::new();
        for (id, _) in doc.iter() {
            if !is_sequence(doc, id) {
                continue;
            }
            if let Some(name) = sequence_name(doc, id) {
                by_name.insert(name.to_string(), id);
            }
            if let Some(value) = doc.child_text(id, "ID").map(str::trim)
                && !value.is_empty()
            {
                by_id_value.entry(value.to_string()).or_insert(id);
            }
        }
        debug!(
            "Discovered {} named sequences, {} with an ID value",
            by_name.len(),
            by_id_value.len()
        );
        Self { by_name, by_id_value }
    }

    /// Exact name lookup.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Sequence whose `<ID>` child holds exactly `value`.
    ///
    /// The first such sequence in document order wins.
    pub fn by_id_value(&self, value: &str) -> Option<NodeId> {
        self.by_id_value.get(value.trim()).copied()
    }

    /// Exact lookup, falling back to a full-document scan for a sequence
    /// whose direct `Name` child matches.
    ///
    /// The fallback covers catalogs built against a different root than the
    /// document being searched.
    pub fn find(&self, doc: &Document, name: &str) -> Option<NodeId> {
        self.lookup(name).or_else(|| {
            doc.iter().map(|(id, _)| id).find(|&id| {
                doc.tag(id).ends_with("Sequence")
                    && doc.child_text(id, "Name").map(str::trim) == Some(name)
            })
        })
    }

    /// Sequence names sorted case-insensitively, for presenting a choice.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        names
    }

    /// Check if a name belongs to a catalogued sequence.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterate over `(name, sequence)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.by_name.iter().map(|(name, &id)| (name.as_str(), id))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
