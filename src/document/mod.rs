//! Generic document graph for project files.
//!
//! A project file is XML whose elements cross-reference each other by
//! identifier. The [`Document`] stores every element in a flat arena and
//! exposes the plain tree; identifier resolution lives in
//! [`ObjectIndex`](crate::ObjectIndex).
//!
//! # Example
//!
//! ```
//! use flatcut::Document;
//!
//! let doc = Document::parse_str(r#"<Project><Sequence ObjectUID="s1"><Name>Main</Name></Sequence></Project>"#)?;
//! let seq = doc.child(doc.root(), "Sequence").unwrap();
//! assert_eq!(doc.attr(seq, "ObjectUID"), Some("s1"));
//! assert_eq!(doc.child_text(seq, "Name"), Some("Main"));
//! # Ok::<(), flatcut::Error>(())
//! ```

mod reader;

/// Unique identifier for a node within a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root element ID (always 0).
    pub const ROOT: NodeId = NodeId(0);
}

/// A single element of the document.
#[derive(Debug, Clone)]
pub struct Node {
    /// Local tag name (namespace prefix stripped).
    pub tag: String,
    /// Attributes in declaration order.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<NodeId>,
    /// Trimmed text content, `None` when empty or whitespace-only.
    pub text: Option<String>,
    /// Parent element (None for root).
    pub parent: Option<NodeId>,
}

impl Node {
    /// Create an element with no attributes, children or text.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
            parent: None,
        }
    }

    /// Look up an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// An immutable, parsed project document.
///
/// Nodes are stored in document (pre-)order, so iterating IDs from 0 upward
/// visits elements in the order they appear in the file.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Parse already-decoded XML text.
    pub fn parse_str(xml: &str) -> crate::Result<Self> {
        reader::parse_str(xml)
    }

    /// Parse raw project bytes (gzip-compressed or plain XML).
    pub fn from_bytes(bytes: &[u8]) -> crate::Result<Self> {
        reader::parse_bytes(bytes)
    }

    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { nodes }
    }

    /// Get the root element ID.
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of elements in the document.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A parsed document always has a root, so this is only true for
    /// documents assembled by hand.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    /// Tag name of a node, or `""` for an unknown ID.
    pub fn tag(&self, id: NodeId) -> &str {
        self.node(id).map(|n| n.tag.as_str()).unwrap_or("")
    }

    /// Attribute value of a node.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?.attr(name)
    }

    /// Text content of a node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id)?.text.as_deref()
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Iterate over direct children.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
    }

    /// Iterate over direct children with the given tag.
    pub fn children_named<'a>(
        &'a self,
        id: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id).filter(move |&c| self.tag(c) == tag)
    }

    /// First direct child with the given tag.
    pub fn child(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.children_named(id, tag).next()
    }

    /// Follow a path of child tags (`["ClipTrack", "ClipItems", "TrackItems"]`).
    pub fn child_path(&self, id: NodeId, path: &[&str]) -> Option<NodeId> {
        path.iter().try_fold(id, |node, tag| self.child(node, tag))
    }

    /// Text of the first direct child with the given tag.
    pub fn child_text(&self, id: NodeId, tag: &str) -> Option<&str> {
        self.text(self.child(id, tag)?)
    }

    /// Depth-first, pre-order iterator over all descendants (excluding `id`).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// First descendant (pre-order) with the given tag.
    pub fn find_descendant(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(id).find(|&d| self.tag(d) == tag)
    }

    /// Iterate over every node in document order, root first.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }
}

/// Pre-order iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.doc.node(id) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}
