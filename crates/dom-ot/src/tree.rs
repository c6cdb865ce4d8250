//! Arena-backed ordered tree.
//!
//! Nodes live in a `Vec` owned by the [`Tree`] and are addressed by
//! [`NodeId`] indices instead of pointers. A node owns the ordered list of its
//! children; the parent link is a plain index used for upward traversal only.
//!
//! Detaching a node never frees it: a detached subtree keeps its ids so that a
//! change batch can still name nodes that were removed from the document.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

// ── Ids ───────────────────────────────────────────────────────────────────

/// Index of a node inside its [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("child index {index} out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("node {0} already has a parent")]
    AlreadyAttached(NodeId),
    #[error("inserting node {0} would create a cycle")]
    Cycle(NodeId),
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    #[error("node {0} is not a text node")]
    NotText(NodeId),
}

// ── Nodes ─────────────────────────────────────────────────────────────────

/// What a node carries besides its position.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Element with a tag name and insertion-ordered attributes.
    Element {
        tag: String,
        attributes: IndexMap<String, String>,
    },
    /// Character data leaf.
    Text(String),
}

#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

// ── Tree ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct Tree {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
}

impl Tree {
    /// An empty tree without a designated root.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tree whose root is a fresh element named `tag`.
    pub fn with_root(tag: &str) -> Self {
        let mut tree = Self::new();
        let root = tree.create_element(tag);
        tree.root = Some(root);
        tree
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    /// Number of nodes ever created in this arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0 as usize]
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData::new(kind));
        id
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element {
            tag: tag.to_owned(),
            attributes: IndexMap::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text(text.to_owned()))
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            NodeKind::Text(_) => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    /// Position of `id` among its parent's children.
    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// True if `id` is `ancestor` or lies somewhere below it.
    pub fn is_inclusive_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut curr = Some(id);
        while let Some(n) = curr {
            if n == ancestor {
                return true;
            }
            curr = self.parent(n);
        }
        false
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Insert a detached `child` at `index` among `parent`'s children.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), TreeError> {
        if !matches!(self.node(parent).kind, NodeKind::Element { .. }) {
            return Err(TreeError::NotAnElement(parent));
        }
        if self.node(child).parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        if self.is_inclusive_descendant(parent, child) {
            return Err(TreeError::Cycle(child));
        }
        let len = self.node(parent).children.len();
        if index > len {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let len = self.node(parent).children.len();
        self.insert_child(parent, len, child)
    }

    /// Unlink `id` from its parent. Returns the former parent and index.
    pub fn detach(&mut self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.node(id).parent?;
        let index = self.index_in_parent(id)?;
        self.node_mut(parent).children.remove(index);
        self.node_mut(id).parent = None;
        Some((parent, index))
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), TreeError> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element { attributes, .. } => {
                attributes.insert(name.to_owned(), value.to_owned());
                Ok(())
            }
            NodeKind::Text(_) => Err(TreeError::NotAnElement(id)),
        }
    }

    /// Remove an attribute, returning its former value.
    pub fn remove_attribute(
        &mut self,
        id: NodeId,
        name: &str,
    ) -> Result<Option<String>, TreeError> {
        match &mut self.node_mut(id).kind {
            NodeKind::Element { attributes, .. } => Ok(attributes.shift_remove(name)),
            NodeKind::Text(_) => Err(TreeError::NotAnElement(id)),
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), TreeError> {
        match &mut self.node_mut(id).kind {
            NodeKind::Text(current) => {
                *current = text.to_owned();
                Ok(())
            }
            NodeKind::Element { .. } => Err(TreeError::NotText(id)),
        }
    }
}
