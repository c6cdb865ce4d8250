//! Classified change batch.
//!
//! A [`ChangeBatch`] is what a change observer reports after the tree has
//! been mutated: which nodes were removed, moved to another parent, moved
//! within their parent, added, and which attributes and text nodes changed.
//! Observation itself happens elsewhere; the batch only records the net
//! classification plus the prior parent of every removed or moved node.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::tree::{NodeId, Tree};

#[derive(Debug, Clone, Default)]
pub struct ChangeBatch {
    pub removed: Vec<NodeId>,
    pub reparented: Vec<NodeId>,
    pub reordered: Vec<NodeId>,
    pub added: Vec<NodeId>,
    /// Attribute name to the elements whose value of it changed.
    pub attribute_changed: IndexMap<String, Vec<NodeId>>,
    pub character_data_changed: Vec<NodeId>,
    old_parents: HashMap<NodeId, NodeId>,
}

fn push_unique(list: &mut Vec<NodeId>, node: NodeId) {
    if !list.contains(&node) {
        list.push(node);
    }
}

impl ChangeBatch {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Recording ─────────────────────────────────────────────────────────

    /// `node` was detached from `old_parent` and not re-attached.
    pub fn remove(&mut self, node: NodeId, old_parent: NodeId) {
        push_unique(&mut self.removed, node);
        self.old_parents.insert(node, old_parent);
    }

    /// `node` now lives under a different parent than `old_parent`.
    pub fn reparent(&mut self, node: NodeId, old_parent: NodeId) {
        push_unique(&mut self.reparented, node);
        self.old_parents.insert(node, old_parent);
    }

    /// `node` changed position among the children of `old_parent`.
    pub fn reorder(&mut self, node: NodeId, old_parent: NodeId) {
        push_unique(&mut self.reordered, node);
        self.old_parents.insert(node, old_parent);
    }

    pub fn add(&mut self, node: NodeId) {
        push_unique(&mut self.added, node);
    }

    pub fn change_attribute(&mut self, name: &str, node: NodeId) {
        push_unique(self.attribute_changed.entry(name.to_owned()).or_default(), node);
    }

    pub fn change_text(&mut self, node: NodeId) {
        push_unique(&mut self.character_data_changed, node);
    }

    // ── Prior-state accessors ─────────────────────────────────────────────

    /// Parent of `node` before the batch, if it was removed or moved.
    pub fn prior_parent(&self, node: NodeId) -> Option<NodeId> {
        self.old_parents.get(&node).copied()
    }

    /// Value of `name` on `node` after the batch; `None` once removed.
    pub fn current_attribute_value<'t>(
        &self,
        tree: &'t Tree,
        node: NodeId,
        name: &str,
    ) -> Option<&'t str> {
        tree.attribute(node, name)
    }

    pub fn current_text<'t>(&self, tree: &'t Tree, node: NodeId) -> Option<&'t str> {
        tree.text(node)
    }

    /// Total number of reported entries across all categories.
    pub fn len(&self) -> usize {
        self.removed.len()
            + self.reparented.len()
            + self.reordered.len()
            + self.added.len()
            + self.attribute_changed.values().map(Vec::len).sum::<usize>()
            + self.character_data_changed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
