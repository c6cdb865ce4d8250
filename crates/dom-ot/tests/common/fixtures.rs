#![allow(dead_code)]

use std::collections::HashSet;

use dom_ot::json_ml::{materialize, serialize};
use dom_ot::path::{is_reachable, resolve};
use dom_ot::{
    create_index, summary_to_oplist, ChangeBatch, NodeId, Operation, PathIndex, SynthesisOptions,
    Tree,
};
use indexmap::IndexMap;
use serde_json::Value;

/// Build a tree whose root is the JsonML element `doc`.
pub fn tree_from(doc: &Value) -> Tree {
    let mut tree = Tree::new();
    let root = materialize(&mut tree, doc).expect("fixture must be valid JsonML");
    tree.set_root(Some(root));
    tree
}

pub fn snapshot(tree: &Tree) -> Value {
    serialize(tree, tree.root().expect("fixture tree has a root"))
}

/// A tree under edit. Mutations are applied directly; [`Session::batch`]
/// classifies their net effect the way a change observer reports it.
pub struct Session {
    pub tree: Tree,
    pub index: PathIndex,
    pub before: Value,
    /// Every pre-batch node below the root with its pre-batch parent, in
    /// document order.
    original: Vec<(NodeId, NodeId)>,
    moved: HashSet<NodeId>,
    attributes: IndexMap<String, Vec<NodeId>>,
    texts: Vec<NodeId>,
}

impl Session {
    pub fn new(doc: Value) -> Self {
        let tree = tree_from(&doc);
        let index = create_index(&tree).expect("fixture tree has a root");
        let mut s = Self {
            tree,
            index,
            before: doc,
            original: Vec::new(),
            moved: HashSet::new(),
            attributes: IndexMap::new(),
            texts: Vec::new(),
        };
        s.original = s
            .attached()
            .into_iter()
            .filter_map(|node| s.tree.parent(node).map(|parent| (node, parent)))
            .collect();
        s
    }

    pub fn root(&self) -> NodeId {
        self.tree.root().expect("fixture tree has a root")
    }

    /// Node currently at `path`.
    pub fn node(&self, path: &[usize]) -> NodeId {
        resolve(&self.tree, self.root(), path).expect("path must resolve")
    }

    /// Insert `doc` as child `index` of the node at `parent`.
    pub fn insert(&mut self, parent: &[usize], index: usize, doc: Value) -> NodeId {
        let parent = self.node(parent);
        let node = materialize(&mut self.tree, &doc).expect("valid JsonML");
        self.tree.insert_child(parent, index, node).expect("valid insert");
        node
    }

    pub fn remove(&mut self, path: &[usize]) -> NodeId {
        let node = self.node(path);
        self.tree.detach(node).expect("attached node");
        node
    }

    /// Move the node at `path` to child `index` of the node at `parent`.
    pub fn move_to(&mut self, path: &[usize], parent: &[usize], index: usize) -> NodeId {
        let node = self.node(path);
        let new_parent = self.node(parent);
        self.tree.detach(node).expect("attached node");
        self.tree.insert_child(new_parent, index, node).expect("valid move");
        self.moved.insert(node);
        node
    }

    pub fn set_attribute(&mut self, path: &[usize], name: &str, value: &str) {
        let node = self.node(path);
        self.tree.set_attribute(node, name, value).expect("element");
        self.record_attribute(name, node);
    }

    pub fn remove_attribute(&mut self, path: &[usize], name: &str) {
        let node = self.node(path);
        self.tree.remove_attribute(node, name).expect("element");
        self.record_attribute(name, node);
    }

    pub fn set_text(&mut self, path: &[usize], text: &str) {
        let node = self.node(path);
        self.tree.set_text(node, text).expect("text node");
        if !self.texts.contains(&node) {
            self.texts.push(node);
        }
    }

    fn record_attribute(&mut self, name: &str, node: NodeId) {
        let nodes = self.attributes.entry(name.to_owned()).or_default();
        if !nodes.contains(&node) {
            nodes.push(node);
        }
    }

    fn reachable(&self, node: NodeId) -> bool {
        is_reachable(&self.tree, node, self.root())
    }

    /// Net changes since the session started.
    ///
    /// A pre-batch node that left the document is removed, one under a new
    /// parent is reparented, and one that was moved within its parent is
    /// reordered. Every attached node missing from the index is added,
    /// nested ones included. Attribute and text changes are reported for
    /// nodes still in the document.
    pub fn batch(&self) -> ChangeBatch {
        let mut batch = ChangeBatch::new();
        for &(node, old_parent) in &self.original {
            if !self.reachable(node) {
                batch.remove(node, old_parent);
            } else if self.tree.parent(node) != Some(old_parent) {
                batch.reparent(node, old_parent);
            } else if self.moved.contains(&node) {
                batch.reorder(node, old_parent);
            }
        }
        for node in self.attached() {
            if !self.index.contains(node) {
                batch.add(node);
            }
        }
        for (name, nodes) in &self.attributes {
            for &node in nodes {
                if self.reachable(node) {
                    batch.change_attribute(name, node);
                }
            }
        }
        for &node in &self.texts {
            if self.reachable(node) {
                batch.change_text(node);
            }
        }
        batch
    }

    /// Every attached node, in document order.
    fn attached(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.tree.children(node).iter().rev());
        }
        out
    }

    /// Paths of every attached node in the current tree, in document order.
    pub fn paths(&self, elements_only: bool) -> Vec<Vec<usize>> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root(), Vec::new())];
        while let Some((node, path)) = stack.pop() {
            for (i, &child) in self.tree.children(node).iter().enumerate() {
                let mut child_path = path.clone();
                child_path.push(i);
                stack.push((child, child_path));
            }
            if !elements_only || self.tree.tag(node).is_some() {
                out.push(path);
            }
        }
        out.sort();
        out
    }

    pub fn synthesize_batch(&self, batch: &ChangeBatch) -> Vec<Operation> {
        summary_to_oplist(&self.tree, &self.index, batch, &SynthesisOptions::default())
            .expect("synthesis succeeds")
    }

    pub fn synthesize(&self) -> Vec<Operation> {
        self.synthesize_batch(&self.batch())
    }
}
