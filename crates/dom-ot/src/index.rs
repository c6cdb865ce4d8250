//! Pre-change position index.
//!
//! Before a batch of changes is applied to the live tree, every node is
//! stamped with its address in a side table. Once the batch has been applied
//! the table still answers "where was this node before", which the live tree
//! alone can no longer tell for removed or relocated nodes.

use std::collections::HashMap;

use crate::path::{Path, PathError};
use crate::tree::{NodeId, Tree};

/// Stamped paths of one indexing epoch.
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    root: Option<NodeId>,
    paths: HashMap<NodeId, Path>,
}

impl PathIndex {
    /// Stamp `root` and every node below it with its current path.
    pub fn build(tree: &Tree, root: NodeId) -> Self {
        let mut paths = HashMap::new();
        let mut stack = vec![(root, Path::new())];
        while let Some((node, path)) = stack.pop() {
            for (i, &child) in tree.children(node).iter().enumerate() {
                let mut child_path = path.clone();
                child_path.push(i);
                stack.push((child, child_path));
            }
            paths.insert(node, path);
        }
        Self {
            root: Some(root),
            paths,
        }
    }

    /// Root the index was built from.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn stamped_path(&self, node: NodeId) -> Option<&Path> {
        self.paths.get(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.paths.contains_key(&node)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Index the tree from its designated root.
///
/// Must be called again after every applied batch.
pub fn create_index(tree: &Tree) -> Result<PathIndex, PathError> {
    let root = tree.root().ok_or(PathError::MissingRoot)?;
    Ok(PathIndex::build(tree, root))
}
