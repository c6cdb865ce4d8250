//! Sibling-index paths.
//!
//! A [`Path`] addresses a node by the child index to descend at each depth,
//! starting from a root. Paths are only meaningful against the tree state
//! they were computed from.

use thiserror::Error;

use crate::tree::{NodeId, Tree};

pub type Path = Vec<usize>;

/// Digits each segment is padded to when building a sort key.
pub const SEGMENT_WIDTH: usize = 5;

/// Largest segment that still sorts correctly under [`sort_key`].
pub const MAX_SEGMENT: usize = 99_999;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("no root node specified")]
    MissingRoot,
    #[error("cannot determine path: node {0} is not a descendant of the root node")]
    NotDescendant(NodeId),
    #[error("no node at path {0:?}")]
    NotFound(Path),
}

// ── Resolution ────────────────────────────────────────────────────────────

/// Current address of `node` relative to `root`.
///
/// Walks parent links upwards, counting preceding siblings at each level.
pub fn path_to(tree: &Tree, node: NodeId, root: NodeId) -> Result<Path, PathError> {
    let mut path = Path::new();
    let mut curr = node;
    while curr != root {
        let parent = tree.parent(curr).ok_or(PathError::NotDescendant(node))?;
        let index = tree
            .index_in_parent(curr)
            .ok_or(PathError::NotDescendant(node))?;
        path.push(index);
        curr = parent;
    }
    path.reverse();
    Ok(path)
}

/// Node currently found at `path` below `root`.
pub fn resolve(tree: &Tree, root: NodeId, path: &[usize]) -> Result<NodeId, PathError> {
    let mut curr = root;
    for &index in path {
        curr = *tree
            .children(curr)
            .get(index)
            .ok_or_else(|| PathError::NotFound(path.to_vec()))?;
    }
    Ok(curr)
}

/// True if `node` is `root` or attached somewhere below it.
pub fn is_reachable(tree: &Tree, node: NodeId, root: NodeId) -> bool {
    tree.is_inclusive_descendant(node, root)
}

// ── Ordering helpers ──────────────────────────────────────────────────────

/// Sort key for a path: every segment zero-padded to [`SEGMENT_WIDTH`] digits.
///
/// Comparing keys as strings orders paths in document (pre-order) order as
/// long as no segment exceeds [`MAX_SEGMENT`].
pub fn sort_key(path: &[usize]) -> String {
    let mut key = String::with_capacity(path.len() * SEGMENT_WIDTH);
    for segment in path {
        key.push_str(&format!("{:0width$}", segment, width = SEGMENT_WIDTH));
    }
    key
}

/// First segment too wide for [`sort_key`], if any.
pub fn oversized_segment(path: &[usize]) -> Option<usize> {
    path.iter().copied().find(|&s| s > MAX_SEGMENT)
}

/// Returns true if `prefix` is a proper prefix of `path`.
pub fn is_strict_prefix(prefix: &[usize], path: &[usize]) -> bool {
    path.len() > prefix.len() && path.starts_with(prefix)
}
