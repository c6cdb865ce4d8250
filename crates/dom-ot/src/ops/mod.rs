//! Tree edit operations.
//!
//! Three variants cover every change a batch can produce:
//!
//! - [`Operation::Move`]: insertion (`from = None`), deletion (`to = None`)
//!   or relocation (both set) of a whole subtree.
//! - [`Operation::Manipulate`]: set or remove one attribute.
//! - [`Operation::ManipulateText`]: replace the content of a text node.
//!
//! A `Move` source is an address in the tree *before* the batch; a `Move`
//! destination and a manipulate path are addresses in the tree *after* it.
//! [`Operation::transform_against`] carries a pre-batch source over to the
//! slot it occupies when its removal is replayed.

pub mod codec;

use serde_json::Value;

use crate::path::{is_strict_prefix, Path};

/// Which address of the other operation a transform is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The other operation's destination (`Move.to`).
    Destination,
    /// The other operation's source (`Move.from`).
    Source,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Move {
        from: Option<Path>,
        to: Option<Path>,
        /// JsonML copy of the moved subtree; absent for same-parent reorders.
        payload: Option<Value>,
    },
    Manipulate {
        path: Path,
        attribute: String,
        /// New value; `None` removes the attribute.
        value: Option<String>,
    },
    ManipulateText {
        path: Path,
        text: String,
    },
}

// ── Path arithmetic ───────────────────────────────────────────────────────

/// Increment the index in `path` at the depth of the last step of `at`, if
/// an insertion at `at` lands before it in the same sibling list.
///
/// Above the last step of `path` the node there is pushed along by an
/// insertion at its own index. At the last step `path` names the slot a
/// removal reads from, and insertions at that slot land after it.
pub(crate) fn bump_path(at: &[usize], path: &[usize]) -> Option<Path> {
    let depth = at.len().checked_sub(1)?;
    if path.len() <= depth || at[..depth] != path[..depth] {
        return None;
    }
    let shifts = if depth + 1 == path.len() {
        at[depth] < path[depth]
    } else {
        at[depth] <= path[depth]
    };
    if shifts {
        let mut new_path = path.to_vec();
        new_path[depth] += 1;
        Some(new_path)
    } else {
        None
    }
}

/// Decrement the index in `path` at the depth of the last step of `at`, if
/// `path` lies in the same sibling list strictly after `at`.
pub(crate) fn lower_path(at: &[usize], path: &[usize]) -> Option<Path> {
    let depth = at.len().checked_sub(1)?;
    if path.len() <= depth || at[..depth] != path[..depth] {
        return None;
    }
    if at[depth] < path[depth] {
        let mut new_path = path.to_vec();
        new_path[depth] -= 1;
        Some(new_path)
    } else {
        None
    }
}

enum Adjust {
    Keep,
    Replace(Path),
    Clear,
}

fn adjust_source(src: &[usize], other: &Operation, side: Side) -> Adjust {
    match side {
        Side::Destination => match other.to().and_then(|dst| bump_path(dst, src)) {
            Some(p) => Adjust::Replace(p),
            None => Adjust::Keep,
        },
        Side::Source => {
            let Some(other_from) = other.from() else {
                return Adjust::Keep;
            };
            if is_strict_prefix(other_from, src) {
                // The ancestor's removal takes this node with it.
                return Adjust::Clear;
            }
            match lower_path(other_from, src) {
                Some(p) => Adjust::Replace(p),
                None => Adjust::Keep,
            }
        }
    }
}

// ── Operation ─────────────────────────────────────────────────────────────

impl Operation {
    /// Pure insertion of `payload` at `to`.
    pub fn insert(to: Path, payload: Value) -> Self {
        Operation::Move {
            from: None,
            to: Some(to),
            payload: Some(payload),
        }
    }

    /// Pure deletion of the subtree at `from`.
    pub fn remove(from: Path, payload: Value) -> Self {
        Operation::Move {
            from: Some(from),
            to: None,
            payload: Some(payload),
        }
    }

    /// Relocation of the subtree at `from` to `to`.
    pub fn relocate(from: Path, to: Path, payload: Option<Value>) -> Self {
        Operation::Move {
            from: Some(from),
            to: Some(to),
            payload,
        }
    }

    pub fn op_name(&self) -> &'static str {
        match self {
            Operation::Move { .. } => "Move",
            Operation::Manipulate { .. } => "Manipulate",
            Operation::ManipulateText { .. } => "ManipulateText",
        }
    }

    /// `Move.from`, if any.
    pub fn from(&self) -> Option<&Path> {
        match self {
            Operation::Move { from, .. } => from.as_ref(),
            Operation::Manipulate { .. } | Operation::ManipulateText { .. } => None,
        }
    }

    /// `Move.to`, if any.
    pub fn to(&self) -> Option<&Path> {
        match self {
            Operation::Move { to, .. } => to.as_ref(),
            Operation::Manipulate { .. } | Operation::ManipulateText { .. } => None,
        }
    }

    /// Address the operation reads or writes at: `Move.from` or the
    /// manipulate path.
    pub fn source(&self) -> Option<&Path> {
        match self {
            Operation::Move { from, .. } => from.as_ref(),
            Operation::Manipulate { path, .. } | Operation::ManipulateText { path, .. } => {
                Some(path)
            }
        }
    }

    /// Path used for ordering: `to`, else `from`, else the manipulate path.
    ///
    /// `None` only for a move that has neither address left.
    pub fn governing_path(&self) -> Option<&Path> {
        match self {
            Operation::Move { from, to, .. } => to.as_ref().or(from.as_ref()),
            Operation::Manipulate { path, .. } | Operation::ManipulateText { path, .. } => {
                Some(path)
            }
        }
    }

    /// A move with neither source nor destination.
    pub fn is_noop(&self) -> bool {
        matches!(self, Operation::Move { from: None, to: None, .. })
    }

    /// Map this operation's source one step from the pre-batch tree towards
    /// the slot it is removed from during replay.
    ///
    /// Only a move source is rewritten. Against another source it shifts
    /// left when `other` removes an earlier sibling, and is cleared when
    /// `other` removes an ancestor. Against a destination it shifts right
    /// when `other` inserts before it, or at or before one of its ancestors.
    /// Destinations and manipulate paths
    /// already refer to the final tree and are left untouched.
    pub fn transform_against(&mut self, other: &Operation, side: Side) {
        match self {
            Operation::Move { from, .. } => {
                let Some(src) = from.as_ref() else {
                    return;
                };
                match adjust_source(src, other, side) {
                    Adjust::Keep => {}
                    Adjust::Replace(p) => *from = Some(p),
                    Adjust::Clear => *from = None,
                }
            }
            Operation::Manipulate { .. } | Operation::ManipulateText { .. } => {}
        }
    }
}
