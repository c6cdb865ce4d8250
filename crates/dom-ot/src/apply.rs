//! Oplist replay.
//!
//! The receiving side of an oplist: operations are applied in list order to
//! a copy of the tree as it was before the batch.

use thiserror::Error;
use tracing::trace;

use crate::json_ml::{materialize, JsonMlError};
use crate::ops::Operation;
use crate::path::{resolve, Path, PathError};
use crate::tree::{NodeId, Tree, TreeError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("invalid payload: {0}")]
    Payload(#[from] JsonMlError),
    #[error("cannot remove the root node")]
    RootRemoval,
    #[error("cannot insert at the root path")]
    RootReplacement,
    #[error("move has neither source nor destination")]
    EmptyMove,
    #[error("insertion at {0:?} carries no payload and moves no node")]
    MissingPayload(Path),
}

// ── Individual operation applicators ──────────────────────────────────────

fn apply_move(
    tree: &mut Tree,
    root: NodeId,
    from: Option<&Path>,
    to: Option<&Path>,
    payload: Option<&serde_json::Value>,
) -> Result<(), ApplyError> {
    if from.is_none() && to.is_none() {
        return Err(ApplyError::EmptyMove);
    }

    let detached = match from {
        Some(from) if from.is_empty() => return Err(ApplyError::RootRemoval),
        Some(from) => {
            let node = resolve(tree, root, from)?;
            tree.detach(node);
            Some(node)
        }
        None => None,
    };

    let Some(to) = to else {
        return Ok(());
    };
    let Some((&index, parent_path)) = to.split_last() else {
        return Err(ApplyError::RootReplacement);
    };
    let node = match (payload, detached) {
        (Some(payload), _) => materialize(tree, payload)?,
        (None, Some(node)) => node,
        (None, None) => return Err(ApplyError::MissingPayload(to.clone())),
    };
    let parent = resolve(tree, root, parent_path)?;
    tree.insert_child(parent, index, node)?;
    Ok(())
}

/// Apply one operation to `tree`, addressed from its root.
pub fn apply_op(tree: &mut Tree, op: &Operation) -> Result<(), ApplyError> {
    let root = tree.root().ok_or(PathError::MissingRoot)?;
    trace!(op = op.op_name(), path = ?op.governing_path(), "apply");
    match op {
        Operation::Move { from, to, payload } => {
            apply_move(tree, root, from.as_ref(), to.as_ref(), payload.as_ref())
        }
        Operation::Manipulate {
            path,
            attribute,
            value,
        } => {
            let node = resolve(tree, root, path)?;
            match value {
                Some(value) => tree.set_attribute(node, attribute, value)?,
                None => {
                    tree.remove_attribute(node, attribute)?;
                }
            }
            Ok(())
        }
        Operation::ManipulateText { path, text } => {
            let node = resolve(tree, root, path)?;
            tree.set_text(node, text)?;
            Ok(())
        }
    }
}

/// Apply every operation in order, stopping at the first failure.
pub fn apply_oplist(tree: &mut Tree, ops: &[Operation]) -> Result<(), ApplyError> {
    for op in ops {
        apply_op(tree, op)?;
    }
    Ok(())
}
