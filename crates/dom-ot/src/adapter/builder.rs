//! One operation per changed node per category.

use tracing::trace;

use super::OplistError;
use crate::index::PathIndex;
use crate::json_ml::serialize;
use crate::ops::Operation;
use crate::path::{is_reachable, path_to, Path};
use crate::summary::ChangeBatch;
use crate::tree::{NodeId, Tree};

struct Builder<'a> {
    tree: &'a Tree,
    index: &'a PathIndex,
    batch: &'a ChangeBatch,
    root: NodeId,
    ops: Vec<Operation>,
}

impl Builder<'_> {
    /// The node's prior parent is no longer attached below the root, so an
    /// ancestor removal already accounts for it.
    fn lost_prior_parent(&self, node: NodeId) -> bool {
        self.batch
            .prior_parent(node)
            .is_some_and(|parent| !is_reachable(self.tree, parent, self.root))
    }

    fn stamped(&self, node: NodeId) -> Result<Path, OplistError> {
        self.index
            .stamped_path(node)
            .cloned()
            .ok_or(OplistError::NotIndexed(node))
    }

    fn current(&self, node: NodeId) -> Result<Path, OplistError> {
        Ok(path_to(self.tree, node, self.root)?)
    }

    fn removed(&mut self) -> Result<(), OplistError> {
        for &node in &self.batch.removed {
            if self.lost_prior_parent(node) {
                trace!(%node, "skip removal under removed ancestor");
                continue;
            }
            let from = self.stamped(node)?;
            self.ops.push(Operation::remove(from, serialize(self.tree, node)));
        }
        Ok(())
    }

    fn reparented(&mut self) -> Result<(), OplistError> {
        for &node in &self.batch.reparented {
            let from = if self.lost_prior_parent(node) {
                trace!(%node, "prior parent removed, treating reparent as insertion");
                None
            } else {
                Some(self.stamped(node)?)
            };
            let to = self.current(node)?;
            self.ops.push(Operation::Move {
                from,
                to: Some(to),
                payload: Some(serialize(self.tree, node)),
            });
        }
        Ok(())
    }

    fn reordered(&mut self) -> Result<(), OplistError> {
        for &node in &self.batch.reordered {
            if self.lost_prior_parent(node) {
                trace!(%node, "skip reorder under removed ancestor");
                continue;
            }
            let from = self.stamped(node)?;
            let to = self.current(node)?;
            self.ops.push(Operation::relocate(from, to, None));
        }
        Ok(())
    }

    fn added(&mut self) -> Result<(), OplistError> {
        for &node in &self.batch.added {
            let to = self.current(node)?;
            self.ops.push(Operation::insert(to, serialize(self.tree, node)));
        }
        Ok(())
    }

    fn attributes(&mut self) -> Result<(), OplistError> {
        for (name, nodes) in &self.batch.attribute_changed {
            for &node in nodes {
                let path = self.current(node)?;
                let value = self
                    .batch
                    .current_attribute_value(self.tree, node, name)
                    .map(str::to_owned);
                self.ops.push(Operation::Manipulate {
                    path,
                    attribute: name.clone(),
                    value,
                });
            }
        }
        Ok(())
    }

    fn character_data(&mut self) -> Result<(), OplistError> {
        for &node in &self.batch.character_data_changed {
            let path = self.current(node)?;
            let text = self.batch.current_text(self.tree, node).unwrap_or_default().to_owned();
            self.ops.push(Operation::ManipulateText { path, text });
        }
        Ok(())
    }
}

/// Emit the raw oplist in category order: removals, relocations, reorders,
/// insertions, attributes, text.
pub(crate) fn build_oplist(
    tree: &Tree,
    index: &PathIndex,
    batch: &ChangeBatch,
    root: NodeId,
) -> Result<Vec<Operation>, OplistError> {
    let mut builder = Builder {
        tree,
        index,
        batch,
        root,
        ops: Vec::with_capacity(batch.len()),
    };
    builder.removed()?;
    builder.reparented()?;
    builder.reordered()?;
    builder.added()?;
    builder.attributes()?;
    builder.character_data()?;
    Ok(builder.ops)
}
