//! Convergence filter.
//!
//! When a node and one of its ancestors are both placed in the same batch,
//! the ancestor's payload already carries the node. The node's own
//! destination is dropped: a pure insertion disappears, a relocation keeps
//! only its source and becomes a deletion.

use tracing::trace;

use crate::ops::Operation;
use crate::path::{is_strict_prefix, Path};

pub(crate) fn converge(ops: Vec<Operation>) -> Vec<Operation> {
    // Compared against the unfiltered set.
    let destinations: Vec<Option<Path>> = ops.iter().map(|op| op.to().cloned()).collect();

    ops.into_iter()
        .enumerate()
        .filter_map(|(i, mut op)| {
            let covered = op.to().is_some_and(|to| {
                destinations.iter().enumerate().any(|(j, other)| {
                    j != i && other.as_deref().is_some_and(|other| is_strict_prefix(other, to))
                })
            });
            if !covered {
                return Some(op);
            }
            if let Operation::Move { from: Some(_), to, .. } = &mut op {
                trace!(to = ?to, "demote to deletion, ancestor placement covers it");
                *to = None;
                return Some(op);
            }
            trace!(to = ?op.to(), "drop insertion, ancestor placement covers it");
            None
        })
        .collect()
}
