//! Conflict resolution.
//!
//! Insertions and manipulates already address the final tree, but a removal
//! names its node by pre-batch address. Replay performs the removals of a
//! sibling gap before the insertions into it, so each source is carried to
//! the final-tree slot it is read from. Two passes do this:
//!
//! 1. Against every other source, visited from the last-sorting one down.
//!    An earlier removed sibling lowers it and a removed ancestor clears it.
//! 2. Against every destination, visited in ascending order. An insertion
//!    before it raises it.
//!
//! Each pass reads the other operations from a snapshot taken when the pass
//! starts, while the operation being adjusted uses its own current source.
//! Relocations must already be split into a removal and an insertion.

use tracing::trace;

use super::sort::sorted_order;
use crate::ops::{Operation, Side};
use crate::path::sort_key;

fn run_pass(ops: &mut [Operation], order: &[usize], side: Side) {
    let snapshot = ops.to_vec();
    let others: Vec<usize> = match side {
        Side::Source => order.iter().rev().copied().collect(),
        Side::Destination => order.to_vec(),
    };

    for &i in order {
        for &j in &others {
            if i == j {
                continue;
            }
            let other = &snapshot[j];
            let against = match side {
                Side::Destination => other.to(),
                Side::Source => other.from(),
            };
            let Some(against) = against else {
                continue;
            };
            let Some(source) = ops[i].source() else {
                break;
            };
            if sort_key(source) > sort_key(against) {
                trace!(op = i, other = j, ?side, source = ?source, "transform");
                ops[i].transform_against(other, side);
            }
        }
    }
}

/// Rewrite every removal's source to its replay address.
///
/// `ops` keeps its incoming order.
pub(crate) fn resolve_conflicts(ops: &mut [Operation]) {
    let order = sorted_order(ops);
    run_pass(ops, &order, Side::Source);
    run_pass(ops, &order, Side::Destination);
}
