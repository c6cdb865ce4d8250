//! Relocations as a removal half and an insertion half.
//!
//! The removal of a relocated node and its placement are often replayed far
//! apart: the node may leave after later siblings have been inserted, or
//! arrive before an earlier sibling has left. Each relocation is therefore
//! split before conflict resolution. Its insertion half carries the subtree
//! as a payload. After the final sort, halves that ended up next to each
//! other are joined back into one relocation.

use tracing::trace;

use super::sort::op_key;
use super::OplistError;
use crate::json_ml::serialize;
use crate::ops::{lower_path, Operation};
use crate::path::{is_strict_prefix, resolve, sort_key, Path};
use crate::tree::{NodeId, Tree};

/// Bookkeeping that travels next to an operation until halves are joined.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Origin {
    /// Pre-batch source of a removal.
    source: Option<Path>,
    /// Index of the relocation this operation is half of.
    pair: Option<usize>,
    /// Whether a joined relocation keeps the payload.
    keep_payload: bool,
}

/// Whether any built operation places or removes a node strictly inside the
/// relocated subtree. The joined relocation then moves the payload rather
/// than the pre-batch node.
fn covers(from: &[usize], to: &[usize], built: &[Operation]) -> bool {
    built.iter().any(|op| {
        op.to().is_some_and(|t| is_strict_prefix(to, t))
            || op.from().is_some_and(|f| is_strict_prefix(from, f))
    })
}

/// Split every relocation in `ops` into a removal and an insertion.
///
/// `built` is the oplist as it left the builder, before convergence. The
/// returned origins run parallel to the returned operations.
pub(crate) fn split(
    tree: &Tree,
    root: NodeId,
    built: &[Operation],
    ops: Vec<Operation>,
) -> Result<(Vec<Operation>, Vec<Origin>), OplistError> {
    let mut out = Vec::with_capacity(ops.len());
    let mut origins = Vec::with_capacity(ops.len());

    for (pair, op) in ops.into_iter().enumerate() {
        let (from, to, payload) = match op {
            Operation::Move {
                from: Some(from),
                to: Some(to),
                payload,
            } => (from, to, payload),
            other => {
                origins.push(Origin {
                    source: other.from().cloned(),
                    ..Default::default()
                });
                out.push(other);
                continue;
            }
        };

        let keep_payload = payload.is_some() || covers(&from, &to, built);
        let payload = match payload {
            Some(payload) => payload,
            None => serialize(tree, resolve(tree, root, &to)?),
        };
        trace!(from = ?from, to = ?to, keep_payload, "split relocation");

        let half = Origin {
            source: None,
            pair: Some(pair),
            keep_payload,
        };
        out.push(Operation::remove(from.clone(), payload.clone()));
        origins.push(Origin {
            source: Some(from),
            ..half.clone()
        });
        out.push(Operation::insert(to, payload));
        origins.push(half);
    }
    Ok((out, origins))
}

fn tie_rank(op: &Operation, origin: &Origin) -> (u8, String) {
    match op {
        Operation::Move { to: None, .. } => {
            (0, origin.source.as_deref().map(sort_key).unwrap_or_default())
        }
        Operation::Move { .. } => (1, String::new()),
        Operation::Manipulate { .. } | Operation::ManipulateText { .. } => (2, String::new()),
    }
}

/// Sort into canonical order.
///
/// Operations with equal keys replay removals first, in pre-batch order,
/// then insertions, then manipulates.
pub(crate) fn replay_order(staged: &mut [(Operation, Origin)]) {
    staged.sort_by_cached_key(|(op, origin)| tie_rank(op, origin));
    staged.sort_by_cached_key(|(op, _)| op_key(op));
}

fn join(first: &Operation, second: &Operation, keep_payload: bool) -> Option<Operation> {
    let (from, to, payload) = match (first, second) {
        (
            Operation::Move {
                from: Some(from),
                to: None,
                payload,
            },
            Operation::Move {
                from: None,
                to: Some(to),
                ..
            },
        ) => (from.clone(), to.clone(), payload),
        (
            Operation::Move {
                from: None,
                to: Some(to),
                payload,
            },
            Operation::Move {
                from: Some(from),
                to: None,
                ..
            },
        ) => {
            // Read the source before the insertion shifts it.
            let from = lower_path(to, from).unwrap_or_else(|| from.clone());
            (from, to.clone(), payload)
        }
        _ => return None,
    };
    let payload = if keep_payload { payload.clone() } else { None };
    Some(Operation::relocate(from, to, payload))
}

/// Join adjacent halves of the same relocation.
pub(crate) fn rejoin(staged: Vec<(Operation, Origin)>) -> Vec<Operation> {
    let mut out = Vec::with_capacity(staged.len());
    let mut items = staged.into_iter().peekable();

    while let Some((op, origin)) = items.next() {
        let joined = match items.peek() {
            Some((next, next_origin))
                if origin.pair.is_some() && next_origin.pair == origin.pair =>
            {
                join(&op, next, origin.keep_payload)
            }
            _ => None,
        };
        match joined {
            Some(joined) => {
                items.next();
                trace!(op = ?joined, "rejoined relocation");
                out.push(joined);
            }
            None => out.push(op),
        }
    }
    out
}
