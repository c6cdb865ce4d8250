//! Change batch to oplist synthesis.
//!
//! ```text
//! ChangeBatch ─▶ build ─▶ converge ─▶ split relocations
//!             ─▶ transform (vs sources, vs destinations) ─▶ drop empty moves
//!             ─▶ sort ─▶ rejoin relocations ─▶ Vec<Operation>
//! ```
//!
//! The tree passed in is the tree *after* the batch; the [`PathIndex`] must
//! have been built from the same tree *before* the batch.

mod builder;
mod converge;
mod relocation;
pub mod sort;
mod transform;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::index::PathIndex;
use crate::ops::Operation;
use crate::path::{oversized_segment, Path, PathError};
use crate::summary::ChangeBatch;
use crate::tree::{NodeId, Tree};

pub use sort::{compare_ops, is_sorted, sort_ops};

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OplistError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("node {0} has no stamped path; the tree must be indexed before each batch")]
    NotIndexed(NodeId),
    #[error("path {path:?} has segment {segment}, too wide to sort")]
    PathTooWide { path: Path, segment: usize },
}

// ── Options ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct SynthesisOptions {
    /// Root the paths are computed from; defaults to the tree's root.
    pub root: Option<NodeId>,
    /// Reject path segments that would mis-sort instead of accepting them.
    pub strict_path_width: bool,
}

fn check_path_width(ops: &[Operation]) -> Result<(), OplistError> {
    for op in ops {
        for path in [op.source(), op.to()].into_iter().flatten() {
            if let Some(segment) = oversized_segment(path) {
                return Err(OplistError::PathTooWide {
                    path: path.clone(),
                    segment,
                });
            }
        }
    }
    Ok(())
}

// ── Synthesis ─────────────────────────────────────────────────────────────

/// Translate one change batch into a canonically sorted oplist that
/// reproduces the batch when replayed against the pre-batch tree.
#[instrument(skip_all, fields(changes = batch.len(), strict = options.strict_path_width))]
pub fn summary_to_oplist(
    tree: &Tree,
    index: &PathIndex,
    batch: &ChangeBatch,
    options: &SynthesisOptions,
) -> Result<Vec<Operation>, OplistError> {
    let root = options.root.or(tree.root()).ok_or(PathError::MissingRoot)?;

    let built = builder::build_oplist(tree, index, batch, root)?;
    debug!(built = built.len(), "built operations");

    let ops = converge::converge(built.clone());
    debug!(kept = ops.len(), "applied convergence filter");

    if options.strict_path_width {
        check_path_width(&ops)?;
    }

    let (mut ops, origins) = relocation::split(tree, root, &built, ops)?;
    transform::resolve_conflicts(&mut ops);
    let before = ops.len();
    let mut staged: Vec<_> = ops
        .into_iter()
        .zip(origins)
        .filter(|(op, _)| !op.is_noop())
        .collect();
    debug!(dropped = before - staged.len(), "resolved conflicts");

    relocation::replay_order(&mut staged);
    let ops = relocation::rejoin(staged);
    debug!(ops = ops.len(), "synthesized oplist");
    Ok(ops)
}
