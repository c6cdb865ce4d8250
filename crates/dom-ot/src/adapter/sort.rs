//! Canonical operation order.
//!
//! Operations are ordered by the sort key of their governing path. The sort
//! is stable, so operations with equal keys keep their relative order.

use std::cmp::Ordering;

use crate::ops::Operation;
use crate::path::sort_key;

pub(crate) fn op_key(op: &Operation) -> String {
    op.governing_path().map(|p| sort_key(p)).unwrap_or_default()
}

pub fn compare_ops(a: &Operation, b: &Operation) -> Ordering {
    op_key(a).cmp(&op_key(b))
}

pub fn sort_ops(ops: &mut [Operation]) {
    ops.sort_by_cached_key(op_key);
}

/// Indices of `ops` in canonical order, leaving `ops` untouched.
pub fn sorted_order(ops: &[Operation]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..ops.len()).collect();
    order.sort_by_cached_key(|&i| op_key(&ops[i]));
    order
}

pub fn is_sorted(ops: &[Operation]) -> bool {
    ops.windows(2).all(|w| compare_ops(&w[0], &w[1]) != Ordering::Greater)
}
