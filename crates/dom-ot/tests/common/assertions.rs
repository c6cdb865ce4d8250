#![allow(dead_code)]

use dom_ot::ops::codec::{oplist_from_json, oplist_to_json};
use dom_ot::{apply_oplist, Operation};

use super::fixtures::{snapshot, tree_from, Session};

/// Send `ops` over the wire form and replay them on a fresh copy of the
/// pre-batch tree; the result must equal the edited tree.
pub fn assert_replays(session: &Session, ops: &[Operation]) {
    let wire = oplist_to_json(ops);
    let received = oplist_from_json(&wire).expect("wire form decodes");
    assert_eq!(received, ops);

    let mut remote = tree_from(&session.before);
    apply_oplist(&mut remote, &received).unwrap_or_else(|e| panic!("replay of {wire} failed: {e}"));
    assert_eq!(snapshot(&remote), snapshot(&session.tree), "oplist {wire}");
}

/// Synthesize the session's batch and check it replays.
pub fn synthesize_and_replay(session: &Session) -> Vec<Operation> {
    let ops = session.synthesize();
    assert_replays(session, &ops);
    ops
}
