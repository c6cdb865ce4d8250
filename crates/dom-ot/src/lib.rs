//! dom-ot: translate batches of tree changes into replayable oplists.
//!
//! A change observer reports which nodes of an ordered element/text tree
//! were removed, moved, added or edited. [`summary_to_oplist`] turns such a
//! batch into a path-addressed list of [`Operation`]s, sorted by path and
//! adjusted so that a remote peer replaying the list in order against its
//! copy of the previous tree ends up with the changed tree.
//!
//! ```text
//! create_index(&tree)        stamp pre-batch addresses
//! ... mutate tree, fill a ChangeBatch ...
//! summary_to_oplist(..)      build, converge, transform, sort
//! apply_oplist(&mut remote)  replay on the other side
//! ```

pub mod tree;
pub mod path;
pub mod index;
pub mod json_ml;
pub mod summary;

pub mod ops;
pub mod adapter;
pub mod apply;

pub use adapter::{summary_to_oplist, OplistError, SynthesisOptions};
pub use apply::{apply_op, apply_oplist, ApplyError};
pub use index::{create_index, PathIndex};
pub use ops::{Operation, Side};
pub use path::{path_to, Path, PathError};
pub use summary::ChangeBatch;
pub use tree::{NodeId, Tree};
