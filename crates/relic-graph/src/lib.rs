//! Commit-graph traversal for Relic.
//!
//! Commits form a DAG through their parent links; this crate implements the
//! read-only queries over that graph:
//!
//! - [`History`] -- lazy first-parent walk from a tip to the root, the
//!   order used for linear log display (a merge's second parent is
//!   invisible to this traversal by design)
//! - [`ancestors`] -- the full reachable set over *all* parent edges
//! - [`find_merge_base`] -- the common ancestor with the latest timestamp
//!
//! All traversals use an explicit work list plus a visited set rather than
//! recursion, so arbitrarily deep histories cannot overflow the stack, and
//! commit loads are memoized in a [`CommitCache`].

pub mod ancestry;
pub mod cache;
pub mod error;
pub mod history;

pub use ancestry::{ancestors, find_merge_base};
pub use cache::CommitCache;
pub use error::{GraphError, GraphResult};
pub use history::{History, HistoryEntry};
