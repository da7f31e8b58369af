//! The Relic repository facade.
//!
//! [`Repository`] ties the lower layers together over one working
//! directory: the content-addressed object store, the branch/HEAD
//! reference store, and the staging area, plus the working-tree file I/O
//! the lower crates deliberately avoid.
//!
//! Every public operation follows the same shape: load the stage and refs
//! from disk, run to completion in memory, write everything back. There is
//! no partial-write recovery and no cross-process locking; the system
//! assumes a single writer per invocation.
//!
//! The facade never prints. Each operation returns a structured result
//! ([`LogEntry`], [`StatusReport`], [`MergeReport`], ...) or a typed
//! [`RepoError`] for the presentation layer to render.

pub mod error;
pub mod report;
pub mod repository;
mod workdir;

pub use error::{RepoError, RepoResult};
pub use report::{
    LogEntry, MergeReport, ModificationEntry, ModificationKind, StatusReport,
};
pub use repository::{Repository, DEFAULT_BRANCH, META_DIR_NAME};
