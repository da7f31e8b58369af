//! Branch and HEAD reference management for Relic.
//!
//! References are the mutable entry points into immutable history:
//!
//! - **Branches** are named pointers to commit IDs. They advance on commit,
//!   merge, reset, and fast-forward.
//! - **HEAD** names the currently active branch. It never points directly
//!   at a commit; dereferencing always goes through the named branch, so a
//!   moved branch is immediately visible to anything holding only the name.
//!
//! # Modules
//!
//! - [`error`] -- Error types for ref operations
//! - [`types`] -- The [`Branch`] record
//! - [`traits`] -- The [`RefStore`] trait defining the storage interface
//! - [`names`] -- Branch name validation
//! - [`memory`] -- In-memory [`InMemoryRefStore`] for tests
//! - [`fs`] -- Filesystem-backed [`FsRefStore`]

pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod traits;
pub mod types;

pub use error::{RefError, Result};
pub use fs::FsRefStore;
pub use memory::InMemoryRefStore;
pub use names::validate_branch_name;
pub use traits::RefStore;
pub use types::Branch;
