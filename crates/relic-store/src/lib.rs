//! Content-addressed object storage for Relic.
//!
//! This crate implements a hash-keyed object store analogous to git's
//! `.git/objects/` directory. Every piece of history -- file snapshots and
//! commits -- is stored as an immutable object identified by its BLAKE3
//! hash (domain-separated by object kind).
//!
//! # Object Types
//!
//! - [`Blob`] -- one file snapshot: originating path plus raw content
//! - [`Commit`] -- message, timestamp, parent links, and the tracked tree
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsObjectStore`] -- sharded one-file-per-object filesystem store
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Writes are idempotent: storing the same content twice is a no-op.
//! 3. The store is append-only: no update or delete operation exists.
//! 4. Objects are verified against their ID when read from disk.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{Blob, Commit, ObjectKind, StoredObject};
pub use traits::ObjectStore;

use relic_types::ObjectId;

/// Load a blob by ID, failing with [`StoreError::NotFound`] if absent.
pub fn load_blob(store: &dyn ObjectStore, id: &ObjectId) -> StoreResult<Blob> {
    let obj = store.read(id)?.ok_or(StoreError::NotFound(*id))?;
    Blob::from_stored_object(&obj)
}

/// Load a commit by ID, failing with [`StoreError::NotFound`] if absent.
pub fn load_commit(store: &dyn ObjectStore, id: &ObjectId) -> StoreResult<Commit> {
    let obj = store.read(id)?.ok_or(StoreError::NotFound(*id))?;
    Commit::from_stored_object(&obj)
}
