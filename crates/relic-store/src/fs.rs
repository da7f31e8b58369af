//! Filesystem-backed object store.
//!
//! One file per object under a two-level sharded layout:
//!
//! ```text
//! objects/<hex[0..2]>/<hex[2..]>
//! ```
//!
//! Files hold a bincode-serialized [`StoredObject`]. The same sharding is
//! used for every object kind. Objects are verified against their ID when
//! read; a mismatch is reported as corruption rather than returned.

use std::fs;
use std::path::{Path, PathBuf};

use relic_types::ObjectId;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::StoredObject;
use crate::traits::ObjectStore;

/// Sharded one-file-per-object filesystem store.
pub struct FsObjectStore {
    /// The `objects/` directory root.
    root: PathBuf,
}

impl FsObjectStore {
    /// Open (or create) an object store rooted at the given directory.
    pub fn open(root: &Path) -> StoreResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The directory this store is rooted at.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The sharded file path for an object ID.
    fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.root.join(&hex[..2]).join(&hex[2..])
    }
}

impl ObjectStore for FsObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let path = self.object_path(id);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let object: StoredObject = bincode::deserialize(&bytes)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        // Verify content addressing on the way in: the recomputed ID must
        // match the name the object was stored under.
        let computed = object.compute_id();
        if computed != *id {
            return Err(StoreError::HashMismatch {
                id: *id,
                computed: computed.to_hex(),
            });
        }

        Ok(Some(object))
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        let path = self.object_path(&id);

        // Idempotent: an existing file already holds identical content.
        if path.exists() {
            return Ok(id);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let bytes =
            bincode::serialize(object).map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&path, bytes)?;

        debug!(id = %id.short_hex(), kind = %object.kind, "stored object");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).exists())
    }

    fn all_ids(&self) -> StoreResult<Vec<ObjectId>> {
        let mut ids = Vec::new();

        for shard in fs::read_dir(&self.root)? {
            let shard = shard?;
            if !shard.file_type()?.is_dir() {
                continue;
            }
            let prefix = shard.file_name().to_string_lossy().into_owned();
            for entry in fs::read_dir(shard.path())? {
                let entry = entry?;
                let rest = entry.file_name().to_string_lossy().into_owned();
                if let Ok(id) = ObjectId::from_hex(&format!("{prefix}{rest}")) {
                    ids.push(id);
                }
            }
        }

        ids.sort();
        Ok(ids)
    }
}

impl std::fmt::Debug for FsObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsObjectStore")
            .field("root", &self.root)
            .finish()
    }
}
