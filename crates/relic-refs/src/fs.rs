//! Filesystem-backed reference store.
//!
//! Layout under the repository metadata directory:
//!
//! ```text
//! refs/heads/<branch>   text file holding the target commit id in hex
//! HEAD                  text file holding "ref: refs/heads/<branch>"
//! ```
//!
//! Files are read fully at the start of an operation and written fully at
//! the end; there is no locking (single local writer by design).

use std::fs;
use std::path::{Path, PathBuf};

use relic_types::ObjectId;
use tracing::debug;

use crate::error::{RefError, Result};
use crate::names::validate_branch_name;
use crate::traits::RefStore;
use crate::types::Branch;

/// Prefix written to the HEAD file before the branch name.
const HEAD_REF_PREFIX: &str = "ref: refs/heads/";

/// A filesystem implementation of [`RefStore`].
pub struct FsRefStore {
    /// Directory holding one file per branch (`refs/heads`).
    heads_dir: PathBuf,
    /// The HEAD file.
    head_file: PathBuf,
}

impl FsRefStore {
    /// Open (or create) a ref store under the given metadata directory.
    pub fn open(meta_dir: &Path) -> Result<Self> {
        let heads_dir = meta_dir.join("refs").join("heads");
        fs::create_dir_all(&heads_dir)?;
        Ok(Self {
            heads_dir,
            head_file: meta_dir.join("HEAD"),
        })
    }

    fn branch_path(&self, name: &str) -> PathBuf {
        self.heads_dir.join(name)
    }

    fn read_target(&self, path: &Path, name: &str) -> Result<Option<ObjectId>> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let id = ObjectId::from_hex(text.trim()).map_err(|e| {
            RefError::Serialization(format!("branch {name}: {e}"))
        })?;
        Ok(Some(id))
    }

    fn write_target(&self, name: &str, target: &ObjectId) -> Result<()> {
        let path = self.branch_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, format!("{}\n", target.to_hex()))?;
        debug!(branch = name, target = %target.short_hex(), "wrote branch ref");
        Ok(())
    }
}

impl RefStore for FsRefStore {
    fn read_branch(&self, name: &str) -> Result<Option<Branch>> {
        Ok(self
            .read_target(&self.branch_path(name), name)?
            .map(|target| Branch::new(name, target)))
    }

    fn create_branch(&self, name: &str, target: ObjectId) -> Result<()> {
        validate_branch_name(name)?;
        if self.branch_path(name).exists() {
            return Err(RefError::AlreadyExists {
                name: name.to_string(),
            });
        }
        self.write_target(name, &target)
    }

    fn move_branch(&self, name: &str, target: ObjectId) -> Result<()> {
        if !self.branch_path(name).exists() {
            return Err(RefError::NotFound {
                name: name.to_string(),
            });
        }
        self.write_target(name, &target)
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        if self.head()?.as_deref() == Some(name) {
            return Err(RefError::DeleteCurrentBranch {
                name: name.to_string(),
            });
        }

        let path = self.branch_path(name);
        if !path.exists() {
            return Err(RefError::NotFound {
                name: name.to_string(),
            });
        }
        fs::remove_file(&path)?;
        debug!(branch = name, "deleted branch ref");
        Ok(())
    }

    fn branches(&self) -> Result<Vec<Branch>> {
        let mut result = Vec::new();
        collect_branches(&self.heads_dir, String::new(), &mut result)?;
        for branch in &mut result {
            // Re-read through the trait path so hex parsing stays in one place.
            if let Some(target) = self.read_target(&self.branch_path(&branch.name), &branch.name)? {
                branch.target = target;
            }
        }
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    fn head(&self) -> Result<Option<String>> {
        let text = match fs::read_to_string(&self.head_file) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let trimmed = text.trim();
        match trimmed.strip_prefix(HEAD_REF_PREFIX) {
            Some(name) if !name.is_empty() => Ok(Some(name.to_string())),
            _ => Err(RefError::Serialization(format!(
                "malformed HEAD file: {trimmed:?}"
            ))),
        }
    }

    fn set_head(&self, branch: &str) -> Result<()> {
        validate_branch_name(branch)?;
        fs::write(&self.head_file, format!("{HEAD_REF_PREFIX}{branch}\n"))?;
        debug!(branch, "HEAD re-pointed");
        Ok(())
    }
}

/// Recursively collect branch names (nested names like `feature/auth` map
/// to nested directories under `refs/heads`).
fn collect_branches(dir: &Path, prefix: String, out: &mut Vec<Branch>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let name = if prefix.is_empty() {
            file_name
        } else {
            format!("{prefix}/{file_name}")
        };
        if entry.file_type()?.is_dir() {
            collect_branches(&entry.path(), name, out)?;
        } else {
            out.push(Branch::new(name, ObjectId::null()));
        }
    }
    Ok(())
}

impl std::fmt::Debug for FsRefStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsRefStore")
            .field("heads_dir", &self.heads_dir)
            .finish()
    }
}
