use std::collections::{BTreeMap, BTreeSet};

use relic_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::{StageError, StageResult};

/// The staging area: the record of pending, not-yet-committed differences
/// between the working directory and the last commit.
///
/// Three parts:
/// - `added`: path -> blob ID pending inclusion in the next commit
/// - `removed`: paths pending removal from tracking
/// - `tracked`: path -> blob ID as of the last commit this stage was
///   synchronized with
///
/// `tracked` is only ever replaced wholesale: by [`commit_changes`] and by
/// [`reset_to`] (checkout, reset, merge completion). It is never partially
/// edited outside those transitions.
///
/// [`commit_changes`]: Stage::commit_changes
/// [`reset_to`]: Stage::reset_to
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    added: BTreeMap<String, ObjectId>,
    removed: BTreeSet<String>,
    tracked: BTreeMap<String, ObjectId>,
}

/// What [`Stage::remove`] did, so the caller knows whether to delete the
/// working copy (only tracked paths get their file removed).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Removal {
    /// The path was dropped from the pending additions.
    pub was_staged: bool,
    /// The path was tracked and is now staged for removal; the caller
    /// should delete the working-directory copy.
    pub delete_working_copy: bool,
}

impl Stage {
    /// Create an empty stage (fresh repository).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if neither additions nor removals are pending.
    pub fn is_clean(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Pending additions: path -> blob ID.
    pub fn added(&self) -> &BTreeMap<String, ObjectId> {
        &self.added
    }

    /// Paths staged for removal.
    pub fn removed(&self) -> &BTreeSet<String> {
        &self.removed
    }

    /// The tracked snapshot of the last synchronized commit.
    pub fn tracked(&self) -> &BTreeMap<String, ObjectId> {
        &self.tracked
    }

    /// Returns `true` if the path is known to the stage at all (tracked or
    /// staged for addition).
    pub fn knows(&self, path: &str) -> bool {
        self.tracked.contains_key(path) || self.added.contains_key(path)
    }

    // ---------------------------------------------------------------
    // Transitions
    // ---------------------------------------------------------------

    /// Stage a path whose current content hashes to `blob_id`.
    ///
    /// If the last commit already tracks exactly this content, the path is
    /// dropped from both pending sets instead: re-adding an unchanged file
    /// is a net no-op. Returns `true` if the stage changed.
    pub fn add(&mut self, path: &str, blob_id: ObjectId) -> bool {
        let mut changed = self.removed.remove(path);

        if self.tracked.get(path) == Some(&blob_id) {
            if self.added.remove(path).is_some() {
                changed = true;
            }
            return changed;
        }

        let previous = self.added.insert(path.to_string(), blob_id);
        changed |= previous != Some(blob_id);
        changed
    }

    /// Unstage a pending addition and/or stage a tracked path for removal.
    ///
    /// Fails with [`StageError::NothingToRemove`] if the path is neither
    /// tracked nor staged for addition.
    pub fn remove(&mut self, path: &str) -> StageResult<Removal> {
        let was_staged = self.added.remove(path).is_some();
        let tracked = self.tracked.contains_key(path);

        if !was_staged && !tracked {
            return Err(StageError::NothingToRemove {
                path: path.to_string(),
            });
        }

        if tracked {
            self.removed.insert(path.to_string());
        }

        Ok(Removal {
            was_staged,
            delete_working_copy: tracked,
        })
    }

    /// Fold the pending changes into `tracked` and clear them.
    ///
    /// Fails with [`StageError::NoChanges`] when nothing is pending. The
    /// returned mapping is the tree for the new commit.
    pub fn commit_changes(&mut self) -> StageResult<BTreeMap<String, ObjectId>> {
        if self.is_clean() {
            return Err(StageError::NoChanges);
        }

        for (path, blob_id) in std::mem::take(&mut self.added) {
            self.tracked.insert(path, blob_id);
        }
        for path in std::mem::take(&mut self.removed) {
            self.tracked.remove(&path);
        }

        Ok(self.tracked.clone())
    }

    /// Replace `tracked` wholesale with a commit's tree and clear the
    /// pending sets. Used after checkout, reset, and merge completion.
    pub fn reset_to(&mut self, tree: &BTreeMap<String, ObjectId>) {
        self.added.clear();
        self.removed.clear();
        self.tracked = tree.clone();
    }
}
