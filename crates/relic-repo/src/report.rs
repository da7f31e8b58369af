//! Structured operation results for the presentation layer.

use relic_types::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};

/// One commit as seen by `log`, `global_log`, and `find`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// The commit ID.
    pub id: ObjectId,
    /// Parent IDs, `[current, other]` ordered for merge commits.
    pub parents: Vec<ObjectId>,
    /// Commit creation time.
    pub timestamp: Timestamp,
    /// The commit message.
    pub message: String,
}

impl LogEntry {
    /// Returns `true` if this entry is a merge commit.
    pub fn is_merge(&self) -> bool {
        self.parents.len() == 2
    }
}

/// How an unstaged working-tree file differs from what the stage knows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModificationKind {
    /// The content on disk differs from the staged/tracked content.
    Modified,
    /// The file is gone from the working tree but not staged for removal.
    Deleted,
}

/// One path in the modifications-not-staged section of a status report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModificationEntry {
    pub path: String,
    pub kind: ModificationKind,
}

/// The full repository status.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// The active branch.
    pub current_branch: String,
    /// All branch names, sorted (the current one included).
    pub branches: Vec<String>,
    /// Paths staged for addition, sorted.
    pub staged: Vec<String>,
    /// Paths staged for removal, sorted.
    pub removed: Vec<String>,
    /// Changes present on disk but not staged, sorted by path.
    pub modifications: Vec<ModificationEntry>,
    /// Paths on disk that the stage knows nothing about, sorted.
    pub untracked: Vec<String>,
}

/// The outcome of a merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeReport {
    /// The other branch's tip is already reachable from the current tip;
    /// nothing to do.
    AlreadyMerged,
    /// The current tip was an ancestor of the other tip; the current branch
    /// pointer moved forward without creating a commit.
    FastForward { target: ObjectId },
    /// A merge commit was created. `conflicts` lists the paths that
    /// received conflict blobs (empty for a clean merge).
    Merged {
        commit: ObjectId,
        conflicts: Vec<String>,
    },
}

impl MergeReport {
    /// Returns `true` if any path conflicted.
    pub fn had_conflicts(&self) -> bool {
        matches!(self, MergeReport::Merged { conflicts, .. } if !conflicts.is_empty())
    }
}
