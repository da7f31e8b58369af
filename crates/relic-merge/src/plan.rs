//! Whole-tree merge planning.

use std::collections::{BTreeMap, BTreeSet};

use relic_store::Commit;
use relic_types::ObjectId;
use serde::{Deserialize, Serialize};

use crate::classify::{classify, PathOutcome};

/// The two sides of a conflicted path (`None` = that side deleted it).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictSides {
    pub current: Option<ObjectId>,
    pub other: Option<ObjectId>,
}

/// The outcome of classifying every path of a three-way merge.
///
/// The plan is relative to the current tip: paths not mentioned anywhere in
/// the plan carry the current tip's version (or stay absent).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergePlan {
    /// Paths resolved to the other side's version.
    pub take_other: BTreeMap<String, ObjectId>,
    /// Paths the merge removes from tracking (and from the working tree).
    pub remove: BTreeSet<String>,
    /// Paths where both sides diverged; a conflict blob replaces them.
    pub conflicts: BTreeMap<String, ConflictSides>,
}

impl MergePlan {
    /// Returns `true` if no path conflicted.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Returns `true` if the plan changes nothing relative to the current
    /// tip.
    pub fn is_empty(&self) -> bool {
        self.take_other.is_empty() && self.remove.is_empty() && self.conflicts.is_empty()
    }

    /// Every path the merge will create or overwrite in the working tree
    /// (resolved takes plus conflict write-backs). Used for the
    /// untracked-overwrite guard before any file is touched.
    pub fn touched_paths(&self) -> BTreeSet<String> {
        self.take_other
            .keys()
            .chain(self.conflicts.keys())
            .cloned()
            .collect()
    }

    /// Build the merged tree from the current tip's tree, leaving conflict
    /// paths out (the caller re-inserts them once conflict blobs exist).
    pub fn resolved_tree(
        &self,
        current_tree: &BTreeMap<String, ObjectId>,
    ) -> BTreeMap<String, ObjectId> {
        let mut tree = current_tree.clone();
        for (path, id) in &self.take_other {
            tree.insert(path.clone(), *id);
        }
        for path in &self.remove {
            tree.remove(path);
        }
        for path in self.conflicts.keys() {
            tree.remove(path);
        }
        tree
    }
}

/// Classify every path present in either tip against the split point.
///
/// Pure over the three trees; no store access.
pub fn plan_merge(split: &Commit, current: &Commit, other: &Commit) -> MergePlan {
    let mut plan = MergePlan::default();

    let all_paths: BTreeSet<&String> = current.tree.keys().chain(other.tree.keys()).collect();

    for path in all_paths {
        let s = split.tree.get(path);
        let c = current.tree.get(path);
        let o = other.tree.get(path);

        match classify(s, c, o) {
            PathOutcome::KeepCurrent => {}
            PathOutcome::TakeOther(id) => {
                plan.take_other.insert(path.clone(), id);
            }
            PathOutcome::Remove => {
                plan.remove.insert(path.clone());
            }
            PathOutcome::Conflict => {
                plan.conflicts.insert(
                    path.clone(),
                    ConflictSides {
                        current: c.copied(),
                        other: o.copied(),
                    },
                );
            }
        }
    }

    plan
}
