use relic_store::{Commit, ObjectStore};
use relic_types::ObjectId;

use crate::cache::CommitCache;
use crate::error::GraphResult;

/// One step of a history walk: the commit together with its ID.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub id: ObjectId,
    pub commit: Commit,
}

/// Lazy first-parent walk from a tip commit back to the root.
///
/// At each step only the **first** parent is followed, which gives a stable
/// linear order for log display; a merge's second parent never appears.
/// The walk is finite (the graph is a DAG rooted at a parentless commit)
/// and not restartable.
pub struct History<'a> {
    cache: CommitCache<'a>,
    next: Option<ObjectId>,
}

impl<'a> History<'a> {
    /// Start a walk at the given tip.
    pub fn from(store: &'a dyn ObjectStore, tip: ObjectId) -> Self {
        Self {
            cache: CommitCache::new(store),
            next: Some(tip),
        }
    }
}

impl Iterator for History<'_> {
    type Item = GraphResult<HistoryEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        match self.cache.get(&id) {
            Ok(commit) => {
                self.next = commit.first_parent().copied();
                Some(Ok(HistoryEntry {
                    id,
                    commit: commit.clone(),
                }))
            }
            // A load failure ends the walk after yielding the error.
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use relic_store::InMemoryObjectStore;
    use relic_types::Timestamp;
    use std::collections::BTreeMap;

    fn put(store: &InMemoryObjectStore, message: &str, ms: u64, parents: Vec<ObjectId>) -> ObjectId {
        let commit = Commit::new(message, Timestamp::from_ms(ms), parents, BTreeMap::new());
        store.write(&commit.to_stored_object().unwrap()).unwrap()
    }

    #[test]
    fn walks_linear_chain_to_root() {
        let store = InMemoryObjectStore::new();
        let root = put(&store, "root", 0, vec![]);
        let mid = put(&store, "mid", 1, vec![root]);
        let tip = put(&store, "tip", 2, vec![mid]);

        let messages: Vec<String> = History::from(&store, tip)
            .map(|e| e.unwrap().commit.message)
            .collect();
        assert_eq!(messages, vec!["tip", "mid", "root"]);
    }

    #[test]
    fn terminates_at_parentless_commit() {
        let store = InMemoryObjectStore::new();
        let root = put(&store, "root", 0, vec![]);

        let entries: Vec<_> = History::from(&store, root).collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].as_ref().unwrap().commit.is_root());
    }

    #[test]
    fn follows_only_the_first_parent() {
        let store = InMemoryObjectStore::new();
        let root = put(&store, "root", 0, vec![]);
        let ours = put(&store, "ours", 1, vec![root]);
        let theirs = put(&store, "theirs", 2, vec![root]);
        let merge = put(&store, "merge", 3, vec![ours, theirs]);

        let messages: Vec<String> = History::from(&store, merge)
            .map(|e| e.unwrap().commit.message)
            .collect();
        // The second-parent side ("theirs") is invisible to the walk.
        assert_eq!(messages, vec!["merge", "ours", "root"]);
    }

    #[test]
    fn deep_history_does_not_recurse() {
        let store = InMemoryObjectStore::new();
        let mut tip = put(&store, "c0", 0, vec![]);
        for i in 1..2000u64 {
            tip = put(&store, &format!("c{i}"), i, vec![tip]);
        }

        let count = History::from(&store, tip).count();
        assert_eq!(count, 2000);
    }

    #[test]
    fn missing_tip_yields_error_then_stops() {
        let store = InMemoryObjectStore::new();
        let mut walk = History::from(&store, ObjectId::from_bytes(b"missing"));
        let first = walk.next().unwrap();
        assert!(matches!(first, Err(GraphError::DanglingCommit(_))));
        assert!(walk.next().is_none());
    }
}
