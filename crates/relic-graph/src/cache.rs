use std::collections::HashMap;

use relic_store::{Commit, ObjectStore, StoreError};
use relic_types::ObjectId;

use crate::error::{GraphError, GraphResult};

/// Memoizing commit loader.
///
/// Graph traversals revisit the same commits through shared sub-paths; the
/// cache loads each commit record from the store at most once per
/// traversal session. A commit that cannot be found is reported as a
/// dangling reference, since every ID handed to the graph layer came from
/// a parent link or a branch pointer.
pub struct CommitCache<'a> {
    store: &'a dyn ObjectStore,
    loaded: HashMap<ObjectId, Commit>,
}

impl<'a> CommitCache<'a> {
    /// Create an empty cache over the given store.
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self {
            store,
            loaded: HashMap::new(),
        }
    }

    /// Load a commit, memoized.
    pub fn get(&mut self, id: &ObjectId) -> GraphResult<&Commit> {
        if !self.loaded.contains_key(id) {
            let commit = match relic_store::load_commit(self.store, id) {
                Ok(commit) => commit,
                Err(StoreError::NotFound(_)) => return Err(GraphError::DanglingCommit(*id)),
                Err(e) => return Err(e.into()),
            };
            self.loaded.insert(*id, commit);
        }
        Ok(&self.loaded[id])
    }

    /// Number of commits loaded so far.
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Returns `true` if nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}
