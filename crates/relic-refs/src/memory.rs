//! In-memory reference store for testing and ephemeral use.
//!
//! [`InMemoryRefStore`] keeps all branches in a `HashMap` protected by a
//! `RwLock`. It implements the full [`RefStore`] trait and is suitable for
//! unit tests and short-lived embedding.

use std::collections::HashMap;
use std::sync::RwLock;

use relic_types::ObjectId;

use crate::error::{RefError, Result};
use crate::names::validate_branch_name;
use crate::traits::RefStore;
use crate::types::Branch;

/// An in-memory implementation of [`RefStore`].
///
/// All data lives behind `RwLock`s and is lost when the store is dropped.
#[derive(Debug)]
pub struct InMemoryRefStore {
    branches: RwLock<HashMap<String, ObjectId>>,
    head: RwLock<Option<String>>,
}

impl InMemoryRefStore {
    /// Create a new empty ref store.
    pub fn new() -> Self {
        Self {
            branches: RwLock::new(HashMap::new()),
            head: RwLock::new(None),
        }
    }
}

impl Default for InMemoryRefStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RefStore for InMemoryRefStore {
    fn read_branch(&self, name: &str) -> Result<Option<Branch>> {
        let branches = self.branches.read().expect("lock poisoned");
        Ok(branches
            .get(name)
            .map(|target| Branch::new(name, *target)))
    }

    fn create_branch(&self, name: &str, target: ObjectId) -> Result<()> {
        validate_branch_name(name)?;
        let mut branches = self.branches.write().expect("lock poisoned");
        if branches.contains_key(name) {
            return Err(RefError::AlreadyExists {
                name: name.to_string(),
            });
        }
        branches.insert(name.to_string(), target);
        Ok(())
    }

    fn move_branch(&self, name: &str, target: ObjectId) -> Result<()> {
        let mut branches = self.branches.write().expect("lock poisoned");
        match branches.get_mut(name) {
            Some(existing) => {
                *existing = target;
                Ok(())
            }
            None => Err(RefError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        {
            let head = self.head.read().expect("lock poisoned");
            if head.as_deref() == Some(name) {
                return Err(RefError::DeleteCurrentBranch {
                    name: name.to_string(),
                });
            }
        }

        let mut branches = self.branches.write().expect("lock poisoned");
        if branches.remove(name).is_none() {
            return Err(RefError::NotFound {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn branches(&self) -> Result<Vec<Branch>> {
        let branches = self.branches.read().expect("lock poisoned");
        let mut result: Vec<Branch> = branches
            .iter()
            .map(|(name, target)| Branch::new(name, *target))
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    fn head(&self) -> Result<Option<String>> {
        Ok(self.head.read().expect("lock poisoned").clone())
    }

    fn set_head(&self, branch: &str) -> Result<()> {
        validate_branch_name(branch)?;
        let mut head = self.head.write().expect("lock poisoned");
        *head = Some(branch.to_string());
        Ok(())
    }
}
