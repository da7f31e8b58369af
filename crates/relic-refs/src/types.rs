//! Core reference types.

use relic_types::ObjectId;
use serde::{Deserialize, Serialize};

/// A branch: a name bound to exactly one commit ID at a time.
///
/// Branches are the only mutable pointers in the system. They are created
/// pointing at an existing commit and advanced by commit, merge, reset, and
/// fast-forward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Human-readable branch name (e.g. "main", "feature/auth").
    pub name: String,
    /// The commit this branch points at.
    pub target: ObjectId,
}

impl Branch {
    /// Create a new branch record.
    pub fn new(name: impl Into<String>, target: ObjectId) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.target.short_hex())
    }
}
