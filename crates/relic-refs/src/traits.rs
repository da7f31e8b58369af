//! The [`RefStore`] trait defining the reference storage interface.

use relic_types::ObjectId;

use crate::error::Result;
use crate::types::Branch;

/// Storage backend for branches and HEAD.
///
/// Implementations must be thread-safe (`Send + Sync`). HEAD always holds a
/// branch *name*, never a commit ID; callers dereference it through
/// [`read_branch`].
///
/// [`read_branch`]: RefStore::read_branch
pub trait RefStore: Send + Sync {
    /// Read a branch by name. Returns `Ok(None)` if it does not exist.
    fn read_branch(&self, name: &str) -> Result<Option<Branch>>;

    /// Create a new branch pointing at `target`.
    ///
    /// Fails with [`AlreadyExists`] if the name is taken and with
    /// [`InvalidBranchName`] if the name does not validate.
    ///
    /// [`AlreadyExists`]: crate::RefError::AlreadyExists
    /// [`InvalidBranchName`]: crate::RefError::InvalidBranchName
    fn create_branch(&self, name: &str, target: ObjectId) -> Result<()>;

    /// Re-point an existing branch at `target` unconditionally.
    ///
    /// Used by commit, reset, merge, and fast-forward. Fails with
    /// [`NotFound`] if the branch does not exist.
    ///
    /// [`NotFound`]: crate::RefError::NotFound
    fn move_branch(&self, name: &str, target: ObjectId) -> Result<()>;

    /// Delete a branch.
    ///
    /// Fails with [`NotFound`] if absent and with [`DeleteCurrentBranch`]
    /// if the branch is the one HEAD names.
    ///
    /// [`NotFound`]: crate::RefError::NotFound
    /// [`DeleteCurrentBranch`]: crate::RefError::DeleteCurrentBranch
    fn delete_branch(&self, name: &str) -> Result<()>;

    /// List all branches, sorted by name.
    fn branches(&self) -> Result<Vec<Branch>>;

    /// The name of the branch HEAD points at, if HEAD has been set.
    fn head(&self) -> Result<Option<String>>;

    /// Point HEAD at a branch by name.
    fn set_head(&self, branch: &str) -> Result<()>;
}
