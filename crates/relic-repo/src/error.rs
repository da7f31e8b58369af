use std::path::PathBuf;

use relic_graph::GraphError;
use relic_refs::RefError;
use relic_stage::StageError;
use relic_store::StoreError;
use relic_types::ObjectId;
use thiserror::Error;

/// Errors from repository operations.
///
/// Every failure is local and non-recoverable within the operation: the
/// operation aborts immediately and leaves the on-disk state unchanged.
/// A merge that produces conflicts is *not* an error; it is reported as a
/// flag on [`MergeReport`](crate::report::MergeReport).
#[derive(Debug, Error)]
pub enum RepoError {
    /// A repository already exists in this directory.
    #[error("a relic repository already exists in {0}")]
    AlreadyInitialized(PathBuf),

    /// No repository exists in this directory.
    #[error("not a relic repository: {0}")]
    NotInitialized(PathBuf),

    /// A working-directory file to be staged does not exist.
    #[error("file does not exist: {path}")]
    FileNotFound { path: String },

    /// No commit with the given ID exists.
    #[error("no commit with that id exists: {id}")]
    CommitNotFound { id: ObjectId },

    /// The commit does not track the given path.
    #[error("file does not exist in that commit: {path}")]
    PathNotInCommit { path: String },

    /// No branch with the given name exists.
    #[error("no such branch exists: {name}")]
    BranchNotFound { name: String },

    /// A branch with the given name already exists.
    #[error("a branch with that name already exists: {name}")]
    BranchAlreadyExists { name: String },

    /// The operation targets the currently active branch, which is not
    /// allowed (delete, merge-with-self, checkout of the current branch).
    #[error("cannot act on the current branch: {name}")]
    CannotActOnCurrentBranch { name: String },

    /// The commit message is empty.
    #[error("please enter a commit message")]
    EmptyMessage,

    /// Neither additions nor removals are staged.
    #[error("no changes added to the commit")]
    NoChanges,

    /// The path is neither tracked nor staged; there is nothing to remove.
    #[error("no reason to remove the file: {path}")]
    NothingToRemove { path: String },

    /// No commit carries the given message.
    #[error("found no commit with that message")]
    NoCommitWithMessage { message: String },

    /// The stage holds uncommitted changes, which a merge refuses to clobber.
    #[error("you have uncommitted changes")]
    UncommittedChanges,

    /// An untracked working-directory file would be overwritten.
    #[error("untracked file would be overwritten: {path}")]
    WouldOverwriteUntracked { path: String },

    /// On-disk repository state that should exist is missing or malformed.
    #[error("corrupt repository state: {0}")]
    Corrupt(String),

    /// Failure in the object store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Failure in the reference store.
    #[error(transparent)]
    Refs(#[from] RefError),

    /// Failure in graph traversal.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Working-directory I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StageError> for RepoError {
    fn from(e: StageError) -> Self {
        match e {
            StageError::NoChanges => RepoError::NoChanges,
            StageError::NothingToRemove { path } => RepoError::NothingToRemove { path },
        }
    }
}

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;
