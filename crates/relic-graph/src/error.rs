use relic_store::StoreError;
use relic_types::ObjectId;
use thiserror::Error;

/// Errors from commit-graph traversal.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A parent link points at a commit that is not in the store.
    #[error("dangling commit reference: {0}")]
    DanglingCommit(ObjectId),

    /// Two tips share no common ancestor (histories from different roots).
    #[error("no common ancestor between {a} and {b}")]
    NoCommonAncestor { a: ObjectId, b: ObjectId },

    /// Failure in the underlying object store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
