use thiserror::Error;

/// Errors from stage transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StageError {
    /// The path is neither tracked nor staged, so there is nothing to remove.
    #[error("no reason to remove the file: {path}")]
    NothingToRemove { path: String },

    /// Neither additions nor removals are pending.
    #[error("no changes added to the commit")]
    NoChanges,
}

/// Result alias for stage operations.
pub type StageResult<T> = Result<T, StageError>;
