//! Branch name validation following git-style conventions.
//!
//! Valid branch names:
//! - Must be non-empty
//! - Must not contain whitespace, `~`, `^`, `:`, `?`, `*`, `[`, `\`
//! - Must not contain `..` (double dot)
//! - Must not start or end with `.` or `/`
//! - Must not contain consecutive slashes (`//`)
//! - Components between slashes must be non-empty and not start with `.`

use crate::error::{RefError, Result};

/// Characters that are forbidden anywhere in a branch name.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '~', '^', ':', '?', '*', '[', '\\'];

/// Validate a branch name, returning `Ok(())` if valid.
///
/// Branch names become file names under `refs/heads/`, so the rules also
/// prevent path traversal and filesystem ambiguity.
///
/// # Examples
///
/// ```
/// use relic_refs::names::validate_branch_name;
///
/// assert!(validate_branch_name("main").is_ok());
/// assert!(validate_branch_name("feature/auth").is_ok());
/// assert!(validate_branch_name("").is_err());
/// assert!(validate_branch_name("bad..name").is_err());
/// ```
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RefError::InvalidBranchName {
            name: name.to_string(),
            reason: "branch name must not be empty".into(),
        });
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(RefError::InvalidBranchName {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    // `..` would allow parent traversal once the name becomes a path.
    if name.contains("..") {
        return Err(RefError::InvalidBranchName {
            name: name.to_string(),
            reason: "must not contain '..'".into(),
        });
    }

    if name.starts_with('.') || name.ends_with('.') {
        return Err(RefError::InvalidBranchName {
            name: name.to_string(),
            reason: "must not start or end with '.'".into(),
        });
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(RefError::InvalidBranchName {
            name: name.to_string(),
            reason: "must not start or end with '/'".into(),
        });
    }

    if name.contains("//") {
        return Err(RefError::InvalidBranchName {
            name: name.to_string(),
            reason: "must not contain consecutive slashes '//'".into(),
        });
    }

    for component in name.split('/') {
        if component.starts_with('.') {
            return Err(RefError::InvalidBranchName {
                name: name.to_string(),
                reason: format!("component must not start with '.': {component:?}"),
            });
        }
    }

    Ok(())
}
