//! Three-way merge engine for Relic.
//!
//! Given two branch tips and their common ancestor (the split point), every
//! path present in either tip is classified into keep / take-theirs /
//! remove / conflict. The classification is a pure function over blob IDs;
//! orchestration (reading blobs, writing files, committing) belongs to the
//! repository layer.
//!
//! # Modules
//!
//! - [`classify`] -- the per-path relationship table as a pure function
//! - [`plan`] -- whole-tree planning: [`MergePlan`] from three commits
//! - [`conflict`] -- conflict blob content synthesis

pub mod classify;
pub mod conflict;
pub mod plan;

pub use classify::{classify, PathOutcome};
pub use conflict::conflict_contents;
pub use plan::{plan_merge, ConflictSides, MergePlan};
