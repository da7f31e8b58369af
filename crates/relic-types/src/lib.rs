//! Foundation types for Relic.
//!
//! This crate provides the identifier and timestamp types used throughout
//! the Relic system. Every other Relic crate depends on `relic-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] -- Content-addressed identifier (BLAKE3 hash)
//! - [`Timestamp`] -- Wall-clock commit timestamp with a total order
//! - [`TypeError`] -- Parse and conversion failures

pub mod error;
pub mod object;
pub mod timestamp;

pub use error::TypeError;
pub use object::ObjectId;
pub use timestamp::Timestamp;
