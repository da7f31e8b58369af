//! Domain-separated content hashing for Relic.
//!
//! Object identity in Relic is a BLAKE3 hash of the object's canonical
//! serialization, with a domain tag per object kind so that a blob and a
//! commit can never collide even on identical bytes.

use relic_types::ObjectId;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g., `"relic-blob-v1"`) that is
/// prepended to every hash computation. This prevents cross-type hash
/// collisions: a blob and a commit with identical serialized bytes will
/// produce different identifiers.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for blob objects.
    pub const BLOB: Self = Self {
        domain: "relic-blob-v1",
    };
    /// Hasher for commit objects.
    pub const COMMIT: Self = Self {
        domain: "relic-commit-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ObjectId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ObjectId::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value via its canonical JSON form.
    ///
    /// JSON keys of map-typed fields must already be ordered (Relic uses
    /// `BTreeMap` throughout) for the result to be deterministic.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<ObjectId, HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    /// Verify that data produces the expected object ID.
    pub fn verify(&self, data: &[u8], expected: &ObjectId) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
