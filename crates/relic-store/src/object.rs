use std::collections::BTreeMap;

use relic_hash::ContentHasher;
use relic_types::{ObjectId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// The kind of object stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// One file snapshot: originating path plus raw content.
    Blob,
    /// A point in history: message, timestamp, parents, tracked tree.
    Commit,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blob => write!(f, "blob"),
            Self::Commit => write!(f, "commit"),
        }
    }
}

/// A stored object: kind tag + canonical serialized bytes.
///
/// `StoredObject` is the unit of storage. The store never interprets the
/// data; it is a pure key-value store keyed by content hash.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The canonical serialized bytes of the object.
    pub data: Vec<u8>,
}

impl StoredObject {
    /// Create a new stored object from kind and data.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        Self { kind, data }
    }

    /// Compute the content-addressed ID for this object.
    ///
    /// Uses the domain-separated hasher for the object kind, so identical
    /// bytes under different kinds never share an ID.
    pub fn compute_id(&self) -> ObjectId {
        let hasher = match self.kind {
            ObjectKind::Blob => &ContentHasher::BLOB,
            ObjectKind::Commit => &ContentHasher::COMMIT,
        };
        hasher.hash(&self.data)
    }
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// One immutable file snapshot.
///
/// The identifier covers both the originating path and the content, so the
/// same bytes staged under two different paths are two distinct objects,
/// while re-staging unchanged content at the same path deduplicates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    /// The working-directory path this snapshot was taken from.
    pub path: String,
    /// The raw file content.
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from a path and its content.
    pub fn new(path: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        let data =
            serde_json::to_vec(self).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(StoredObject::new(ObjectKind::Blob, data))
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        if obj.kind != ObjectKind::Blob {
            return Err(StoreError::CorruptObject {
                id: obj.compute_id(),
                reason: format!("expected blob, got {}", obj.kind),
            });
        }
        serde_json::from_slice(&obj.data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// The content-addressed ID of this blob.
    pub fn object_id(&self) -> StoreResult<ObjectId> {
        Ok(self.to_stored_object()?.compute_id())
    }
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// One immutable point in history.
///
/// The identifier is a pure function of the logical content (timestamp,
/// message, parent list, tree), so two commits built from identical inputs
/// collapse to the same ID. That is intentional, not a collision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// The commit message.
    pub message: String,
    /// Wall-clock creation time.
    pub timestamp: Timestamp,
    /// Parent commit IDs: empty for the root, one for an ordinary commit,
    /// two for a merge (`[current, other]` in that order).
    pub parents: Vec<ObjectId>,
    /// Tracked paths: path -> blob ID.
    pub tree: BTreeMap<String, ObjectId>,
}

impl Commit {
    /// Create a commit with explicit content.
    pub fn new(
        message: impl Into<String>,
        timestamp: Timestamp,
        parents: Vec<ObjectId>,
        tree: BTreeMap<String, ObjectId>,
    ) -> Self {
        Self {
            message: message.into(),
            timestamp,
            parents,
            tree,
        }
    }

    /// The root commit: no parents, empty tree, epoch timestamp.
    ///
    /// Every repository starts from this commit, so its ID is identical
    /// everywhere.
    pub fn root() -> Self {
        Self {
            message: "initial commit".to_string(),
            timestamp: Timestamp::epoch(),
            parents: Vec::new(),
            tree: BTreeMap::new(),
        }
    }

    /// Returns `true` if this is the root commit (no parents).
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Returns `true` if this is a merge commit (two parents).
    pub fn is_merge(&self) -> bool {
        self.parents.len() == 2
    }

    /// The first parent, if any. History traversal follows only this edge.
    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    /// Look up the blob ID tracked for a path.
    pub fn tracked(&self, path: &str) -> Option<&ObjectId> {
        self.tree.get(path)
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        let data =
            serde_json::to_vec(self).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(StoredObject::new(ObjectKind::Commit, data))
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        if obj.kind != ObjectKind::Commit {
            return Err(StoreError::CorruptObject {
                id: obj.compute_id(),
                reason: format!("expected commit, got {}", obj.kind),
            });
        }
        serde_json::from_slice(&obj.data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// The content-addressed ID of this commit.
    pub fn object_id(&self) -> StoreResult<ObjectId> {
        Ok(self.to_stored_object()?.compute_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(b: u8) -> ObjectId {
        ObjectId::from_hash([b; 32])
    }

    #[test]
    fn blob_roundtrip() {
        let blob = Blob::new("hello.txt", b"hello world".to_vec());
        let stored = blob.to_stored_object().unwrap();
        let decoded = Blob::from_stored_object(&stored).unwrap();
        assert_eq!(blob, decoded);
    }

    #[test]
    fn blob_kind_mismatch() {
        let stored = StoredObject::new(ObjectKind::Commit, b"not a commit".to_vec());
        let err = Blob::from_stored_object(&stored).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn blob_id_covers_path_and_content() {
        let a = Blob::new("a.txt", b"same".to_vec()).object_id().unwrap();
        let b = Blob::new("b.txt", b"same".to_vec()).object_id().unwrap();
        let a2 = Blob::new("a.txt", b"other".to_vec()).object_id().unwrap();
        assert_ne!(a, b, "path participates in identity");
        assert_ne!(a, a2, "content participates in identity");
    }

    #[test]
    fn blob_id_deduplicates() {
        let id1 = Blob::new("a.txt", b"x".to_vec()).object_id().unwrap();
        let id2 = Blob::new("a.txt", b"x".to_vec()).object_id().unwrap();
        assert_eq!(id1, id2);
    }

    #[test]
    fn commit_roundtrip() {
        let mut tree = BTreeMap::new();
        tree.insert("file.txt".to_string(), oid(1));
        let commit = Commit::new("msg", Timestamp::from_ms(1000), vec![oid(2)], tree);
        let stored = commit.to_stored_object().unwrap();
        let decoded = Commit::from_stored_object(&stored).unwrap();
        assert_eq!(commit, decoded);
    }

    #[test]
    fn commit_id_is_deterministic() {
        let mut tree = BTreeMap::new();
        tree.insert("a.txt".to_string(), oid(1));
        let c1 = Commit::new("same", Timestamp::from_ms(42), vec![oid(9)], tree.clone());
        let c2 = Commit::new("same", Timestamp::from_ms(42), vec![oid(9)], tree);
        assert_eq!(c1.object_id().unwrap(), c2.object_id().unwrap());
    }

    #[test]
    fn commit_id_depends_on_each_field() {
        let base = Commit::new("m", Timestamp::from_ms(1), vec![oid(1)], BTreeMap::new());
        let id = base.object_id().unwrap();

        let other_message = Commit::new("n", Timestamp::from_ms(1), vec![oid(1)], BTreeMap::new());
        assert_ne!(id, other_message.object_id().unwrap());

        let other_time = Commit::new("m", Timestamp::from_ms(2), vec![oid(1)], BTreeMap::new());
        assert_ne!(id, other_time.object_id().unwrap());

        let other_parents = Commit::new("m", Timestamp::from_ms(1), vec![oid(2)], BTreeMap::new());
        assert_ne!(id, other_parents.object_id().unwrap());

        let mut tree = BTreeMap::new();
        tree.insert("f".to_string(), oid(3));
        let other_tree = Commit::new("m", Timestamp::from_ms(1), vec![oid(1)], tree);
        assert_ne!(id, other_tree.object_id().unwrap());
    }

    #[test]
    fn root_commit_is_stable() {
        let r1 = Commit::root();
        let r2 = Commit::root();
        assert!(r1.is_root());
        assert!(!r1.is_merge());
        assert!(r1.tree.is_empty());
        assert!(r1.timestamp.is_epoch());
        assert_eq!(r1.object_id().unwrap(), r2.object_id().unwrap());
    }

    #[test]
    fn merge_commit_has_two_parents() {
        let commit = Commit::new(
            "merge",
            Timestamp::from_ms(5),
            vec![oid(1), oid(2)],
            BTreeMap::new(),
        );
        assert!(commit.is_merge());
        assert_eq!(commit.first_parent(), Some(&oid(1)));
    }

    #[test]
    fn stored_object_id_deterministic() {
        let obj = StoredObject::new(ObjectKind::Blob, b"deterministic".to_vec());
        assert_eq!(obj.compute_id(), obj.compute_id());
    }

    #[test]
    fn different_kinds_produce_different_ids() {
        let data = b"same data".to_vec();
        let blob = StoredObject::new(ObjectKind::Blob, data.clone());
        let commit = StoredObject::new(ObjectKind::Commit, data);
        assert_ne!(blob.compute_id(), commit.compute_id());
    }
}
