use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Wall-clock commit timestamp.
///
/// Milliseconds since the UNIX epoch. Timestamps participate in commit
/// identity (two commits with identical content and timestamp collapse to
/// the same ID) and in merge-base selection, which picks the common
/// ancestor with the latest timestamp.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp {
    /// Milliseconds since the UNIX epoch.
    pub ms: u64,
}

impl Timestamp {
    /// Create a timestamp with an explicit millisecond value.
    pub const fn from_ms(ms: u64) -> Self {
        Self { ms }
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        let ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self { ms }
    }

    /// The epoch timestamp. Used by the root commit so that its identity
    /// is the same in every repository.
    pub const fn epoch() -> Self {
        Self { ms: 0 }
    }

    /// Returns `true` if this is the epoch timestamp.
    pub fn is_epoch(&self) -> bool {
        self.ms == 0
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms)", self.ms)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_by_ms() {
        let a = Timestamp::from_ms(100);
        let b = Timestamp::from_ms(200);
        assert!(a < b);
    }

    #[test]
    fn epoch_is_smallest() {
        let epoch = Timestamp::epoch();
        assert!(epoch.is_epoch());
        assert!(epoch < Timestamp::from_ms(1));
    }

    #[test]
    fn now_produces_reasonable_timestamp() {
        let ts = Timestamp::now();
        // Should be after 2020-01-01 (1577836800000 ms)
        assert!(ts.ms > 1_577_836_800_000);
    }

    #[test]
    fn serde_roundtrip() {
        let ts = Timestamp::from_ms(1234567890);
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }

    #[test]
    fn display_is_ms() {
        assert_eq!(format!("{}", Timestamp::from_ms(1000)), "1000");
    }
}
