//! Per-path three-way classification.

use relic_types::ObjectId;

/// How one path is resolved by a three-way merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathOutcome {
    /// The current side's version (or absence) carries over unchanged.
    KeepCurrent,
    /// The other side changed the path and the current side did not: take
    /// the other side's version.
    TakeOther(ObjectId),
    /// The other side deleted a path the current side left alone: remove it.
    Remove,
    /// Both sides changed the path in different ways (modification against
    /// modification, or modification against deletion): conflict.
    Conflict,
}

/// Classify one path from its blob ID at the split point and at the two
/// tips (`None` = absent from that commit).
///
/// The decision table, where `s`/`c`/`o` are split/current/other:
///
/// | relation                      | outcome       |
/// |-------------------------------|---------------|
/// | `s == c` and `s == o`         | keep current  |
/// | `s == c`, other deleted       | remove        |
/// | `s == c`, other modified      | take other    |
/// | `s == o`, current whatever    | keep current  |
/// | `c == o` (same change)        | keep current  |
/// | otherwise                     | conflict      |
pub fn classify(
    split: Option<&ObjectId>,
    current: Option<&ObjectId>,
    other: Option<&ObjectId>,
) -> PathOutcome {
    if split == current && split == other {
        return PathOutcome::KeepCurrent;
    }
    if split == current {
        // Only the other side diverged from the split point.
        return match other {
            Some(id) => PathOutcome::TakeOther(*id),
            None => PathOutcome::Remove,
        };
    }
    if split == other {
        // Only the current side diverged; its version (or deletion) wins.
        return PathOutcome::KeepCurrent;
    }
    if current == other {
        // Both sides made the identical change.
        return PathOutcome::KeepCurrent;
    }
    PathOutcome::Conflict
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(b: u8) -> ObjectId {
        ObjectId::from_hash([b; 32])
    }

    #[test]
    fn untouched_on_both_sides_keeps_current() {
        let s = oid(1);
        assert_eq!(
            classify(Some(&s), Some(&s), Some(&s)),
            PathOutcome::KeepCurrent
        );
    }

    #[test]
    fn absent_everywhere_keeps_current() {
        assert_eq!(classify(None, None, None), PathOutcome::KeepCurrent);
    }

    #[test]
    fn other_modified_takes_other() {
        let s = oid(1);
        let o = oid(2);
        assert_eq!(
            classify(Some(&s), Some(&s), Some(&o)),
            PathOutcome::TakeOther(o)
        );
    }

    #[test]
    fn other_created_takes_other() {
        let o = oid(2);
        assert_eq!(classify(None, None, Some(&o)), PathOutcome::TakeOther(o));
    }

    #[test]
    fn other_deleted_removes() {
        let s = oid(1);
        assert_eq!(classify(Some(&s), Some(&s), None), PathOutcome::Remove);
    }

    #[test]
    fn current_modified_keeps_current() {
        let s = oid(1);
        let c = oid(2);
        assert_eq!(
            classify(Some(&s), Some(&c), Some(&s)),
            PathOutcome::KeepCurrent
        );
    }

    #[test]
    fn current_created_keeps_current() {
        let c = oid(2);
        assert_eq!(classify(None, Some(&c), None), PathOutcome::KeepCurrent);
    }

    #[test]
    fn current_deleted_stays_deleted() {
        let s = oid(1);
        assert_eq!(
            classify(Some(&s), None, Some(&s)),
            PathOutcome::KeepCurrent
        );
    }

    #[test]
    fn identical_change_on_both_sides_keeps_either() {
        let s = oid(1);
        let same = oid(2);
        assert_eq!(
            classify(Some(&s), Some(&same), Some(&same)),
            PathOutcome::KeepCurrent
        );
        // Both deleted is also the identical change.
        assert_eq!(classify(Some(&s), None, None), PathOutcome::KeepCurrent);
    }

    #[test]
    fn divergent_modification_conflicts() {
        let s = oid(1);
        let c = oid(2);
        let o = oid(3);
        assert_eq!(
            classify(Some(&s), Some(&c), Some(&o)),
            PathOutcome::Conflict
        );
    }

    #[test]
    fn modification_against_deletion_conflicts() {
        let s = oid(1);
        let c = oid(2);
        assert_eq!(classify(Some(&s), Some(&c), None), PathOutcome::Conflict);
        let o = oid(3);
        assert_eq!(classify(Some(&s), None, Some(&o)), PathOutcome::Conflict);
    }

    #[test]
    fn both_created_differently_conflicts() {
        let c = oid(2);
        let o = oid(3);
        assert_eq!(classify(None, Some(&c), Some(&o)), PathOutcome::Conflict);
    }
}
