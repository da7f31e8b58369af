//! Ancestor-set computation and merge-base search.

use std::collections::{HashSet, VecDeque};

use relic_types::ObjectId;
use tracing::debug;

use crate::cache::CommitCache;
use crate::error::{GraphError, GraphResult};

/// The set of commit IDs reachable from `tip` over **all** parent edges,
/// including `tip` itself.
///
/// BFS with an explicit queue and visited set; shared sub-paths are visited
/// once and commit loads are memoized by the cache.
pub fn ancestors(cache: &mut CommitCache<'_>, tip: ObjectId) -> GraphResult<HashSet<ObjectId>> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(tip);
    queue.push_back(tip);

    while let Some(current) = queue.pop_front() {
        let parents = cache.get(&current)?.parents.clone();
        for parent in parents {
            if visited.insert(parent) {
                queue.push_back(parent);
            }
        }
    }

    Ok(visited)
}

/// Find the merge base (split point) of two tips.
///
/// Computes `ancestors(a) ∩ ancestors(b)` and picks the element with the
/// latest timestamp, ties broken by ID so the result is deterministic.
/// This is a heuristic rather than a true lowest-common-ancestor search:
/// with multiple incomparable common ancestors it can select a non-minimal
/// one. The behavior is preserved deliberately for compatibility with the
/// original tool.
///
/// Because each tip is included in its own ancestor set, `a == b` or one
/// tip being an ancestor of the other resolves to that tip itself, which
/// is what the merge short-circuits key off.
pub fn find_merge_base(
    cache: &mut CommitCache<'_>,
    a: ObjectId,
    b: ObjectId,
) -> GraphResult<ObjectId> {
    let ancestors_a = ancestors(cache, a)?;
    let ancestors_b = ancestors(cache, b)?;

    let mut best: Option<(relic_types::Timestamp, ObjectId)> = None;
    for id in ancestors_a.intersection(&ancestors_b) {
        let timestamp = cache.get(id)?.timestamp;
        let candidate = (timestamp, *id);
        if best.map_or(true, |current| candidate > current) {
            best = Some(candidate);
        }
    }

    match best {
        Some((timestamp, id)) => {
            debug!(base = %id.short_hex(), %timestamp, "merge base selected");
            Ok(id)
        }
        None => Err(GraphError::NoCommonAncestor { a, b }),
    }
}
