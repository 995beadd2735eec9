//! Grouping of polymorphic overloads and deterministic ranking.
//!
//! Entries with identical `(key, display)` merge into one group whose target
//! lists are concatenated in merge order; the ranking comparator is a total
//! order so identical input always yields byte-identical output.

use super::matcher::{MatchClass, MatchedEntry};
use crate::shard::{EntryKind, TargetRef};
use ahash::AHashMap;

/// One ranked result group: a display name, its kind, and every target
/// sharing it, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultGroup {
    pub key: String,
    pub display: String,
    pub kind: EntryKind,
    pub class: MatchClass,
    /// Concatenated in merge order. Never re-sorted: the order reflects the
    /// generator's declaration order within each shard.
    pub targets: Vec<TargetRef>,
}

/// Group matches by `(key, display)` and order them for display.
///
/// Ordering: prefix before substring, shorter key first, case-sensitive
/// exact display match before case-insensitive exact before neither, then
/// display name, then key. The final key comparison makes the order total
/// over distinct groups. Truncation to `cap` removes from the tail only.
pub(crate) fn rank(matches: Vec<MatchedEntry>, raw_query: &str, cap: usize) -> Vec<ResultGroup> {
    let mut groups: Vec<ResultGroup> = Vec::new();
    let mut by_identity: AHashMap<(String, String), usize> = AHashMap::new();

    for m in matches {
        let identity = (m.entry.key.clone(), m.entry.display.clone());
        match by_identity.get(&identity) {
            Some(&i) => {
                groups[i].targets.extend(m.entry.targets);
            }
            None => {
                by_identity.insert(identity, groups.len());
                groups.push(ResultGroup {
                    key: m.entry.key,
                    display: m.entry.display,
                    kind: m.entry.kind,
                    class: m.class,
                    targets: m.entry.targets,
                });
            }
        }
    }

    let query_lower = raw_query.to_lowercase();
    groups.sort_by(|a, b| {
        let rank_of = |g: &ResultGroup| {
            (
                g.class,
                g.key.len(),
                g.display != raw_query,
                g.display.to_lowercase() != query_lower,
            )
        };
        rank_of(a)
            .cmp(&rank_of(b))
            .then_with(|| a.display.cmp(&b.display))
            .then_with(|| a.key.cmp(&b.key))
    });

    groups.truncate(cap);
    groups
}
