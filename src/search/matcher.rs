//! Substring/prefix matching over loaded shards.

use crate::shard::{EntryRecord, Shard};
use std::sync::Arc;

/// How a record's key matched the query. Prefix matches rank above
/// substring-only matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchClass {
    Prefix,
    Substring,
}

/// One matching entry record together with its match classification.
#[derive(Debug, Clone)]
pub struct MatchedEntry {
    pub class: MatchClass,
    pub entry: EntryRecord,
}

/// Find all entries whose key contains `normalized` as a contiguous
/// substring, across every loaded shard.
///
/// `shards` is a deterministic snapshot (sorted by bucket, entries in
/// generator order), so the output order is stable for identical input.
/// Shards that are not loaded simply contribute nothing; a non-empty
/// normalized query is assumed (the session controller never issues empty
/// queries, and the engine short-circuits them).
pub(crate) fn find_matches(shards: &[Arc<Shard>], normalized: &str) -> Vec<MatchedEntry> {
    let mut matches = Vec::new();

    for shard in shards {
        for entry in &shard.entries {
            if !entry.key.contains(normalized) {
                continue;
            }
            let class = if entry.key.starts_with(normalized) {
                MatchClass::Prefix
            } else {
                MatchClass::Substring
            };
            matches.push(MatchedEntry {
                class,
                entry: entry.clone(),
            });
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shard::EntryRecord;
    use assert2::check;

    fn shard(bucket: &str, keys: &[&str]) -> Arc<Shard> {
        Arc::new(Shard {
            bucket: bucket.to_string(),
            entries: keys
                .iter()
                .map(|k| EntryRecord {
                    key: (*k).to_string(),
                    display: (*k).to_string(),
                    kind: Default::default(),
                    targets: vec![],
                })
                .collect(),
        })
    }

    #[test]
    fn classifies_prefix_and_substring() {
        let shards = vec![shard("g", &["gradient"]), shard("r", &["radius", "range"])];

        let matches = find_matches(&shards, "radi");
        check!(matches.len() == 2);

        let gradient = matches.iter().find(|m| m.entry.key == "gradient").unwrap();
        check!(gradient.class == MatchClass::Substring);

        let radius = matches.iter().find(|m| m.entry.key == "radius").unwrap();
        check!(radius.class == MatchClass::Prefix);
    }

    #[test]
    fn no_match_in_unrelated_shards() {
        let shards = vec![shard("a", &["atlas"])];
        check!(find_matches(&shards, "radius").is_empty());
    }

    #[test]
    fn prefix_orders_before_substring() {
        check!(MatchClass::Prefix < MatchClass::Substring);
    }
}
