//! Data model for generator-produced search shards.
//!
//! A shard is one prefix bucket of the full symbol index: an ordered table of
//! entry records, each mapping a normalized search key to one or more
//! navigable targets. Shards are emitted by the documentation generator at
//! build time and are read-only inputs here.

use crate::error::ShardError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// One navigable destination for an entry: a page, an in-page anchor, and the
/// qualifying context shown alongside the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRef {
    /// Identifier of the destination page. Passed through verbatim; the
    /// document-serving layer owns turning it into a navigable address.
    pub page: String,
    /// Stable fragment identifier within the page. Empty means top of page.
    #[serde(default)]
    pub anchor: String,
    /// Enclosing namespace/class/file, used to disambiguate targets sharing a
    /// display name.
    #[serde(default)]
    pub scope: String,
    /// Parameter-signature excerpt distinguishing overloads. Presentational
    /// only, never matched against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// The kind of symbol an entry refers to.
///
/// A closed set: the generator conflates these under one flat key space, and
/// the kind only influences how the scope label is presented, never matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Class,
    Function,
    #[default]
    Member,
    Typedef,
    Enumeration,
    EnumValue,
    File,
    Group,
    Page,
}

impl EntryKind {
    /// Short lowercase label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Function => "function",
            Self::Member => "member",
            Self::Typedef => "typedef",
            Self::Enumeration => "enum",
            Self::EnumValue => "enumvalue",
            Self::File => "file",
            Self::Group => "group",
            Self::Page => "page",
        }
    }

    /// Join a scope label to a display name the way this kind is presented.
    ///
    /// Code symbols qualify with `::`; files, groups and pages carry their
    /// context parenthesized instead.
    pub fn qualified(self, scope: &str, display: &str) -> String {
        if scope.is_empty() {
            return display.to_string();
        }
        match self {
            Self::File | Self::Group | Self::Page => format!("{display} ({scope})"),
            _ => format!("{scope}::{display}"),
        }
    }
}

/// The atomic unit of the index: a search key plus the targets sharing it.
///
/// Keys are normalized at generation time (case-folded, punctuation hex-escaped)
/// and are not required to be unique within or across shards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Normalized search key, as produced by the generator.
    pub key: String,
    /// Human-readable label. May differ from `key` (original casing, operator
    /// syntax).
    pub display: String,
    #[serde(default)]
    pub kind: EntryKind,
    /// One target per overload/definition sharing the display name, in the
    /// generator's declaration order.
    pub targets: Vec<TargetRef>,
}

/// One letter/prefix bucket of the full index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shard {
    /// The prefix bucket this shard indexes.
    #[serde(default)]
    pub bucket: String,
    /// Entries in generator order. Not sorted; the matcher must not assume
    /// otherwise.
    pub entries: Vec<EntryRecord>,
}

/// Matches the generator's JavaScript emission wrapper, e.g. `var searchData =`.
static JS_WRAPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*var\s+[A-Za-z_][A-Za-z0-9_]*\s*=\s*").unwrap());

/// Parse a shard asset fetched for `bucket`.
///
/// Accepts plain JSON or the generator's JS-wrapped form (`var searchData =
/// <json>;`). Unknown fields are tolerated for forward compatibility;
/// anything structurally invalid fails closed as a parse failure, including a
/// payload that claims a different bucket than the one it was fetched as.
pub fn parse_asset(bucket: &str, raw: &str) -> Result<Shard, ShardError> {
    let body = JS_WRAPPER.replace(raw, "");
    let body = body.trim().trim_end_matches(';');

    let mut shard: Shard = serde_json::from_str(body).map_err(|e| ShardError::Parse {
        bucket: bucket.to_string(),
        reason: e.to_string(),
    })?;

    if shard.bucket.is_empty() {
        shard.bucket = bucket.to_string();
    } else if shard.bucket != bucket {
        return Err(ShardError::Parse {
            bucket: bucket.to_string(),
            reason: format!("payload declares bucket '{}'", shard.bucket),
        });
    }

    Ok(shard)
}
