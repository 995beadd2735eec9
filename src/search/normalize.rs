//! Query normalization and bucket-key derivation.
//!
//! Shard keys are normalized by the generator at build time: case-folded,
//! with every character outside `[a-z0-9]` hex-escaped as `_xx` per UTF-8
//! byte (`_` itself becomes `_5f`, `:` becomes `_3a`). Queries must be
//! normalized identically before matching, so a user typing `operator<<`
//! finds the key the generator emitted for it.

/// Normalize a raw user query to the generator's key encoding.
///
/// Case-folds, then hex-escapes everything outside `[a-z0-9]`. Keys in shard
/// assets arrive already normalized and are never re-encoded.
pub fn normalize(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for c in query.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("_{:02x}", byte));
            }
        }
    }
    out
}

/// Derivation of the bucket key responsible for a normalized key or query.
///
/// The partitioning scheme belongs to the external generator contract; this
/// trait keeps it swappable without touching the engine.
pub trait BucketScheme: Send + Sync {
    /// The bucket that indexes keys beginning like `normalized`, or `None`
    /// when no bucket applies (empty input).
    fn bucket_for(&self, normalized: &str) -> Option<String>;
}

/// Default scheme: bucket by the first character of the normalized text.
///
/// Letters map to themselves, digits collapse into `"0"`, escaped punctuation
/// into `"sym"` — one bucket per leading letter, mirroring the generator's
/// per-letter shard files.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadingCharScheme;

impl BucketScheme for LeadingCharScheme {
    fn bucket_for(&self, normalized: &str) -> Option<String> {
        let first = normalized.chars().next()?;
        Some(match first {
            'a'..='z' => first.to_string(),
            '0'..='9' => "0".to_string(),
            _ => "sym".to_string(),
        })
    }
}
