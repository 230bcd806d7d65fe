//! Content hashing for schema change detection.

use sha2::{Digest, Sha256};

/// Computes the lowercase hex SHA-256 digest of `text`.
///
/// Two schema documents compare equal exactly when their digests match;
/// whitespace and comment changes produce a different digest.
#[must_use]
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
