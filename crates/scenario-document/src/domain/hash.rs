//! Content hashing for saved documents.

use sha2::{Digest, Sha256};

/// Hex SHA-256 of a serialized document payload.
///
/// `serde_json::Value` objects keep keys sorted, so the same document always
/// hashes the same.
#[must_use]
pub fn content_hash(payload: &serde_json::Value) -> String {
    let digest = Sha256::digest(payload.to_string().as_bytes());
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable_and_hex() {
        let payload = serde_json::json!({ "title": "a", "scenes": [] });

        let first = content_hash(&payload);
        let second = content_hash(&payload);

        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_changes_with_content() {
        let a = content_hash(&serde_json::json!({ "title": "a" }));
        let b = content_hash(&serde_json::json!({ "title": "b" }));

        assert_ne!(a, b);
    }
}
