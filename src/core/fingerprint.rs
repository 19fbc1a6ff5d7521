use sha2::{Digest, Sha256};

/// SHA-256 of the raw bytes, rendered as 64 lowercase hex characters.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
