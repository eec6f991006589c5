/// Credential Hashing
///
/// One-way transform of a plaintext password into the digest the data
/// layer compares by equality. The transform must stay deterministic:
/// the login query matches on the stored digest directly.

use sha2::{Digest, Sha256};

/// Hash a password into a lowercase hex SHA-256 digest.
///
/// Deterministic: the same plaintext always yields the same digest.
pub fn sha256_digest(plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plaintext.as_bytes());
    format!("{:x}", hasher.finalize())
}
