//! Client-side password hashing.
//!
//! The server expects a `passwordHash` field rather than the raw password.
//! The digest is what the server stores and compares, so it is effectively the
//! credential; this is a wire contract, not a security layer.

use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of `password`.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
