//! Password hashing and session token helpers.
//!
//! # Invariants
//! - Password hashes are unsalted SHA-256 hex digests. This matches data
//!   already written by the mobile client and is not a hardened scheme.
//! - Auth tokens are opaque `<user_id>_<epoch_millis>` strings; they are
//!   not signed and carry no authority by themselves.

use crate::model::RecordId;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of `password`.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}

pub fn issue_auth_token(user_id: RecordId, issued_at: DateTime<Utc>) -> String {
    format!("{user_id}_{}", issued_at.timestamp_millis())
}
