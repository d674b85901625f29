use rand::RngExt;
use sha2::{Digest, Sha256};

use crate::domain::types::SIGNUP_CODE_LEN;

/// Uniformly random six-digit code, never starting with zero.
pub fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999u32).to_string()
}

/// Lower-case hex SHA-256 of `code` followed by `salt`.
pub fn hash_code(code: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether `code` has the shape of a signup code (exactly six ASCII digits).
pub fn is_well_formed(code: &str) -> bool {
    code.len() == SIGNUP_CODE_LEN && code.bytes().all(|b| b.is_ascii_digit())
}
