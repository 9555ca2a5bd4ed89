//! Master-password digests and salts.
//!
//! A vault stores `hex(SHA-256(password || salt))` next to its salt.
//! Checking a candidate password only needs those two values; the
//! plaintext is never persisted.

use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Salt length used when the configuration does not override it.
pub const DEFAULT_SALT_LEN: usize = 10;

/// Characters a salt is drawn from.
const SALT_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Hash `password || salt` with SHA-256 and return the lowercase hex digest.
pub fn hash_master_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a random alphanumeric salt of `length` characters.
///
/// Uses the thread-local CSPRNG, which is seeded from the OS.
pub fn generate_salt(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(SALT_ALPHABET[rng.random_range(0..SALT_ALPHABET.len())]))
        .collect()
}

/// Recompute the digest of `candidate` with `salt` and compare it to
/// `expected_hash` in constant time.
pub fn verify_master_password(candidate: &str, salt: &str, expected_hash: &str) -> bool {
    let actual = hash_master_password(candidate, salt);
    actual
        .as_bytes()
        .ct_eq(expected_hash.to_ascii_lowercase().as_bytes())
        .into()
}
