//! Row types for the `vaults` and `entries` relations.

use crate::crypto::hashing;

/// Store-assigned vault id (`vaults.vid`).
pub type VaultId = i64;

/// Store-assigned entry id (`entries.pid`).
pub type EntryId = i64;

/// A password-protected container of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vault {
    pub id: VaultId,
    pub name: String,
    /// Hex SHA-256 of `master_password || salt`.
    pub password_hash: String,
    /// Random salt generated once when the vault was created.
    pub salt: String,
}

impl Vault {
    /// Check a candidate master password against the stored digest.
    pub fn verify_password(&self, candidate: &str) -> bool {
        hashing::verify_master_password(candidate, &self.salt, &self.password_hash)
    }
}

/// A single site / encrypted-secret pair owned by one vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub vault_id: VaultId,
    pub site: String,
    /// Base64 AES-256-GCM blob (nonce || ciphertext || tag).
    pub encrypted_secret: String,
}

/// Records written into a fresh store so it is never empty.
#[derive(Debug, Clone)]
pub struct Seed {
    pub vault_name: String,
    pub password_hash: String,
    pub salt: String,
    pub site: String,
    pub encrypted_secret: String,
}
