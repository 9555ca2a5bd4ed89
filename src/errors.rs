use std::fmt;

use thiserror::Error;

use crate::store::{EntryId, VaultId};
use crate::vault::validation::ValidationFailure;

/// Which kind of unique name collided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Vault,
    Site,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Vault => f.write_str("Vault"),
            NameKind::Site => f.write_str("Site"),
        }
    }
}

/// All errors that can occur in Cryptical.
#[derive(Debug, Error)]
pub enum CrypticalError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: wrong password or corrupted data")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Incorrect Password!")]
    AuthenticationFailed,

    #[error("Vault is locked, unlock it with its master password first")]
    VaultLocked,

    // --- Store errors ---
    #[error("Repeated Name Error: {kind} name '{name}' is already in use")]
    DuplicateName { kind: NameKind, name: String },

    #[error("Vault {0} not found")]
    VaultNotFound(VaultId),

    #[error("No vault named '{0}'")]
    UnknownVault(String),

    #[error("Entry {0} not found")]
    EntryNotFound(EntryId),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    // --- Input errors ---
    #[error("{}", join_failures(.0))]
    Validation(Vec<ValidationFailure>),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

fn join_failures(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convenience type alias for Cryptical results.
pub type Result<T> = std::result::Result<T, CrypticalError>;
