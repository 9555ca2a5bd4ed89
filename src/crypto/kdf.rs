//! Master-password key derivation using Argon2id.
//!
//! The symmetric key for a vault's entries is derived from the master
//! password and the vault's stored salt.  The same password and salt
//! always yield the same key, so nothing besides the salt has to be
//! persisted for later decryption.

use argon2::{Algorithm, Argon2, Params, Version};

use super::keys::{DerivedKey, KEY_LEN};
use crate::errors::{CrypticalError, Result};

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Argon2 refuses salts shorter than this many bytes.
pub const MIN_SALT_LEN: usize = 8;

/// Configurable Argon2id parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// Reject parameter sets that would make the KDF dangerously weak.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(CrypticalError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.iterations < 1 {
            return Err(CrypticalError::KeyDerivationFailed(
                "Argon2 iterations must be at least 1".into(),
            ));
        }
        if self.parallelism < 1 {
            return Err(CrypticalError::KeyDerivationFailed(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Derive the 32-byte entry key for a vault from its master password
/// and salt.
pub fn derive_key(password: &str, salt: &str, argon2_params: &Argon2Params) -> Result<DerivedKey> {
    argon2_params.validate()?;

    if salt.len() < MIN_SALT_LEN {
        return Err(CrypticalError::KeyDerivationFailed(format!(
            "salt must be at least {MIN_SALT_LEN} bytes (got {})",
            salt.len()
        )));
    }

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| CrypticalError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = DerivedKey::zeroed();
    argon2
        .hash_password_into(password.as_bytes(), salt.as_bytes(), key.as_mut_bytes())
        .map_err(|e| CrypticalError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}
