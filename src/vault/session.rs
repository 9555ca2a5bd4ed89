//! Per-vault access session.
//!
//! ```text
//! Locked --submit--> Authenticating --+--> Unlocked
//!                                     +--> LockedWithError --submit--> ...
//! ```
//!
//! While unlocked the session keeps the derived entry key in memory and
//! nothing else; the master password is only borrowed for the duration
//! of `submit`.  `lock` (or dropping the session) wipes the key.

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::crypto::encryption::{decrypt_secret, encrypt_secret};
use crate::crypto::kdf::{derive_key, Argon2Params};
use crate::crypto::keys::DerivedKey;
use crate::errors::{CrypticalError, Result};
use crate::store::{Entry, Vault};

/// Where a session is in its unlock lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Locked,
    Authenticating,
    Unlocked,
    LockedWithError,
}

#[derive(Debug)]
pub struct VaultSession {
    vault: Vault,
    state: SessionState,
    key: Option<DerivedKey>,
}

impl VaultSession {
    /// Start a locked session for `vault`.
    pub fn new(vault: Vault) -> Self {
        Self {
            vault,
            state: SessionState::Locked,
            key: None,
        }
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == SessionState::Unlocked
    }

    /// Submit a master password.
    ///
    /// On a match the entry key is derived and the session becomes
    /// `Unlocked`.  On a mismatch it becomes `LockedWithError` and
    /// `AuthenticationFailed` is returned.  A key-derivation failure
    /// leaves the session `Locked`.
    pub fn submit(&mut self, password: &str, kdf: &Argon2Params) -> Result<()> {
        self.key = None;
        self.state = SessionState::Authenticating;

        if !self.vault.verify_password(password) {
            self.state = SessionState::LockedWithError;
            warn!(vault_id = self.vault.id, "incorrect master password");
            return Err(CrypticalError::AuthenticationFailed);
        }

        match derive_key(password, &self.vault.salt, kdf) {
            Ok(key) => {
                self.key = Some(key);
                self.state = SessionState::Unlocked;
                debug!(vault_id = self.vault.id, "vault unlocked");
                Ok(())
            }
            Err(e) => {
                self.state = SessionState::Locked;
                Err(e)
            }
        }
    }

    /// Drop the key and return to `Locked`.
    pub fn lock(&mut self) {
        self.key = None;
        self.state = SessionState::Locked;
    }

    fn key(&self) -> Result<&DerivedKey> {
        self.key.as_ref().ok_or(CrypticalError::VaultLocked)
    }

    /// Encrypt a site password under this vault's key.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        encrypt_secret(self.key()?, plaintext)
    }

    /// Decrypt an entry that belongs to this vault.
    pub fn decrypt(&self, entry: &Entry) -> Result<Zeroizing<String>> {
        if entry.vault_id != self.vault.id {
            return Err(CrypticalError::EntryNotFound(entry.id));
        }
        decrypt_secret(self.key()?, &entry.encrypted_secret)
    }
}
