//! High-level vault operations used by the CLI.
//!
//! `VaultService` sits on top of the `CredentialStore` and turns
//! plaintext input (vault passwords, site passwords) into the protected
//! forms the store persists: salted digests and AES-GCM blobs.  It owns
//! no persistent state of its own.

use std::fmt;
use std::path::Path;

use tracing::{info, warn};
use zeroize::Zeroizing;

use super::session::VaultSession;
use super::validation::{ensure_valid, validate_entry_form, validate_vault_form};
use crate::config::Settings;
use crate::crypto::encryption::encrypt_secret;
use crate::crypto::hashing::{generate_salt, hash_master_password};
use crate::crypto::kdf::{derive_key, Argon2Params};
use crate::errors::{CrypticalError, Result};
use crate::store::{CredentialStore, EntryId, Seed, Vault, VaultId};

/// Name of the vault seeded into a fresh store.
pub const EXAMPLE_VAULT: &str = "example_vault";
/// Master password of the seeded vault.
pub const EXAMPLE_PASSWORD: &str = "pwd";
const EXAMPLE_SITE: &str = "site";
const EXAMPLE_SECRET: &str = "pwd";

/// A decrypted entry, ready for display.  The secret is wiped on drop.
///
/// `secret` is `None` when the stored ciphertext could not be decrypted
/// (corrupted, or written by the legacy padding scheme).  The entry is
/// still listed so it can be found and deleted.
pub struct DecryptedEntry {
    pub id: EntryId,
    pub site: String,
    pub secret: Option<Zeroizing<String>>,
}

impl DecryptedEntry {
    pub fn plaintext(&self) -> Option<&str> {
        self.secret.as_deref().map(String::as_str)
    }

    pub fn is_readable(&self) -> bool {
        self.secret.is_some()
    }
}

impl fmt::Debug for DecryptedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptedEntry")
            .field("id", &self.id)
            .field("site", &self.site)
            .field("secret", &"<redacted>")
            .finish()
    }
}

pub struct VaultService {
    store: CredentialStore,
    kdf: Argon2Params,
    salt_length: usize,
    seed_example: bool,
}

impl VaultService {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Wrap an already-open store.  Call `initialize` before use.
    pub fn new(store: CredentialStore, kdf: Argon2Params, salt_length: usize) -> Self {
        Self {
            store,
            kdf,
            salt_length,
            seed_example: true,
        }
    }

    /// Wrap an already-open store using configured parameters.
    pub fn from_settings(store: CredentialStore, settings: &Settings) -> Self {
        Self::new(store, settings.argon2_params(), settings.salt_length)
            .with_seed_example(settings.seed_example)
    }

    /// Open the store at `path` and initialize it.
    pub fn open(path: &Path, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let store = CredentialStore::open(path, settings.busy_timeout())?;
        let mut service = Self::from_settings(store, settings);
        service.initialize()?;
        Ok(service)
    }

    pub fn with_seed_example(mut self, seed_example: bool) -> Self {
        self.seed_example = seed_example;
        self
    }

    /// Ensure the schema exists, seeding the example vault into a fresh
    /// store.  Returns `true` if the seed was written.
    pub fn initialize(&mut self) -> Result<bool> {
        let kdf = self.kdf;
        let salt_length = self.salt_length;
        let seed_example = self.seed_example;

        self.store.initialize(|| {
            if seed_example {
                example_seed(&kdf, salt_length).map(Some)
            } else {
                Ok(None)
            }
        })
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    // ------------------------------------------------------------------
    // Vaults
    // ------------------------------------------------------------------

    pub fn list_vaults(&self) -> Result<Vec<Vault>> {
        self.store.list_vaults()
    }

    pub fn vault(&self, id: VaultId) -> Result<Vault> {
        self.store
            .get_vault(id)?
            .ok_or(CrypticalError::VaultNotFound(id))
    }

    pub fn vault_by_name(&self, name: &str) -> Result<Vault> {
        self.store
            .find_vault_by_name(name)?
            .ok_or_else(|| CrypticalError::UnknownVault(name.to_string()))
    }

    /// Create a vault protected by `password`.
    ///
    /// Input is validated before anything is written.  `confirmation`
    /// is the retyped password, if the caller collected one.
    pub fn create_vault(
        &mut self,
        name: &str,
        password: &str,
        confirmation: Option<&str>,
    ) -> Result<VaultId> {
        ensure_valid(validate_vault_form(name, password, confirmation))?;

        let salt = generate_salt(self.salt_length);
        let password_hash = hash_master_password(password, &salt);
        let id = self.store.create_vault(name, &password_hash, &salt)?;

        info!(vault_id = id, vault = name, "vault created");
        Ok(id)
    }

    /// Check a master password against a vault's stored digest.
    pub fn authenticate(&self, vault_id: VaultId, password: &str) -> Result<bool> {
        Ok(self.vault(vault_id)?.verify_password(password))
    }

    /// Authenticate and return an unlocked session for the vault.
    pub fn unlock(&self, vault_id: VaultId, password: &str) -> Result<VaultSession> {
        let mut session = VaultSession::new(self.vault(vault_id)?);
        session.submit(password, &self.kdf)?;
        Ok(session)
    }

    /// Delete a vault and all of its entries.  Requires the master password.
    pub fn delete_vault(&mut self, vault_id: VaultId, password: &str) -> Result<()> {
        if !self.authenticate(vault_id, password)? {
            return Err(CrypticalError::AuthenticationFailed);
        }
        if !self.store.delete_vault(vault_id)? {
            return Err(CrypticalError::VaultNotFound(vault_id));
        }

        info!(vault_id, "vault deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Encrypt `secret` under the vault's master password and store it.
    pub fn add_entry(
        &mut self,
        vault_id: VaultId,
        master_password: &str,
        site: &str,
        secret: &str,
        confirmation: Option<&str>,
    ) -> Result<EntryId> {
        ensure_valid(validate_entry_form(site, secret, confirmation))?;
        let session = self.unlock(vault_id, master_password)?;
        self.add_entry_to(&session, site, secret, confirmation)
    }

    /// Same as `add_entry`, for a vault that is already unlocked.
    pub fn add_entry_to(
        &mut self,
        session: &VaultSession,
        site: &str,
        secret: &str,
        confirmation: Option<&str>,
    ) -> Result<EntryId> {
        ensure_valid(validate_entry_form(site, secret, confirmation))?;

        let encrypted = session.encrypt(secret)?;
        let vault_id = session.vault().id;
        let id = self.store.create_entry(vault_id, site, &encrypted)?;

        info!(vault_id, entry_id = id, "entry added");
        Ok(id)
    }

    /// Authenticate and decrypt every entry of a vault.
    pub fn list_entries(
        &self,
        vault_id: VaultId,
        master_password: &str,
    ) -> Result<Vec<DecryptedEntry>> {
        let session = self.unlock(vault_id, master_password)?;
        self.entries_in(&session)
    }

    /// Decrypt every entry of an unlocked vault, in creation order.
    ///
    /// An entry that fails to decrypt is returned with `secret: None`
    /// rather than hiding the rest of the vault.  Storage errors still
    /// fail the whole call.
    pub fn entries_in(&self, session: &VaultSession) -> Result<Vec<DecryptedEntry>> {
        self.store
            .list_entries(session.vault().id)?
            .into_iter()
            .map(|entry| {
                let secret = match session.decrypt(&entry) {
                    Ok(secret) => Some(secret),
                    Err(CrypticalError::DecryptionFailed) => {
                        warn!(entry_id = entry.id, site = %entry.site, "entry is undecryptable");
                        None
                    }
                    Err(e) => return Err(e),
                };
                Ok(DecryptedEntry {
                    id: entry.id,
                    site: entry.site,
                    secret,
                })
            })
            .collect()
    }

    /// Decrypt a single entry of an unlocked vault.
    pub fn reveal_entry(
        &self,
        session: &VaultSession,
        entry_id: EntryId,
    ) -> Result<Zeroizing<String>> {
        let entry = self
            .store
            .get_entry(entry_id)?
            .ok_or(CrypticalError::EntryNotFound(entry_id))?;
        session.decrypt(&entry)
    }

    /// Delete one entry by id.
    pub fn delete_entry(&mut self, entry_id: EntryId) -> Result<()> {
        if !self.store.delete_entry(entry_id)? {
            return Err(CrypticalError::EntryNotFound(entry_id));
        }

        info!(entry_id, "entry deleted");
        Ok(())
    }
}

fn example_seed(kdf: &Argon2Params, salt_length: usize) -> Result<Seed> {
    let salt = generate_salt(salt_length);
    let key = derive_key(EXAMPLE_PASSWORD, &salt, kdf)?;
    let encrypted_secret = encrypt_secret(&key, EXAMPLE_SECRET)?;

    Ok(Seed {
        vault_name: EXAMPLE_VAULT.to_string(),
        password_hash: hash_master_password(EXAMPLE_PASSWORD, &salt),
        salt,
        site: EXAMPLE_SITE.to_string(),
        encrypted_secret,
    })
}
