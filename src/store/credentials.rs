//! SQLite-backed Credential Store.
//!
//! Owns the `vaults` and `entries` relations and every read or write
//! against them.  It knows nothing about hashing or encryption: callers
//! hand it digests, salts and ciphertext blobs.
//!
//! Every write runs in a single `IMMEDIATE` transaction, so either the
//! whole operation lands or none of it does.

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::{debug, info};

use super::records::{Entry, EntryId, Seed, Vault, VaultId};
use super::schema;
use crate::errors::{CrypticalError, NameKind, Result};

/// Default bound on how long a write waits for another process's lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle on an open storage file.
pub struct CredentialStore {
    conn: Connection,
}

impl CredentialStore {
    /// Open (or create) the store at `path`.
    ///
    /// Lock contention from another process is waited on for at most
    /// `busy_timeout` and then surfaces as a `Storage` error.
    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Owner-only access to the store file.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(path, perms);
        }

        Self::configure(conn, busy_timeout)
    }

    /// Open a private in-memory store (used by tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(conn, DEFAULT_BUSY_TIMEOUT)
    }

    fn configure(conn: Connection, busy_timeout: Duration) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(busy_timeout)?;
        Ok(Self { conn })
    }

    // ------------------------------------------------------------------
    // Schema
    // ------------------------------------------------------------------

    /// Ensure both relations exist; seed a fresh store.
    ///
    /// `seed` is only called when the file has never been initialized and
    /// holds no vaults.  Returning `Ok(None)` skips seeding.  Safe to call
    /// on every start: once initialized, this only re-checks the tables.
    ///
    /// Returns `true` if seed records were written.
    pub fn initialize<F>(&mut self, seed: F) -> Result<bool>
    where
        F: FnOnce() -> Result<Option<Seed>>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute_batch(schema::CREATE_TABLES)?;

        let version = schema::schema_version(&tx)?;
        if version >= schema::CURRENT_SCHEMA_VERSION {
            tx.commit()?;
            debug!(version, "store already initialized");
            return Ok(false);
        }

        let vault_count: i64 = tx.query_row("SELECT COUNT(*) FROM vaults", [], |row| row.get(0))?;

        let mut seeded = false;
        if vault_count == 0 {
            if let Some(seed) = seed()? {
                tx.execute(
                    "INSERT INTO vaults (vname, hmp, salt) VALUES (?1, ?2, ?3)",
                    params![seed.vault_name, seed.password_hash, seed.salt],
                )?;
                let vault_id = tx.last_insert_rowid();
                tx.execute(
                    "INSERT INTO entries (vid, site, esp) VALUES (?1, ?2, ?3)",
                    params![vault_id, seed.site, seed.encrypted_secret],
                )?;
                seeded = true;
                info!(vault = %seed.vault_name, "seeded example vault");
            }
        }

        schema::set_schema_version(&tx)?;
        tx.commit()?;
        debug!(seeded, "store initialized");

        Ok(seeded)
    }

    // ------------------------------------------------------------------
    // Vaults
    // ------------------------------------------------------------------

    /// All vaults in creation order.
    pub fn list_vaults(&self) -> Result<Vec<Vault>> {
        let mut stmt = self
            .conn
            .prepare("SELECT vid, vname, hmp, salt FROM vaults ORDER BY vid")?;
        let rows = stmt.query_map([], vault_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_vault(&self, id: VaultId) -> Result<Option<Vault>> {
        Ok(self
            .conn
            .query_row(
                "SELECT vid, vname, hmp, salt FROM vaults WHERE vid = ?1",
                params![id],
                vault_from_row,
            )
            .optional()?)
    }

    pub fn find_vault_by_name(&self, name: &str) -> Result<Option<Vault>> {
        Ok(self
            .conn
            .query_row(
                "SELECT vid, vname, hmp, salt FROM vaults WHERE vname = ?1",
                params![name],
                vault_from_row,
            )
            .optional()?)
    }

    /// Insert a vault row.  A taken name fails with `DuplicateName`.
    pub fn create_vault(&mut self, name: &str, password_hash: &str, salt: &str) -> Result<VaultId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        match tx.execute(
            "INSERT INTO vaults (vname, hmp, salt) VALUES (?1, ?2, ?3)",
            params![name, password_hash, salt],
        ) {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(CrypticalError::DuplicateName {
                    kind: NameKind::Vault,
                    name: name.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }

        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    /// Remove a vault and every entry it owns.
    ///
    /// Entries are deleted explicitly so the cascade also holds for files
    /// whose `entries` table predates the `ON DELETE CASCADE` clause.
    /// Returns `false` if no such vault existed.
    pub fn delete_vault(&mut self, id: VaultId) -> Result<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let entries = tx.execute("DELETE FROM entries WHERE vid = ?1", params![id])?;
        let vaults = tx.execute("DELETE FROM vaults WHERE vid = ?1", params![id])?;
        tx.commit()?;

        debug!(vault_id = id, entries, "deleted vault rows");
        Ok(vaults > 0)
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Entries owned by `vault_id`, in creation order.  An unknown id
    /// yields an empty list.
    pub fn list_entries(&self, vault_id: VaultId) -> Result<Vec<Entry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT pid, vid, site, esp FROM entries WHERE vid = ?1 ORDER BY pid")?;
        let rows = stmt.query_map(params![vault_id], entry_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_entry(&self, id: EntryId) -> Result<Option<Entry>> {
        Ok(self
            .conn
            .query_row(
                "SELECT pid, vid, site, esp FROM entries WHERE pid = ?1",
                params![id],
                entry_from_row,
            )
            .optional()?)
    }

    /// Whether any entry, in any vault, already uses `site`.
    pub fn site_exists(&self, site: &str) -> Result<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM entries WHERE site = ?1)",
            params![site],
            |row| row.get(0),
        )?)
    }

    /// Insert an entry row.
    ///
    /// Site names are unique across the whole store, not per vault.
    pub fn create_entry(
        &mut self,
        vault_id: VaultId,
        site: &str,
        encrypted_secret: &str,
    ) -> Result<EntryId> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let vault_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM vaults WHERE vid = ?1)",
            params![vault_id],
            |row| row.get(0),
        )?;
        if !vault_exists {
            return Err(CrypticalError::VaultNotFound(vault_id));
        }

        let site_taken: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM entries WHERE site = ?1)",
            params![site],
            |row| row.get(0),
        )?;
        if site_taken {
            return Err(CrypticalError::DuplicateName {
                kind: NameKind::Site,
                name: site.to_string(),
            });
        }

        tx.execute(
            "INSERT INTO entries (vid, site, esp) VALUES (?1, ?2, ?3)",
            params![vault_id, site, encrypted_secret],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    /// Remove one entry.  Returns `false` if it did not exist.
    pub fn delete_entry(&mut self, id: EntryId) -> Result<bool> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = tx.execute("DELETE FROM entries WHERE pid = ?1", params![id])?;
        tx.commit()?;
        Ok(removed > 0)
    }
}

fn vault_from_row(row: &Row<'_>) -> rusqlite::Result<Vault> {
    Ok(Vault {
        id: row.get(0)?,
        name: row.get(1)?,
        password_hash: row.get(2)?,
        salt: row.get(3)?,
    })
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        vault_id: row.get(1)?,
        site: row.get(2)?,
        encrypted_secret: row.get(3)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
