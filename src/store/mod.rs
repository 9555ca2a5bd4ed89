//! Credential Store: persistent vaults and entries.
//!
//! This module provides:
//! - `Vault`, `Entry` and `Seed` row types (`records`)
//! - Table definitions and schema versioning (`schema`)
//! - `CredentialStore`, the only code that touches the storage file (`credentials`)

pub mod credentials;
pub mod records;
pub mod schema;

pub use credentials::{CredentialStore, DEFAULT_BUSY_TIMEOUT};
pub use records::{Entry, EntryId, Seed, Vault, VaultId};
