//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{CrypticalError, Result};
use crate::store::CredentialStore;
use crate::vault::VaultService;

/// Cryptical CLI: local password manager.
#[derive(Parser)]
#[command(
    name = "cryptical",
    about = "Local password manager with per-vault master passwords",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Storage file (default: `db_file` from cryptical.toml, else db.sqlite)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Print debug logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create the storage file (seeding an example vault) if needed
    Init,

    /// Manage vaults (list, create, delete)
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },

    /// Manage the entries of a vault (list, add, delete)
    Entry {
        #[command(subcommand)]
        action: EntryAction,
    },
}

/// Vault subcommands.
#[derive(clap::Subcommand)]
pub enum VaultAction {
    /// List all vaults
    List,

    /// Create a new vault (prompts for its master password)
    Create {
        /// Vault name
        name: String,
    },

    /// Delete a vault and every entry in it
    Delete {
        /// Vault name
        name: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Entry subcommands.
#[derive(clap::Subcommand)]
pub enum EntryAction {
    /// Show every site and its decrypted password
    List {
        /// Vault name
        vault: String,
    },

    /// Add a site password to a vault
    Add {
        /// Vault name
        vault: String,
        /// Site name
        site: String,
    },

    /// Delete an entry by id
    Delete {
        /// Vault name
        vault: String,
        /// Entry id (see `entry list`)
        id: i64,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolve the settings and the storage file path for this invocation.
///
/// `--db` wins over `db_file` from `cryptical.toml`.
pub fn store_location(cli: &Cli) -> Result<(PathBuf, Settings)> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let path = match &cli.db {
        Some(db) => cwd.join(db),
        None => settings.db_path(&cwd),
    };
    Ok((path, settings))
}

/// Open and initialize the store for this invocation.
pub fn open_service(cli: &Cli) -> Result<VaultService> {
    let (path, settings) = store_location(cli)?;
    VaultService::open(&path, &settings)
}

/// Open the store without initializing it (used by `init`).
pub fn open_uninitialized(cli: &Cli) -> Result<(PathBuf, VaultService)> {
    let (path, settings) = store_location(cli)?;
    settings.validate()?;
    let store = CredentialStore::open(&path, settings.busy_timeout())?;
    Ok((path, VaultService::from_settings(store, &settings)))
}

/// Prompt for an existing password.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| CrypticalError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password and its confirmation.
///
/// Both values are returned unchecked; the vault layer validates them
/// together so every problem is reported at once.
pub fn prompt_new_password(
    prompt: &str,
    confirm_prompt: &str,
) -> Result<(Zeroizing<String>, Zeroizing<String>)> {
    let password = prompt_password(prompt)?;
    let confirmation = prompt_password(confirm_prompt)?;
    Ok((password, confirmation))
}
