//! Vault Security Engine.
//!
//! This module provides:
//! - Pure form validation returning every failure at once (`validation`)
//! - The locked/unlocked session state machine (`session`)
//! - `VaultService`, the facade callers use for every operation (`service`)

pub mod service;
pub mod session;
pub mod validation;

pub use service::{DecryptedEntry, VaultService, EXAMPLE_PASSWORD, EXAMPLE_VAULT};
pub use session::{SessionState, VaultSession};
pub use validation::{validate_entry_form, validate_vault_form, Field, ValidationFailure};
