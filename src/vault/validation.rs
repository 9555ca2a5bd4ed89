//! Input validation for vault and entry forms.
//!
//! Every check runs and every failure is reported, so a form can show
//! all of its problems at once.  Nothing here touches the store.

use std::fmt;

use crate::errors::{CrypticalError, Result};

/// Characters that may not appear in vault or site names (besides whitespace).
pub const PROHIBITED_NAME_CHARS: &str = "\"'(),/:;<>?[\\]`{|}~";

/// Characters that may not appear in master or site passwords (besides whitespace).
pub const PROHIBITED_SECRET_CHARS: &str = "\"'(),/:;<>?[\\]`{|}";

/// The form field a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    VaultName,
    VaultPassword,
    SiteName,
    SitePassword,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::VaultName => "Vault Name",
            Field::VaultPassword => "Vault Password",
            Field::SiteName => "Site Name",
            Field::SitePassword => "Site Password",
        })
    }
}

impl Field {
    fn is_name(self) -> bool {
        matches!(self, Field::VaultName | Field::SiteName)
    }

    fn prohibited(self) -> &'static str {
        if self.is_name() {
            PROHIBITED_NAME_CHARS
        } else {
            PROHIBITED_SECRET_CHARS
        }
    }
}

/// One problem with one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    Empty(Field),
    ProhibitedCharacter { field: Field, ch: char },
    ConfirmationMismatch(Field),
}

impl ValidationFailure {
    pub fn field(&self) -> Field {
        match self {
            ValidationFailure::Empty(field)
            | ValidationFailure::ConfirmationMismatch(field)
            | ValidationFailure::ProhibitedCharacter { field, .. } => *field,
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFailure::Empty(field) => {
                write!(f, "No {field}: {field}s cannot be left empty!")
            }
            ValidationFailure::ProhibitedCharacter { field, ch } => write!(
                f,
                "Invalid {field}: {field}s cannot contain spaces or special characters like {} (found {ch:?})",
                field.prohibited()
            ),
            ValidationFailure::ConfirmationMismatch(_) => {
                f.write_str("Differing Passwords: Entered passwords do not match!")
            }
        }
    }
}

/// Check a single field for emptiness and prohibited characters.
///
/// Only the first offending character is reported.
pub fn validate_field(field: Field, value: &str) -> Vec<ValidationFailure> {
    let mut failures = Vec::new();

    if value.is_empty() {
        failures.push(ValidationFailure::Empty(field));
    }

    let prohibited = field.prohibited();
    if let Some(ch) = value
        .chars()
        .find(|c| c.is_whitespace() || prohibited.contains(*c))
    {
        failures.push(ValidationFailure::ProhibitedCharacter { field, ch });
    }

    failures
}

fn validate_pair(
    name_field: Field,
    name: &str,
    secret_field: Field,
    secret: &str,
    confirmation: Option<&str>,
) -> Vec<ValidationFailure> {
    let mut failures = validate_field(name_field, name);
    failures.extend(validate_field(secret_field, secret));

    if let Some(confirmation) = confirmation {
        if confirmation != secret {
            failures.push(ValidationFailure::ConfirmationMismatch(secret_field));
        }
    }

    failures
}

/// Validate a "create vault" form.  Pass `None` for `confirmation` when
/// the caller has no retype field.
pub fn validate_vault_form(
    name: &str,
    password: &str,
    confirmation: Option<&str>,
) -> Vec<ValidationFailure> {
    validate_pair(
        Field::VaultName,
        name,
        Field::VaultPassword,
        password,
        confirmation,
    )
}

/// Validate an "add entry" form.
pub fn validate_entry_form(
    site: &str,
    secret: &str,
    confirmation: Option<&str>,
) -> Vec<ValidationFailure> {
    validate_pair(
        Field::SiteName,
        site,
        Field::SitePassword,
        secret,
        confirmation,
    )
}

/// Turn a failure list into `Ok(())` or a `Validation` error.
pub fn ensure_valid(failures: Vec<ValidationFailure>) -> Result<()> {
    if failures.is_empty() {
        Ok(())
    } else {
        Err(CrypticalError::Validation(failures))
    }
}
