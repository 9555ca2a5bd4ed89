//! `cryptical entry`: list, add and delete the passwords of a vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_service, prompt_new_password, prompt_password, Cli};
use crate::errors::{CrypticalError, Result};

/// Execute `cryptical entry list <VAULT>`.
pub fn execute_list(cli: &Cli, vault: &str) -> Result<()> {
    let service = open_service(cli)?;
    let vault = service.vault_by_name(vault)?;

    let password = prompt_password(&format!("Enter password for '{}'", vault.name))?;
    let session = service.unlock(vault.id, &password)?;
    let entries = service.entries_in(&session)?;

    output::info(&format!("{}: {} password(s)", vault.name, entries.len()));
    output::print_entries_table(&entries);

    Ok(())
}

/// Execute `cryptical entry add <VAULT> <SITE>`.
pub fn execute_add(cli: &Cli, vault: &str, site: &str) -> Result<()> {
    let mut service = open_service(cli)?;
    let vault = service.vault_by_name(vault)?;

    // Unlock first so a wrong master password is caught before the
    // site password is typed.
    let master = prompt_password(&format!("Enter password for '{}'", vault.name))?;
    let session = service.unlock(vault.id, &master)?;

    let (secret, confirmation) =
        prompt_new_password("Site password", "Retype site password")?;
    service.add_entry_to(&session, site, &secret, Some(confirmation.as_str()))?;

    output::success(&format!("Added '{site}' to vault '{}'", vault.name));
    Ok(())
}

/// Execute `cryptical entry delete <VAULT> <ID>`.
pub fn execute_delete(cli: &Cli, vault: &str, id: i64, force: bool) -> Result<()> {
    let mut service = open_service(cli)?;
    let vault = service.vault_by_name(vault)?;

    let password = prompt_password(&format!("Enter password for '{}'", vault.name))?;
    let session = service.unlock(vault.id, &password)?;

    // Only entries of the unlocked vault may be deleted through it.
    let entry = service
        .store()
        .get_entry(id)?
        .filter(|e| e.vault_id == session.vault().id)
        .ok_or(CrypticalError::EntryNotFound(id))?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete password for '{}'?", entry.site))
            .default(false)
            .interact()
            .map_err(|e| CrypticalError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    service.delete_entry(entry.id)?;

    output::success(&format!("Deleted '{}' from vault '{}'", entry.site, vault.name));
    Ok(())
}
