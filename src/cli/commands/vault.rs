//! `cryptical vault`: list, create and delete vaults.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_service, prompt_new_password, prompt_password, Cli};
use crate::errors::{CrypticalError, Result};

/// Execute `cryptical vault list`.
pub fn execute_list(cli: &Cli) -> Result<()> {
    let service = open_service(cli)?;
    let vaults = service.list_vaults()?;

    output::info(&format!("{} vault(s)", vaults.len()));
    output::print_vaults_table(&vaults);

    Ok(())
}

/// Execute `cryptical vault create <NAME>`.
pub fn execute_create(cli: &Cli, name: &str) -> Result<()> {
    let mut service = open_service(cli)?;

    let (password, confirmation) =
        prompt_new_password("Choose vault password", "Retype vault password")?;
    service.create_vault(name, &password, Some(confirmation.as_str()))?;

    output::success(&format!("Vault '{name}' created"));
    output::tip(&format!(
        "Run `cryptical entry add {name} <SITE>` to store a password."
    ));

    Ok(())
}

/// Execute `cryptical vault delete <NAME>`.
pub fn execute_delete(cli: &Cli, name: &str, force: bool) -> Result<()> {
    let mut service = open_service(cli)?;
    let vault = service.vault_by_name(name)?;
    let count = service.store().list_entries(vault.id)?.len();

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete vault '{name}' and its {count} password(s)?"
            ))
            .default(false)
            .interact()
            .map_err(|e| CrypticalError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let password = prompt_password("Enter vault password")?;
    service.delete_vault(vault.id, &password)?;

    output::success(&format!("Deleted vault '{name}'"));
    Ok(())
}
