//! `cryptical init`: create the storage file and seed the example vault.

use crate::cli::output;
use crate::cli::{open_uninitialized, Cli};
use crate::errors::Result;
use crate::vault::{EXAMPLE_PASSWORD, EXAMPLE_VAULT};

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let (path, mut service) = open_uninitialized(cli)?;

    if service.initialize()? {
        output::success(&format!("Store created at {}", path.display()));
        output::info(&format!(
            "Seeded vault '{EXAMPLE_VAULT}' with master password '{EXAMPLE_PASSWORD}'."
        ));
        output::tip("Delete it with `cryptical vault delete example_vault` once you have your own.");
    } else {
        output::info(&format!("Store at {} is ready.", path.display()));
    }

    output::tip("Run `cryptical vault create <NAME>` to add a vault.");
    Ok(())
}
