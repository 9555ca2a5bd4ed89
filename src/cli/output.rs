//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{Cell, ContentArrangement, Table};
use console::style;

use crate::store::Vault;
use crate::vault::DecryptedEntry;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of vaults (ID, Name).
pub fn print_vaults_table(vaults: &[Vault]) {
    if vaults.is_empty() {
        info("No vaults yet.");
        tip("Run `cryptical vault create <NAME>` to create one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Vault"]);

    for v in vaults {
        table.add_row(vec![v.id.to_string(), v.name.clone()]);
    }

    println!("{table}");
}

/// Print a table of decrypted entries (ID, Site, Password).
pub fn print_entries_table(entries: &[DecryptedEntry]) {
    if entries.is_empty() {
        info("No passwords in this vault yet.");
        tip("Run `cryptical entry add <VAULT> <SITE>` to add one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "Site", "Password"]);

    // comfy-table keeps its own unzeroized String per cell; it is
    // dropped as soon as the table has been printed.
    for e in entries {
        let secret = match e.plaintext() {
            Some(secret) => Cell::new(secret),
            None => Cell::new(style("<undecryptable>").red()),
        };
        table.add_row(vec![Cell::new(e.id), Cell::new(&e.site), secret]);
    }

    println!("{table}");
    drop(table);

    let unreadable = entries.iter().filter(|e| !e.is_readable()).count();
    if unreadable > 0 {
        warning(&format!(
            "{unreadable} entry(ies) could not be decrypted (corrupted or legacy format)."
        ));
        tip("Run `cryptical entry delete <VAULT> <ID>` to remove them.");
    }
}
