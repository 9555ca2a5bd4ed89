use clap::Parser;
use cryptical::cli::{Cli, Commands, EntryAction, VaultAction};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init => cryptical::cli::commands::init::execute(&cli),
        Commands::Vault { ref action } => match action {
            VaultAction::List => cryptical::cli::commands::vault::execute_list(&cli),
            VaultAction::Create { ref name } => {
                cryptical::cli::commands::vault::execute_create(&cli, name)
            }
            VaultAction::Delete { ref name, force } => {
                cryptical::cli::commands::vault::execute_delete(&cli, name, *force)
            }
        },
        Commands::Entry { ref action } => match action {
            EntryAction::List { ref vault } => {
                cryptical::cli::commands::entry::execute_list(&cli, vault)
            }
            EntryAction::Add {
                ref vault,
                ref site,
            } => cryptical::cli::commands::entry::execute_add(&cli, vault, site),
            EntryAction::Delete {
                ref vault,
                id,
                force,
            } => cryptical::cli::commands::entry::execute_delete(&cli, vault, *id, *force),
        },
    };

    if let Err(e) = result {
        cryptical::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Send `tracing` events to stderr: warnings by default, everything
/// down to debug with `--verbose`.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        cryptical::cli::output::warning("logging already initialized");
    }
}
