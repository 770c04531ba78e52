//! # girder-cli
//!
//! Command line for Girder applications. Migration engines and the route
//! table belong to the application, so there is no standalone binary: the
//! application's own `main` hands itself to [`run`].
//!
//! | Command | Description |
//! |---------|-------------|
//! | `database current-revision [--verbose]` | Show the revision currently applied |
//! | `database upgrade [--revision R] [--sql] [--tag T]` | Upgrade to a revision (default `head`) |
//! | `database downgrade [--revision R] [--sql] [--tag T]` | Downgrade to a revision (default `head`) |
//! | `database init [--directory D] [--multidb]` | Create the migration environment |
//! | `routes` | List the application's routes |
//!
//! ```ignore
//! struct App { router: Router<AppState>, db: DatabasePlugin }
//!
//! impl CliApp for App {
//!     fn cli_plugins(&self) -> Vec<&dyn CliPlugin> {
//!         vec![&self.db]
//!     }
//!
//!     fn routes(&self) -> Vec<RouteEntry> {
//!         self.router.routes()
//!     }
//! }
//!
//! fn main() {
//!     girder_cli::run(&build_app());
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`commands::database`]: the `database` command group
//! - [`commands::routes`]: route listing
//! - [`migration`]: the [`MigrationEngine`] seam and [`MigrationConfig`]
//! - [`plugin`]: [`CliApp`], [`CliPlugin`] and migration config lookup

pub mod commands;
pub mod error;
pub mod migration;
pub mod plugin;

use std::ffi::OsString;
use std::io::Write;

use clap::{Parser, Subcommand};

use commands::database::DatabaseCommand;

pub use error::CliError;
pub use migration::{MigrationConfig, MigrationEngine, MigrationError, MigrationFuture, RevisionTarget};
pub use plugin::{find_migration_config, CliApp, CliPlugin};

#[derive(Parser, Debug)]
#[command(name = "girder", version, about = "Girder application commands")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Manage database migrations
    Database {
        #[command(subcommand)]
        command: DatabaseCommand,
    },
    /// List the application's routes
    Routes,
}

/// Parse `args` (including the program name) and run the command, writing
/// its output to `out`.
pub fn run_to<A, I, T>(app: &A, args: I, out: &mut dyn Write) -> Result<(), CliError>
where
    A: CliApp + ?Sized,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args).map_err(CliError::Usage)?;
    match cli.command {
        Commands::Database { command } => commands::database::run(app, command, out),
        Commands::Routes => commands::routes::run(app, out),
    }
}

/// Like [`run_to`], printing to stdout.
pub fn run_from<A, I, T>(app: &A, args: I) -> Result<(), CliError>
where
    A: CliApp + ?Sized,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    run_to(app, args, &mut std::io::stdout())
}

/// Run with the process arguments and exit non-zero on failure.
pub fn run<A: CliApp + ?Sized>(app: &A) {
    match run_from(app, std::env::args_os()) {
        Ok(()) => {}
        Err(CliError::Usage(err)) => err.exit(),
        Err(e) => {
            eprintln!("{}", colored::Colorize::red(format!("Error: {e}").as_str()));
            std::process::exit(1);
        }
    }
}
