use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use colored::Colorize;

use crate::error::CliError;
use crate::migration::{MigrationConfig, RevisionTarget};
use crate::plugin::{find_migration_config, CliApp};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum DatabaseCommand {
    /// Show the current revision of the database
    CurrentRevision {
        /// Enable verbose output
        #[arg(long)]
        verbose: bool,
    },
    /// Upgrade the database to a revision
    Upgrade(RevisionArgs),
    /// Downgrade the database to a revision
    Downgrade(RevisionArgs),
    /// Initialize migrations for the project
    Init {
        /// Where to create the migration environment (defaults to the script location)
        #[arg(long)]
        directory: Option<PathBuf>,
        /// Set up one migration environment per database
        #[arg(long)]
        multidb: bool,
    },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RevisionArgs {
    /// Target revision
    #[arg(long, default_value = "head")]
    pub revision: String,
    /// Emit SQL instead of applying migrations (offline mode)
    #[arg(long)]
    pub sql: bool,
    /// Arbitrary tag handed through to migration scripts
    #[arg(long)]
    pub tag: Option<String>,
}

impl From<RevisionArgs> for RevisionTarget {
    fn from(args: RevisionArgs) -> Self {
        RevisionTarget {
            revision: args.revision,
            sql: args.sql,
            tag: args.tag,
        }
    }
}

pub fn run<A: CliApp + ?Sized>(
    app: &A,
    command: DatabaseCommand,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let config = find_migration_config(app)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute(config, command, out))
}

async fn execute(
    config: &MigrationConfig,
    command: DatabaseCommand,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let engine = config.engine();
    match command {
        DatabaseCommand::CurrentRevision { verbose } => {
            match engine.current(config, verbose).await? {
                Some(revision) => writeln!(out, "Current revision: {}", revision.bold())?,
                None => writeln!(out, "{}", "No revision applied".dimmed())?,
            }
        }
        DatabaseCommand::Upgrade(args) => {
            let target = RevisionTarget::from(args);
            tracing::info!(revision = %target.revision, sql = target.sql, "upgrading database");
            engine.upgrade(config, &target).await?;
            writeln!(out, "{} {}", "Upgraded database to".green(), target.revision)?;
        }
        DatabaseCommand::Downgrade(args) => {
            let target = RevisionTarget::from(args);
            tracing::info!(revision = %target.revision, sql = target.sql, "downgrading database");
            engine.downgrade(config, &target).await?;
            writeln!(out, "{} {}", "Downgraded database to".green(), target.revision)?;
        }
        DatabaseCommand::Init { directory, multidb } => {
            let directory =
                directory.unwrap_or_else(|| config.script_location().to_path_buf());
            engine.init(config, &directory, multidb).await?;
            writeln!(
                out,
                "{} {}",
                "Initialized migrations in".green(),
                directory.display()
            )?;
        }
    }
    Ok(())
}
