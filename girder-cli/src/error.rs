use girder_core::config::ConfigError;

use crate::migration::MigrationError;

#[derive(Debug)]
pub enum CliError {
    /// No CLI plugin carries a migration configuration.
    MissingMigrationConfig,
    /// More than one CLI plugin carries a migration configuration.
    AmbiguousMigrationConfig { plugins: Vec<String> },
    Migration(MigrationError),
    Config(ConfigError),
    /// Building the runtime or writing output failed.
    Io(std::io::Error),
    /// Invalid arguments, or a `--help` / `--version` request.
    Usage(clap::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::MissingMigrationConfig => write!(
                f,
                "Could not find a migration configuration: no CLI plugin provides one"
            ),
            CliError::AmbiguousMigrationConfig { plugins } => write!(
                f,
                "Found {} CLI plugins with a migration configuration ({}); register exactly one",
                plugins.len(),
                plugins.join(", ")
            ),
            CliError::Migration(err) => write!(f, "{err}"),
            CliError::Config(err) => write!(f, "{err}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Usage(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Migration(err) => Some(err),
            CliError::Config(err) => Some(err),
            CliError::Io(err) => Some(err),
            CliError::Usage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MigrationError> for CliError {
    fn from(err: MigrationError) -> Self {
        CliError::Migration(err)
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}
