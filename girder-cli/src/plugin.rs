use girder_core::router::{RouteEntry, Router};

use crate::error::CliError;
use crate::migration::MigrationConfig;

/// A plugin that contributes to the application's command line.
pub trait CliPlugin: Send + Sync {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// The migration settings this plugin provides, if it manages a database.
    fn migration_config(&self) -> Option<&MigrationConfig> {
        None
    }
}

/// What the CLI needs to know about the application it runs for.
pub trait CliApp {
    fn cli_plugins(&self) -> Vec<&dyn CliPlugin>;

    /// The application's route table, for `routes`.
    fn routes(&self) -> Vec<RouteEntry> {
        Vec::new()
    }
}

impl<S> CliApp for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn cli_plugins(&self) -> Vec<&dyn CliPlugin> {
        Vec::new()
    }

    fn routes(&self) -> Vec<RouteEntry> {
        Router::routes(self)
    }
}

/// The one migration configuration registered with `app`.
///
/// Exactly one CLI plugin may carry a migration configuration; none or
/// several is an error.
pub fn find_migration_config<A: CliApp + ?Sized>(app: &A) -> Result<&MigrationConfig, CliError> {
    let found: Vec<(&str, &MigrationConfig)> = app
        .cli_plugins()
        .into_iter()
        .filter_map(|plugin| plugin.migration_config().map(|config| (plugin.name(), config)))
        .collect();

    match found.as_slice() {
        [] => Err(CliError::MissingMigrationConfig),
        [(_, config)] => Ok(*config),
        many => Err(CliError::AmbiguousMigrationConfig {
            plugins: many.iter().map(|(name, _)| name.to_string()).collect(),
        }),
    }
}
