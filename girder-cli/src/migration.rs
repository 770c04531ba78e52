//! The migration engine seam.
//!
//! Girder ships no migration engine. An application hands one to the CLI
//! through a [`MigrationConfig`] carried by one of its CLI plugins, and the
//! `database` commands forward to it.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use girder_core::config::GirderConfig;

pub const DEFAULT_SCRIPT_LOCATION: &str = "migrations";
pub const DEFAULT_CONFIG_FILE: &str = "migrations.toml";

/// Errors reported by a migration engine.
#[derive(Debug)]
pub enum MigrationError {
    /// The requested revision does not exist.
    UnknownRevision(String),
    /// The underlying engine or database failed.
    Engine(Box<dyn std::error::Error + Send + Sync>),
    Other(String),
}

impl MigrationError {
    /// Wrap an engine-specific error.
    pub fn engine(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        MigrationError::Engine(Box::new(err))
    }
}

impl std::fmt::Display for MigrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MigrationError::UnknownRevision(rev) => write!(f, "Unknown revision: {rev}"),
            MigrationError::Engine(err) => write!(f, "Migration engine error: {err}"),
            MigrationError::Other(msg) => write!(f, "Migration error: {msg}"),
        }
    }
}

impl std::error::Error for MigrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MigrationError::Engine(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

pub type MigrationFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, MigrationError>> + Send + 'a>>;

/// Where `upgrade` / `downgrade` should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionTarget {
    pub revision: String,
    /// Emit SQL instead of applying it (offline mode).
    pub sql: bool,
    /// Free-form tag handed through to migration scripts.
    pub tag: Option<String>,
}

/// A database migration backend.
///
/// Object-safe so that the CLI can hold any engine behind
/// `Arc<dyn MigrationEngine>`; implementations box their futures.
pub trait MigrationEngine: Send + Sync + 'static {
    /// The revision currently applied, if any.
    fn current<'a>(
        &'a self,
        config: &'a MigrationConfig,
        verbose: bool,
    ) -> MigrationFuture<'a, Option<String>>;

    fn upgrade<'a>(
        &'a self,
        config: &'a MigrationConfig,
        target: &'a RevisionTarget,
    ) -> MigrationFuture<'a, ()>;

    fn downgrade<'a>(
        &'a self,
        config: &'a MigrationConfig,
        target: &'a RevisionTarget,
    ) -> MigrationFuture<'a, ()>;

    /// Create the migration environment in `directory`.
    fn init<'a>(
        &'a self,
        config: &'a MigrationConfig,
        directory: &'a Path,
        multidb: bool,
    ) -> MigrationFuture<'a, ()>;
}

/// Migration settings an application exposes to the CLI.
#[derive(Clone)]
pub struct MigrationConfig {
    script_location: PathBuf,
    config_file: PathBuf,
    engine: Arc<dyn MigrationEngine>,
}

impl MigrationConfig {
    pub fn new(engine: impl MigrationEngine) -> Self {
        Self {
            script_location: PathBuf::from(DEFAULT_SCRIPT_LOCATION),
            config_file: PathBuf::from(DEFAULT_CONFIG_FILE),
            engine: Arc::new(engine),
        }
    }

    /// Settings from `database.migrations.location` and
    /// `database.migrations.config`, defaulting like [`new`](Self::new).
    pub fn from_config(config: &GirderConfig, engine: impl MigrationEngine) -> Self {
        let location: String =
            config.get_or("database.migrations.location", DEFAULT_SCRIPT_LOCATION.to_string());
        let file: String =
            config.get_or("database.migrations.config", DEFAULT_CONFIG_FILE.to_string());
        Self::new(engine)
            .with_script_location(location)
            .with_config_file(file)
    }

    pub fn with_script_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.script_location = location.into();
        self
    }

    pub fn with_config_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.config_file = file.into();
        self
    }

    /// Directory holding the migration scripts.
    pub fn script_location(&self) -> &Path {
        &self.script_location
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    pub fn engine(&self) -> &dyn MigrationEngine {
        self.engine.as_ref()
    }
}

impl std::fmt::Debug for MigrationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationConfig")
            .field("script_location", &self.script_location)
            .field("config_file", &self.config_file)
            .finish_non_exhaustive()
    }
}
