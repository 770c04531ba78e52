//! Command implementations for the Girder application CLI.
//!
//! Each submodule corresponds to a top-level command.

/// Database migrations: `database current-revision | upgrade | downgrade | init`.
///
/// Looks up the application's single migration configuration and forwards
/// to its engine on a current-thread runtime.
pub mod database;

/// Route listing: `routes`.
///
/// Prints the route table of the application as mounted, one line per
/// method and path.
pub mod routes;
