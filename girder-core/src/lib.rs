//! Controllers, route handler binding, and layered configuration on top of
//! axum.
//!
//! A [`Router`] owns [`Controller`]s; a controller owns the route handlers
//! it declares. Binding a controller normalizes its path, settles its
//! configuration, and points every handler back at it, so a handler can
//! resolve guards, dependencies, hooks, and response settings through the
//! handler → controller → router chain.

pub mod config;
pub mod controller;
mod dispatch;
pub mod error;
pub mod guards;
pub mod handler;
pub mod hooks;
pub mod http;
pub mod layered;
pub mod layers;
pub mod owner;
pub mod path;
pub mod prelude;
pub mod provide;
pub mod response;
pub mod router;
pub mod slot;

pub use config::{ConfigError, ConfigValue, FromConfigValue, GirderConfig};
pub use controller::{BoundController, Controller, HandlerRegistry};
pub use error::{error_response, ConfigurationError, HttpError};
pub use guards::{guard_fn, FnGuard, Guard, GuardContext, RequireHeader};
pub use handler::{
    delete, get, patch, post, put, route, websocket, Bound, HandlerKind, Pending, RouteHandler,
    RouteHandlerDescriptor,
};
pub use hooks::{AfterHook, BeforeHook, RequestHead};
pub use layered::LayerConfig;
pub use layers::{catch_panic_layer, default_trace, init_tracing};
pub use owner::{Owner, OwnerKind};
pub use path::{join_paths, normalize_path};
pub use provide::{Provide, ResolvedDependencies};
pub use response::{MediaTypeResponse, ResponseClass, ResponseHeader};
pub use router::{RouteEntry, Router};
pub use slot::Slot;
