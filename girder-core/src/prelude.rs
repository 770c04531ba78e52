//! Everything a controller module usually needs, in one `use`.
//!
//! ```ignore
//! use girder_core::prelude::*;
//! ```

pub use std::sync::Arc;

pub use crate::config::GirderConfig;
pub use crate::controller::{Controller, HandlerRegistry};
pub use crate::error::{ConfigurationError, HttpError};
pub use crate::guards::{guard_fn, Guard, GuardContext, RequireHeader};
pub use crate::handler::{delete, get, patch, post, put, route, websocket, RouteHandler};
pub use crate::hooks::{AfterHook, BeforeHook, RequestHead};
pub use crate::layered::LayerConfig;
pub use crate::provide::{Provide, ResolvedDependencies};
pub use crate::response::{MediaTypeResponse, ResponseClass, ResponseHeader};
pub use crate::router::Router;

pub use crate::http::header::{AUTHORIZATION, CONTENT_TYPE};
pub use crate::http::{
    HeaderMap, HeaderName, HeaderValue, IntoResponse, Json, Method, Path, Query, Response, State,
    StatusCode,
};
