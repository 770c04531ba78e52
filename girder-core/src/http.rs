//! HTTP types used across Girder, re-exported from axum so that applications
//! and guards never need a direct `axum` import for the common cases.

pub use axum::body::Body;
pub use axum::extract::{Extension, FromRequestParts, Path, Query, Request, State};
pub use axum::http::request::Parts;
pub use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
pub use axum::response::{IntoResponse, Response};
pub use axum::Json;
