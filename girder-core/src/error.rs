use crate::http::{IntoResponse, Json, Response, StatusCode};

/// Startup-time configuration failure.
///
/// These indicate a programming error in the application (a controller
/// without a path, two handlers claiming the same route) and are meant to
/// abort startup. Nothing in Girder catches or downgrades them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A controller was registered with an empty path.
    MissingPath { controller: &'static str },
    /// Two handlers answer the same method on the same full path.
    DuplicateRoute {
        method: String,
        path: String,
        first: String,
        second: String,
    },
    /// Two full paths differ only in parameter names, so the route tree
    /// cannot hold both (`/items/{id}` and `/items/{item_id}`).
    ConflictingRoute { path: String, other: String },
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::MissingPath { controller } => {
                write!(f, "Controller `{controller}` must set a non-empty path")
            }
            ConfigurationError::DuplicateRoute {
                method,
                path,
                first,
                second,
            } => write!(
                f,
                "Route {method} {path} is declared by both `{first}` and `{second}`"
            ),
            ConfigurationError::ConflictingRoute { path, other } => {
                write!(f, "Route {path} conflicts with {other}: only parameter names differ")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// Build a JSON error response with the standard `{ "error": message }` body.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, Json(body)).into_response()
}

/// Request-time error raised by guards, dependency providers, and extractors.
#[derive(Debug, Clone)]
pub enum HttpError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    Internal(String),
    Custom {
        status: StatusCode,
        body: serde_json::Value,
    },
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::NotFound(_) => StatusCode::NOT_FOUND,
            HttpError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            HttpError::Forbidden(_) => StatusCode::FORBIDDEN,
            HttpError::BadRequest(_) => StatusCode::BAD_REQUEST,
            HttpError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::Custom { status, .. } => *status,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            HttpError::Custom { body, .. } => (status, Json(body)).into_response(),
            HttpError::NotFound(msg)
            | HttpError::Unauthorized(msg)
            | HttpError::Forbidden(msg)
            | HttpError::BadRequest(msg)
            | HttpError::Internal(msg) => error_response(status, msg),
        }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            HttpError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            HttpError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            HttpError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            HttpError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            HttpError::Custom { status, body } => write!(f, "Custom Error ({status}): {body}"),
        }
    }
}

impl std::error::Error for HttpError {}
