//! Connection lifecycle hooks.
//!
//! Hooks run around a handler: a *before* hook sees the request head and may
//! answer the request itself, an *after* hook receives the response and
//! returns the one that is actually sent. HTTP handlers use the
//! `before_request` / `after_request` pair, WebSocket handlers the
//! `before_upgrade` / `after_upgrade` pair.
//!
//! Hooks can be plain functions or async functions:
//!
//! ```ignore
//! let stamp = AfterHook::from_fn(|mut res| {
//!     res.headers_mut().insert("x-served-by", HeaderValue::from_static("girder"));
//!     res
//! });
//! let audit = BeforeHook::from_async_fn(|head| async move {
//!     audit_log.record(head.uri.path()).await;
//!     None
//! });
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::http::{HeaderMap, Method, Parts, Response, Uri};

/// Owned snapshot of the request line and headers, handed to hooks.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// Name of the handler the request was routed to.
    pub handler_name: String,
    /// Full route path template the request matched.
    pub route_path: String,
}

impl RequestHead {
    pub(crate) fn from_parts(parts: &Parts, handler_name: &str, route_path: &str) -> Self {
        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            handler_name: handler_name.to_string(),
            route_path: route_path.to_string(),
        }
    }
}

type SyncBefore = dyn Fn(&RequestHead) -> Option<Response> + Send + Sync;
type AsyncBefore =
    dyn Fn(RequestHead) -> Pin<Box<dyn Future<Output = Option<Response>> + Send>> + Send + Sync;
type SyncAfter = dyn Fn(Response) -> Response + Send + Sync;
type AsyncAfter = dyn Fn(Response) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync;

/// Hook run before the handler. Returning `Some(response)` skips the handler.
#[derive(Clone)]
pub enum BeforeHook {
    Sync(Arc<SyncBefore>),
    Async(Arc<AsyncBefore>),
}

impl BeforeHook {
    pub fn from_fn<F>(hook: F) -> Self
    where
        F: Fn(&RequestHead) -> Option<Response> + Send + Sync + 'static,
    {
        BeforeHook::Sync(Arc::new(hook))
    }

    pub fn from_async_fn<F, Fut>(hook: F) -> Self
    where
        F: Fn(RequestHead) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<Response>> + Send + 'static,
    {
        BeforeHook::Async(Arc::new(
            move |head: RequestHead| -> Pin<Box<dyn Future<Output = Option<Response>> + Send>> {
                Box::pin(hook(head))
            },
        ))
    }

    pub async fn call(&self, head: &RequestHead) -> Option<Response> {
        match self {
            BeforeHook::Sync(hook) => hook(head),
            BeforeHook::Async(hook) => hook(head.clone()).await,
        }
    }
}

impl std::fmt::Debug for BeforeHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BeforeHook::Sync(_) => f.write_str("BeforeHook::Sync"),
            BeforeHook::Async(_) => f.write_str("BeforeHook::Async"),
        }
    }
}

/// Hook run after the handler; its return value is the response sent.
#[derive(Clone)]
pub enum AfterHook {
    Sync(Arc<SyncAfter>),
    Async(Arc<AsyncAfter>),
}

impl AfterHook {
    pub fn from_fn<F>(hook: F) -> Self
    where
        F: Fn(Response) -> Response + Send + Sync + 'static,
    {
        AfterHook::Sync(Arc::new(hook))
    }

    pub fn from_async_fn<F, Fut>(hook: F) -> Self
    where
        F: Fn(Response) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        AfterHook::Async(Arc::new(
            move |response: Response| -> Pin<Box<dyn Future<Output = Response> + Send>> {
                Box::pin(hook(response))
            },
        ))
    }

    pub async fn call(&self, response: Response) -> Response {
        match self {
            AfterHook::Sync(hook) => hook(response),
            AfterHook::Async(hook) => hook(response).await,
        }
    }
}

impl std::fmt::Debug for AfterHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AfterHook::Sync(_) => f.write_str("AfterHook::Sync"),
            AfterHook::Async(_) => f.write_str("AfterHook::Async"),
        }
    }
}
