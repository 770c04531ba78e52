//! Per-request execution of a bound handler's layered configuration.

use std::collections::HashMap;
use std::sync::Arc;

use axum::middleware::Next;

use crate::guards::{ErasedGuard, GuardContext};
use crate::handler::{Bound, RouteHandler, RouteHandlerDescriptor};
use crate::hooks::{AfterHook, BeforeHook, RequestHead};
use crate::http::{HeaderName, IntoResponse, Request, Response};
use crate::provide::{Provide, ResolvedDependencies};
use crate::response::{ResponseClass, ResponseHeader};

/// Everything a handler resolved from its owners, computed once when the
/// router is mounted and shared by every request to that handler.
pub(crate) struct DispatchPlan {
    handler_name: String,
    route_path: String,
    guards: Vec<Arc<dyn ErasedGuard>>,
    dependencies: Vec<(String, Provide)>,
    response_headers: Vec<(HeaderName, ResponseHeader)>,
    response_class: Option<Arc<dyn ResponseClass>>,
    before: Option<BeforeHook>,
    after: Option<AfterHook>,
}

impl DispatchPlan {
    pub(crate) fn for_handler<S>(handler: &RouteHandlerDescriptor<S, Bound>) -> Self {
        let (before, after) = if handler.is_websocket() {
            (
                handler.resolve_before_upgrade().into_value(),
                handler.resolve_after_upgrade().into_value(),
            )
        } else {
            (
                handler.resolve_before_request().into_value(),
                handler.resolve_after_request().into_value(),
            )
        };

        let response_headers = handler
            .resolve_response_headers()
            .into_iter()
            .filter(|(_, header)| !header.documentation_only)
            .collect();

        Self {
            handler_name: handler.handler_name().to_string(),
            route_path: handler.full_path(),
            guards: handler.resolve_guards(),
            dependencies: handler.resolve_dependencies().into_iter().collect(),
            response_headers,
            response_class: handler.resolve_response_class().into_value(),
            before,
            after,
        }
    }

    pub(crate) async fn dispatch(self: Arc<Self>, request: Request, next: Next) -> Response {
        let (mut parts, body) = request.into_parts();

        let ctx = GuardContext {
            handler_name: &self.handler_name,
            route_path: &self.route_path,
            method: &parts.method,
            uri: &parts.uri,
            headers: &parts.headers,
        };
        for guard in &self.guards {
            if let Err(err) = guard.check(&ctx).await {
                tracing::warn!(
                    guard = guard.name(),
                    handler = %self.handler_name,
                    path = %self.route_path,
                    error = %err,
                    "request rejected by guard"
                );
                return err.into_response();
            }
        }

        if let Some(before) = &self.before {
            let head = RequestHead::from_parts(&parts, &self.handler_name, &self.route_path);
            if let Some(response) = before.call(&head).await {
                return self.finish(response).await;
            }
        }

        let mut resolved = HashMap::with_capacity(self.dependencies.len());
        for (name, provide) in &self.dependencies {
            match provide.resolve().await {
                Ok(value) => {
                    resolved.insert(name.clone(), value);
                }
                Err(err) => {
                    tracing::error!(
                        dependency = %name,
                        handler = %self.handler_name,
                        error = %err,
                        "dependency provider failed"
                    );
                    return err.into_response();
                }
            }
        }
        parts.extensions.insert(ResolvedDependencies::new(resolved));

        let response = next.run(Request::from_parts(parts, body)).await;
        self.finish(response).await
    }

    async fn finish(&self, mut response: Response) -> Response {
        if let Some(class) = &self.response_class {
            response = class.finalize(response);
        }
        let headers = response.headers_mut();
        for (name, header) in &self.response_headers {
            if !headers.contains_key(name) {
                headers.insert(name.clone(), header.value.clone());
            }
        }
        match &self.after {
            Some(after) => after.call(response).await,
            None => response,
        }
    }
}
