use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::routing::MethodRouter;
use serde::Serialize;

use crate::config::GirderConfig;
use crate::controller::{BoundController, Controller};
use crate::dispatch::DispatchPlan;
use crate::error::ConfigurationError;
use crate::handler::{Bound, Pending, RouteHandler, RouteHandlerDescriptor};
use crate::layered::LayerConfig;
use crate::owner::Owner;
use crate::path::normalize_path;

/// One addressable route: a method on a full path, served by a named handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub method: String,
    pub path: String,
    pub handler: String,
    /// Name of the controller (or router) that owns the handler.
    pub owner: String,
    pub websocket: bool,
}

/// The owner of a set of controllers, mounted under one path prefix.
///
/// The router binds every controller it registers, passing its own scope as
/// the controller's owner, and finally turns the bound handlers into an
/// `axum::Router`:
///
/// ```ignore
/// let mut router = Router::new("/api");
/// router.register(ItemController::default())?;
/// let app: axum::Router = router.into_axum()?.with_state(state);
/// ```
pub struct Router<S> {
    scope: Arc<Owner>,
    controllers: Vec<BoundController<S>>,
    handlers: Vec<RouteHandlerDescriptor<S, Bound>>,
}

impl<S> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(prefix: &str) -> Self {
        Self::with_config(prefix, LayerConfig::default())
    }

    /// Router with router-level configuration inherited by every controller.
    pub fn with_config(prefix: &str, config: LayerConfig) -> Self {
        Self {
            scope: Owner::router("router", normalize_path(prefix), config),
            controllers: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// Router mounted under the `server.prefix` config key (default `/`).
    pub fn from_config(config: &GirderConfig, layer: LayerConfig) -> Self {
        let prefix: String = config.get_or("server.prefix", "/".to_string());
        Self::with_config(&prefix, layer)
    }

    /// Normalized mount prefix.
    pub fn prefix(&self) -> &str {
        self.scope.path()
    }

    /// The router's own scope: the owner of its controllers.
    pub fn scope(&self) -> &Arc<Owner> {
        &self.scope
    }

    /// Bind `controller` with this router as its owner.
    pub fn register<C: Controller<S>>(
        &mut self,
        controller: C,
    ) -> Result<&mut Self, ConfigurationError> {
        let bound = BoundController::bind(controller, &self.scope)?;
        self.controllers.push(bound);
        Ok(self)
    }

    /// Declare a route handler directly on the router, outside any controller.
    pub fn route_handler(&mut self, handler: RouteHandlerDescriptor<S, Pending>) -> &mut Self {
        self.handlers.push(handler.bind(Arc::clone(&self.scope)));
        self
    }

    pub fn controllers(&self) -> &[BoundController<S>] {
        &self.controllers
    }

    /// Every bound route handler: controllers in registration order, then
    /// router-level handlers.
    pub fn route_handlers(&self) -> impl Iterator<Item = &RouteHandlerDescriptor<S, Bound>> {
        self.controllers
            .iter()
            .flat_map(|controller| controller.route_handlers())
            .chain(self.handlers.iter())
    }

    /// The route table, sorted by path then method.
    pub fn routes(&self) -> Vec<RouteEntry> {
        let mut routes: Vec<RouteEntry> = self
            .route_handlers()
            .flat_map(|handler| {
                let path = handler.full_path();
                let owner = handler.owner().name().to_string();
                let websocket = handler.is_websocket();
                let name = handler.handler_name().to_string();
                handler
                    .methods()
                    .into_iter()
                    .map(move |method| RouteEntry {
                        method: method.to_string(),
                        path: path.clone(),
                        handler: name.clone(),
                        owner: owner.clone(),
                        websocket,
                    })
            })
            .collect();
        routes.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.method.cmp(&b.method)));
        routes
    }

    /// Check the route table for two handlers claiming the same method and
    /// path, and for paths that only differ in parameter names.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut seen: HashMap<(String, String), String> = HashMap::new();
        let mut shapes: HashMap<String, String> = HashMap::new();
        for handler in self.route_handlers() {
            let path = handler.full_path();
            match shapes.get(&route_shape(&path)) {
                Some(other) if *other != path => {
                    return Err(ConfigurationError::ConflictingRoute {
                        path,
                        other: other.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    shapes.insert(route_shape(&path), path.clone());
                }
            }
            for method in handler.methods() {
                let key = (method.to_string(), path.clone());
                if let Some(first) = seen.get(&key) {
                    return Err(ConfigurationError::DuplicateRoute {
                        method: key.0,
                        path: key.1,
                        first: first.clone(),
                        second: handler.handler_name().to_string(),
                    });
                }
                seen.insert(key, handler.handler_name().to_string());
            }
        }
        Ok(())
    }

    /// Build the `axum::Router` serving every bound handler.
    ///
    /// Each handler is wrapped with its resolved guards, lifecycle hooks,
    /// dependencies, response class, and response headers.
    pub fn into_axum(self) -> Result<axum::Router<S>, ConfigurationError> {
        self.validate()?;

        let handlers: Vec<_> = self
            .controllers
            .into_iter()
            .flat_map(BoundController::into_route_handlers)
            .chain(self.handlers)
            .collect();
        let handler_count = handlers.len();

        let mut by_path: BTreeMap<String, MethodRouter<S>> = BTreeMap::new();
        for handler in handlers {
            let path = handler.full_path();
            let plan = Arc::new(DispatchPlan::for_handler(&handler));
            let layer = middleware::from_fn(move |request: Request, next: Next| {
                let plan = Arc::clone(&plan);
                async move { plan.dispatch(request, next).await }
            });
            let method_router = handler.into_method_router().route_layer(layer);
            let merged = match by_path.remove(&path) {
                Some(existing) => existing.merge(method_router),
                None => method_router,
            };
            by_path.insert(path, merged);
        }

        let route_count = by_path.len();
        let router = by_path
            .into_iter()
            .fold(axum::Router::new(), |router, (path, method_router)| {
                router.route(&path, method_router)
            });

        tracing::info!(
            prefix = self.scope.path(),
            handlers = handler_count,
            paths = route_count,
            "girder router mounted"
        );
        Ok(router)
    }
}

/// `/items/{id}/tags/{*rest}` -> `/items/{}/tags/{*}`: the form the route
/// tree matches on, with parameter names erased.
fn route_shape(path: &str) -> String {
    let mut shape = String::with_capacity(path.len());
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        shape.push_str(&rest[..open]);
        let param = &rest[open + 1..open + close];
        shape.push_str(if param.starts_with('*') { "{*}" } else { "{}" });
        rest = &rest[open + close + 1..];
    }
    shape.push_str(rest);
    shape
}
