//! Route handler descriptors.
//!
//! A descriptor is one declared endpoint: its kind (HTTP methods or a
//! WebSocket upgrade), its path fragment relative to the owning controller,
//! the axum handler that serves it, and handler-level [`LayerConfig`].
//!
//! Descriptors are built in the [`Pending`] state by the constructor
//! functions of this module ([`get`], [`post`], [`route`], [`websocket`], ...)
//! and become [`Bound`] exactly once, when the controller that registered
//! them is bound to its router. Only bound descriptors expose an owner.

use std::collections::HashMap;
use std::sync::Arc;

use axum::handler::Handler;
use axum::routing::{MethodFilter, MethodRouter};

use crate::guards::ErasedGuard;
use crate::hooks::{AfterHook, BeforeHook};
use crate::http::{HeaderName, Method};
use crate::layered::LayerConfig;
use crate::owner::Owner;
use crate::path::{join_paths, normalize_path};
use crate::provide::Provide;
use crate::response::{ResponseClass, ResponseHeader};
use crate::slot::Slot;

/// What kind of endpoint a descriptor declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerKind {
    Http(Vec<Method>),
    WebSocket,
}

/// Binding state of a descriptor that no controller has claimed yet.
#[derive(Debug, Clone, Copy)]
pub struct Pending;

/// Binding state of a descriptor claimed by its owner.
#[derive(Debug, Clone)]
pub struct Bound {
    owner: Arc<Owner>,
}

/// The "route handler" capability, shared by every descriptor variant and
/// binding state.
pub trait RouteHandler {
    fn handler_name(&self) -> &str;

    fn kind(&self) -> &HandlerKind;

    /// Normalized path fragment, relative to the owner.
    fn path(&self) -> &str;

    fn layer_config(&self) -> &LayerConfig;

    fn is_websocket(&self) -> bool {
        matches!(self.kind(), HandlerKind::WebSocket)
    }

    /// Methods this handler answers. WebSocket upgrades arrive as `GET`.
    fn methods(&self) -> Vec<Method> {
        match self.kind() {
            HandlerKind::Http(methods) => methods.clone(),
            HandlerKind::WebSocket => vec![Method::GET],
        }
    }
}

pub struct RouteHandlerDescriptor<S, B = Bound> {
    name: String,
    kind: HandlerKind,
    path: String,
    config: LayerConfig,
    route: MethodRouter<S>,
    binding: B,
}

impl<S, B> RouteHandler for RouteHandlerDescriptor<S, B> {
    fn handler_name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &HandlerKind {
        &self.kind
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn layer_config(&self) -> &LayerConfig {
        &self.config
    }
}

impl<S, B: std::fmt::Debug> std::fmt::Debug for RouteHandlerDescriptor<S, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteHandlerDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("config", &self.config)
            .field("binding", &self.binding)
            .finish()
    }
}

impl<S> RouteHandlerDescriptor<S, Pending>
where
    S: Clone + Send + Sync + 'static,
{
    fn pending(name: String, kind: HandlerKind, path: &str, route: MethodRouter<S>) -> Self {
        Self {
            name,
            kind,
            path: normalize_path(path),
            config: LayerConfig::default(),
            route,
            binding: Pending,
        }
    }

    /// Override the handler name derived from the handler function.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set handler-level configuration.
    ///
    /// ```ignore
    /// get("/{id}", show).configure(|c| {
    ///     c.guard(RequireHeader::present(AUTHORIZATION));
    /// })
    /// ```
    pub fn configure(mut self, f: impl FnOnce(&mut LayerConfig)) -> Self {
        f(&mut self.config);
        self
    }

    /// Claim this descriptor for `owner`. Consumes the pending descriptor, so
    /// a descriptor can only ever be bound once.
    pub fn bind(self, owner: Arc<Owner>) -> RouteHandlerDescriptor<S, Bound> {
        tracing::debug!(
            handler = %self.name,
            path = %self.path,
            owner = owner.name(),
            "route handler bound"
        );
        RouteHandlerDescriptor {
            name: self.name,
            kind: self.kind,
            path: self.path,
            config: self.config,
            route: self.route,
            binding: Bound { owner },
        }
    }
}

impl<S> RouteHandlerDescriptor<S, Bound> {
    pub fn owner(&self) -> &Arc<Owner> {
        &self.binding.owner
    }

    /// Path from the root router down to this handler.
    pub fn full_path(&self) -> String {
        join_paths([self.binding.owner.full_path(), self.path.clone()])
    }

    /// Guards of every layer, outermost owner first, handler last.
    pub fn resolve_guards(&self) -> Vec<Arc<dyn ErasedGuard>> {
        self.layers()
            .into_iter()
            .filter_map(|config| config.guards.value())
            .flat_map(|guards| guards.iter().cloned())
            .collect()
    }

    /// Providers of every layer merged by name; inner layers override outer ones.
    pub fn resolve_dependencies(&self) -> HashMap<String, Provide> {
        let mut merged = HashMap::new();
        for config in self.layers() {
            if let Some(dependencies) = config.dependencies.value() {
                merged.extend(dependencies.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        merged
    }

    /// Response headers of every layer merged by name; inner layers override outer ones.
    pub fn resolve_response_headers(&self) -> HashMap<HeaderName, ResponseHeader> {
        let mut merged = HashMap::new();
        for config in self.layers() {
            if let Some(headers) = config.response_headers.value() {
                merged.extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        merged
    }

    pub fn resolve_response_class(&self) -> Slot<Arc<dyn ResponseClass>> {
        self.resolve_nearest(|config| &config.response_class)
    }

    pub fn resolve_before_request(&self) -> Slot<BeforeHook> {
        self.resolve_nearest(|config| &config.before_request)
    }

    pub fn resolve_after_request(&self) -> Slot<AfterHook> {
        self.resolve_nearest(|config| &config.after_request)
    }

    pub fn resolve_before_upgrade(&self) -> Slot<BeforeHook> {
        self.resolve_nearest(|config| &config.before_upgrade)
    }

    pub fn resolve_after_upgrade(&self) -> Slot<AfterHook> {
        self.resolve_nearest(|config| &config.after_upgrade)
    }

    pub(crate) fn into_method_router(self) -> MethodRouter<S> {
        self.route
    }

    /// Layer configs from the outermost owner down to this handler.
    fn layers(&self) -> Vec<&LayerConfig> {
        let mut layers: Vec<&LayerConfig> =
            self.binding.owner.ancestry().map(Owner::config).collect();
        layers.reverse();
        layers.push(&self.config);
        layers
    }

    /// The handler's own value is explicit; the nearest owner's is inherited.
    fn resolve_nearest<T: Clone>(&self, pick: impl Fn(&LayerConfig) -> &Slot<T>) -> Slot<T> {
        if let Some(value) = pick(&self.config).value() {
            return Slot::Explicit(value.clone());
        }
        self.binding
            .owner
            .ancestry()
            .find_map(|owner| pick(owner.config()).value().cloned())
            .map_or(Slot::Unset, Slot::Inherited)
    }
}

fn handler_name<H>() -> String {
    let full = std::any::type_name::<H>();
    if full.ends_with("{{closure}}") {
        return full.to_string();
    }
    full.rsplit("::").next().unwrap_or(full).to_string()
}

macro_rules! method_handler {
    ($($name:ident => $method:ident),+ $(,)?) => {
        $(
            #[doc = concat!("Declare a `", stringify!($method), "` route handler.")]
            pub fn $name<H, T, S>(path: &str, handler: H) -> RouteHandlerDescriptor<S, Pending>
            where
                H: Handler<T, S>,
                T: 'static,
                S: Clone + Send + Sync + 'static,
            {
                RouteHandlerDescriptor::pending(
                    handler_name::<H>(),
                    HandlerKind::Http(vec![Method::$method]),
                    path,
                    axum::routing::$name(handler),
                )
            }
        )+
    };
}

method_handler! {
    get => GET,
    post => POST,
    put => PUT,
    patch => PATCH,
    delete => DELETE,
}

/// Declare a route handler answering several methods.
///
/// Repeated methods count once. Methods axum cannot route (extension
/// methods) are dropped with a warning.
pub fn route<H, T, S>(
    methods: impl IntoIterator<Item = Method>,
    path: &str,
    handler: H,
) -> RouteHandlerDescriptor<S, Pending>
where
    H: Handler<T, S>,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    let mut accepted = Vec::new();
    let mut filter: Option<MethodFilter> = None;
    for method in methods {
        if accepted.contains(&method) {
            continue;
        }
        match MethodFilter::try_from(method.clone()) {
            Ok(f) => {
                filter = Some(filter.map_or(f, |acc| acc.or(f)));
                accepted.push(method);
            }
            Err(_) => tracing::warn!(%method, path, "method cannot be routed, ignoring"),
        }
    }
    let method_router = match filter {
        Some(filter) => axum::routing::on(filter, handler),
        None => {
            tracing::warn!(path, "route declares no routable method, it will never match");
            MethodRouter::new()
        }
    };
    RouteHandlerDescriptor::pending(
        handler_name::<H>(),
        HandlerKind::Http(accepted),
        path,
        method_router,
    )
}

/// Declare a WebSocket route handler. The handler receives the upgrade
/// request (typically through `axum::extract::WebSocketUpgrade`).
pub fn websocket<H, T, S>(path: &str, handler: H) -> RouteHandlerDescriptor<S, Pending>
where
    H: Handler<T, S>,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    RouteHandlerDescriptor::pending(
        handler_name::<H>(),
        HandlerKind::WebSocket,
        path,
        axum::routing::get(handler),
    )
}
