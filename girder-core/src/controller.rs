//! Controllers: a base path, shared configuration, and the route handlers
//! declared under them.
//!
//! # Declaring a controller
//!
//! ```ignore
//! use girder_core::prelude::*;
//!
//! struct ItemController {
//!     store: ItemStore,
//! }
//!
//! impl Controller<AppState> for ItemController {
//!     fn path(&self) -> &str {
//!         "/items/"
//!     }
//!
//!     fn configure(&self, config: &mut LayerConfig) {
//!         config.guard(RequireHeader::present(AUTHORIZATION));
//!     }
//!
//!     fn route_handlers(self: &Arc<Self>, routes: &mut HandlerRegistry<AppState>) {
//!         let this = Arc::clone(self);
//!         routes
//!             .add(get("/", move || async move { this.store.list_json() }))
//!             .add(post("/", create_item));
//!     }
//! }
//! ```
//!
//! Only what `route_handlers` registers is a route handler; other fields and
//! methods of the controller type are never picked up.

use std::any::Any;
use std::sync::Arc;

use crate::error::ConfigurationError;
use crate::handler::{Bound, Pending, RouteHandlerDescriptor};
use crate::layered::LayerConfig;
use crate::owner::Owner;
use crate::path::normalize_path;

/// A group of route handlers sharing a base path and configuration.
///
/// Generic over the application state `S` the handlers are served with.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Controller<{S}>`",
    label = "this type cannot be registered as a controller",
    note = "implement `Controller<S>` with `path` and `route_handlers`, then pass it to `Router::register`"
)]
pub trait Controller<S>: Send + Sync + Sized + 'static {
    /// Base path of every handler of this controller. Must not be empty.
    fn path(&self) -> &str;

    /// Set controller-level configuration. Slots left alone stay unset.
    fn configure(&self, _config: &mut LayerConfig) {}

    /// Register this controller's route handlers, in declaration order.
    fn route_handlers(self: &Arc<Self>, routes: &mut HandlerRegistry<S>);

    /// Name used in diagnostics and route listings.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Ordered list of the route handlers a controller declares.
pub struct HandlerRegistry<S> {
    handlers: Vec<RouteHandlerDescriptor<S, Pending>>,
}

impl<S> HandlerRegistry<S> {
    pub(crate) fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add(&mut self, handler: RouteHandlerDescriptor<S, Pending>) -> &mut Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// A controller after binding: path normalized, configuration settled,
/// every declared route handler owned by this controller's scope.
pub struct BoundController<S> {
    scope: Arc<Owner>,
    owner: Arc<Owner>,
    instance: Arc<dyn Any + Send + Sync>,
    handlers: Vec<RouteHandlerDescriptor<S, Bound>>,
}

impl<S> BoundController<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Bind `controller` under `owner`.
    ///
    /// Fails with [`ConfigurationError::MissingPath`] when the controller's
    /// path is empty. The check runs first, so a failed bind never creates or
    /// binds any route handler.
    pub fn bind<C: Controller<S>>(
        controller: C,
        owner: &Arc<Owner>,
    ) -> Result<Self, ConfigurationError> {
        let name = controller.name();
        if controller.path().is_empty() {
            return Err(ConfigurationError::MissingPath { controller: name });
        }

        let mut config = LayerConfig::default();
        controller.configure(&mut config);

        let path = normalize_path(controller.path());
        let scope = Owner::controller(name, path, config, Arc::clone(owner));

        let controller = Arc::new(controller);
        let mut registry = HandlerRegistry::new();
        controller.route_handlers(&mut registry);

        let handlers: Vec<_> = registry
            .handlers
            .into_iter()
            .map(|handler| handler.bind(Arc::clone(&scope)))
            .collect();

        tracing::debug!(
            controller = name,
            path = scope.path(),
            handlers = handlers.len(),
            configured = ?scope.config().configured_slots(),
            "controller bound"
        );

        Ok(Self {
            scope,
            owner: Arc::clone(owner),
            instance: controller,
            handlers,
        })
    }
}

impl<S> BoundController<S> {
    /// Normalized base path.
    pub fn path(&self) -> &str {
        self.scope.path()
    }

    pub fn name(&self) -> &str {
        self.scope.name()
    }

    /// This controller's own scope: the owner of its route handlers.
    pub fn scope(&self) -> &Arc<Owner> {
        &self.scope
    }

    /// The scope this controller was bound under (its router).
    pub fn owner(&self) -> &Arc<Owner> {
        &self.owner
    }

    pub fn config(&self) -> &LayerConfig {
        self.scope.config()
    }

    /// Bound route handlers, in declaration order.
    pub fn route_handlers(&self) -> &[RouteHandlerDescriptor<S, Bound>] {
        &self.handlers
    }

    /// The controller value itself, if it has type `C`.
    pub fn controller<C: Send + Sync + 'static>(&self) -> Option<Arc<C>> {
        Arc::clone(&self.instance).downcast::<C>().ok()
    }

    pub(crate) fn into_route_handlers(self) -> Vec<RouteHandlerDescriptor<S, Bound>> {
        self.handlers
    }
}
