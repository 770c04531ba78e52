//! Cross-cutting configuration shared by routers, controllers, and handlers.
//!
//! Each of the three layers carries the same set of optional slots. A fresh
//! [`LayerConfig`] has every slot [`Slot::Unset`]; setting anything makes that
//! slot [`Slot::Explicit`]. How slots combine across layers is decided when a
//! bound handler resolves them (see `RouteHandlerDescriptor::resolve_*`):
//!
//! | Slot               | Combination                              |
//! |--------------------|------------------------------------------|
//! | `guards`           | all layers run, outermost first          |
//! | `dependencies`     | merged by name, inner layer wins         |
//! | `response_headers` | merged by name, inner layer wins         |
//! | `response_class`   | nearest layer wins                       |
//! | lifecycle hooks    | nearest layer wins                       |

use std::collections::HashMap;
use std::sync::Arc;

use crate::guards::{ErasedGuard, Guard};
use crate::hooks::{AfterHook, BeforeHook};
use crate::http::HeaderName;
use crate::provide::Provide;
use crate::response::{ResponseClass, ResponseHeader};
use crate::slot::Slot;

#[derive(Clone, Default)]
pub struct LayerConfig {
    pub(crate) dependencies: Slot<HashMap<String, Provide>>,
    pub(crate) response_headers: Slot<HashMap<HeaderName, ResponseHeader>>,
    pub(crate) response_class: Slot<Arc<dyn ResponseClass>>,
    pub(crate) guards: Slot<Vec<Arc<dyn ErasedGuard>>>,
    pub(crate) before_request: Slot<BeforeHook>,
    pub(crate) before_upgrade: Slot<BeforeHook>,
    pub(crate) after_request: Slot<AfterHook>,
    pub(crate) after_upgrade: Slot<AfterHook>,
}

impl LayerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named dependency provider.
    pub fn dependency(&mut self, name: impl Into<String>, provide: Provide) -> &mut Self {
        self.dependencies
            .explicit_or_insert_with(HashMap::new)
            .insert(name.into(), provide);
        self
    }

    /// Declare a header added to every response.
    pub fn response_header(&mut self, name: HeaderName, header: ResponseHeader) -> &mut Self {
        self.response_headers
            .explicit_or_insert_with(HashMap::new)
            .insert(name, header);
        self
    }

    pub fn response_class<R: ResponseClass>(&mut self, class: R) -> &mut Self {
        self.response_class = Slot::Explicit(Arc::new(class));
        self
    }

    /// Append a guard. Guards run in the order they were added.
    pub fn guard<G: Guard>(&mut self, guard: G) -> &mut Self {
        self.guards
            .explicit_or_insert_with(Vec::new)
            .push(Arc::new(guard));
        self
    }

    /// Mark the guard list as explicitly configured, even if empty.
    pub fn no_guards(&mut self) -> &mut Self {
        self.guards = Slot::Explicit(Vec::new());
        self
    }

    pub fn before_request(&mut self, hook: BeforeHook) -> &mut Self {
        self.before_request = Slot::Explicit(hook);
        self
    }

    pub fn after_request(&mut self, hook: AfterHook) -> &mut Self {
        self.after_request = Slot::Explicit(hook);
        self
    }

    pub fn before_upgrade(&mut self, hook: BeforeHook) -> &mut Self {
        self.before_upgrade = Slot::Explicit(hook);
        self
    }

    pub fn after_upgrade(&mut self, hook: AfterHook) -> &mut Self {
        self.after_upgrade = Slot::Explicit(hook);
        self
    }

    pub fn dependencies(&self) -> Slot<&HashMap<String, Provide>> {
        self.dependencies.as_ref()
    }

    pub fn response_headers(&self) -> Slot<&HashMap<HeaderName, ResponseHeader>> {
        self.response_headers.as_ref()
    }

    pub fn response_class_slot(&self) -> Slot<&Arc<dyn ResponseClass>> {
        self.response_class.as_ref()
    }

    pub fn guards(&self) -> Slot<&Vec<Arc<dyn ErasedGuard>>> {
        self.guards.as_ref()
    }

    pub fn before_request_slot(&self) -> Slot<&BeforeHook> {
        self.before_request.as_ref()
    }

    pub fn after_request_slot(&self) -> Slot<&AfterHook> {
        self.after_request.as_ref()
    }

    pub fn before_upgrade_slot(&self) -> Slot<&BeforeHook> {
        self.before_upgrade.as_ref()
    }

    pub fn after_upgrade_slot(&self) -> Slot<&AfterHook> {
        self.after_upgrade.as_ref()
    }

    /// Names of the slots that were explicitly configured on this layer.
    pub fn configured_slots(&self) -> Vec<&'static str> {
        let mut slots = Vec::new();
        let flags = [
            ("dependencies", self.dependencies.is_explicit()),
            ("response_headers", self.response_headers.is_explicit()),
            ("response_class", self.response_class.is_explicit()),
            ("guards", self.guards.is_explicit()),
            ("before_request", self.before_request.is_explicit()),
            ("before_upgrade", self.before_upgrade.is_explicit()),
            ("after_request", self.after_request.is_explicit()),
            ("after_upgrade", self.after_upgrade.is_explicit()),
        ];
        for (name, configured) in flags {
            if configured {
                slots.push(name);
            }
        }
        slots
    }
}

impl std::fmt::Debug for LayerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerConfig")
            .field("configured", &self.configured_slots())
            .finish()
    }
}
