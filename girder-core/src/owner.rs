use std::sync::Arc;

use crate::layered::LayerConfig;
use crate::path::join_paths;

/// Which construct an [`Owner`] scope belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Router,
    Controller,
}

/// The part of a router or controller that its children point back to.
///
/// A bound controller's route handlers hold an `Arc<Owner>` to the
/// controller's scope, whose parent is the router's scope. Owner scopes are
/// immutable once created and shared read-only by every request.
#[derive(Debug)]
pub struct Owner {
    kind: OwnerKind,
    name: String,
    path: String,
    config: LayerConfig,
    parent: Option<Arc<Owner>>,
}

impl Owner {
    /// Root scope of a router. `path` must already be normalized.
    pub(crate) fn router(name: impl Into<String>, path: String, config: LayerConfig) -> Arc<Self> {
        Arc::new(Self {
            kind: OwnerKind::Router,
            name: name.into(),
            path,
            config,
            parent: None,
        })
    }

    /// Scope of a controller bound under `parent`. `path` must already be normalized.
    pub(crate) fn controller(
        name: impl Into<String>,
        path: String,
        config: LayerConfig,
        parent: Arc<Owner>,
    ) -> Arc<Self> {
        Arc::new(Self {
            kind: OwnerKind::Controller,
            name: name.into(),
            path,
            config,
            parent: Some(parent),
        })
    }

    pub fn kind(&self) -> OwnerKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// This scope's own normalized path segment.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn parent(&self) -> Option<&Arc<Owner>> {
        self.parent.as_ref()
    }

    /// This scope followed by its ancestors, innermost first.
    pub fn ancestry(&self) -> Ancestry<'_> {
        Ancestry { next: Some(self) }
    }

    /// Path from the root router down to this scope.
    pub fn full_path(&self) -> String {
        let mut segments: Vec<&str> = self.ancestry().map(Owner::path).collect();
        segments.reverse();
        join_paths(segments)
    }
}

/// Iterator over an owner scope and its ancestors. See [`Owner::ancestry`].
pub struct Ancestry<'a> {
    next: Option<&'a Owner>,
}

impl<'a> Iterator for Ancestry<'a> {
    type Item = &'a Owner;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_deref();
        Some(current)
    }
}
