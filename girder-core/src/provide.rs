use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::HttpError;
use crate::http::{FromRequestParts, Parts};

type ProvidedValue = Arc<dyn Any + Send + Sync>;
type Provision = Pin<Box<dyn Future<Output = Result<ProvidedValue, HttpError>> + Send>>;
type ProviderFn = dyn Fn() -> Provision + Send + Sync;

/// A named dependency provider attached to a router, controller, or handler.
///
/// Providers are called once per request, after guards and the before hook,
/// and their values are handed to the handler through
/// [`ResolvedDependencies`]. An inner layer overrides an outer provider with
/// the same name.
#[derive(Clone)]
pub struct Provide {
    provider: Arc<ProviderFn>,
    type_name: &'static str,
}

impl Provide {
    /// Provide the same shared value to every request.
    pub fn value<T: Send + Sync + 'static>(value: T) -> Self {
        let shared: ProvidedValue = Arc::new(value);
        Self {
            provider: Arc::new(move || -> Provision {
                let shared = Arc::clone(&shared);
                Box::pin(async move { Ok(shared) })
            }),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Build a fresh value per request with a synchronous factory.
    pub fn from_fn<T, F>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            provider: Arc::new(move || -> Provision {
                let value: ProvidedValue = Arc::new(factory());
                Box::pin(async move { Ok(value) })
            }),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Build a fresh value per request with an async, fallible factory.
    pub fn from_async_fn<T, F, Fut>(factory: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, HttpError>> + Send + 'static,
    {
        Self {
            provider: Arc::new(move || -> Provision {
                let fut = factory();
                Box::pin(async move { fut.await.map(|value| Arc::new(value) as ProvidedValue) })
            }),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Type name of the provided value, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) async fn resolve(&self) -> Result<ProvidedValue, HttpError> {
        (self.provider)().await
    }
}

impl std::fmt::Debug for Provide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provide")
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Dependency values resolved for the current request.
///
/// Use it as an extractor in any handler mounted through a Girder router:
///
/// ```ignore
/// async fn list(deps: ResolvedDependencies) -> String {
///     let repo = deps.get::<ItemRepo>("repo").unwrap();
///     repo.describe()
/// }
/// ```
#[derive(Clone, Default)]
pub struct ResolvedDependencies {
    values: Arc<HashMap<String, ProvidedValue>>,
}

impl ResolvedDependencies {
    pub(crate) fn new(values: HashMap<String, ProvidedValue>) -> Self {
        Self {
            values: Arc::new(values),
        }
    }

    /// Get a dependency by name, if it exists and has type `T`.
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        let value = self.values.get(name)?;
        Arc::clone(value).downcast::<T>().ok()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::fmt::Debug for ResolvedDependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ResolvedDependencies {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ResolvedDependencies>()
            .cloned()
            .ok_or_else(|| {
                HttpError::Internal("Dependencies were not resolved for this route".into())
            })
    }
}
