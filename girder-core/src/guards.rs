use std::future::Future;
use std::pin::Pin;

use crate::error::HttpError;
use crate::http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};

/// Context available to guards before the handler body runs.
pub struct GuardContext<'a> {
    /// Name of the route handler being guarded.
    pub handler_name: &'a str,
    /// Full route path template the request matched (e.g. `/api/items/{id}`).
    pub route_path: &'a str,
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
}

impl<'a> GuardContext<'a> {
    /// The request path.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The request query string, if any.
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// A request header as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Handler-level guard. Runs before the handler body.
///
/// Returns `Ok(())` to let the request through, `Err(HttpError)` to reject it.
/// Guards are attached to a router, a controller, or a single handler; a
/// handler runs every guard of its owners (outermost first) and then its own.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not implement `Guard`",
    label = "this type cannot be used as a guard",
    note = "implement `Guard` for your type, or wrap a predicate with `guard_fn`"
)]
pub trait Guard: Send + Sync + 'static {
    fn check(&self, ctx: &GuardContext<'_>) -> impl Future<Output = Result<(), HttpError>> + Send;

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Object-safe wrapper for [`Guard`], so guards of different types can share
/// one ordered list.
#[doc(hidden)]
pub trait ErasedGuard: Send + Sync + 'static {
    fn name(&self) -> &str;
    fn check<'a>(
        &'a self,
        ctx: &'a GuardContext<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<(), HttpError>> + Send + 'a>>;
}

impl<T: Guard> ErasedGuard for T {
    fn name(&self) -> &str {
        Guard::name(self)
    }

    fn check<'a>(
        &'a self,
        ctx: &'a GuardContext<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<(), HttpError>> + Send + 'a>> {
        Box::pin(Guard::check(self, ctx))
    }
}

/// A guard built from a synchronous predicate. See [`guard_fn`].
pub struct FnGuard<F> {
    name: &'static str,
    predicate: F,
}

/// Wrap a synchronous predicate as a guard.
///
/// ```ignore
/// let no_delete = guard_fn("no-delete", |ctx| {
///     if ctx.method == Method::DELETE {
///         Err(HttpError::Forbidden("read-only".into()))
///     } else {
///         Ok(())
///     }
/// });
/// ```
pub fn guard_fn<F>(name: &'static str, predicate: F) -> FnGuard<F>
where
    F: Fn(&GuardContext<'_>) -> Result<(), HttpError> + Send + Sync + 'static,
{
    FnGuard { name, predicate }
}

impl<F> Guard for FnGuard<F>
where
    F: Fn(&GuardContext<'_>) -> Result<(), HttpError> + Send + Sync + 'static,
{
    fn check(&self, ctx: &GuardContext<'_>) -> impl Future<Output = Result<(), HttpError>> + Send {
        std::future::ready((self.predicate)(ctx))
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Guard that requires a request header, optionally with an exact value.
///
/// Missing header → 401, wrong value → 403.
pub struct RequireHeader {
    name: HeaderName,
    value: Option<HeaderValue>,
}

impl RequireHeader {
    pub fn present(name: HeaderName) -> Self {
        Self { name, value: None }
    }

    pub fn equals(name: HeaderName, value: HeaderValue) -> Self {
        Self {
            name,
            value: Some(value),
        }
    }
}

impl Guard for RequireHeader {
    fn check(&self, ctx: &GuardContext<'_>) -> impl Future<Output = Result<(), HttpError>> + Send {
        let result = match (ctx.headers.get(&self.name), &self.value) {
            (None, _) => Err(HttpError::Unauthorized(format!(
                "Missing required header `{}`",
                self.name
            ))),
            (Some(actual), Some(expected)) if actual != expected => Err(HttpError::Forbidden(
                format!("Invalid value for header `{}`", self.name),
            )),
            (Some(_), _) => Ok(()),
        };
        std::future::ready(result)
    }

    fn name(&self) -> &str {
        "RequireHeader"
    }
}
