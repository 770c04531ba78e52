use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::Request;
use girder_core::controller::{Controller, HandlerRegistry};
use girder_core::error::HttpError;
use girder_core::guards::{guard_fn, RequireHeader};
use girder_core::handler::{get, websocket};
use girder_core::hooks::{AfterHook, BeforeHook};
use girder_core::http::header::{AUTHORIZATION, CONTENT_TYPE};
use girder_core::http::{HeaderName, HeaderValue, IntoResponse, Response, StatusCode};
use girder_core::layered::LayerConfig;
use girder_core::provide::{Provide, ResolvedDependencies};
use girder_core::response::{MediaTypeResponse, ResponseHeader};
use girder_core::router::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn send(router: axum::Router, path: &str, headers: &[(&str, &str)]) -> Response {
    let mut builder = Request::builder().uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    router
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_string(resp: Response) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

fn header<'a>(resp: &'a Response, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}

async fn greet(deps: ResolvedDependencies) -> String {
    deps.get::<String>("greeting")
        .map(|greeting| greeting.to_string())
        .unwrap_or_else(|| "nobody home".into())
}

async fn plain() -> &'static str {
    "plain"
}

async fn self_tagged() -> impl IntoResponse {
    ([("x-layer", "handler-set")], "tagged")
}

type Trail = Arc<Mutex<Vec<&'static str>>>;

fn recording_guard(trail: &Trail, label: &'static str) -> impl girder_core::guards::Guard {
    let trail = Arc::clone(trail);
    guard_fn(label, move |_ctx| {
        trail.lock().unwrap().push(label);
        Ok(())
    })
}

struct Secured {
    trail: Trail,
}

impl Controller<()> for Secured {
    fn path(&self) -> &str {
        "/secure"
    }

    fn configure(&self, config: &mut LayerConfig) {
        config
            .guard(recording_guard(&self.trail, "controller"))
            .guard(RequireHeader::present(AUTHORIZATION));
    }

    fn route_handlers(self: &Arc<Self>, routes: &mut HandlerRegistry<()>) {
        let trail = Arc::clone(&self.trail);
        routes.add(get("/", plain)).add(get("/admin", plain).configure(move |c| {
            c.guard(recording_guard(&trail, "handler")).guard(RequireHeader::equals(
                HeaderName::from_static("x-role"),
                HeaderValue::from_static("admin"),
            ));
        }));
    }
}

fn secured_app(trail: &Trail) -> axum::Router {
    let mut root = LayerConfig::new();
    root.guard(recording_guard(trail, "router"));
    let mut router = Router::with_config("/", root);
    router
        .register(Secured {
            trail: Arc::clone(trail),
        })
        .unwrap();
    router.into_axum().unwrap()
}

#[tokio::test]
async fn guards_run_outermost_first() {
    let trail: Trail = Arc::default();
    let resp = send(
        secured_app(&trail),
        "/secure/admin",
        &[("authorization", "Bearer t"), ("x-role", "admin")],
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(*trail.lock().unwrap(), ["router", "controller", "handler"]);
}

#[tokio::test]
async fn missing_header_is_unauthorized() {
    let trail: Trail = Arc::default();
    let resp = send(secured_app(&trail), "/secure", &[]).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["error"], "Missing required header `authorization`");
    assert_eq!(*trail.lock().unwrap(), ["router", "controller"]);
}

#[tokio::test]
async fn wrong_header_value_is_forbidden() {
    let trail: Trail = Arc::default();
    let resp = send(
        secured_app(&trail),
        "/secure/admin",
        &[("authorization", "Bearer t"), ("x-role", "guest")],
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn first_rejection_stops_the_chain() {
    let trail: Trail = Arc::default();
    let mut root = LayerConfig::new();
    root.guard(guard_fn("closed", |_| Err(HttpError::Forbidden("closed".into()))));
    let mut router = Router::with_config("/", root);
    router
        .register(Secured {
            trail: Arc::clone(&trail),
        })
        .unwrap();

    let resp = send(router.into_axum().unwrap(), "/secure", &[]).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(trail.lock().unwrap().is_empty());
}

struct Greeter {
    calls: Arc<AtomicUsize>,
}

impl Controller<()> for Greeter {
    fn path(&self) -> &str {
        "greet"
    }

    fn configure(&self, config: &mut LayerConfig) {
        config
            .dependency("greeting", Provide::value(String::from("hello from controller")))
            .response_header(
                HeaderName::from_static("x-layer"),
                ResponseHeader::from_static("controller"),
            )
            .response_header(
                HeaderName::from_static("x-documented"),
                ResponseHeader::from_static("never-sent").documentation_only(),
            )
            .after_request(AfterHook::from_fn(|mut resp| {
                resp.headers_mut()
                    .insert("x-after", HeaderValue::from_static("controller"));
                resp
            }));
    }

    fn route_handlers(self: &Arc<Self>, routes: &mut HandlerRegistry<()>) {
        let calls = Arc::clone(&self.calls);
        routes
            .add(get("/", move |deps: ResolvedDependencies| {
                calls.fetch_add(1, Ordering::SeqCst);
                greet(deps)
            }))
            .add(get("/tagged", self_tagged))
            .add(get("/custom", greet).configure(|c| {
                c.dependency("greeting", Provide::from_fn(|| String::from("hello from handler")))
                    .response_header(
                        HeaderName::from_static("x-layer"),
                        ResponseHeader::from_static("handler"),
                    )
                    .response_class(MediaTypeResponse::from_static("text/x-greeting"))
                    .after_request(AfterHook::from_async_fn(|mut resp: Response| async move {
                        resp.headers_mut()
                            .insert("x-after", HeaderValue::from_static("handler"));
                        resp
                    }));
            }))
            .add(get("/broken", greet).configure(|c| {
                c.dependency(
                    "greeting",
                    Provide::from_async_fn(|| async {
                        Err::<String, _>(HttpError::Internal("greeting store offline".into()))
                    }),
                );
            }));
    }
}

fn greeter_app(calls: &Arc<AtomicUsize>) -> axum::Router {
    let mut root = LayerConfig::new();
    root.dependency("greeting", Provide::value(String::from("hello from router")))
        .response_class(MediaTypeResponse::from_static("application/vnd.girder+json"))
        .before_request(BeforeHook::from_fn(|head| {
            head.uri
                .query()
                .filter(|q| q.contains("blocked"))
                .map(|_| (StatusCode::IM_A_TEAPOT, "blocked").into_response())
        }));
    let mut router = Router::with_config("/", root);
    router
        .register(Greeter {
            calls: Arc::clone(calls),
        })
        .unwrap();
    router.into_axum().unwrap()
}

#[tokio::test]
async fn inherited_configuration_shapes_the_response() {
    let calls = Arc::new(AtomicUsize::new(0));
    let resp = send(greeter_app(&calls), "/greet", &[]).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "x-layer"), Some("controller"));
    assert_eq!(header(&resp, "x-after"), Some("controller"));
    assert_eq!(header(&resp, "x-documented"), None);
    assert_eq!(
        header(&resp, CONTENT_TYPE.as_str()),
        Some("application/vnd.girder+json")
    );
    assert_eq!(body_string(resp).await, "hello from controller");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn handler_configuration_overrides_owners() {
    let calls = Arc::new(AtomicUsize::new(0));
    let resp = send(greeter_app(&calls), "/greet/custom", &[]).await;

    assert_eq!(header(&resp, "x-layer"), Some("handler"));
    assert_eq!(header(&resp, "x-after"), Some("handler"));
    assert_eq!(header(&resp, CONTENT_TYPE.as_str()), Some("text/x-greeting"));
    assert_eq!(body_string(resp).await, "hello from handler");
}

#[tokio::test]
async fn handler_set_headers_are_not_overwritten() {
    let calls = Arc::new(AtomicUsize::new(0));
    let resp = send(greeter_app(&calls), "/greet/tagged", &[]).await;
    assert_eq!(header(&resp, "x-layer"), Some("handler-set"));
}

#[tokio::test]
async fn before_hook_can_answer_instead_of_the_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let resp = send(greeter_app(&calls), "/greet?mode=blocked", &[]).await;

    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(header(&resp, "x-after"), Some("controller"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failing_provider_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));
    let resp = send(greeter_app(&calls), "/greet/broken", &[]).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["error"], "greeting store offline");
}

struct Chat;

impl Controller<()> for Chat {
    fn path(&self) -> &str {
        "/chat"
    }

    fn configure(&self, config: &mut LayerConfig) {
        config
            .before_request(BeforeHook::from_fn(|_| {
                Some(StatusCode::IM_A_TEAPOT.into_response())
            }))
            .before_upgrade(BeforeHook::from_async_fn(|head| async move {
                if head.headers.contains_key("x-room") {
                    None
                } else {
                    Some(StatusCode::BAD_REQUEST.into_response())
                }
            }))
            .after_upgrade(AfterHook::from_fn(|mut resp| {
                resp.headers_mut()
                    .insert("x-upgrade", HeaderValue::from_static("seen"));
                resp
            }));
    }

    fn route_handlers(self: &Arc<Self>, routes: &mut HandlerRegistry<()>) {
        routes
            .add(websocket("/ws", plain))
            .add(get("/history", plain));
    }
}

#[tokio::test]
async fn websocket_handlers_use_upgrade_hooks() {
    let mut router = Router::new("/");
    router.register(Chat).unwrap();
    let app = router.into_axum().unwrap();

    let resp = send(app.clone(), "/chat/ws", &[("x-room", "lobby")]).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "x-upgrade"), Some("seen"));

    let resp = send(app.clone(), "/chat/ws", &[]).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(app, "/chat/history", &[("x-room", "lobby")]).await;
    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(header(&resp, "x-upgrade"), None);
}

#[tokio::test]
async fn dependencies_extractor_is_empty_without_providers() {
    let mut router = Router::new("/");
    router.route_handler(get("/who", greet));
    let resp = send(router.into_axum().unwrap(), "/who", &[]).await;
    assert_eq!(body_string(resp).await, "nobody home");
}
