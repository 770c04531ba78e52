use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use girder_core::config::GirderConfig;
use girder_core::controller::{Controller, HandlerRegistry};
use girder_core::error::ConfigurationError;
use girder_core::handler::{delete, get, post, route};
use girder_core::http::{Method, StatusCode};
use girder_core::layered::LayerConfig;
use girder_core::owner::OwnerKind;
use girder_core::router::{RouteEntry, Router};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn send(router: axum::Router, method: Method, path: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).to_string())
}

async fn list_items() -> &'static str {
    "[]"
}

async fn create_item() -> &'static str {
    "created"
}

async fn remove_item() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn health() -> &'static str {
    "ok"
}

struct Items;

impl Controller<()> for Items {
    fn path(&self) -> &str {
        "/items/"
    }

    fn route_handlers(self: &Arc<Self>, routes: &mut HandlerRegistry<()>) {
        routes
            .add(get("/", list_items))
            .add(post("/", create_item))
            .add(delete("/{id}", remove_item));
    }
}

struct Legacy;

impl Controller<()> for Legacy {
    fn path(&self) -> &str {
        "items"
    }

    fn route_handlers(self: &Arc<Self>, routes: &mut HandlerRegistry<()>) {
        routes.add(get("", list_items).name("legacy_list"));
    }
}

struct Search;

impl Controller<()> for Search {
    fn path(&self) -> &str {
        "//search//"
    }

    fn route_handlers(self: &Arc<Self>, routes: &mut HandlerRegistry<()>) {
        routes.add(route([Method::GET, Method::POST], "/", list_items).name("search"));
    }
}

#[test]
fn routes_compose_prefix_controller_and_handler_paths() {
    let mut router: Router<()> = Router::new("/api/");
    router.register(Items).unwrap().register(Search).unwrap();
    router.route_handler(get("/health/", health));

    assert_eq!(router.prefix(), "/api");
    let routes = router.routes();
    let table: Vec<(&str, &str)> = routes
        .iter()
        .map(|r| (r.method.as_str(), r.path.as_str()))
        .collect();
    assert_eq!(
        table,
        [
            ("GET", "/api/health"),
            ("GET", "/api/items"),
            ("POST", "/api/items"),
            ("DELETE", "/api/items/{id}"),
            ("GET", "/api/search"),
            ("POST", "/api/search"),
        ]
    );
}

#[test]
fn route_entries_name_handler_and_owner() {
    let mut router: Router<()> = Router::new("/");
    router.register(Items).unwrap();
    router.route_handler(get("/health", health));

    let routes = router.routes();
    let health_entry = routes.iter().find(|r| r.path == "/health").unwrap();
    assert_eq!(
        health_entry,
        &RouteEntry {
            method: "GET".into(),
            path: "/health".into(),
            handler: "health".into(),
            owner: "router".into(),
            websocket: false,
        }
    );
    let create = routes.iter().find(|r| r.method == "POST").unwrap();
    assert_eq!(create.handler, "create_item");
    assert!(create.owner.ends_with("Items"));
}

#[test]
fn router_level_handlers_are_owned_by_the_router() {
    let mut router: Router<()> = Router::new("/");
    router.route_handler(get("/health", health));

    let handler = router.route_handlers().next().unwrap();
    assert_eq!(handler.owner().kind(), OwnerKind::Router);
    assert!(Arc::ptr_eq(handler.owner(), router.scope()));
}

#[test]
fn duplicate_method_and_path_is_a_configuration_error() {
    let mut router: Router<()> = Router::new("/");
    router.register(Items).unwrap().register(Legacy).unwrap();

    let err = router.validate().unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::DuplicateRoute {
            method: "GET".into(),
            path: "/items".into(),
            first: "list_items".into(),
            second: "legacy_list".into(),
        }
    );
    assert!(router.into_axum().is_err());
}

async fn show_item() -> &'static str {
    "item"
}

struct ItemDetail;

impl Controller<()> for ItemDetail {
    fn path(&self) -> &str {
        "/items"
    }

    fn route_handlers(self: &Arc<Self>, routes: &mut HandlerRegistry<()>) {
        routes.add(get("/{item_id}", show_item));
    }
}

#[test]
fn parameter_names_must_agree_on_one_path() {
    let mut router: Router<()> = Router::new("/");
    router.register(Items).unwrap().register(ItemDetail).unwrap();

    assert_eq!(
        router.validate().unwrap_err(),
        ConfigurationError::ConflictingRoute {
            path: "/items/{item_id}".into(),
            other: "/items/{id}".into(),
        }
    );
    let mounted = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| router.into_axum()));
    assert!(matches!(mounted, Ok(Err(ConfigurationError::ConflictingRoute { .. }))));
}

#[tokio::test]
async fn repeated_methods_count_once() {
    let mut router: Router<()> = Router::new("/");
    router.route_handler(route([Method::GET, Method::GET, Method::POST], "/x", health));

    assert!(router.validate().is_ok());
    let methods: Vec<String> = router.routes().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, ["GET", "POST"]);

    let app = router.into_axum().unwrap();
    let (status, body) = send(app, Method::GET, "/x").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[test]
fn route_without_methods_lists_nothing() {
    let mut router: Router<()> = Router::new("/");
    router.route_handler(route(Vec::<Method>::new(), "/nowhere", health));

    assert!(router.routes().is_empty());
    assert!(router.validate().is_ok());
}

#[test]
fn prefix_is_read_from_config() {
    let config = GirderConfig::from_yaml_str("server:\n  prefix: v1/\n", "test").unwrap();
    let router: Router<()> = Router::from_config(&config, LayerConfig::default());
    assert_eq!(router.prefix(), "/v1");

    let router: Router<()> = Router::from_config(&GirderConfig::empty(), LayerConfig::default());
    assert_eq!(router.prefix(), "/");
}

#[tokio::test]
async fn mounted_router_serves_every_handler() {
    let mut router: Router<()> = Router::new("/api");
    router.register(Items).unwrap().register(Search).unwrap();
    let app = router.into_axum().unwrap();

    let (status, body) = send(app.clone(), Method::GET, "/api/items").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");

    let (status, body) = send(app.clone(), Method::POST, "/api/items").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "created");

    let (status, _) = send(app.clone(), Method::DELETE, "/api/items/7").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(app.clone(), Method::POST, "/api/search").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(app.clone(), Method::PUT, "/api/items").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(app, Method::GET, "/items").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
