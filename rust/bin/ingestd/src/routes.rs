//! Route registration: module routes plus system endpoints.

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tracing::info;

use ingest_core::now_rfc3339;

/// Build the complete router with all routes.
///
/// Module routers carry absolute paths and their own state.
pub fn build_router(module_routes: Vec<(&str, Router)>) -> Router {
    let mut app = Router::new()
        .route("/healthz", get(health))
        .route("/version", get(version));

    for (name, router) in module_routes {
        info!(module = name, "Mounting module routes");
        app = app.merge(router);
    }

    app
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "ok": true,
        "time": now_rfc3339(),
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "ingestd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use ingest::IngestModule;
    use ingest_core::Module;
    use tower::ServiceExt;

    use super::*;
    use crate::bootstrap::build_service;
    use crate::config::ServerConfig;

    fn app() -> Router {
        let config = ServerConfig::builtin().unwrap();
        let svc = build_service(&config, config.service_config(None)).unwrap();
        let module = IngestModule::new(svc);
        build_router(vec![(module.name(), module.routes())])
    }

    async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::json!(null)))
    }

    #[tokio::test]
    async fn healthz_reports_ok_and_time() {
        let (s, body) = get_json(&app(), "/healthz").await;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert!(body["time"].as_str().unwrap().contains('T'));
    }

    #[tokio::test]
    async fn version_names_binary() {
        let (s, body) = get_json(&app(), "/version").await;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(body["name"], "ingestd");
    }

    #[tokio::test]
    async fn module_routes_are_mounted_at_root() {
        let router = app();
        let (s, body) = get_json(&router, "/manifest/dev-rack-coolant-001").await;
        assert_eq!(s, StatusCode::OK);
        assert_eq!(body["keys"].as_array().unwrap().len(), 6);

        let req = Request::builder()
            .method("POST")
            .uri("/v1/ingest")
            .body(Body::from("{}"))
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
