use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use galaxy_core::ticket::Ticket;
use http_body_util::BodyExt;
use tower::ServiceExt;

use galaxy_api::config::ServerConfig;
use galaxy_api::router::build_app_router;
use galaxy_api::state::AppState;
use galaxy_api::store::TicketStore;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(api_token: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        api_token: api_token.map(str::to_string),
        tickets_file: None,
    }
}

/// Tickets used across the integration tests.
pub fn seed_tickets() -> Vec<Ticket> {
    vec![
        Ticket::new("TICKET-A1", 101, "A1", 7, 90_000),
        Ticket::new("TICKET-B2", 102, "B2", 7, 90_000),
        Ticket::new("TICKET-C3", 103, "C3", 8, 120_000),
    ]
}

/// Build the full application router over a seeded store.
pub fn build_test_app(api_token: Option<&str>) -> Router {
    let config = test_config(api_token);
    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::new(TicketStore::with_tickets(seed_tickets())),
    };
    build_app_router(state, &config)
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
