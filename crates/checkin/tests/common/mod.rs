use std::sync::Arc;
use std::time::Duration;

use axum::routing::post;
use axum::Router;
use galaxy_api::config::ServerConfig;
use galaxy_api::router::build_app_router;
use galaxy_api::state::AppState;
use galaxy_api::store::TicketStore;
use galaxy_core::ticket::Ticket;
use tokio::net::TcpListener;

pub const TEST_TOKEN: &str = "operator-token";

fn test_config(api_token: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: Vec::new(),
        request_timeout_secs: 30,
        api_token: api_token.map(str::to_string),
        tickets_file: None,
    }
}

fn seed_tickets() -> Vec<Ticket> {
    vec![
        Ticket::new("TICKET-A1", 101, "A1", 7, 90_000),
        Ticket::new("TICKET-B2", 102, "B2", 7, 90_000),
        Ticket::new("TICKET-C3", 103, "C3", 8, 120_000),
    ]
}

/// Serve `router` on an ephemeral port and return its `/api/v1` base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/api/v1")
}

/// Start the real check-in service over the seeded tickets.
pub async fn spawn_service(api_token: Option<&str>) -> String {
    let config = test_config(api_token);
    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::new(TicketStore::with_tickets(seed_tickets())),
    };
    serve(build_app_router(state, &config)).await
}

/// Start a backend whose scan endpoint answers only after `delay`.
pub async fn spawn_slow_service(delay: Duration) -> String {
    let router = Router::new().route(
        "/api/v1/ticket/scan/{code}",
        post(move || async move {
            tokio::time::sleep(delay).await;
            "{}"
        }),
    );
    serve(router).await
}
