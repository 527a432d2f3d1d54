pub mod health;
pub mod ticket;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ticket/scan/{code}                              check in (POST)
/// /ticket/scan-list                                list tickets (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/ticket", ticket::router())
}
