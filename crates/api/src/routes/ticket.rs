//! Route definitions for the `/ticket` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ticket;
use crate::state::AppState;

/// Routes mounted at `/ticket`.
///
/// ```text
/// POST   /scan/{code}                   -> scan
/// GET    /scan-list                     -> scan_list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scan/{code}", post(ticket::scan))
        .route("/scan-list", get(ticket::scan_list))
}
