use std::sync::Arc;

use crate::config::ServerConfig;
use crate::store::TicketStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (auth token, timeouts).
    pub config: Arc<ServerConfig>,
    /// In-memory ticket store.
    pub store: Arc<TicketStore>,
}
