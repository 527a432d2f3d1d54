//! Handlers for the `/ticket` resource.
//!
//! Staff check-in: scanning a ticket code and listing tickets for the
//! pending/scanned views.

use axum::extract::{Path, State};
use axum::Json;
use galaxy_core::ticket::{normalize_code, Ticket};

use crate::error::AppResult;
use crate::middleware::auth::OperatorAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/ticket/scan/{code}
///
/// Check a ticket in. Returns 404 for unknown codes and 409 when the
/// ticket was already checked in.
pub async fn scan(
    State(state): State<AppState>,
    _auth: OperatorAuth,
    Path(code): Path<String>,
) -> AppResult<Json<DataResponse<Ticket>>> {
    let code = normalize_code(&code)?;
    match state.store.check_in(&code).await {
        Ok(ticket) => {
            tracing::info!(code = %code, seat = %ticket.seat_label, "Ticket checked in");
            Ok(Json(DataResponse::with_message(ticket, "Check-in successful")))
        }
        Err(e) => {
            tracing::info!(code = %code, error = %e, "Ticket check-in rejected");
            Err(e.into())
        }
    }
}

/// GET /api/v1/ticket/scan-list
///
/// List every ticket with its checked-in flag.
pub async fn scan_list(
    State(state): State<AppState>,
    _auth: OperatorAuth,
) -> AppResult<Json<DataResponse<Vec<Ticket>>>> {
    let tickets = state.store.list().await;
    Ok(Json(DataResponse::new(tickets)))
}
