//! Mapping from check-in API outcomes to [`ScanResult`].
//!
//! 409 is "already checked in", an informational outcome. Every other
//! failure is "invalid", carrying the server's message verbatim when it
//! sent one.

use galaxy_core::scan::ScanResult;
use galaxy_core::ticket::Ticket;

use crate::api::CheckInApiError;

/// HTTP status the backend uses for a ticket that was already used.
pub const STATUS_ALREADY_CHECKED_IN: u16 = 409;

pub const MSG_ALREADY_CHECKED_IN: &str = "Ticket has already been checked in";
pub const MSG_INVALID_FALLBACK: &str = "Ticket is invalid or could not be verified";
pub const MSG_TIMEOUT: &str = "Check-in request timed out";

/// Classify the outcome of a single check-in request for `code`.
pub fn classify(code: &str, outcome: Result<Ticket, CheckInApiError>) -> ScanResult {
    match outcome {
        Ok(ticket) => ScanResult::Accepted { ticket },
        Err(CheckInApiError::ApiError {
            status: STATUS_ALREADY_CHECKED_IN,
            message,
        }) => ScanResult::AlreadyCheckedIn {
            code: code.to_string(),
            message: message.unwrap_or_else(|| MSG_ALREADY_CHECKED_IN.to_string()),
        },
        Err(CheckInApiError::ApiError { message, .. }) => ScanResult::Invalid {
            code: code.to_string(),
            message: message.unwrap_or_else(|| MSG_INVALID_FALLBACK.to_string()),
        },
        Err(CheckInApiError::Timeout) => ScanResult::Invalid {
            code: code.to_string(),
            message: MSG_TIMEOUT.to_string(),
        },
        Err(e) => {
            tracing::warn!(code = %code, error = %e, "Check-in request failed");
            ScanResult::Invalid {
                code: code.to_string(),
                message: MSG_INVALID_FALLBACK.to_string(),
            }
        }
    }
}
