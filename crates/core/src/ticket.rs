//! Ticket snapshot as returned by the check-in endpoints.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Longest ticket code accepted from an operator or a decoded QR payload.
pub const MAX_CODE_LEN: usize = 128;

/// A single admission ticket.
///
/// Created by the backend when a booking is paid. `checked_in` moves from
/// `false` to `true` exactly once, and only the server performs that move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub code: String,
    pub booking_id: DbId,
    pub seat_label: String,
    pub showtime_id: DbId,
    #[serde(default)]
    pub checked_in: bool,
    #[serde(default)]
    pub checked_in_at: Option<Timestamp>,
    /// Price in the smallest currency unit.
    pub price: i64,
}

impl Ticket {
    /// Fresh, not yet checked-in ticket.
    pub fn new(
        code: impl Into<String>,
        booking_id: DbId,
        seat_label: impl Into<String>,
        showtime_id: DbId,
        price: i64,
    ) -> Self {
        Self {
            code: code.into(),
            booking_id,
            seat_label: seat_label.into(),
            showtime_id,
            checked_in: false,
            checked_in_at: None,
            price,
        }
    }
}

/// Normalize a ticket code typed by an operator or decoded from a frame.
///
/// Surrounding whitespace is removed. Empty and over-long codes are
/// rejected so they never reach the backend.
pub fn normalize_code(raw: &str) -> Result<String, CoreError> {
    let code = raw.trim();
    if code.is_empty() {
        return Err(CoreError::Validation("Ticket code is empty".into()));
    }
    if code.chars().count() > MAX_CODE_LEN {
        return Err(CoreError::Validation(format!(
            "Ticket code exceeds {MAX_CODE_LEN} characters"
        )));
    }
    Ok(code.to_string())
}
