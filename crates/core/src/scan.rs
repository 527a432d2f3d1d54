//! Scan attempts and their server-side outcome.

use std::time::Instant;

use serde::Serialize;

use crate::ticket::Ticket;

/// Where a ticket code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanSource {
    /// Decoded from a camera frame.
    Camera,
    /// Typed in by the operator.
    Manual,
}

impl ScanSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanSource::Camera => "camera",
            ScanSource::Manual => "manual",
        }
    }
}

/// A code picked up during one scanning session. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanAttempt {
    pub code: String,
    pub source: ScanSource,
    pub at: Instant,
}

impl ScanAttempt {
    pub fn new(code: impl Into<String>, source: ScanSource, at: Instant) -> Self {
        Self {
            code: code.into(),
            source,
            at,
        }
    }
}

/// Coarse outcome of a check-in submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Accepted,
    AlreadyCheckedIn,
    Invalid,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Accepted => "accepted",
            ScanStatus::AlreadyCheckedIn => "already_checked_in",
            ScanStatus::Invalid => "invalid",
        }
    }
}

/// Result of submitting a [`ScanAttempt`] to the backend.
///
/// `AlreadyCheckedIn` is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanResult {
    Accepted { ticket: Ticket },
    AlreadyCheckedIn { code: String, message: String },
    Invalid { code: String, message: String },
}

impl ScanResult {
    pub fn status(&self) -> ScanStatus {
        match self {
            ScanResult::Accepted { .. } => ScanStatus::Accepted,
            ScanResult::AlreadyCheckedIn { .. } => ScanStatus::AlreadyCheckedIn,
            ScanResult::Invalid { .. } => ScanStatus::Invalid,
        }
    }

    /// The ticket code this result refers to.
    pub fn code(&self) -> &str {
        match self {
            ScanResult::Accepted { ticket } => &ticket.code,
            ScanResult::AlreadyCheckedIn { code, .. } | ScanResult::Invalid { code, .. } => code,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ScanResult::Accepted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_tags_serialize_in_snake_case() {
        let result = ScanResult::AlreadyCheckedIn {
            code: "TICKET-A1".into(),
            message: "used".into(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "already_checked_in");
        assert_eq!(json["code"], "TICKET-A1");
        assert_eq!(result.status().as_str(), "already_checked_in");
    }

    #[test]
    fn accepted_result_exposes_ticket_code() {
        let result = ScanResult::Accepted {
            ticket: Ticket::new("TICKET-A1", 1, "A1", 2, 10),
        };
        assert_eq!(result.code(), "TICKET-A1");
        assert!(result.is_accepted());
    }
}
