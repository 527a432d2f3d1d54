//! Presentation model for scan outcomes.
//!
//! Every [`ScanStatus`] maps to its own [`Tone`]; no two outcomes share a
//! tone, so renderers cannot make them look alike.

use crate::scan::{ScanResult, ScanStatus};
use crate::scan_list::ScanListPartition;

/// Visual treatment of an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Ticket accepted.
    Success,
    /// Ticket already used. Informational, not alarming.
    Notice,
    /// Ticket rejected or the check-in failed.
    Failure,
}

impl From<ScanStatus> for Tone {
    fn from(status: ScanStatus) -> Self {
        match status {
            ScanStatus::Accepted => Tone::Success,
            ScanStatus::AlreadyCheckedIn => Tone::Notice,
            ScanStatus::Invalid => Tone::Failure,
        }
    }
}

/// Ready-to-render summary of a [`ScanResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub tone: Tone,
    pub headline: String,
    pub detail: String,
}

impl Presentation {
    pub fn from_result(result: &ScanResult) -> Self {
        let tone = Tone::from(result.status());
        match result {
            ScanResult::Accepted { ticket } => Self {
                tone,
                headline: format!("Ticket {} accepted", ticket.code),
                detail: format!(
                    "Seat {} | showtime #{} | booking #{}",
                    ticket.seat_label, ticket.showtime_id, ticket.booking_id
                ),
            },
            ScanResult::AlreadyCheckedIn { code, message } => Self {
                tone,
                headline: format!("Ticket {code} was already checked in"),
                detail: message.clone(),
            },
            ScanResult::Invalid { code, message } => Self {
                tone,
                headline: format!("Ticket {code} rejected"),
                detail: message.clone(),
            },
        }
    }
}

/// What the operator can do after seeing a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextAction {
    ScanAnother,
    Close,
}

impl NextAction {
    /// Parse an operator command. Accepts `n`/`next`/`scan` and
    /// `q`/`quit`/`close`, case-insensitively.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "n" | "next" | "scan" => Some(NextAction::ScanAnother),
            "q" | "quit" | "close" | "exit" => Some(NextAction::Close),
            _ => None,
        }
    }
}

/// Renders outcomes and hardware notices to the operator.
pub trait ResultPresenter: Send {
    fn present(&mut self, result: &ScanResult);

    /// The camera could not be started; manual entry is still available.
    fn camera_unavailable(&mut self, reason: &str);

    fn scan_list(&mut self, list: &ScanListPartition);

    fn scan_list_failed(&mut self, reason: &str);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ticket::Ticket;
    use std::collections::HashSet;

    #[test]
    fn every_status_has_a_distinct_tone() {
        let tones: HashSet<Tone> = [
            ScanStatus::Accepted,
            ScanStatus::AlreadyCheckedIn,
            ScanStatus::Invalid,
        ]
        .into_iter()
        .map(Tone::from)
        .collect();
        assert_eq!(tones.len(), 3);
    }

    #[test]
    fn accepted_presentation_mentions_seat() {
        let result = ScanResult::Accepted {
            ticket: Ticket::new("TICKET-A1", 3, "H7", 12, 80_000),
        };
        let p = Presentation::from_result(&result);
        assert_eq!(p.tone, Tone::Success);
        assert!(p.headline.contains("TICKET-A1"));
        assert!(p.detail.contains("H7"));
    }

    #[test]
    fn invalid_presentation_carries_server_message() {
        let result = ScanResult::Invalid {
            code: "DOES-NOT-EXIST".into(),
            message: "Ticket not found".into(),
        };
        let p = Presentation::from_result(&result);
        assert_eq!(p.tone, Tone::Failure);
        assert_eq!(p.detail, "Ticket not found");
    }

    #[test]
    fn next_action_parsing() {
        assert_eq!(NextAction::parse(" Next "), Some(NextAction::ScanAnother));
        assert_eq!(NextAction::parse("q"), Some(NextAction::Close));
        assert_eq!(NextAction::parse("TICKET-A1"), None);
    }
}
