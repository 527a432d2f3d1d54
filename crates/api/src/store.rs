//! In-memory ticket store.
//!
//! The store is the sole authority for the check-in transition: a ticket's
//! `checked_in` flag is flipped under the write lock, so two concurrent
//! scans of the same code produce exactly one success.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use galaxy_core::error::CoreError;
use galaxy_core::ticket::Ticket;
use tokio::sync::RwLock;

pub struct TicketStore {
    tickets: RwLock<HashMap<String, Ticket>>,
}

impl Default for TicketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            tickets: RwLock::new(HashMap::new()),
        }
    }

    /// Create a store seeded with `tickets`. Later duplicates of a code
    /// replace earlier ones.
    pub fn with_tickets(tickets: impl IntoIterator<Item = Ticket>) -> Self {
        let map = tickets.into_iter().map(|t| (t.code.clone(), t)).collect();
        Self {
            tickets: RwLock::new(map),
        }
    }

    /// Parse a JSON array of tickets, as stored in `TICKETS_FILE`.
    pub fn parse_seed(json: &str) -> Result<Vec<Ticket>, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a seeded store from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tickets file {}", path.display()))?;
        let tickets = Self::parse_seed(&raw)
            .with_context(|| format!("Failed to parse tickets file {}", path.display()))?;
        Ok(Self::with_tickets(tickets))
    }

    /// Insert or replace a ticket.
    pub async fn insert(&self, ticket: Ticket) {
        self.tickets.write().await.insert(ticket.code.clone(), ticket);
    }

    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }

    pub async fn get(&self, code: &str) -> Option<Ticket> {
        self.tickets.read().await.get(code).cloned()
    }

    /// Check a ticket in.
    ///
    /// - Unknown code: [`CoreError::NotFound`].
    /// - Already checked in: [`CoreError::Conflict`].
    /// - Otherwise the flag and timestamp are set and the updated ticket
    ///   is returned.
    pub async fn check_in(&self, code: &str) -> Result<Ticket, CoreError> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .get_mut(code)
            .ok_or_else(|| CoreError::ticket_not_found(code))?;

        if ticket.checked_in {
            let at = ticket
                .checked_in_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "an earlier scan".to_string());
            return Err(CoreError::Conflict(format!(
                "Ticket {code} was already checked in at {at}"
            )));
        }

        ticket.checked_in = true;
        ticket.checked_in_at = Some(Utc::now());
        Ok(ticket.clone())
    }

    /// All tickets, sorted by code.
    pub async fn list(&self) -> Vec<Ticket> {
        let mut tickets: Vec<Ticket> = self.tickets.read().await.values().cloned().collect();
        tickets.sort_by(|a, b| a.code.cmp(&b.code));
        tickets
    }
}
