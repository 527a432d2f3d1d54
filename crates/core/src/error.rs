//! Domain errors shared by the scanner and the check-in service.

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No entity with this business code, e.g. an unknown ticket code.
    #[error("Entity not found: {entity} with code {code}")]
    NotFound { entity: &'static str, code: String },

    /// Input rejected before any lookup (blank or oversized code).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The requested transition already happened.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The operator's role does not allow the action.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// `NotFound` for a ticket code.
    pub fn ticket_not_found(code: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: "Ticket",
            code: code.into(),
        }
    }
}
