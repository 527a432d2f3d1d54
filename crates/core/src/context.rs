//! Operator session passed down to the check-in flow.
//!
//! The web frontend read the auth token and role from browser storage on
//! every call. Here the session is an explicit value handed to whoever
//! needs it, so the scan flow can be tested without any storage at all.

use crate::roles;

/// Authenticated operator running the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer token attached to backend requests, if any.
    pub token: Option<String>,
    /// Role name, see [`crate::roles`].
    pub role: String,
}

impl Session {
    pub fn new(token: Option<String>, role: impl Into<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            role: role.into(),
        }
    }

    /// Session without credentials, used when the backend has auth disabled.
    pub fn anonymous(role: impl Into<String>) -> Self {
        Self::new(None, role)
    }

    pub fn can_check_in(&self) -> bool {
        roles::can_check_in(&self.role)
    }

    /// Value for the `Authorization` header, when a token is present.
    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }
}
