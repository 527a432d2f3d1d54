//! Request extractors.
//!
//! - [`auth::OperatorAuth`] -- Checks the scanner's bearer token when one is configured.

pub mod auth;
