//! Client side of the ticket check-in endpoints.
//!
//! Provides the REST wrapper around `POST /ticket/scan/{code}` and
//! `GET /ticket/scan-list`, the mapping from HTTP outcomes to
//! [`ScanResult`](galaxy_core::scan::ScanResult), and the flow that joins
//! camera and manual entries to the backend.

pub mod api;
pub mod classify;
pub mod flow;
