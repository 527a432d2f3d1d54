//! Domain building blocks for the Galaxy Cinema ticket check-in flow.
//!
//! This crate has zero internal deps so the check-in client, the check-in
//! service and the operator console can all share the same types, the
//! scan session state machine and the capture/decode seams.

pub mod capture;
pub mod context;
pub mod decode;
pub mod error;
pub mod frame;
pub mod presenter;
pub mod roles;
pub mod scan;
pub mod scan_list;
pub mod scheduler;
pub mod session;
pub mod ticket;
pub mod types;
