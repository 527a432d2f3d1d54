//! Operator-side ticket scanner: camera sources, QR decoder, scan loop and
//! terminal presenter.

pub mod config;
pub mod console;
pub mod decoder;
pub mod runner;
pub mod sources;
