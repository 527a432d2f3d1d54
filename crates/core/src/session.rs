//! Scan session state machine.
//!
//! ```text
//! Idle --start()--> Active --decoded--> Detected{until} --window elapsed--> Active
//!   ^                 |                      |
//!   +--deactivate()---+----------------------+
//! ```
//!
//! The session is stepped by [`ScanSession::tick`]; it owns no timer of its
//! own. Whoever drives it (see the scanner's runner) decides when ticks
//! happen and must call [`ScanSession::deactivate`] when done. Dropping the
//! session also releases the camera.

use std::time::{Duration, Instant};

use crate::capture::{CaptureError, FrameCapturer, FrameSource};
use crate::decode::{decode_frame, DecodePolicy, Decoder};
use crate::error::CoreError;
use crate::scan::{ScanAttempt, ScanSource};
use crate::ticket::normalize_code;

/// Default pause after a detection, giving the UI time to react.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Default window in which the same code is not reported twice.
pub const DEFAULT_REPEAT_SUPPRESSION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    /// A code was just reported; ticks are ignored until `until`.
    Detected { until: Instant },
}

/// What happens after a successful detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Close the session after the first code.
    SingleShot,
    /// Re-arm after the debounce window.
    Continuous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub debounce: Duration,
    pub repeat_suppression: Duration,
    pub mode: ScanMode,
    pub decode: DecodePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            repeat_suppression: DEFAULT_REPEAT_SUPPRESSION,
            mode: ScanMode::Continuous,
            decode: DecodePolicy::default(),
        }
    }
}

/// Coordinates capture and decode for one scanning session.
pub struct ScanSession<S: FrameSource, D: Decoder> {
    capturer: FrameCapturer<S>,
    decoder: D,
    config: SessionConfig,
    state: SessionState,
    last_report: Option<(String, Instant)>,
}

impl<S: FrameSource, D: Decoder> ScanSession<S, D> {
    pub fn new(capturer: FrameCapturer<S>, decoder: D, config: SessionConfig) -> Self {
        Self {
            capturer,
            decoder,
            config,
            state: SessionState::Idle,
            last_report: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether the camera side of the session is running.
    pub fn is_active(&self) -> bool {
        self.state != SessionState::Idle
    }

    /// Whether the camera stream is currently held.
    pub fn camera_open(&self) -> bool {
        self.capturer.is_open()
    }

    /// Open the camera and start scanning. Repeat suppression starts over
    /// with every activation.
    ///
    /// If the camera cannot be opened the session stays idle and the error
    /// is returned so the caller can offer manual entry.
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        if self.is_active() {
            return Ok(());
        }
        if let Err(e) = self.capturer.open().await {
            tracing::warn!(error = %e, "Camera did not start, scan session stays idle");
            return Err(e);
        }
        self.state = SessionState::Active;
        self.last_report = None;
        Ok(())
    }

    /// Run one capture/decode step.
    ///
    /// Returns the detected attempt, or `None` for a miss, an idle session,
    /// the debounce window, or a suppressed repeat.
    pub async fn tick(&mut self, now: Instant) -> Option<ScanAttempt> {
        match self.state {
            SessionState::Idle => return None,
            SessionState::Detected { until } if now < until => return None,
            SessionState::Detected { .. } => self.state = SessionState::Active,
            SessionState::Active => {}
        }

        let frame = match self.capturer.capture().await {
            Ok(Some(frame)) => frame,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Frame capture failed, skipping tick");
                return None;
            }
        };

        let payload = decode_frame(&self.decoder, &frame, &self.config.decode)?;
        drop(frame);
        let code = normalize_code(&payload).ok()?;

        if let Some((last, at)) = &self.last_report {
            if *last == code && now.saturating_duration_since(*at) < self.config.repeat_suppression
            {
                tracing::debug!(code = %code, "Suppressing repeat detection");
                return None;
            }
        }
        self.last_report = Some((code.clone(), now));

        match self.config.mode {
            ScanMode::SingleShot => self.deactivate(),
            ScanMode::Continuous => {
                self.state = SessionState::Detected {
                    until: now + self.config.debounce,
                };
            }
        }

        tracing::info!(code = %code, "Ticket code detected");
        Some(ScanAttempt::new(code, ScanSource::Camera, now))
    }

    /// Accept a code typed by the operator.
    ///
    /// Works in every state, including when the camera never started, and
    /// is never deduplicated.
    pub fn submit_manual(&mut self, raw: &str, now: Instant) -> Result<ScanAttempt, CoreError> {
        let code = normalize_code(raw)?;
        tracing::info!(code = %code, "Manual ticket code entered");
        Ok(ScanAttempt::new(code, ScanSource::Manual, now))
    }

    /// Stop scanning and release the camera. Idempotent.
    pub fn deactivate(&mut self) {
        self.capturer.release();
        if self.state != SessionState::Idle {
            tracing::info!("Scan session deactivated");
        }
        self.state = SessionState::Idle;
    }
}
