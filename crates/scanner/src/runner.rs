//! The scan loop.
//!
//! One task drives everything: capture ticks, operator input and
//! cancellation are multiplexed with `tokio::select!`, and each event is
//! handled to completion before the next one is awaited. Ticks therefore
//! never overlap, and the camera is only ever touched from this task.

use std::time::Instant;

use galaxy_checkin::flow::{CheckInFlow, TicketBackend};
use galaxy_core::capture::FrameSource;
use galaxy_core::decode::Decoder;
use galaxy_core::presenter::{NextAction, ResultPresenter};
use galaxy_core::scan::{ScanAttempt, ScanResult, ScanStatus};
use galaxy_core::scheduler::Ticker;
use galaxy_core::session::ScanSession;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::console::OperatorInput;

/// Outcome counts for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub accepted: usize,
    pub already_checked_in: usize,
    pub invalid: usize,
}

impl RunSummary {
    fn record(&mut self, status: ScanStatus) {
        match status {
            ScanStatus::Accepted => self.accepted += 1,
            ScanStatus::AlreadyCheckedIn => self.already_checked_in += 1,
            ScanStatus::Invalid => self.invalid += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.accepted + self.already_checked_in + self.invalid
    }
}

pub struct ScanRunner<S, D, B, P>
where
    S: FrameSource,
    D: Decoder,
    B: TicketBackend,
    P: ResultPresenter,
{
    session: ScanSession<S, D>,
    flow: CheckInFlow<B>,
    presenter: P,
    summary: RunSummary,
}

impl<S, D, B, P> ScanRunner<S, D, B, P>
where
    S: FrameSource,
    D: Decoder,
    B: TicketBackend,
    P: ResultPresenter,
{
    pub fn new(session: ScanSession<S, D>, flow: CheckInFlow<B>, presenter: P) -> Self {
        Self {
            session,
            flow,
            presenter,
            summary: RunSummary::default(),
        }
    }

    pub fn session(&self) -> &ScanSession<S, D> {
        &self.session
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Run until cancelled, closed by the operator, or out of inputs.
    ///
    /// The loop stops when `cancel` fires, the operator sends
    /// [`NextAction::Close`], the ticker closes while the camera is running,
    /// or the input channel closes while no camera is running. A capture or
    /// request in flight when `cancel` fires is dropped, the camera is
    /// always released before this returns, and nothing is presented once
    /// `cancel` has fired.
    pub async fn run<T: Ticker>(
        &mut self,
        ticker: &mut T,
        input: &mut mpsc::Receiver<OperatorInput>,
        cancel: &CancellationToken,
    ) -> RunSummary {
        if !cancel.is_cancelled() {
            self.start_camera().await;
        }
        let mut input_open = true;

        loop {
            if !input_open && !self.session.is_active() {
                tracing::info!("No camera running and operator input closed");
                break;
            }

            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    tracing::info!("Scan runner cancelled");
                    break;
                }

                tick = ticker.tick(), if self.session.is_active() => {
                    let Some(now) = tick else {
                        tracing::info!("Capture ticker closed");
                        break;
                    };
                    if let Some(attempt) = self.tick(now, cancel).await {
                        self.submit(&attempt, cancel).await;
                    }
                }

                line = input.recv(), if input_open => match line {
                    Some(OperatorInput::Code(raw)) => self.submit_manual(&raw, cancel).await,
                    Some(OperatorInput::ScanList) => self.show_scan_list(cancel).await,
                    Some(OperatorInput::Action(NextAction::ScanAnother)) => self.start_camera().await,
                    Some(OperatorInput::Action(NextAction::Close)) => {
                        tracing::info!("Operator closed the scanner");
                        break;
                    }
                    None => input_open = false,
                },
            }
        }

        self.session.deactivate();
        tracing::info!(
            accepted = self.summary.accepted,
            already_checked_in = self.summary.already_checked_in,
            invalid = self.summary.invalid,
            "Scan run finished",
        );
        self.summary
    }

    async fn start_camera(&mut self) {
        if self.session.is_active() {
            return;
        }
        if let Err(e) = self.session.start().await {
            self.presenter.camera_unavailable(&e.to_string());
        }
    }

    /// One capture step, abandoned as soon as `cancel` fires.
    async fn tick(&mut self, now: Instant, cancel: &CancellationToken) -> Option<ScanAttempt> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            attempt = self.session.tick(now) => attempt,
        }
    }

    async fn show_scan_list(&mut self, cancel: &CancellationToken) {
        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => return,
            outcome = self.flow.scan_list() => outcome,
        };
        match outcome {
            Ok(list) => self.presenter.scan_list(&list),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch scan list");
                self.presenter.scan_list_failed(&e.to_string());
            }
        }
    }

    async fn submit_manual(&mut self, raw: &str, cancel: &CancellationToken) {
        match self.session.submit_manual(raw, Instant::now()) {
            Ok(attempt) => self.submit(&attempt, cancel).await,
            Err(e) => {
                let result = ScanResult::Invalid {
                    code: raw.trim().to_string(),
                    message: e.to_string(),
                };
                self.present(&result, cancel);
            }
        }
    }

    async fn submit(&mut self, attempt: &ScanAttempt, cancel: &CancellationToken) {
        if cancel.is_cancelled() {
            return;
        }
        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(code = %attempt.code, "Check-in abandoned after cancellation");
                return;
            }
            result = self.flow.submit(attempt) => result,
        };
        self.present(&result, cancel);
    }

    fn present(&mut self, result: &ScanResult, cancel: &CancellationToken) {
        if cancel.is_cancelled() {
            tracing::debug!(code = result.code(), "Dropping result after cancellation");
            return;
        }
        self.summary.record(result.status());
        self.presenter.present(result);
    }
}
