//! Check-in flow shared by camera detections and manual entry.
//!
//! [`CheckInFlow::submit`] is the single downstream path for every
//! [`ScanAttempt`], whatever its source, so the same code always gets
//! the same classification.

use std::time::Instant;

use async_trait::async_trait;
use galaxy_core::context::Session;
use galaxy_core::error::CoreError;
use galaxy_core::scan::{ScanAttempt, ScanResult};
use galaxy_core::scan_list::{partition, ScanListPartition};
use galaxy_core::ticket::{normalize_code, Ticket};

use crate::api::{CheckInApi, CheckInApiError};
use crate::classify::classify;

/// Backend operations the check-in flow depends on.
#[async_trait]
pub trait TicketBackend: Send + Sync {
    /// Operator the backend authenticates as.
    fn session(&self) -> &Session;

    async fn check_in(&self, code: &str) -> Result<Ticket, CheckInApiError>;

    async fn scan_list(&self) -> Result<Vec<Ticket>, CheckInApiError>;
}

#[async_trait]
impl TicketBackend for CheckInApi {
    fn session(&self) -> &Session {
        CheckInApi::session(self)
    }

    async fn check_in(&self, code: &str) -> Result<Ticket, CheckInApiError> {
        self.scan(code).await
    }

    async fn scan_list(&self) -> Result<Vec<Ticket>, CheckInApiError> {
        CheckInApi::scan_list(self).await
    }
}

/// Joins scan attempts to a [`TicketBackend`] on behalf of one operator.
pub struct CheckInFlow<B: TicketBackend> {
    backend: B,
}

impl<B: TicketBackend> CheckInFlow<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session(&self) -> &Session {
        self.backend.session()
    }

    /// Submit one attempt and classify the outcome.
    ///
    /// Operators without a check-in role and blank codes are rejected
    /// locally without a request.
    pub async fn submit(&self, attempt: &ScanAttempt) -> ScanResult {
        if let Err(e) = self.authorize() {
            tracing::warn!(role = %self.session().role, "Check-in refused for operator role");
            return invalid(&attempt.code, &e);
        }

        let code = match normalize_code(&attempt.code) {
            Ok(code) => code,
            Err(e) => return invalid(&attempt.code, &e),
        };

        let start = Instant::now();
        let outcome = self.backend.check_in(&code).await;
        let result = classify(&code, outcome);

        tracing::info!(
            code = %code,
            source = attempt.source.as_str(),
            status = result.status().as_str(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Check-in submitted",
        );
        result
    }

    /// Fetch and partition the scan list into pending and scanned.
    pub async fn scan_list(&self) -> Result<ScanListPartition, CheckInApiError> {
        let tickets = self.backend.scan_list().await?;
        tracing::debug!(count = tickets.len(), "Fetched scan list");
        Ok(partition(tickets))
    }

    fn authorize(&self) -> Result<(), CoreError> {
        if self.session().can_check_in() {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Role '{}' may not check tickets in",
                self.session().role
            )))
        }
    }
}

/// Build an `Invalid` result from a local error, using its bare message.
fn invalid(code: &str, err: &CoreError) -> ScanResult {
    let message = match err {
        CoreError::Validation(msg) | CoreError::Forbidden(msg) => msg.clone(),
        other => other.to_string(),
    };
    ScanResult::Invalid {
        code: code.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use galaxy_core::roles::{ROLE_MANAGER, ROLE_STAFF};
    use galaxy_core::scan::{ScanSource, ScanStatus};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Backend with the same exactly-once semantics as the real service.
    struct MemoryBackend {
        session: Session,
        tickets: Mutex<HashMap<String, Ticket>>,
        calls: AtomicUsize,
    }

    impl MemoryBackend {
        fn with(codes: &[&str]) -> Self {
            Self::as_role(ROLE_STAFF, codes)
        }

        fn as_role(role: &str, codes: &[&str]) -> Self {
            let tickets = codes
                .iter()
                .enumerate()
                .map(|(i, code)| (code.to_string(), Ticket::new(*code, i as i64, "A1", 1, 10)))
                .collect();
            Self {
                session: Session::anonymous(role),
                tickets: Mutex::new(tickets),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TicketBackend for MemoryBackend {
        fn session(&self) -> &Session {
            &self.session
        }

        async fn check_in(&self, code: &str) -> Result<Ticket, CheckInApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut map = self.tickets.lock().unwrap();
            match map.get_mut(code) {
                None => Err(CheckInApiError::ApiError {
                    status: 404,
                    message: Some("Ticket not found".into()),
                }),
                Some(t) if t.checked_in => Err(CheckInApiError::ApiError {
                    status: 409,
                    message: None,
                }),
                Some(t) => {
                    t.checked_in = true;
                    Ok(t.clone())
                }
            }
        }

        async fn scan_list(&self) -> Result<Vec<Ticket>, CheckInApiError> {
            let mut tickets: Vec<_> = self.tickets.lock().unwrap().values().cloned().collect();
            tickets.sort_by(|a, b| a.code.cmp(&b.code));
            Ok(tickets)
        }
    }

    fn attempt(code: &str, source: ScanSource) -> ScanAttempt {
        ScanAttempt::new(code, source, Instant::now())
    }

    fn flow(codes: &[&str]) -> CheckInFlow<MemoryBackend> {
        CheckInFlow::new(MemoryBackend::with(codes))
    }

    #[tokio::test]
    async fn first_submit_accepts_second_reports_used() {
        let flow = flow(&["TICKET-A1"]);

        let first = flow.submit(&attempt("TICKET-A1", ScanSource::Camera)).await;
        assert_matches!(first, ScanResult::Accepted { ref ticket } if ticket.code == "TICKET-A1");

        let second = flow.submit(&attempt("TICKET-A1", ScanSource::Camera)).await;
        assert_eq!(second.status(), ScanStatus::AlreadyCheckedIn);
    }

    #[tokio::test]
    async fn unknown_code_is_invalid() {
        let flow = flow(&[]);
        let result = flow.submit(&attempt("DOES-NOT-EXIST", ScanSource::Manual)).await;
        assert_eq!(
            result,
            ScanResult::Invalid {
                code: "DOES-NOT-EXIST".into(),
                message: "Ticket not found".into(),
            }
        );
    }

    #[tokio::test]
    async fn manual_and_camera_paths_classify_identically() {
        let camera = flow(&["TICKET-B2"]);
        let manual = flow(&["TICKET-B2"]);
        for _ in 0..2 {
            let a = camera.submit(&attempt("TICKET-B2", ScanSource::Camera)).await;
            let b = manual.submit(&attempt("TICKET-B2", ScanSource::Manual)).await;
            assert_eq!(a, b);
        }
    }

    #[tokio::test]
    async fn blank_code_never_reaches_backend() {
        let flow = flow(&[]);
        let result = flow.submit(&attempt("  ", ScanSource::Manual)).await;
        assert_eq!(result.status(), ScanStatus::Invalid);
        assert_eq!(flow.backend().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn customer_role_is_refused_locally() {
        let flow = CheckInFlow::new(MemoryBackend::as_role("customer", &["TICKET-A1"]));
        assert_eq!(flow.session().role, "customer");
        let result = flow.submit(&attempt("TICKET-A1", ScanSource::Manual)).await;
        assert_matches!(result, ScanResult::Invalid { ref message, .. } if message.contains("customer"));
        assert_eq!(flow.backend().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn scan_list_is_partitioned() {
        let flow = CheckInFlow::new(MemoryBackend::as_role(ROLE_MANAGER, &["A", "B", "C"]));
        flow.submit(&attempt("B", ScanSource::Manual)).await;

        let split = flow.scan_list().await.unwrap();
        assert_eq!(split.pending.len(), 2);
        assert_eq!(split.scanned.len(), 1);
        assert_eq!(split.scanned[0].code, "B");
    }
}
