//! Check-in flow against a live service on a local port.

mod common;

use std::time::{Duration, Instant};

use assert_matches::assert_matches;
use common::{spawn_service, spawn_slow_service, TEST_TOKEN};
use galaxy_checkin::api::{CheckInApi, CheckInApiError, DEFAULT_REQUEST_TIMEOUT};
use galaxy_checkin::classify::MSG_TIMEOUT;
use galaxy_checkin::flow::CheckInFlow;
use galaxy_core::context::Session;
use galaxy_core::roles::ROLE_STAFF;
use galaxy_core::scan::{ScanAttempt, ScanResult, ScanSource, ScanStatus};

fn attempt(code: &str) -> ScanAttempt {
    ScanAttempt::new(code, ScanSource::Camera, Instant::now())
}

fn flow(base_url: &str, session: Session) -> CheckInFlow<CheckInApi> {
    let api = CheckInApi::new(base_url, DEFAULT_REQUEST_TIMEOUT, session).unwrap();
    CheckInFlow::new(api)
}

#[tokio::test]
async fn valid_ticket_accepted_then_reported_used() {
    let base = spawn_service(None).await;
    let flow = flow(&base, Session::anonymous(ROLE_STAFF));

    let first = flow.submit(&attempt("TICKET-A1")).await;
    assert_matches!(first, ScanResult::Accepted { ref ticket } => {
        assert_eq!(ticket.code, "TICKET-A1");
        assert_eq!(ticket.seat_label, "A1");
        assert!(ticket.checked_in);
    });

    let second = flow.submit(&attempt("TICKET-A1")).await;
    assert_eq!(second.status(), ScanStatus::AlreadyCheckedIn);
    assert_matches!(second, ScanResult::AlreadyCheckedIn { ref message, .. } => {
        assert!(message.contains("already checked in"));
    });
}

#[tokio::test]
async fn unknown_ticket_carries_server_message() {
    let base = spawn_service(None).await;
    let flow = flow(&base, Session::anonymous(ROLE_STAFF));

    let result = flow.submit(&attempt("DOES-NOT-EXIST")).await;
    assert_eq!(
        result,
        ScanResult::Invalid {
            code: "DOES-NOT-EXIST".into(),
            message: "Ticket DOES-NOT-EXIST not found".into(),
        }
    );
}

#[tokio::test]
async fn camera_and_manual_entry_classify_identically() {
    let base = spawn_service(None).await;
    let flow = flow(&base, Session::anonymous(ROLE_STAFF));

    let manual = ScanAttempt::new("TICKET-B2", ScanSource::Manual, Instant::now());
    assert!(flow.submit(&manual).await.is_accepted());
    let camera = flow.submit(&attempt("TICKET-B2")).await;
    let manual_again = flow.submit(&manual).await;
    assert_eq!(camera, manual_again);
}

#[tokio::test]
async fn bearer_token_is_sent_when_present() {
    let base = spawn_service(Some(TEST_TOKEN)).await;

    let authorized = flow(&base, Session::new(Some(TEST_TOKEN.into()), ROLE_STAFF));
    assert!(authorized.submit(&attempt("TICKET-C3")).await.is_accepted());

    let anonymous = flow(&base, Session::anonymous(ROLE_STAFF));
    let result = anonymous.submit(&attempt("TICKET-A1")).await;
    assert_matches!(result, ScanResult::Invalid { ref message, .. } => {
        assert_eq!(message, "Missing Authorization header");
    });
}

#[tokio::test]
async fn scan_list_is_split_after_check_ins() {
    let base = spawn_service(None).await;
    let flow = flow(&base, Session::anonymous(ROLE_STAFF));
    flow.submit(&attempt("TICKET-B2")).await;

    let split = flow.scan_list().await.unwrap();
    let pending: Vec<_> = split.pending.iter().map(|t| t.code.as_str()).collect();
    let scanned: Vec<_> = split.scanned.iter().map(|t| t.code.as_str()).collect();
    assert_eq!(pending, ["TICKET-A1", "TICKET-C3"]);
    assert_eq!(scanned, ["TICKET-B2"]);
}

#[tokio::test]
async fn slow_backend_times_out_as_invalid() {
    let base = spawn_slow_service(Duration::from_secs(5)).await;
    let session = Session::anonymous(ROLE_STAFF);
    let api = CheckInApi::new(&base, Duration::from_millis(100), session).unwrap();

    assert_matches!(api.scan("TICKET-A1").await, Err(CheckInApiError::Timeout));

    let flow = CheckInFlow::new(api);
    let result = flow.submit(&attempt("TICKET-A1")).await;
    assert_eq!(
        result,
        ScanResult::Invalid {
            code: "TICKET-A1".into(),
            message: MSG_TIMEOUT.into(),
        }
    );
}

#[tokio::test]
async fn unreachable_backend_is_a_request_error() {
    let api = CheckInApi::new(
        "http://127.0.0.1:1/api/v1",
        Duration::from_millis(500),
        Session::anonymous(ROLE_STAFF),
    )
    .unwrap();
    assert_matches!(
        api.scan("TICKET-A1").await,
        Err(CheckInApiError::Request(_)) | Err(CheckInApiError::Timeout)
    );
}
