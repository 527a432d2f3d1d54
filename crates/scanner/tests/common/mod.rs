use std::sync::Arc;

use galaxy_api::config::ServerConfig;
use galaxy_api::router::build_app_router;
use galaxy_api::state::AppState;
use galaxy_api::store::TicketStore;
use galaxy_checkin::api::{CheckInApi, DEFAULT_REQUEST_TIMEOUT};
use galaxy_checkin::flow::CheckInFlow;
use galaxy_core::context::Session;
use galaxy_core::decode::Decoder;
use galaxy_core::frame::Frame;
use galaxy_core::presenter::ResultPresenter;
use galaxy_core::roles::ROLE_STAFF;
use galaxy_core::scan::ScanResult;
use galaxy_core::scan_list::ScanListPartition;
use galaxy_core::ticket::Ticket;
use tokio::net::TcpListener;

/// Start the check-in service on an ephemeral port and return a flow
/// pointed at it.
pub async fn spawn_flow() -> CheckInFlow<CheckInApi> {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: Vec::new(),
        request_timeout_secs: 30,
        api_token: None,
        tickets_file: None,
    };
    let store = TicketStore::with_tickets([
        Ticket::new("TICKET-A1", 101, "A1", 7, 90_000),
        Ticket::new("TICKET-B2", 102, "B2", 7, 90_000),
    ]);
    let state = AppState {
        config: Arc::new(config.clone()),
        store: Arc::new(store),
    };
    let router = build_app_router(state, &config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let api = CheckInApi::new(
        &format!("http://{addr}/api/v1"),
        DEFAULT_REQUEST_TIMEOUT,
        Session::anonymous(ROLE_STAFF),
    )
    .unwrap();
    CheckInFlow::new(api)
}

/// Stand-in for a QR decoder: reads the grey level of the first pixel.
/// Level 10 is `TICKET-A1`, level 20 is `TICKET-B2`, anything else is a miss.
pub struct LevelDecoder;

impl Decoder for LevelDecoder {
    fn decode(&self, frame: &Frame) -> Option<String> {
        match frame.rgba().first()? {
            10 => Some("TICKET-A1".into()),
            20 => Some("TICKET-B2".into()),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct Recorder {
    pub results: Vec<ScanResult>,
    pub camera_errors: Vec<String>,
    pub lists: Vec<ScanListPartition>,
    pub list_errors: Vec<String>,
}

impl ResultPresenter for Recorder {
    fn present(&mut self, result: &ScanResult) {
        self.results.push(result.clone());
    }

    fn camera_unavailable(&mut self, reason: &str) {
        self.camera_errors.push(reason.to_string());
    }

    fn scan_list(&mut self, list: &ScanListPartition) {
        self.lists.push(list.clone());
    }

    fn scan_list_failed(&mut self, reason: &str) {
        self.list_errors.push(reason.to_string());
    }
}
