//! `galaxy-scanner` -- operator console for ticket check-in.
//!
//! Captures frames from an HTTP snapshot camera or a directory of stills,
//! decodes QR codes, and checks tickets in against the check-in service.
//! Ticket codes typed on stdin are checked in the same way, so the
//! scanner stays usable without a camera. See
//! [`ScannerConfig::from_env`](galaxy_scanner::config::ScannerConfig::from_env)
//! for the environment variables.

use anyhow::Context;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use galaxy_checkin::api::CheckInApi;
use galaxy_checkin::flow::CheckInFlow;
use galaxy_core::capture::{FrameCapturer, FrameSource};
use galaxy_core::scheduler::IntervalTicker;
use galaxy_core::session::ScanSession;
use galaxy_scanner::config::{CameraSetting, ScannerConfig};
use galaxy_scanner::console::{spawn_stdin_reader, ConsolePresenter};
use galaxy_scanner::decoder::RqrrDecoder;
use galaxy_scanner::runner::ScanRunner;
use galaxy_scanner::sources::{DirectorySource, NoCamera, SnapshotSource};

/// Buffered operator lines not yet handled by the runner.
const INPUT_BUFFER: usize = 16;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays the operator console.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "galaxy_scanner=info,galaxy_checkin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ScannerConfig::from_env();
    tracing::info!(
        api_url = %config.api_url,
        role = %config.operator_role,
        camera = ?config.camera,
        interval_ms = config.scan_interval.as_millis() as u64,
        continuous = config.continuous,
        "Starting galaxy-scanner",
    );

    let api = CheckInApi::new(&config.api_url, config.request_timeout, config.session())
        .context("Failed to build check-in client")?;
    let flow = CheckInFlow::new(api);

    let source: Box<dyn FrameSource> = match &config.camera {
        CameraSetting::Snapshot(url) => Box::new(
            SnapshotSource::new(url, config.request_timeout)
                .context("Failed to configure snapshot camera")?,
        ),
        CameraSetting::Directory(dir) => Box::new(DirectorySource::new(dir)),
        CameraSetting::None => Box::new(NoCamera),
    };
    let camera_name = source.name().to_string();
    let capturer = FrameCapturer::new(source, config.capture_config());
    let scan_session = ScanSession::new(capturer, RqrrDecoder::new(), config.session_config());

    let mut presenter = ConsolePresenter::new(std::io::stdout(), !config.continuous);
    presenter.greet(&camera_name);

    let (tx, mut rx) = mpsc::channel(INPUT_BUFFER);
    spawn_stdin_reader(tx).context("Failed to start operator input reader")?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl-C handler");
                return;
            }
            tracing::info!("Received SIGINT (Ctrl-C), stopping scanner");
            cancel.cancel();
        }
    });

    let mut ticker = IntervalTicker::new(config.scan_interval);
    let mut runner = ScanRunner::new(scan_session, flow, presenter);
    let summary = runner.run(&mut ticker, &mut rx, &cancel).await;

    println!(
        "Checked in {} | already used {} | rejected {}",
        summary.accepted, summary.already_checked_in, summary.invalid
    );
    Ok(())
}
