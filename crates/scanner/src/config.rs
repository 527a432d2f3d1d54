use std::path::PathBuf;
use std::time::Duration;

use galaxy_checkin::api::DEFAULT_REQUEST_TIMEOUT;
use galaxy_core::context::Session;
use galaxy_core::decode::DecodePolicy;
use galaxy_core::frame::{CaptureConfig, DEFAULT_MAX_DIMENSION};
use galaxy_core::roles::ROLE_STAFF;
use galaxy_core::scheduler::DEFAULT_SCAN_INTERVAL;
use galaxy_core::session::{ScanMode, SessionConfig, DEFAULT_DEBOUNCE, DEFAULT_REPEAT_SUPPRESSION};

/// Where frames come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraSetting {
    /// HTTP endpoint returning one JPEG/PNG snapshot per request.
    Snapshot(String),
    /// Directory of still images, replayed in name order.
    Directory(PathBuf),
    /// No camera configured; manual entry only.
    None,
}

/// Scanner configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub operator_role: String,
    pub camera: CameraSetting,
    pub scan_interval: Duration,
    pub debounce: Duration,
    pub max_dimension: u32,
    pub mirror: bool,
    pub continuous: bool,
    pub request_timeout: Duration,
}

impl ScannerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                        |
    /// |------------------------|--------------------------------|
    /// | `CHECKIN_API_URL`      | `http://localhost:3000/api/v1` |
    /// | `CHECKIN_API_TOKEN`    | unset                          |
    /// | `OPERATOR_ROLE`        | `staff`                        |
    /// | `CAMERA_SNAPSHOT_URL`  | unset                          |
    /// | `CAMERA_FRAME_DIR`     | unset                          |
    /// | `SCAN_INTERVAL_MS`     | `150`                          |
    /// | `SCAN_DEBOUNCE_MS`     | `300`                          |
    /// | `SCAN_MAX_DIMENSION`   | `800`                          |
    /// | `SCAN_MIRROR`          | `false`                        |
    /// | `SCAN_CONTINUOUS`      | `true`                         |
    /// | `REQUEST_TIMEOUT_SECS` | `10`                           |
    ///
    /// `CAMERA_SNAPSHOT_URL` wins over `CAMERA_FRAME_DIR` when both are set.
    /// Unparseable numbers fall back to their defaults. So does zero,
    /// except for the debounce.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let millis = |key: &str| {
            var(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
        };
        let flag = |key: &str, default: bool| var(key).and_then(|v| parse_bool(&v)).unwrap_or(default);

        let camera = match (var("CAMERA_SNAPSHOT_URL"), var("CAMERA_FRAME_DIR")) {
            (Some(url), _) => CameraSetting::Snapshot(url),
            (None, Some(dir)) => CameraSetting::Directory(PathBuf::from(dir)),
            (None, None) => CameraSetting::None,
        };

        Self {
            api_url: var("CHECKIN_API_URL").unwrap_or_else(|| "http://localhost:3000/api/v1".into()),
            api_token: var("CHECKIN_API_TOKEN"),
            operator_role: var("OPERATOR_ROLE").unwrap_or_else(|| ROLE_STAFF.into()),
            camera,
            scan_interval: millis("SCAN_INTERVAL_MS")
                .filter(|d| !d.is_zero())
                .unwrap_or(DEFAULT_SCAN_INTERVAL),
            debounce: millis("SCAN_DEBOUNCE_MS").unwrap_or(DEFAULT_DEBOUNCE),
            max_dimension: var("SCAN_MAX_DIMENSION")
                .and_then(|v| v.trim().parse().ok())
                .filter(|d| *d > 0)
                .unwrap_or(DEFAULT_MAX_DIMENSION),
            mirror: flag("SCAN_MIRROR", false),
            continuous: flag("SCAN_CONTINUOUS", true),
            request_timeout: var("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_secs)
                .filter(|d| !d.is_zero())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        }
    }

    pub fn session(&self) -> Session {
        Session::new(self.api_token.clone(), self.operator_role.clone())
    }

    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            max_dimension: self.max_dimension,
            mirror: self.mirror,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            debounce: self.debounce,
            repeat_suppression: DEFAULT_REPEAT_SUPPRESSION,
            mode: if self.continuous {
                ScanMode::Continuous
            } else {
                ScanMode::SingleShot
            },
            decode: DecodePolicy::default(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
