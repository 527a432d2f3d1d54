//! Concrete [`FrameSource`]s.
//!
//! The scanner runs headless, so "the camera" is either an IP camera that
//! serves still snapshots over HTTP or a directory of captured stills.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use galaxy_core::capture::{CaptureError, FrameSource};
use image::DynamicImage;
use reqwest::StatusCode;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Camera that returns one encoded image per `GET`.
#[derive(Debug)]
pub struct SnapshotSource {
    client: reqwest::Client,
    url: reqwest::Url,
    open: bool,
}

impl SnapshotSource {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, CaptureError> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| CaptureError::Unavailable(format!("invalid snapshot URL {url}: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CaptureError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            url,
            open: false,
        })
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<u8>, CaptureError> {
        let response = self.client.get(self.url.clone()).send().await.map_err(|e| {
            if e.is_connect() {
                CaptureError::Unavailable(e.to_string())
            } else {
                CaptureError::Frame(e.to_string())
            }
        })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(CaptureError::PermissionDenied(format!(
                    "{} answered {}",
                    self.url,
                    response.status()
                )));
            }
            status if !status.is_success() => {
                return Err(CaptureError::Unavailable(format!(
                    "{} answered {status}",
                    self.url
                )));
            }
            _ => {}
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CaptureError::Frame(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl FrameSource for SnapshotSource {
    fn name(&self) -> &str {
        "snapshot"
    }

    /// Probe the endpoint once so permission and reachability problems
    /// surface before scanning starts.
    async fn open(&mut self) -> Result<(), CaptureError> {
        self.fetch().await?;
        self.open = true;
        Ok(())
    }

    async fn grab(&mut self) -> Result<Option<DynamicImage>, CaptureError> {
        if !self.open {
            return Ok(None);
        }
        let bytes = self.fetch().await?;
        decode_image(&bytes).map(Some)
    }

    fn release(&mut self) {
        self.open = false;
    }
}

/// Replays still images from a directory, in file-name order, looping.
#[derive(Debug)]
pub struct DirectorySource {
    dir: PathBuf,
    files: Vec<PathBuf>,
    next: usize,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
            next: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl FrameSource for DirectorySource {
    fn name(&self) -> &str {
        "directory"
    }

    async fn open(&mut self) -> Result<(), CaptureError> {
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(|e| {
            CaptureError::Unavailable(format!("cannot read {}: {e}", self.dir.display()))
        })?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CaptureError::Unavailable(e.to_string()))?
        {
            let path = entry.path();
            if is_image(&path) {
                files.push(path);
            }
        }
        if files.is_empty() {
            return Err(CaptureError::Unavailable(format!(
                "no images in {}",
                self.dir.display()
            )));
        }
        files.sort();

        tracing::debug!(dir = %self.dir.display(), count = files.len(), "Frame directory opened");
        self.files = files;
        self.next = 0;
        Ok(())
    }

    async fn grab(&mut self) -> Result<Option<DynamicImage>, CaptureError> {
        if self.files.is_empty() {
            return Ok(None);
        }
        let path = &self.files[self.next % self.files.len()];
        self.next = self.next.wrapping_add(1);

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CaptureError::Frame(format!("{}: {e}", path.display())))?;
        decode_image(&bytes).map(Some)
    }

    fn release(&mut self) {
        self.files.clear();
        self.next = 0;
    }
}

/// Source used when no camera is configured. Never opens.
pub struct NoCamera;

#[async_trait]
impl FrameSource for NoCamera {
    fn name(&self) -> &str {
        "none"
    }

    async fn open(&mut self) -> Result<(), CaptureError> {
        Err(CaptureError::Unavailable("no camera configured".into()))
    }

    async fn grab(&mut self) -> Result<Option<DynamicImage>, CaptureError> {
        Ok(None)
    }

    fn release(&mut self) {}
}

fn decode_image(bytes: &[u8]) -> Result<DynamicImage, CaptureError> {
    image::load_from_memory(bytes).map_err(|e| CaptureError::Frame(e.to_string()))
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use image::{Rgba, RgbaImage};

    fn write_png(dir: &Path, name: &str, level: u8) {
        RgbaImage::from_pixel(8, 8, Rgba([level, level, level, 255]))
            .save(dir.join(name))
            .unwrap();
    }

    #[tokio::test]
    async fn missing_directory_is_unavailable() {
        let mut source = DirectorySource::new("/nonexistent/frames");
        assert_matches!(source.open().await, Err(CaptureError::Unavailable(_)));
    }

    #[tokio::test]
    async fn directory_without_images_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "nothing here").unwrap();
        let mut source = DirectorySource::new(dir.path());
        assert_matches!(source.open().await, Err(CaptureError::Unavailable(_)));
    }

    #[tokio::test]
    async fn directory_frames_cycle_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "b.png", 20);
        write_png(dir.path(), "a.png", 10);

        let mut source = DirectorySource::new(dir.path());
        source.open().await.unwrap();

        let mut levels = Vec::new();
        for _ in 0..3 {
            let img = source.grab().await.unwrap().unwrap();
            levels.push(img.to_rgba8().get_pixel(0, 0)[0]);
        }
        assert_eq!(levels, [10, 20, 10]);

        source.release();
        assert!(source.grab().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_image_is_a_frame_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();
        let mut source = DirectorySource::new(dir.path());
        source.open().await.unwrap();
        assert_matches!(source.grab().await, Err(CaptureError::Frame(_)));
    }

    #[tokio::test]
    async fn unreachable_snapshot_camera_is_unavailable() {
        let mut source =
            SnapshotSource::new("http://127.0.0.1:1/snapshot.jpg", Duration::from_millis(500)).unwrap();
        assert_matches!(
            source.open().await,
            Err(CaptureError::Unavailable(_)) | Err(CaptureError::Frame(_))
        );
    }

    #[test]
    fn invalid_snapshot_url_is_rejected() {
        assert_matches!(
            SnapshotSource::new("not a url", Duration::from_secs(1)),
            Err(CaptureError::Unavailable(_))
        );
    }

    #[tokio::test]
    async fn no_camera_never_opens() {
        assert_matches!(NoCamera.open().await, Err(CaptureError::Unavailable(_)));
    }
}
