//! Camera frame capture.
//!
//! A [`FrameSource`] is the device (or stand-in) that hands out images.
//! [`FrameCapturer`] owns one, tracks whether its stream is open, and
//! turns each grabbed image into a bounded [`Frame`].

use async_trait::async_trait;
use image::DynamicImage;

use crate::frame::{frame_from_image, CaptureConfig, Frame};

/// Errors raised by a frame source.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// No camera, or the device could not be reached.
    #[error("Camera unavailable: {0}")]
    Unavailable(String),

    /// The device refused access.
    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),

    /// A single frame could not be read or decoded.
    #[error("Frame error: {0}")]
    Frame(String),
}

/// A camera stream.
#[async_trait]
pub trait FrameSource: Send {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Acquire the device. Must be called before [`grab`](Self::grab).
    async fn open(&mut self) -> Result<(), CaptureError>;

    /// Read the current image. `Ok(None)` means no frame is ready yet.
    async fn grab(&mut self) -> Result<Option<DynamicImage>, CaptureError>;

    /// Give the device back. Safe to call more than once.
    fn release(&mut self);
}

#[async_trait]
impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn open(&mut self) -> Result<(), CaptureError> {
        (**self).open().await
    }

    async fn grab(&mut self) -> Result<Option<DynamicImage>, CaptureError> {
        (**self).grab().await
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Owns a [`FrameSource`] and produces downscaled frames from it.
///
/// The source is released when the capturer is released or dropped.
pub struct FrameCapturer<S: FrameSource> {
    source: S,
    config: CaptureConfig,
    open: bool,
}

impl<S: FrameSource> FrameCapturer<S> {
    pub fn new(source: S, config: CaptureConfig) -> Self {
        Self {
            source,
            config,
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Open the underlying stream. A no-op if already open.
    pub async fn open(&mut self) -> Result<(), CaptureError> {
        if self.open {
            return Ok(());
        }
        self.source.open().await?;
        self.open = true;
        tracing::info!(source = self.source.name(), "Camera stream opened");
        Ok(())
    }

    /// Grab one frame, downscaled and mirrored per the capture config.
    pub async fn capture(&mut self) -> Result<Option<Frame>, CaptureError> {
        if !self.open {
            return Err(CaptureError::Unavailable(
                "capture stream is not open".into(),
            ));
        }
        let image = self.source.grab().await?;
        Ok(image.map(|img| frame_from_image(img, &self.config)))
    }

    /// Release the underlying stream. Idempotent.
    pub fn release(&mut self) {
        if self.open {
            self.source.release();
            self.open = false;
            tracing::info!(source = self.source.name(), "Camera stream released");
        }
    }
}

impl<S: FrameSource> Drop for FrameCapturer<S> {
    fn drop(&mut self) {
        self.release();
    }
}
