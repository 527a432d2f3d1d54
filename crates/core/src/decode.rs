//! Pluggable QR decoding.
//!
//! [`Decoder`] is the narrow seam around whatever library actually reads
//! codes. [`decode_frame`] layers the retry policy on top: it tries each
//! enabled [`FrameVariant`] in turn, and a decoder that fails or panics
//! on a frame counts as "no code found".

use std::panic::{self, AssertUnwindSafe};

use crate::frame::Frame;

/// Extracts an encoded payload from a frame.
pub trait Decoder: Send + Sync {
    /// Return the decoded payload, or `None` when no code is readable.
    fn decode(&self, frame: &Frame) -> Option<String>;
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    fn decode(&self, frame: &Frame) -> Option<String> {
        (**self).decode(frame)
    }
}

/// A transformation of the captured frame handed to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameVariant {
    Original,
    Inverted,
    Mirrored,
    MirroredInverted,
}

impl FrameVariant {
    fn apply(&self, frame: &Frame) -> Option<Frame> {
        match self {
            FrameVariant::Original => None,
            FrameVariant::Inverted => Some(frame.inverted()),
            FrameVariant::Mirrored => Some(frame.mirrored()),
            FrameVariant::MirroredInverted => Some(frame.mirrored().inverted()),
        }
    }
}

/// Which variants to attempt per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodePolicy {
    pub try_inverted: bool,
    pub try_mirrored: bool,
}

impl Default for DecodePolicy {
    fn default() -> Self {
        Self {
            try_inverted: true,
            try_mirrored: true,
        }
    }
}

impl DecodePolicy {
    /// Only the frame as captured.
    pub fn original_only() -> Self {
        Self {
            try_inverted: false,
            try_mirrored: false,
        }
    }

    /// Variants in the order they are attempted.
    pub fn variants(&self) -> Vec<FrameVariant> {
        let mut variants = vec![FrameVariant::Original];
        if self.try_inverted {
            variants.push(FrameVariant::Inverted);
        }
        if self.try_mirrored {
            variants.push(FrameVariant::Mirrored);
            if self.try_inverted {
                variants.push(FrameVariant::MirroredInverted);
            }
        }
        variants
    }
}

/// Decode `frame` with `decoder`, trying every variant `policy` allows.
///
/// The first non-empty payload wins. Panics raised by the decoder are
/// caught and treated as a miss so the capture loop keeps running.
pub fn decode_frame<D: Decoder + ?Sized>(
    decoder: &D,
    frame: &Frame,
    policy: &DecodePolicy,
) -> Option<String> {
    for variant in policy.variants() {
        let transformed = variant.apply(frame);
        let target = transformed.as_ref().unwrap_or(frame);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| decoder.decode(target)));
        match outcome {
            Ok(Some(payload)) if !payload.trim().is_empty() => {
                tracing::debug!(?variant, "Decoded code from frame");
                return Some(payload);
            }
            Ok(_) => {}
            Err(_) => {
                tracing::warn!(?variant, "Decoder panicked, treating frame as a miss");
            }
        }
    }
    None
}
