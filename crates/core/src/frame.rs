//! Captured video frames.
//!
//! A [`Frame`] is a tightly packed RGBA buffer. Frames are produced fresh
//! on every capture tick and dropped once decoded; nothing here retains
//! them.

use image::imageops::FilterType;
use image::DynamicImage;

/// Default cap on the longest side of a captured frame, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 800;

const BYTES_PER_PIXEL: usize = 4;

/// Capture-time settings applied to every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Longest side after downscaling. Frames are never upscaled.
    pub max_dimension: u32,
    /// Flip frames horizontally, for cameras that deliver mirrored video.
    pub mirror: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            mirror: false,
        }
    }
}

/// RGBA pixel buffer of `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Frame {
    /// Wrap a raw RGBA buffer. Returns `None` if the length does not match
    /// the dimensions.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(BYTES_PER_PIXEL)?;
        (rgba.len() == expected).then_some(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Horizontally flipped copy.
    pub fn mirrored(&self) -> Frame {
        let row_len = self.width as usize * BYTES_PER_PIXEL;
        let mut out = Vec::with_capacity(self.rgba.len());
        for row in self.rgba.chunks_exact(row_len.max(1)) {
            for px in row.chunks_exact(BYTES_PER_PIXEL).rev() {
                out.extend_from_slice(px);
            }
        }
        Frame {
            width: self.width,
            height: self.height,
            rgba: out,
        }
    }

    /// Copy with colour channels inverted (light-on-dark codes). Alpha is kept.
    pub fn inverted(&self) -> Frame {
        let mut rgba = self.rgba.clone();
        for px in rgba.chunks_exact_mut(BYTES_PER_PIXEL) {
            px[0] = 255 - px[0];
            px[1] = 255 - px[1];
            px[2] = 255 - px[2];
        }
        Frame {
            width: self.width,
            height: self.height,
            rgba,
        }
    }

    /// 8-bit greyscale, row-major, using integer BT.601 weights.
    pub fn luma(&self) -> Vec<u8> {
        self.rgba
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|px| {
                let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
                ((299 * r + 587 * g + 114 * b) / 1000) as u8
            })
            .collect()
    }
}

/// Convert a captured image into a bounded [`Frame`].
///
/// Downscales so the longest side is at most `config.max_dimension`,
/// keeping the aspect ratio, then applies the mirror flag.
pub fn frame_from_image(image: DynamicImage, config: &CaptureConfig) -> Frame {
    let longest = image.width().max(image.height());
    let image = if config.max_dimension > 0 && longest > config.max_dimension {
        image.resize(config.max_dimension, config.max_dimension, FilterType::Triangle)
    } else {
        image
    };
    let image = if config.mirror { image.fliph() } else { image };

    let rgba = image.into_rgba8();
    Frame {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    }
}
