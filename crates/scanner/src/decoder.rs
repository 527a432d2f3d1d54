//! QR decoding with `rqrr`.

use galaxy_core::decode::Decoder;
use galaxy_core::frame::Frame;

/// [`Decoder`] backed by `rqrr` grid detection.
///
/// The first grid that decodes wins. Detection and decode errors are
/// reported as "no code in this frame".
#[derive(Debug, Default, Clone, Copy)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for RqrrDecoder {
    fn decode(&self, frame: &Frame) -> Option<String> {
        let width = frame.width() as usize;
        let height = frame.height() as usize;
        if width == 0 || height == 0 {
            return None;
        }

        let luma = frame.luma();
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| luma[y * width + x]);

        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_meta, content)) => return Some(content),
                Err(e) => tracing::trace!(error = %e, "QR grid did not decode"),
            }
        }
        None
    }
}
