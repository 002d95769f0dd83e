//! QR symbol encoding and decoding
//!
//! `qrcode` draws the symbol (SVG for previews and exports, grayscale raster
//! for PNG previews); `rqrr` scans exports back to confirm they still read.

mod decoder;
mod encoder;

pub use decoder::QrDecoder;
pub use encoder::QrEncoder;

/// Content recovered from a scanned symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload(Vec<u8>);

impl QrPayload {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Content as text, when it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Whether the symbol carries exactly `text`
    pub fn matches(&self, text: &str) -> bool {
        self.0 == text.as_bytes()
    }
}
