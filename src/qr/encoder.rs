//! QR code encoder

use crate::error::{Error, Result};
use image::{DynamicImage, Luma};
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

/// QR code encoder
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    ecc_level: EcLevel,
}

impl QrEncoder {
    /// Create an encoder using the highest error correction level (H), which
    /// leaves room for a logo overlay.
    pub fn new() -> Self {
        Self {
            ecc_level: EcLevel::H,
        }
    }

    /// Error correction level in use
    pub fn ecc_level(&self) -> EcLevel {
        self.ecc_level
    }

    fn symbol(&self, payload: &str) -> Result<QrCode> {
        QrCode::with_error_correction_level(payload.as_bytes(), self.ecc_level)
            .map_err(|e| Error::QrEncode(format!("Failed to create QR code: {}", e)))
    }

    /// Render `payload` as SVG markup whose edge does not exceed `edge` pixels.
    ///
    /// The markup includes a light background and the quiet zone.
    pub fn render_svg(&self, payload: &str, edge: u32) -> Result<String> {
        let code = self.symbol(payload)?;
        Ok(code
            .render::<svg::Color<'_>>()
            .max_dimensions(edge, edge)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build())
    }

    /// Render `payload` to a grayscale raster no larger than `edge` pixels.
    pub fn render_raster(&self, payload: &str, edge: u32) -> Result<DynamicImage> {
        let code = self.symbol(payload)?;
        let image = code.render::<Luma<u8>>().max_dimensions(edge, edge).build();
        Ok(DynamicImage::ImageLuma8(image))
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}
