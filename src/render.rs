//! On-screen rendering of the committed value

use crate::error::Result;
use crate::form::QrForm;
use crate::qr::QrEncoder;
use image::DynamicImage;

/// Identifier the rendered graphic is addressable by
pub const QR_ELEMENT_ID: &str = "qr-code";

/// A rendered vector QR graphic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrRender {
    /// Stable identifier of the rendered element
    pub element_id: &'static str,
    /// Payload the graphic encodes
    pub payload: String,
    /// SVG markup
    pub markup: String,
    /// Requested on-screen edge in pixels (the markup never exceeds it)
    pub edge: u32,
}

impl QrRender {
    /// Serialize the graphic to its textual markup form.
    pub fn serialize(&self) -> &str {
        &self.markup
    }
}

/// Render the form's committed value for display.
///
/// Returns `None` until something has been generated. The display edge is
/// `min(size, preview_cap)`; exports re-rasterize the same markup at full
/// resolution instead.
pub fn render_preview(form: &QrForm, encoder: &QrEncoder) -> Result<Option<QrRender>> {
    let Some(payload) = form.committed() else {
        return Ok(None);
    };

    let edge = form.size().min(form.options().preview_cap);
    let markup = encoder.render_svg(payload, edge)?;

    Ok(Some(QrRender {
        element_id: QR_ELEMENT_ID,
        payload: payload.to_string(),
        markup,
        edge,
    }))
}

/// Render the committed value as a grayscale raster at the preview edge.
///
/// Used when the preview is saved as an image file rather than markup.
pub fn render_preview_raster(
    form: &QrForm,
    encoder: &QrEncoder,
) -> Result<Option<DynamicImage>> {
    let Some(payload) = form.committed() else {
        return Ok(None);
    };
    let edge = form.size().min(form.options().preview_cap);
    encoder.render_raster(payload, edge).map(Some)
}
