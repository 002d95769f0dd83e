//! PNG export of the rendered QR graphic
//!
//! An export is a linear sequence with one suspension point per image decode:
//!
//! 1. serialize the rendered SVG and decode it from a `data:` URI,
//!    then rasterize it at `size x multiplier` over an opaque white fill;
//! 2. if a logo is set, decode it, then paint a white backdrop and the logo
//!    centered on top;
//! 3. encode the surface as PNG.
//!
//! The logo decode never starts before the QR layer is on the surface.

pub mod layout;
pub mod surface;

use crate::config::{ExportOptions, ExportQuality};
use crate::data_uri;
use crate::error::Result;
use crate::logo::{self, LogoImage};
use crate::notify::NotificationKind;
use crate::render::QrRender;
use image::imageops::{self, FilterType};
use layout::logo_layout;
use surface::{SVG_MIME, Surface};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Filename of a plain export at display resolution
pub const PLAIN_FILENAME: &str = "qrcode.png";
/// Filename of a plain supersampled export
pub const HIGH_QUALITY_FILENAME: &str = "qrcode-high-quality.png";
/// Filename of an export carrying a logo
pub const WITH_LOGO_FILENAME: &str = "qrcode-with-logo.png";

/// Logo to composite onto an export
#[derive(Debug, Clone, Copy)]
pub struct LogoOverlay<'a> {
    /// The embedded logo
    pub logo: &'a LogoImage,
    /// Logo edge as a percentage of the surface edge
    pub percent: u8,
}

/// A finished PNG ready for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Download filename
    pub filename: String,
    /// Encoded PNG bytes
    pub png: Vec<u8>,
    /// Edge of the square image in pixels
    pub edge: u32,
    /// Variant the artifact was produced with
    pub quality: ExportQuality,
    /// Whether a logo was composited
    pub with_logo: bool,
    /// Payload encoded in the QR symbol
    pub payload: String,
}

impl ExportArtifact {
    /// Success notification to show once the artifact is delivered
    pub fn notification_kind(&self) -> NotificationKind {
        match (self.with_logo, self.quality) {
            (true, _) => NotificationKind::DownloadedWithLogo,
            (false, ExportQuality::High) => NotificationKind::DownloadedHighQuality,
            (false, ExportQuality::Standard) => NotificationKind::Downloaded,
        }
    }
}

/// Turns rendered QR graphics into PNG artifacts
#[derive(Debug)]
pub struct ExportPipeline {
    options: ExportOptions,
    // Held for the whole export so overlapping requests run one after another.
    in_flight: Mutex<()>,
}

impl ExportPipeline {
    /// Create a pipeline with the given settings
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            in_flight: Mutex::new(()),
        }
    }

    /// Produce a PNG of `render` at `size x multiplier`, optionally with a logo.
    ///
    /// Returns `Ok(None)` without side effects when there is nothing to
    /// export: no render yet, a surface that cannot be allocated, or a logo
    /// that fails to decode.
    pub async fn export(
        &self,
        render: Option<&QrRender>,
        size: u32,
        overlay: Option<LogoOverlay<'_>>,
    ) -> Result<Option<ExportArtifact>> {
        let Some(render) = render else {
            debug!("No rendered QR code; nothing to export");
            return Ok(None);
        };

        let _turn = self.in_flight.lock().await;

        let edge = size.saturating_mul(self.options.multiplier());
        let svg_uri = data_uri::encode(SVG_MIME, render.serialize().as_bytes());

        let Some(mut surface) =
            tokio::task::spawn_blocking(move || rasterize_qr(&svg_uri, edge)).await??
        else {
            debug!(edge, "Could not allocate export surface; skipping export");
            return Ok(None);
        };

        let with_logo = match overlay {
            None => false,
            Some(overlay) => {
                let Some(layout) =
                    logo_layout(edge, overlay.percent, self.options.logo_padding)
                else {
                    debug!(
                        edge,
                        percent = overlay.percent,
                        "Logo too small to draw; skipping export"
                    );
                    return Ok(None);
                };

                let logo_uri = overlay.logo.data_uri().to_string();
                let logo_edge = layout.logo.edge;
                let fitted = tokio::task::spawn_blocking(move || {
                    logo::decode_data_uri_image(&logo_uri).map(|img| {
                        imageops::resize(
                            &img.to_rgba8(),
                            logo_edge,
                            logo_edge,
                            FilterType::Lanczos3,
                        )
                    })
                })
                .await?;
                let fitted = match fitted {
                    Ok(fitted) => fitted,
                    Err(err) => {
                        warn!(
                            logo = overlay.logo.name(),
                            "Failed to decode logo; skipping export: {err}"
                        );
                        return Ok(None);
                    }
                };

                surface.fill_square_white(layout.backdrop);
                surface.draw_image(&fitted, layout.logo.x, layout.logo.y)?;
                true
            }
        };

        let png = tokio::task::spawn_blocking(move || surface.encode_png()).await??;

        let filename = match (with_logo, self.options.quality) {
            (true, _) => WITH_LOGO_FILENAME,
            (false, ExportQuality::High) => HIGH_QUALITY_FILENAME,
            (false, ExportQuality::Standard) => PLAIN_FILENAME,
        };
        info!(
            filename,
            edge,
            with_logo,
            bytes = png.len(),
            "Exported QR code"
        );

        Ok(Some(ExportArtifact {
            filename: filename.to_string(),
            png,
            edge,
            quality: self.options.quality,
            with_logo,
            payload: render.payload.clone(),
        }))
    }
}

impl Default for ExportPipeline {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

fn rasterize_qr(svg_uri: &str, edge: u32) -> Result<Option<Surface>> {
    let tree = surface::decode_svg(svg_uri)?;
    let Some(mut surface) = Surface::allocate(edge) else {
        return Ok(None);
    };
    surface.fill_white();
    surface.draw_vector(&tree);
    Ok(Some(surface))
}
