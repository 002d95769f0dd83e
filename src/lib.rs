//! qrsmith - QR code generator with high-resolution PNG export
//!
//! A form collects the text to encode, a display size and an optional logo.
//! Nothing is rendered until the input is explicitly committed with
//! `generate`; the committed value is previewed as SVG and exported as a PNG
//! rasterized well above preview resolution, with the logo centered on a
//! white backdrop so the code stays scannable.
//!
//! # Features
//!
//! - **Commit on generate**: typing never changes what is rendered
//! - **Supersampled export**: PNGs at `size x 8` over an opaque white background
//! - **Logo overlay**: centered logo with a padded white quiet zone, ECC level H
//! - **Async-first**: image decodes run off the async thread on Tokio
//!
//! # Example
//!
//! ```no_run
//! use qrsmith::{DirectorySink, QrStudio, QrsmithConfig};
//!
//! #[tokio::main]
//! async fn main() -> qrsmith::Result<()> {
//!     let config = QrsmithConfig::default();
//!     let mut studio = QrStudio::new(&config, DirectorySink::new("."))?;
//!
//!     studio.form_mut().set_input("https://example.com");
//!     studio.form_mut().generate()?;
//!
//!     if let Some(delivery) = studio.download().await? {
//!         println!("Saved {}", delivery.location);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod config;
pub mod data_uri;
pub mod error;
pub mod export;
pub mod form;
pub mod logging;
pub mod logo;
pub mod notify;
pub mod output;
pub mod qr;
pub mod render;

// Re-exports for convenience
pub use error::{Error, Result};

pub use config::{
    ExportOptions, ExportQuality, FormOptions, LogRotation, LoggingOptions, QrsmithConfig,
};
pub use export::{ExportArtifact, ExportPipeline, LogoOverlay};
pub use form::QrForm;
pub use logo::{LogoFile, LogoImage};
pub use notify::{Notification, NotificationKind, NotificationLevel};
pub use output::{ArtifactSink, DirectorySink, MemorySink};
pub use qr::{QrDecoder, QrEncoder, QrPayload};
pub use render::{QR_ELEMENT_ID, QrRender};

/// An export that reached its sink
#[derive(Debug, Clone)]
pub struct Delivery {
    /// The exported PNG
    pub artifact: ExportArtifact,
    /// Where the sink put it
    pub location: String,
}

/// One generator session: form state, preview rendering, export and delivery
///
/// Generates, logo uploads and downloads queue notifications on the form. The
/// queue holds at most [`notify::QUEUE_CAPACITY`] entries and drops the oldest
/// beyond that; call [`QrForm::drain_notifications`] after each action to
/// present them all.
pub struct QrStudio<S> {
    form: QrForm,
    encoder: QrEncoder,
    pipeline: ExportPipeline,
    sink: S,
}

impl<S: ArtifactSink> QrStudio<S> {
    /// Create a session from configuration, delivering exports to `sink`.
    ///
    /// Fails with [`Error::Config`] when the configuration does not validate.
    pub fn new(config: &QrsmithConfig, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            form: QrForm::new(config.form.clone())?,
            encoder: QrEncoder::new(),
            pipeline: ExportPipeline::new(config.export.clone()),
            sink,
        })
    }

    /// Form state
    pub fn form(&self) -> &QrForm {
        &self.form
    }

    /// Mutable form state, for input and option changes
    pub fn form_mut(&mut self) -> &mut QrForm {
        &mut self.form
    }

    /// Delivery target
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Render the committed value for display, `None` before the first generate.
    pub fn preview(&self) -> Result<Option<QrRender>> {
        render::render_preview(&self.form, &self.encoder)
    }

    /// Same preview as a grayscale raster, `None` before the first generate.
    pub fn preview_raster(&self) -> Result<Option<image::DynamicImage>> {
        render::render_preview_raster(&self.form, &self.encoder)
    }

    /// Export the current preview as a PNG and hand it to the sink.
    ///
    /// Returns `Ok(None)` when there was nothing to export; no notification is
    /// queued in that case.
    pub async fn download(&mut self) -> Result<Option<Delivery>> {
        let render = self.preview()?;
        let overlay = self.form.logo().map(|logo| LogoOverlay {
            logo,
            percent: self.form.logo_percent(),
        });

        let Some(artifact) = self
            .pipeline
            .export(render.as_ref(), self.form.size(), overlay)
            .await?
        else {
            return Ok(None);
        };

        let location = self.sink.deliver(&artifact).await?;
        self.form.notify(artifact.notification_kind());

        Ok(Some(Delivery { artifact, location }))
    }
}
