//! Form state: live input, committed value, size and logo settings
//!
//! Typing only touches the input; the value that is rendered and exported is
//! the one captured by the last successful [`QrForm::generate`].

use crate::config::FormOptions;
use crate::error::{Error, Result};
use crate::logo::{LogoFile, LogoImage};
use crate::notify::{Notification, NotificationKind, Notifications};

/// State behind a single QR generator form
#[derive(Debug)]
pub struct QrForm {
    options: FormOptions,
    input: String,
    committed: Option<String>,
    size: u32,
    logo: Option<LogoImage>,
    logo_percent: u8,
    notifications: Notifications,
}

impl QrForm {
    /// Create an empty form using the given bounds.
    ///
    /// Fails with [`Error::Config`] when the bounds are inverted or empty.
    pub fn new(options: FormOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::with_valid_options(options))
    }

    fn with_valid_options(options: FormOptions) -> Self {
        let size = quantize(
            options.default_size,
            options.size_min,
            options.size_max,
            options.size_step,
        );
        let logo_percent = options
            .logo_percent_default
            .clamp(options.logo_percent_min, options.logo_percent_max);

        Self {
            options,
            input: String::new(),
            committed: None,
            size,
            logo: None,
            logo_percent,
            notifications: Notifications::default(),
        }
    }

    /// Replace the live input.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Commit the live input as the value to encode.
    pub fn generate(&mut self) -> Result<()> {
        if self.input.trim().is_empty() {
            self.notifications.push(NotificationKind::EmptyInput);
            return Err(Error::EmptyInput);
        }

        self.committed = Some(self.input.clone());
        tracing::info!(length = self.input.len(), "Committed QR payload");
        self.notifications.push(NotificationKind::Generated);
        Ok(())
    }

    /// Set the display size, snapped to the configured step and bounds.
    ///
    /// Returns the size actually stored.
    pub fn set_size(&mut self, size: u32) -> u32 {
        self.size = quantize(
            size,
            self.options.size_min,
            self.options.size_max,
            self.options.size_step,
        );
        self.size
    }

    /// Validate and store a logo, replacing any previous one.
    ///
    /// Oversized or undecodable files leave the current logo untouched.
    pub async fn set_logo(&mut self, file: LogoFile) -> Result<()> {
        let limit = self.options.logo_max_bytes;
        if file.len() > limit {
            self.notifications.push_with(
                NotificationKind::LogoTooLarge,
                format!("Logo size should be less than {}", format_bytes(limit)),
            );
            return Err(Error::LogoTooLarge {
                size: file.len(),
                limit,
            });
        }

        let name = file.name.clone();
        let embedded = tokio::task::spawn_blocking(move || LogoImage::from_file(&file)).await?;
        match embedded {
            Ok(logo) => {
                tracing::info!(name = %name, mime = logo.mime(), "Stored logo");
                self.logo = Some(logo);
                self.notifications.push(NotificationKind::LogoUploaded);
                Ok(())
            }
            Err(err) => {
                self.notifications.push(NotificationKind::LogoUnsupported);
                Err(err)
            }
        }
    }

    /// Drop the current logo. The logo percentage is kept for the next upload.
    pub fn clear_logo(&mut self) {
        if self.logo.take().is_some() {
            tracing::debug!("Cleared logo");
        }
    }

    /// Set the logo edge percentage, clamped to the configured bounds.
    ///
    /// Returns the percentage actually stored.
    pub fn set_logo_size(&mut self, percent: u8) -> u8 {
        self.logo_percent =
            percent.clamp(self.options.logo_percent_min, self.options.logo_percent_max);
        self.logo_percent
    }

    /// Live input as typed
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Value captured by the last successful generate
    pub fn committed(&self) -> Option<&str> {
        self.committed.as_deref()
    }

    /// Current display size in pixels
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Current logo, if any
    pub fn logo(&self) -> Option<&LogoImage> {
        self.logo.as_ref()
    }

    /// Logo edge as a percentage of the QR edge
    pub fn logo_percent(&self) -> u8 {
        self.logo_percent
    }

    /// Bounds this form enforces
    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Queue a notification on behalf of an action outside the form (e.g. export).
    pub fn notify(&mut self, kind: NotificationKind) {
        self.notifications.push(kind);
    }

    /// Pending notifications
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Remove and return pending notifications, oldest first.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }
}

impl Default for QrForm {
    fn default() -> Self {
        Self::with_valid_options(FormOptions::default())
    }
}

/// Snap `value` to the nearest `step` counted from `min`, then clamp to `[min, max]`.
fn quantize(value: u32, min: u32, max: u32, step: u32) -> u32 {
    let clamped = value.clamp(min, max);
    if step == 0 {
        return clamped;
    }
    let steps = (clamped - min + step / 2) / step;
    min.saturating_add(steps.saturating_mul(step)).min(max)
}

fn format_bytes(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationLevel;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn tiny_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn generate_commits_input() {
        let mut form = QrForm::default();
        form.set_input("https://example.com");
        assert_eq!(form.committed(), None);

        form.generate().unwrap();
        assert_eq!(form.committed(), Some("https://example.com"));
        let last = form.notifications().last().unwrap();
        assert_eq!(last.kind, NotificationKind::Generated);
        assert_eq!(last.level, NotificationLevel::Success);
    }

    #[test]
    fn typing_does_not_touch_committed_value() {
        let mut form = QrForm::default();
        form.set_input("first");
        form.generate().unwrap();

        form.set_input("second");
        assert_eq!(form.input(), "second");
        assert_eq!(form.committed(), Some("first"));
    }

    #[test]
    fn blank_input_is_rejected() {
        let mut form = QrForm::default();
        form.set_input("kept");
        form.generate().unwrap();

        for blank in ["", "   ", "\t\n"] {
            form.set_input(blank);
            assert!(matches!(form.generate(), Err(Error::EmptyInput)));
            assert_eq!(form.committed(), Some("kept"));
            let last = form.notifications().last().unwrap();
            assert_eq!(last.kind, NotificationKind::EmptyInput);
            assert_eq!(last.message, "Please enter some text or URL");
        }
    }

    #[test]
    fn committed_value_is_not_trimmed() {
        let mut form = QrForm::default();
        form.set_input("  padded  ");
        form.generate().unwrap();
        assert_eq!(form.committed(), Some("  padded  "));
    }

    #[test]
    fn size_clamps_at_bounds() {
        let mut form = QrForm::default();
        assert_eq!(form.size(), 256);
        assert_eq!(form.set_size(128), 128);
        assert_eq!(form.set_size(512), 512);
        assert_eq!(form.set_size(64), 128);
        assert_eq!(form.set_size(576), 512);
        assert_eq!(form.set_size(0), 128);
        assert_eq!(form.set_size(u32::MAX), 512);
    }

    #[test]
    fn size_snaps_to_step() {
        let mut form = QrForm::default();
        assert_eq!(form.set_size(200), 192);
        assert_eq!(form.set_size(230), 256);
        assert_eq!(form.set_size(320), 320);
    }

    #[test]
    fn quantize_never_exceeds_max_off_grid() {
        assert_eq!(quantize(100, 10, 100, 40), 90);
        assert_eq!(quantize(95, 10, 100, 40), 90);
        assert_eq!(quantize(5, 10, 100, 0), 10);
    }

    #[test]
    fn inverted_bounds_are_rejected_up_front() {
        let options = FormOptions {
            size_min: 600,
            ..FormOptions::default()
        };
        assert!(matches!(QrForm::new(options), Err(Error::Config(_))));

        let options = FormOptions {
            logo_percent_min: 90,
            logo_percent_max: 30,
            ..FormOptions::default()
        };
        assert!(matches!(QrForm::new(options), Err(Error::Config(_))));
    }

    #[test]
    fn custom_bounds_are_honoured() {
        let options = FormOptions {
            size_min: 100,
            size_max: 300,
            size_step: 100,
            default_size: 1000,
            ..FormOptions::default()
        };
        let mut form = QrForm::new(options).unwrap();
        assert_eq!(form.size(), 300);
        assert_eq!(form.set_size(140), 100);
    }

    #[test]
    fn logo_percent_clamps() {
        let mut form = QrForm::default();
        assert_eq!(form.logo_percent(), 25);
        assert_eq!(form.set_logo_size(10), 20);
        assert_eq!(form.set_logo_size(95), 80);
        assert_eq!(form.set_logo_size(50), 50);
    }

    #[tokio::test]
    async fn logo_upload_and_clear() {
        let mut form = QrForm::default();
        form.set_logo_size(40);
        form.set_logo(LogoFile::new("logo.png", tiny_png())).await.unwrap();

        let logo = form.logo().unwrap();
        assert!(logo.data_uri().starts_with("data:image/png;base64,"));
        assert_eq!(
            form.notifications().last().unwrap().kind,
            NotificationKind::LogoUploaded
        );

        form.clear_logo();
        assert!(form.logo().is_none());
        assert_eq!(form.logo_percent(), 40);
    }

    #[tokio::test]
    async fn oversized_logo_keeps_previous() {
        let mut options = FormOptions::default();
        options.logo_max_bytes = 1024;
        let mut form = QrForm::new(options).unwrap();

        form.set_logo(LogoFile::new("small.png", tiny_png())).await.unwrap();
        let before = form.logo().cloned();

        let oversized = LogoFile::new("huge.png", vec![0u8; 1025]);
        let err = form.set_logo(oversized).await.unwrap_err();
        assert!(matches!(
            err,
            Error::LogoTooLarge {
                size: 1025,
                limit: 1024
            }
        ));
        assert_eq!(form.logo().cloned(), before);

        let last = form.notifications().last().unwrap();
        assert_eq!(last.kind, NotificationKind::LogoTooLarge);
        assert_eq!(last.level, NotificationLevel::Error);
        assert_eq!(last.message, "Logo size should be less than 1024 bytes");
    }

    #[tokio::test]
    async fn logo_at_exact_limit_is_accepted() {
        let png = tiny_png();
        let mut options = FormOptions::default();
        options.logo_max_bytes = png.len() as u64;
        let mut form = QrForm::new(options).unwrap();

        form.set_logo(LogoFile::new("exact.png", png)).await.unwrap();
        assert!(form.logo().is_some());
    }

    #[tokio::test]
    async fn default_limit_wording_mentions_megabytes() {
        let mut form = QrForm::default();
        let oversized = LogoFile::new("huge.png", vec![0u8; 5 * 1024 * 1024 + 1]);
        assert!(form.set_logo(oversized).await.is_err());
        assert_eq!(
            form.notifications().last().unwrap().message,
            "Logo size should be less than 5MB"
        );
    }

    #[tokio::test]
    async fn non_image_logo_is_rejected() {
        let mut form = QrForm::default();
        let err = form
            .set_logo(LogoFile::new("readme.md", b"# hello".to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedLogo(_)));
        assert!(form.logo().is_none());
        assert_eq!(
            form.notifications().last().unwrap().kind,
            NotificationKind::LogoUnsupported
        );
    }
}
