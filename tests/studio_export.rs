use std::io::Cursor;
use std::path::PathBuf;

use image::{ImageFormat, Rgba, RgbaImage};

use qrsmith::export::layout::logo_layout;
use qrsmith::{
    DirectorySink, ExportQuality, LogoFile, MemorySink, NotificationKind, QrDecoder, QrStudio,
    QrsmithConfig,
};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);

fn studio() -> QrStudio<MemorySink> {
    QrStudio::new(&QrsmithConfig::default(), MemorySink::new()).expect("studio")
}

/// Red-framed logo with a noisy center, about 2.3 MB as PNG.
fn noisy_logo_png() -> Vec<u8> {
    const EDGE: u32 = 960;
    const BORDER: u32 = 100;
    let mut state: u32 = 0x1234_5678;
    let img = RgbaImage::from_fn(EDGE, EDGE, |x, y| {
        let inside = (BORDER..EDGE - BORDER).contains(&x) && (BORDER..EDGE - BORDER).contains(&y);
        if !inside {
            return RED;
        }
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, a] = state.to_le_bytes();
        Rgba([r, g, b, a | 0x80])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).expect("encode logo");
    out.into_inner()
}

fn scratch_dir(tag: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir().join(format!("qrsmith-{tag}-{}-{nanos}", std::process::id()))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn download_before_generate_does_nothing() {
    let mut studio = studio();
    studio.form_mut().set_input("typed but never generated");

    let delivery = studio.download().await.expect("download");
    assert!(delivery.is_none());
    assert!(studio.sink().delivered().is_empty());
    assert!(studio.form().notifications().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn plain_export_end_to_end() {
    let mut studio = studio();
    let form = studio.form_mut();
    form.set_input("https://example.com");
    form.set_size(256);
    form.generate().expect("generate");

    let delivery = studio
        .download()
        .await
        .expect("download")
        .expect("artifact delivered");
    let artifact = &delivery.artifact;
    assert_eq!(artifact.filename, "qrcode-high-quality.png");
    assert_eq!(artifact.edge, 2048);
    assert_eq!(delivery.location, "memory://1/qrcode-high-quality.png");

    let img = image::load_from_memory(&artifact.png)
        .expect("decode png")
        .to_rgba8();
    assert_eq!(img.dimensions(), (2048, 2048));
    for (x, y) in [(0, 0), (2047, 0), (0, 2047), (2047, 2047), (1024, 3)] {
        assert_eq!(img.get_pixel(x, y), &WHITE, "pixel ({x}, {y})");
    }
    assert!(img.pixels().all(|p| p.0[3] == 255), "background must be opaque");

    let decoded = QrDecoder::new()
        .decode_encoded(&artifact.png)
        .expect("exported code scans");
    assert_eq!(decoded.as_str(), Some("https://example.com"));
    assert!(decoded.matches(&delivery.artifact.payload));

    let kinds: Vec<_> = studio
        .form_mut()
        .drain_notifications()
        .into_iter()
        .map(|n| n.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            NotificationKind::Generated,
            NotificationKind::DownloadedHighQuality
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn logo_export_end_to_end() {
    let logo = noisy_logo_png();
    assert!(
        (1_500_000..5 * 1024 * 1024).contains(&logo.len()),
        "logo is {} bytes",
        logo.len()
    );

    let mut studio = studio();
    let form = studio.form_mut();
    form.set_input("https://example.com");
    form.set_size(256);
    form.generate().expect("generate");
    form.set_logo(LogoFile::new("noisy.png", logo))
        .await
        .expect("logo accepted");
    assert_eq!(form.set_logo_size(50), 50);

    let delivery = studio
        .download()
        .await
        .expect("download")
        .expect("artifact delivered");
    let artifact = &delivery.artifact;
    assert_eq!(artifact.filename, "qrcode-with-logo.png");
    assert!(artifact.with_logo);
    assert_eq!(artifact.edge, 2048);

    let img = image::load_from_memory(&artifact.png)
        .expect("decode png")
        .to_rgba8();
    let layout = logo_layout(2048, 50, 10).expect("layout");
    assert_eq!(layout.logo.edge, 1024);
    assert_eq!((layout.logo.x, layout.logo.y), (512, 512));
    assert!(layout.backdrop.strictly_contains(&layout.logo));

    // frame of the logo, drawn on top of everything
    assert_eq!(img.get_pixel(532, 532), &RED);
    assert_eq!(img.get_pixel(1515, 1515), &RED);
    // white quiet zone between backdrop edge and logo
    for offset in 1..=10u32 {
        assert_eq!(img.get_pixel(512 - offset, 1024), &WHITE);
        assert_eq!(img.get_pixel(1024, 1535 + offset), &WHITE);
    }
    // outer corners are still the white background
    assert_eq!(img.get_pixel(0, 0), &WHITE);

    assert_eq!(
        studio.form().notifications().last().map(|n| n.kind),
        Some(NotificationKind::DownloadedWithLogo)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn clearing_logo_restores_plain_export() {
    let mut studio = studio();
    let form = studio.form_mut();
    form.set_input("clear me");
    form.set_size(128);
    form.generate().expect("generate");

    let mut logo = Cursor::new(Vec::new());
    RgbaImage::from_pixel(8, 8, RED)
        .write_to(&mut logo, ImageFormat::Png)
        .expect("encode logo");
    form.set_logo(LogoFile::new("red.png", logo.into_inner()))
        .await
        .expect("logo accepted");
    form.clear_logo();

    let delivery = studio.download().await.expect("download").expect("artifact");
    assert_eq!(delivery.artifact.filename, "qrcode-high-quality.png");
    assert!(!delivery.artifact.with_logo);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn repeated_downloads_match() {
    let mut studio = studio();
    let form = studio.form_mut();
    form.set_input("same twice");
    form.set_size(128);
    form.generate().expect("generate");

    let first = studio.download().await.expect("first").expect("artifact");
    let second = studio.download().await.expect("second").expect("artifact");

    let a = image::load_from_memory(&first.artifact.png).expect("first png");
    let b = image::load_from_memory(&second.artifact.png).expect("second png");
    assert_eq!(a.to_rgba8(), b.to_rgba8());
    assert_eq!(studio.sink().delivered().len(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn generate_after_edit_changes_export() {
    let mut studio = studio();
    studio.form_mut().set_input("first");
    studio.form_mut().generate().expect("generate");
    studio.form_mut().set_input("second");

    let stale = studio.download().await.expect("download").expect("artifact");
    assert_eq!(stale.artifact.payload, "first");

    studio.form_mut().generate().expect("generate");
    let fresh = studio.download().await.expect("download").expect("artifact");
    assert_eq!(fresh.artifact.payload, "second");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn standard_quality_writes_plain_file() {
    let dir = scratch_dir("standard");
    let mut config = QrsmithConfig::default();
    config.export.quality = ExportQuality::Standard;
    let mut studio = QrStudio::new(&config, DirectorySink::new(&dir)).expect("studio");

    let form = studio.form_mut();
    form.set_input("https://example.com/standard");
    form.set_size(320);
    form.generate().expect("generate");

    let delivery = studio.download().await.expect("download").expect("artifact");
    assert_eq!(delivery.artifact.filename, "qrcode.png");
    assert_eq!(delivery.artifact.edge, 320);

    let written = tokio::fs::read(dir.join("qrcode.png"))
        .await
        .expect("file written");
    assert_eq!(written, delivery.artifact.png);
    assert_eq!(
        studio.form().notifications().last().map(|n| n.message.as_str()),
        Some("QR Code downloaded!")
    );

    tokio::fs::remove_dir_all(&dir).await.ok();
}

#[test]
fn invalid_config_is_rejected_before_session_starts() {
    let mut config = QrsmithConfig::default();
    config.form.size_min = 600;
    assert!(QrStudio::new(&config, MemorySink::new()).is_err());

    let mut config = QrsmithConfig::default();
    config.export.logo_padding = 0;
    assert!(QrStudio::new(&config, MemorySink::new()).is_err());
}
