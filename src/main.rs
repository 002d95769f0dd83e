//! qrsmith command-line entrypoint

use clap::Parser;
use qrsmith::output::render_export;
use qrsmith::{
    DirectorySink, Error, ExportQuality, LogoFile, Notification, NotificationLevel, QrDecoder,
    QrStudio, QrsmithConfig, Result, logging,
};
use image::ImageFormat;
use serde_json::json;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "qrsmith",
    version,
    about = "Generate QR codes and export them as high-resolution PNGs"
)]
struct Cli {
    /// Text or URL to encode
    #[arg(long, short = 't', value_name = "TEXT")]
    text: String,

    /// Display size in pixels (snapped to the configured range and step)
    #[arg(long, short = 's', value_name = "PX")]
    size: Option<u32>,

    /// Image file to overlay in the center of the code
    #[arg(long, value_name = "PATH")]
    logo: Option<PathBuf>,

    /// Logo edge as a percentage of the code's edge
    #[arg(long, value_name = "PCT")]
    logo_size: Option<u8>,

    /// Export variant (`standard` or `high`)
    #[arg(long, value_name = "QUALITY")]
    quality: Option<String>,

    /// Directory the PNG is written to
    #[arg(long, short = 'o', value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Also write the on-screen preview to this path (PNG for `.png`, SVG otherwise)
    #[arg(long, value_name = "PATH")]
    preview: Option<PathBuf>,

    /// Scan the exported PNG and check it decodes back to the input
    #[arg(long)]
    verify: bool,

    /// Output results as formatted JSON instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Optional configuration file (toml/yaml). Defaults to qrsmith.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = QrsmithConfig::load(cli.config.as_deref())?;

    if let Some(ref quality) = cli.quality {
        config.export.quality = quality.parse::<ExportQuality>().map_err(Error::Config)?;
    }
    if let Some(ref dir) = cli.out_dir {
        config.export.output_dir = dir.clone();
    }

    logging::init(&config.logging)?;

    let sink = DirectorySink::new(config.export.output_dir.clone());
    let mut studio = QrStudio::new(&config, sink)?;

    let outcome = run(&cli, &mut studio).await;
    let notifications = studio.form_mut().drain_notifications();
    if !cli.json {
        print_notifications(&notifications);
    }
    let report = match outcome {
        Ok(report) => report,
        Err(err) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "error": err.to_string(),
                        "notifications": notifications,
                    }))?
                );
            }
            return Err(err);
        }
    };

    if cli.json {
        let mut value = report.unwrap_or(serde_json::Value::Null);
        if let Some(object) = value.as_object_mut() {
            object.insert("notifications".to_string(), json!(notifications));
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
    }

    Ok(())
}

async fn run(
    cli: &Cli,
    studio: &mut QrStudio<DirectorySink>,
) -> Result<Option<serde_json::Value>> {
    let form = studio.form_mut();
    form.set_input(cli.text.clone());
    if let Some(size) = cli.size {
        let stored = form.set_size(size);
        if stored != size {
            info!(requested = size, stored, "Adjusted size to the allowed range");
        }
    }
    if let Some(percent) = cli.logo_size {
        form.set_logo_size(percent);
    }
    if let Some(ref path) = cli.logo {
        let file = LogoFile::read(path).await?;
        form.set_logo(file).await?;
    }
    form.generate()?;

    if let Some(ref path) = cli.preview {
        write_preview(studio, path).await?;
    }

    let Some(delivery) = studio.download().await? else {
        return Ok(None);
    };

    let rendered = render_export(&delivery.artifact, Some(&delivery.location));
    let mut json = rendered.json;

    if cli.verify {
        let decoded = QrDecoder::new().decode_encoded(&delivery.artifact.png)?;
        let matches = decoded.matches(&delivery.artifact.payload);
        if let Some(object) = json.as_object_mut() {
            object.insert("verified".to_string(), json!(matches));
        }
        if !cli.json {
            for line in &rendered.human {
                println!("{line}");
            }
            println!(
                "  Verified: {}",
                if matches { "scans back to input" } else { "MISMATCH" }
            );
        }
        if !matches {
            return Err(Error::QrDecode(
                "exported image does not decode to the input".to_string(),
            ));
        }
    } else if !cli.json {
        for line in &rendered.human {
            println!("{line}");
        }
    }

    Ok(Some(json))
}

async fn write_preview(studio: &QrStudio<DirectorySink>, path: &Path) -> Result<()> {
    let as_png = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

    if as_png {
        let Some(image) = studio.preview_raster()? else {
            return Ok(());
        };
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png)?;
        tokio::fs::write(path, out.into_inner()).await?;
        info!(path = %path.display(), edge = image.width(), "Wrote PNG preview");
    } else if let Some(render) = studio.preview()? {
        tokio::fs::write(path, render.serialize()).await?;
        info!(path = %path.display(), edge = render.edge, "Wrote SVG preview");
    }
    Ok(())
}

fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        let marker = match notification.level {
            NotificationLevel::Success => "✓",
            NotificationLevel::Error => "✗",
        };
        println!("{marker} {}", notification.message);
    }
}
