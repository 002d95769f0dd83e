//! Delivering and describing exported artifacts

pub mod sink;

pub use sink::{ArtifactSink, DirectorySink, MemorySink};

use crate::config::ExportQuality;
use crate::export::ExportArtifact;
use serde_json::{Value, json};

/// Combined structured and human-readable description of an export
#[derive(Debug, Clone)]
pub struct RenderedExport {
    /// Structured JSON representation suitable for scripts
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

/// Describe an artifact and where it was delivered.
pub fn render_export(artifact: &ExportArtifact, location: Option<&str>) -> RenderedExport {
    let json = json!({
        "filename": artifact.filename,
        "location": location,
        "edge": artifact.edge,
        "quality": quality_label(artifact.quality),
        "with_logo": artifact.with_logo,
        "bytes": artifact.png.len(),
        "payload": artifact.payload,
    });

    let mut human = vec![format!("Exported {}", artifact.filename)];
    if let Some(location) = location {
        human.push(format!("  Saved to: {location}"));
    }
    human.push(format!(
        "  Dimensions: {}x{} ({})",
        artifact.edge,
        artifact.edge,
        quality_label(artifact.quality)
    ));
    human.push(format!(
        "  Logo: {}",
        if artifact.with_logo { "yes" } else { "no" }
    ));
    human.push(format!("  PNG bytes: {}", artifact.png.len()));
    human.push(format!("  Payload: {}", format_text_snippet(&artifact.payload)));

    RenderedExport { json, human }
}

fn quality_label(quality: ExportQuality) -> &'static str {
    match quality {
        ExportQuality::Standard => "standard",
        ExportQuality::High => "high",
    }
}

fn format_text_snippet(text: &str) -> String {
    const MAX: usize = 120;
    let total = text.chars().count();
    if total <= MAX {
        text.to_string()
    } else {
        let snippet: String = text.chars().take(MAX).collect();
        format!("{}... ({} chars)", snippet, total)
    }
}
