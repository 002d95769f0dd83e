//! qrsmith runtime configuration handling

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Top-level configuration structure loaded from disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrsmithConfig {
    /// Form bounds and upload limits
    pub form: FormOptions,
    /// Export pipeline settings
    pub export: ExportOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl QrsmithConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No qrsmith.toml / qrsmith.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrsmith.toml", "qrsmith.yaml", "qrsmith.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrsmith");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.form.apply_env_overrides();
        self.export.apply_env_overrides();
        self.logging.apply_env_overrides();
    }

    /// Reject bounds that would make the form or pipeline unusable.
    pub fn validate(&self) -> Result<()> {
        self.form.validate()?;
        self.export.validate()
    }
}

/// Bounds and limits applied by the form state manager
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FormOptions {
    /// Smallest selectable display size in pixels
    pub size_min: u32,
    /// Largest selectable display size in pixels
    pub size_max: u32,
    /// Quantization step for the display size
    pub size_step: u32,
    /// Display size a fresh form starts with
    pub default_size: u32,
    /// On-screen preview cap, independent of the display size
    pub preview_cap: u32,
    /// Largest accepted logo upload in bytes
    pub logo_max_bytes: u64,
    /// Smallest logo edge as a percentage of the QR edge
    pub logo_percent_min: u8,
    /// Largest logo edge as a percentage of the QR edge
    pub logo_percent_max: u8,
    /// Logo percentage a fresh form starts with
    pub logo_percent_default: u8,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            size_min: 128,
            size_max: 512,
            size_step: 64,
            default_size: 256,
            preview_cap: 256,
            logo_max_bytes: 5 * 1024 * 1024,
            logo_percent_min: 20,
            logo_percent_max: 80,
            logo_percent_default: 25,
        }
    }
}

impl FormOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(size) = env::var("QRSMITH_DEFAULT_SIZE") {
            if let Ok(parsed) = size.parse::<u32>() {
                self.default_size = parsed;
            }
        }
        if let Ok(cap) = env::var("QRSMITH_PREVIEW_CAP") {
            if let Ok(parsed) = cap.parse::<u32>() {
                self.preview_cap = parsed;
            }
        }
        if let Ok(limit) = env::var("QRSMITH_LOGO_MAX_BYTES") {
            if let Ok(parsed) = limit.parse::<u64>() {
                self.logo_max_bytes = parsed;
            }
        }
    }

    /// Reject bounds a form cannot enforce.
    pub fn validate(&self) -> Result<()> {
        if self.size_step == 0 {
            return Err(Error::Config("form.size_step must be positive".to_string()));
        }
        if self.size_min == 0 || self.size_min > self.size_max {
            return Err(Error::Config(format!(
                "form size bounds are invalid: min={} max={}",
                self.size_min, self.size_max
            )));
        }
        if self.preview_cap == 0 {
            return Err(Error::Config("form.preview_cap must be positive".to_string()));
        }
        if self.logo_percent_min == 0
            || self.logo_percent_min > self.logo_percent_max
            || self.logo_percent_max > 100
        {
            return Err(Error::Config(format!(
                "form logo percent bounds are invalid: min={} max={}",
                self.logo_percent_min, self.logo_percent_max
            )));
        }
        Ok(())
    }
}

/// Export pipeline settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExportOptions {
    /// Which export variant to produce
    pub quality: ExportQuality,
    /// Supersampling multiplier applied for the high-quality variant
    pub supersample: u32,
    /// White margin around the logo backdrop, in output pixels
    pub logo_padding: u32,
    /// Directory exported files are written to by the CLI
    pub output_dir: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            quality: ExportQuality::High,
            supersample: 8,
            logo_padding: 10,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ExportOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(quality) = env::var("QRSMITH_EXPORT_QUALITY") {
            if let Ok(parsed) = quality.parse::<ExportQuality>() {
                self.quality = parsed;
            }
        }
        if let Ok(factor) = env::var("QRSMITH_SUPERSAMPLE") {
            if let Ok(parsed) = factor.parse::<u32>() {
                self.supersample = parsed.max(1);
            }
        }
        if let Ok(padding) = env::var("QRSMITH_LOGO_PADDING") {
            if let Ok(parsed) = padding.parse::<u32>() {
                if parsed > 0 {
                    self.logo_padding = parsed;
                }
            }
        }
        if let Ok(dir) = env::var("QRSMITH_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.output_dir = PathBuf::from(dir);
            }
        }
    }

    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.supersample == 0 {
            return Err(Error::Config("export.supersample must be at least 1".to_string()));
        }
        if self.logo_padding == 0 {
            return Err(Error::Config(
                "export.logo_padding must be at least 1 so the backdrop clears the logo"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Multiplier applied to the display size for the configured variant.
    pub fn multiplier(&self) -> u32 {
        match self.quality {
            ExportQuality::Standard => 1,
            ExportQuality::High => self.supersample,
        }
    }
}

/// Export variants
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportQuality {
    /// Rasterize at the display size
    Standard,
    /// Rasterize at display size times the supersampling multiplier
    High,
}

impl ExportQuality {
    /// Parse a quality identifier (case-insensitive) from a string slice.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl FromStr for ExportQuality {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| {
            format!("Unsupported export quality '{value}', expected 'standard' or 'high'")
        })
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRSMITH_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in stderr logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(level) = env::var("QRSMITH_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(file) = env::var("QRSMITH_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Ok(color) = env::var("QRSMITH_LOG_COLOR") {
            match color.to_ascii_lowercase().as_str() {
                "0" | "false" | "off" => self.color = false,
                "1" | "true" | "on" => self.color = true,
                _ => {}
            }
        }
        if let Ok(rotation) = env::var("QRSMITH_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}
