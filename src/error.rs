//! Error types for qrsmith operations

use thiserror::Error;

/// Result type alias using qrsmith's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrsmith operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generate was requested with blank input
    #[error("Please enter some text or URL")]
    EmptyInput,

    /// Logo file exceeds the configured upload limit
    #[error("Logo is {size} bytes, limit is {limit} bytes")]
    LogoTooLarge {
        /// Size of the rejected file in bytes
        size: u64,
        /// Configured upload limit in bytes
        limit: u64,
    },

    /// Logo bytes are not an image format we can decode
    #[error("Unsupported logo image: {0}")]
    UnsupportedLogo(String),

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// QR code encoding failed
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// SVG markup could not be parsed or rasterized
    #[error("SVG error: {0}")]
    Svg(String),

    /// Malformed data URI
    #[error("Invalid data URI: {0}")]
    DataUri(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

// Implement From conversions for common error types

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::DataUri(format!("base64 decode error: {}", e))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::Other(format!("Background task failed: {}", e))
    }
}
