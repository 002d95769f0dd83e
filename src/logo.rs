//! Logo uploads: raw files in, embedded `data:` images out

use crate::data_uri;
use crate::error::{Error, Result};
use image::DynamicImage;
use std::path::Path;

/// A file picked by the user, not yet validated
#[derive(Debug, Clone)]
pub struct LogoFile {
    /// Display name of the file
    pub name: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl LogoFile {
    /// Wrap in-memory file contents
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a logo from disk
    pub async fn read(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// File size in bytes
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Whether the file is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A logo decoded into an embedded `data:` URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoImage {
    name: String,
    mime: String,
    data_uri: String,
}

impl LogoImage {
    /// Sniff the image format and embed the file as a data URI.
    ///
    /// Fails with [`Error::UnsupportedLogo`] when the bytes are not an image
    /// format `image` knows how to decode.
    pub fn from_file(file: &LogoFile) -> Result<Self> {
        let format = image::guess_format(&file.bytes)
            .map_err(|e| Error::UnsupportedLogo(format!("{}: {e}", file.name)))?;
        if !format.reading_enabled() {
            return Err(Error::UnsupportedLogo(format!(
                "{}: {format:?} decoding is not enabled",
                file.name
            )));
        }
        let mime = format.to_mime_type().to_string();
        let data_uri = data_uri::encode(&mime, &file.bytes);

        Ok(Self {
            name: file.name.clone(),
            mime,
            data_uri,
        })
    }

    /// Original file name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sniffed MIME type
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Embedded representation
    pub fn data_uri(&self) -> &str {
        &self.data_uri
    }
}

/// Decode an embedded raster image.
pub fn decode_data_uri_image(uri: &str) -> Result<DynamicImage> {
    let (_mime, bytes) = data_uri::decode(uri)?;
    Ok(image::load_from_memory(&bytes)?)
}
