//! `data:` URI embedding for images held in memory

use crate::error::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Embed `bytes` as a base64 `data:` URI with the given MIME type.
pub fn encode(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Split a base64 `data:` URI into its MIME type and decoded bytes.
pub fn decode(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::DataUri("missing 'data:' scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::DataUri("missing ',' separator".to_string()))?;
    let mime = header.strip_suffix(";base64").ok_or_else(|| {
        Error::DataUri(format!("only base64 payloads are supported, got '{header}'"))
    })?;

    Ok((mime.to_string(), STANDARD.decode(payload)?))
}
