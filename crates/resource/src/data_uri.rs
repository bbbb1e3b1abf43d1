use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use folio_traits::ResourceError;

/// A decoded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Decodes `data:[<mime>][;base64],<payload>`.
///
/// Without `;base64` the payload is taken verbatim. A missing mime type
/// defaults to `application/octet-stream`.
pub fn decode_data_uri(uri: &str) -> Result<DataUri, ResourceError> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| ResourceError::InvalidFormat("not a data: URI".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ResourceError::InvalidFormat("data: URI has no payload".to_string()))?;

    let mime = header
        .split(';')
        .next()
        .filter(|m| !m.is_empty())
        .unwrap_or("application/octet-stream")
        .to_string();

    let bytes = if header.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        STANDARD
            .decode(payload.trim())
            .map_err(|e| ResourceError::InvalidFormat(format!("bad base64 payload: {}", e)))?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok(DataUri { mime, bytes })
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}
