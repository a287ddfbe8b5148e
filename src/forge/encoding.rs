//! forge::encoding
//!
//! Binary-safe encoding of file content into the forge's blob payload form.
//!
//! The forge accepts blob content as base64 over raw bytes. Content here is
//! always UTF-8 text, so encoding goes text -> UTF-8 bytes -> base64. A
//! direct character-to-base64 encoding would corrupt any non-ASCII content;
//! the UTF-8 step is the invariant this module exists to hold.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use super::traits::BlobPayload;

/// Encoding marker the forge expects alongside base64 content.
pub const BASE64_ENCODING: &str = "base64";

/// Errors from decoding a blob payload back into text.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// The payload content is not valid base64.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded bytes are not valid UTF-8.
    #[error("decoded bytes are not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Encode file content into a forge blob payload.
pub fn to_blob_payload(content: &str) -> BlobPayload {
    BlobPayload {
        content: STANDARD.encode(content.as_bytes()),
        encoding: BASE64_ENCODING,
    }
}

/// Decode a blob payload back into text.
///
/// Inverse of [`to_blob_payload`]; used to verify the round-trip property.
///
/// # Errors
///
/// Fails if the payload is not valid base64 or the decoded bytes are not
/// valid UTF-8.
pub fn decode_blob_payload(payload: &BlobPayload) -> Result<String, EncodingError> {
    let bytes = STANDARD.decode(&payload.content)?;
    Ok(String::from_utf8(bytes)?)
}
