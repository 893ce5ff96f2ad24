//! The backend's reversible id encoding: base64 over the decimal string.
//!
//! Records expose it as `encrypted_id`. The codec stays inside this crate;
//! domain code only ever handles the numeric ids.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdCodecError {
    #[error("id is not valid base64: {0}")]
    NotBase64(#[from] base64::DecodeError),
    #[error("decoded id is not UTF-8 text")]
    NotUtf8,
    #[error("decoded id `{0}` is not a number")]
    NotNumeric(String),
}

pub fn encode_id(id: i64) -> String {
    STANDARD.encode(id.to_string())
}

pub fn decode_id(encoded: &str) -> Result<i64, IdCodecError> {
    let bytes = STANDARD.decode(encoded)?;
    let text = String::from_utf8(bytes).map_err(|_| IdCodecError::NotUtf8)?;
    text.parse().map_err(|_| IdCodecError::NotNumeric(text))
}
