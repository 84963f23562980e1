//! Byte-level persistence for [`Try`](crate::Try) and [`Maybe`](crate::Maybe).
//!
//! Successes and `Maybe` values decode to equal values. A failure decodes to
//! a new cause with the same kind and message; decoding a failure whose cause
//! the active classifier judges fatal is rejected.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode value: {0}")]
    Decode(#[source] serde_json::Error),
}

pub fn to_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(value).map_err(CodecError::Encode)
}

pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}
