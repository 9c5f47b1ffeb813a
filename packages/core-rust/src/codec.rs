//! Document codec: the wire encoding used for request and response bodies.
//!
//! The rest of the crate treats the encoding as opaque: callers pick a
//! [`Codec`] and only ever see `encode`/`decode`. `MsgPack` output uses
//! `rmp_serde::to_vec_named()` so structs keep their field names.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Errors produced while encoding or decoding a wire document.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("msgpack encode: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),
    #[error("msgpack decode: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
    #[error("unknown codec: {0}")]
    UnknownFormat(String),
}

/// Wire format for request and response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Codec {
    /// `application/json`.
    #[default]
    Json,
    /// `application/msgpack`.
    MsgPack,
}

impl Codec {
    /// The `Content-Type` / `Accept` header value for this format.
    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::MsgPack => "application/msgpack",
        }
    }

    /// Encodes `value` into bytes.
    ///
    /// # Errors
    ///
    /// Returns `CodecError` if the value cannot be represented in this format.
    /// JSON refuses `Value::Bytes` and non-finite floats instead of sending
    /// a number array or `null` in their place.
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Json => Ok(serde_json::to_vec(value)?),
            Self::MsgPack => Ok(rmp_serde::to_vec_named(value)?),
        }
    }

    /// Decodes `bytes` into `T`.
    ///
    /// # Errors
    ///
    /// Returns `CodecError` if `bytes` is malformed or does not match `T`.
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T, CodecError> {
        match self {
            Self::Json => Ok(serde_json::from_slice(bytes)?),
            Self::MsgPack => Ok(rmp_serde::from_slice(bytes)?),
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::MsgPack => f.write_str("msgpack"),
        }
    }
}

impl FromStr for Codec {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "msgpack" | "messagepack" => Ok(Self::MsgPack),
            other => Err(CodecError::UnknownFormat(other.to_string())),
        }
    }
}
