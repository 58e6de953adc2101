//! Wire codec subsystem.
//!
//! # Data Flow
//! ```text
//! request body bytes + negotiated Format
//!     → protobuf.rs (prost binary decode)      | json.rs (parse → camelCase keys → bind)
//!     → typed message
//!
//! typed message + request Format
//!     → protobuf.rs (prost binary encode)      | json.rs (compact serde_json)
//!     → response body bytes
//! ```
//!
//! # Design Decisions
//! - Exactly two formats; the content type is owned by `Format`
//! - Only the media-type token is compared, parameters are ignored
//! - Pure transforms, no I/O

pub mod json;
pub mod protobuf;

use std::fmt;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONTENT_TYPE_PROTOBUF: &str = "application/protobuf";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// A shape that can travel in either wire format.
///
/// Implemented for every type deriving both `prost::Message` and serde.
pub trait Message:
    prost::Message + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> Message for T where
    T: prost::Message + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Serialization format of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Protobuf,
    Json,
}

impl Format {
    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Protobuf => CONTENT_TYPE_PROTOBUF,
            Format::Json => CONTENT_TYPE_JSON,
        }
    }

    /// Select a format from a `Content-Type` header value.
    ///
    /// `application/json; charset=utf-8` selects JSON.
    pub fn from_content_type(value: &str) -> Option<Format> {
        let media_type = value.split(';').next().unwrap_or_default().trim();
        if media_type.eq_ignore_ascii_case(CONTENT_TYPE_PROTOBUF) {
            Some(Format::Protobuf)
        } else if media_type.eq_ignore_ascii_case(CONTENT_TYPE_JSON) {
            Some(Format::Json)
        } else {
            None
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Protobuf => f.write_str("protobuf"),
            Format::Json => f.write_str("json"),
        }
    }
}

/// Errors raised while transcoding a body.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid protobuf: {0}")]
    Protobuf(#[from] prost::DecodeError),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encode a message in the given format.
pub fn encode<M: Message>(message: &M, format: Format) -> Result<Bytes, CodecError> {
    match format {
        Format::Protobuf => Ok(protobuf::encode(message)),
        Format::Json => json::encode(message),
    }
}

/// Decode a message from bytes in the given format.
pub fn decode<M: Message>(bytes: &[u8], format: Format) -> Result<M, CodecError> {
    match format {
        Format::Protobuf => protobuf::decode(bytes),
        Format::Json => json::decode(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haberdasher::{Hat, Size};

    #[test]
    fn test_content_type_selection() {
        assert_eq!(Format::from_content_type("application/protobuf"), Some(Format::Protobuf));
        assert_eq!(Format::from_content_type("application/json"), Some(Format::Json));
        assert_eq!(
            Format::from_content_type("application/json; charset=utf-8"),
            Some(Format::Json)
        );
        assert_eq!(Format::from_content_type("Application/JSON"), Some(Format::Json));
        assert_eq!(Format::from_content_type("image/png"), None);
        assert_eq!(Format::from_content_type("application/x-protobuf"), None);
        assert_eq!(Format::from_content_type("text/json"), None);
        assert_eq!(Format::from_content_type(""), None);
    }

    #[test]
    fn test_round_trip_both_formats() {
        let hat = Hat {
            size: 42,
            color: "red".into(),
            name: "fancy hat".into(),
        };
        for format in [Format::Protobuf, Format::Json] {
            let bytes = encode(&hat, format).unwrap();
            let decoded: Hat = decode(&bytes, format).unwrap();
            assert_eq!(decoded, hat, "{format}");
        }
    }

    fn edge_hats() -> Vec<Hat> {
        vec![
            Hat::default(),
            Hat {
                size: i32::MIN,
                color: String::new(),
                name: "🎩 \"q\"\n\t\\ é".into(),
            },
            Hat {
                size: i32::MAX,
                color: "\u{0}".into(),
                name: "x".repeat(10_000),
            },
            Hat {
                size: -1,
                color: "{\"inches\":1}".into(),
                name: "帽子".into(),
            },
        ]
    }

    #[test]
    fn test_round_trip_edge_values() {
        for format in [Format::Protobuf, Format::Json] {
            for hat in edge_hats() {
                let bytes = encode(&hat, format).unwrap();
                let decoded: Hat = decode(&bytes, format).unwrap();
                assert_eq!(decoded, hat, "{format}");
            }
            for inches in [0, 1, -1, i32::MIN, i32::MAX] {
                let size = Size { inches };
                let bytes = encode(&size, format).unwrap();
                assert_eq!(decode::<Size>(&bytes, format).unwrap(), size, "{format}");
            }
        }
    }

    #[test]
    fn test_default_message_encodes_empty() {
        assert!(encode(&Hat::default(), Format::Protobuf).unwrap().is_empty());
        let json = encode(&Hat::default(), Format::Json).unwrap();
        assert_eq!(&json[..], br#"{"size":0,"color":"","name":""}"#);
    }

    #[test]
    fn test_decode_failures() {
        assert!(matches!(
            decode::<Size>(b"{not json", Format::Json),
            Err(CodecError::Json(_))
        ));
        // field 1 declared as varint but truncated
        assert!(matches!(
            decode::<Size>(&[0x08], Format::Protobuf),
            Err(CodecError::Protobuf(_))
        ));
    }

    #[test]
    fn test_format_config_names() {
        let format: Format = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, Format::Json);
        assert_eq!(Format::default(), Format::Protobuf);
    }
}
