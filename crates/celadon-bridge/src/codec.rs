//! The serialization boundary for payloads.
//!
//! Bridge payloads are opaque strings; JSON is a convention layered by the
//! application, not by the protocol. Applications that want typed payloads
//! go through a [`PayloadCodec`] at the call site — the routing core never
//! decodes anything.

use celadon_common::BridgeError;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encodes typed values into opaque payloads and back.
pub trait PayloadCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, BridgeError>;
    fn decode<T: DeserializeOwned>(&self, payload: &str) -> Result<T, BridgeError>;
}

/// The canonical codec: JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl PayloadCodec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, BridgeError> {
        serde_json::to_string(value).map_err(|e| BridgeError::Codec(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, payload: &str) -> Result<T, BridgeError> {
        serde_json::from_str(payload).map_err(|e| BridgeError::Codec(e.to_string()))
    }
}
