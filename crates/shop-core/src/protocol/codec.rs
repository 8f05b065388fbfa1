//! Text codec for realtime channel frames.
//!
//! Wire format:
//! ```text
//! {"event": <non-empty string>, "data": <any JSON, optional>}
//! ```
//! A frame without `data` decodes with `data: null`.

use serde_json::Value;
use thiserror::Error;

use crate::protocol::events::ChannelFrame;

/// Errors that can occur while encoding, decoding or interpreting frames.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The text is not a JSON object.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// The object has no usable `event` name.
    #[error("frame has no event name")]
    MissingEvent,

    /// A typed decode was attempted on a frame of another kind.
    #[error("expected event '{expected}', got '{actual}'")]
    KindMismatch { expected: String, actual: String },

    /// The payload does not match the event's schema.
    #[error("invalid payload for '{kind}': {reason}")]
    InvalidPayload { kind: String, reason: String },
}

/// Encodes a frame as a compact JSON string.
///
/// # Errors
///
/// Returns [`ProtocolError::MissingEvent`] if the event name is empty.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use shop_core::protocol::{decode_frame, encode_frame, ChannelFrame};
///
/// let frame = ChannelFrame::new("registerUser", json!({"userId": "u1", "socketId": "s1"}));
/// let text = encode_frame(&frame).unwrap();
/// assert_eq!(decode_frame(&text).unwrap(), frame);
/// ```
pub fn encode_frame(frame: &ChannelFrame) -> Result<String, ProtocolError> {
    if frame.event.is_empty() {
        return Err(ProtocolError::MissingEvent);
    }
    serde_json::to_string(frame).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

/// Decodes one frame from a WebSocket text message.
///
/// # Errors
///
/// [`ProtocolError::Malformed`] for invalid JSON or a non-object value,
/// [`ProtocolError::MissingEvent`] when `event` is absent, empty or not a
/// string.
pub fn decode_frame(text: &str) -> Result<ChannelFrame, ProtocolError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

    let Value::Object(mut map) = value else {
        return Err(ProtocolError::Malformed("frame is not a JSON object".to_string()));
    };

    let event = match map.remove("event") {
        Some(Value::String(name)) if !name.is_empty() => name,
        _ => return Err(ProtocolError::MissingEvent),
    };
    let data = map.remove("data").unwrap_or(Value::Null);

    Ok(ChannelFrame { event, data })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
