//! Event types exchanged on the realtime channel.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::order::OrderState;
use crate::protocol::codec::ProtocolError;

// ── Event names ───────────────────────────────────────────────────────────────

/// Server → client: handshake acknowledgement carrying the connection id.
pub const CONNECT_EVENT: &str = "connect";
/// Client → server: bind this connection to a user.
pub const REGISTER_USER_EVENT: &str = "registerUser";
/// Client → server: unbind this connection from a user.
pub const UNREGISTER_USER_EVENT: &str = "unregisterUser";
/// Server → client: an order changed status.
pub const ORDER_STATUS_CHANGED_EVENT: &str = "orderStatusChanged";

// ── Frame ─────────────────────────────────────────────────────────────────────

/// One JSON text frame: an event name plus an arbitrary JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl ChannelFrame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Payload of the server's `connect` frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectAck {
    pub socket_id: String,
}

impl ConnectAck {
    /// Extracts the acknowledgement from a frame.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::KindMismatch`] if the frame is not a `connect` frame,
    /// [`ProtocolError::InvalidPayload`] if it lacks a `socketId`.
    pub fn from_frame(frame: &ChannelFrame) -> Result<Self, ProtocolError> {
        if frame.event != CONNECT_EVENT {
            return Err(ProtocolError::KindMismatch {
                expected: CONNECT_EVENT.to_string(),
                actual: frame.event.clone(),
            });
        }
        serde_json::from_value(frame.data.clone()).map_err(|e| ProtocolError::InvalidPayload {
            kind: CONNECT_EVENT.to_string(),
            reason: e.to_string(),
        })
    }
}

// ── Outbound ──────────────────────────────────────────────────────────────────

/// Identity ↔ connection binding sent in register/unregister events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBinding {
    pub user_id: String,
    pub socket_id: String,
}

/// Events the client sends to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    RegisterUser(UserBinding),
    UnregisterUser(UserBinding),
    /// Any other application event.
    Custom { kind: String, payload: Value },
}

impl OutboundEvent {
    pub fn register(user_id: impl Into<String>, socket_id: impl Into<String>) -> Self {
        OutboundEvent::RegisterUser(UserBinding {
            user_id: user_id.into(),
            socket_id: socket_id.into(),
        })
    }

    pub fn unregister(user_id: impl Into<String>, socket_id: impl Into<String>) -> Self {
        OutboundEvent::UnregisterUser(UserBinding {
            user_id: user_id.into(),
            socket_id: socket_id.into(),
        })
    }

    /// Event name on the wire.
    pub fn kind(&self) -> &str {
        match self {
            OutboundEvent::RegisterUser(_) => REGISTER_USER_EVENT,
            OutboundEvent::UnregisterUser(_) => UNREGISTER_USER_EVENT,
            OutboundEvent::Custom { kind, .. } => kind,
        }
    }

    pub fn into_frame(self) -> ChannelFrame {
        match self {
            OutboundEvent::RegisterUser(b) => ChannelFrame::new(
                REGISTER_USER_EVENT,
                json!({ "userId": b.user_id, "socketId": b.socket_id }),
            ),
            OutboundEvent::UnregisterUser(b) => ChannelFrame::new(
                UNREGISTER_USER_EVENT,
                json!({ "userId": b.user_id, "socketId": b.socket_id }),
            ),
            OutboundEvent::Custom { kind, payload } => ChannelFrame::new(kind, payload),
        }
    }
}

// ── Inbound ───────────────────────────────────────────────────────────────────

/// An event received from the server.  Immutable once received.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub kind: String,
    pub payload: Value,
}

impl InboundEvent {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Decodes the payload as the typed event `E`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::KindMismatch`] when `self.kind != E::KIND`, or
    /// [`ProtocolError::InvalidPayload`] when the payload does not fit `E`.
    pub fn decode<E: ChannelEvent>(&self) -> Result<E, ProtocolError> {
        if self.kind != E::KIND {
            return Err(ProtocolError::KindMismatch {
                expected: E::KIND.to_string(),
                actual: self.kind.clone(),
            });
        }
        serde_json::from_value(self.payload.clone()).map_err(|e| ProtocolError::InvalidPayload {
            kind: self.kind.clone(),
            reason: e.to_string(),
        })
    }
}

impl From<ChannelFrame> for InboundEvent {
    fn from(frame: ChannelFrame) -> Self {
        Self {
            kind: frame.event,
            payload: frame.data,
        }
    }
}

/// A typed inbound event with a fixed wire name.
pub trait ChannelEvent: DeserializeOwned {
    const KIND: &'static str;
}

/// `orderStatusChanged {orderId, status}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChanged {
    pub order_id: String,
    pub status: String,
}

impl OrderStatusChanged {
    /// Parsed status, if the client knows it.
    pub fn state(&self) -> Option<OrderState> {
        self.status.parse().ok()
    }
}

impl ChannelEvent for OrderStatusChanged {
    const KIND: &'static str = ORDER_STATUS_CHANGED_EVENT;
}

// ── Tests ─────────────────────────────────────────────────────────────────────
