//! # shop-core
//!
//! Shared types for the Shopfront mobile client's realtime and request
//! pipeline: credentials, route classification, the HTTP response envelope,
//! the order-state vocabulary, queued in-app message types, and the JSON
//! wire protocol spoken over the realtime channel.
//!
//! This crate has zero dependencies on sockets, HTTP clients, timers, or UI
//! frameworks.  Everything that performs I/O lives in `shop-client`.
//!
//! # Architecture overview
//!
//! ```text
//!                 ┌──────────────────────────────┐
//!  screens ─────► │ Resilient Request Client     │ ──► REST API
//!                 └──────────────────────────────┘
//!                 ┌──────────────────────────────┐
//!  login ───────► │ Connection Manager           │ ◄── realtime channel
//!                 └──────────────┬───────────────┘
//!                                │ inbound events
//!                 ┌──────────────┴───────────────┐
//!                 ▼                              ▼
//!        Notification Presenter        Message Queue Presenter
//!          (OS notification)             (in-app banner)
//! ```
//!
//! - **`domain`** – Credentials, open-route classification, request/response
//!   envelope types, order states and the pending-message model.
//! - **`protocol`** – The `{"event": ..., "data": ...}` JSON frames exchanged
//!   on the realtime channel, typed event payloads, and the frame codec.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `shop_core::Credential` instead of `shop_core::domain::credential::Credential`.
pub use domain::credential::Credential;
pub use domain::envelope::{ApiResponse, HttpMethod, RequestBody, RequestOptions};
pub use domain::message::{PendingMessage, PresenterPhase, PresenterState};
pub use domain::order::OrderState;
pub use domain::routes::RouteClassification;
pub use protocol::codec::{decode_frame, encode_frame, ProtocolError};
pub use protocol::events::{ChannelEvent, ChannelFrame, InboundEvent, OrderStatusChanged, OutboundEvent};
