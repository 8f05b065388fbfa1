//! Domain types for the client pipeline.
//!
//! Everything here is plain data plus pure functions: no I/O, no async, no
//! clocks.  The application layer in `shop-client` builds its behaviour on
//! top of these types.

/// Access/refresh token pair.
pub mod credential;

/// HTTP method, request body, options and the `ApiResponse` envelope.
pub mod envelope;

/// Queued in-app messages and the presenter's visible state.
pub mod message;

/// Order status vocabulary used to phrase user-facing messages.
pub mod order;

/// Open-route classification and the API endpoint table.
pub mod routes;
