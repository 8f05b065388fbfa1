//! shop-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does shop-client do? (for beginners)
//!
//! It is the non-visual half of the shop's mobile app: everything that
//! happens between the backend and the screens.
//!
//! 1. Every REST call goes through the [`RequestClient`], which attaches the
//!    bearer token on protected routes and silently refreshes an expired one.
//! 2. After login the [`ConnectionManager`] opens the realtime channel and
//!    registers the user so the server can push `orderStatusChanged` events.
//! 3. Each order update becomes an OS notification through the
//!    [`NotificationPresenter`] and a short in-app message through the
//!    [`MessageQueue`], which shows messages strictly one at a time.
//!
//! [`RequestClient`]: application::request_client::RequestClient
//! [`ConnectionManager`]: application::connection_manager::ConnectionManager
//! [`NotificationPresenter`]: application::notification_presenter::NotificationPresenter
//! [`MessageQueue`]: application::message_queue::MessageQueue

/// Application layer: use cases and the traits adapters implement.
pub mod application;

/// Infrastructure layer: HTTP, WebSocket, storage and presentation adapters.
pub mod infrastructure;
