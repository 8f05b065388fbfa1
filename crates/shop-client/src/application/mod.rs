//! Application layer: the client's use cases, independent of any concrete
//! network stack or notification service.

pub mod connection_manager;
pub mod context;
pub mod event_bus;
pub mod message_queue;
pub mod notification_presenter;
pub mod order_updates;
pub mod request_client;
pub mod session;
