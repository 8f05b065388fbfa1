//! Fan-out of order updates to both presenters.
//!
//! One `orderStatusChanged` event produces two independent outputs:
//!
//! - an OS notification, displayed on a spawned task so a slow or failing
//!   provider never delays dispatch of the next event;
//! - an in-app message, queued synchronously with the default dwell.
//!
//! A transport drop is also surfaced as an in-app message.

use std::sync::Arc;

use shop_core::{OrderState, OrderStatusChanged};
use tracing::{info, warn};

use crate::application::event_bus::{ConnectionEvent, DisconnectReason, EventBus, Subscription};
use crate::application::message_queue::MessageQueue;
use crate::application::notification_presenter::NotificationPresenter;

pub const ORDER_NOTIFICATION_TITLE: &str = "Order Status Changed";
pub const DISCONNECTED_MESSAGE: &str = "Disconnected from the server";

pub fn notification_body(event: &OrderStatusChanged) -> String {
    format!(
        "Order {} status changed to {}",
        event.order_id, event.status
    )
}

pub fn in_app_text(event: &OrderStatusChanged) -> String {
    format!(
        "Order {} has been updated to {}",
        event.order_id,
        OrderState::describe(&event.status)
    )
}

/// Handles returned by [`register`], for callers that want to detach.
#[derive(Debug, Clone, Copy)]
pub struct OrderUpdateSubscriptions {
    pub order_status: Subscription,
    pub lifecycle: Subscription,
}

/// Wires order updates and disconnect notices into the presenters.
pub fn register(
    bus: &EventBus,
    notifications: Arc<NotificationPresenter>,
    messages: MessageQueue,
) -> OrderUpdateSubscriptions {
    let queue = messages.clone();
    let order_status = bus.on_event::<OrderStatusChanged, _>(move |event| {
        info!(order_id = %event.order_id, status = %event.status, "order status changed");

        let presenter = Arc::clone(&notifications);
        let body = notification_body(&event);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    presenter.display(ORDER_NOTIFICATION_TITLE, &body).await;
                });
            }
            Err(_) => warn!("no runtime; order notification skipped"),
        }

        queue.enqueue_default(in_app_text(&event));
    });

    let lifecycle = bus.on_lifecycle(move |event| {
        if let ConnectionEvent::Disconnected {
            reason: DisconnectReason::TransportError(_),
        } = event
        {
            messages.enqueue_default(DISCONNECTED_MESSAGE);
        }
    });

    OrderUpdateSubscriptions {
        order_status,
        lifecycle,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
