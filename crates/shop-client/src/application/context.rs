//! Application context: the object graph built once at startup.
//!
//! Every adapter is injected through [`AppDependencies`], so the binary
//! passes real transports and tests pass mocks.  Nothing here is global.

use std::sync::Arc;

use crate::application::connection_manager::{
    ChannelTransport, ConnectionConfig, ConnectionManager,
};
use crate::application::event_bus::EventBus;
use crate::application::message_queue::{MessageQueue, MessageSurface, QueueConfig};
use crate::application::notification_presenter::{AlertSink, NotificationPresenter, PushProvider};
use crate::application::order_updates::{self, OrderUpdateSubscriptions};
use crate::application::request_client::{
    CredentialStore, HttpTransport, RequestClient, RequestClientConfig,
};
use crate::application::session::SessionService;

/// Tunables for each component, already resolved from whatever config
/// source the binary reads.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub request_client: RequestClientConfig,
    pub connection: ConnectionConfig,
    pub queue: QueueConfig,
}

/// Adapters the application runs on.
pub struct AppDependencies {
    pub http: Arc<dyn HttpTransport>,
    pub channel: Arc<dyn ChannelTransport>,
    pub credentials: Arc<dyn CredentialStore>,
    pub push: Arc<dyn PushProvider>,
    pub alerts: Arc<dyn AlertSink>,
    pub surface: Arc<dyn MessageSurface>,
}

pub struct AppContext {
    pub client: Arc<RequestClient>,
    pub bus: Arc<EventBus>,
    pub connection: Arc<ConnectionManager>,
    pub notifications: Arc<NotificationPresenter>,
    pub messages: MessageQueue,
    pub session: SessionService,
    pub subscriptions: OrderUpdateSubscriptions,
}

impl AppContext {
    pub fn new(settings: AppSettings, deps: AppDependencies) -> Self {
        let client = Arc::new(RequestClient::new(
            settings.request_client,
            deps.http,
            deps.credentials,
        ));
        let bus = Arc::new(EventBus::new());
        let connection = Arc::new(ConnectionManager::new(
            deps.channel,
            Arc::clone(&bus),
            settings.connection,
        ));
        let notifications = Arc::new(NotificationPresenter::new(deps.push, deps.alerts));
        let messages = MessageQueue::new(settings.queue, deps.surface);

        let subscriptions =
            order_updates::register(&bus, Arc::clone(&notifications), messages.clone());
        let session = SessionService::new(Arc::clone(&client), Arc::clone(&connection));

        Self {
            client,
            bus,
            connection,
            notifications,
            messages,
            session,
            subscriptions,
        }
    }
}
