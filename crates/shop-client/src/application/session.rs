//! Session use case: log in, log out.
//!
//! Logging in stores the credential returned by `/auth/login` and opens the
//! realtime channel for the returned user.  Logging out is the reverse.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shop_core::domain::routes::endpoints;
use shop_core::{ApiResponse, Credential};
use tracing::{info, warn};

use crate::application::connection_manager::{ChannelState, ConnectionManager};
use crate::application::request_client::RequestClient;

/// Shown when the server rejects a login without saying why.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginPayload {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    user: Option<UserSummary>,
    #[serde(default)]
    suggest_enter_otp: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
struct UserSummary {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    LoggedIn {
        user_id: String,
        channel: ChannelState,
    },
    /// The account exists but must be confirmed with a one-time code first.
    OtpRequired { message: String },
    Rejected { message: String },
}

pub struct SessionService {
    client: Arc<RequestClient>,
    connection: Arc<ConnectionManager>,
}

impl SessionService {
    pub fn new(client: Arc<RequestClient>, connection: Arc<ConnectionManager>) -> Self {
        Self { client, connection }
    }

    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let response: ApiResponse<LoginPayload> = self
            .client
            .post(endpoints::LOGIN, &LoginRequest { email, password })
            .await;
        let message = response.message_or(LOGIN_FAILED_MESSAGE).to_string();

        let payload = match response.data {
            Some(payload) if response.success => payload,
            Some(payload) if payload.suggest_enter_otp == Some(true) => {
                info!(email, "login requires OTP confirmation");
                return LoginOutcome::OtpRequired { message };
            }
            _ => {
                warn!(email, "login rejected: {message}");
                return LoginOutcome::Rejected { message };
            }
        };

        let (Some(token), Some(user)) = (payload.token.filter(|t| !t.is_empty()), payload.user)
        else {
            warn!(email, "login response carried no token or user");
            return LoginOutcome::Rejected {
                message: LOGIN_FAILED_MESSAGE.to_string(),
            };
        };

        let mut credential = Credential::new(token);
        credential.refresh_token = payload.refresh_token;
        if let Err(e) = self.client.credentials().set(credential).await {
            warn!("credential not persisted: {e}");
        }

        info!(user_id = %user.id, "logged in");
        let channel = self.connection.open(&user.id).await;
        LoginOutcome::LoggedIn {
            user_id: user.id,
            channel,
        }
    }

    /// Attaches the channel to an already authenticated user.
    pub async fn resume(&self, user_id: &str) -> ChannelState {
        self.connection.open(user_id).await
    }

    pub async fn logout(&self, user_id: &str) {
        self.connection.close(user_id).await;
        if let Err(e) = self.client.credentials().clear().await {
            warn!("credential not cleared: {e}");
        }
        info!(user_id, "logged out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::connection_manager::{ChannelTransport, ConnectionConfig};
    use crate::application::event_bus::EventBus;
    use crate::application::request_client::{
        CredentialStore, HttpResponse, MockHttpTransport, RequestClientConfig,
    };
    use crate::infrastructure::socket::mock::MockChannelTransport;
    use crate::infrastructure::storage::credentials::MemoryCredentialStore;
    use shop_core::OutboundEvent;

    struct Fixture {
        session: SessionService,
        store: Arc<MemoryCredentialStore>,
        channel: Arc<MockChannelTransport>,
        connection: Arc<ConnectionManager>,
    }

    fn fixture(status: u16, body: &'static str) -> Fixture {
        let mut http = MockHttpTransport::new();
        http.expect_execute()
            .withf(|req| req.url.ends_with("/auth/login"))
            .times(1)
            .returning(move |_| Ok(HttpResponse::new(status, body)));
        let store = Arc::new(MemoryCredentialStore::default());
        let client = Arc::new(RequestClient::new(
            RequestClientConfig::new("http://api.test/api/v1"),
            Arc::new(http),
            Arc::clone(&store) as Arc<dyn CredentialStore>,
        ));
        let channel = Arc::new(MockChannelTransport::new());
        let connection = Arc::new(ConnectionManager::new(
            Arc::clone(&channel) as Arc<dyn ChannelTransport>,
            Arc::new(EventBus::new()),
            ConnectionConfig::default(),
        ));
        Fixture {
            session: SessionService::new(client, Arc::clone(&connection)),
            store,
            channel,
            connection,
        }
    }

    #[tokio::test]
    async fn test_login_stores_credential_and_opens_channel() {
        // Arrange
        let fx = fixture(
            200,
            r#"{"data":{"token":"acc-1","refreshToken":"ref-1","user":{"_id":"u42"}}}"#,
        );

        // Act
        let outcome = fx.session.login("a@b.c", "pw").await;

        // Assert
        assert!(matches!(outcome, LoginOutcome::LoggedIn { ref user_id, .. } if user_id == "u42"));
        assert_eq!(
            fx.store.get().await.unwrap(),
            Some(Credential::new("acc-1").with_refresh_token("ref-1"))
        );
        assert_eq!(fx.connection.state().identity(), Some("u42"));
        let link = fx.channel.last_link().unwrap();
        assert!(matches!(&link.sent()[0], OutboundEvent::RegisterUser(b) if b.user_id == "u42"));
    }

    #[tokio::test]
    async fn test_login_with_otp_hint_requires_confirmation() {
        let fx = fixture(
            403,
            r#"{"message":"Account not verified","suggestEnterOtp":true}"#,
        );

        let outcome = fx.session.login("a@b.c", "pw").await;

        assert_eq!(
            outcome,
            LoginOutcome::OtpRequired {
                message: "Account not verified".into()
            }
        );
        assert_eq!(fx.channel.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_rejected_login_leaves_store_and_channel_untouched() {
        let fx = fixture(401, r#"{"message":"Wrong password"}"#);

        let outcome = fx.session.login("a@b.c", "bad").await;

        assert_eq!(
            outcome,
            LoginOutcome::Rejected {
                message: "Wrong password".into()
            }
        );
        assert_eq!(fx.store.get().await.unwrap(), None);
        assert_eq!(fx.channel.connect_count(), 0);
    }

    #[tokio::test]
    async fn test_logout_closes_channel_and_clears_credential() {
        let fx = fixture(200, r#"{"token":"acc-1","user":{"_id":"u42"}}"#);
        fx.session.login("a@b.c", "pw").await;

        fx.session.logout("u42").await;

        assert_eq!(fx.connection.state(), ChannelState::Disconnected);
        assert_eq!(fx.store.get().await.unwrap(), None);
        assert!(fx.channel.last_link().unwrap().is_closed());
    }
}
