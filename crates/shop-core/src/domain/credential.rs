//! The authenticated session's token pair.
//!
//! A [`Credential`] is created on login, replaced after a successful token
//! refresh and cleared on logout.  Its persistence belongs to whoever owns
//! the credential store; the request client only reads and writes it through
//! that store.

use serde::{Deserialize, Serialize};

/// Access token plus an optional refresh token.
///
/// Serialized in camelCase (`accessToken`, `refreshToken`) to match the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Credential {
    /// Creates a credential with no refresh token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
        }
    }

    /// Returns a copy with the given refresh token attached.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Whether a refresh can be attempted with this credential.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|token| !token.is_empty())
    }

    /// Builds the credential that replaces `self` after a refresh.
    ///
    /// The refresh token is kept unless the server rotated it.
    pub fn refreshed(&self, access_token: String, rotated_refresh: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token: rotated_refresh.or_else(|| self.refresh_token.clone()),
        }
    }
}
