//! Resilient request client: every REST call in the app goes through here.
//!
//! # What does "resilient" mean here? (for beginners)
//!
//! Callers never see an `Err`.  Whatever happens on the wire (the server is
//! unreachable, returns 500, or rejects an expired token) the caller gets an
//! [`ApiResponse`] with `success: false` and a message.  Screens only ever
//! branch on `response.success`.
//!
//! # Request flow
//!
//! ```text
//! request(path)
//!  ├─ read credential from CredentialStore
//!  ├─ open route?  ── yes ──► no Authorization header
//!  │               └─ no ───► Authorization: Bearer <accessToken>
//!  ├─ send
//!  └─ 401 on a protected route?
//!        └─ refresh once ──ok──► store new credential, retry once, return retry
//!                         └─fail─► return the original 401 as a failure
//! ```
//!
//! Concurrent requests that all receive 401 each run their own refresh; there
//! is no shared refresh lock.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shop_core::domain::routes::endpoints;
use shop_core::{ApiResponse, Credential, HttpMethod, RequestBody, RequestOptions, RouteClassification};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Message returned when a typed helper cannot serialize its body.
pub const INVALID_BODY_MESSAGE: &str = "request body could not be serialized";

const CONTENT_TYPE: &str = "Content-Type";
const AUTHORIZATION: &str = "Authorization";
const JSON_CONTENT_TYPE: &str = "application/json";

// ── Transport seam ────────────────────────────────────────────────────────────

/// A fully prepared HTTP request, ready for the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// First header value whose name matches case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw HTTP response: status plus body bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced an HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("transport failure: {0}")]
    Other(String),
}

/// Sends one HTTP request.  Implemented by `infrastructure::http`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TransportError`] when no HTTP response was received.  Any
    /// HTTP status, including 4xx/5xx, is an `Ok`.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// ── Credential seam ───────────────────────────────────────────────────────────

/// Errors raised by a [`CredentialStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stored credential is unreadable: {0}")]
    Corrupt(String),

    #[error("credential could not be encoded: {0}")]
    Encode(String),
}

/// Asynchronous key-value storage for the current credential.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self) -> Result<Option<Credential>, StoreError>;
    async fn set(&self, credential: Credential) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

// ── Client ────────────────────────────────────────────────────────────────────

/// Static configuration of the request client.
#[derive(Debug, Clone)]
pub struct RequestClientConfig {
    /// Prefix for every path, e.g. `http://host:8082/api/v1`.
    pub base_url: String,
    pub routes: RouteClassification,
}

impl RequestClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            routes: RouteClassification::default(),
        }
    }
}

/// Body of a successful `/auth/refresh` response.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshPayload {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

pub struct RequestClient {
    config: RequestClientConfig,
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialStore>,
}

impl RequestClient {
    pub fn new(
        config: RequestClientConfig,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            config,
            transport,
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// The credential store this client reads from.
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Performs `method path` with an optional body and decodes the payload
    /// into `T`.  Always resolves.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<RequestBody>,
    ) -> ApiResponse<T> {
        self.request_with_options(path, method, body, RequestOptions::default())
            .await
    }

    /// Like [`request`](Self::request) with per-call header overrides.
    pub async fn request_with_options<T: DeserializeOwned>(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<RequestBody>,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        self.request_value(path, method, body.as_ref(), &options)
            .await
            .decode()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResponse<T> {
        self.request(path, HttpMethod::Get, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(path, HttpMethod::Post, body).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_json(path, HttpMethod::Put, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResponse<T> {
        self.request(path, HttpMethod::Delete, None).await
    }

    async fn send_json<T, B>(&self, path: &str, method: HttpMethod, body: &B) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        match RequestBody::json(body) {
            Ok(body) => self.request(path, method, Some(body)).await,
            Err(e) => {
                warn!("{method} {path}: body serialization failed: {e}");
                ApiResponse::failure(INVALID_BODY_MESSAGE)
            }
        }
    }

    /// The untyped pipeline: credential lookup, send, one refresh, one retry.
    async fn request_value(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<&RequestBody>,
        options: &RequestOptions,
    ) -> ApiResponse<Value> {
        let request_id = Uuid::new_v4();
        let open = self.config.routes.is_open(path);

        let credential = match self.credentials.get().await {
            Ok(credential) => credential,
            Err(e) => {
                warn!(%request_id, "credential store read failed, continuing without: {e}");
                None
            }
        };
        let bearer = if open { None } else { credential.as_ref() };

        let request = self.build_request(path, method, body, options, bearer);
        info!(%request_id, "{} {}", request.method, request.url);

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(%request_id, "{method} {path} failed: {e}");
                return ApiResponse::connection_error();
            }
        };
        debug!(%request_id, status = response.status, "{method} {path} answered");

        if response.status == 401 && !open {
            if let Some(renewed) = self.refresh(credential.as_ref()).await {
                let retry = self.build_request(path, method, body, options, Some(&renewed));
                info!(%request_id, "retrying {} {} with refreshed credential", retry.method, retry.url);
                return match self.transport.execute(retry).await {
                    Ok(response) => ApiResponse::from_http(response.status, &response.body),
                    Err(e) => {
                        warn!(%request_id, "retry of {method} {path} failed: {e}");
                        ApiResponse::connection_error()
                    }
                };
            }
        }

        ApiResponse::from_http(response.status, &response.body)
    }

    fn build_request(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<&RequestBody>,
        options: &RequestOptions,
        bearer: Option<&Credential>,
    ) -> HttpRequest {
        let mut headers = match &options.headers {
            Some(custom) => custom.clone(),
            None => vec![(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string())],
        };

        let body = match body {
            None => None,
            Some(RequestBody::Json(value)) => Some(value.to_string().into_bytes()),
            Some(RequestBody::Binary {
                bytes,
                content_type,
            }) => {
                if let Some(content_type) = content_type {
                    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(CONTENT_TYPE));
                    headers.push((CONTENT_TYPE.to_string(), content_type.clone()));
                }
                Some(bytes.clone())
            }
        };

        if let Some(credential) = bearer {
            headers.push((AUTHORIZATION.to_string(), credential.bearer()));
        }

        HttpRequest {
            method,
            url: format!("{}{}", self.config.base_url, path),
            headers,
            body,
        }
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Returns the stored replacement credential, or `None` if refreshing was
    /// impossible or failed for any reason.
    async fn refresh(&self, current: Option<&Credential>) -> Option<Credential> {
        let Some(refresh_token) = current
            .filter(|c| c.can_refresh())
            .and_then(|c| c.refresh_token.as_deref())
        else {
            debug!("access token rejected and no refresh token is stored");
            return None;
        };

        info!("access token rejected; refreshing");
        let request = HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{}", self.config.base_url, endpoints::REFRESH),
            headers: vec![(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string())],
            body: Some(json!({ "refreshToken": refresh_token }).to_string().into_bytes()),
        };

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("token refresh failed: {e}");
                return None;
            }
        };
        if !response.is_success() {
            warn!(status = response.status, "token refresh rejected");
            return None;
        }

        let payload = match parse_refresh_payload(&response.body) {
            Some(payload) => payload,
            None => {
                warn!("token refresh response carried no accessToken");
                return None;
            }
        };

        let renewed = current?.refreshed(payload.access_token, payload.refresh_token);
        if let Err(e) = self.credentials.set(renewed.clone()).await {
            // The retry still uses the new token; the next request will
            // simply refresh again.
            warn!("refreshed credential could not be stored: {e}");
        }
        info!("access token refreshed");
        Some(renewed)
    }
}

/// Accepts `{accessToken}` at the top level or nested under `data`.
fn parse_refresh_payload(body: &[u8]) -> Option<RefreshPayload> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let candidate = match value.get("data") {
        Some(nested) if nested.get("accessToken").is_some() => nested.clone(),
        _ => value,
    };
    serde_json::from_value::<RefreshPayload>(candidate)
        .ok()
        .filter(|p| !p.access_token.is_empty())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::credentials::MemoryCredentialStore;
    use mockall::predicate::function;
    use mockall::Sequence;

    const BASE: &str = "http://api.test/api/v1";

    fn client_with(
        transport: MockHttpTransport,
        credential: Option<Credential>,
    ) -> (RequestClient, Arc<MemoryCredentialStore>) {
        let store = Arc::new(MemoryCredentialStore::new(credential));
        let client = RequestClient::new(
            RequestClientConfig::new(BASE),
            Arc::new(transport),
            Arc::clone(&store) as Arc<dyn CredentialStore>,
        );
        (client, store)
    }

    fn stale() -> Credential {
        Credential::new("stale-access").with_refresh_token("refresh-1")
    }

    // ── Headers and classification ────────────────────────────────────────────

    #[tokio::test]
    async fn test_open_route_never_carries_authorization() {
        // Arrange
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|req| req.header(AUTHORIZATION).is_none() && req.url == format!("{BASE}/product/1"))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"name":"tea"}"#)));
        let (client, _) = client_with(transport, Some(stale()));

        // Act
        let response: ApiResponse = client.get("/product/1").await;

        // Assert
        assert!(response.success);
        assert_eq!(response.data, Some(json!({"name": "tea"})));
    }

    #[tokio::test]
    async fn test_protected_route_carries_bearer_token() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|req| req.header(AUTHORIZATION) == Some("Bearer stale-access"))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "{}")));
        let (client, _) = client_with(transport, Some(stale()));

        let response: ApiResponse = client.get("/order").await;

        assert!(response.success);
    }

    #[tokio::test]
    async fn test_protected_route_without_credential_sends_no_authorization() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|req| req.header(AUTHORIZATION).is_none())
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "{}")));
        let (client, _) = client_with(transport, None);

        let response: ApiResponse = client.get("/cart").await;

        assert!(response.success);
    }

    #[tokio::test]
    async fn test_default_content_type_is_json() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|req| {
                req.header(CONTENT_TYPE) == Some(JSON_CONTENT_TYPE)
                    && req.body.as_deref() == Some(br#"{"email":"a@b.c"}"#.as_slice())
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "{}")));
        let (client, _) = client_with(transport, None);

        let response: ApiResponse = client.post("/auth/login", &json!({"email": "a@b.c"})).await;

        assert!(response.success);
    }

    #[tokio::test]
    async fn test_custom_headers_replace_default_set() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|req| {
                req.header(CONTENT_TYPE).is_none()
                    && req.header("X-Trace") == Some("1")
                    && req.header(AUTHORIZATION) == Some("Bearer stale-access")
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "{}")));
        let (client, _) = client_with(transport, Some(stale()));

        let options = RequestOptions::default().with_header("X-Trace", "1");
        let response: ApiResponse = client
            .request_with_options("/user/me", HttpMethod::Get, None, options)
            .await;

        assert!(response.success);
    }

    #[tokio::test]
    async fn test_binary_body_passes_through_untouched() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|req| {
                req.body.as_deref() == Some([0xFFu8, 0xD8, 0x00].as_slice())
                    && req.header(CONTENT_TYPE) == Some("image/jpeg")
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(201, "{}")));
        let (client, _) = client_with(transport, Some(stale()));

        let body = RequestBody::binary(vec![0xFF, 0xD8, 0x00], Some("image/jpeg".into()));
        let response: ApiResponse = client.request("/user/avatar", HttpMethod::Put, Some(body)).await;

        assert!(response.success);
    }

    // ── Failure mapping ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_transport_failure_maps_to_connection_error() {
        let mut transport = MockHttpTransport::new();
        transport.expect_execute().times(1).returning(|req| {
            Err(TransportError::Connect {
                url: req.url,
                reason: "refused".into(),
            })
        });
        let (client, _) = client_with(transport, None);

        let response: ApiResponse = client.get("/product").await;

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("connection error"));
        assert!(response.data.is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_unsuccessful_with_server_message() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .returning(|_| Ok(HttpResponse::new(500, r#"{"message":"boom"}"#)));
        let (client, _) = client_with(transport, None);

        let response: ApiResponse = client.get("/category").await;

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("boom"));
    }

    // ── Refresh and retry ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_401_refreshes_once_and_retries_once_with_new_token() {
        // Arrange
        let mut seq = Sequence::new();
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .with(function(|r: &HttpRequest| {
                r.url.ends_with("/order") && r.header(AUTHORIZATION) == Some("Bearer stale-access")
            }))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(401, r#"{"message":"expired"}"#)));
        transport
            .expect_execute()
            .with(function(|r: &HttpRequest| {
                r.url.ends_with("/auth/refresh")
                    && r.body.as_deref() == Some(br#"{"refreshToken":"refresh-1"}"#.as_slice())
            }))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"accessToken":"fresh"}"#)));
        transport
            .expect_execute()
            .with(function(|r: &HttpRequest| {
                r.url.ends_with("/order") && r.header(AUTHORIZATION) == Some("Bearer fresh")
            }))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"data":[{"id":"O1"}]}"#)));
        let (client, store) = client_with(transport, Some(stale()));

        // Act
        let response: ApiResponse<Vec<Value>> = client.get("/order").await;

        // Assert
        assert!(response.success);
        assert_eq!(response.data, Some(vec![json!({"id": "O1"})]));
        let stored = store.get().await.unwrap().unwrap();
        assert_eq!(stored.access_token, "fresh");
        assert_eq!(stored.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[tokio::test]
    async fn test_retry_result_is_returned_even_if_it_fails_again() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|r| r.url.ends_with("/order"))
            .times(2)
            .returning(|_| Ok(HttpResponse::new(401, r#"{"message":"still expired"}"#)));
        transport
            .expect_execute()
            .withf(|r| r.url.ends_with("/auth/refresh"))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"accessToken":"fresh"}"#)));
        let (client, _) = client_with(transport, Some(stale()));

        let response: ApiResponse = client.get("/order").await;

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("still expired"));
    }

    #[tokio::test]
    async fn test_refresh_failure_returns_original_401_without_retry() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|r| r.url.ends_with("/order"))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(401, r#"{"message":"expired"}"#)));
        transport
            .expect_execute()
            .withf(|r| r.url.ends_with("/auth/refresh"))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(403, "{}")));
        let (client, store) = client_with(transport, Some(stale()));

        let response: ApiResponse = client.get("/order").await;

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("expired"));
        assert_eq!(store.get().await.unwrap(), Some(stale()));
    }

    #[tokio::test]
    async fn test_refresh_without_access_token_counts_as_failure() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|r| r.url.ends_with("/order"))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(401, "{}")));
        transport
            .expect_execute()
            .withf(|r| r.url.ends_with("/auth/refresh"))
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, r#"{"ok":true}"#)));
        let (client, _) = client_with(transport, Some(stale()));

        let response: ApiResponse = client.get("/order").await;

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("request failed with status 401"));
    }

    #[tokio::test]
    async fn test_401_without_refresh_token_does_not_refresh() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(401, "{}")));
        let (client, _) = client_with(transport, Some(Credential::new("only-access")));

        let response: ApiResponse = client.get("/order").await;

        assert!(!response.success);
    }

    #[tokio::test]
    async fn test_open_route_401_is_not_refreshed() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(401, r#"{"message":"bad password"}"#)));
        let (client, _) = client_with(transport, Some(stale()));

        let response: ApiResponse = client.post("/auth/login", &json!({})).await;

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("bad password"));
    }

    #[tokio::test]
    async fn test_rotated_refresh_token_is_stored() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .withf(|r| r.url.ends_with("/auth/refresh"))
            .returning(|_| {
                Ok(HttpResponse::new(
                    200,
                    r#"{"accessToken":"fresh","refreshToken":"refresh-2"}"#,
                ))
            });
        transport
            .expect_execute()
            .withf(|r| r.header(AUTHORIZATION) == Some("Bearer stale-access"))
            .returning(|_| Ok(HttpResponse::new(401, "{}")));
        transport
            .expect_execute()
            .withf(|r| r.header(AUTHORIZATION) == Some("Bearer fresh"))
            .returning(|_| Ok(HttpResponse::new(204, "")));
        let (client, store) = client_with(transport, Some(stale()));

        let response: ApiResponse = client.delete("/cart/item/1").await;

        assert!(response.success);
        let stored = store.get().await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some("refresh-2"));
    }

    #[tokio::test]
    async fn test_typed_decode_mismatch_is_unexpected_format() {
        let mut transport = MockHttpTransport::new();
        transport
            .expect_execute()
            .returning(|_| Ok(HttpResponse::new(200, r#"{"data":"not a number"}"#)));
        let (client, _) = client_with(transport, None);

        let response: ApiResponse<u32> = client.get("/product/count").await;

        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("unexpected response format"));
    }

    #[test]
    fn test_parse_refresh_payload_accepts_nested_data() {
        let payload = parse_refresh_payload(br#"{"data":{"accessToken":"n"}}"#).unwrap();
        assert_eq!(payload.access_token, "n");
    }

    #[test]
    fn test_parse_refresh_payload_rejects_empty_token() {
        assert!(parse_refresh_payload(br#"{"accessToken":""}"#).is_none());
    }

    #[test]
    fn test_config_trims_trailing_slash() {
        assert_eq!(RequestClientConfig::new("http://h/api/v1/").base_url, "http://h/api/v1");
    }
}
