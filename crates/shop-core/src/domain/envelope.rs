//! Request and response envelope types shared by every REST call.
//!
//! # The `ApiResponse` envelope
//!
//! Screens never see HTTP status codes, transport errors or raw bodies.  Every
//! call resolves to the same three-field envelope:
//!
//! ```json
//! { "success": true,  "data": {...}, "message": null }
//! { "success": false, "data": null,  "message": "connection error" }
//! ```
//!
//! - `success` is true iff the HTTP status is in the 2xx range.
//! - `data` is the body's `data` field when the body is an object that has
//!   one, otherwise the whole parsed body.  It is populated for failures too,
//!   because some endpoints return hints (e.g. `suggestEnterOtp`) alongside an
//!   error status.
//! - `message` is the server's `message` string when present, otherwise a
//!   local fallback for failures.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Message returned when no HTTP response was received at all.
pub const CONNECTION_ERROR_MESSAGE: &str = "connection error";

/// Message returned when a 2xx payload does not match the expected type.
pub const UNEXPECTED_FORMAT_MESSAGE: &str = "unexpected response format";

/// The HTTP verbs used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request body.
///
/// JSON bodies are serialized by the transport; binary bodies (e.g. an image
/// blob) are sent untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Binary {
        bytes: Vec<u8>,
        /// Overrides the request's `Content-Type` when set.
        content_type: Option<String>,
    },
}

impl RequestBody {
    /// Serializes any `Serialize` value into a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the value cannot be represented as JSON
    /// (e.g. a map with non-string keys).
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(RequestBody::Json)
    }

    /// Wraps raw bytes.
    pub fn binary(bytes: impl Into<Vec<u8>>, content_type: Option<String>) -> Self {
        RequestBody::Binary {
            bytes: bytes.into(),
            content_type,
        }
    }
}

/// Per-request options.
///
/// When `headers` is set it *replaces* the default header set
/// (`Content-Type: application/json`).  The `Authorization` header is still
/// attached according to route classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub headers: Option<Vec<(String, String)>>,
}

impl RequestOptions {
    /// Adds a header, switching from the default header set to a custom one.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(Vec::new)
            .push((name.into(), value.into()));
        self
    }
}

/// Uniform result of every REST call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T = Value> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Envelope for a request that never reached the server.
    pub fn connection_error() -> Self {
        Self::failure(CONNECTION_ERROR_MESSAGE)
    }

    /// Unsuccessful envelope with a local message and no data.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// The message, or `fallback` when the server did not provide one.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}

impl ApiResponse<Value> {
    /// Maps an HTTP status and raw body into the envelope.
    ///
    /// Bodies that are empty or not valid JSON produce `data: None`.
    pub fn from_http(status: u16, body: &[u8]) -> Self {
        let success = (200..300).contains(&status);
        let parsed: Option<Value> = if body.is_empty() {
            None
        } else {
            serde_json::from_slice(body).ok()
        };

        let message = parsed
            .as_ref()
            .and_then(|value| value.get("message"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or_else(|| (!success).then(|| format!("request failed with status {status}")));

        let data = parsed.and_then(|value| match value {
            Value::Object(mut map) if map.contains_key("data") => map.remove("data"),
            other => Some(other),
        });

        Self {
            success,
            data: data.filter(|value| !value.is_null()),
            message,
        }
    }

    /// Decodes the payload into `T`.
    ///
    /// A successful response whose payload does not fit `T` becomes an
    /// unsuccessful one with [`UNEXPECTED_FORMAT_MESSAGE`].  An unsuccessful
    /// response keeps its message and simply drops the payload.
    pub fn decode<T: DeserializeOwned>(self) -> ApiResponse<T> {
        let Some(value) = self.data else {
            return ApiResponse {
                success: self.success,
                data: None,
                message: self.message,
            };
        };

        match serde_json::from_value::<T>(value) {
            Ok(data) => ApiResponse {
                success: self.success,
                data: Some(data),
                message: self.message,
            },
            Err(_) if self.success => ApiResponse::failure(UNEXPECTED_FORMAT_MESSAGE),
            Err(_) => ApiResponse {
                success: false,
                data: None,
                message: self.message,
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
