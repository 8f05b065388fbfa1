//! `reqwest` implementation of [`HttpTransport`].
//!
//! Every HTTP status comes back as `Ok`; only failures that produced no
//! response at all (DNS, refused connection, timeout) are errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use shop_core::HttpMethod;
use tracing::debug;

use crate::application::request_client::{HttpRequest, HttpResponse, HttpTransport, TransportError};

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Builds a client with an optional whole-request timeout.  `None`
    /// keeps reqwest's default, which never times out on its own.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Other`] if the TLS backend fails to initialise.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self { client })
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn classify(url: &str, error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        TransportError::Connect {
            url: url.to_string(),
            reason: error.to_string(),
        }
    } else {
        TransportError::Other(error.to_string())
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method: verb,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method(verb), url.as_str());
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| classify(&url, e))?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| classify(&url, e))?;
        debug!(%verb, %url, status, len = bytes.len(), "http exchange");

        Ok(HttpResponse::new(status, bytes.to_vec()))
    }
}
