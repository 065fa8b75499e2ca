//! HTTP transport abstraction.
//!
//! This module provides a trait-based HTTP client that can be easily
//! mocked for testing. The trait deals in whole requests and responses;
//! everything Habitica-specific (auth headers, error mapping) lives in
//! [`crate::Connection`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;

/// A fully built request, ready to dispatch.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    /// JSON body, already assembled. `None` for bodiless requests.
    pub body: Option<serde_json::Value>,
}

/// Response from an HTTP request.
///
/// Error statuses are returned as a response, not an `Err`; the `Err`
/// channel is reserved for transport failures where no response exists.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Returns true if status is in 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).context("Failed to parse JSON response")
    }
}

/// Trait for making HTTP requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Dispatches the request and returns the response, whatever its
    /// status. Fails only when no response was received at all.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Production HTTP client using reqwest.
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new reqwest-based HTTP client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self
            .inner
            .request(request.method, &request.url)
            .headers(request.headers);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.context("Failed to send request")?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
