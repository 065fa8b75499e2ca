//! Credential store and request dispatcher.
//!
//! `Connection` owns the mutable session (user id, api token, endpoint,
//! platform), builds one authenticated request per call, and normalizes
//! every failure into the [`Error`] taxonomy. Nothing is retried; a call
//! either resolves with the parsed body or fails with exactly one error.

use std::sync::{PoisonError, RwLock};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpRequest, HttpResponse, ReqwestClient};

const DEFAULT_ENDPOINT: &str = "https://habitica.com/";
const DEFAULT_PLATFORM: &str = "Habitica-Rust";
const API_PREFIX: &str = "api/v3";

const USER_HEADER: &str = "x-api-user";
const KEY_HEADER: &str = "x-api-key";
const CLIENT_HEADER: &str = "x-client";

/// Query parameters, serialized in order onto the request URL.
pub type Query = Vec<(String, String)>;

/// The mutable session record held by a [`Connection`].
///
/// `user_id` and `api_token` are only useful together: auth headers are
/// attached when both are present and omitted otherwise. `endpoint`
/// always carries a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Option<String>,
    pub api_token: Option<String>,
    pub endpoint: String,
    pub platform: String,
}

/// Construction-time options. Omitted fields fall back to the defaults:
/// the production endpoint and the library's platform string.
#[derive(Debug, Clone, Default)]
pub struct ConnectionOptions {
    pub user_id: Option<String>,
    pub api_token: Option<String>,
    pub endpoint: Option<String>,
    pub platform: Option<String>,
}

impl ConnectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Some(api_token.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }
}

/// One field of an [`OptionsUpdate`]: leave the stored value alone,
/// clear it, or replace it. Distinguishing "absent" from "set to
/// nothing" keeps partial updates unambiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Setting<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T> Setting<T> {
    fn apply(self, slot: &mut Option<T>) {
        match self {
            Setting::Keep => {}
            Setting::Clear => *slot = None,
            Setting::Set(value) => *slot = Some(value),
        }
    }
}

/// A partial session update for [`Connection::set_options`]. Fields
/// default to [`Setting::Keep`], so an empty update changes nothing.
/// Clearing `endpoint` or `platform` restores the compiled-in default.
#[derive(Debug, Clone, Default)]
pub struct OptionsUpdate {
    pub user_id: Setting<String>,
    pub api_token: Setting<String>,
    pub endpoint: Setting<String>,
    pub platform: Setting<String>,
}

impl OptionsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Setting::Set(user_id.into());
        self
    }

    pub fn clear_user_id(mut self) -> Self {
        self.user_id = Setting::Clear;
        self
    }

    pub fn api_token(mut self, api_token: impl Into<String>) -> Self {
        self.api_token = Setting::Set(api_token.into());
        self
    }

    pub fn clear_api_token(mut self) -> Self {
        self.api_token = Setting::Clear;
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Setting::Set(endpoint.into());
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Setting::Set(platform.into());
        self
    }
}

/// Per-request options: a query string and a JSON body. The body is
/// ignored for GET requests.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Option<Query>,
    pub send: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    pub fn send(mut self, body: Value) -> Self {
        self.send = Some(body);
        self
    }
}

/// The error body shape the API uses for 4xx/5xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
    message: String,
}

/// Authenticated request dispatcher for the Habitica v3 API.
///
/// Generic over the HTTP client implementation for testability.
pub struct Connection<H: HttpClient = ReqwestClient> {
    http: H,
    session: RwLock<Session>,
}

impl Connection<ReqwestClient> {
    /// Creates a connection with the default reqwest transport.
    pub fn new(options: ConnectionOptions) -> Self {
        Self::with_http_client(options, ReqwestClient::new())
    }
}

impl<H: HttpClient> Connection<H> {
    /// Creates a connection with a custom transport implementation.
    pub fn with_http_client(options: ConnectionOptions, http: H) -> Self {
        let session = Session {
            user_id: options.user_id,
            api_token: options.api_token,
            endpoint: normalize_endpoint(
                options.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT),
            ),
            platform: options.platform.unwrap_or_else(|| DEFAULT_PLATFORM.to_string()),
        };

        Self {
            http,
            session: RwLock::new(session),
        }
    }

    /// Read-only snapshot of the current session.
    pub fn options(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies a partial update to the session. Requests already in
    /// flight keep the values they were built with; only requests issued
    /// afterwards observe the change.
    pub fn set_options(&self, update: OptionsUpdate) {
        let mut session = self.session.write().unwrap_or_else(PoisonError::into_inner);

        update.user_id.apply(&mut session.user_id);
        update.api_token.apply(&mut session.api_token);

        match update.endpoint {
            Setting::Keep => {}
            Setting::Clear => session.endpoint = DEFAULT_ENDPOINT.to_string(),
            Setting::Set(endpoint) => session.endpoint = normalize_endpoint(&endpoint),
        }
        match update.platform {
            Setting::Keep => {}
            Setting::Clear => session.platform = DEFAULT_PLATFORM.to_string(),
            Setting::Set(platform) => session.platform = platform,
        }
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.request(Method::GET, path, options).await
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.request(Method::POST, path, options).await
    }

    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.request(Method::PUT, path, options).await
    }

    pub async fn del(&self, path: &str, options: RequestOptions) -> Result<Value> {
        self.request(Method::DELETE, path, options).await
    }

    /// Builds and dispatches one request.
    ///
    /// The session is read once here; a concurrent `set_options` call
    /// does not affect a request that has already been built.
    async fn request(&self, method: Method, path: &str, options: RequestOptions) -> Result<Value> {
        let session = self.options();

        let mut url = format!(
            "{}{}/{}",
            session.endpoint,
            API_PREFIX,
            path.trim_start_matches('/')
        );

        if let Some(query) = &options.query {
            append_query(&mut url, query);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let (Some(user_id), Some(api_token)) = (&session.user_id, &session.api_token) {
            headers.insert(USER_HEADER, header_value("user id", user_id)?);
            headers.insert(KEY_HEADER, header_value("api token", api_token)?);
        }

        let platform = header_value("platform", &session.platform)?;
        headers.insert(USER_AGENT, platform.clone());
        headers.insert(CLIENT_HEADER, platform);

        let body = if method == Method::GET {
            None
        } else {
            options.send
        };

        tracing::debug!("{} {}", method, url);

        let request = HttpRequest {
            method,
            url,
            headers,
            body,
        };

        match self.http.send(request).await {
            Ok(response) if response.is_success() => parse_success_body(&response.body),
            Ok(response) => Err(map_error_response(&response)),
            Err(err) => Err(Error::unknown(err)),
        }
    }
}

/// Ensures the endpoint ends with exactly one slash. Idempotent.
fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.ends_with('/') {
        endpoint.to_string()
    } else {
        format!("{endpoint}/")
    }
}

fn append_query(url: &mut String, query: &Query) {
    for (i, (key, value)) in query.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(&urlencoding::encode(key));
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        Error::InvalidAction(format!(
            "{field} contains characters that cannot be sent in an HTTP header"
        ))
    })
}

fn parse_success_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(body).map_err(|err| Error::unknown(err))
}

/// Translates an HTTP error response into the error taxonomy.
///
/// A missing or malformed error body is an anticipated outcome, not a
/// bug: it degrades to `UnknownConnection` with the status and raw body
/// retained for diagnostics.
fn map_error_response(response: &HttpResponse) -> Error {
    match serde_json::from_str::<ApiErrorBody>(&response.body) {
        Ok(body) => Error::Api {
            status: response.status,
            error_type: body.error,
            message: body.message,
        },
        Err(parse_err) => {
            tracing::warn!(
                "HTTP {} response with unparseable error body: {}",
                response.status,
                parse_err
            );
            Error::unknown(anyhow::anyhow!(
                "HTTP {} with unrecognized error body: {}",
                response.status,
                response.body
            ))
        }
    }
}
