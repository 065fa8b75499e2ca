use std::sync::Arc;

use serde_json::Value;

use crate::connection::{Connection, ConnectionOptions, OptionsUpdate, Query, RequestOptions};
use crate::error::Result;
use crate::http::{HttpClient, ReqwestClient};
use crate::resources::{Account, Chat, Content, Tags, Tasks, Users};

/// Client for the Habitica v3 API.
///
/// Holds one [`Connection`] shared by every resource-group facade.
/// Generic over the HTTP client implementation, so tests can inject a
/// mock transport.
pub struct Habitica<H: HttpClient = ReqwestClient> {
    connection: Arc<Connection<H>>,
    account: Account<H>,
    content: Content<H>,
    task: Tasks<H>,
    tag: Tags<H>,
    chat: Chat<H>,
    user: Users<H>,
}

impl Habitica<ReqwestClient> {
    /// Creates a client with the default reqwest transport. Credentials
    /// may be omitted and set later, or captured by `register`/`login`.
    pub fn new(options: ConnectionOptions) -> Self {
        Self::with_http_client(options, ReqwestClient::new())
    }
}

impl<H: HttpClient> Habitica<H> {
    /// Creates a client with a custom transport implementation.
    pub fn with_http_client(options: ConnectionOptions, http: H) -> Self {
        let connection = Arc::new(Connection::with_http_client(options, http));

        Self {
            account: Account::new(Arc::clone(&connection)),
            content: Content::new(Arc::clone(&connection)),
            task: Tasks::new(Arc::clone(&connection)),
            tag: Tags::new(Arc::clone(&connection)),
            chat: Chat::new(Arc::clone(&connection)),
            user: Users::new(Arc::clone(&connection)),
            connection,
        }
    }

    pub fn account(&self) -> &Account<H> {
        &self.account
    }

    pub fn content(&self) -> &Content<H> {
        &self.content
    }

    pub fn task(&self) -> &Tasks<H> {
        &self.task
    }

    pub fn tag(&self) -> &Tags<H> {
        &self.tag
    }

    pub fn chat(&self) -> &Chat<H> {
        &self.chat
    }

    pub fn user(&self) -> &Users<H> {
        &self.user
    }

    /// The configured user id, if any.
    pub fn user_id(&self) -> Option<String> {
        self.connection.options().user_id
    }

    /// The configured api token, if any.
    pub fn api_token(&self) -> Option<String> {
        self.connection.options().api_token
    }

    /// The configured endpoint, always with a trailing slash.
    pub fn endpoint(&self) -> String {
        self.connection.options().endpoint
    }

    /// The platform string sent on every request.
    pub fn platform(&self) -> String {
        self.connection.options().platform
    }

    /// Applies a partial credential update; fields not named in the
    /// update keep their current values.
    pub fn set_credentials(&self, update: OptionsUpdate) {
        self.connection.set_options(update);
    }

    /// Registers a new account; see [`Account::register`].
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Value> {
        self.account.register(username, email, password).await
    }

    /// Logs into an existing account; see [`Account::login`].
    pub async fn login(&self, username_or_email: &str, password: &str) -> Result<Value> {
        self.account.login(username_or_email, password).await
    }

    /// Performs a GET request against the API, returning the full parsed
    /// response body.
    pub async fn get(&self, path: &str, query: Option<Query>) -> Result<Value> {
        self.connection.get(path, request_options(None, query)).await
    }

    /// Performs a POST request against the API.
    pub async fn post(&self, path: &str, body: Option<Value>, query: Option<Query>) -> Result<Value> {
        self.connection.post(path, request_options(body, query)).await
    }

    /// Performs a PUT request against the API.
    pub async fn put(&self, path: &str, body: Option<Value>, query: Option<Query>) -> Result<Value> {
        self.connection.put(path, request_options(body, query)).await
    }

    /// Performs a DELETE request against the API.
    pub async fn del(&self, path: &str, body: Option<Value>, query: Option<Query>) -> Result<Value> {
        self.connection.del(path, request_options(body, query)).await
    }
}

fn request_options(body: Option<Value>, query: Option<Query>) -> RequestOptions {
    RequestOptions {
        query,
        send: body,
    }
}
