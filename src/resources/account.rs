use std::sync::Arc;

use serde_json::{json, Value};

use crate::connection::{Connection, OptionsUpdate, RequestOptions};
use crate::error::{Error, Result};
use crate::http::{HttpClient, ReqwestClient};

/// Account operations: registration and login.
///
/// Both methods store the credentials from a successful response on the
/// shared connection, so subsequent requests are authenticated. Any
/// credentials already present are simply replaced.
pub struct Account<H: HttpClient = ReqwestClient> {
    connection: Arc<Connection<H>>,
}

impl<H: HttpClient> Account<H> {
    pub(crate) fn new(connection: Arc<Connection<H>>) -> Self {
        Self { connection }
    }

    /// Registers a new account and stores the new credentials.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Value> {
        if username.is_empty() {
            return Err(Error::missing_argument("username is required"));
        }
        if email.is_empty() {
            return Err(Error::missing_argument("email is required"));
        }
        if password.is_empty() {
            return Err(Error::missing_argument("password is required"));
        }

        let creds = json!({
            "username": username,
            "email": email,
            "password": password,
            "confirmPassword": password,
        });

        let body = self
            .connection
            .post("user/auth/local/register", RequestOptions::new().send(creds))
            .await?;

        self.store_credentials(&body);

        Ok(body)
    }

    /// Logs into an existing account and stores its credentials. The
    /// first argument may be a username or an email address.
    pub async fn login(&self, username_or_email: &str, password: &str) -> Result<Value> {
        if username_or_email.is_empty() {
            return Err(Error::missing_argument("username or email is required"));
        }
        if password.is_empty() {
            return Err(Error::missing_argument("password is required"));
        }

        let creds = json!({
            "username": username_or_email,
            "password": password,
        });

        let body = self
            .connection
            .post("user/auth/local/login", RequestOptions::new().send(creds))
            .await?;

        self.store_credentials(&body);

        Ok(body)
    }

    /// Picks the user id and api token out of a register/login response.
    /// The fields live under `data` on v3, or at the top level on older
    /// deployments; registration reports `_id` where login reports `id`.
    /// When either field is absent the session is left untouched.
    fn store_credentials(&self, body: &Value) {
        let record = body.get("data").unwrap_or(body);

        let user_id = record
            .get("_id")
            .or_else(|| record.get("id"))
            .and_then(Value::as_str);
        let api_token = record.get("apiToken").and_then(Value::as_str);

        if let (Some(user_id), Some(api_token)) = (user_id, api_token) {
            self.connection
                .set_options(OptionsUpdate::new().user_id(user_id).api_token(api_token));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionOptions;
    use crate::http::mock::MockHttpClient;
    use reqwest::Method;

    fn account(mock: MockHttpClient) -> (Account<MockHttpClient>, Arc<Connection<MockHttpClient>>) {
        let connection = Arc::new(Connection::with_http_client(
            ConnectionOptions::new(),
            mock,
        ));
        (Account::new(Arc::clone(&connection)), connection)
    }

    #[tokio::test]
    async fn register_stores_credentials_from_a_flat_body() {
        let mock = MockHttpClient::new().on(
            Method::POST,
            "https://habitica.com/api/v3/user/auth/local/register",
            200,
            r#"{"_id": "u1", "apiToken": "t1"}"#,
        );
        let (account, connection) = account(mock.clone());

        account
            .register("alice", "alice@example.com", "pw")
            .await
            .unwrap();

        let session = connection.options();
        assert_eq!(session.user_id.as_deref(), Some("u1"));
        assert_eq!(session.api_token.as_deref(), Some("t1"));
        assert_eq!(
            mock.only_request().body,
            Some(serde_json::json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "pw",
                "confirmPassword": "pw",
            }))
        );
    }

    #[tokio::test]
    async fn register_stores_credentials_from_an_enveloped_body() {
        let mock = MockHttpClient::new().on(
            Method::POST,
            "https://habitica.com/api/v3/user/auth/local/register",
            200,
            r#"{"success": true, "data": {"_id": "u2", "apiToken": "t2"}}"#,
        );
        let (account, connection) = account(mock);

        account
            .register("bob", "bob@example.com", "pw")
            .await
            .unwrap();

        let session = connection.options();
        assert_eq!(session.user_id.as_deref(), Some("u2"));
        assert_eq!(session.api_token.as_deref(), Some("t2"));
    }

    #[tokio::test]
    async fn register_validates_its_arguments() {
        let (account, _) = account(MockHttpClient::new());

        let err = account.register("", "a@b.c", "pw").await.unwrap_err();
        assert!(matches!(err, Error::MissingArgument(_)));

        let err = account.register("alice", "", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "email is required");

        let err = account.register("alice", "a@b.c", "").await.unwrap_err();
        assert_eq!(err.to_string(), "password is required");
    }

    #[tokio::test]
    async fn register_propagates_api_errors_without_touching_the_session() {
        let mock = MockHttpClient::new().on(
            Method::POST,
            "https://habitica.com/api/v3/user/auth/local/register",
            401,
            r#"{"error": "NotAuthorized", "message": "Username already taken"}"#,
        );
        let (account, connection) = account(mock);

        let err = account
            .register("taken", "a@b.c", "pw")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api { .. }));
        assert_eq!(connection.options().user_id, None);
    }

    #[tokio::test]
    async fn login_accepts_the_id_field() {
        let mock = MockHttpClient::new().on(
            Method::POST,
            "https://habitica.com/api/v3/user/auth/local/login",
            200,
            r#"{"success": true, "data": {"id": "u3", "apiToken": "t3"}}"#,
        );
        let (account, connection) = account(mock.clone());

        account.login("alice", "pw").await.unwrap();

        let session = connection.options();
        assert_eq!(session.user_id.as_deref(), Some("u3"));
        assert_eq!(session.api_token.as_deref(), Some("t3"));
        assert_eq!(
            mock.only_request().body,
            Some(serde_json::json!({"username": "alice", "password": "pw"}))
        );
    }

    #[tokio::test]
    async fn login_replaces_existing_credentials() {
        let mock = MockHttpClient::new().on(
            Method::POST,
            "https://habitica.com/api/v3/user/auth/local/login",
            200,
            r#"{"data": {"id": "new-id", "apiToken": "new-token"}}"#,
        );
        let connection = Arc::new(Connection::with_http_client(
            ConnectionOptions::new()
                .user_id("old-id")
                .api_token("old-token"),
            mock,
        ));
        let account = Account::new(Arc::clone(&connection));

        account.login("alice", "pw").await.unwrap();

        assert_eq!(connection.options().user_id.as_deref(), Some("new-id"));
    }

    #[tokio::test]
    async fn responses_without_credentials_leave_the_session_untouched() {
        let mock = MockHttpClient::new().on(
            Method::POST,
            "https://habitica.com/api/v3/user/auth/local/login",
            200,
            r#"{"success": true, "data": {}}"#,
        );
        let connection = Arc::new(Connection::with_http_client(
            ConnectionOptions::new()
                .user_id("old-id")
                .api_token("old-token"),
            mock,
        ));
        let account = Account::new(Arc::clone(&connection));

        account.login("alice", "pw").await.unwrap();

        let session = connection.options();
        assert_eq!(session.user_id.as_deref(), Some("old-id"));
        assert_eq!(session.api_token.as_deref(), Some("old-token"));
    }
}
