use std::sync::Arc;

use serde_json::Value;

use crate::connection::{Connection, RequestOptions};
use crate::error::{Error, Result};
use crate::http::{HttpClient, ReqwestClient};

use super::take_data;

/// Group chat operations.
pub struct Chat<H: HttpClient = ReqwestClient> {
    connection: Arc<Connection<H>>,
}

impl<H: HttpClient> Chat<H> {
    pub(crate) fn new(connection: Arc<Connection<H>>) -> Self {
        Self { connection }
    }

    /// Posts a chat message to a group, returning the created message.
    /// The body must carry a `message` field.
    pub async fn post(&self, group_id: &str, message_body: Value) -> Result<Value> {
        if group_id.is_empty() {
            return Err(Error::missing_argument("Group Id is required"));
        }
        if message_body.get("message").is_none() {
            return Err(Error::missing_argument("Message is a required param"));
        }

        let body = self
            .connection
            .post(
                &format!("groups/{group_id}/chat"),
                RequestOptions::new().send(message_body),
            )
            .await?;

        let mut data = take_data(body);
        Ok(match data.get_mut("message") {
            Some(message) => message.take(),
            None => data,
        })
    }
}
