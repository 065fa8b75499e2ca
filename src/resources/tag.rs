use std::sync::Arc;

use serde_json::Value;

use crate::connection::{Connection, RequestOptions};
use crate::error::{Error, Result};
use crate::http::{HttpClient, ReqwestClient};

use super::take_data;

/// Tag operations.
pub struct Tags<H: HttpClient = ReqwestClient> {
    connection: Arc<Connection<H>>,
}

impl<H: HttpClient> Tags<H> {
    pub(crate) fn new(connection: Arc<Connection<H>>) -> Self {
        Self { connection }
    }

    /// Gets all of the user's tags, or a single tag by id.
    pub async fn get(&self, id: Option<&str>) -> Result<Value> {
        let path = match id {
            Some(id) => format!("user/tags/{id}"),
            None => "user/tags".to_string(),
        };

        let body = self.connection.get(&path, RequestOptions::new()).await?;
        Ok(take_data(body))
    }

    /// Creates a new tag.
    pub async fn post(&self, tag_body: Value) -> Result<Value> {
        let body = self
            .connection
            .post("user/tags", RequestOptions::new().send(tag_body))
            .await?;
        Ok(take_data(body))
    }

    /// Updates an existing tag.
    pub async fn put(&self, id: &str, tag_body: Value) -> Result<Value> {
        if id.is_empty() {
            return Err(Error::missing_argument("Tag id is required"));
        }
        if tag_body.is_null() {
            return Err(Error::missing_argument("Tag body is required"));
        }

        let body = self
            .connection
            .put(&format!("user/tags/{id}"), RequestOptions::new().send(tag_body))
            .await?;
        Ok(take_data(body))
    }

    /// Deletes an existing tag, returning the remaining tags.
    pub async fn del(&self, id: &str) -> Result<Value> {
        if id.is_empty() {
            return Err(Error::missing_argument("Tag id is required"));
        }

        let body = self
            .connection
            .del(&format!("user/tags/{id}"), RequestOptions::new())
            .await?;
        Ok(take_data(body))
    }
}
