use std::sync::Arc;

use serde_json::Value;

use crate::connection::{Connection, RequestOptions};
use crate::error::{Error, Result};
use crate::http::{HttpClient, ReqwestClient};

use super::take_data;

/// Game content lookup: items, quests, pets, and the user model paths.
pub struct Content<H: HttpClient = ReqwestClient> {
    connection: Arc<Connection<H>>,
}

impl<H: HttpClient> Content<H> {
    pub(crate) fn new(connection: Arc<Connection<H>>) -> Self {
        Self { connection }
    }

    /// Gets the content object, or a portion of it addressed by a
    /// dot-separated path such as `gear.tree.weapon.warrior`.
    pub async fn get(&self, path: Option<&str>) -> Result<Value> {
        let content = self.fetch().await?;

        match path {
            Some(path) => match lookup(&content, path) {
                Some(nested) => Ok(nested.clone()),
                None => Err(Error::InvalidAction(format!(
                    "{path} is not a valid content path"
                ))),
            },
            None => Ok(content),
        }
    }

    /// Gets the keys of the content object, or of the portion addressed
    /// by a dot-separated path.
    pub async fn get_keys(&self, path: Option<&str>) -> Result<Vec<String>> {
        let content = self.fetch().await?;

        let target = match path {
            Some(path) => lookup(&content, path).ok_or_else(|| {
                Error::InvalidAction(format!("{path} is not a valid content path"))
            })?,
            None => &content,
        };

        Ok(keys_of(target))
    }

    /// Gets the flattened set of valid paths into a user object.
    pub async fn get_user_paths(&self) -> Result<Value> {
        let body = self
            .connection
            .get("models/user/paths", RequestOptions::new())
            .await?;
        Ok(take_data(body))
    }

    async fn fetch(&self) -> Result<Value> {
        let body = self.connection.get("content", RequestOptions::new()).await?;
        Ok(take_data(body))
    }
}

/// Walks a dot-separated path through nested objects. Array elements are
/// addressable by index.
fn lookup<'a>(content: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(content, |value, key| {
        value
            .get(key)
            .or_else(|| key.parse::<usize>().ok().and_then(|index| value.get(index)))
    })
}

fn keys_of(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) => map.keys().cloned().collect(),
        Value::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
        _ => Vec::new(),
    }
}
