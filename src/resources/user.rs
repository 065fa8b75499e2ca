use std::sync::Arc;

use serde_json::Value;

use crate::connection::{Connection, RequestOptions};
use crate::error::Result;
use crate::http::{HttpClient, ReqwestClient};

use super::take_data;

/// User profile operations.
pub struct Users<H: HttpClient = ReqwestClient> {
    connection: Arc<Connection<H>>,
}

impl<H: HttpClient> Users<H> {
    pub(crate) fn new(connection: Arc<Connection<H>>) -> Self {
        Self { connection }
    }

    /// Gets the authenticated user's full profile object.
    pub async fn get(&self) -> Result<Value> {
        let body = self.connection.get("user", RequestOptions::new()).await?;
        Ok(take_data(body))
    }

    /// Gets the gear items purchasable with gold.
    pub async fn get_buyable_gear(&self) -> Result<Value> {
        let body = self
            .connection
            .get("user/inventory/buy", RequestOptions::new())
            .await?;
        Ok(take_data(body))
    }
}
