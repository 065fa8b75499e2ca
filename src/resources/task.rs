use std::sync::Arc;

use serde_json::Value;

use crate::connection::{Connection, RequestOptions};
use crate::error::{Error, Result};
use crate::http::{HttpClient, ReqwestClient};

use super::take_data;

/// Direction for scoring a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoreDirection {
    #[default]
    Up,
    Down,
}

impl ScoreDirection {
    fn as_str(self) -> &'static str {
        match self {
            ScoreDirection::Up => "up",
            ScoreDirection::Down => "down",
        }
    }
}

/// Task operations: habits, dailys, todos, and rewards.
pub struct Tasks<H: HttpClient = ReqwestClient> {
    connection: Arc<Connection<H>>,
}

impl<H: HttpClient> Tasks<H> {
    pub(crate) fn new(connection: Arc<Connection<H>>) -> Self {
        Self { connection }
    }

    /// Gets all of the user's tasks, or a single task by id.
    pub async fn get(&self, id: Option<&str>) -> Result<Value> {
        let path = match id {
            Some(id) => format!("tasks/{id}"),
            None => "tasks/user".to_string(),
        };

        let body = self.connection.get(&path, RequestOptions::new()).await?;
        Ok(take_data(body))
    }

    /// Gets all of the user's habits.
    pub async fn get_habits(&self) -> Result<Value> {
        self.filter_by_type("habits").await
    }

    /// Gets all of the user's dailys.
    pub async fn get_dailys(&self) -> Result<Value> {
        self.filter_by_type("dailys").await
    }

    /// Gets all of the user's todos.
    pub async fn get_todos(&self) -> Result<Value> {
        self.filter_by_type("todos").await
    }

    /// Gets all of the user's rewards.
    pub async fn get_rewards(&self) -> Result<Value> {
        self.filter_by_type("rewards").await
    }

    /// Scores a task, returning the resulting stats delta. When the id
    /// does not exist the server creates a habit; `body` can customize
    /// the created task's fields.
    pub async fn score(
        &self,
        id: &str,
        direction: ScoreDirection,
        body: Option<Value>,
    ) -> Result<Value> {
        if id.is_empty() {
            return Err(Error::missing_argument("Task id is required"));
        }

        let path = format!("tasks/{id}/score/{}", direction.as_str());
        let mut options = RequestOptions::new();
        if let Some(body) = body {
            options = options.send(body);
        }

        let stats = self.connection.post(&path, options).await?;
        Ok(take_data(stats))
    }

    /// Creates a new task.
    pub async fn post(&self, task_body: Value) -> Result<Value> {
        let body = self
            .connection
            .post("tasks/user", RequestOptions::new().send(task_body))
            .await?;
        Ok(take_data(body))
    }

    /// Updates an existing task.
    pub async fn put(&self, id: &str, task_body: Value) -> Result<Value> {
        if id.is_empty() {
            return Err(Error::missing_argument("Task id is required"));
        }
        if task_body.is_null() {
            return Err(Error::missing_argument("Task body is required"));
        }

        let body = self
            .connection
            .put(&format!("tasks/{id}"), RequestOptions::new().send(task_body))
            .await?;
        Ok(take_data(body))
    }

    /// Deletes an existing task.
    pub async fn del(&self, id: &str) -> Result<Value> {
        if id.is_empty() {
            return Err(Error::missing_argument("Task id is required"));
        }

        let body = self
            .connection
            .del(&format!("tasks/{id}"), RequestOptions::new())
            .await?;
        Ok(take_data(body))
    }

    async fn filter_by_type(&self, task_type: &str) -> Result<Value> {
        let options = RequestOptions::new()
            .query(vec![("type".to_string(), task_type.to_string())]);

        let body = self.connection.get("tasks/user", options).await?;
        Ok(take_data(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ConnectionOptions;
    use crate::http::mock::MockHttpClient;
    use reqwest::Method;
    use serde_json::json;

    fn tasks(mock: MockHttpClient) -> Tasks<MockHttpClient> {
        let connection = Connection::with_http_client(
            ConnectionOptions::new()
                .user_id("myUuid")
                .api_token("myToken"),
            mock,
        );
        Tasks::new(Arc::new(connection))
    }

    #[tokio::test]
    async fn get_without_id_fetches_all_tasks() {
        let mock = MockHttpClient::new().on_json(
            Method::GET,
            "https://habitica.com/api/v3/tasks/user",
            &json!({"success": true, "data": [{"id": "t1"}, {"id": "t2"}]}),
        );
        let tasks = tasks(mock);

        let result = tasks.get(None).await.unwrap();

        assert_eq!(result.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn get_with_id_fetches_one_task() {
        let mock = MockHttpClient::new().on_json(
            Method::GET,
            "https://habitica.com/api/v3/tasks/t1",
            &json!({"success": true, "data": {"id": "t1", "type": "todo"}}),
        );
        let tasks = tasks(mock);

        let result = tasks.get(Some("t1")).await.unwrap();

        assert_eq!(result["type"], "todo");
    }

    #[tokio::test]
    async fn type_filters_use_the_type_query_parameter() {
        let mock = MockHttpClient::new().on_json(
            Method::GET,
            "https://habitica.com/api/v3/tasks/user?type=dailys",
            &json!({"success": true, "data": [{"id": "d1"}]}),
        );
        let tasks = tasks(mock.clone());

        let result = tasks.get_dailys().await.unwrap();

        assert_eq!(result, json!([{"id": "d1"}]));
        assert_eq!(
            mock.only_request().url,
            "https://habitica.com/api/v3/tasks/user?type=dailys"
        );
    }

    #[tokio::test]
    async fn score_posts_to_the_direction_path() {
        let mock = MockHttpClient::new().on_json(
            Method::POST,
            "https://habitica.com/api/v3/tasks/t1/score/down",
            &json!({"success": true, "data": {"delta": -0.1}}),
        );
        let tasks = tasks(mock.clone());

        let stats = tasks.score("t1", ScoreDirection::Down, None).await.unwrap();

        assert_eq!(stats["delta"], -0.1);
        assert_eq!(mock.only_request().body, None);
    }

    #[tokio::test]
    async fn score_sends_the_optional_body() {
        let mock = MockHttpClient::new().on_json(
            Method::POST,
            "https://habitica.com/api/v3/tasks/t1/score/up",
            &json!({"success": true, "data": {"delta": 1.0}}),
        );
        let tasks = tasks(mock.clone());

        tasks
            .score("t1", ScoreDirection::Up, Some(json!({"type": "todo"})))
            .await
            .unwrap();

        assert_eq!(mock.only_request().body, Some(json!({"type": "todo"})));
    }

    #[tokio::test]
    async fn score_requires_an_id() {
        let tasks = tasks(MockHttpClient::new());

        let err = tasks.score("", ScoreDirection::Up, None).await.unwrap_err();

        assert!(matches!(err, Error::MissingArgument(_)));
        assert_eq!(err.to_string(), "Task id is required");
    }

    #[tokio::test]
    async fn put_requires_id_and_body() {
        let tasks = tasks(MockHttpClient::new());

        let err = tasks.put("", json!({"text": "x"})).await.unwrap_err();
        assert_eq!(err.to_string(), "Task id is required");

        let err = tasks.put("t1", Value::Null).await.unwrap_err();
        assert_eq!(err.to_string(), "Task body is required");
    }

    #[tokio::test]
    async fn del_requires_an_id() {
        let tasks = tasks(MockHttpClient::new());

        let err = tasks.del("").await.unwrap_err();
        assert!(matches!(err, Error::MissingArgument(_)));
    }

    #[tokio::test]
    async fn post_creates_a_task() {
        let mock = MockHttpClient::new().on_json(
            Method::POST,
            "https://habitica.com/api/v3/tasks/user",
            &json!({"success": true, "data": {"id": "t9", "text": "task name"}}),
        );
        let tasks = tasks(mock.clone());

        let task = tasks
            .post(json!({"text": "task name", "type": "daily"}))
            .await
            .unwrap();

        assert_eq!(task["text"], "task name");
        assert_eq!(
            mock.only_request().body,
            Some(json!({"text": "task name", "type": "daily"}))
        );
    }
}
