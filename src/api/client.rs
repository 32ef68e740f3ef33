use crate::todo::{NewTodo, Todo, TodoPatch};
use crate::util::{validate_base_url, UrlValidationError};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Upper bound on a response body; a todo list is a few kilobytes.
const MAX_RESPONSE_SIZE: usize = 2 * 1024 * 1024; // 2MB

/// Errors from a single API call.
///
/// Only logged: the controller collapses every variant into a fixed
/// user-facing message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// The request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Body could not be encoded or decoded as JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Response body exceeded the size limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    /// Base URL rejected or an endpoint could not be built from it
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl From<UrlValidationError> for ApiError {
    fn from(e: UrlValidationError) -> Self {
        ApiError::InvalidUrl(e.to_string())
    }
}

/// Operations on the todos resource of one owner.
///
/// No call retries; a failure is returned to the caller immediately.
#[async_trait]
pub trait TodoApi: Send + Sync {
    /// Every todo belonging to the configured owner.
    async fn list(&self) -> Result<Vec<Todo>, ApiError>;

    /// Create a todo; the server assigns its id.
    async fn create(&self, todo: NewTodo) -> Result<Todo, ApiError>;

    /// Delete a todo by id.
    async fn remove(&self, id: i64) -> Result<(), ApiError>;

    /// Overwrite title, completion and owner of a todo. The response body is ignored.
    async fn patch(&self, id: i64, patch: TodoPatch) -> Result<(), ApiError>;
}

/// [`TodoApi`] over HTTP with JSON bodies.
#[derive(Clone)]
pub struct HttpTodoApi {
    client: reqwest::Client,
    base_url: Url,
    owner_id: i64,
    timeout: Duration,
}

impl HttpTodoApi {
    /// Build a client with pooled connections and a per-request timeout.
    pub fn new(base_url: &str, owner_id: i64, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(timeout)
            .build()?;
        Self::with_client(client, base_url, owner_id, timeout)
    }

    /// Use an existing `reqwest::Client`.
    pub fn with_client(
        client: reqwest::Client,
        base_url: &str,
        owner_id: i64,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = validate_base_url(base_url)?;
        tracing::info!(base_url = %base_url, owner_id, "Configured todos API");
        Ok(Self {
            client,
            base_url,
            owner_id,
            timeout,
        })
    }

    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))
    }

    fn item_endpoint(&self, id: i64) -> Result<Url, ApiError> {
        self.endpoint(&format!("todos/{}", id))
    }

    fn json_request<T: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: &T,
    ) -> Result<RequestBuilder, ApiError> {
        let bytes = serde_json::to_vec(body)?;
        Ok(self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(bytes))
    }

    /// Send a request and fail on timeout or a non-2xx status.
    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| ApiError::Timeout)??;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl TodoApi for HttpTodoApi {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let mut url = self.endpoint("todos")?;
        url.query_pairs_mut()
            .append_pair("ownerId", &self.owner_id.to_string());

        tracing::debug!(url = %url, "Listing todos");
        let request = self.client.get(url).header(ACCEPT, "application/json");
        let response = self.send(request).await?;
        let body = read_limited_body(response, MAX_RESPONSE_SIZE).await?;
        let todos: Vec<Todo> = serde_json::from_slice(&body)?;
        tracing::debug!(count = todos.len(), "Listed todos");
        Ok(todos)
    }

    async fn create(&self, todo: NewTodo) -> Result<Todo, ApiError> {
        let url = self.endpoint("todos")?;
        tracing::debug!(title = %todo.title, "Creating todo");
        let request = self.json_request(Method::POST, url, &todo)?;
        let response = self.send(request).await?;
        let body = read_limited_body(response, MAX_RESPONSE_SIZE).await?;
        let created: Todo = serde_json::from_slice(&body)?;
        tracing::debug!(id = created.id, "Created todo");
        Ok(created)
    }

    async fn remove(&self, id: i64) -> Result<(), ApiError> {
        let url = self.item_endpoint(id)?;
        tracing::debug!(id, "Deleting todo");
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn patch(&self, id: i64, patch: TodoPatch) -> Result<(), ApiError> {
        let url = self.item_endpoint(id)?;
        tracing::debug!(id, completed = patch.completed, "Patching todo");
        let request = self.json_request(Method::PATCH, url, &patch)?;
        self.send(request).await?;
        Ok(())
    }
}

/// Read a response body, refusing anything larger than `limit` bytes.
async fn read_limited_body(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const OWNER: i64 = 1346;

    fn api_for(server: &MockServer) -> HttpTodoApi {
        HttpTodoApi::new(&server.uri(), OWNER, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_list_scoped_by_owner() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .and(query_param("ownerId", "1346"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "a", "completed": false, "ownerId": OWNER},
                {"id": 2, "title": "b", "completed": true, "ownerId": OWNER}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let todos = api_for(&server).list().await.unwrap();
        let ids: Vec<i64> = todos.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(todos[1].completed);
    }

    #[tokio::test]
    async fn test_base_path_prefix_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/students-api/todos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let base = format!("{}/students-api", server.uri());
        let api = HttpTodoApi::new(&base, OWNER, Duration::from_secs(5)).unwrap();
        assert!(api.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_posts_body_and_returns_server_todo() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/todos"))
            .and(body_json(json!({"title": "buy milk", "ownerId": OWNER, "completed": false})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!(
                {"id": 77, "title": "buy milk", "completed": false, "ownerId": OWNER}
            )))
            .expect(1)
            .mount(&server)
            .await;

        let created = api_for(&server)
            .create(NewTodo::new("buy milk", OWNER))
            .await
            .unwrap();
        assert_eq!(created.id, 77);
        assert_eq!(created.title, "buy milk");
    }

    #[tokio::test]
    async fn test_remove_hits_item_path() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/todos/5"))
            .respond_with(ResponseTemplate::new(200).set_body_string("1"))
            .expect(1)
            .mount(&server)
            .await;

        assert!(api_for(&server).remove(5).await.is_ok());
    }

    #[tokio::test]
    async fn test_patch_sends_all_fields_and_ignores_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/todos/9"))
            .and(body_json(json!({"completed": true, "ownerId": OWNER, "title": "t"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .expect(1)
            .mount(&server)
            .await;

        let patch = TodoPatch {
            completed: true,
            owner_id: OWNER,
            title: "t".into(),
        };
        assert!(api_for(&server).patch(9, patch).await.is_ok());
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        match api_for(&server).remove(1).await {
            Err(ApiError::HttpStatus(404)) => {}
            other => panic!("Expected HttpStatus(404), got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        assert!(matches!(
            api_for(&server).list().await,
            Err(ApiError::HttpStatus(500))
        ));
    }

    #[tokio::test]
    async fn test_malformed_list_is_json_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        assert!(matches!(api_for(&server).list().await, Err(ApiError::Json(_))));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let api = HttpTodoApi::new(&server.uri(), OWNER, Duration::from_millis(50)).unwrap();
        let err = api.list().await.unwrap_err();
        assert!(
            matches!(err, ApiError::Timeout | ApiError::Network(_)),
            "unexpected error: {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let server = MockServer::start().await;
        let big = "x".repeat(MAX_RESPONSE_SIZE + 1);
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(big))
            .mount(&server)
            .await;

        assert!(matches!(
            api_for(&server).list().await,
            Err(ApiError::ResponseTooLarge(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_base_url_rejected() {
        let result = HttpTodoApi::new("ftp://example.com", OWNER, Duration::from_secs(1));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
