//! REST client - one function per (resource, verb)
//!
//! Every call goes through [`ApiClient::send`], which turns non-2xx statuses
//! into [`RequestFailure::Server`] so callers handle all failures in one place.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::Value;

use crate::api::error::{ApiResponse, RequestFailure};
use crate::config::Config;

type Query = Vec<(&'static str, String)>;

pub type ApiResult = Result<ApiResponse, RequestFailure>;

/// Shared HTTP configuration: base URL, JSON content type, cookie store
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, RequestFailure> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(ApiClient {
            http,
            base_url: config.api_domain.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue a request and normalize the outcome
    async fn send(&self, builder: reqwest::RequestBuilder) -> ApiResult {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let data = parse_body(&text);

        tracing::debug!(status = status.as_u16(), "Response received");

        let response = ApiResponse::new(status.as_u16(), data);
        if status.is_success() {
            Ok(response)
        } else {
            Err(RequestFailure::Server(response))
        }
    }

    async fn get(&self, path: &str, query: Query) -> ApiResult {
        tracing::info!(path, "GET");
        let mut builder = self.http.get(self.url(path));
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        self.send(builder).await
    }

    async fn post(&self, path: &str, body: Option<&Value>, query: Query) -> ApiResult {
        tracing::info!(path, "POST");
        let mut builder = self.http.post(self.url(path));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        self.send(builder).await
    }

    async fn put(&self, path: &str, body: Option<&Value>, query: Query) -> ApiResult {
        tracing::info!(path, "PUT");
        let mut builder = self.http.put(self.url(path));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        self.send(builder).await
    }

    async fn delete(&self, path: &str) -> ApiResult {
        tracing::info!(path, "DELETE");
        self.send(self.http.delete(self.url(path))).await
    }

    /// Delete returning only the response body
    async fn delete_body(&self, path: &str) -> Result<Value, RequestFailure> {
        self.delete(path)
            .await
            .map(|response| response.data.unwrap_or(Value::Null))
    }

    // ========================================================
    // Users
    // ========================================================

    pub async fn get_users(&self) -> ApiResult {
        self.get("/user", Vec::new()).await
    }

    pub async fn get_me(&self) -> ApiResult {
        self.get("/user/me", Vec::new()).await
    }

    // ========================================================
    // Dashboard
    // ========================================================

    pub async fn get_dashboard_metrics(&self) -> ApiResult {
        self.get("/dashboard/metrics", Vec::new()).await
    }

    pub async fn get_dashboard_issues(&self) -> ApiResult {
        self.get("/dashboard/issue", Vec::new()).await
    }

    // ========================================================
    // Team
    // ========================================================

    pub async fn get_teams(&self) -> ApiResult {
        self.get("/team", Vec::new()).await
    }

    pub async fn get_team(&self, key: &str) -> ApiResult {
        self.get(&format!("/team/{}", key), Vec::new()).await
    }

    pub async fn post_team(&self, data: &Value) -> ApiResult {
        self.post("/team", Some(data), Vec::new()).await
    }

    pub async fn put_team(&self, data: &Value, key: &str) -> ApiResult {
        self.put(&format!("/team/{}", key), Some(data), Vec::new()).await
    }

    pub async fn delete_team(&self, key: &str) -> Result<Value, RequestFailure> {
        self.delete_body(&format!("/team/{}", key)).await
    }

    // ========================================================
    // Action
    // ========================================================

    pub async fn get_actions_json_schema(&self) -> ApiResult {
        self.get("/action/json_schema", Vec::new()).await
    }

    pub async fn get_actions(&self) -> ApiResult {
        self.get("/action", Vec::new()).await
    }

    pub async fn get_action(&self, key: &str) -> ApiResult {
        self.get(&format!("/action/{}", key), Vec::new()).await
    }

    pub async fn post_action(&self, data: &Value) -> ApiResult {
        self.post("/action", Some(data), Vec::new()).await
    }

    pub async fn put_action(&self, data: &Value, key: &str) -> ApiResult {
        self.put(&format!("/action/{}", key), Some(data), Vec::new()).await
    }

    pub async fn delete_action(&self, key: &str) -> Result<Value, RequestFailure> {
        self.delete_body(&format!("/action/{}", key)).await
    }

    // ========================================================
    // Datasource
    // ========================================================

    pub async fn get_datasources(&self) -> ApiResult {
        self.get("/datasource", Vec::new()).await
    }

    pub async fn get_datasource(&self, key: &str) -> ApiResult {
        self.get(&format!("/datasource/{}", key), Vec::new()).await
    }

    pub async fn get_datasources_json_schema(&self) -> ApiResult {
        self.get("/datasource/json_schema", Vec::new()).await
    }

    /// Create a datasource. The payload's `engine` selects the endpoint and
    /// is not sent in the body.
    pub async fn post_datasource(&self, data: &Value) -> ApiResult {
        let (engine, payload) = split_engine(data)?;
        self.post(
            &format!("/datasource/{}", engine),
            Some(&payload),
            vec![("test", String::from("true"))],
        )
        .await
    }

    pub async fn put_datasource(&self, data: &Value, key: &str) -> ApiResult {
        let (engine, payload) = split_engine(data)?;
        self.put(
            &format!("/datasource/{}/{}", engine, key),
            Some(&payload),
            vec![("test", String::from("true"))],
        )
        .await
    }

    pub async fn delete_datasource(&self, key: &str) -> Result<Value, RequestFailure> {
        self.delete_body(&format!("/datasource/{}", key)).await
    }

    // ========================================================
    // Dataset
    // ========================================================

    pub async fn get_datasets(&self, datasource_id: Option<&str>) -> ApiResult {
        let mut query = Vec::new();
        if let Some(id) = datasource_id {
            query.push(("datasource_id", id.to_string()));
        }
        self.get("/dataset", query).await
    }

    pub async fn get_dataset(&self, key: &str) -> ApiResult {
        self.get(&format!("/dataset/{}", key), Vec::new()).await
    }

    pub async fn get_query_sample(&self, data: &Value) -> ApiResult {
        self.post("/dataset/sample", Some(data), Vec::new()).await
    }

    pub async fn put_sample(&self, key: &str) -> ApiResult {
        self.put(&format!("/dataset/sample/{}", key), None, Vec::new()).await
    }

    pub async fn post_dataset(&self, data: &Value) -> ApiResult {
        self.post("/dataset", Some(data), Vec::new()).await
    }

    pub async fn put_dataset(&self, key: &str, data: &Value) -> ApiResult {
        self.put(&format!("/dataset/{}", key), Some(data), Vec::new()).await
    }

    /// Unlike the other deletes this returns the whole response
    pub async fn delete_dataset(&self, key: &str) -> ApiResult {
        self.delete(&format!("/dataset/{}", key)).await
    }

    // ========================================================
    // Introspect
    // ========================================================

    pub async fn get_schemas(&self, datasource_id: &str) -> ApiResult {
        self.get(
            "/introspect/schema",
            vec![("datasource_id", datasource_id.to_string())],
        )
        .await
    }

    pub async fn get_tables(&self, datasource_id: &str, schema: &str) -> ApiResult {
        self.get(
            "/introspect/table",
            vec![
                ("datasource_id", datasource_id.to_string()),
                ("schema", schema.to_string()),
            ],
        )
        .await
    }

    pub async fn get_columns(&self, datasource_id: &str, schema: &str, table: &str) -> ApiResult {
        self.get(
            "/introspect/column",
            vec![
                ("datasource_id", datasource_id.to_string()),
                ("schema", schema.to_string()),
                ("table", table.to_string()),
            ],
        )
        .await
    }

    // ========================================================
    // Expectations
    // ========================================================

    pub async fn get_expectations(
        &self,
        dataset_id: Option<&str>,
        include_history: bool,
        datasource_id: Option<&str>,
    ) -> ApiResult {
        self.get("/expectation", history_query(dataset_id, include_history, datasource_id))
            .await
    }

    pub async fn get_expectation(&self, key: &str) -> ApiResult {
        self.get(&format!("/expectation/{}", key), Vec::new()).await
    }

    pub async fn get_expectations_json_schema(&self) -> ApiResult {
        self.get("/expectation/json_schema", Vec::new()).await
    }

    pub async fn post_expectation(&self, data: &Value) -> ApiResult {
        self.post("/expectation", Some(data), Vec::new()).await
    }

    pub async fn put_expectation(&self, data: &Value, key: &str) -> ApiResult {
        self.put(&format!("/expectation/{}", key), Some(data), Vec::new()).await
    }

    pub async fn delete_expectation(&self, key: &str) -> Result<Value, RequestFailure> {
        self.delete_body(&format!("/expectation/{}", key)).await
    }

    // ========================================================
    // Runner
    // ========================================================

    pub async fn post_runner_validate_dataset(&self, data: &Value) -> ApiResult {
        self.post("/runner/validate/dataset", Some(data), Vec::new()).await
    }

    pub async fn post_runner_expectation(&self, data: &Value) -> ApiResult {
        self.post("/runner/validate/expectation", Some(data), Vec::new()).await
    }

    pub async fn post_runner_profile_dataset(&self, data: &Value) -> ApiResult {
        self.post("/runner/profile/dataset", Some(data), Vec::new()).await
    }

    // ========================================================
    // Validation
    // ========================================================

    pub async fn get_validations(&self) -> ApiResult {
        self.get("/validation", Vec::new()).await
    }

    pub async fn get_validation_stats(&self, dataset_id: &str) -> ApiResult {
        self.get(
            "/validation/statistics",
            vec![("dataset_id", dataset_id.to_string())],
        )
        .await
    }

    // ========================================================
    // Suggestions
    // ========================================================

    pub async fn get_suggestions(
        &self,
        dataset_id: Option<&str>,
        include_history: bool,
        datasource_id: Option<&str>,
    ) -> ApiResult {
        self.get("/suggestion", history_query(dataset_id, include_history, datasource_id))
            .await
    }

    pub async fn get_suggestion(&self, key: &str) -> ApiResult {
        self.get(&format!("/suggestion/{}", key), Vec::new()).await
    }

    pub async fn delete_suggestion(&self, key: &str) -> Result<Value, RequestFailure> {
        self.delete_body(&format!("/suggestion/{}", key)).await
    }

    /// Turn a suggestion into an active expectation
    pub async fn enable_suggestion(&self, key: &str) -> ApiResult {
        self.post(&format!("/suggestion/{}", key), None, Vec::new()).await
    }

    // ========================================================
    // Auth
    // ========================================================

    /// Form-encoded credential login; the session cookie lands in the store
    pub async fn login(&self, username: &str, password: &str) -> ApiResult {
        tracing::info!(path = "/auth/login", "POST");
        let builder = self
            .http
            .post(self.url("/auth/login"))
            .form(&[("username", username), ("password", password)]);
        self.send(builder).await
    }

    pub async fn logout(&self) -> ApiResult {
        self.post("/auth/logout", None, Vec::new()).await
    }

    pub async fn get_auth_methods(&self) -> ApiResult {
        self.get("/auth/methods", Vec::new()).await
    }

    pub async fn authenticate(&self, provider: &str) -> ApiResult {
        self.get(
            &format!("/auth/{}/authorize", provider),
            vec![("authentication_backend", String::from("cookie"))],
        )
        .await
    }

    pub async fn oauth_callback(&self, provider: &str, code: &str, state: &str) -> ApiResult {
        self.get(
            &format!("/auth/{}/callback", provider),
            vec![("code", code.to_string()), ("state", state.to_string())],
        )
        .await
    }
}

/// Parse a response body: JSON when possible, otherwise the raw text
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Split `engine` out of a datasource payload, lower-cased for the path
fn split_engine(data: &Value) -> Result<(String, Value), RequestFailure> {
    let mut payload = data
        .as_object()
        .cloned()
        .ok_or_else(|| RequestFailure::Setup(String::from("datasource payload must be an object")))?;

    let engine = match payload.remove("engine") {
        Some(Value::String(engine)) if !engine.is_empty() => engine.to_lowercase(),
        _ => return Err(RequestFailure::Setup(String::from("datasource payload has no engine"))),
    };

    Ok((engine, Value::Object(payload)))
}

/// Optional filters shared by the expectation and suggestion lists
fn history_query(dataset_id: Option<&str>, include_history: bool, datasource_id: Option<&str>) -> Query {
    let mut query = Vec::new();
    if let Some(id) = datasource_id {
        query.push(("datasource_id", id.to_string()));
    }
    if let Some(id) = dataset_id {
        query.push(("dataset_id", id.to_string()));
    }
    if include_history {
        query.push(("include_history", String::from("true")));
    }
    query
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accept one connection, reply with `status` and `body`, and return the
    /// raw request text (head and body) through the join handle.
    pub(crate) async fn serve_once(status: u16, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if let Some(head_end) = find_head_end(&raw) {
                    let head = String::from_utf8_lossy(&raw[..head_end]).to_lowercase();
                    let content_length = head
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if raw.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }

            let reply = format!(
                "HTTP/1.1 {} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn find_head_end(raw: &[u8]) -> Option<usize> {
        raw.windows(4).position(|w| w == b"\r\n\r\n")
    }

    pub(crate) fn client_for(base: &str) -> ApiClient {
        let config = Config {
            api_domain: base.to_string(),
            request_timeout_secs: 5,
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }

    fn request_line(raw: &str) -> &str {
        raw.lines().next().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_get_teams_returns_data() {
        let (base, server) = serve_once(200, r#"[{"key":"t1","team_name":"Alpha","members":["a@x.com"]}]"#).await;
        let response = client_for(&base).get_teams().await.unwrap();
        let raw = server.await.unwrap();

        assert_eq!(request_line(&raw), "GET /team HTTP/1.1");
        assert!(raw.to_lowercase().contains("content-type: application/json"));
        assert_eq!(response.status, Some(200));
        assert_eq!(response.data.unwrap()[0]["team_name"], "Alpha");
    }

    #[tokio::test]
    async fn test_post_team_sends_json_body() {
        let (base, server) = serve_once(200, r#"{"key":"t2"}"#).await;
        let payload = json!({"team_name": "Beta", "members": ["b@x.com"]});
        client_for(&base).post_team(&payload).await.unwrap();
        let raw = server.await.unwrap();

        assert_eq!(request_line(&raw), "POST /team HTTP/1.1");
        assert!(raw.ends_with(&payload.to_string()));
    }

    #[tokio::test]
    async fn test_delete_returns_body_only() {
        let (base, server) = serve_once(200, r#""Action deleted""#).await;
        let body = client_for(&base).delete_action("a1").await.unwrap();
        let raw = server.await.unwrap();

        assert_eq!(request_line(&raw), "DELETE /action/a1 HTTP/1.1");
        assert_eq!(body, json!("Action deleted"));
    }

    #[tokio::test]
    async fn test_datasource_engine_goes_to_path() {
        let (base, server) = serve_once(200, "{}").await;
        let payload = json!({"engine": "PostgreSQL", "datasource_name": "warehouse"});
        client_for(&base).put_datasource(&payload, "ds1").await.unwrap();
        let raw = server.await.unwrap();

        assert_eq!(request_line(&raw), "PUT /datasource/postgresql/ds1?test=true HTTP/1.1");
        assert!(raw.ends_with(r#"{"datasource_name":"warehouse"}"#));
    }

    #[tokio::test]
    async fn test_datasource_without_engine_is_setup_failure() {
        let client = client_for("http://127.0.0.1:9");
        let result = client.post_datasource(&json!({"datasource_name": "x"})).await;
        assert!(matches!(result, Err(RequestFailure::Setup(_))));
    }

    #[tokio::test]
    async fn test_history_filters_only_when_given() {
        let (base, server) = serve_once(200, "[]").await;
        client_for(&base)
            .get_expectations(Some("d1"), true, None)
            .await
            .unwrap();
        let raw = server.await.unwrap();
        assert_eq!(
            request_line(&raw),
            "GET /expectation?dataset_id=d1&include_history=true HTTP/1.1"
        );

        let (base, server) = serve_once(200, "[]").await;
        client_for(&base).get_suggestions(None, false, None).await.unwrap();
        let raw = server.await.unwrap();
        assert_eq!(request_line(&raw), "GET /suggestion HTTP/1.1");
    }

    #[tokio::test]
    async fn test_login_is_form_encoded() {
        let (base, server) = serve_once(204, "").await;
        let response = client_for(&base).login("a@x.com", "s3cret").await.unwrap();
        let raw = server.await.unwrap();

        assert_eq!(response.status, Some(204));
        assert_eq!(response.data, Some(Value::Null));
        assert!(raw.to_lowercase().contains("content-type: application/x-www-form-urlencoded"));
        assert!(raw.ends_with("username=a%40x.com&password=s3cret"));
    }

    #[tokio::test]
    async fn test_oauth_paths() {
        let (base, server) = serve_once(200, r#"{"authorization_url":"https://idp"}"#).await;
        client_for(&base).authenticate("google").await.unwrap();
        let raw = server.await.unwrap();
        assert_eq!(
            request_line(&raw),
            "GET /auth/google/authorize?authentication_backend=cookie HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_oauth_callback_query() {
        let (base, server) = serve_once(200, "{}").await;
        client_for(&base).oauth_callback("google", "c0de", "st4te").await.unwrap();
        assert_eq!(
            request_line(&server.await.unwrap()),
            "GET /auth/google/callback?code=c0de&state=st4te HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_introspect_queries() {
        let (base, server) = serve_once(200, "[]").await;
        client_for(&base).get_schemas("ds1").await.unwrap();
        assert_eq!(
            request_line(&server.await.unwrap()),
            "GET /introspect/schema?datasource_id=ds1 HTTP/1.1"
        );

        let (base, server) = serve_once(200, "[]").await;
        client_for(&base).get_tables("ds1", "public").await.unwrap();
        assert_eq!(
            request_line(&server.await.unwrap()),
            "GET /introspect/table?datasource_id=ds1&schema=public HTTP/1.1"
        );

        let (base, server) = serve_once(200, "[]").await;
        client_for(&base).get_columns("ds1", "public", "orders").await.unwrap();
        assert_eq!(
            request_line(&server.await.unwrap()),
            "GET /introspect/column?datasource_id=ds1&schema=public&table=orders HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_validation_stats_query() {
        let (base, server) = serve_once(200, "{}").await;
        client_for(&base).get_validation_stats("d1").await.unwrap();
        assert_eq!(
            request_line(&server.await.unwrap()),
            "GET /validation/statistics?dataset_id=d1 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_datasets_filtered_by_datasource() {
        let (base, server) = serve_once(200, "[]").await;
        client_for(&base).get_datasets(Some("ds1")).await.unwrap();
        assert_eq!(
            request_line(&server.await.unwrap()),
            "GET /dataset?datasource_id=ds1 HTTP/1.1"
        );

        let (base, server) = serve_once(200, "[]").await;
        client_for(&base).get_datasets(None).await.unwrap();
        assert_eq!(request_line(&server.await.unwrap()), "GET /dataset HTTP/1.1");
    }

    #[tokio::test]
    async fn test_runner_paths() {
        let payload = json!({"expectation_id": "e1"});
        let (base, server) = serve_once(200, "{}").await;
        client_for(&base).post_runner_expectation(&payload).await.unwrap();
        let raw = server.await.unwrap();
        assert_eq!(request_line(&raw), "POST /runner/validate/expectation HTTP/1.1");
        assert!(raw.ends_with(&payload.to_string()));

        let payload = json!({"dataset_id": "d1"});
        let (base, server) = serve_once(200, "{}").await;
        client_for(&base).post_runner_profile_dataset(&payload).await.unwrap();
        let raw = server.await.unwrap();
        assert_eq!(request_line(&raw), "POST /runner/profile/dataset HTTP/1.1");
        assert!(raw.ends_with(&payload.to_string()));
    }

    #[tokio::test]
    async fn test_row_actions_send_no_body() {
        let (base, server) = serve_once(200, "{}").await;
        client_for(&base).enable_suggestion("s1").await.unwrap();
        let raw = server.await.unwrap();
        assert_eq!(request_line(&raw), "POST /suggestion/s1 HTTP/1.1");
        assert!(raw.ends_with("\r\n\r\n"));

        let (base, server) = serve_once(200, "{}").await;
        client_for(&base).put_sample("d1").await.unwrap();
        let raw = server.await.unwrap();
        assert_eq!(request_line(&raw), "PUT /dataset/sample/d1 HTTP/1.1");
        assert!(raw.ends_with("\r\n\r\n"));
    }

    #[tokio::test]
    async fn test_post_datasource_tests_connection() {
        let (base, server) = serve_once(200, "{}").await;
        let payload = json!({"engine": "MySQL", "datasource_name": "crm"});
        client_for(&base).post_datasource(&payload).await.unwrap();
        let raw = server.await.unwrap();

        assert_eq!(request_line(&raw), "POST /datasource/mysql?test=true HTTP/1.1");
        assert!(raw.ends_with(r#"{"datasource_name":"crm"}"#));
    }

    #[tokio::test]
    async fn test_error_status_is_server_failure() {
        let (base, server) = serve_once(401, r#"{"detail":"Unauthorized"}"#).await;
        let result = client_for(&base).get_me().await;
        server.await.unwrap();

        match result {
            Err(RequestFailure::Server(response)) => {
                assert_eq!(response.status, Some(401));
                assert_eq!(response.detail().as_deref(), Some("Unauthorized"));
            }
            other => panic!("expected server failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_no_response() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client_for(&format!("http://{}", addr)).get_teams().await;
        assert!(matches!(result, Err(RequestFailure::NoResponse(_))));
    }

    #[tokio::test]
    async fn test_bad_base_url_is_setup_failure() {
        let result = client_for("not a url").get_teams().await;
        assert!(matches!(result, Err(RequestFailure::Setup(_))));
    }

    #[test]
    fn test_parse_body_variants() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("[1]"), json!([1]));
        assert_eq!(parse_body("Internal Server Error"), json!("Internal Server Error"));
    }
}
