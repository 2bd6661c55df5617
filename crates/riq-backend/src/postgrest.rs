//! Supabase-style PostgREST backend client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;

use crate::{Backend, BackendError, SearchQuery};

#[derive(Clone)]
pub struct PostgrestConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for PostgrestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgrestConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl PostgrestConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct PostgrestClient {
    config: PostgrestConfig,
    http: reqwest::Client,
}

impl PostgrestClient {
    pub fn new(config: PostgrestConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    fn rest_url(&self, path: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            path
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.rest_url(path))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn send(request: RequestBuilder) -> Result<Value, BackendError> {
        let response = request.send().await.map_err(map_transport_error)?;
        read_body(response).await
    }

    async fn send_rows(request: RequestBuilder) -> Result<Vec<Value>, BackendError> {
        match Self::send(request).await? {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(Vec::new()),
            other => Err(BackendError::Parse(format!(
                "expected an array of rows, got {other}"
            ))),
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else {
        BackendError::Network(err.to_string())
    }
}

/// Decode a response body, turning non-success statuses into
/// [`BackendError::Rejected`] with PostgREST's own error message.
async fn read_body(response: Response) -> Result<Value, BackendError> {
    let status = response.status();
    let text = response.text().await.map_err(map_transport_error)?;

    if !status.is_success() {
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| body["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| format!("HTTP {status}: {text}"));
        return Err(BackendError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| BackendError::Parse(e.to_string()))
}

/// Strip characters PostgREST treats as pattern syntax.
fn ilike_pattern(term: &str) -> String {
    let cleaned: String = term
        .chars()
        .filter(|c| !matches!(c, '*' | '%'))
        .collect();
    format!("ilike.*{}*", cleaned.trim())
}

#[async_trait]
impl Backend for PostgrestClient {
    async fn call_procedure(&self, name: &str, params: &Value) -> Result<Value, BackendError> {
        debug!(procedure = name, "backend rpc");
        let request = self
            .request(Method::POST, &format!("rpc/{name}"))
            .json(params);
        Self::send(request).await
    }

    async fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<Value>, BackendError> {
        debug!(collection = query.collection, term = query.term, "backend search");
        let request = self.request(Method::GET, query.collection).query(&[
            ("select", query.columns.replace(' ', "")),
            (query.field, ilike_pattern(query.term)),
            ("limit", query.limit.to_string()),
        ]);
        Self::send_rows(request).await
    }

    async fn read_page(
        &self,
        collection: &str,
        columns: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Value>, BackendError> {
        debug!(collection, offset, limit, "backend page read");
        let request = self.request(Method::GET, collection).query(&[
            ("select", columns.replace(' ', "")),
            ("offset", offset.to_string()),
            ("limit", limit.to_string()),
        ]);
        Self::send_rows(request).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::fetch_all;

    fn client(server: &MockServer) -> PostgrestClient {
        PostgrestClient::new(PostgrestConfig::new(server.uri(), "test-key")).unwrap()
    }

    #[tokio::test]
    async fn rpc_posts_params_with_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_revenue_trend"))
            .and(header("apikey", "test-key"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_json(json!({ "p_days": 14 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "revenue": 1200 }])))
            .expect(1)
            .mount(&server)
            .await;

        let data = client(&server)
            .call_procedure("get_revenue_trend", &json!({ "p_days": 14 }))
            .await
            .unwrap();
        assert_eq!(data, json!([{ "revenue": 1200 }]));
    }

    #[tokio::test]
    async fn rpc_error_uses_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/receive_inventory"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "P0001",
                "message": "quantity must be positive",
                "details": null,
                "hint": null
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .call_procedure("receive_inventory", &json!({ "p_qty": -1 }))
            .await
            .unwrap_err();
        assert!(matches!(
            &err,
            BackendError::Rejected { status: 400, message } if message == "quantity must be positive"
        ));
    }

    #[tokio::test]
    async fn void_rpc_returns_null() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/generate_forecast"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let data = client(&server)
            .call_procedure("generate_forecast", &json!({}))
            .await
            .unwrap();
        assert_eq!(data, Value::Null);
    }

    #[tokio::test]
    async fn search_sends_ilike_filter_and_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/ingredients"))
            .and(query_param("select", "id,name,unit"))
            .and(query_param("name", "ilike.*tom*"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": "a", "name": "Tomato", "unit": "kg" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let rows = client(&server)
            .search(&SearchQuery {
                collection: "ingredients",
                field: "name",
                term: "tom%",
                columns: "id, name, unit",
                limit: 5,
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn fetch_all_walks_pages_over_http() {
        let server = MockServer::start().await;
        let page = |count: usize| -> Vec<Value> {
            (0..count)
                .map(|i| json!({ "business_date": "2026-01-01", "net_sales": i }))
                .collect()
        };
        for (offset, count) in [(0, 1000), (1000, 1000), (2000, 500)] {
            Mock::given(method("GET"))
                .and(path("/rest/v1/sales_line_items"))
                .and(query_param("offset", offset.to_string()))
                .and(query_param("limit", "1000"))
                .respond_with(ResponseTemplate::new(200).set_body_json(page(count)))
                .expect(1)
                .mount(&server)
                .await;
        }

        let rows = fetch_all(&client(&server), "sales_line_items", "business_date, net_sales")
            .await
            .unwrap();
        assert_eq!(rows.len(), 2500);
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        let client =
            PostgrestClient::new(PostgrestConfig::new("http://127.0.0.1:9", "k")).unwrap();
        let err = client.read_page("menu_items", "*", 0, 10).await.unwrap_err();
        assert!(matches!(err, BackendError::Network(_) | BackendError::Timeout));
    }

    #[test]
    fn ilike_pattern_strips_wildcards() {
        assert_eq!(ilike_pattern(" *chick%en* "), "ilike.*chicken*");
    }

    #[test]
    fn debug_redacts_key() {
        let config = PostgrestConfig::new("https://x.supabase.co", "super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
