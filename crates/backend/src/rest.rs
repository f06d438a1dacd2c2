use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Method, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::client::Backend;
use crate::error::BackendError;
use crate::query::{Operation, Query, Response};

/// PostgREST error body as returned by the hosted backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// HTTP transport for a hosted PostgREST endpoint (`{url}/rest/v1/{table}`).
#[derive(Debug, Clone)]
pub struct RestBackend {
    base_url: Url,
    api_key: String,
    schema: String,
    http: reqwest::Client,
}

impl RestBackend {
    pub fn new(base_url: &str, api_key: &str, schema: &str, timeout: Duration) -> Result<Self, BackendError> {
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .map_err(|e| BackendError::InvalidRequest(format!("invalid backend url: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self { base_url, api_key: api_key.to_string(), schema: schema.to_string(), http })
    }

    pub fn from_config(cfg: &configs::BackendConfig) -> Result<Self, BackendError> {
        Self::new(&cfg.url, &cfg.api_key, &cfg.schema, cfg.timeout())
    }

    pub fn endpoint(&self, table: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(&format!("rest/v1/{table}"))
            .map_err(|e| BackendError::InvalidRequest(format!("invalid table {table}: {e}")))
    }

    async fn send(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
        let url = self.endpoint(&query.table)?;
        let (method, body) = match &query.operation {
            Operation::Select => (Method::GET, None),
            Operation::Insert(row) => (Method::POST, Some(row)),
            Operation::Update(patch) => (Method::PATCH, Some(patch)),
        };
        let profile_header = if body.is_some() { "Content-Profile" } else { "Accept-Profile" };

        let mut req = self
            .http
            .request(method, url)
            .query(&query_params(query))
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(profile_header, &self.schema);
        if let Some(body) = body {
            req = req.header("Prefer", "return=representation").json(body);
        }

        let res = req.send().await.map_err(|e| BackendError::Transport(e.to_string()))?;
        let status = res.status();
        let text = res.text().await.map_err(|e| BackendError::Transport(e.to_string()))?;

        if status.is_success() {
            return parse_rows(&text);
        }

        let body: Option<ErrorBody> = serde_json::from_str(&text).ok();
        let (code, message, details, hint) = match body {
            Some(b) => (b.code, b.message, b.details, b.hint),
            None => (None, None, None, None),
        };
        Err(BackendError::Query {
            status: status.as_u16(),
            code,
            message: message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
            details,
            hint,
        })
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn execute(&self, query: Query) -> Response {
        debug!(table = %query.table, op = query.operation.name(), filters = query.filters.len(), "backend request");
        match self.send(&query).await {
            Ok(rows) => Response::ok(rows),
            Err(e) => {
                warn!(table = %query.table, op = query.operation.name(), error = %e, "backend request failed");
                Response::err(e)
            }
        }
    }
}

/// PostgREST query-string for a request: projection, `eq` filters, ordering, paging.
pub fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), query.columns.clone())];
    for f in &query.filters {
        params.push((f.column.clone(), format!("eq.{}", f.value.as_param())));
    }
    if let Some(order) = &query.order {
        let dir = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{dir}", order.column)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    if let Some(offset) = query.offset {
        params.push(("offset".to_string(), offset.to_string()));
    }
    params
}

fn parse_rows(text: &str) -> Result<Vec<Value>, BackendError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str::<Value>(text).map_err(|e| BackendError::Decode(e.to_string()))? {
        Value::Array(rows) => Ok(rows),
        Value::Null => Ok(Vec::new()),
        obj @ Value::Object(_) => Ok(vec![obj]),
        other => Err(BackendError::Decode(format!("unexpected response body: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Filter, FilterValue, Order};

    #[test]
    fn endpoint_keeps_base_path() {
        let b = RestBackend::new("https://abc.example.co/", "k", "public", Duration::from_secs(1)).unwrap();
        assert_eq!(b.endpoint("loans").unwrap().as_str(), "https://abc.example.co/rest/v1/loans");
        let b = RestBackend::new("http://localhost:54321/base", "k", "public", Duration::from_secs(1)).unwrap();
        assert_eq!(b.endpoint("loans").unwrap().as_str(), "http://localhost:54321/base/rest/v1/loans");
    }

    #[test]
    fn params_follow_postgrest_syntax() {
        let mut q = Query::new("accounts");
        q.filters.push(Filter { column: "customer_id".into(), value: FilterValue::from("c1") });
        q.order = Some(Order { column: "created_at".into(), ascending: false });
        q.limit = Some(20);
        q.offset = Some(40);
        let params = query_params(&q);
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("customer_id".to_string(), "eq.c1".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "20".to_string()),
                ("offset".to_string(), "40".to_string()),
            ]
        );
    }

    #[test]
    fn parse_rows_accepts_array_object_and_empty() {
        assert_eq!(parse_rows("").unwrap().len(), 0);
        assert_eq!(parse_rows("[{\"id\":1},{\"id\":2}]").unwrap().len(), 2);
        assert_eq!(parse_rows("{\"id\":1}").unwrap().len(), 1);
        assert!(parse_rows("42").is_err());
        assert!(matches!(parse_rows("{").unwrap_err(), BackendError::Decode(_)));
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(RestBackend::new("not a url", "k", "public", Duration::from_secs(1)).is_err());
    }
}
