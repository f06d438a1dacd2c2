use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::client::Backend;
use crate::error::BackendError;

#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    Select,
    Insert(Value),
    Update(Value),
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Select => "select",
            Operation::Insert(_) => "insert",
            Operation::Update(_) => "update",
        }
    }
}

/// Scalar used on the right-hand side of an equality filter.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterValue(pub Value);

impl FilterValue {
    /// Textual form as it appears in a PostgREST `col=eq.<value>` parameter.
    pub fn as_param(&self) -> String {
        param_text(&self.0)
    }
}

pub(crate) fn param_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self { Self(Value::String(v.to_string())) }
}
impl From<String> for FilterValue {
    fn from(v: String) -> Self { Self(Value::String(v)) }
}
impl From<Uuid> for FilterValue {
    fn from(v: Uuid) -> Self { Self(Value::String(v.to_string())) }
}
impl From<bool> for FilterValue {
    fn from(v: bool) -> Self { Self(Value::Bool(v)) }
}
impl From<i32> for FilterValue {
    fn from(v: i32) -> Self { Self(Value::from(v)) }
}
impl From<i64> for FilterValue {
    fn from(v: i64) -> Self { Self(Value::from(v)) }
}
impl From<Value> for FilterValue {
    fn from(v: Value) -> Self { Self(v) }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: FilterValue,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// A fully described request against one table.
#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub table: String,
    pub operation: Operation,
    /// Columns to return; `*` for all.
    pub columns: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Query {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            operation: Operation::Select,
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
            offset: None,
        }
    }
}

/// Terminal result of a query chain: the rows or the error, never both.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Response {
    pub data: Option<Vec<Value>>,
    pub error: Option<BackendError>,
}

impl Response {
    pub fn ok(rows: Vec<Value>) -> Self {
        Self { data: Some(rows), error: None }
    }

    pub fn err(error: BackendError) -> Self {
        Self { data: None, error: Some(error) }
    }

    /// Raw rows; a missing `data` with no error reads as zero rows.
    pub fn into_result(self) -> Result<Vec<Value>, BackendError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.data.unwrap_or_default()),
        }
    }

    pub fn rows<T: DeserializeOwned>(self) -> Result<Vec<T>, BackendError> {
        self.into_result()?
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| BackendError::Decode(e.to_string())))
            .collect()
    }

    /// Zero or one row; more than one is a cardinality error.
    pub fn maybe_single<T: DeserializeOwned>(self) -> Result<Option<T>, BackendError> {
        let mut rows = self.rows::<T>()?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(BackendError::Cardinality(n)),
        }
    }
}

/// Fluent builder returned by [`crate::BackendClient::from`].
///
/// Nothing is sent until [`QueryBuilder::execute`]. Serialization failures of
/// `insert`/`update` payloads surface as the response error.
pub struct QueryBuilder {
    backend: Arc<dyn Backend>,
    query: Query,
    pending: Option<BackendError>,
}

impl QueryBuilder {
    pub(crate) fn new(backend: Arc<dyn Backend>, table: &str) -> Self {
        Self { backend, query: Query::new(table), pending: None }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.query.columns = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.query.filters.push(Filter { column: column.to_string(), value: value.into() });
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.query.order = Some(Order { column: column.to_string(), ascending });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.query.offset = Some(offset);
        self
    }

    pub fn insert<T: Serialize + ?Sized>(mut self, row: &T) -> Self {
        match serde_json::to_value(row) {
            Ok(v) => self.query.operation = Operation::Insert(v),
            Err(e) => self.pending = Some(BackendError::InvalidRequest(e.to_string())),
        }
        self
    }

    pub fn update<T: Serialize + ?Sized>(mut self, patch: &T) -> Self {
        match serde_json::to_value(patch) {
            Ok(v) => self.query.operation = Operation::Update(v),
            Err(e) => self.pending = Some(BackendError::InvalidRequest(e.to_string())),
        }
        self
    }

    /// The request as built so far.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Send the request: exactly one call into the backend.
    pub async fn execute(self) -> Response {
        if let Some(e) = self.pending {
            return Response::err(e);
        }
        self.backend.execute(self.query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn filter_values_render_as_params() {
        let id = Uuid::nil();
        assert_eq!(FilterValue::from(id).as_param(), "00000000-0000-0000-0000-000000000000");
        assert_eq!(FilterValue::from(true).as_param(), "true");
        assert_eq!(FilterValue::from(42i64).as_param(), "42");
        assert_eq!(FilterValue::from("active").as_param(), "active");
        assert_eq!(FilterValue::from(Value::Null).as_param(), "null");
    }

    #[test]
    fn response_error_wins_over_data() {
        let r = Response { data: Some(vec![json!({})]), error: Some(BackendError::Transport("down".into())) };
        assert!(r.into_result().is_err());
        assert_eq!(Response::default().into_result().unwrap(), Vec::<Value>::new());
    }

    #[test]
    fn maybe_single_cardinality() {
        #[derive(serde::Deserialize, Debug)]
        struct Row {
            n: i32,
        }
        let none: Option<Row> = Response::ok(vec![]).maybe_single().unwrap();
        assert!(none.is_none());
        let one: Option<Row> = Response::ok(vec![json!({"n": 1})]).maybe_single().unwrap();
        assert_eq!(one.unwrap().n, 1);
        let many = Response::ok(vec![json!({"n": 1}), json!({"n": 2})]).maybe_single::<Row>();
        assert_eq!(many.unwrap_err(), BackendError::Cardinality(2));
    }

    #[test]
    fn decode_failure_is_reported() {
        #[derive(serde::Deserialize, Debug)]
        struct Row {
            #[allow(dead_code)]
            n: i32,
        }
        let err = Response::ok(vec![json!({"n": "x"})]).rows::<Row>().unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }
}
