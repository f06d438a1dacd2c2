use std::cmp::Ordering;
use std::str::FromStr;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::client::Backend;
use crate::error::BackendError;
use crate::query::{param_text, Filter, Operation, Order, Query, Response};

type Row = Map<String, Value>;

/// In-process tables with backend-like semantics: `id` and `created_at`
/// are assigned on insert, filters/order/limit behave like PostgREST.
///
/// Also the mock used by tests: failures can be queued and every
/// `execute` call is counted as one round trip.
#[derive(Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<String, Vec<Row>>>,
    failures: Mutex<VecDeque<BackendError>>,
    round_trips: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rows verbatim (no id or timestamp assignment). Non-object values are skipped.
    pub async fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut tables = self.tables.write().await;
        let entry = tables.entry(table.to_string()).or_default();
        entry.extend(rows.into_iter().filter_map(|v| match v {
            Value::Object(m) => Some(m),
            _ => None,
        }));
    }

    /// Snapshot of a table's rows in insertion order.
    pub async fn rows(&self, table: &str) -> Vec<Value> {
        let tables = self.tables.read().await;
        tables.get(table).map(|rows| rows.iter().cloned().map(Value::Object).collect()).unwrap_or_default()
    }

    /// Make the next `execute` fail with `error`. Queued failures are served in order.
    pub async fn fail_next(&self, error: BackendError) {
        self.failures.lock().await.push_back(error);
    }

    /// Number of `execute` calls served so far.
    pub fn round_trips(&self) -> usize {
        self.round_trips.load(AtomicOrdering::SeqCst)
    }

    async fn select(&self, query: &Query) -> Response {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Row> = tables
            .get(&query.table)
            .map(|rows| rows.iter().filter(|r| matches_all(r, &query.filters)).collect())
            .unwrap_or_default();
        if let Some(order) = &query.order {
            rows.sort_by(|a, b| compare_rows(a, b, order));
        }
        let offset = query.offset.unwrap_or(0) as usize;
        let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);
        let data = rows.into_iter().skip(offset).take(limit).map(|r| project(r, &query.columns)).collect();
        Response::ok(data)
    }

    async fn insert(&self, query: &Query, payload: &Value) -> Response {
        let incoming: Vec<Row> = match payload {
            Value::Object(m) => vec![m.clone()],
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Object(m) => out.push(m.clone()),
                        _ => return Response::err(BackendError::InvalidRequest("insert rows must be objects".into())),
                    }
                }
                out
            }
            _ => return Response::err(BackendError::InvalidRequest("insert payload must be an object".into())),
        };

        let mut tables = self.tables.write().await;
        let table = tables.entry(query.table.clone()).or_default();
        let mut staged: Vec<Row> = Vec::with_capacity(incoming.len());
        for mut row in incoming {
            let id = row
                .entry("id")
                .or_insert_with(|| Value::String(Uuid::new_v4().to_string()))
                .clone();
            // All-or-nothing, like a single INSERT statement.
            if table.iter().chain(staged.iter()).any(|r| r.get("id") == Some(&id)) {
                return Response::err(BackendError::query(
                    409,
                    Some("23505"),
                    format!("duplicate key value violates unique constraint \"{}_pkey\"", query.table),
                ));
            }
            row.entry("created_at")
                .or_insert_with(|| Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)));
            staged.push(row);
        }
        let created = staged.iter().map(|r| project(r, &query.columns)).collect();
        table.extend(staged);
        Response::ok(created)
    }

    async fn update(&self, query: &Query, payload: &Value) -> Response {
        let Value::Object(patch) = payload else {
            return Response::err(BackendError::InvalidRequest("update payload must be an object".into()));
        };
        let mut tables = self.tables.write().await;
        let Some(rows) = tables.get_mut(&query.table) else {
            return Response::ok(Vec::new());
        };
        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|r| matches_all(r, &query.filters)) {
            for (k, v) in patch {
                row.insert(k.clone(), v.clone());
            }
            updated.push(project(row, &query.columns));
        }
        Response::ok(updated)
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn execute(&self, query: Query) -> Response {
        self.round_trips.fetch_add(1, AtomicOrdering::SeqCst);
        debug!(table = %query.table, op = query.operation.name(), "memory backend request");
        if let Some(err) = self.failures.lock().await.pop_front() {
            return Response::err(err);
        }
        match &query.operation {
            Operation::Select => self.select(&query).await,
            Operation::Insert(payload) => self.insert(&query, payload).await,
            Operation::Update(payload) => self.update(&query, payload).await,
        }
    }
}

fn matches_all(row: &Row, filters: &[Filter]) -> bool {
    filters.iter().all(|f| row.get(&f.column).is_some_and(|v| values_equal(v, &f.value.0)))
}

/// Textual equality, except that two numeric forms match by value (`1500` = `"1500.00"`).
fn values_equal(stored: &Value, wanted: &Value) -> bool {
    match (numeric(stored), numeric(wanted)) {
        (Some(a), Some(b)) => a == b,
        _ => param_text(stored) == param_text(wanted),
    }
}

/// Decimal reading of a number or numeric string. Strings with a leading
/// zero (`"007"`) stay text so identifiers like account numbers keep their form.
fn numeric(v: &Value) -> Option<Decimal> {
    let text = match v {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    let digits = text.trim_start_matches(['-', '+']);
    if digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.") {
        return None;
    }
    Decimal::from_str(&text).ok()
}

/// Ascending puts nulls last, descending puts them first, as Postgres does.
fn compare_rows(a: &Row, b: &Row, order: &Order) -> Ordering {
    let ord = compare_values(a.get(&order.column), b.get(&order.column));
    if order.ascending { ord } else { ord.reverse() }
}

/// Sort key of a non-null value: booleans, then numbers (numeric strings
/// included), then text, then anything else by its JSON form.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Bool(bool),
    Number(Decimal),
    Text(String),
    Other(String),
}

fn sort_key(v: &Value) -> SortKey {
    if let Some(d) = numeric(v) {
        return SortKey::Number(d);
    }
    match v {
        Value::Bool(b) => SortKey::Bool(*b),
        Value::String(s) => SortKey::Text(s.clone()),
        other => SortKey::Other(other.to_string()),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => sort_key(x).cmp(&sort_key(y)),
    }
}

fn project(row: &Row, columns: &str) -> Value {
    let columns = columns.trim();
    if columns.is_empty() || columns == "*" {
        return Value::Object(row.clone());
    }
    let mut out = Map::new();
    for col in columns.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        if let Some(v) = row.get(col) {
            out.insert(col.to_string(), v.clone());
        }
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::BackendClient;
    use serde_json::json;
    use std::sync::Arc;

    fn client() -> (Arc<MemoryBackend>, BackendClient) {
        let mem = Arc::new(MemoryBackend::new());
        (mem.clone(), BackendClient::new(mem))
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let (mem, client) = client();
        let rows = client.from("customers").insert(&json!({"first_name": "Ana"})).execute().await.into_result().unwrap();
        assert_eq!(rows.len(), 1);
        let id = rows[0]["id"].as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
        assert!(rows[0]["created_at"].is_string());
        assert_eq!(rows[0]["first_name"], "Ana");
        assert_eq!(mem.rows("customers").await.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_id_is_a_conflict() {
        let (_, client) = client();
        let row = json!({"id": "a"});
        client.from("t").insert(&row).execute().await.into_result().unwrap();
        let err = client.from("t").insert(&row).execute().await.into_result().unwrap_err();
        assert_eq!(err.code(), Some("23505"));
    }

    #[tokio::test]
    async fn select_filters_orders_and_pages() {
        let (mem, client) = client();
        mem.seed(
            "loans",
            vec![
                json!({"id": "1", "status": "active", "principal": 300}),
                json!({"id": "2", "status": "pending", "principal": 100}),
                json!({"id": "3", "status": "active", "principal": 200}),
                json!({"id": "4", "status": "active", "principal": null}),
            ],
        )
        .await;

        let rows = client.from("loans").eq("status", "active").order("principal", true).execute().await.into_result().unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["3", "1", "4"]);

        let rows = client.from("loans").order("principal", false).limit(2).offset(1).execute().await.into_result().unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["1", "3"]);

        let rows = client.from("loans").select("id").eq("status", "closed").execute().await.into_result().unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn decimal_strings_order_numerically() {
        let (mem, client) = client();
        mem.seed("accounts", vec![json!({"id": "a", "balance": "900.00"}), json!({"id": "b", "balance": "1500.00"})]).await;
        let rows = client.from("accounts").order("balance", false).execute().await.into_result().unwrap();
        assert_eq!(rows[0]["id"], "b");
    }

    #[tokio::test]
    async fn mixed_text_column_sorts_without_panicking() {
        let (mem, client) = client();
        let refs = ["10", "9", "1x", "2", "1a", "30", "3z", "nan", "inf", "007"];
        let rows = (0..60).map(|i| json!({"id": i.to_string(), "reference": refs[i % refs.len()]})).collect();
        mem.seed("transactions", rows).await;

        let rows = client.from("transactions").order("reference", true).execute().await.into_result().unwrap();
        assert_eq!(rows.len(), 60);
        let mut seen: Vec<&str> = rows.iter().map(|r| r["reference"].as_str().unwrap()).collect();
        seen.dedup();
        assert_eq!(seen, ["2", "9", "10", "30", "007", "1a", "1x", "3z", "inf", "nan"]);
    }

    #[tokio::test]
    async fn numeric_filters_match_by_value() {
        let (mem, client) = client();
        mem.seed(
            "accounts",
            vec![
                json!({"id": "a", "balance": "1500.00", "account_number": "007"}),
                json!({"id": "b", "balance": "15.00", "account_number": "7"}),
            ],
        )
        .await;
        let rows = client.from("accounts").eq("balance", "1500").execute().await.into_result().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "a");
        let rows = client.from("accounts").eq("account_number", "7").execute().await.into_result().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "b");
    }

    #[tokio::test]
    async fn select_projects_columns() {
        let (mem, client) = client();
        mem.seed("users", vec![json!({"id": "u1", "email": "a@b.co", "role": "admin"})]).await;
        let rows = client.from("users").select("id, role").execute().await.into_result().unwrap();
        assert_eq!(rows, vec![json!({"id": "u1", "role": "admin"})]);
    }

    #[tokio::test]
    async fn update_merges_matching_rows_only() {
        let (mem, client) = client();
        mem.seed("notifications", vec![json!({"id": "n1", "is_read": false}), json!({"id": "n2", "is_read": false})]).await;
        let rows = client
            .from("notifications")
            .update(&json!({"is_read": true}))
            .eq("id", "n2")
            .execute()
            .await
            .into_result()
            .unwrap();
        assert_eq!(rows, vec![json!({"id": "n2", "is_read": true})]);
        let all = mem.rows("notifications").await;
        assert_eq!(all[0]["is_read"], false);

        let none = client.from("notifications").update(&json!({"is_read": true})).eq("id", "zz").execute().await;
        assert_eq!(none.into_result().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn queued_failures_are_served_once_and_counted() {
        let (mem, client) = client();
        mem.fail_next(BackendError::Transport("connection reset".into())).await;
        let first = client.from("accounts").execute().await;
        assert_eq!(first.error, Some(BackendError::Transport("connection reset".into())));
        let second = client.from("accounts").execute().await;
        assert!(second.error.is_none());
        assert_eq!(mem.round_trips(), 2);
    }
}
