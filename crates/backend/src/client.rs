use std::sync::Arc;

use async_trait::async_trait;

use crate::query::{Query, QueryBuilder, Response};

/// Transport executing one fully built query per call.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn execute(&self, query: Query) -> Response;
}

/// Cloneable handle the services share; injected, never global.
#[derive(Clone)]
pub struct BackendClient {
    backend: Arc<dyn Backend>,
}

impl BackendClient {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Start a query chain against `table`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use backend::{BackendClient, MemoryBackend};
    /// let client = BackendClient::new(Arc::new(MemoryBackend::new()));
    /// let rows = tokio_test::block_on(
    ///     client.from("customers").select("*").eq("kyc_status", "verified").order("last_name", true).execute(),
    /// )
    /// .into_result()
    /// .unwrap();
    /// assert!(rows.is_empty());
    /// ```
    pub fn from(&self, table: &str) -> QueryBuilder {
        QueryBuilder::new(Arc::clone(&self.backend), table)
    }
}
