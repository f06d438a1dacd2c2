//! Backend client capability.
//!
//! A fluent, PostgREST-shaped query builder (`from/select/eq/order/insert/update`)
//! whose every chain ends in a single round trip producing `{ data, error }`.
//! The transport sits behind the [`Backend`] trait: [`RestBackend`] talks to the
//! hosted service over HTTP, [`MemoryBackend`] keeps tables in process and is
//! what the test suites mock the backend with.

pub mod client;
pub mod error;
pub mod memory;
pub mod query;
pub mod rest;

use std::sync::Arc;

pub use client::{Backend, BackendClient};
pub use error::BackendError;
pub use memory::MemoryBackend;
pub use query::{Filter, FilterValue, Operation, Order, Query, QueryBuilder, Response};
pub use rest::RestBackend;

/// Build the backend selected by configuration. An empty URL yields an
/// in-memory store.
pub fn from_config(cfg: &configs::BackendConfig) -> Result<Arc<dyn Backend>, BackendError> {
    if cfg.is_in_memory() {
        tracing::warn!("no backend url configured; using in-memory backend, data will not persist");
        return Ok(Arc::new(MemoryBackend::new()));
    }
    Ok(Arc::new(RestBackend::from_config(cfg)?))
}
