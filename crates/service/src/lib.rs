//! Entity Service layer: CRUD operations per HUMPBANK entity over the backend
//! client capability.
//! - Repositories are the persistence seam (`Repository<E>`), so services can be
//!   exercised against any backend, including the in-memory one.
//! - Validation lives in `models` and runs before any round trip.
//! - All failures surface as `ServiceError`.

pub mod api;
pub mod dashboard;
pub mod entities;
pub mod entity;
pub mod errors;
pub mod pagination;
pub mod repository;

pub use api::Api;
pub use dashboard::DashboardService;
pub use entities::*;
pub use entity::EntityService;
pub use errors::ServiceError;
pub use pagination::Pagination;
pub use repository::{BackendRepository, ListFilter, Repository};
