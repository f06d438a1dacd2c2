use backend::BackendError;
use models::ModelError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// Input rejected before any round trip.
    #[error("validation error: {0}")]
    Validation(String),
    /// Zero rows where exactly one was expected.
    #[error("not found: {0}")]
    NotFound(String),
    /// Transport, query or decode failure reported by the backend.
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
        }
    }
}

impl ServiceError {
    pub fn not_found(entity: &str, id: Uuid) -> Self { Self::NotFound(format!("{entity} {id} not found")) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::NotFound(_) => 1003,
            ServiceError::Backend(_) => 1200,
        }
    }
}
