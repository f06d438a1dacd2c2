use thiserror::Error;

/// Failure reported by the backend collaborator or the transport in front of it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("{message}")]
    Query {
        status: u16,
        code: Option<String>,
        message: String,
        details: Option<String>,
        hint: Option<String>,
    },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("expected at most one row, got {0}")]
    Cardinality(usize),
}

impl BackendError {
    pub fn query(status: u16, code: Option<&str>, message: impl Into<String>) -> Self {
        Self::Query { status, code: code.map(str::to_string), message: message.into(), details: None, hint: None }
    }

    /// Backend error code (Postgres SQLSTATE or PostgREST `PGRST*`), when one was reported.
    pub fn code(&self) -> Option<&str> {
        match self {
            BackendError::Query { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
