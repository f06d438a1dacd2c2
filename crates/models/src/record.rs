use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

/// Column ordering applied to list queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortOrder {
    pub column: &'static str,
    pub ascending: bool,
}

impl SortOrder {
    pub const fn asc(column: &'static str) -> Self { Self { column, ascending: true } }
    pub const fn desc(column: &'static str) -> Self { Self { column, ascending: false } }
}

/// Input checks that run before anything is sent to the backend.
pub trait Validate {
    fn validate(&self) -> Result<(), ModelError>;
}

/// A row type stored in one backend table.
///
/// The `id` is always assigned by the backend; `Input` and `Patch` never carry it.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Backend table name.
    const TABLE: &'static str;
    /// Human-readable singular name used in error messages.
    const NAME: &'static str;
    /// Ordering used when a list call does not ask for one.
    const DEFAULT_ORDER: SortOrder;

    type Input: Serialize + DeserializeOwned + Validate + Send + Sync + 'static;
    type Patch: Serialize + DeserializeOwned + Validate + Send + Sync + 'static;

    fn id(&self) -> Uuid;
}

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`)
/// so patches can clear nullable columns.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Fails with "nothing to update" when every field of a patch is unset.
pub(crate) fn require_any(name: &str, fields: &[bool]) -> Result<(), ModelError> {
    if fields.iter().any(|set| *set) {
        Ok(())
    } else {
        Err(ModelError::Validation(format!("{name} patch has nothing to update")))
    }
}
