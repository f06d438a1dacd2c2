use std::marker::PhantomData;
use std::sync::Arc;

use models::{Record, Validate};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::repository::{BackendRepository, ListFilter, Repository};

/// CRUD operations for one entity type.
///
/// Stateless: every call validates (where applicable) and then issues one
/// repository call. Errors are surfaced to the caller untouched.
pub struct EntityService<E: Record, R: Repository<E> = BackendRepository<E>> {
    repo: Arc<R>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Record, R: Repository<E>> Clone for EntityService<E, R> {
    fn clone(&self) -> Self {
        Self { repo: Arc::clone(&self.repo), _entity: PhantomData }
    }
}

impl<E: Record, R: Repository<E>> EntityService<E, R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo, _entity: PhantomData }
    }

    /// Rows matching `filter`; no match is an empty list, not an error.
    pub async fn list(&self, filter: ListFilter) -> Result<Vec<E>, ServiceError> {
        let rows = self.repo.list(&filter).await?;
        debug!(entity = E::NAME, count = rows.len(), "listed");
        Ok(rows)
    }

    pub async fn get(&self, id: Uuid) -> Result<E, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found(E::NAME, id))
    }

    /// Validate and insert; the returned row carries the backend-assigned id.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use backend::MemoryBackend;
    /// use models::{KycStatus, NewCustomer};
    /// use service::Api;
    /// let api = Api::new(Arc::new(MemoryBackend::new()));
    /// let input = NewCustomer {
    ///     first_name: "Ana".into(),
    ///     last_name: "Lima".into(),
    ///     email: "ana@humpbank.io".into(),
    ///     phone: None,
    ///     address: None,
    ///     date_of_birth: None,
    ///     kyc_status: KycStatus::Pending,
    /// };
    /// let customer = tokio_test::block_on(api.customers.create(input)).unwrap();
    /// assert!(!customer.id.is_nil());
    /// assert_eq!(customer.email, "ana@humpbank.io");
    /// ```
    #[instrument(skip(self, input), fields(entity = E::NAME))]
    pub async fn create(&self, input: E::Input) -> Result<E, ServiceError> {
        input.validate()?;
        let created = self.repo.create(&input).await?;
        info!(id = %created.id(), "created");
        Ok(created)
    }

    /// Validate and apply a partial update; unset patch fields keep their values.
    #[instrument(skip(self, patch), fields(entity = E::NAME))]
    pub async fn update(&self, id: Uuid, patch: E::Patch) -> Result<E, ServiceError> {
        patch.validate()?;
        let updated = self.repo.update(id, &patch).await?.ok_or_else(|| ServiceError::not_found(E::NAME, id))?;
        info!("updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Api;
    use backend::{BackendError, MemoryBackend};
    use models::{Customer, CustomerPatch, KycStatus, NewCustomer};
    use serde_json::json;

    fn setup() -> (Arc<MemoryBackend>, Api) {
        let mem = Arc::new(MemoryBackend::new());
        (mem.clone(), Api::new(mem))
    }

    fn ana() -> NewCustomer {
        NewCustomer {
            first_name: "Ana".into(),
            last_name: "Lima".into(),
            email: "ana@humpbank.io".into(),
            phone: Some("+55 11 5555-0100".into()),
            address: None,
            date_of_birth: None,
            kyc_status: KycStatus::Pending,
        }
    }

    #[tokio::test]
    async fn create_returns_backend_id_and_input_fields() -> anyhow::Result<()> {
        let (mem, api) = setup();
        let input = ana();
        let c = api.customers.create(input.clone()).await?;
        assert!(!c.id.is_nil());
        assert_eq!(c.first_name, input.first_name);
        assert_eq!(c.last_name, input.last_name);
        assert_eq!(c.email, input.email);
        assert_eq!(c.phone, input.phone);
        assert_eq!(c.kyc_status, input.kyc_status);
        assert_eq!(mem.round_trips(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_backend() {
        let (mem, api) = setup();
        let mut input = ana();
        input.email = "not-an-email".into();
        let err = api.customers.create(input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(mem.round_trips(), 0);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let (_, api) = setup();
        let err = api.customers.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_without_matches_is_empty() -> anyhow::Result<()> {
        let (_, api) = setup();
        api.customers.create(ana()).await?;
        let rows = api.customers.list(ListFilter::new().eq("kyc_status", "rejected")).await?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_changes_patched_fields_only() -> anyhow::Result<()> {
        let (_, api) = setup();
        let c = api.customers.create(ana()).await?;
        let patch = CustomerPatch { kyc_status: Some(KycStatus::Verified), phone: Some(None), ..Default::default() };
        let u = api.customers.update(c.id, patch).await?;
        assert_eq!(u.id, c.id);
        assert_eq!(u.kyc_status, KycStatus::Verified);
        assert_eq!(u.phone, None);
        assert_eq!(u.first_name, c.first_name);
        assert_eq!(u.email, c.email);
        assert_eq!(u.created_at, c.created_at);
        assert_eq!(api.customers.get(c.id).await?, u);
        Ok(())
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let (mem, api) = setup();
        let patch = CustomerPatch { first_name: Some("Bia".into()), ..Default::default() };
        let err = api.customers.update(Uuid::new_v4(), patch).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(mem.round_trips(), 1);
    }

    #[tokio::test]
    async fn empty_patch_is_a_validation_error() {
        let (mem, api) = setup();
        let err = api.customers.update(Uuid::new_v4(), CustomerPatch::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(mem.round_trips(), 0);
    }

    #[tokio::test]
    async fn backend_failures_propagate() {
        let (mem, api) = setup();
        mem.fail_next(BackendError::Transport("timeout".into())).await;
        let err = api.customers.list(ListFilter::new()).await.unwrap_err();
        assert_eq!(err, ServiceError::Backend(BackendError::Transport("timeout".into())));

        mem.fail_next(BackendError::query(500, Some("XX000"), "internal")).await;
        let err = api.customers.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Backend(_)));
    }

    #[tokio::test]
    async fn undecodable_rows_are_backend_errors() {
        let (mem, api) = setup();
        mem.seed(Customer::TABLE, vec![json!({"id": "not-a-uuid", "first_name": "X"})]).await;
        let err = api.customers.list(ListFilter::new()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Backend(BackendError::Decode(_))));
    }

    #[tokio::test]
    async fn list_orders_and_pages() -> anyhow::Result<()> {
        let (_, api) = setup();
        for (first, last) in [("Caio", "Alves"), ("Bia", "Costa"), ("Dora", "Braga")] {
            let mut input = ana();
            input.first_name = first.into();
            input.last_name = last.into();
            api.customers.create(input).await?;
        }
        let rows = api.customers.list(ListFilter::new().order_by("last_name", true)).await?;
        let names: Vec<_> = rows.iter().map(|c| c.last_name.as_str()).collect();
        assert_eq!(names, ["Alves", "Braga", "Costa"]);

        let page = crate::Pagination { page: 2, per_page: 2 };
        let rows = api.customers.list(ListFilter::new().order_by("last_name", true).page(page)).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].last_name, "Costa");
        Ok(())
    }
}
