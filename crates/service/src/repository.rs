use std::marker::PhantomData;

use async_trait::async_trait;
use backend::{BackendClient, FilterValue};
use models::Record;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// List options: at most one equality filter, one ordering and one page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListFilter {
    pub eq: Option<(String, FilterValue)>,
    pub order: Option<(String, bool)>,
    pub page: Option<Pagination>,
}

impl ListFilter {
    pub fn new() -> Self { Self::default() }

    pub fn eq(mut self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.eq = Some((column.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some((column.to_string(), ascending));
        self
    }

    pub fn page(mut self, page: Pagination) -> Self {
        self.page = Some(page);
        self
    }
}

/// Persistence seam for one entity type.
///
/// Absence is reported as `Ok(None)`; the service decides whether that is an error.
#[async_trait]
pub trait Repository<E: Record>: Send + Sync {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<E>, ServiceError>;
    async fn get(&self, id: Uuid) -> Result<Option<E>, ServiceError>;
    async fn create(&self, input: &E::Input) -> Result<E, ServiceError>;
    async fn update(&self, id: Uuid, patch: &E::Patch) -> Result<Option<E>, ServiceError>;
}

/// Repository over the backend query builder; one round trip per call.
pub struct BackendRepository<E> {
    client: BackendClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E> BackendRepository<E> {
    pub fn new(client: BackendClient) -> Self {
        Self { client, _entity: PhantomData }
    }
}

impl<E> Clone for BackendRepository<E> {
    fn clone(&self) -> Self {
        Self::new(self.client.clone())
    }
}

#[async_trait]
impl<E: Record> Repository<E> for BackendRepository<E> {
    async fn list(&self, filter: &ListFilter) -> Result<Vec<E>, ServiceError> {
        let mut q = self.client.from(E::TABLE).select("*");
        if let Some((column, value)) = &filter.eq {
            q = q.eq(column, value.clone());
        }
        q = match &filter.order {
            Some((column, ascending)) => q.order(column, *ascending),
            None => q.order(E::DEFAULT_ORDER.column, E::DEFAULT_ORDER.ascending),
        };
        if let Some(page) = filter.page {
            let (offset, limit) = page.normalize();
            q = q.offset(offset).limit(limit);
        }
        Ok(q.execute().await.rows::<E>()?)
    }

    async fn get(&self, id: Uuid) -> Result<Option<E>, ServiceError> {
        let res = self.client.from(E::TABLE).select("*").eq("id", id).execute().await;
        Ok(res.maybe_single::<E>()?)
    }

    async fn create(&self, input: &E::Input) -> Result<E, ServiceError> {
        let res = self.client.from(E::TABLE).insert(input).select("*").execute().await;
        res.maybe_single::<E>()?.ok_or_else(|| {
            ServiceError::Backend(backend::BackendError::Decode(format!("insert into {} returned no row", E::TABLE)))
        })
    }

    async fn update(&self, id: Uuid, patch: &E::Patch) -> Result<Option<E>, ServiceError> {
        let res = self.client.from(E::TABLE).update(patch).eq("id", id).select("*").execute().await;
        Ok(res.maybe_single::<E>()?)
    }
}
