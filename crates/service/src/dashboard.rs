use backend::BackendClient;
use models::DashboardStats;

use crate::errors::ServiceError;

/// Read-only access to the dashboard aggregate.
#[derive(Clone)]
pub struct DashboardService {
    client: BackendClient,
}

impl DashboardService {
    pub fn new(client: BackendClient) -> Self { Self { client } }

    pub async fn stats(&self) -> Result<DashboardStats, ServiceError> {
        let res = self.client.from(DashboardStats::VIEW).select("*").limit(1).execute().await;
        res.maybe_single::<DashboardStats>()?
            .ok_or_else(|| ServiceError::NotFound("dashboard stats not found".into()))
    }
}
