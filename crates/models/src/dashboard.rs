use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read-only aggregate computed by the backend's `dashboard_stats` view.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_customers: i64,
    pub total_accounts: i64,
    pub total_deposits: Decimal,
    pub active_loans: i64,
    pub pending_loans: i64,
    pub total_loan_amount: Decimal,
}

impl DashboardStats {
    pub const VIEW: &'static str = "dashboard_stats";
}
