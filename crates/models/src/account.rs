use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::record::{require_any, Record, SortOrder, Validate};
use crate::validate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Savings,
    Checking,
    FixedDeposit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Frozen,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub account_number: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub customer_id: Uuid,
    pub account_number: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
}

fn default_currency() -> String { "USD".to_string() }

impl Validate for NewAccount {
    fn validate(&self) -> Result<(), ModelError> {
        validate::account_number(&self.account_number)?;
        validate::non_negative("balance", self.balance)?;
        validate::currency(&self.currency)
    }
}

impl Validate for AccountPatch {
    fn validate(&self) -> Result<(), ModelError> {
        require_any(Account::NAME, &[self.account_type.is_some(), self.balance.is_some(), self.status.is_some()])?;
        if let Some(b) = self.balance { validate::non_negative("balance", b)?; }
        Ok(())
    }
}

impl Record for Account {
    const TABLE: &'static str = "accounts";
    const NAME: &'static str = "account";
    const DEFAULT_ORDER: SortOrder = SortOrder::desc("created_at");

    type Input = NewAccount;
    type Patch = AccountPatch;

    fn id(&self) -> Uuid { self.id }
}
