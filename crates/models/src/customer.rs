use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::record::{double_option, require_any, Record, SortOrder, Validate};
use crate::validate;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub kyc_status: KycStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub kyc_status: KycStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kyc_status: Option<KycStatus>,
}

impl Validate for NewCustomer {
    fn validate(&self) -> Result<(), ModelError> {
        validate::non_empty("first_name", &self.first_name)?;
        validate::non_empty("last_name", &self.last_name)?;
        validate::email(&self.email)?;
        if let Some(dob) = self.date_of_birth {
            validate::past_date("date_of_birth", dob)?;
        }
        Ok(())
    }
}

impl Validate for CustomerPatch {
    fn validate(&self) -> Result<(), ModelError> {
        require_any(
            Customer::NAME,
            &[
                self.first_name.is_some(),
                self.last_name.is_some(),
                self.email.is_some(),
                self.phone.is_some(),
                self.address.is_some(),
                self.date_of_birth.is_some(),
                self.kyc_status.is_some(),
            ],
        )?;
        if let Some(v) = &self.first_name { validate::non_empty("first_name", v)?; }
        if let Some(v) = &self.last_name { validate::non_empty("last_name", v)?; }
        if let Some(v) = &self.email { validate::email(v)?; }
        if let Some(Some(dob)) = self.date_of_birth { validate::past_date("date_of_birth", dob)?; }
        Ok(())
    }
}

impl Record for Customer {
    const TABLE: &'static str = "customers";
    const NAME: &'static str = "customer";
    const DEFAULT_ORDER: SortOrder = SortOrder::desc("created_at");

    type Input = NewCustomer;
    type Patch = CustomerPatch;

    fn id(&self) -> Uuid { self.id }
}
