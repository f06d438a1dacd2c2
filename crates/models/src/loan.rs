use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::record::{double_option, require_any, Record, SortOrder, Validate};
use crate::validate;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Active,
    Closed,
    Defaulted,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[serde(default)]
    pub loan_product_id: Option<Uuid>,
    pub principal: Decimal,
    pub interest_rate: Decimal,
    pub term_months: i32,
    #[serde(default)]
    pub status: LoanStatus,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewLoan {
    pub customer_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_product_id: Option<Uuid>,
    pub principal: Decimal,
    pub interest_rate: Decimal,
    pub term_months: i32,
    #[serde(default)]
    pub status: LoanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LoanStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub start_date: Option<Option<NaiveDate>>,
}

impl LoanPatch {
    pub fn status(status: LoanStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }
}

impl Validate for NewLoan {
    fn validate(&self) -> Result<(), ModelError> {
        validate::positive("principal", self.principal)?;
        validate::rate("interest_rate", self.interest_rate)?;
        validate::term("term_months", self.term_months)
    }
}

impl Validate for LoanPatch {
    fn validate(&self) -> Result<(), ModelError> {
        require_any(
            Loan::NAME,
            &[
                self.principal.is_some(),
                self.interest_rate.is_some(),
                self.term_months.is_some(),
                self.status.is_some(),
                self.start_date.is_some(),
            ],
        )?;
        if let Some(v) = self.principal { validate::positive("principal", v)?; }
        if let Some(v) = self.interest_rate { validate::rate("interest_rate", v)?; }
        if let Some(v) = self.term_months { validate::term("term_months", v)?; }
        Ok(())
    }
}

impl Record for Loan {
    const TABLE: &'static str = "loans";
    const NAME: &'static str = "loan";
    const DEFAULT_ORDER: SortOrder = SortOrder::desc("created_at");

    type Input = NewLoan;
    type Patch = LoanPatch;

    fn id(&self) -> Uuid { self.id }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_loan_rules() {
        let mut l = NewLoan {
            customer_id: Uuid::new_v4(),
            loan_product_id: None,
            principal: Decimal::new(10_000, 0),
            interest_rate: Decimal::new(95, 1),
            term_months: 36,
            status: LoanStatus::Pending,
            start_date: None,
        };
        assert!(l.validate().is_ok());
        l.term_months = 0;
        assert!(l.validate().is_err());
    }

    #[test]
    fn status_patch_helper() {
        let p = LoanPatch::status(LoanStatus::Approved);
        assert!(p.validate().is_ok());
        assert_eq!(serde_json::to_value(&p).unwrap(), serde_json::json!({"status": "approved"}));
    }
}
