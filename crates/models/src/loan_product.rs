use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::record::{double_option, require_any, Record, SortOrder, Validate};
use crate::validate;

/// A loan offering customers can apply for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoanProduct {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub interest_rate: Decimal,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub min_term_months: i32,
    pub max_term_months: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl LoanProduct {
    /// Whether a requested principal and term fall inside this product's bounds.
    pub fn accepts(&self, principal: Decimal, term_months: i32) -> bool {
        self.is_active
            && principal >= self.min_amount
            && principal <= self.max_amount
            && term_months >= self.min_term_months
            && term_months <= self.max_term_months
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewLoanProduct {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub interest_rate: Decimal,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub min_term_months: i32,
    pub max_term_months: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_term_months: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_term_months: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

fn default_active() -> bool { true }

fn bounds(min_amount: Decimal, max_amount: Decimal, min_term: i32, max_term: i32) -> Result<(), ModelError> {
    if min_amount > max_amount {
        return Err(ModelError::invalid("min_amount", "must not exceed max_amount"));
    }
    if min_term > max_term {
        return Err(ModelError::invalid("min_term_months", "must not exceed max_term_months"));
    }
    Ok(())
}

impl Validate for NewLoanProduct {
    fn validate(&self) -> Result<(), ModelError> {
        validate::non_empty("name", &self.name)?;
        validate::rate("interest_rate", self.interest_rate)?;
        validate::positive("min_amount", self.min_amount)?;
        validate::positive("max_amount", self.max_amount)?;
        validate::term("min_term_months", self.min_term_months)?;
        validate::term("max_term_months", self.max_term_months)?;
        bounds(self.min_amount, self.max_amount, self.min_term_months, self.max_term_months)
    }
}

impl Validate for LoanProductPatch {
    fn validate(&self) -> Result<(), ModelError> {
        require_any(
            LoanProduct::NAME,
            &[
                self.name.is_some(),
                self.description.is_some(),
                self.interest_rate.is_some(),
                self.min_amount.is_some(),
                self.max_amount.is_some(),
                self.min_term_months.is_some(),
                self.max_term_months.is_some(),
                self.is_active.is_some(),
            ],
        )?;
        if let Some(v) = &self.name { validate::non_empty("name", v)?; }
        if let Some(v) = self.interest_rate { validate::rate("interest_rate", v)?; }
        if let Some(v) = self.min_amount { validate::positive("min_amount", v)?; }
        if let Some(v) = self.max_amount { validate::positive("max_amount", v)?; }
        if let Some(v) = self.min_term_months { validate::term("min_term_months", v)?; }
        if let Some(v) = self.max_term_months { validate::term("max_term_months", v)?; }
        // Only pairs supplied together can be cross-checked without reading the row.
        if let (Some(lo), Some(hi)) = (self.min_amount, self.max_amount) {
            if lo > hi { return Err(ModelError::invalid("min_amount", "must not exceed max_amount")); }
        }
        if let (Some(lo), Some(hi)) = (self.min_term_months, self.max_term_months) {
            if lo > hi { return Err(ModelError::invalid("min_term_months", "must not exceed max_term_months")); }
        }
        Ok(())
    }
}

impl Record for LoanProduct {
    const TABLE: &'static str = "loan_products";
    const NAME: &'static str = "loan product";
    const DEFAULT_ORDER: SortOrder = SortOrder::asc("name");

    type Input = NewLoanProduct;
    type Patch = LoanProductPatch;

    fn id(&self) -> Uuid { self.id }
}
