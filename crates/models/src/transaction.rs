use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::record::{double_option, require_any, Record, SortOrder, Validate};
use crate::validate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    LoanDisbursement,
    LoanRepayment,
    Fee,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub account_id: Uuid,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Amount and type are fixed once booked; only the annotations change.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub reference: Option<Option<String>>,
}

impl Validate for NewTransaction {
    fn validate(&self) -> Result<(), ModelError> {
        validate::positive("amount", self.amount)
    }
}

impl Validate for TransactionPatch {
    fn validate(&self) -> Result<(), ModelError> {
        require_any(Transaction::NAME, &[self.description.is_some(), self.reference.is_some()])
    }
}

impl Record for Transaction {
    const TABLE: &'static str = "transactions";
    const NAME: &'static str = "transaction";
    const DEFAULT_ORDER: SortOrder = SortOrder::desc("created_at");

    type Input = NewTransaction;
    type Patch = TransactionPatch;

    fn id(&self) -> Uuid { self.id }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_must_be_positive() {
        let mut t = NewTransaction {
            account_id: Uuid::new_v4(),
            transaction_type: TransactionType::Deposit,
            amount: Decimal::new(5000, 2),
            description: Some("salary".into()),
            reference: None,
        };
        assert!(t.validate().is_ok());
        t.amount = Decimal::ZERO;
        assert!(t.validate().is_err());
    }

    #[test]
    fn type_uses_snake_case_on_the_wire() {
        let v = serde_json::to_value(TransactionType::LoanRepayment).unwrap();
        assert_eq!(v, serde_json::json!("loan_repayment"));
    }
}
