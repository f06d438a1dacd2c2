//! Field rules shared by the entity inputs and patches.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::errors::ModelError;

pub fn non_empty(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::invalid(field, "is required"));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), ModelError> {
    let Some((local, domain)) = value.trim().split_once('@') else {
        return Err(ModelError::invalid("email", "is invalid"));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ModelError::invalid("email", "is invalid"));
    }
    Ok(())
}

pub fn positive(field: &str, value: Decimal) -> Result<(), ModelError> {
    if value <= Decimal::ZERO {
        return Err(ModelError::invalid(field, "must be greater than zero"));
    }
    Ok(())
}

pub fn non_negative(field: &str, value: Decimal) -> Result<(), ModelError> {
    if value < Decimal::ZERO {
        return Err(ModelError::invalid(field, "must not be negative"));
    }
    Ok(())
}

/// Annual percentage rate in `[0, 100]`.
pub fn rate(field: &str, value: Decimal) -> Result<(), ModelError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ModelError::invalid(field, "must be between 0 and 100"));
    }
    Ok(())
}

pub fn term(field: &str, months: i32) -> Result<(), ModelError> {
    if months < 1 {
        return Err(ModelError::invalid(field, "must be at least one month"));
    }
    Ok(())
}

/// ISO 4217 style: three uppercase ASCII letters.
pub fn currency(value: &str) -> Result<(), ModelError> {
    if value.len() != 3 || !value.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ModelError::invalid("currency", "must be a three-letter uppercase code"));
    }
    Ok(())
}

pub fn account_number(value: &str) -> Result<(), ModelError> {
    non_empty("account_number", value)?;
    if !value.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return Err(ModelError::invalid("account_number", "may only contain digits and dashes"));
    }
    Ok(())
}

pub fn past_date(field: &str, value: NaiveDate) -> Result<(), ModelError> {
    if value > Utc::now().date_naive() {
        return Err(ModelError::invalid(field, "must not be in the future"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn email_rules() {
        assert!(email("ana@humpbank.io").is_ok());
        assert!(email("ana").is_err());
        assert!(email("@humpbank.io").is_err());
        assert!(email("ana@").is_err());
        assert!(email("ana@@humpbank.io").is_err());
    }

    #[test]
    fn numeric_rules() {
        assert!(positive("amount", Decimal::new(1, 2)).is_ok());
        assert!(positive("amount", Decimal::ZERO).is_err());
        assert!(non_negative("balance", Decimal::ZERO).is_ok());
        assert!(rate("interest_rate", Decimal::new(1250, 2)).is_ok());
        assert!(rate("interest_rate", Decimal::new(101, 0)).is_err());
        assert!(term("term_months", 0).is_err());
    }

    #[test]
    fn currency_and_account_number() {
        assert!(currency("USD").is_ok());
        assert!(currency("usd").is_err());
        assert!(currency("EURO").is_err());
        assert!(account_number("1002-3344").is_ok());
        assert!(account_number("AB12").is_err());
        assert!(account_number("  ").is_err());
    }

    #[test]
    fn error_message_names_the_field() {
        let err = non_empty("first_name", "").unwrap_err();
        assert_eq!(err.to_string(), "validation error: first_name is required");
    }
}
