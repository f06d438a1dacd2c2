use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::record::{require_any, Record, SortOrder, Validate};
use crate::validate;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Officer,
    #[default]
    Customer,
}

/// Application user profile (staff or customer portal login).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl Validate for NewUser {
    fn validate(&self) -> Result<(), ModelError> {
        validate::email(&self.email)?;
        validate::non_empty("full_name", &self.full_name)
    }
}

impl Validate for UserPatch {
    fn validate(&self) -> Result<(), ModelError> {
        require_any(User::NAME, &[self.email.is_some(), self.full_name.is_some(), self.role.is_some()])?;
        if let Some(v) = &self.email { validate::email(v)?; }
        if let Some(v) = &self.full_name { validate::non_empty("full_name", v)?; }
        Ok(())
    }
}

impl Record for User {
    const TABLE: &'static str = "users";
    const NAME: &'static str = "user";
    const DEFAULT_ORDER: SortOrder = SortOrder::desc("created_at");

    type Input = NewUser;
    type Patch = UserPatch;

    fn id(&self) -> Uuid { self.id }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_defaults_to_customer() {
        let u: NewUser = serde_json::from_value(serde_json::json!({"email": "o@humpbank.io", "full_name": "Officer O"})).unwrap();
        assert_eq!(u.role, UserRole::Customer);
        assert!(u.validate().is_ok());
    }

    #[test]
    fn patch_rejects_blank_name() {
        let p = UserPatch { full_name: Some("".into()), ..Default::default() };
        assert!(p.validate().is_err());
    }
}
