use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::record::{require_any, Record, SortOrder, Validate};
use crate::validate;

/// An in-app message addressed to one user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
}

impl NotificationPatch {
    pub fn read() -> Self {
        Self { is_read: Some(true), ..Default::default() }
    }
}

impl Validate for NewNotification {
    fn validate(&self) -> Result<(), ModelError> {
        validate::non_empty("title", &self.title)?;
        validate::non_empty("message", &self.message)
    }
}

impl Validate for NotificationPatch {
    fn validate(&self) -> Result<(), ModelError> {
        require_any(Notification::NAME, &[self.title.is_some(), self.message.is_some(), self.is_read.is_some()])?;
        if let Some(v) = &self.title { validate::non_empty("title", v)?; }
        if let Some(v) = &self.message { validate::non_empty("message", v)?; }
        Ok(())
    }
}

impl Record for Notification {
    const TABLE: &'static str = "notifications";
    const NAME: &'static str = "notification";
    const DEFAULT_ORDER: SortOrder = SortOrder::desc("created_at");

    type Input = NewNotification;
    type Patch = NotificationPatch;

    fn id(&self) -> Uuid { self.id }
}
