//! Portal resource types
//!
//! Records are exchanged with the backend as JSON; ids are assigned
//! server-side. Unknown fields are tolerated on decode so the client
//! keeps working when the backend grows columns.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A record type served from a fixed collection endpoint.
///
/// `ENDPOINT` is the collection path segment under the API base,
/// e.g. `employees` → `{base}/employees`.
pub trait Resource: Serialize + DeserializeOwned {
    const ENDPOINT: &'static str;
}

/// Employee master record
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Employee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub active: bool,
}

impl Employee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            active: true,
            ..Default::default()
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Resource for Employee {
    const ENDPOINT: &'static str = "employees";
}

/// Leave request state
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub employee_id: i64,
    pub leave_type: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: LeaveStatus,
    pub reason: Option<String>,
}

impl Resource for LeaveRequest {
    const ENDPOINT: &'static str = "leaves";
}

/// Internal mail message as stored by the portal
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub folder: String,
    pub read: bool,
    pub sent_at: Option<DateTime<Utc>>,
}

impl Resource for EmailMessage {
    const ENDPOINT: &'static str = "emails";
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

impl Resource for PermissionGroup {
    const ENDPOINT: &'static str = "permission_groups";
}

/// Per-user notification preferences
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_id: i64,
    pub email_notifications: bool,
    pub leave_alerts: bool,
    pub security_alerts: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            id: None,
            user_id: 0,
            email_notifications: true,
            leave_alerts: true,
            security_alerts: true,
        }
    }
}

impl Resource for NotificationSettings {
    const ENDPOINT: &'static str = "notificationsettings";
}
