//! Two-factor and device-trust payloads
//!
//! Request/response shapes for the `auth/*` endpoints. These are not
//! `Resource` collections; each has a fixed path shape on the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of enrolling a user in TOTP two-factor auth
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TotpSetup {
    pub secret: String,
    pub otpauth_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TotpVerifyRequest {
    pub user_id: i64,
    pub token: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TotpVerifyResponse {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TotpDisableRequest {
    pub user_id: i64,
    pub token: String,
}

/// A browser/device the user has marked as trusted after MFA
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrustedDevice {
    pub id: String,
    pub user_id: i64,
    pub device_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    pub last_seen: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trusted_until: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RevokeDeviceRequest {
    pub user_id: i64,
    pub device_id: String,
}

/// One line of the MFA audit trail
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MfaLogEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub user_id: i64,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-user security preferences
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySettings {
    pub user_id: i64,
    pub totp_enabled: bool,
    pub trusted_devices_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_timeout_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_password_change: Option<DateTime<Utc>>,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            user_id: 0,
            totp_enabled: false,
            trusted_devices_enabled: true,
            session_timeout_minutes: Some(30),
            last_password_change: None,
        }
    }
}
