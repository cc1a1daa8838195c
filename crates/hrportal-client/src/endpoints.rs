//! Named convenience endpoints
//!
//! Thin specializations of the generic verbs against the fixed
//! `auth/*` and settings path shapes. Verification-style calls forward
//! the server's own error message when it supplies one.

use crate::client::RestClient;
use crate::error::{ApiError, ApiResult};
use hrportal_core::{
    MfaLogEntry, NotificationSettings, Resource, RevokeDeviceRequest, SecuritySettings,
    TotpDisableRequest, TotpSetup, TotpVerifyRequest, TotpVerifyResponse, TrustedDevice,
};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

impl RestClient {
    /// Enroll a user in TOTP two-factor auth.
    pub async fn setup_totp(&self, user_id: i64) -> ApiResult<TotpSetup> {
        self.create(&format!("auth/totp/setup/{}", user_id), &serde_json::json!({}))
            .await
    }

    /// Verify a TOTP code. Failures carry the server's message when the
    /// body holds one.
    pub async fn verify_totp(&self, request: &TotpVerifyRequest) -> ApiResult<TotpVerifyResponse> {
        self.verification_post("auth/totp/verify", request).await
    }

    /// Turn TOTP off for a user; requires a current code, so failures
    /// follow the verification contract.
    pub async fn disable_totp(
        &self,
        request: &TotpDisableRequest,
    ) -> ApiResult<serde_json::Value> {
        self.verification_post("auth/totp/disable", request).await
    }

    pub async fn trusted_devices(&self, user_id: i64) -> ApiResult<Vec<TrustedDevice>> {
        self.get(&format!("auth/trusted-devices/{}", user_id)).await
    }

    pub async fn revoke_device(
        &self,
        request: &RevokeDeviceRequest,
    ) -> ApiResult<serde_json::Value> {
        self.create("auth/device/revoke", request).await
    }

    pub async fn mfa_logs(&self, user_id: i64) -> ApiResult<Vec<MfaLogEntry>> {
        self.get(&format!("auth/mfa-logs/{}", user_id)).await
    }

    pub async fn security_settings(&self, user_id: i64) -> ApiResult<SecuritySettings> {
        self.get(&format!("auth/security-settings/{}", user_id)).await
    }

    pub async fn update_security_settings(
        &self,
        user_id: i64,
        settings: &SecuritySettings,
    ) -> ApiResult<SecuritySettings> {
        self.update("auth/security-settings", user_id, settings).await
    }

    pub async fn notification_settings(&self) -> ApiResult<Vec<NotificationSettings>> {
        self.fetch_all().await
    }

    pub async fn save_notification_settings(
        &self,
        id: i64,
        settings: &NotificationSettings,
    ) -> ApiResult<NotificationSettings> {
        self.update(NotificationSettings::ENDPOINT, id, settings).await
    }

    async fn verification_post<B, T>(&self, path: &str, request: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);

        let response = self.http.post(&url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(verification_error(path, status, body));
        }
        Ok(response.json().await?)
    }
}

/// Prefer the server-supplied `error`/`message` field; fall back to the
/// generic write contract when the body isn't structured.
fn verification_error(path: &str, status: StatusCode, body: String) -> ApiError {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
        let message = value
            .get("error")
            .or_else(|| value.get("message"))
            .and_then(|m| m.as_str());
        if let Some(message) = message {
            return ApiError::Verification(message.to_string());
        }
    }
    ApiError::Rejected {
        method: "POST",
        path: path.to_string(),
        status: status.as_u16(),
        body,
    }
}
