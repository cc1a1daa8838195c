//! Mock HR portal backend - serves the portal API surface for testing
//!
//! Stands in for the real Express/PostgreSQL backend: a generic JSON
//! resource store plus the fixed `auth/*` routes. State is in-memory and
//! gone on shutdown. Verification accepts the well-known dev code
//! `123456`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use dashmap::DashMap;
use hrportal_core::{
    MfaLogEntry, RevokeDeviceRequest, SecuritySettings, TotpDisableRequest, TotpSetup,
    TotpVerifyRequest, TotpVerifyResponse, TrustedDevice,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use uuid::Uuid;

/// TOTP code the mock accepts.
pub const DEV_TOTP_CODE: &str = "123456";

#[derive(Default)]
pub struct MockState {
    resources: DashMap<String, DashMap<i64, Value>>,
    devices: DashMap<String, TrustedDevice>,
    security: DashMap<i64, SecuritySettings>,
    mfa_logs: DashMap<i64, Vec<MfaLogEntry>>,
    totp_secrets: DashMap<i64, String>,
    next_id: AtomicI64,
    health_delay: Option<Duration>,
}

impl MockState {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            ..Default::default()
        }
    }

    /// Delay health responses, for probing timeout behaviour.
    pub fn with_health_delay(mut self, delay: Duration) -> Self {
        self.health_delay = Some(delay);
        self
    }

    pub fn seed_record(&self, resource: &str, mut record: Value) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        if let Some(obj) = record.as_object_mut() {
            obj.insert("id".into(), json!(id));
        }
        self.collection(resource).insert(id, record);
        id
    }

    pub fn seed_device(&self, device: TrustedDevice) {
        self.devices.insert(device.id.clone(), device);
    }

    fn collection(&self, resource: &str) -> dashmap::mapref::one::Ref<'_, String, DashMap<i64, Value>> {
        self.resources
            .entry(resource.to_string())
            .or_default()
            .downgrade()
    }

    fn push_log(&self, user_id: i64, event: &str) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.mfa_logs.entry(user_id).or_default().push(MfaLogEntry {
            id: Some(id),
            user_id,
            event: event.to_string(),
            ip_address: Some("127.0.0.1".to_string()),
            user_agent: None,
            created_at: Utc::now(),
        });
    }
}

pub fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/totp/setup/:user_id", post(totp_setup))
        .route("/api/auth/totp/verify", post(totp_verify))
        .route("/api/auth/totp/disable", post(totp_disable))
        .route("/api/auth/trusted-devices/:user_id", get(trusted_devices))
        .route("/api/auth/device/revoke", post(revoke_device))
        .route("/api/auth/mfa-logs/:user_id", get(mfa_logs))
        .route(
            "/api/auth/security-settings/:user_id",
            get(get_security_settings).put(put_security_settings),
        )
        .route("/api/:resource", get(list_records).post(create_record))
        .route(
            "/api/:resource/:id",
            get(get_record).put(update_record).delete(delete_record),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn health(State(state): State<Arc<MockState>>) -> impl IntoResponse {
    if let Some(delay) = state.health_delay {
        tokio::time::sleep(delay).await;
    }
    Json(json!({"status": "ok", "service": "hrportal-api"}))
}

fn not_found(resource: &str, id: i64) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": format!("{} {} not found", resource, id)})),
    )
        .into_response()
}

async fn list_records(
    State(state): State<Arc<MockState>>,
    Path(resource): Path<String>,
) -> impl IntoResponse {
    let mut records: Vec<(i64, Value)> = state
        .resources
        .get(&resource)
        .map(|c| c.iter().map(|e| (*e.key(), e.value().clone())).collect())
        .unwrap_or_default();
    records.sort_by_key(|(id, _)| *id);
    Json(records.into_iter().map(|(_, v)| v).collect::<Vec<_>>())
}

async fn create_record(
    State(state): State<Arc<MockState>>,
    Path(resource): Path<String>,
    Json(record): Json<Value>,
) -> impl IntoResponse {
    let id = state.seed_record(&resource, record);
    let stored = state
        .resources
        .get(&resource)
        .and_then(|c| c.get(&id).map(|v| v.value().clone()))
        .unwrap_or(Value::Null);
    info!("created {}/{}", resource, id);
    (StatusCode::CREATED, Json(stored))
}

async fn get_record(
    State(state): State<Arc<MockState>>,
    Path((resource, id)): Path<(String, i64)>,
) -> Response {
    match state
        .resources
        .get(&resource)
        .and_then(|c| c.get(&id).map(|v| v.value().clone()))
    {
        Some(record) => Json(record).into_response(),
        None => not_found(&resource, id),
    }
}

async fn update_record(
    State(state): State<Arc<MockState>>,
    Path((resource, id)): Path<(String, i64)>,
    Json(mut record): Json<Value>,
) -> Response {
    let collection = state.collection(&resource);
    if !collection.contains_key(&id) {
        return not_found(&resource, id);
    }
    if let Some(obj) = record.as_object_mut() {
        obj.insert("id".into(), json!(id));
    }
    collection.insert(id, record.clone());
    Json(record).into_response()
}

async fn delete_record(
    State(state): State<Arc<MockState>>,
    Path((resource, id)): Path<(String, i64)>,
) -> Response {
    match state.resources.get(&resource).and_then(|c| c.remove(&id)) {
        Some(_) => Json(json!({"deleted": true, "id": id})).into_response(),
        None => not_found(&resource, id),
    }
}

async fn totp_setup(
    State(state): State<Arc<MockState>>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    let secret = Uuid::new_v4().simple().to_string().to_uppercase();
    state.totp_secrets.insert(user_id, secret.clone());
    state.push_log(user_id, "totp_setup");
    Json(TotpSetup {
        otpauth_url: format!(
            "otpauth://totp/HRPortal:{}?secret={}&issuer=HRPortal",
            user_id, secret
        ),
        secret,
        qr_code: None,
    })
}

async fn totp_verify(
    State(state): State<Arc<MockState>>,
    Json(request): Json<TotpVerifyRequest>,
) -> Response {
    if request.token != DEV_TOTP_CODE {
        state.push_log(request.user_id, "totp_verify_failed");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid verification code"})),
        )
            .into_response();
    }
    state.push_log(request.user_id, "totp_verify_ok");
    Json(TotpVerifyResponse {
        verified: true,
        message: None,
    })
    .into_response()
}

async fn totp_disable(
    State(state): State<Arc<MockState>>,
    Json(request): Json<TotpDisableRequest>,
) -> Response {
    if request.token != DEV_TOTP_CODE {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid verification code"})),
        )
            .into_response();
    }
    state.totp_secrets.remove(&request.user_id);
    state.push_log(request.user_id, "totp_disabled");
    Json(json!({"disabled": true})).into_response()
}

async fn trusted_devices(
    State(state): State<Arc<MockState>>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    let devices: Vec<TrustedDevice> = state
        .devices
        .iter()
        .filter(|d| d.user_id == user_id)
        .map(|d| d.value().clone())
        .collect();
    Json(devices)
}

async fn revoke_device(
    State(state): State<Arc<MockState>>,
    Json(request): Json<RevokeDeviceRequest>,
) -> Response {
    match state.devices.remove(&request.device_id) {
        Some(_) => {
            state.push_log(request.user_id, "device_revoked");
            Json(json!({"revoked": true})).into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": format!("device {} not found", request.device_id)})),
        )
            .into_response(),
    }
}

async fn mfa_logs(
    State(state): State<Arc<MockState>>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    let logs = state
        .mfa_logs
        .get(&user_id)
        .map(|l| l.value().clone())
        .unwrap_or_default();
    Json(logs)
}

async fn get_security_settings(
    State(state): State<Arc<MockState>>,
    Path(user_id): Path<i64>,
) -> impl IntoResponse {
    let settings = state
        .security
        .get(&user_id)
        .map(|s| s.value().clone())
        .unwrap_or_else(|| SecuritySettings {
            user_id,
            totp_enabled: state.totp_secrets.contains_key(&user_id),
            ..Default::default()
        });
    Json(settings)
}

async fn put_security_settings(
    State(state): State<Arc<MockState>>,
    Path(user_id): Path<i64>,
    Json(mut settings): Json<SecuritySettings>,
) -> impl IntoResponse {
    settings.user_id = user_id;
    state.security.insert(user_id, settings.clone());
    Json(settings)
}
