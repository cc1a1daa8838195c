//! Tests for hrportal-client: base-URL resolution, verb contracts, health
//! probe bounds, and the named auth/settings endpoints against the mock
//! backend.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use hrportal_client::*;
use hrportal_core::*;
use hrportal_mock::{router, MockState, DEV_TOTP_CODE};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Serve a router on an ephemeral port, return its API base URL.
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

async fn spawn_mock(state: Arc<MockState>) -> RestClient {
    RestClient::with_base_url(spawn(router(state)).await)
}

// ===========================================================================
// Base URL resolution
// ===========================================================================

#[test]
fn base_url_localhost_pins_to_http() {
    assert_eq!(
        resolve_base_url(Scheme::Http, "localhost", 3001),
        "http://localhost:3001/api"
    );
    assert_eq!(
        resolve_base_url(Scheme::Https, "127.0.0.1", 3001),
        "http://localhost:3001/api"
    );
}

#[test]
fn base_url_remote_keeps_scheme_and_host() {
    assert_eq!(
        resolve_base_url(Scheme::Https, "app.example.com", 3001),
        "https://app.example.com:3001/api"
    );
    assert_eq!(
        resolve_base_url(Scheme::Http, "intranet.corp", 8080),
        "http://intranet.corp:8080/api"
    );
}

#[test]
fn base_url_is_pure() {
    let a = resolve_base_url(Scheme::Https, "app.example.com", 3001);
    let b = resolve_base_url(Scheme::Https, "app.example.com", 3001);
    assert_eq!(a, b);
}

#[test]
fn scheme_parses_browser_protocol_strings() {
    assert_eq!("https:".parse::<Scheme>().unwrap(), Scheme::Https);
    assert_eq!("http".parse::<Scheme>().unwrap(), Scheme::Http);
    assert!("ftp:".parse::<Scheme>().is_err());
}

#[test]
fn default_health_timeout_is_two_seconds() {
    assert_eq!(HEALTH_TIMEOUT, Duration::from_secs(2));
    assert_eq!(DEFAULT_API_PORT, 3001);
}

// ===========================================================================
// get - success returns the body, failure names the endpoint
// ===========================================================================

#[tokio::test]
async fn get_returns_parsed_body_on_200() {
    let state = Arc::new(MockState::new());
    state.seed_record(
        "employees",
        serde_json::json!({"first_name": "Ada", "last_name": "Lovelace",
                           "email": "ada@example.com", "active": true}),
    );
    let client = spawn_mock(state).await;

    let employees: Vec<Employee> = client.fetch_all().await.unwrap();
    assert_eq!(employees.len(), 1);
    assert_eq!(employees[0].email, "ada@example.com");
    assert_eq!(employees[0].id, Some(1));
}

#[tokio::test]
async fn get_failure_names_endpoint_without_body() {
    let client = spawn_mock(Arc::new(MockState::new())).await;

    let err = client.fetch_one::<Employee>(999).await.unwrap_err();
    match &err {
        ApiError::Fetch { endpoint } => assert_eq!(endpoint.as_str(), "employees/999"),
        other => panic!("expected Fetch, got {:?}", other),
    }
    // The GET contract attaches no body detail.
    assert_eq!(err.to_string(), "failed to fetch employees/999");
}

#[tokio::test]
async fn get_unknown_collection_is_empty_not_error() {
    let client = spawn_mock(Arc::new(MockState::new())).await;
    let rows: Vec<serde_json::Value> = client.get("no_such_table").await.unwrap();
    assert!(rows.is_empty());
}

// ===========================================================================
// create / update / delete - rejections carry id and raw body
// ===========================================================================

#[tokio::test]
async fn create_then_fetch_roundtrip() {
    let client = spawn_mock(Arc::new(MockState::new())).await;

    let created: Employee = client
        .create_record(&Employee::new("Grace", "Hopper", "grace@example.com"))
        .await
        .unwrap();
    let id = created.id.unwrap();

    let fetched: Employee = client.fetch_one(id).await.unwrap();
    assert_eq!(fetched.email, "grace@example.com");
}

#[tokio::test]
async fn update_failure_carries_id_and_response_text() {
    let client = spawn_mock(Arc::new(MockState::new())).await;

    let err = client
        .update_record::<Employee>(999, &Employee::new("A", "B", "a@b.c"))
        .await
        .unwrap_err();
    match err {
        ApiError::Rejected {
            method,
            ref path,
            status,
            ref body,
        } => {
            assert_eq!(method, "PUT");
            assert_eq!(path.as_str(), "employees/999");
            assert_eq!(status, 404);
            assert!(body.contains("not found"), "raw body kept: {}", body);
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn delete_removes_record_and_second_delete_fails() {
    let state = Arc::new(MockState::new());
    let id = state.seed_record("leaves", serde_json::json!({"employee_id": 1, "leave_type": "vacation"}));
    let client = spawn_mock(state).await;

    let gone: serde_json::Value = client.delete("leaves", id).await.unwrap();
    assert_eq!(gone["deleted"], true);

    let err = client.delete::<serde_json::Value>("leaves", id).await.unwrap_err();
    match err {
        ApiError::Rejected { method, status, .. } => {
            assert_eq!(method, "DELETE");
            assert_eq!(status, 404);
        }
        other => panic!("expected Rejected, got {:?}", other),
    }
}

#[tokio::test]
async fn double_update_with_same_payload_succeeds_twice() {
    let state = Arc::new(MockState::new());
    let id = state.seed_record("employees", serde_json::json!({"email": "x@example.com"}));
    let client = spawn_mock(state).await;

    let payload = Employee {
        id: Some(id),
        department: Some("Finance".into()),
        ..Employee::new("Mary", "Jackson", "mary@example.com")
    };
    let first: Employee = client.update_record(id, &payload).await.unwrap();
    let second: Employee = client.update_record(id, &payload).await.unwrap();
    assert_eq!(first.department.as_deref(), Some("Finance"));
    assert_eq!(second.department.as_deref(), Some("Finance"));
}

#[tokio::test]
async fn writes_are_attempted_exactly_once() {
    // Fails on the first hit, would succeed afterwards. The gateway must
    // not hide the failure behind a second attempt.
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route(
            "/api/employees",
            post(|State(hits): State<Arc<AtomicUsize>>| async move {
                if hits.fetch_add(1, Ordering::SeqCst) == 0 {
                    (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string())
                } else {
                    (StatusCode::OK, "{}".to_string())
                }
            }),
        )
        .with_state(hits.clone());
    let client = RestClient::with_base_url(spawn(app).await);

    let result = client
        .create::<_, serde_json::Value>("employees", &serde_json::json!({"email": "x@y.z"}))
        .await;
    assert!(result.is_err());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

// ===========================================================================
// check_connection - bool contract, never errors
// ===========================================================================

#[tokio::test]
async fn health_probe_true_on_200() {
    let client = spawn_mock(Arc::new(MockState::new())).await;
    assert!(client.check_connection().await);
}

#[tokio::test]
async fn health_probe_false_on_500() {
    let app = Router::new().route(
        "/api/health",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "down") }),
    );
    let client = RestClient::with_base_url(spawn(app).await);
    assert!(!client.check_connection().await);
}

#[tokio::test]
async fn health_probe_false_when_server_hangs_past_timeout() {
    let state = Arc::new(MockState::new().with_health_delay(Duration::from_secs(30)));
    let client = spawn_mock(state).await;
    assert!(
        !client
            .check_connection_with(Duration::from_millis(200), None)
            .await
    );
}

#[tokio::test]
async fn health_probe_false_when_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RestClient::with_base_url(format!("http://{}/api", addr));
    assert!(!client.check_connection().await);
}

#[tokio::test]
async fn health_probe_false_when_cancelled() {
    let state = Arc::new(MockState::new().with_health_delay(Duration::from_secs(30)));
    let client = spawn_mock(state).await;

    let token = CancellationToken::new();
    token.cancel();
    assert!(
        !client
            .check_connection_with(Duration::from_secs(2), Some(token))
            .await
    );
}

// ===========================================================================
// TOTP endpoints
// ===========================================================================

#[tokio::test]
async fn totp_setup_returns_secret_and_otpauth_url() {
    let client = spawn_mock(Arc::new(MockState::new())).await;

    let setup = client.setup_totp(1).await.unwrap();
    assert!(!setup.secret.is_empty());
    assert!(setup.otpauth_url.starts_with("otpauth://totp/"));
    assert!(setup.otpauth_url.contains(&setup.secret));
}

#[tokio::test]
async fn totp_verify_accepts_valid_code() {
    let client = spawn_mock(Arc::new(MockState::new())).await;

    let response = client
        .verify_totp(&TotpVerifyRequest {
            user_id: 1,
            token: DEV_TOTP_CODE.to_string(),
        })
        .await
        .unwrap();
    assert!(response.verified);
}

#[tokio::test]
async fn totp_verify_failure_forwards_server_message() {
    let client = spawn_mock(Arc::new(MockState::new())).await;

    let err = client
        .verify_totp(&TotpVerifyRequest {
            user_id: 1,
            token: "000000".to_string(),
        })
        .await
        .unwrap_err();
    match err {
        ApiError::Verification(message) => assert_eq!(message, "Invalid verification code"),
        other => panic!("expected Verification, got {:?}", other),
    }
}

#[tokio::test]
async fn totp_disable_clears_enrollment() {
    let state = Arc::new(MockState::new());
    let client = spawn_mock(state).await;

    client.setup_totp(5).await.unwrap();
    let settings = client.security_settings(5).await.unwrap();
    assert!(settings.totp_enabled);

    let response = client
        .disable_totp(&TotpDisableRequest {
            user_id: 5,
            token: DEV_TOTP_CODE.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(response["disabled"], true);

    let settings = client.security_settings(5).await.unwrap();
    assert!(!settings.totp_enabled);
}

// ===========================================================================
// Trusted devices / MFA logs / settings
// ===========================================================================

#[tokio::test]
async fn trusted_devices_list_and_revoke() {
    let state = Arc::new(MockState::new());
    state.seed_device(TrustedDevice {
        id: "dev-1".into(),
        user_id: 1,
        device_name: "laptop".into(),
        browser: Some("Firefox".into()),
        os: Some("Linux".into()),
        last_seen: Utc::now(),
        trusted_until: None,
    });
    let client = spawn_mock(state).await;

    let devices = client.trusted_devices(1).await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0].device_name, "laptop");

    client
        .revoke_device(&RevokeDeviceRequest {
            user_id: 1,
            device_id: "dev-1".into(),
        })
        .await
        .unwrap();

    assert!(client.trusted_devices(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn mfa_log_records_verification_attempts() {
    let client = spawn_mock(Arc::new(MockState::new())).await;

    let _ = client
        .verify_totp(&TotpVerifyRequest {
            user_id: 3,
            token: "000000".into(),
        })
        .await;

    let logs = client.mfa_logs(3).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].event, "totp_verify_failed");
}

#[tokio::test]
async fn security_settings_roundtrip() {
    let client = spawn_mock(Arc::new(MockState::new())).await;

    let mut settings = client.security_settings(2).await.unwrap();
    assert!(settings.trusted_devices_enabled);

    settings.session_timeout_minutes = Some(120);
    let saved = client.update_security_settings(2, &settings).await.unwrap();
    assert_eq!(saved.session_timeout_minutes, Some(120));

    let fetched = client.security_settings(2).await.unwrap();
    assert_eq!(fetched.session_timeout_minutes, Some(120));
}

#[tokio::test]
async fn notification_settings_list_and_save() {
    let state = Arc::new(MockState::new());
    let id = state.seed_record(
        NotificationSettings::ENDPOINT,
        serde_json::json!({"user_id": 1, "email_notifications": true,
                           "leave_alerts": true, "security_alerts": true}),
    );
    let client = spawn_mock(state).await;

    let all = client.notification_settings().await.unwrap();
    assert_eq!(all.len(), 1);

    let mut prefs = all.into_iter().next().unwrap();
    prefs.leave_alerts = false;
    let saved = client.save_notification_settings(id, &prefs).await.unwrap();
    assert!(!saved.leave_alerts);
}
