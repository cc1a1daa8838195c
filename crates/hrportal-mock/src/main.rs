//! Standalone mock backend on :3001 for local frontend/CLI development

use chrono::Utc;
use hrportal_mock::{router, MockState};
use hrportal_core::TrustedDevice;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("hrportal_mock=info")
        .init();

    let state = Arc::new(MockState::new());
    seed(&state);

    let app = router(state);
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
    info!("Mock HR portal API on :3001");
    axum::serve(listener, app).await?;

    Ok(())
}

fn seed(state: &MockState) {
    state.seed_record(
        "employees",
        json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "department": "Engineering",
            "position": "Staff Engineer",
            "active": true
        }),
    );
    state.seed_record(
        "employees",
        json!({
            "first_name": "Grace",
            "last_name": "Hopper",
            "email": "grace@example.com",
            "department": "Engineering",
            "position": "Director",
            "active": true
        }),
    );
    state.seed_record(
        "permission_groups",
        json!({
            "name": "hr-admins",
            "description": "Full access to employee records",
            "permissions": ["employees:read", "employees:write", "leaves:approve"]
        }),
    );
    state.seed_device(TrustedDevice {
        id: "dev-seed-1".to_string(),
        user_id: 1,
        device_name: "Ada's laptop".to_string(),
        browser: Some("Firefox".to_string()),
        os: Some("Linux".to_string()),
        last_seen: Utc::now(),
        trusted_until: None,
    });
}
