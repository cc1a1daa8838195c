//! hrportal — diagnostic CLI for the HR portal API
//!
//! Usage:
//!   hrportal health                          → probe the backend
//!   hrportal get employees                   → dump a collection
//!   hrportal create employees '{"email":…}'  → create a record
//!   hrportal update employees 7 '{…}'        → replace a record
//!   hrportal delete employees 7              → remove a record
//!   hrportal devices 1                       → trusted devices for user 1

use clap::{Parser, Subcommand};
use hrportal_client::{resolve_base_url, RestClient, Scheme};
use std::str::FromStr;

#[derive(Parser)]
#[command(
    name = "hrportal",
    about = "HR portal API diagnostic client",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Backend hostname
    #[arg(long, global = true, default_value = "localhost")]
    hostname: String,

    /// Scheme for non-local hosts: http or https
    #[arg(long, global = true, default_value = "https")]
    scheme: String,

    /// API port
    #[arg(long, global = true, default_value_t = 3001)]
    port: u16,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the health endpoint; exit code reflects the result
    Health,
    /// GET a collection or record, e.g. `employees` or `employees/7`
    Get { endpoint: String },
    /// POST a record from an inline JSON payload
    Create { endpoint: String, data: String },
    /// PUT a record from an inline JSON payload
    Update {
        endpoint: String,
        id: i64,
        data: String,
    },
    /// DELETE a record
    Delete { endpoint: String, id: i64 },
    /// List trusted devices for a user
    Devices { user_id: i64 },
    /// Show the MFA audit log for a user
    MfaLogs { user_id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hrportal=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let scheme = Scheme::from_str(&cli.scheme).map_err(|e| anyhow::anyhow!(e))?;
    let client = RestClient::with_base_url(resolve_base_url(scheme, &cli.hostname, cli.port));

    match cli.command {
        Commands::Health => {
            if client.check_connection().await {
                println!("{} is up", client.base_url());
            } else {
                eprintln!("{} is unreachable", client.base_url());
                std::process::exit(1);
            }
        }
        Commands::Get { endpoint } => {
            let value: serde_json::Value = client.get(&endpoint).await?;
            print_json(&value)?;
        }
        Commands::Create { endpoint, data } => {
            let payload: serde_json::Value = serde_json::from_str(&data)?;
            let created: serde_json::Value = client.create(&endpoint, &payload).await?;
            print_json(&created)?;
        }
        Commands::Update { endpoint, id, data } => {
            let payload: serde_json::Value = serde_json::from_str(&data)?;
            let updated: serde_json::Value = client.update(&endpoint, id, &payload).await?;
            print_json(&updated)?;
        }
        Commands::Delete { endpoint, id } => {
            let deleted: serde_json::Value = client.delete(&endpoint, id).await?;
            print_json(&deleted)?;
        }
        Commands::Devices { user_id } => {
            let devices = client.trusted_devices(user_id).await?;
            print_json(&serde_json::to_value(devices)?)?;
        }
        Commands::MfaLogs { user_id } => {
            let logs = client.mfa_logs(user_id).await?;
            print_json(&serde_json::to_value(logs)?)?;
        }
    }

    Ok(())
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
