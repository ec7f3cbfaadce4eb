//! Thin HTTP client for the sync API, used by the `ats-sync-cli` binary.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value as JsonValue};

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Parser, Debug)]
#[command(name = "ats-sync-cli", author, version, about = "Trigger ATS sync endpoints", long_about = None)]
pub struct Cli {
    /// Base URL of the sync API
    #[arg(long, global = true, env = "API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// User the imported records belong to
    #[arg(long, global = true, env = "USER_ID")]
    pub user_id: Option<String>,

    /// Organization the imported records belong to
    #[arg(long = "org-id", global = true, env = "ORGANIZATION_ID")]
    pub org_id: Option<String>,

    /// Use the built-in sample records instead of calling Merge
    #[arg(long, global = true)]
    pub test_mode: bool,

    /// Bearer token forwarded to the API
    #[arg(long, global = true, env = "API_TOKEN")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check API health
    Health,
    /// Sync candidates
    Candidates(SyncArgs),
    /// Sync job postings
    #[command(alias = "jobs")]
    JobPostings(SyncArgs),
    /// Sync applications
    Applications(SyncArgs),
    /// Sync interviews
    Interviews(SyncArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct SyncArgs {
    /// CSV file to import instead of fetching from Merge
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl Commands {
    /// Endpoint path and arguments for the sync subcommands.
    pub fn sync_target(&self) -> Option<(&'static str, &SyncArgs)> {
        match self {
            Commands::Health => None,
            Commands::Candidates(args) => Some(("/sync/candidates", args)),
            Commands::JobPostings(args) => Some(("/sync/job_postings", args)),
            Commands::Applications(args) => Some(("/sync/applications", args)),
            Commands::Interviews(args) => Some(("/sync/interviews", args)),
        }
    }
}

/// Builds the JSON body for a sync call, inlining the CSV file as base64.
pub fn build_payload(cli: &Cli, csv: Option<&Path>) -> anyhow::Result<JsonValue> {
    let Some(user_id) = cli.user_id.as_deref() else {
        bail!("--user-id is required");
    };
    let Some(org_id) = cli.org_id.as_deref() else {
        bail!("--org-id is required");
    };

    let mut payload = json!({
        "user_id": user_id,
        "organization_id": org_id,
        "test_mode": cli.test_mode,
    });

    if let Some(path) = csv {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Error reading CSV file {}", path.display()))?;
        payload["csv_file"] = JsonValue::String(STANDARD.encode(bytes));
    }

    Ok(payload)
}

fn endpoint(api_url: &str, path: &str) -> String {
    format!("{}{}", api_url.trim_end_matches('/'), path)
}

async fn read_body(response: reqwest::Response) -> (StatusCode, JsonValue) {
    let status = response.status();
    let body = response.json::<JsonValue>().await.unwrap_or(JsonValue::Null);
    (status, body)
}

fn print_failure(status: StatusCode, body: &JsonValue) {
    println!("Error: API returned status code {}", status.as_u16());
    match serde_json::to_string_pretty(body) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{}", body),
    }
}

async fn check_health(client: &Client, api_url: &str) -> anyhow::Result<bool> {
    let response = client
        .get(endpoint(api_url, "/"))
        .send()
        .await
        .context("Error connecting to API")?;
    let (status, body) = read_body(response).await;

    if status != StatusCode::OK {
        print_failure(status, &body);
        return Ok(false);
    }

    println!("API is healthy:");
    println!("  Status: {}", field(&body, "status"));
    println!("  Message: {}", field(&body, "message"));
    println!("  Version: {}", field(&body, "version"));
    println!("  Available endpoints:");
    if let Some(endpoints) = body.get("endpoints").and_then(JsonValue::as_array) {
        for endpoint in endpoints.iter().filter_map(JsonValue::as_str) {
            println!("    {}", endpoint);
        }
    }
    Ok(true)
}

async fn sync(
    client: &Client,
    cli: &Cli,
    path: &str,
    payload: &JsonValue,
) -> anyhow::Result<bool> {
    let url = endpoint(&cli.api_url, path);
    println!("Sending request to {}...", url);

    let mut request = client.post(&url).json(payload);
    if let Some(token) = cli.token.as_deref() {
        request = request.bearer_auth(token);
    }
    let response = request.send().await.context("Error connecting to API")?;
    let (status, body) = read_body(response).await;

    if !matches!(status, StatusCode::OK | StatusCode::CREATED) {
        print_failure(status, &body);
        return Ok(false);
    }

    println!("Sync completed successfully:");
    println!("  Status: {}", field(&body, "status"));
    println!("  Source: {}", field(&body, "source"));
    println!("  Inserted: {}", field(&body, "inserted"));
    println!("  Updated: {}", field(&body, "updated"));
    Ok(true)
}

fn field(body: &JsonValue, key: &str) -> String {
    match body.get(key) {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Null) | None => "None".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Runs one CLI invocation. `Ok(false)` means the API answered with an error.
pub async fn run(cli: Cli) -> anyhow::Result<bool> {
    let client = Client::new();

    match cli.command.sync_target() {
        None => check_health(&client, &cli.api_url).await,
        Some((path, args)) => {
            let payload = build_payload(&cli, args.csv.as_deref())?;
            sync(&client, &cli, path, &payload).await
        }
    }
}
