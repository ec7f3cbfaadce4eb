use std::sync::Arc;

use ats_sync_backend::{
    config::Config,
    database::memory::MemoryStore,
    error::{Error, ErrorKind},
    models::{job_posting::JobPosting, EntityKind},
    services::{
        import_service::Importer, merge_service::MergeClient, token_service::TokenService,
        transform::SyncContext,
    },
};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tokio::net::TcpListener;
use uuid::Uuid;

const API_KEY: &str = "merge-test-key";
const ACCOUNT_TOKEN: &str = "account-token-from-exchange";

#[derive(Deserialize)]
struct PageQuery {
    cursor: Option<String>,
}

fn authorized(headers: &HeaderMap) -> bool {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", API_KEY))
        .unwrap_or(false);
    let account = headers
        .get("x-account-token")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == ACCOUNT_TOKEN)
        .unwrap_or(false);
    bearer && account
}

async fn job_postings(
    State(base): State<Arc<String>>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"detail": "bad credentials"})));
    }
    let page = match query.cursor.as_deref() {
        None => json!({
            "next": format!("{}/v1/job-postings?cursor=2", base),
            "results": [{"id": "job-1", "name": "Welder", "status": "OPEN", "remote": "true"}],
        }),
        Some(_) => json!({
            "next": null,
            "results": [{"id": "job-2", "name": "Fitter", "status": "CLOSED", "remote": false}],
        }),
    };
    (StatusCode::OK, Json(page))
}

async fn candidates() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance")
}

async fn exchange(headers: HeaderMap, Json(body): Json<JsonValue>) -> impl IntoResponse {
    let has_key = headers.get("apikey").and_then(|v| v.to_str().ok()) == Some("backend-key");
    if !has_key || body["action"] != "get_merge_token" {
        return (StatusCode::FORBIDDEN, Json(json!({"error": "denied"})));
    }
    (StatusCode::OK, Json(json!({ "token": ACCOUNT_TOKEN })))
}

/// Serves a fake Merge API and token backend, returning its base URL.
async fn spawn_fake_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let app = Router::new()
        .route("/v1/job-postings", get(job_postings))
        .route("/v1/candidates", get(candidates))
        .route("/functions/v1/exchange-token", post(exchange))
        .with_state(Arc::new(base.clone()));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    base
}

fn config(base: &str) -> Config {
    Config {
        merge_api_key: Some(API_KEY.to_string()),
        merge_base_url: format!("{}/v1", base),
        backend_url: Some(base.to_string()),
        backend_api_key: Some("backend-key".to_string()),
        ..Config::default()
    }
}

#[tokio::test]
async fn fetch_all_follows_next_cursor() {
    let base = spawn_fake_upstream().await;
    let merge = MergeClient::new(Client::new(), &config(&base)).unwrap();

    let items: Vec<JsonValue> = merge.fetch_all("job-postings", ACCOUNT_TOKEN).await.unwrap();
    let ids: Vec<&str> = items.iter().filter_map(|i| i["id"].as_str()).collect();
    assert_eq!(ids, vec!["job-1", "job-2"]);
}

#[tokio::test]
async fn wrong_account_token_surfaces_upstream_status() {
    let base = spawn_fake_upstream().await;
    let merge = MergeClient::new(Client::new(), &config(&base)).unwrap();

    let err = merge
        .fetch_all::<JsonValue>("job-postings", "someone-else")
        .await
        .unwrap_err();
    match err {
        Error::UpstreamStatus { service, status, .. } => {
            assert_eq!(service, "merge");
            assert_eq!(status, 401);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn failing_page_is_an_upstream_error() {
    let base = spawn_fake_upstream().await;
    let merge = MergeClient::new(Client::new(), &config(&base)).unwrap();

    let err = merge
        .fetch_all::<JsonValue>("candidates", ACCOUNT_TOKEN)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);
}

#[tokio::test]
async fn jwt_bearer_is_exchanged_with_backend() {
    let base = spawn_fake_upstream().await;
    let tokens = TokenService::new(Client::new(), &config(&base));
    let jwt = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxIn0.c2ln";

    let token = tokens.account_token(Some(jwt)).await.unwrap();
    assert_eq!(token, ACCOUNT_TOKEN);
}

#[tokio::test]
async fn remote_import_upserts_every_page() {
    let base = spawn_fake_upstream().await;
    let config = config(&base);
    let client = Client::new();
    let store = Arc::new(MemoryStore::new());
    let importer = Importer::new(
        store.clone(),
        MergeClient::new(client.clone(), &config).unwrap(),
        TokenService::new(client, &config),
    );
    let ctx = SyncContext {
        user_id: Uuid::new_v4(),
        organization_id: Uuid::new_v4(),
    };
    let jwt = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxIn0.c2ln";

    let counts = importer
        .import_from_remote::<JobPosting>(&ctx, Some(jwt), false)
        .await
        .unwrap();
    assert_eq!(counts.inserted, 2);
    assert_eq!(counts.updated, 0);
    assert_eq!(store.count(EntityKind::JobPosting).await, 2);
}
