mod common;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use common::{clock_at, date, lead, thursday, FakeCrm};
use leadboard::domain::error::DomainError;
use leadboard::domain::ports::stats_source::{StatsRequest, StatsSource};
use leadboard::domain::values::role::Role;
use leadboard::infrastructure::http::retry::RetryPolicy;
use leadboard::infrastructure::http::server::{
    dashboard_stats, method_not_allowed, preflight, serve_on, ApiState, StatsQuery, STATS_PATH,
};
use leadboard::infrastructure::http::stats_client::HttpStatsSource;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;

fn seeded() -> Arc<FakeCrm> {
    let crm = FakeCrm::new();
    let anna = crm.with_user("Anna");
    let id = crm.with_lead(lead(true, Some("Beratungsgespräch"), Some(date(2026, 10, 15))));
    crm.with_assignment(&id, &anna);
    crm.with_lead(lead(true, Some("Kein Interesse"), Some(date(2026, 10, 14))));
    crm.with_lead(lead(false, None, None));
    crm
}

fn state_for(crm: &Arc<FakeCrm>) -> ApiState {
    ApiState {
        stats: Arc::new(crm.stats(clock_at(thursday()))),
    }
}

async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn spawn_server(state: ApiState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_on(listener, state));
    format!("http://{addr}")
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 2,
        initial_backoff_ms: 1,
        max_backoff_ms: 5,
    }
}

#[tokio::test]
async fn test_handler_returns_snapshot_json() {
    let crm = seeded();
    let resp = dashboard_stats(State(state_for(&crm)), Ok(Query(StatsQuery::default()))).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
    let json = body_json(resp).await;
    assert_eq!(json["gesamt"], 3);
    assert_eq!(json["kontaktiert"], 2);
    assert_eq!(json["conversionRate"], 50.0);
    assert_eq!(json["vertriebler"][0]["name"], "Anna");
}

#[tokio::test]
async fn test_handler_scopes_to_user_name() {
    let crm = seeded();
    let query = StatsQuery {
        user_name: "Anna".into(),
        user_role: "Closer".into(),
    };
    let json = body_json(dashboard_stats(State(state_for(&crm)), Ok(Query(query))).await).await;
    assert_eq!(json["heute"], 1);
    assert_eq!(json["dieseWoche"], 1);
    assert_eq!(json["gesamt"], 3);
}

#[tokio::test]
async fn test_handler_ignores_unknown_role() {
    let crm = seeded();
    let query = StatsQuery {
        user_name: String::new(),
        user_role: "Intern".into(),
    };
    let resp = dashboard_stats(State(state_for(&crm)), Ok(Query(query))).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_handler_reports_failure_as_500() {
    let crm = seeded();
    crm.fail_leads.store(true, Ordering::SeqCst);

    let resp = dashboard_stats(State(state_for(&crm)), Ok(Query(StatsQuery::default()))).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(resp).await;
    assert!(json["error"].as_str().unwrap().contains("leads"));
}

#[tokio::test]
async fn test_preflight_and_other_methods() {
    let resp = preflight().await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        resp.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, OPTIONS"
    );

    let resp = method_not_allowed().await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body_json(resp).await["error"], "Method not allowed");
}

#[tokio::test]
async fn test_routes_over_the_wire() {
    let base = spawn_server(state_for(&seeded())).await;
    let client = reqwest::Client::new();
    let url = format!("{base}{STATS_PATH}");

    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let resp = client.request(reqwest::Method::OPTIONS, &url).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);

    let resp = client.post(&url).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_head_is_not_allowed() {
    let crm = seeded();
    let base = spawn_server(state_for(&crm)).await;

    let resp = reqwest::Client::new()
        .head(format!("{base}{STATS_PATH}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(crm.lead_page_reads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_query_gets_json_error_with_cors() {
    let base = spawn_server(state_for(&seeded())).await;

    let resp = reqwest::Client::new()
        .get(format!("{base}{STATS_PATH}?userName=a&userName=b"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("userName"));
}

#[tokio::test]
async fn test_http_source_reads_remote_snapshot() {
    let base = spawn_server(state_for(&seeded())).await;
    let source = HttpStatsSource::new(format!("{base}/")).with_policy(fast_retry());

    let team = source.fetch(&StatsRequest::team()).await.unwrap();
    assert_eq!(team.total, 3);
    assert_eq!(team.outcomes.consultation, 1);
    assert_eq!(team.owners.len(), 1);

    let anna = source
        .fetch(&StatsRequest::new(Some("anna".into()), Role::Setter))
        .await
        .unwrap();
    assert_eq!(anna.today, 1);
}

#[tokio::test]
async fn test_http_source_maps_server_error() {
    let crm = seeded();
    crm.fail_users.store(true, Ordering::SeqCst);
    let base = spawn_server(state_for(&crm)).await;
    let source = HttpStatsSource::new(base).with_policy(fast_retry());

    let err = source.fetch(&StatsRequest::team()).await.unwrap_err();
    assert!(matches!(err, DomainError::DataUnavailable(_)));
}

#[tokio::test]
async fn test_http_source_unreachable_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpStatsSource::new(format!("http://{addr}")).with_policy(fast_retry());
    let err = source.fetch(&StatsRequest::team()).await.unwrap_err();
    assert!(matches!(err, DomainError::Network(_)));
}
