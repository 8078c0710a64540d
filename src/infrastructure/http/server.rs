//! HTTP surface of the dashboard statistics.
//!
//! `GET /api/dashboard-stats?userName=..&userRole=..` answers with the flat
//! snapshot JSON. Preflight requests get a 204, any other method (HEAD
//! included) a 405. Every response carries the CORS headers.

use crate::application::dashboard_stats::DashboardStatsUseCase;
use crate::domain::error::DomainError;
use crate::domain::ports::stats_source::{StatsRequest, StatsSource};
use crate::domain::values::role::Role;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

pub const STATS_PATH: &str = "/api/dashboard-stats";

#[derive(Clone)]
pub struct ApiState {
    pub stats: Arc<DashboardStatsUseCase>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(rename = "userName", default)]
    pub user_name: String,
    #[serde(rename = "userRole", default = "default_role")]
    pub user_role: String,
}

fn default_role() -> String {
    Role::Setter.to_string()
}

impl Default for StatsQuery {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            user_role: default_role(),
        }
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route(
            STATS_PATH,
            get(dashboard_stats)
                .head(method_not_allowed)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}

/// Serve on an already bound listener until the task is dropped.
pub async fn serve_on(listener: TcpListener, state: ApiState) -> Result<(), DomainError> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "dashboard stats endpoint listening");
    }
    axum::serve(listener, router(state))
        .await
        .map_err(|e| DomainError::Network(format!("server error: {e}")))
}

pub async fn serve(bind: &str, state: ApiState) -> Result<(), DomainError> {
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|e| DomainError::Network(format!("cannot bind {bind}: {e}")))?;
    serve_on(listener, state).await
}

fn cors_headers() -> [(HeaderName, &'static str); 3] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
    ]
}

fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        cors_headers(),
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

pub async fn dashboard_stats(
    State(state): State<ApiState>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            debug!(error = %rejection, "rejected stats query");
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };
    let role = query.user_role.parse().unwrap_or_else(|_| {
        debug!(role = %query.user_role, "unknown userRole, using Setter");
        Role::Setter
    });
    let request = StatsRequest::new(Some(query.user_name), role);

    match state.stats.fetch(&request).await {
        Ok(snapshot) => (StatusCode::OK, cors_headers(), Json(snapshot)).into_response(),
        Err(e) => {
            error!(error = %e, "dashboard stats failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub async fn preflight() -> Response {
    (StatusCode::NO_CONTENT, cors_headers()).into_response()
}

pub async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".into())
}
