use super::retry::{send_with_retry, RetryPolicy};
use super::server::STATS_PATH;
use crate::domain::entities::snapshot::Snapshot;
use crate::domain::error::DomainError;
use crate::domain::ports::stats_source::{StatsRequest, StatsSource};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Fetches snapshots from a remote dashboard stats endpoint.
pub struct HttpStatsSource {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpStatsSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("leadboard/0.1")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    async fn fetch(&self, request: &StatsRequest) -> Result<Snapshot, DomainError> {
        let url = format!("{}{}", self.base_url, STATS_PATH);
        let user_name = request.requester_name.clone().unwrap_or_default();
        let user_role = request.requester_role.to_string();

        let builder = self.client.get(&url).query(&[
            ("userName", user_name.as_str()),
            ("userRole", user_role.as_str()),
        ]);
        let resp = send_with_retry(builder, &self.policy)
            .await
            .map_err(|e| DomainError::Network(format!("stats endpoint {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(if status.is_server_error() {
                DomainError::DataUnavailable(message)
            } else {
                DomainError::Network(format!("stats endpoint returned {status}: {message}"))
            });
        }

        resp.json::<Snapshot>()
            .await
            .map_err(|e| DomainError::Parse(format!("stats response: {e}")))
    }
}
