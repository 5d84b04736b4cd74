// HTTP repository against the UAM tracking backend
use crate::application::fleet_repository::{AircraftDataQuery, FetchError, FleetRepository};
use crate::domain::telemetry::{TelemetrySample, Waypoint};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpFleetRepository {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFleetRepository {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let query: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect();

        if query.is_empty() {
            format!("{}/{}", self.base_url, path)
        } else {
            format!("{}/{}?{}", self.base_url, path, query.join("&"))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl FleetRepository for HttpFleetRepository {
    async fn fetch_tracking(&self, active: bool) -> Result<Vec<TelemetrySample>, FetchError> {
        let active = active.to_string();
        let url = self.build_url("tracking", &[("active", active.as_str())]);
        self.get_json(&url).await
    }

    async fn fetch_waypoints(&self, route_id: &str) -> Result<Vec<Waypoint>, FetchError> {
        let url = self.build_url("waypoints", &[("route", route_id)]);
        self.get_json(&url).await
    }

    async fn fetch_aircraft_data(
        &self,
        query: &AircraftDataQuery,
    ) -> Result<Vec<TelemetrySample>, FetchError> {
        let url = self.build_url("aircraft-data", &query.params());
        self.get_json(&url).await
    }
}
