// Repository trait for fleet tracking data access
use crate::domain::telemetry::{TelemetrySample, Waypoint};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("resource not found")]
    NotFound,
    #[error("backend responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

pub trait NotFoundAsEmpty<T> {
    /// A 404 means "no data", not a failure.
    fn or_empty(self) -> Result<Vec<T>, FetchError>;
}

impl<T> NotFoundAsEmpty<T> for Result<Vec<T>, FetchError> {
    fn or_empty(self) -> Result<Vec<T>, FetchError> {
        match self {
            Err(FetchError::NotFound) => Ok(Vec::new()),
            other => other,
        }
    }
}

/// Filters accepted by the aircraft-data endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AircraftDataQuery {
    pub aircraft: Option<String>,
    pub created_from: Option<String>,
    pub created_to: Option<String>,
}

impl AircraftDataQuery {
    pub fn is_empty(&self) -> bool {
        self.aircraft.is_none() && self.created_from.is_none() && self.created_to.is_none()
    }

    pub fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(aircraft) = &self.aircraft {
            params.push(("aircraft", aircraft.as_str()));
        }
        if let Some(from) = &self.created_from {
            params.push(("created_from", from.as_str()));
        }
        if let Some(to) = &self.created_to {
            params.push(("created_to", to.as_str()));
        }
        params
    }
}

#[async_trait]
pub trait FleetRepository: Send + Sync {
    /// Current positions; `active` restricts to flights in progress
    async fn fetch_tracking(&self, active: bool) -> Result<Vec<TelemetrySample>, FetchError>;

    /// Planned waypoints of a route
    async fn fetch_waypoints(&self, route_id: &str) -> Result<Vec<Waypoint>, FetchError>;

    /// Historical samples, optionally filtered
    async fn fetch_aircraft_data(
        &self,
        query: &AircraftDataQuery,
    ) -> Result<Vec<TelemetrySample>, FetchError>;
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory repository with canned responses and call counters.
    #[derive(Default)]
    pub struct FakeRepository {
        pub tracking: Mutex<Option<Result<Vec<TelemetrySample>, FetchError>>>,
        pub waypoints: Mutex<HashMap<String, Vec<Waypoint>>>,
        pub history: Mutex<Vec<TelemetrySample>>,
        pub history_error: Mutex<Option<FetchError>>,
        pub queries: Mutex<Vec<AircraftDataQuery>>,
        pub tracking_calls: AtomicUsize,
        pub waypoint_calls: AtomicUsize,
    }

    impl FakeRepository {
        pub fn set_tracking(&self, result: Result<Vec<TelemetrySample>, FetchError>) {
            *self.tracking.lock().unwrap() = Some(result);
        }
    }

    #[async_trait]
    impl FleetRepository for FakeRepository {
        async fn fetch_tracking(&self, _active: bool) -> Result<Vec<TelemetrySample>, FetchError> {
            self.tracking_calls.fetch_add(1, Ordering::SeqCst);
            self.tracking
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn fetch_waypoints(&self, route_id: &str) -> Result<Vec<Waypoint>, FetchError> {
            self.waypoint_calls.fetch_add(1, Ordering::SeqCst);
            // Give concurrent callers a chance to interleave.
            tokio::task::yield_now().await;
            self.waypoints
                .lock()
                .unwrap()
                .get(route_id)
                .cloned()
                .ok_or(FetchError::NotFound)
        }

        async fn fetch_aircraft_data(
            &self,
            query: &AircraftDataQuery,
        ) -> Result<Vec<TelemetrySample>, FetchError> {
            self.queries.lock().unwrap().push(query.clone());
            if let Some(err) = self.history_error.lock().unwrap().take() {
                return Err(err);
            }
            Ok(self.history.lock().unwrap().clone())
        }
    }
}
