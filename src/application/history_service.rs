// Historical analytics service - Filtered telemetry to dashboard views
use crate::application::fleet_repository::{AircraftDataQuery, FleetRepository, NotFoundAsEmpty};
use crate::domain::analytics::aircraft_options;
use crate::domain::dashboard::Dashboard;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

pub const BASE_LOAD_ERROR: &str = "Failed to load base data";
pub const FILTER_ERROR: &str = "Failed to apply filters";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Filters as entered in the UI: a tail number and a calendar date range.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryFilter {
    pub aircraft: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(value: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| FilterError::InvalidDate(value.to_string()))
}

impl HistoryFilter {
    pub fn has_filters(&self) -> bool {
        non_empty(&self.aircraft).is_some()
            || non_empty(&self.start_date).is_some()
            || non_empty(&self.end_date).is_some()
    }

    /// Dates widen to the whole day in UTC.
    pub fn to_query(&self) -> Result<AircraftDataQuery, FilterError> {
        let created_from = non_empty(&self.start_date)
            .map(parse_date)
            .transpose()?
            .map(|d| format!("{}T00:00:00Z", d.format("%Y-%m-%d")));
        let created_to = non_empty(&self.end_date)
            .map(parse_date)
            .transpose()?
            .map(|d| format!("{}T23:59:59Z", d.format("%Y-%m-%d")));

        Ok(AircraftDataQuery {
            aircraft: non_empty(&self.aircraft).map(str::to_string),
            created_from,
            created_to,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AircraftOptions {
    pub aircraft: Vec<String>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct HistoricalService {
    repository: Arc<dyn FleetRepository>,
}

impl HistoricalService {
    pub fn new(repository: Arc<dyn FleetRepository>) -> Self {
        Self { repository }
    }

    /// Tail numbers present in the unfiltered history.
    pub async fn aircraft_options(&self) -> AircraftOptions {
        match self
            .repository
            .fetch_aircraft_data(&AircraftDataQuery::default())
            .await
            .or_empty()
        {
            Ok(samples) => AircraftOptions {
                aircraft: aircraft_options(&samples),
                error: None,
            },
            Err(e) => {
                tracing::warn!("Error loading aircraft data: {}", e);
                AircraftOptions {
                    aircraft: Vec::new(),
                    error: Some(BASE_LOAD_ERROR.to_string()),
                }
            }
        }
    }

    pub async fn dashboard(&self, filter: &HistoryFilter) -> Dashboard {
        let has_filters = filter.has_filters();

        let query = match filter.to_query() {
            Ok(query) => query,
            Err(e) => {
                return Dashboard::build(&[], has_filters, &Local).with_error(Some(e.to_string()));
            }
        };

        if query.is_empty() {
            tracing::debug!("No filters set, fetching all aircraft data");
        }

        match self.repository.fetch_aircraft_data(&query).await.or_empty() {
            Ok(samples) => {
                tracing::debug!("Building dashboard over {} samples", samples.len());
                Dashboard::build(&samples, has_filters, &Local)
            }
            Err(e) => {
                tracing::warn!("Error applying filters {:?}: {}", query, e);
                Dashboard::build(&[], has_filters, &Local).with_error(Some(FILTER_ERROR.to_string()))
            }
        }
    }
}
