// Historical dashboard domain model
use super::analytics::{build_chart_series, ChartPoint, SummaryStatistics};
use super::flight::{group_flights, FlightAggregate};
use super::telemetry::TelemetrySample;
use chrono::TimeZone;
use serde::Serialize;
use std::fmt::Display;

/// Why the dashboard has nothing to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    NoDataFound,
    NoSelection,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub records: usize,
    pub stats: SummaryStatistics,
    pub chart: Vec<ChartPoint>,
    pub flights: Vec<FlightAggregate>,
    pub empty: Option<EmptyReason>,
    pub error: Option<String>,
}

impl Dashboard {
    /// Derive every view of the filtered set from scratch.
    pub fn build<Tz>(samples: &[TelemetrySample], has_filters: bool, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let empty = match (samples.is_empty(), has_filters) {
            (false, _) => None,
            (true, true) => Some(EmptyReason::NoDataFound),
            (true, false) => Some(EmptyReason::NoSelection),
        };

        Self {
            records: samples.len(),
            stats: SummaryStatistics::from_samples(samples),
            chart: build_chart_series(samples, tz),
            flights: group_flights(samples),
            empty,
            error: None,
        }
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::fixtures::sample;
    use chrono::Utc;

    #[test]
    fn test_empty_reason() {
        let unfiltered = Dashboard::build(&[], false, &Utc);
        assert_eq!(unfiltered.empty, Some(EmptyReason::NoSelection));
        assert!(unfiltered.flights.is_empty());
        assert!(unfiltered.chart.is_empty());

        let filtered = Dashboard::build(&[], true, &Utc);
        assert_eq!(filtered.empty, Some(EmptyReason::NoDataFound));
    }

    #[test]
    fn test_build_dashboard() {
        let samples = vec![
            sample("a1", "f1", "2024-01-01T10:00:00Z", 90.0),
            sample("a2", "f1", "2024-01-01T10:30:00Z", 70.0),
            sample("b1", "f2", "2024-01-01T12:00:00Z", 60.0),
        ];

        let dashboard = Dashboard::build(&samples, true, &Utc);
        assert_eq!(dashboard.records, 3);
        assert_eq!(dashboard.empty, None);
        assert_eq!(dashboard.chart.len(), 3);
        assert_eq!(dashboard.flights.len(), 2);
        assert_eq!(dashboard.flights[0].id, "f2");
        assert_eq!(dashboard.stats.total_records, 3);
    }
}
