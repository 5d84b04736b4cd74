// Per-flight aggregation of historical telemetry
use super::round_half_up;
use super::telemetry::{cmp_instants, FlightStatus, TelemetrySample};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

pub const UNKNOWN_ROUTE: &str = "—";

/// One flight instance with the samples that belong to it and the
/// metrics derived from its first and last point.
#[derive(Debug, Clone, Serialize)]
pub struct FlightAggregate {
    pub id: String,
    pub aircraft_tail_number: String,
    pub callsign: Option<String>,
    pub route_name: String,
    pub status: FlightStatus,
    pub ordered_points: Vec<TelemetrySample>,
    pub start_energy: Option<f64>,
    pub end_energy: Option<f64>,
    pub energy_delta: Option<i64>,
    pub duration_minutes: Option<i64>,
    pub start_timestamp: Option<DateTime<Utc>>,
}

impl FlightAggregate {
    fn from_first_sample(sample: &TelemetrySample) -> Self {
        let instance = &sample.flight_instance;
        Self {
            id: sample.flight_id().to_string(),
            aircraft_tail_number: instance.aircraft.tail_number.clone(),
            callsign: instance.callsign.clone(),
            route_name: instance
                .route
                .as_ref()
                .map(|r| r.name.clone())
                .unwrap_or_else(|| UNKNOWN_ROUTE.to_string()),
            status: instance.flight_status.clone(),
            ordered_points: Vec::new(),
            start_energy: None,
            end_energy: None,
            energy_delta: None,
            duration_minutes: None,
            start_timestamp: None,
        }
    }

    /// Flight start time, or first sample time if the flight has fewer
    /// than two points.
    pub fn sort_key(&self) -> Option<DateTime<Utc>> {
        self.start_timestamp
            .or_else(|| self.ordered_points.first().and_then(|p| p.created_time()))
    }

    fn derive_metrics(&mut self) {
        self.ordered_points
            .sort_by(|a, b| cmp_instants(a.created_time(), b.created_time()));

        if self.ordered_points.len() < 2 {
            return;
        }

        let first = &self.ordered_points[0];
        let last = &self.ordered_points[self.ordered_points.len() - 1];

        let start_energy = first.energy_or_zero();
        let end_energy = last.energy_or_zero();
        self.start_energy = Some(start_energy);
        self.end_energy = Some(end_energy);
        self.energy_delta = Some(round_half_up(start_energy - end_energy) as i64);

        let first_time = first.created_time();
        self.start_timestamp = first_time;
        self.duration_minutes = match (first_time, last.created_time()) {
            (Some(start), Some(end)) => {
                let millis = (end - start).num_milliseconds() as f64;
                Some(round_half_up(millis / 60_000.0) as i64)
            }
            _ => None,
        };
    }
}

/// Partition samples into flights, newest flight first.
pub fn group_flights(samples: &[TelemetrySample]) -> Vec<FlightAggregate> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut flights: Vec<FlightAggregate> = Vec::new();

    for sample in samples {
        let slot = *index.entry(sample.flight_id()).or_insert_with(|| {
            flights.push(FlightAggregate::from_first_sample(sample));
            flights.len() - 1
        });
        flights[slot].ordered_points.push(sample.clone());
    }

    for flight in &mut flights {
        flight.derive_metrics();
    }

    flights.sort_by(|a, b| match (a.sort_key(), b.sort_key()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    tracing::debug!(
        "Grouped {} samples into {} flights",
        samples.len(),
        flights.len()
    );

    flights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::fixtures::sample;
    use crate::domain::telemetry::Route;
    use std::collections::HashSet;

    #[test]
    fn test_grouping_partitions_samples() {
        let samples = vec![
            sample("a1", "f1", "2024-01-01T10:02:00Z", 80.0),
            sample("b1", "f2", "2024-01-01T09:00:00Z", 95.0),
            sample("a2", "f1", "2024-01-01T10:00:00Z", 90.0),
            sample("b2", "f2", "2024-01-01T09:10:00Z", 85.0),
            sample("c1", "f3", "2024-01-01T11:00:00Z", 70.0),
        ];

        let flights = group_flights(&samples);
        assert_eq!(flights.len(), 3);

        let mut seen = HashSet::new();
        for flight in &flights {
            for point in &flight.ordered_points {
                assert_eq!(point.flight_id(), flight.id);
                assert!(seen.insert(point.id.clone()));
            }
        }
        assert_eq!(seen.len(), samples.len());
    }

    #[test]
    fn test_points_are_chronological() {
        let samples = vec![
            sample("a3", "f1", "2024-01-01T10:05:00Z", 70.0),
            sample("a1", "f1", "2024-01-01T10:00:00Z", 90.0),
            sample("a2", "f1", "2024-01-01T10:02:00Z", 80.0),
        ];

        let flights = group_flights(&samples);
        let ids: Vec<&str> = flights[0].ordered_points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let samples = vec![
            sample("x", "f1", "2024-01-01T10:00:00Z", 90.0),
            sample("y", "f1", "2024-01-01T10:00:00Z", 89.0),
        ];

        let flights = group_flights(&samples);
        assert_eq!(flights[0].ordered_points[0].id, "x");
        assert_eq!(flights[0].ordered_points[1].id, "y");
    }

    #[test]
    fn test_single_point_flight_omits_metrics() {
        let flights = group_flights(&[sample("a", "f1", "2024-01-01T10:00:00Z", 90.0)]);
        let flight = &flights[0];

        assert_eq!(flight.start_energy, None);
        assert_eq!(flight.end_energy, None);
        assert_eq!(flight.energy_delta, None);
        assert_eq!(flight.duration_minutes, None);
        assert_eq!(flight.start_timestamp, None);
        assert_eq!(flight.sort_key(), flight.ordered_points[0].created_time());
    }

    #[test]
    fn test_energy_delta() {
        let flights = group_flights(&[
            sample("a", "f1", "2024-01-01T10:00:00Z", 90.0),
            sample("b", "f1", "2024-01-01T10:20:00Z", 40.0),
        ]);

        assert_eq!(flights[0].start_energy, Some(90.0));
        assert_eq!(flights[0].end_energy, Some(40.0));
        assert_eq!(flights[0].energy_delta, Some(50));
        assert_eq!(flights[0].duration_minutes, Some(20));
    }

    #[test]
    fn test_recharge_gives_negative_delta() {
        let flights = group_flights(&[
            sample("a", "f1", "2024-01-01T10:00:00Z", 40.0),
            sample("b", "f1", "2024-01-01T10:20:00Z", 62.5),
        ]);

        // -22.5 rounds half up to -22
        assert_eq!(flights[0].energy_delta, Some(-22));
    }

    #[test]
    fn test_duration_rounds_half_up() {
        let flights = group_flights(&[
            sample("a", "f1", "2024-01-01T00:00:00Z", 90.0),
            sample("b", "f1", "2024-01-01T00:02:30Z", 88.0),
        ]);

        assert_eq!(flights[0].duration_minutes, Some(3));
    }

    #[test]
    fn test_flights_sorted_newest_first() {
        let samples = vec![
            sample("a1", "f10", "2024-01-01T10:00:00Z", 90.0),
            sample("a2", "f10", "2024-01-01T10:10:00Z", 85.0),
            sample("b1", "f09", "2024-01-01T09:00:00Z", 90.0),
            sample("b2", "f09", "2024-01-01T09:10:00Z", 85.0),
            sample("c1", "f11", "2024-01-01T11:00:00Z", 90.0),
            sample("c2", "f11", "2024-01-01T11:10:00Z", 85.0),
        ];

        let flights = group_flights(&samples);
        let ids: Vec<&str> = flights.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f11", "f10", "f09"]);
    }

    #[test]
    fn test_single_point_flight_sorts_by_its_sample() {
        let samples = vec![
            sample("a1", "f1", "2024-01-01T09:00:00Z", 90.0),
            sample("a2", "f1", "2024-01-01T09:30:00Z", 80.0),
            sample("b1", "f2", "2024-01-01T10:00:00Z", 90.0),
        ];

        let flights = group_flights(&samples);
        assert_eq!(flights[0].id, "f2");
        assert_eq!(flights[1].id, "f1");
    }

    #[test]
    fn test_first_sample_metadata_wins() {
        let mut first = sample("a1", "f1", "2024-01-01T10:05:00Z", 80.0);
        first.flight_instance.route = Some(Route {
            id: "r1".to_string(),
            name: "CGH-GRU".to_string(),
        });
        let mut second = sample("a2", "f1", "2024-01-01T10:00:00Z", 90.0);
        second.flight_instance.callsign = Some("OTHER".to_string());

        let flights = group_flights(&[first, second]);
        assert_eq!(flights[0].route_name, "CGH-GRU");
        assert_eq!(flights[0].callsign.as_deref(), Some("UAM-f1"));
    }

    #[test]
    fn test_missing_route_uses_placeholder() {
        let flights = group_flights(&[sample("a", "f1", "2024-01-01T10:00:00Z", 90.0)]);
        assert_eq!(flights[0].route_name, UNKNOWN_ROUTE);
    }

    #[test]
    fn test_malformed_timestamp_does_not_panic() {
        let samples = vec![
            sample("a1", "f1", "garbage", 90.0),
            sample("a2", "f1", "2024-01-01T10:00:00Z", 80.0),
            sample("b1", "f2", "also garbage", 70.0),
        ];

        let flights = group_flights(&samples);
        assert_eq!(flights.len(), 2);
        assert_eq!(flights[0].id, "f1");
        assert_eq!(flights[0].ordered_points[0].id, "a2");
        assert_eq!(flights[0].duration_minutes, None);
        assert_eq!(flights[0].energy_delta, Some(-10));
        assert_eq!(flights[1].sort_key(), None);
    }

    #[test]
    fn test_empty_input() {
        assert!(group_flights(&[]).is_empty());
    }
}
