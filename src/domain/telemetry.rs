// Telemetry data domain models
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parse a backend timestamp. RFC 3339 first, then a zone-less ISO 8601
/// form read as UTC. Anything else is "no instant".
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FlightStatus {
    Activated,
    Terminated,
    Other(String),
}

impl From<String> for FlightStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ACTIVATED" => FlightStatus::Activated,
            "TERMINATED" => FlightStatus::Terminated,
            _ => FlightStatus::Other(value),
        }
    }
}

impl From<FlightStatus> for String {
    fn from(status: FlightStatus) -> Self {
        match status {
            FlightStatus::Activated => "ACTIVATED".to_string(),
            FlightStatus::Terminated => "TERMINATED".to_string(),
            FlightStatus::Other(value) => value,
        }
    }
}

impl Default for FlightStatus {
    fn default() -> Self {
        FlightStatus::Other(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AircraftType {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub energy_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub tail_number: String,
    #[serde(default)]
    pub aircraft_type: Option<AircraftType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertiport {
    pub vertiport_code: String,
    pub vertiport_name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Vertiport {
    /// Coordinates, only when both are present and non-zero.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some((lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightInstance {
    pub id: String,
    #[serde(default)]
    pub callsign: Option<String>,
    #[serde(default)]
    pub flight_status: FlightStatus,
    pub aircraft: Aircraft,
    #[serde(default)]
    pub route: Option<Route>,
    #[serde(default)]
    pub departure_vertiport: Option<Vertiport>,
    #[serde(default)]
    pub arrival_vertiport: Option<Vertiport>,
}

impl FlightInstance {
    /// Label shown for the flight: callsign, or tail number without one.
    pub fn display_name(&self) -> &str {
        self.callsign
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(&self.aircraft.tail_number)
    }
}

/// One timestamped observation of an aircraft, as returned by the
/// tracking and aircraft-data endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub id: String,
    #[serde(default)]
    pub flight_instance_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub energy_level: Option<f64>,
    pub flight_instance: FlightInstance,
}

impl TelemetrySample {
    /// Grouping key: the explicit foreign key, else the embedded instance id.
    pub fn flight_id(&self) -> &str {
        self.flight_instance_id
            .as_deref()
            .unwrap_or(&self.flight_instance.id)
    }

    /// Capture time used by the historical pipeline.
    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    /// Start time used by the live path; falls back to `created_at`.
    pub fn started_time(&self) -> Option<DateTime<Utc>> {
        self.started_at
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.created_time())
    }

    pub fn altitude_or_zero(&self) -> f64 {
        self.altitude.unwrap_or(0.0)
    }

    pub fn speed_or_zero(&self) -> f64 {
        self.speed.unwrap_or(0.0)
    }

    pub fn energy_or_zero(&self) -> f64 {
        self.energy_level.unwrap_or(0.0)
    }

    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// One ordered point along a planned route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub name: String,
    pub sequence_order: i32,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: f64,
    #[serde(default)]
    pub vertiport_code: Option<String>,
}

/// Ascending comparison of optional instants; missing ones go last.
pub(crate) fn cmp_instants(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
