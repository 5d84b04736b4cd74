// Fleet-wide figures for the live sidebar
use super::round_half_up;
use super::telemetry::{FlightStatus, TelemetrySample};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyClass {
    High,
    Mid,
    Low,
}

impl EnergyClass {
    pub fn of(level: f64) -> Self {
        if level >= 60.0 {
            EnergyClass::High
        } else if level >= 30.0 {
            EnergyClass::Mid
        } else {
            EnergyClass::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetSummary {
    pub tracked: usize,
    pub in_flight: usize,
    pub avg_energy: i64,
}

impl FleetSummary {
    pub fn from_trackings(trackings: &[TelemetrySample]) -> Self {
        let in_flight = trackings
            .iter()
            .filter(|t| t.flight_instance.flight_status == FlightStatus::Activated)
            .count();

        let avg_energy = if trackings.is_empty() {
            0
        } else {
            let total: f64 = trackings.iter().map(|t| t.energy_or_zero()).sum();
            round_half_up(total / trackings.len() as f64) as i64
        };

        Self {
            tracked: trackings.len(),
            in_flight,
            avg_energy,
        }
    }
}
