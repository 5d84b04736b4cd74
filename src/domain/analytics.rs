// Chart series and headline statistics over a filtered sample set
use super::telemetry::{cmp_instants, TelemetrySample};
use super::{round_half_up, round_to};
use chrono::TimeZone;
use serde::Serialize;
use std::fmt::Display;

const SMOOTHING_RADIUS: usize = 1;
const MIN_DURATION_HOURS: f64 = 0.1;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time: String,
    pub altitude: f64,
    pub speed: f64,
    pub energy: f64,
    pub energy_smoothed: f64,
}

/// Centered moving average, window clipped at the sequence ends.
fn moving_average(values: &[f64], radius: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            let start = i.saturating_sub(radius);
            let end = (i + radius + 1).min(values.len());
            let window = &values[start..end];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

/// Chronological chart series with a smoothed energy trend. Smoothing runs
/// across the whole set, so adjacent flights can blend at their boundary.
pub fn build_chart_series<Tz>(samples: &[TelemetrySample], tz: &Tz) -> Vec<ChartPoint>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut sorted: Vec<&TelemetrySample> = samples.iter().collect();
    sorted.sort_by(|a, b| cmp_instants(a.created_time(), b.created_time()));

    let energies: Vec<f64> = sorted.iter().map(|s| s.energy_or_zero()).collect();
    let smoothed = moving_average(&energies, SMOOTHING_RADIUS);

    sorted
        .iter()
        .zip(smoothed)
        .map(|(sample, energy_smoothed)| ChartPoint {
            time: sample
                .created_time()
                .map(|t| t.with_timezone(tz).format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_string()),
            altitude: sample.altitude_or_zero(),
            speed: sample.speed_or_zero(),
            energy: sample.energy_or_zero(),
            energy_smoothed,
        })
        .collect()
}

/// Headline KPIs over the filtered set, in the order the backend returned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub total_records: usize,
    pub avg_altitude: i64,
    pub max_speed: i64,
    pub avg_energy: f64,
    pub initial_energy: f64,
    pub final_energy: f64,
    pub total_consumption: i64,
    pub consumption_rate: i64,
    pub duration_hours: Option<f64>,
}

impl SummaryStatistics {
    pub fn from_samples(samples: &[TelemetrySample]) -> Self {
        // Zero readings are treated as missing and excluded.
        let present = |field: fn(&TelemetrySample) -> f64| -> Vec<f64> {
            samples
                .iter()
                .map(field)
                .filter(|v| *v != 0.0 && !v.is_nan())
                .collect()
        };
        let altitudes = present(TelemetrySample::altitude_or_zero);
        let speeds = present(TelemetrySample::speed_or_zero);
        let energies = present(TelemetrySample::energy_or_zero);

        let avg_altitude = mean(&altitudes).map(|m| round_half_up(m) as i64).unwrap_or(0);
        let max_speed = speeds
            .iter()
            .copied()
            .reduce(f64::max)
            .map(|m| round_half_up(m) as i64)
            .unwrap_or(0);
        let avg_energy = mean(&energies).map(|m| round_to(m, 1)).unwrap_or(0.0);

        let first_energy = energies.first().copied().unwrap_or(0.0);
        let last_energy = energies.last().copied().unwrap_or(0.0);
        let consumption = first_energy - last_energy;

        let duration_hours = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) => match (first.created_time(), last.created_time()) {
                (Some(start), Some(end)) => {
                    Some((end - start).num_milliseconds() as f64 / MILLIS_PER_HOUR)
                }
                _ => None,
            },
            _ => Some(0.0),
        };
        let rate_hours = duration_hours
            .unwrap_or(MIN_DURATION_HOURS)
            .max(MIN_DURATION_HOURS);

        Self {
            total_records: samples.len(),
            avg_altitude,
            max_speed,
            avg_energy,
            initial_energy: round_to(first_energy, 1),
            final_energy: round_to(last_energy, 1),
            total_consumption: round_half_up(consumption) as i64,
            consumption_rate: round_half_up(consumption / rate_hours) as i64,
            duration_hours,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Distinct tail numbers in first-seen order, for the aircraft filter.
pub fn aircraft_options(samples: &[TelemetrySample]) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for sample in samples {
        let tail = &sample.flight_instance.aircraft.tail_number;
        if !options.iter().any(|t| t == tail) {
            options.push(tail.clone());
        }
    }
    options
}
