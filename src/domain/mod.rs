// Domain layer - Fleet telemetry models and pure derivations
pub mod analytics;
pub mod dashboard;
pub mod fleet;
pub mod flight;
pub mod overlay;
pub mod selection;
pub mod telemetry;

// Enough digits past the rounding position to expose any binary deviation
// from an exact decimal half.
const EXACT_DIGITS: usize = 24;

/// Round to the nearest integer, halves towards positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round the exact binary value to a fixed number of decimal places.
/// Only exact decimal halves (e.g. 0.25) round away from zero, so 0.15,
/// stored as 0.1499..., rounds down to 0.1.
pub(crate) fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    if is_exact_half(value, decimals) {
        let factor = 10f64.powi(decimals as i32);
        return value.signum() * ((value.abs() * factor).floor() + 1.0) / factor;
    }
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

fn is_exact_half(value: f64, decimals: usize) -> bool {
    let digits = format!("{:.*}", decimals + EXACT_DIGITS, value.abs());
    let tail = &digits[digits.len() - EXACT_DIGITS..];
    tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0')
}
