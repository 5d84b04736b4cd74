// Map overlay geometry for the selected live flight
use super::telemetry::{cmp_instants, TelemetrySample, Waypoint};
use serde::Serialize;

pub const FOCUS_ZOOM: u8 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<(f64, f64)> for Position {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self { latitude, longitude }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapFocus {
    pub center: Position,
    pub zoom: u8,
}

/// Flown path, planned route and direct fallback for one selected flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapOverlay {
    pub selected: Option<TelemetrySample>,
    pub focus: Option<MapFocus>,
    pub flown_path: Vec<Position>,
    pub departure: Option<Position>,
    pub arrival: Option<Position>,
    pub planned_route: Vec<Position>,
    pub waypoints: Vec<Waypoint>,
    pub direct_route: Option<[Position; 2]>,
}

/// The live sample a selection id refers to.
pub fn find_selected<'a>(
    trackings: &'a [TelemetrySample],
    selected_id: Option<&str>,
) -> Option<&'a TelemetrySample> {
    let id = selected_id?;
    trackings.iter().find(|t| t.id == id)
}

/// Route whose waypoints the overlay needs, if any.
pub fn selected_route_id<'a>(
    trackings: &'a [TelemetrySample],
    selected_id: Option<&str>,
) -> Option<&'a str> {
    find_selected(trackings, selected_id)
        .and_then(|t| t.flight_instance.route.as_ref())
        .map(|r| r.id.as_str())
}

impl MapOverlay {
    pub fn build(
        trackings: &[TelemetrySample],
        selected_id: Option<&str>,
        waypoints: &[Waypoint],
    ) -> Self {
        let Some(selected) = find_selected(trackings, selected_id) else {
            return Self::default();
        };

        let flight_id = selected.flight_id();
        let mut same_flight: Vec<&TelemetrySample> = trackings
            .iter()
            .filter(|t| t.flight_id() == flight_id)
            .collect();
        same_flight.sort_by(|a, b| cmp_instants(a.started_time(), b.started_time()));

        let flown_path: Vec<Position> = same_flight
            .iter()
            .map(|t| Position::from(t.position()))
            .collect();

        let instance = &selected.flight_instance;
        let (planned_route, waypoints) = if instance.route.is_some() {
            let mut ordered = waypoints.to_vec();
            ordered.sort_by_key(|w| w.sequence_order);
            let route = ordered
                .iter()
                .map(|w| Position::from((w.latitude, w.longitude)))
                .collect();
            (route, ordered)
        } else {
            (Vec::new(), Vec::new())
        };

        let direct_route = match (
            instance.route.as_ref(),
            instance.departure_vertiport.as_ref().and_then(|v| v.position()),
            instance.arrival_vertiport.as_ref().and_then(|v| v.position()),
        ) {
            (None, Some(dep), Some(arr)) => Some([dep.into(), arr.into()]),
            _ => None,
        };

        Self {
            focus: Some(MapFocus {
                center: selected.position().into(),
                zoom: FOCUS_ZOOM,
            }),
            departure: flown_path.first().copied(),
            arrival: flown_path.last().copied(),
            selected: Some(selected.clone()),
            flown_path,
            planned_route,
            waypoints,
            direct_route,
        }
    }
}
