// HTTP request handlers
use crate::application::history_service::{AircraftOptions, HistoryFilter};
use crate::application::live_service::LiveSnapshot;
use crate::domain::dashboard::Dashboard;
use crate::domain::overlay::MapOverlay;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectResponse {
    pub selected_id: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current live positions with the fleet summary
pub async fn live_snapshot(State(state): State<Arc<AppState>>) -> Json<LiveSnapshot> {
    Json(state.live_service.snapshot().await)
}

/// Map overlay for the selected flight
pub async fn live_overlay(State(state): State<Arc<AppState>>) -> Json<MapOverlay> {
    Json(state.live_service.overlay().await)
}

/// Toggle the selected flight; a null id clears the selection
pub async fn select_flight(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectRequest>,
) -> Json<SelectResponse> {
    let selected_id = state.live_service.select(request.id.as_deref()).await;
    Json(SelectResponse { selected_id })
}

/// Clear the selection unconditionally
pub async fn clear_selection(State(state): State<Arc<AppState>>) -> Json<SelectResponse> {
    state.live_service.clear_selection().await;
    Json(SelectResponse { selected_id: None })
}

/// Tail numbers for the aircraft filter
pub async fn aircraft_options(State(state): State<Arc<AppState>>) -> Json<AircraftOptions> {
    Json(state.history_service.aircraft_options().await)
}

/// Historical dashboard for the given filters
pub async fn history_dashboard(
    Query(filter): Query<HistoryFilter>,
    State(state): State<Arc<AppState>>,
) -> Json<Dashboard> {
    Json(state.history_service.dashboard(&filter).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::fleet_repository::fake::FakeRepository;
    use crate::application::history_service::HistoricalService;
    use crate::application::live_service::LiveTrackingService;
    use crate::application::waypoint_cache::WaypointCache;

    fn state() -> Arc<AppState> {
        let repo = Arc::new(FakeRepository::default());
        let cache = WaypointCache::new(repo.clone(), 4);
        Arc::new(AppState {
            live_service: LiveTrackingService::new(repo.clone(), cache),
            history_service: HistoricalService::new(repo),
        })
    }

    #[tokio::test]
    async fn test_select_flight_toggles() {
        let state = state();

        let Json(first) = select_flight(
            State(state.clone()),
            Json(SelectRequest { id: Some("t1".to_string()) }),
        )
        .await;
        assert_eq!(first.selected_id.as_deref(), Some("t1"));

        let Json(second) = select_flight(
            State(state.clone()),
            Json(SelectRequest { id: Some("t1".to_string()) }),
        )
        .await;
        assert_eq!(second.selected_id, None);
    }

    #[tokio::test]
    async fn test_history_without_filters() {
        let Json(dashboard) =
            history_dashboard(Query(HistoryFilter::default()), State(state())).await;
        assert_eq!(dashboard.records, 0);
        assert!(dashboard.empty.is_some());
    }
}
