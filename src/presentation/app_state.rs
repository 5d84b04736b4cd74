// Application state for HTTP handlers
use crate::application::history_service::HistoricalService;
use crate::application::live_service::LiveTrackingService;

#[derive(Clone)]
pub struct AppState {
    pub live_service: LiveTrackingService,
    pub history_service: HistoricalService,
}
