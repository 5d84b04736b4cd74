// Live tracking service - Polling, selection and map overlay
use crate::application::fleet_repository::{FetchError, FleetRepository, NotFoundAsEmpty};
use crate::application::waypoint_cache::WaypointCache;
use crate::domain::fleet::{EnergyClass, FleetSummary};
use crate::domain::overlay::{selected_route_id, MapOverlay};
use crate::domain::selection::Selection;
use crate::domain::telemetry::TelemetrySample;
use futures::StreamExt;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;

pub const LOAD_ERROR_MESSAGE: &str = "Failed to load data.";

#[derive(Debug, Clone, Serialize)]
pub struct LiveTracking {
    #[serde(flatten)]
    pub sample: TelemetrySample,
    pub display_name: String,
    pub energy_class: EnergyClass,
}

impl From<&TelemetrySample> for LiveTracking {
    fn from(sample: &TelemetrySample) -> Self {
        Self {
            display_name: sample.flight_instance.display_name().to_string(),
            energy_class: EnergyClass::of(sample.energy_or_zero()),
            sample: sample.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LiveSnapshot {
    pub trackings: Vec<LiveTracking>,
    pub selected_id: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub summary: FleetSummary,
}

#[derive(Debug)]
struct LiveState {
    trackings: Vec<TelemetrySample>,
    selection: Selection,
    loading: bool,
    error: Option<String>,
    applied_generation: u64,
}

impl Default for LiveState {
    fn default() -> Self {
        Self {
            trackings: Vec::new(),
            selection: Selection::default(),
            loading: true,
            error: None,
            applied_generation: 0,
        }
    }
}

/// Clears the in-flight flag when the fetch settles, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct LiveTrackingService {
    repository: Arc<dyn FleetRepository>,
    waypoints: WaypointCache,
    state: Arc<RwLock<LiveState>>,
    in_flight: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl LiveTrackingService {
    pub fn new(repository: Arc<dyn FleetRepository>, waypoints: WaypointCache) -> Self {
        Self {
            repository,
            waypoints,
            state: Arc::new(RwLock::new(LiveState::default())),
            in_flight: Arc::new(AtomicBool::new(false)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Poll the tracking endpoint every `interval` until the handle is aborted.
    pub fn start_polling(&self, interval: Duration) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut ticks = IntervalStream::new(ticker);

            tracing::info!("Started live tracking poller (every {:?})", interval);

            while ticks.next().await.is_some() {
                let service = service.clone();
                tokio::spawn(async move {
                    service.refresh().await;
                });
            }
        })
    }

    /// Fetch active trackings once. Returns false when a previous fetch is
    /// still outstanding and this one was skipped.
    pub async fn refresh(&self) -> bool {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            tracing::debug!("Tracking fetch still in flight, skipping tick");
            return false;
        }
        let _guard = InFlight(&self.in_flight);

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let result = self.repository.fetch_tracking(true).await.or_empty();
        self.apply(generation, result).await;
        true
    }

    async fn apply(&self, generation: u64, result: Result<Vec<TelemetrySample>, FetchError>) {
        let mut state = self.state.write().await;
        if generation <= state.applied_generation {
            tracing::debug!("Discarding stale tracking response (generation {})", generation);
            return;
        }
        state.applied_generation = generation;
        state.loading = false;

        match result {
            Ok(trackings) => {
                tracing::debug!("Received {} active trackings", trackings.len());
                state.trackings = trackings;
                state.error = None;
            }
            Err(e) => {
                tracing::warn!("Error fetching trackings: {}", e);
                state.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
    }

    pub async fn snapshot(&self) -> LiveSnapshot {
        let state = self.state.read().await;
        LiveSnapshot {
            summary: FleetSummary::from_trackings(&state.trackings),
            trackings: state.trackings.iter().map(LiveTracking::from).collect(),
            selected_id: state.selection.selected().map(str::to_string),
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    /// Toggle selection of a tracking; `None` clears it.
    pub async fn select(&self, id: Option<&str>) -> Option<String> {
        let mut state = self.state.write().await;
        state.selection.select(id).map(str::to_string)
    }

    pub async fn clear_selection(&self) {
        self.state.write().await.selection.clear();
    }

    pub async fn overlay(&self) -> MapOverlay {
        let (trackings, selected) = {
            let state = self.state.read().await;
            (
                state.trackings.clone(),
                state.selection.selected().map(str::to_string),
            )
        };

        let waypoints = match selected_route_id(&trackings, selected.as_deref()) {
            Some(route_id) => self.waypoints.get(route_id).await,
            None => Arc::new(Vec::new()),
        };

        MapOverlay::build(&trackings, selected.as_deref(), &waypoints)
    }
}
