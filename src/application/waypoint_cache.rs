// Bounded per-route waypoint cache
use crate::application::fleet_repository::FleetRepository;
use crate::domain::telemetry::Waypoint;
use futures::future::{BoxFuture, FutureExt, Shared};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A waypoint fetch shared by every caller that missed on the same route.
/// Resolves to `None` when the fetch failed.
type PendingFetch = Shared<BoxFuture<'static, Option<Arc<Vec<Waypoint>>>>>;

struct Entries {
    routes: LruCache<String, Arc<Vec<Waypoint>>>,
    pending: HashMap<String, PendingFetch>,
}

/// Waypoints by route id. Routes are fetched once and kept until evicted
/// by newer routes; failed fetches are not cached.
#[derive(Clone)]
pub struct WaypointCache {
    repository: Arc<dyn FleetRepository>,
    entries: Arc<Mutex<Entries>>,
}

impl WaypointCache {
    pub fn new(repository: Arc<dyn FleetRepository>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            repository,
            entries: Arc::new(Mutex::new(Entries {
                routes: LruCache::new(capacity),
                pending: HashMap::new(),
            })),
        }
    }

    pub async fn get(&self, route_id: &str) -> Arc<Vec<Waypoint>> {
        let fetch = {
            let mut entries = self.entries.lock().await;
            if let Some(cached) = entries.routes.get(route_id) {
                return cached.clone();
            }
            entries
                .pending
                .entry(route_id.to_string())
                .or_insert_with(|| self.fetch(route_id))
                .clone()
        };

        let result = fetch.await;

        let mut entries = self.entries.lock().await;
        // The first caller to settle moves the result into the cache.
        if entries.pending.remove(route_id).is_some() {
            if let Some(waypoints) = &result {
                if let Some((evicted, _)) =
                    entries.routes.push(route_id.to_string(), waypoints.clone())
                {
                    if evicted != route_id {
                        tracing::debug!("Evicted waypoints for route {}", evicted);
                    }
                }
                tracing::debug!(
                    "Cached {} waypoints for route {} ({} routes cached)",
                    waypoints.len(),
                    route_id,
                    entries.routes.len()
                );
            }
        }

        result.unwrap_or_default()
    }

    fn fetch(&self, route_id: &str) -> PendingFetch {
        let repository = self.repository.clone();
        let route_id = route_id.to_string();
        async move {
            match repository.fetch_waypoints(&route_id).await {
                Ok(waypoints) => Some(Arc::new(waypoints)),
                Err(e) => {
                    tracing::warn!("Error fetching waypoints for route {}: {}", route_id, e);
                    None
                }
            }
        }
        .boxed()
        .shared()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.lock().await.routes.len()
    }
}
