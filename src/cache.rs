//! In-memory read-through cache in front of a [`RouteStore`].
//!
//! Entries expire after a per-kind TTL. When the backend fails, the last
//! known data is served instead, however old. Writes drop every entry they
//! could have made stale. Concurrent misses on the same key share a single
//! backend read.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::error::Result;
use crate::model::{Location, LocationId, Route, RouteId};
use crate::traits::{RouteStore, SaveSummary};

/// Counters since the cache was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

impl CacheStats {
    /// Share of reads served from cache, in `0.0..=1.0`.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    data: T,
    fetched_at: Instant,
}

impl<T: Clone> Entry<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            fetched_at: Instant::now(),
        }
    }

    fn fresh(&self, ttl: Duration) -> Option<T> {
        (self.fetched_at.elapsed() < ttl).then(|| self.data.clone())
    }
}

/// What a backend read fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CacheKey {
    Routes,
    Locations(Option<RouteId>),
}

#[derive(Debug, Default)]
struct CacheState {
    routes: Option<Entry<Vec<Route>>>,
    locations: Option<Entry<Vec<Location>>>,
    route_locations: HashMap<RouteId, Entry<Vec<Location>>>,
    stats: CacheStats,
}

impl CacheState {
    fn drop_routes(&mut self) {
        if self.routes.take().is_some() {
            self.stats.invalidations += 1;
        }
        self.drop_route_locations();
    }

    fn drop_route_locations(&mut self) {
        self.stats.invalidations += self.route_locations.len() as u64;
        self.route_locations.clear();
    }

    /// Drops the list of all locations, keeping per-route entries.
    fn drop_location_list(&mut self) {
        if self.locations.take().is_some() {
            self.stats.invalidations += 1;
        }
    }

    fn drop_locations(&mut self) {
        self.drop_location_list();
        self.drop_route_locations();
    }
}

/// Caching wrapper around any [`RouteStore`].
#[derive(Debug)]
pub struct CachedStore<S> {
    inner: S,
    config: CacheConfig,
    state: Mutex<CacheState>,
    fetch_locks: Mutex<HashMap<CacheKey, Arc<Mutex<()>>>>,
}

impl<S: RouteStore> CachedStore<S> {
    pub fn new(inner: S, config: CacheConfig) -> Self {
        Self {
            inner,
            config,
            state: Mutex::new(CacheState::default()),
            fetch_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        self.state.lock().stats
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.drop_routes();
        state.drop_locations();
    }

    /// Lock held while `key` is being fetched, so that concurrent callers
    /// wait for the first read instead of repeating it.
    fn fetch_lock(&self, key: CacheKey) -> Arc<Mutex<()>> {
        self.fetch_locks.lock().entry(key).or_default().clone()
    }

    fn cached_routes(&self) -> Option<Vec<Route>> {
        let mut state = self.state.lock();
        let routes = state
            .routes
            .as_ref()
            .and_then(|entry| entry.fresh(self.config.routes_ttl))?;
        state.stats.hits += 1;
        debug!("routes served from cache");
        Some(routes)
    }

    fn cached_locations(&self, route_id: Option<RouteId>) -> Option<Vec<Location>> {
        let mut state = self.state.lock();
        let locations = match route_id {
            Some(id) => state
                .route_locations
                .get(&id)
                .and_then(|entry| entry.fresh(self.config.route_locations_ttl)),
            None => state
                .locations
                .as_ref()
                .and_then(|entry| entry.fresh(self.config.locations_ttl)),
        }?;
        state.stats.hits += 1;
        debug!(?route_id, "locations served from cache");
        Some(locations)
    }

    /// Routes, bypassing the cache when `force_refresh` is set.
    pub fn routes_with(&self, force_refresh: bool) -> Result<Vec<Route>> {
        let lock = self.fetch_lock(CacheKey::Routes);
        let _fetching = lock.lock();

        if !force_refresh {
            if let Some(routes) = self.cached_routes() {
                return Ok(routes);
            }
        }

        self.state.lock().stats.misses += 1;
        match self.inner.routes() {
            Ok(routes) => {
                let mut state = self.state.lock();
                state.drop_route_locations();
                state.routes = Some(Entry::new(routes.clone()));
                Ok(routes)
            }
            Err(err) => {
                let state = self.state.lock();
                match &state.routes {
                    Some(entry) => {
                        warn!(error = %err, "serving stale routes");
                        Ok(entry.data.clone())
                    }
                    None => Err(err),
                }
            }
        }
    }

    /// Locations of one route (or all), bypassing the cache when
    /// `force_refresh` is set.
    ///
    /// A fresh list of all locations replaces every per-route entry, and a
    /// fresh per-route list drops the list of all locations.
    pub fn locations_with(
        &self,
        route_id: Option<RouteId>,
        force_refresh: bool,
    ) -> Result<Vec<Location>> {
        let lock = self.fetch_lock(CacheKey::Locations(route_id));
        let _fetching = lock.lock();

        if !force_refresh {
            if let Some(locations) = self.cached_locations(route_id) {
                return Ok(locations);
            }
        }

        self.state.lock().stats.misses += 1;
        match self.inner.locations(route_id) {
            Ok(locations) => {
                let entry = Entry::new(locations.clone());
                let mut state = self.state.lock();
                match route_id {
                    Some(id) => {
                        state.drop_location_list();
                        state.route_locations.insert(id, entry);
                    }
                    None => {
                        state.drop_route_locations();
                        state.locations = Some(entry);
                    }
                }
                Ok(locations)
            }
            Err(err) => {
                let state = self.state.lock();
                let stale = match route_id {
                    Some(id) => state.route_locations.get(&id),
                    None => state.locations.as_ref(),
                };
                match stale {
                    Some(entry) => {
                        warn!(error = %err, ?route_id, "serving stale locations");
                        Ok(entry.data.clone())
                    }
                    None => Err(err),
                }
            }
        }
    }
}

impl<S: RouteStore> RouteStore for CachedStore<S> {
    fn routes(&self) -> Result<Vec<Route>> {
        self.routes_with(false)
    }

    fn locations(&self, route_id: Option<RouteId>) -> Result<Vec<Location>> {
        self.locations_with(route_id, false)
    }

    fn save_routes(&self, routes: &[Route]) -> Result<SaveSummary> {
        let summary = self.inner.save_routes(routes)?;
        self.state.lock().drop_routes();
        Ok(summary)
    }

    fn save_locations(&self, locations: &[Location]) -> Result<()> {
        self.inner.save_locations(locations)?;
        self.state.lock().drop_locations();
        Ok(())
    }

    fn create_location(&self, location: &Location) -> Result<Location> {
        let created = self.inner.create_location(location)?;
        self.state.lock().drop_locations();
        Ok(created)
    }

    fn delete_location(&self, id: LocationId) -> Result<()> {
        self.inner.delete_location(id)?;
        self.state.lock().drop_locations();
        Ok(())
    }

    fn delete_route(&self, id: RouteId) -> Result<()> {
        self.inner.delete_route(id)?;
        let mut state = self.state.lock();
        state.drop_routes();
        state.drop_locations();
        Ok(())
    }
}
