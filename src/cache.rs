//! Memoized higher-order networks keyed by statistics version and order
//!
//! Statistics versions are unique across instances and change on every
//! ingestion, so an entry built from other or older statistics can never be
//! returned. Entries of other versions are evicted on the next miss.

use crate::error::Result;
use crate::network::{build_network, HigherOrderNetwork};
use crate::paths::PathStatistics;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Thread-safe network table shared by concurrent order evaluations
#[derive(Debug, Default)]
pub struct NetworkCache {
    networks: DashMap<(u64, usize), Arc<HigherOrderNetwork>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl NetworkCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached network for `(statistics.version(), order)`, built on a miss
    ///
    /// Construction errors are returned and nothing is cached.
    pub fn get_or_build(
        &self,
        statistics: &PathStatistics,
        order: usize,
    ) -> Result<Arc<HigherOrderNetwork>> {
        let version = statistics.version();

        if let Some(network) = self.networks.get(&(version, order)) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(version, order, "network cache hit");
            return Ok(Arc::clone(network.value()));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(version, order, "network cache miss");

        let network = Arc::new(build_network(order, statistics)?);

        self.networks.retain(|&(v, _), _| v == version);
        self.networks.insert((version, order), Arc::clone(&network));

        Ok(network)
    }

    /// Number of cached networks
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.networks.clear();
    }
}
