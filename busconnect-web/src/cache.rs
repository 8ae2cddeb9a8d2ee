//! Caching layer for slow-changing backend lookups.
//!
//! Operator and bus type lists feed the filter panel on every listing page
//! but rarely change, and journey details are re-requested whenever a user
//! goes back and forth between a listing and a detail page. Both are cached
//! with a TTL. Journey listings are never cached: results depend on the
//! full query and must reflect the backend's current state.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::api::{ApiError, BusApi, Journey, JourneyPage, SchedulePage, Stop};
use crate::query::{JourneyQuery, ScheduleQuery};

/// Which lookup list a cache entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LookupKey {
    OperatorTypes,
    BusTypes,
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for operator/bus type lists.
    pub lookup_ttl: Duration,

    /// TTL for journey details.
    pub journey_ttl: Duration,

    /// Maximum number of cached journeys.
    pub max_journeys: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            lookup_ttl: Duration::from_secs(10 * 60),
            journey_ttl: Duration::from_secs(60),
            max_journeys: 1000,
        }
    }
}

/// Backend client with caching.
///
/// Wraps any [`BusApi`] and implements [`BusApi`] itself, so callers do not
/// need to know whether a response was cached.
pub struct CachedBusApi<A> {
    inner: A,
    lookups: MokaCache<LookupKey, Arc<Vec<String>>>,
    journeys: MokaCache<String, Arc<Journey>>,
}

impl<A: BusApi> CachedBusApi<A> {
    /// Create a new cached client.
    pub fn new(inner: A, config: &CacheConfig) -> Self {
        let lookups = MokaCache::builder()
            .time_to_live(config.lookup_ttl)
            .max_capacity(2)
            .build();

        let journeys = MokaCache::builder()
            .time_to_live(config.journey_ttl)
            .max_capacity(config.max_journeys)
            .build();

        Self {
            inner,
            lookups,
            journeys,
        }
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    async fn lookup(&self, key: LookupKey) -> Result<Vec<String>, ApiError> {
        if let Some(cached) = self.lookups.get(&key).await {
            return Ok(cached.as_ref().clone());
        }

        debug!(?key, "lookup cache miss");
        let fetched = match key {
            LookupKey::OperatorTypes => self.inner.operator_types().await?,
            LookupKey::BusTypes => self.inner.bus_types().await?,
        };

        self.lookups.insert(key, Arc::new(fetched.clone())).await;
        Ok(fetched)
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.lookups.invalidate_all();
        self.journeys.invalidate_all();
    }
}

impl<A: BusApi> BusApi for CachedBusApi<A> {
    async fn stops(&self) -> Result<Vec<Stop>, ApiError> {
        self.inner.stops().await
    }

    async fn search_journeys(&self, query: &JourneyQuery) -> Result<JourneyPage, ApiError> {
        self.inner.search_journeys(query).await
    }

    async fn journey(&self, id: &str) -> Result<Journey, ApiError> {
        if let Some(cached) = self.journeys.get(id).await {
            return Ok(cached.as_ref().clone());
        }

        let journey = self.inner.journey(id).await?;
        self.journeys
            .insert(id.to_string(), Arc::new(journey.clone()))
            .await;

        Ok(journey)
    }

    async fn operator_types(&self) -> Result<Vec<String>, ApiError> {
        self.lookup(LookupKey::OperatorTypes).await
    }

    async fn bus_types(&self) -> Result<Vec<String>, ApiError> {
        self.lookup(LookupKey::BusTypes).await
    }

    async fn search_schedules(&self, query: &ScheduleQuery) -> Result<SchedulePage, ApiError> {
        self.inner.search_schedules(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::api::MockBusApi;

    /// Counts calls through to the wrapped backend.
    struct Counting {
        inner: MockBusApi,
        journey_calls: AtomicUsize,
        lookup_calls: AtomicUsize,
    }

    impl Counting {
        fn new() -> Self {
            let journey = Journey {
                journey_id: "j-1".into(),
                operator_name: "SLTB".into(),
                bus_type: "AC".into(),
                ..Default::default()
            };
            Self {
                inner: MockBusApi::from_parts(vec![], vec![journey], vec![]),
                journey_calls: AtomicUsize::new(0),
                lookup_calls: AtomicUsize::new(0),
            }
        }
    }

    impl BusApi for Counting {
        async fn stops(&self) -> Result<Vec<Stop>, ApiError> {
            self.inner.stops().await
        }

        async fn search_journeys(&self, query: &JourneyQuery) -> Result<JourneyPage, ApiError> {
            self.inner.search_journeys(query).await
        }

        async fn journey(&self, id: &str) -> Result<Journey, ApiError> {
            self.journey_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.journey(id).await
        }

        async fn operator_types(&self) -> Result<Vec<String>, ApiError> {
            self.lookup_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.operator_types().await
        }

        async fn bus_types(&self) -> Result<Vec<String>, ApiError> {
            self.lookup_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.bus_types().await
        }

        async fn search_schedules(&self, query: &ScheduleQuery) -> Result<SchedulePage, ApiError> {
            self.inner.search_schedules(query).await
        }
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.lookup_ttl, Duration::from_secs(600));
        assert_eq!(config.journey_ttl, Duration::from_secs(60));
        assert_eq!(config.max_journeys, 1000);
    }

    #[tokio::test]
    async fn journey_detail_is_cached() {
        let cached = CachedBusApi::new(Counting::new(), &CacheConfig::default());

        let first = cached.journey("j-1").await.unwrap();
        let second = cached.journey("j-1").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(cached.inner().journey_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn misses_are_not_cached() {
        let cached = CachedBusApi::new(Counting::new(), &CacheConfig::default());

        assert!(cached.journey("missing").await.is_err());
        assert!(cached.journey("missing").await.is_err());
        assert_eq!(cached.inner().journey_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn lookups_cached_per_kind() {
        let cached = CachedBusApi::new(Counting::new(), &CacheConfig::default());

        assert_eq!(cached.operator_types().await.unwrap(), vec!["SLTB"]);
        assert_eq!(cached.operator_types().await.unwrap(), vec!["SLTB"]);
        assert_eq!(cached.bus_types().await.unwrap(), vec!["AC"]);
        assert_eq!(cached.inner().lookup_calls.load(Ordering::SeqCst), 2);

        cached.invalidate_cache();
        cached.bus_types().await.unwrap();
        assert_eq!(cached.inner().lookup_calls.load(Ordering::SeqCst), 3);
    }
}
