//! Stop directory for autocomplete and free-text resolution.
//!
//! The stop list is fetched from the backend at startup and refreshed in the
//! background; readers always see a complete list.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::api::{ApiError, BusApi, Stop};
use crate::query::{StopRef, matching_stops};

/// Thread-safe, refreshable list of stops.
#[derive(Clone, Default)]
pub struct StopDirectory {
    inner: Arc<RwLock<Arc<Vec<Stop>>>>,
}

impl StopDirectory {
    /// Create a directory by fetching from the backend.
    pub async fn fetch<A: BusApi>(api: &A) -> Result<Self, ApiError> {
        let directory = Self::default();
        directory.refresh(api).await?;
        Ok(directory)
    }

    /// Create a directory from a known list.
    pub fn from_stops(stops: Vec<Stop>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(stops))),
        }
    }

    /// Snapshot of every stop.
    pub async fn all(&self) -> Arc<Vec<Stop>> {
        self.inner.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Stops whose name or city contains `query`, at most `limit` of them.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<Stop> {
        let stops = self.all().await;
        matching_stops(query, &stops)
            .into_iter()
            .take(limit)
            .cloned()
            .collect()
    }

    /// Resolve what a user typed into a stop reference.
    pub async fn resolve(&self, text: &str) -> StopRef {
        let stops = self.all().await;
        StopRef::resolve(text, &stops)
    }

    /// Replace the list with a fresh copy from the backend.
    ///
    /// On failure the existing list is kept and the error returned.
    pub async fn refresh<A: BusApi>(&self, api: &A) -> Result<usize, ApiError> {
        let stops = api.stops().await?;
        let count = stops.len();

        let mut guard = self.inner.write().await;
        *guard = Arc::new(stops);

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBusApi;

    fn stop(id: &str, name: &str, city: &str) -> Stop {
        Stop {
            id: id.into(),
            name: name.into(),
            city: city.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn search_respects_limit() {
        let directory = StopDirectory::from_stops(vec![
            stop("1", "Colombo Fort", "Colombo"),
            stop("2", "Pettah", "Colombo"),
            stop("3", "Kandy", "Kandy"),
        ]);

        assert_eq!(directory.search("colombo", 10).await.len(), 2);
        assert_eq!(directory.search("colombo", 1).await.len(), 1);
        assert_eq!(directory.search("", 10).await.len(), 3);
    }

    #[tokio::test]
    async fn resolve_uses_exact_names() {
        let directory = StopDirectory::from_stops(vec![stop("1", "Pettah", "Colombo")]);
        assert_eq!(directory.resolve("PETTAH").await.param().as_deref(), Some("1"));
        assert_eq!(
            directory.resolve("Pet").await,
            StopRef::Text("Pet".into())
        );
    }

    #[tokio::test]
    async fn refresh_replaces_list() {
        let directory = StopDirectory::default();
        assert!(directory.is_empty().await);

        let api = MockBusApi::from_parts(vec![stop("1", "Galle", "Galle")], vec![], vec![]);
        let count = directory.refresh(&api).await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(directory.len().await, 1);
    }
}
