//! BusConnect REST backend client.
//!
//! The backend owns stops, journeys, schedules and the operator/bus type
//! lookups. This module provides:
//! - [`BusApiClient`], an HTTP client for the live backend
//! - [`MockBusApi`], which serves fixture JSON files and applies the same
//!   filtering, sorting and paging the backend does
//! - [`Backend`], which picks one of the two at startup
//!
//! All three implement [`BusApi`].

mod client;
mod error;
mod mock;
mod types;

use std::future::Future;

pub use client::{BusApiClient, BusApiConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use mock::MockBusApi;
pub use types::{BusSchedule, Journey, JourneyPage, SchedulePage, Stop, StopTime};

use crate::query::{JourneyQuery, ScheduleQuery};

/// Operations the frontend needs from the backend.
pub trait BusApi: Send + Sync {
    /// `GET /stops`
    fn stops(&self) -> impl Future<Output = Result<Vec<Stop>, ApiError>> + Send;

    /// `GET /journey`
    fn search_journeys(
        &self,
        query: &JourneyQuery,
    ) -> impl Future<Output = Result<JourneyPage, ApiError>> + Send;

    /// `GET /journey/:id`
    fn journey(&self, id: &str) -> impl Future<Output = Result<Journey, ApiError>> + Send;

    /// `GET /operators/types`
    fn operator_types(&self) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    /// `GET /buses/types`
    fn bus_types(&self) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    /// `GET /schedule`
    fn search_schedules(
        &self,
        query: &ScheduleQuery,
    ) -> impl Future<Output = Result<SchedulePage, ApiError>> + Send;
}

/// The backend selected at startup.
#[derive(Debug, Clone)]
pub enum Backend {
    Live(BusApiClient),
    Mock(MockBusApi),
}

impl BusApi for Backend {
    async fn stops(&self) -> Result<Vec<Stop>, ApiError> {
        match self {
            Backend::Live(c) => c.stops().await,
            Backend::Mock(m) => m.stops().await,
        }
    }

    async fn search_journeys(&self, query: &JourneyQuery) -> Result<JourneyPage, ApiError> {
        match self {
            Backend::Live(c) => c.search_journeys(query).await,
            Backend::Mock(m) => m.search_journeys(query).await,
        }
    }

    async fn journey(&self, id: &str) -> Result<Journey, ApiError> {
        match self {
            Backend::Live(c) => c.journey(id).await,
            Backend::Mock(m) => m.journey(id).await,
        }
    }

    async fn operator_types(&self) -> Result<Vec<String>, ApiError> {
        match self {
            Backend::Live(c) => c.operator_types().await,
            Backend::Mock(m) => m.operator_types().await,
        }
    }

    async fn bus_types(&self) -> Result<Vec<String>, ApiError> {
        match self {
            Backend::Live(c) => c.bus_types().await,
            Backend::Mock(m) => m.bus_types().await,
        }
    }

    async fn search_schedules(&self, query: &ScheduleQuery) -> Result<SchedulePage, ApiError> {
        match self {
            Backend::Live(c) => c.search_schedules(query).await,
            Backend::Mock(m) => m.search_schedules(query).await,
        }
    }
}
