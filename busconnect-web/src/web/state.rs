//! Application state for the web layer.

use std::sync::Arc;

use crate::api::Backend;
use crate::cache::CachedBusApi;
use crate::stops::StopDirectory;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached backend client
    pub api: Arc<CachedBusApi<Backend>>,

    /// Stops for autocomplete and free-text resolution
    pub stops: StopDirectory,
}

impl AppState {
    pub fn new(api: CachedBusApi<Backend>, stops: StopDirectory) -> Self {
        Self {
            api: Arc::new(api),
            stops,
        }
    }
}
