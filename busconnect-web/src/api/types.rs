//! Response types for the BusConnect REST backend.
//!
//! Field names match the backend's JSON exactly. Optional and
//! sometimes-missing fields default rather than failing the whole response,
//! since the pages render explicit placeholders for absent data.

use serde::{Deserialize, Serialize};

/// A boarding/alighting location.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Stop {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    /// Geographic point as the backend renders it, e.g. `"POINT(79.85 6.93)"`.
    #[serde(default)]
    pub location: String,
    /// Position along a route; only set on stops embedded in a journey.
    #[serde(default)]
    pub sequence: u32,
    /// Links a journey stop to its entry in `stop_times`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_stop_id: Option<String>,
}

/// Arrival/departure times of a journey at one route stop.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StopTime {
    pub id: String,
    pub route_stop_id: String,
    pub arrival_time: Option<String>,
    pub departure_time: Option<String>,
}

/// One scheduled bus trip.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Journey {
    pub journey_id: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub days_of_week: Vec<String>,
    pub schedule_id: String,
    pub valid_from: String,
    pub valid_until: Option<String>,
    pub bus_id: String,
    pub bus_number: String,
    pub bus_name: String,
    pub bus_type: String,
    /// Decimal string, e.g. `"450.00"`.
    pub fare: String,
    pub is_active: bool,
    pub operator_id: String,
    pub operator_name: String,
    pub contact_info: String,
    pub route_id: String,
    pub route_name: String,
    /// Kilometres.
    pub total_distance: f64,
    /// Minutes.
    pub total_duration: u32,
    pub stops: Vec<Stop>,
    pub stop_times: Vec<StopTime>,
}

impl Journey {
    /// The boarding stop: sequence 1, else the first listed.
    pub fn source_stop(&self) -> Option<&Stop> {
        self.stops
            .iter()
            .find(|s| s.sequence == 1)
            .or_else(|| self.stops.first())
    }

    /// The alighting stop: highest sequence, else the last listed.
    pub fn destination_stop(&self) -> Option<&Stop> {
        let last_seq = self.stops.len() as u32;
        self.stops
            .iter()
            .find(|s| s.sequence == last_seq)
            .or_else(|| self.stops.last())
    }

    /// Times for a stop embedded in this journey.
    pub fn stop_time_for(&self, stop: &Stop) -> Option<&StopTime> {
        let key = stop.route_stop_id.as_deref()?;
        self.stop_times.iter().find(|t| t.route_stop_id == key)
    }
}

/// `GET /journey` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct JourneyPage {
    #[serde(default)]
    pub journeys: Vec<Journey>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// A recurring trip grouping from the older `GET /schedule` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BusSchedule {
    pub schedule_id: String,
    pub bus_id: String,
    pub bus_number: String,
    pub bus_name: String,
    pub bus_type: String,
    pub operator_name: String,
    pub route_name: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub days_of_week: Vec<String>,
    pub fare: String,
}

/// `GET /schedule` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SchedulePage {
    #[serde(default)]
    pub schedules: Vec<BusSchedule>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// `GET /stops` response.
#[derive(Debug, Deserialize)]
pub(crate) struct StopsResponse {
    #[serde(default)]
    pub stops: Vec<Stop>,
}

/// `GET /operators/types` and `GET /buses/types` response.
#[derive(Debug, Deserialize)]
pub(crate) struct TypesResponse {
    #[serde(default)]
    pub types: Vec<String>,
}
