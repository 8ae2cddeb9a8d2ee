//! Fixture-backed backend for running without the real service.
//!
//! Loads stops, journeys and schedules from JSON files and answers queries
//! the way the backend does: filter, sort, then slice by limit/offset.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;
use tracing::info;

use crate::query::{JourneyQuery, ScheduleQuery, SortField, SortOrder, format_date};

use super::BusApi;
use super::error::ApiError;
use super::types::{BusSchedule, Journey, JourneyPage, SchedulePage, Stop, StopsResponse};

#[derive(Debug, Deserialize)]
struct JourneysFile {
    journeys: Vec<Journey>,
}

#[derive(Debug, Deserialize)]
struct SchedulesFile {
    schedules: Vec<BusSchedule>,
}

#[derive(Debug)]
struct Fixtures {
    stops: Vec<Stop>,
    journeys: Vec<Journey>,
    schedules: Vec<BusSchedule>,
}

/// Mock backend that serves data from JSON files.
///
/// Expects `stops.json` and `journeys.json` in the data directory, shaped
/// like the backend's `GET /stops` and `GET /journey` responses.
/// `schedules.json` is optional.
#[derive(Debug, Clone)]
pub struct MockBusApi {
    data: Arc<Fixtures>,
}

impl MockBusApi {
    /// Load fixtures from a directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, ApiError> {
        let data_dir = data_dir.as_ref();

        let stops: StopsResponse = read_fixture(&data_dir.join("stops.json"))?;
        let journeys: JourneysFile = read_fixture(&data_dir.join("journeys.json"))?;

        let schedules_path = data_dir.join("schedules.json");
        let schedules = if schedules_path.is_file() {
            read_fixture::<SchedulesFile>(&schedules_path)?.schedules
        } else {
            Vec::new()
        };

        info!(
            dir = %data_dir.display(),
            stops = stops.stops.len(),
            journeys = journeys.journeys.len(),
            schedules = schedules.len(),
            "loaded mock backend fixtures"
        );

        Ok(Self::from_parts(stops.stops, journeys.journeys, schedules))
    }

    /// Build directly from in-memory records.
    pub fn from_parts(stops: Vec<Stop>, journeys: Vec<Journey>, schedules: Vec<BusSchedule>) -> Self {
        Self {
            data: Arc::new(Fixtures {
                stops,
                journeys,
                schedules,
            }),
        }
    }

    fn matching_journeys(&self, query: &JourneyQuery) -> Vec<&Journey> {
        let search = &query.search;
        let filters = &query.filters;

        let mut matches: Vec<&Journey> = self
            .data
            .journeys
            .iter()
            .filter(|j| serves_route(j, search.source.as_deref(), search.destination.as_deref()))
            .filter(|j| search.date.is_none_or(|d| runs_on_date(j, d)))
            .filter(|j| {
                filters
                    .operator
                    .as_ref()
                    .is_none_or(|o| &j.operator_name == o)
            })
            .filter(|j| filters.bus_type.as_ref().is_none_or(|b| &j.bus_type == b))
            .filter(|j| {
                filters.days_of_week.is_empty()
                    || filters.days_of_week.iter().any(|d| j.days_of_week.contains(d))
            })
            .filter(|j| {
                filters.departure.as_ref().is_none_or(|r| {
                    r.from.as_str() <= j.departure_time.as_str()
                        && j.departure_time.as_str() <= r.to.as_str()
                })
            })
            .filter(|j| {
                filters.arrival.as_ref().is_none_or(|r| {
                    r.from.as_str() <= j.arrival_time.as_str()
                        && j.arrival_time.as_str() <= r.to.as_str()
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            let ord = compare_by(a, b, query.sort.field);
            match query.sort.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });

        matches
    }
}

impl BusApi for MockBusApi {
    async fn stops(&self) -> Result<Vec<Stop>, ApiError> {
        Ok(self.data.stops.clone())
    }

    async fn search_journeys(&self, query: &JourneyQuery) -> Result<JourneyPage, ApiError> {
        let matches = self.matching_journeys(query);
        let total = matches.len();
        let journeys = matches
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect();

        Ok(JourneyPage {
            journeys,
            total,
            limit: query.limit,
            offset: query.offset,
        })
    }

    async fn journey(&self, id: &str) -> Result<Journey, ApiError> {
        self.data
            .journeys
            .iter()
            .find(|j| j.journey_id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("journey {id}")))
    }

    async fn operator_types(&self) -> Result<Vec<String>, ApiError> {
        Ok(distinct(self.data.journeys.iter().map(|j| &j.operator_name)))
    }

    async fn bus_types(&self) -> Result<Vec<String>, ApiError> {
        Ok(distinct(self.data.journeys.iter().map(|j| &j.bus_type)))
    }

    async fn search_schedules(&self, query: &ScheduleQuery) -> Result<SchedulePage, ApiError> {
        let matches: Vec<&BusSchedule> = self
            .data
            .schedules
            .iter()
            .filter(|s| query.operator.as_ref().is_none_or(|o| &s.operator_name == o))
            .filter(|s| query.bus_type.as_ref().is_none_or(|b| &s.bus_type == b))
            .filter(|s| {
                query
                    .route_name
                    .as_ref()
                    .is_none_or(|r| contains_ignore_case(&s.route_name, r))
            })
            .filter(|s| {
                query
                    .search
                    .date
                    .is_none_or(|d| s.days_of_week.iter().any(|day| day == day_abbrev(d.weekday())))
            })
            .collect();

        let total = matches.len();
        let schedules = matches
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect();

        Ok(SchedulePage {
            schedules,
            total,
            limit: query.limit,
            offset: query.offset,
        })
    }
}

fn read_fixture<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| ApiError::Fixture(format!("failed to read {}: {e}", path.display())))?;

    serde_json::from_str(&json)
        .map_err(|e| ApiError::Fixture(format!("failed to parse {}: {e}", path.display())))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Whether `needle` names this stop: exact id, or a case-insensitive
/// substring of its name or city.
fn stop_matches(stop: &Stop, needle: &str) -> bool {
    stop.id == needle || contains_ignore_case(&stop.name, needle) || contains_ignore_case(&stop.city, needle)
}

/// Whether the journey calls at `source` and later at `destination`.
fn serves_route(journey: &Journey, source: Option<&str>, destination: Option<&str>) -> bool {
    let mut stops: Vec<&Stop> = journey.stops.iter().collect();
    stops.sort_by_key(|s| s.sequence);

    let board = match source {
        Some(needle) => match stops.iter().position(|s| stop_matches(s, needle)) {
            Some(idx) => idx,
            None => return false,
        },
        None => 0,
    };

    match destination {
        Some(needle) => stops[board..].iter().skip(1).any(|s| stop_matches(s, needle)),
        None => true,
    }
}

fn day_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Whether the journey operates on `date`: right weekday, inside validity.
fn runs_on_date(journey: &Journey, date: NaiveDate) -> bool {
    let day = format_date(date);
    let within_validity = journey.valid_from.get(..10).is_none_or(|from| from <= day.as_str())
        && journey
            .valid_until
            .as_deref()
            .and_then(|u| u.get(..10))
            .is_none_or(|until| day.as_str() <= until);

    within_validity && journey.days_of_week.iter().any(|d| d == day_abbrev(date.weekday()))
}

fn fare_value(journey: &Journey) -> f64 {
    journey.fare.parse().unwrap_or(f64::MAX)
}

fn compare_by(a: &Journey, b: &Journey, field: SortField) -> Ordering {
    match field {
        SortField::DepartureTime => a.departure_time.cmp(&b.departure_time),
        SortField::ArrivalTime => a.arrival_time.cmp(&b.arrival_time),
        SortField::Fare => fare_value(a).total_cmp(&fare_value(b)),
        SortField::BusType => a.bus_type.cmp(&b.bus_type),
        SortField::OperatorName => a.operator_name.cmp(&b.operator_name),
        SortField::RouteName => a.route_name.cmp(&b.route_name),
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
