//! Data transfer objects for web requests and responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{Journey, Stop};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::query::{FilterSelection, QueryError, SortOption, parse_date};

/// Query string of the `/journeys` page.
///
/// Every piece of listing state lives here so that links and form
/// submissions fully describe the page. Multi-select filters repeat their
/// key, e.g. `operator=SLTB&operator=NCG`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JourneysPageRequest {
    /// Source as typed: a stop name or free text
    #[serde(default)]
    pub from: String,

    /// Destination as typed
    #[serde(default)]
    pub to: String,

    /// Travel date, `YYYY-MM-DD`; blank means any day
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub operator: Vec<String>,

    #[serde(default)]
    pub bus_type: Vec<String>,

    /// Full day names
    #[serde(default)]
    pub day: Vec<String>,

    /// Time window labels
    #[serde(default)]
    pub departure: Vec<String>,

    #[serde(default)]
    pub arrival: Vec<String>,

    /// Sort key such as `fare_desc`
    pub sort: Option<String>,

    pub page: Option<usize>,

    pub per_page: Option<usize>,
}

impl JourneysPageRequest {
    /// Parse a raw query string (without the leading `?`).
    pub fn from_query(raw: Option<&str>) -> Result<Self, serde_html_form::de::Error> {
        serde_html_form::from_str(raw.unwrap_or_default())
    }

    /// Validate into the listing state.
    pub fn into_state(self) -> Result<ListingState, QueryError> {
        let date = match self.date.trim() {
            "" => None,
            s => Some(parse_date(s)?),
        };

        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => SortOption::default(),
            Some(key) => SortOption::parse_key(key)?,
        };

        Ok(ListingState {
            from: self.from.trim().to_string(),
            to: self.to.trim().to_string(),
            date,
            selection: FilterSelection {
                operators: self.operator,
                bus_types: self.bus_type,
                days_of_week: self.day,
                departure_windows: self.departure,
                arrival_windows: self.arrival,
            },
            sort,
            page: self.page.unwrap_or(1),
            per_page: self.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
        })
    }
}

/// Everything that determines one `/journeys` page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    pub from: String,
    pub to: String,
    pub date: Option<NaiveDate>,
    pub selection: FilterSelection,
    pub sort: SortOption,
    pub page: usize,
    pub per_page: usize,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            from: String::new(),
            to: String::new(),
            date: None,
            selection: FilterSelection::default(),
            sort: SortOption::default(),
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListingState {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if !self.from.is_empty() {
            pairs.push(("from", self.from.clone()));
        }
        if !self.to.is_empty() {
            pairs.push(("to", self.to.clone()));
        }
        if let Some(date) = self.date {
            pairs.push(("date", crate::query::format_date(date)));
        }

        let selection = &self.selection;
        let repeated = [
            ("operator", &selection.operators),
            ("bus_type", &selection.bus_types),
            ("day", &selection.days_of_week),
            ("departure", &selection.departure_windows),
            ("arrival", &selection.arrival_windows),
        ];
        for (key, values) in repeated {
            pairs.extend(values.iter().map(|v| (key, v.clone())));
        }

        if self.sort != SortOption::default() {
            pairs.push(("sort", self.sort.key()));
        }
        if self.page != 1 {
            pairs.push(("page", self.page.to_string()));
        }
        if self.per_page != DEFAULT_PAGE_SIZE {
            pairs.push(("per_page", self.per_page.to_string()));
        }
        pairs
    }

    /// Link to the page this state describes.
    pub fn href(&self) -> String {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return "/journeys".to_string();
        }

        match serde_html_form::to_string(&pairs) {
            Ok(query) => format!("/journeys?{query}"),
            Err(e) => {
                warn!(error = %e, "failed to encode listing link");
                "/journeys".to_string()
            }
        }
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Sorting keeps the current page.
    pub fn with_sort(&self, sort: SortOption) -> Self {
        Self {
            sort,
            ..self.clone()
        }
    }

    /// A new page size starts again from page 1.
    pub fn with_per_page(&self, per_page: usize) -> Self {
        Self {
            per_page,
            page: 1,
            ..self.clone()
        }
    }

    /// New filters start again from page 1.
    pub fn with_selection(&self, selection: FilterSelection) -> Self {
        Self {
            selection,
            page: 1,
            ..self.clone()
        }
    }

    /// Source and destination exchanged; back to page 1.
    pub fn swapped(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
            page: 1,
            ..self.clone()
        }
    }
}

/// Request to search stops for autocomplete.
#[derive(Debug, Deserialize)]
pub struct StopSearchRequest {
    /// Text typed so far
    #[serde(default)]
    pub q: String,

    /// Maximum results (default 10, capped at 50)
    pub limit: Option<usize>,
}

/// A stop in autocomplete results.
#[derive(Debug, Serialize)]
pub struct StopSearchResult {
    pub id: String,
    pub name: String,
    pub city: String,
}

impl From<Stop> for StopSearchResult {
    fn from(stop: Stop) -> Self {
        Self {
            id: stop.id,
            name: stop.name,
            city: stop.city,
        }
    }
}

/// Response for stop search.
#[derive(Debug, Serialize)]
pub struct StopSearchResponse {
    pub stops: Vec<StopSearchResult>,
}

/// JSON rendition of a `/journeys` page.
#[derive(Debug, Serialize)]
pub struct JourneyListResponse {
    pub journeys: Vec<Journey>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub sort_by: &'static str,
    pub sort_order: &'static str,

    /// Set when the backend request failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Request for the schedule listing.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleRequest {
    pub from: Option<String>,
    pub to: Option<String>,
    pub date: Option<String>,
    pub operator: Option<String>,
    pub bus_type: Option<String>,
    pub route_name: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
