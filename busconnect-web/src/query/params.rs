//! Outgoing query parameters for the journey and schedule listings.
//!
//! Every optional field that is `None` (or an empty list) is left out of the
//! encoded request entirely; the backend never sees empty or null values.

use chrono::NaiveDate;

use super::error::QueryError;
use super::sort::SortOption;
use super::time_window::TimeRange;

/// Date format used on the wire and in page URLs.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| QueryError::InvalidDate(s.to_string()))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parameters produced by the search form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    /// Stop id, or raw text when no stop matched.
    pub source: Option<String>,
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
}

impl SearchParams {
    pub fn is_empty(&self) -> bool {
        self.source.is_none() && self.destination.is_none() && self.date.is_none()
    }

    fn push_pairs(&self, pairs: &mut Vec<(&'static str, String)>) {
        if let Some(source) = &self.source {
            pairs.push(("source", source.clone()));
        }
        if let Some(destination) = &self.destination {
            pairs.push(("destination", destination.clone()));
        }
        if let Some(date) = self.date {
            pairs.push(("date", format_date(date)));
        }
    }
}

/// Parameters produced by reducing the filter panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub operator: Option<String>,
    pub bus_type: Option<String>,
    /// Three-letter day abbreviations, in selection order.
    pub days_of_week: Vec<String>,
    pub departure: Option<TimeRange>,
    pub arrival: Option<TimeRange>,
}

impl FilterParams {
    pub fn is_empty(&self) -> bool {
        self.operator.is_none()
            && self.bus_type.is_none()
            && self.days_of_week.is_empty()
            && self.departure.is_none()
            && self.arrival.is_none()
    }

    /// Encode as request pairs. Days are sent as repeated `days_of_week[]`.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        self.push_pairs(&mut pairs);
        pairs
    }

    fn push_pairs(&self, pairs: &mut Vec<(&'static str, String)>) {
        if let Some(operator) = &self.operator {
            pairs.push(("operator", operator.clone()));
        }
        if let Some(bus_type) = &self.bus_type {
            pairs.push(("bus_type", bus_type.clone()));
        }
        for day in &self.days_of_week {
            pairs.push(("days_of_week[]", day.clone()));
        }
        if let Some(range) = &self.departure {
            pairs.push(("departure_time_from", range.from.clone()));
            pairs.push(("departure_time_to", range.to.clone()));
        }
        if let Some(range) = &self.arrival {
            pairs.push(("arrival_time_from", range.from.clone()));
            pairs.push(("arrival_time_to", range.to.clone()));
        }
    }
}

/// The merged request sent to `GET /journey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyQuery {
    pub search: SearchParams,
    pub filters: FilterParams,
    pub sort: SortOption,
    pub limit: usize,
    pub offset: usize,
}

impl JourneyQuery {
    /// Encode as request pairs in a stable order: search fields, filters,
    /// sort, then paging.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        self.search.push_pairs(&mut pairs);
        self.filters.push_pairs(&mut pairs);
        pairs.push(("sort_by", self.sort.field.as_str().to_string()));
        pairs.push(("sort_order", self.sort.order.as_str().to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));
        pairs
    }
}

/// Request for the older `GET /schedule` listing.
///
/// The schedule endpoint predates filtering by day or time; it accepts the
/// search fields plus operator, bus type and route name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleQuery {
    pub search: SearchParams,
    pub operator: Option<String>,
    pub bus_type: Option<String>,
    pub route_name: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl ScheduleQuery {
    /// Page size the schedule listing always used.
    pub const DEFAULT_LIMIT: usize = 50;

    pub fn new(search: SearchParams) -> Self {
        Self {
            search,
            limit: Self::DEFAULT_LIMIT,
            ..Default::default()
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        self.search.push_pairs(&mut pairs);
        if let Some(operator) = &self.operator {
            pairs.push(("operator", operator.clone()));
        }
        if let Some(bus_type) = &self.bus_type {
            pairs.push(("bus_type", bus_type.clone()));
        }
        if let Some(route_name) = &self.route_name {
            pairs.push(("route_name", route_name.clone()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(pairs: &[(&'static str, String)]) -> Vec<&'static str> {
        pairs.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn search_without_filters_sends_only_search_sort_and_paging() {
        let query = JourneyQuery {
            search: SearchParams {
                source: Some("A".into()),
                destination: Some("B".into()),
                date: Some(parse_date("2024-05-01").unwrap()),
            },
            filters: FilterParams::default(),
            sort: SortOption::default(),
            limit: 10,
            offset: 0,
        };

        let pairs = query.to_query_pairs();
        assert_eq!(
            keys(&pairs),
            vec![
                "source",
                "destination",
                "date",
                "sort_by",
                "sort_order",
                "limit",
                "offset"
            ]
        );
        assert_eq!(pairs[0].1, "A");
        assert_eq!(pairs[1].1, "B");
        assert_eq!(pairs[2].1, "2024-05-01");
        assert_eq!(pairs[3].1, "departure_time");
        assert_eq!(pairs[4].1, "ASC");
        assert_eq!(pairs[5].1, "10");
        assert_eq!(pairs[6].1, "0");
    }

    #[test]
    fn filters_encode_repeated_days_and_ranges() {
        let filters = FilterParams {
            operator: Some("SLTB".into()),
            bus_type: None,
            days_of_week: vec!["Mon".into(), "Fri".into()],
            departure: Some(TimeRange::new("06:00:00", "12:00:00")),
            arrival: None,
        };

        let pairs = filters.to_query_pairs();
        assert_eq!(
            keys(&pairs),
            vec![
                "operator",
                "days_of_week[]",
                "days_of_week[]",
                "departure_time_from",
                "departure_time_to"
            ]
        );
        assert_eq!(pairs[1].1, "Mon");
        assert_eq!(pairs[2].1, "Fri");
    }

    #[test]
    fn empty_filters_encode_nothing() {
        let filters = FilterParams::default();
        assert!(filters.is_empty());
        assert!(filters.to_query_pairs().is_empty());
    }

    #[test]
    fn schedule_query_defaults_to_fifty() {
        let query = ScheduleQuery::new(SearchParams {
            source: Some("stop-1".into()),
            ..Default::default()
        });
        let pairs = query.to_query_pairs();
        assert_eq!(keys(&pairs), vec!["source", "limit", "offset"]);
        assert_eq!(pairs[1].1, "50");
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(parse_date("2024-05-01").is_ok());
        assert!(parse_date(" 2024-05-01 ").is_ok());
        assert_eq!(
            parse_date("01/05/2024"),
            Err(QueryError::InvalidDate("01/05/2024".into()))
        );
        assert!(parse_date("2024-02-30").is_err());
    }
}
