//! Sort options for the journey listing.

use std::fmt;

use super::error::QueryError;

/// Sort direction understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Journey field the backend can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    DepartureTime,
    ArrivalTime,
    Fare,
    BusType,
    OperatorName,
    RouteName,
}

impl SortField {
    /// Column name sent as `sort_by`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::DepartureTime => "departure_time",
            SortField::ArrivalTime => "arrival_time",
            SortField::Fare => "fare",
            SortField::BusType => "bus_type",
            SortField::OperatorName => "operator_name",
            SortField::RouteName => "route_name",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the seven (field, order) pairs offered in the sort menu.
///
/// Fare is the only field offered in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortOption {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortOption {
    /// Every sort option, in menu order.
    pub const ALL: [SortOption; 7] = [
        SortOption::new(SortField::DepartureTime, SortOrder::Asc),
        SortOption::new(SortField::ArrivalTime, SortOrder::Asc),
        SortOption::new(SortField::Fare, SortOrder::Asc),
        SortOption::new(SortField::Fare, SortOrder::Desc),
        SortOption::new(SortField::BusType, SortOrder::Asc),
        SortOption::new(SortField::OperatorName, SortOrder::Asc),
        SortOption::new(SortField::RouteName, SortOrder::Asc),
    ];

    const fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Look up the option for a (field, order) pair.
    ///
    /// Returns `None` for pairs outside the fixed set, e.g. `route_name DESC`.
    pub fn find(field: &str, order: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|o| o.field.as_str() == field && o.order.as_str().eq_ignore_ascii_case(order))
    }

    /// Parse the compact key used in page URLs, e.g. `fare_desc`.
    pub fn parse_key(key: &str) -> Result<Self, QueryError> {
        Self::ALL
            .into_iter()
            .find(|o| o.key() == key)
            .ok_or_else(|| QueryError::UnknownSort(key.to_string()))
    }

    /// Compact URL key: `{field}_{asc|desc}`.
    pub fn key(&self) -> String {
        format!(
            "{}_{}",
            self.field.as_str(),
            self.order.as_str().to_ascii_lowercase()
        )
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match (self.field, self.order) {
            (SortField::DepartureTime, _) => "Departure Time",
            (SortField::ArrivalTime, _) => "Arrival Time",
            (SortField::Fare, SortOrder::Asc) => "Lowest Fare",
            (SortField::Fare, SortOrder::Desc) => "Highest Fare",
            (SortField::BusType, _) => "Bus Type",
            (SortField::OperatorName, _) => "Operator Name",
            (SortField::RouteName, _) => "Route Name",
        }
    }
}

impl Default for SortOption {
    fn default() -> Self {
        Self::new(SortField::DepartureTime, SortOrder::Asc)
    }
}
