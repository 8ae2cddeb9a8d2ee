//! Filter panel state and its reduction to request parameters.
//!
//! The panel is multi-select in every category. Reduction is lossy on
//! purpose: only the first selected operator and bus type are sent, days are
//! shortened to three letters, and all selected time windows of one kind
//! collapse into a single range.

use super::params::FilterParams;
use super::time_window::merge_windows;

/// Day names offered in the filter panel, Monday first.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Add `item` if absent, remove it if present.
///
/// Remaining items keep their relative order; an added item goes last.
pub fn toggle(item: &str, list: &[String]) -> Vec<String> {
    if list.iter().any(|i| i == item) {
        list.iter().filter(|i| *i != item).cloned().collect()
    } else {
        let mut next = list.to_vec();
        next.push(item.to_string());
        next
    }
}

/// Shorten a day name to the abbreviation the backend expects.
pub fn abbreviate_day(day: &str) -> String {
    day.chars().take(3).collect()
}

/// One multi-select category of the filter panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterCategory {
    Operator,
    BusType,
    DayOfWeek,
    DepartureWindow,
    ArrivalWindow,
}

/// Current selections in the filter panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub operators: Vec<String>,
    pub bus_types: Vec<String>,
    pub days_of_week: Vec<String>,
    pub departure_windows: Vec<String>,
    pub arrival_windows: Vec<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// The selections for one category.
    pub fn list(&self, category: FilterCategory) -> &[String] {
        match category {
            FilterCategory::Operator => &self.operators,
            FilterCategory::BusType => &self.bus_types,
            FilterCategory::DayOfWeek => &self.days_of_week,
            FilterCategory::DepartureWindow => &self.departure_windows,
            FilterCategory::ArrivalWindow => &self.arrival_windows,
        }
    }

    fn list_mut(&mut self, category: FilterCategory) -> &mut Vec<String> {
        match category {
            FilterCategory::Operator => &mut self.operators,
            FilterCategory::BusType => &mut self.bus_types,
            FilterCategory::DayOfWeek => &mut self.days_of_week,
            FilterCategory::DepartureWindow => &mut self.departure_windows,
            FilterCategory::ArrivalWindow => &mut self.arrival_windows,
        }
    }

    pub fn is_selected(&self, category: FilterCategory, item: &str) -> bool {
        self.list(category).iter().any(|i| i == item)
    }

    /// Toggle one item in one category.
    pub fn toggle(&mut self, category: FilterCategory, item: &str) {
        let list = self.list_mut(category);
        *list = toggle(item, list);
    }

    /// Copy of this selection with one item toggled.
    pub fn toggled(&self, category: FilterCategory, item: &str) -> Self {
        let mut next = self.clone();
        next.toggle(category, item);
        next
    }

    /// Total number of selected entries, for the "Filters (n)" badge.
    pub fn selected_count(&self) -> usize {
        self.operators.len()
            + self.bus_types.len()
            + self.days_of_week.len()
            + self.departure_windows.len()
            + self.arrival_windows.len()
    }

    /// Reduce the selection to outgoing request parameters.
    pub fn reduce(&self) -> FilterParams {
        FilterParams {
            operator: self.operators.first().cloned(),
            bus_type: self.bus_types.first().cloned(),
            days_of_week: self.days_of_week.iter().map(|d| abbreviate_day(d)).collect(),
            departure: merge_windows(&self.departure_windows),
            arrival: merge_windows(&self.arrival_windows),
        }
    }

    /// Reduce and hand the result to `on_change`.
    pub fn apply<F>(&self, on_change: F)
    where
        F: FnOnce(FilterParams),
    {
        on_change(self.reduce());
    }

    /// Clear every category and report empty parameters.
    pub fn reset<F>(&mut self, on_change: F)
    where
        F: FnOnce(FilterParams),
    {
        *self = Self::default();
        on_change(FilterParams::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::time_window::TimeRange;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn toggle_appends_absent_item() {
        let list = strings(&["AC", "Normal"]);
        assert_eq!(toggle("Luxury", &list), strings(&["AC", "Normal", "Luxury"]));
    }

    #[test]
    fn toggle_removes_present_item_keeping_order() {
        let list = strings(&["a", "b", "c", "d"]);
        assert_eq!(toggle("b", &list), strings(&["a", "c", "d"]));
    }

    #[test]
    fn reduce_takes_first_operator_and_bus_type() {
        let selection = FilterSelection {
            operators: strings(&["NCG", "SLTB"]),
            bus_types: strings(&["AC", "Normal"]),
            ..Default::default()
        };

        let params = selection.reduce();
        assert_eq!(params.operator.as_deref(), Some("NCG"));
        assert_eq!(params.bus_type.as_deref(), Some("AC"));
    }

    #[test]
    fn reduce_abbreviates_days() {
        let selection = FilterSelection {
            days_of_week: strings(&["Wednesday", "Monday"]),
            ..Default::default()
        };
        assert_eq!(selection.reduce().days_of_week, strings(&["Wed", "Mon"]));
    }

    #[test]
    fn reduce_merges_departure_windows() {
        let selection = FilterSelection {
            departure_windows: strings(&["12 AM - 6 AM", "6 PM - 12 AM"]),
            ..Default::default()
        };

        let params = selection.reduce();
        assert_eq!(
            params.departure,
            Some(TimeRange::new("00:00:00", "23:59:59"))
        );
        assert_eq!(params.arrival, None);

        let pairs = params.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("departure_time_from", "00:00:00".to_string()),
                ("departure_time_to", "23:59:59".to_string()),
            ]
        );
    }

    #[test]
    fn reduce_merges_arrival_windows_alone() {
        let selection = FilterSelection {
            arrival_windows: strings(&["12 PM - 6 PM", "6 AM - 12 PM"]),
            ..Default::default()
        };

        let params = selection.reduce();
        assert_eq!(params.departure, None);
        assert_eq!(
            params.arrival,
            Some(TimeRange::new("06:00:00", "18:00:00"))
        );
        assert_eq!(
            params.to_query_pairs(),
            vec![
                ("arrival_time_from", "06:00:00".to_string()),
                ("arrival_time_to", "18:00:00".to_string()),
            ]
        );
    }

    #[test]
    fn departure_and_arrival_windows_merge_independently() {
        let selection = FilterSelection {
            departure_windows: strings(&["12 AM - 6 AM"]),
            arrival_windows: strings(&["6 PM - 12 AM"]),
            ..Default::default()
        };

        let params = selection.reduce();
        assert_eq!(
            params.departure,
            Some(TimeRange::new("00:00:00", "06:00:00"))
        );
        assert_eq!(
            params.arrival,
            Some(TimeRange::new("18:00:00", "23:59:59"))
        );

        let keys: Vec<&str> = params.to_query_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec![
                "departure_time_from",
                "departure_time_to",
                "arrival_time_from",
                "arrival_time_to"
            ]
        );
    }

    #[test]
    fn reduce_omits_empty_categories() {
        let params = FilterSelection::new().reduce();
        assert!(params.is_empty());

        // No `operator` key at all, not an empty one
        assert!(
            params
                .to_query_pairs()
                .iter()
                .all(|(k, _)| *k != "operator")
        );
    }

    #[test]
    fn apply_hands_reduction_to_callback() {
        let mut selection = FilterSelection::new();
        selection.toggle(FilterCategory::BusType, "AC");

        let mut seen = None;
        selection.apply(|params| seen = Some(params));
        assert_eq!(seen.unwrap().bus_type.as_deref(), Some("AC"));
    }

    #[test]
    fn reset_clears_and_reports_empty() {
        let mut selection = FilterSelection::new();
        selection.toggle(FilterCategory::Operator, "NCG");
        selection.toggle(FilterCategory::DayOfWeek, "Friday");
        assert_eq!(selection.selected_count(), 2);

        let mut seen = None;
        selection.reset(|params| seen = Some(params));
        assert_eq!(selection.selected_count(), 0);
        assert_eq!(seen, Some(FilterParams::default()));
    }

    #[test]
    fn toggled_leaves_original_untouched() {
        let selection = FilterSelection::new();
        let next = selection.toggled(FilterCategory::ArrivalWindow, "12 PM - 6 PM");
        assert!(next.is_selected(FilterCategory::ArrivalWindow, "12 PM - 6 PM"));
        assert!(!selection.is_selected(FilterCategory::ArrivalWindow, "12 PM - 6 PM"));
    }
}
