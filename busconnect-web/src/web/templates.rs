//! Askama templates for the web frontend.

use askama::Template;
use reqwest::Url;

use crate::api::{Journey, Stop};
use crate::pagination::{PAGE_SIZE_OPTIONS, PageMarker, Pagination};
use crate::query::{
    FilterCategory, FilterSelection, SortOption, TimeWindow, WEEKDAYS, format_date,
};

use super::dto::ListingState;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with search form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub form: SearchFormView,
    pub stop_names: Vec<String>,
}

/// Journey listing: search form, filters, sort, results and pager.
#[derive(Template)]
#[template(path = "journeys.html")]
pub struct JourneysTemplate {
    pub form: SearchFormView,
    pub stop_names: Vec<String>,
    pub filters: FilterPanelView,
    pub sort_options: Vec<LinkView>,
    pub journeys: Vec<JourneyCardView>,
    pub error: Option<String>,
    pub pagination: Option<PaginationView>,
}

/// Journey detail page.
#[derive(Template)]
#[template(path = "journey.html")]
pub struct JourneyTemplate {
    pub journey: JourneyDetailView,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// A labelled link, optionally marked as the current choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkView {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Values to pre-fill the search form with.
#[derive(Debug, Clone, Default)]
pub struct SearchFormView {
    pub from: String,
    pub to: String,
    pub date: String,
    /// Today's date, the lower bound of the date picker.
    pub today: String,
    /// Link that exchanges source and destination, when there is anything
    /// to exchange.
    pub swap_href: Option<String>,
    /// Filters and sort to carry through a new search.
    pub hidden: Vec<(String, String)>,
}

impl SearchFormView {
    pub fn from_state(state: &ListingState, today: chrono::NaiveDate) -> Self {
        let swap_href = (!state.from.is_empty() || !state.to.is_empty())
            .then(|| state.swapped().href());

        let selection = &state.selection;
        let mut hidden: Vec<(String, String)> = [
            ("operator", &selection.operators),
            ("bus_type", &selection.bus_types),
            ("day", &selection.days_of_week),
            ("departure", &selection.departure_windows),
            ("arrival", &selection.arrival_windows),
        ]
        .into_iter()
        .flat_map(|(key, values)| values.iter().map(move |v| (key.to_string(), v.clone())))
        .collect();

        if state.sort != SortOption::default() {
            hidden.push(("sort".to_string(), state.sort.key()));
        }
        hidden.push(("per_page".to_string(), state.per_page.to_string()));

        Self {
            from: state.from.clone(),
            to: state.to.clone(),
            date: state.date.map(format_date).unwrap_or_default(),
            today: format_date(today),
            swap_href,
            hidden,
        }
    }
}

/// Stop names for the autocomplete datalist.
pub fn stop_names(stops: &[Stop]) -> Vec<String> {
    let mut names: Vec<String> = stops.iter().map(|s| s.name.clone()).collect();
    names.sort();
    names.dedup();
    names
}

/// One checkable filter option.
#[derive(Debug, Clone)]
pub struct FilterOptionView {
    pub label: String,
    pub selected: bool,
    /// Link that toggles this option.
    pub href: String,
}

/// One category of the filter panel.
#[derive(Debug, Clone)]
pub struct FilterGroupView {
    pub title: &'static str,
    pub options: Vec<FilterOptionView>,
}

/// The whole filter panel.
#[derive(Debug, Clone)]
pub struct FilterPanelView {
    pub groups: Vec<FilterGroupView>,
    pub selected_count: usize,
    pub reset_href: Option<String>,
}

impl FilterPanelView {
    pub fn new(state: &ListingState, operators: &[String], bus_types: &[String]) -> Self {
        let selection = &state.selection;

        let group = |title, category, labels: Vec<String>| FilterGroupView {
            title,
            options: labels
                .into_iter()
                .map(|label| FilterOptionView {
                    selected: selection.is_selected(category, &label),
                    href: state
                        .with_selection(selection.toggled(category, &label))
                        .href(),
                    label,
                })
                .collect(),
        };

        let windows = || TimeWindow::ALL.iter().map(|w| w.label().to_string()).collect();

        let groups = vec![
            group("Operator", FilterCategory::Operator, operators.to_vec()),
            group("Bus Type", FilterCategory::BusType, bus_types.to_vec()),
            group(
                "Days of Operation",
                FilterCategory::DayOfWeek,
                WEEKDAYS.iter().map(|d| d.to_string()).collect(),
            ),
            group("Departure Time", FilterCategory::DepartureWindow, windows()),
            group("Arrival Time", FilterCategory::ArrivalWindow, windows()),
        ];

        let selected_count = selection.selected_count();
        let reset_href =
            (selected_count > 0).then(|| state.with_selection(FilterSelection::new()).href());

        Self {
            groups,
            selected_count,
            reset_href,
        }
    }
}

/// Sort menu entries.
pub fn sort_links(state: &ListingState) -> Vec<LinkView> {
    SortOption::ALL
        .iter()
        .map(|option| LinkView {
            label: option.label().to_string(),
            href: state.with_sort(*option).href(),
            active: *option == state.sort,
        })
        .collect()
}

/// One entry of the page navigation bar; ellipses have no link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinkView {
    pub label: String,
    pub href: Option<String>,
    pub current: bool,
}

/// Page navigation, page-size chooser and item range.
#[derive(Debug, Clone)]
pub struct PaginationView {
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub pages: Vec<PageLinkView>,
    pub page_sizes: Vec<LinkView>,
    /// e.g. "Showing 11-20 of 95 journeys"
    pub summary: String,
}

impl PaginationView {
    /// `None` when there is nothing to page through.
    pub fn new(pagination: &Pagination, state: &ListingState) -> Option<Self> {
        if pagination.total_items == 0 {
            return None;
        }

        let current = pagination.current_page;
        let pages = pagination
            .markers()
            .into_iter()
            .map(|marker| match marker {
                PageMarker::Page(n) => PageLinkView {
                    label: n.to_string(),
                    href: Some(state.with_page(n).href()),
                    current: n == current,
                },
                PageMarker::Ellipsis => PageLinkView {
                    label: marker.to_string(),
                    href: None,
                    current: false,
                },
            })
            .collect();

        let page_sizes = PAGE_SIZE_OPTIONS
            .iter()
            .map(|&n| LinkView {
                label: n.to_string(),
                href: state.with_per_page(n).href(),
                active: n == pagination.items_per_page,
            })
            .collect();

        let summary = match pagination.item_range() {
            Some((first, last)) => format!(
                "Showing {first}-{last} of {} journeys",
                pagination.total_items
            ),
            None => format!("No journeys on this page ({} total)", pagination.total_items),
        };

        Some(Self {
            prev_href: pagination
                .has_previous()
                .then(|| state.with_page(current - 1).href()),
            next_href: pagination
                .has_next()
                .then(|| state.with_page(current + 1).href()),
            pages,
            page_sizes,
            summary,
        })
    }
}

/// Format `HH:MM[:SS]` as a 12-hour clock time, e.g. "8:30 AM".
///
/// Returns "N/A" for blank or unparseable input.
pub fn format_time(time: &str) -> String {
    let mut parts = time.split(':');
    let (Some(hours), Some(minutes)) = (parts.next(), parts.next()) else {
        return "N/A".to_string();
    };
    let Ok(hour) = hours.trim().parse::<u32>() else {
        return "N/A".to_string();
    };

    let suffix = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hour}:{minutes} {suffix}")
}

/// Format minutes as "3h 15m"; zero means unknown.
pub fn format_duration(total_minutes: u32) -> String {
    if total_minutes == 0 {
        return "N/A".to_string();
    }
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// Amenities shown for a bus type.
pub fn amenities(bus_type: &str) -> Vec<&'static str> {
    let mut list = Vec::with_capacity(4);
    if bus_type == "AC" {
        list.push("Air Conditioning");
    }
    list.extend(["Clean Interior", "Comfortable Seats", "Large Windows"]);
    list
}

/// Journey card in the listing.
#[derive(Debug, Clone)]
pub struct JourneyCardView {
    pub href: String,
    pub operator: String,
    pub bus_type: String,
    pub bus_name: String,
    pub route_name: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
    pub source: String,
    pub destination: String,
    pub fare: String,
    pub days: String,
    pub is_ac: bool,
}

/// Detail page link, with the id escaped as a single path segment.
fn journey_href(id: &str) -> String {
    match Url::parse("http://localhost/journey") {
        Ok(mut url) => {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.push(id);
            }
            url.path().to_string()
        }
        Err(_) => "/journeys".to_string(),
    }
}

impl JourneyCardView {
    pub fn from_journey(journey: &Journey) -> Self {
        Self {
            href: journey_href(&journey.journey_id),
            operator: journey.operator_name.clone(),
            bus_type: journey.bus_type.clone(),
            bus_name: journey.bus_name.clone(),
            route_name: journey.route_name.clone(),
            departure: format_time(&journey.departure_time),
            arrival: format_time(&journey.arrival_time),
            duration: format_duration(journey.total_duration),
            source: journey
                .source_stop()
                .map_or_else(|| "Source".to_string(), |s| s.name.clone()),
            destination: journey
                .destination_stop()
                .map_or_else(|| "Destination".to_string(), |s| s.name.clone()),
            fare: journey.fare.clone(),
            days: journey.days_of_week.join(", "),
            is_ac: journey.bus_type == "AC",
        }
    }
}

/// A stop on the detail page's route timeline.
#[derive(Debug, Clone)]
pub struct RouteStopView {
    pub name: String,
    pub city: String,
    pub arrival: String,
    pub departure: String,
}

/// Journey detail page.
#[derive(Debug, Clone)]
pub struct JourneyDetailView {
    pub card: JourneyCardView,
    pub bus_number: String,
    pub contact_info: String,
    pub distance: String,
    pub valid_from: String,
    pub valid_until: String,
    pub amenities: Vec<&'static str>,
    pub stops: Vec<RouteStopView>,
}

impl JourneyDetailView {
    pub fn from_journey(journey: &Journey) -> Self {
        let mut stops: Vec<&Stop> = journey.stops.iter().collect();
        stops.sort_by_key(|s| s.sequence);

        let stops = stops
            .into_iter()
            .map(|stop| {
                let times = journey.stop_time_for(stop);
                let time = |t: Option<&String>| t.map_or_else(|| "-".to_string(), |t| format_time(t));
                RouteStopView {
                    name: stop.name.clone(),
                    city: stop.city.clone(),
                    arrival: time(times.and_then(|t| t.arrival_time.as_ref())),
                    departure: time(times.and_then(|t| t.departure_time.as_ref())),
                }
            })
            .collect();

        Self {
            card: JourneyCardView::from_journey(journey),
            bus_number: journey.bus_number.clone(),
            contact_info: journey.contact_info.clone(),
            distance: format!("{:.1} km", journey.total_distance),
            valid_from: journey.valid_from.get(..10).unwrap_or("N/A").to_string(),
            valid_until: journey
                .valid_until
                .as_deref()
                .and_then(|u| u.get(..10))
                .unwrap_or("Ongoing")
                .to_string(),
            amenities: amenities(&journey.bus_type),
            stops,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StopTime;

    fn stop(id: &str, name: &str, seq: u32) -> Stop {
        Stop {
            id: id.into(),
            name: name.into(),
            city: name.into(),
            sequence: seq,
            route_stop_id: Some(format!("rs-{id}")),
            ..Default::default()
        }
    }

    #[test]
    fn twelve_hour_times() {
        assert_eq!(format_time("08:30:00"), "8:30 AM");
        assert_eq!(format_time("00:05:00"), "12:05 AM");
        assert_eq!(format_time("12:00:00"), "12:00 PM");
        assert_eq!(format_time("23:59:59"), "11:59 PM");
        assert_eq!(format_time(""), "N/A");
        assert_eq!(format_time("soon"), "N/A");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(195), "3h 15m");
        assert_eq!(format_duration(45), "0h 45m");
        assert_eq!(format_duration(0), "N/A");
    }

    #[test]
    fn ac_buses_list_air_conditioning_first() {
        assert_eq!(amenities("AC")[0], "Air Conditioning");
        assert_eq!(amenities("AC").len(), 4);
        assert!(!amenities("Normal").contains(&"Air Conditioning"));
    }

    #[test]
    fn card_falls_back_to_placeholders() {
        let card = JourneyCardView::from_journey(&Journey {
            journey_id: "j-1".into(),
            ..Default::default()
        });
        assert_eq!(card.href, "/journey/j-1");
        assert_eq!(card.source, "Source");
        assert_eq!(card.destination, "Destination");
        assert_eq!(card.departure, "N/A");
        assert_eq!(card.duration, "N/A");
    }

    #[test]
    fn card_href_escapes_journey_id() {
        let card = JourneyCardView::from_journey(&Journey {
            journey_id: "../stops?limit=1".into(),
            ..Default::default()
        });
        assert_eq!(card.href, "/journey/..%2Fstops%3Flimit=1");
        assert_eq!(journey_href("j 7"), "/journey/j%207");
    }

    #[test]
    fn detail_orders_stops_and_attaches_times() {
        let journey = Journey {
            journey_id: "j-2".into(),
            stops: vec![stop("b", "Kegalle", 2), stop("a", "Colombo", 1), stop("c", "Kandy", 3)],
            stop_times: vec![StopTime {
                id: "t1".into(),
                route_stop_id: "rs-b".into(),
                arrival_time: Some("07:40:00".into()),
                departure_time: Some("07:45:00".into()),
            }],
            valid_from: "2024-01-01T00:00:00Z".into(),
            ..Default::default()
        };

        let detail = JourneyDetailView::from_journey(&journey);
        let names: Vec<&str> = detail.stops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Colombo", "Kegalle", "Kandy"]);
        assert_eq!(detail.stops[1].arrival, "7:40 AM");
        assert_eq!(detail.stops[0].arrival, "-");
        assert_eq!(detail.valid_from, "2024-01-01");
        assert_eq!(detail.valid_until, "Ongoing");
    }

    #[test]
    fn filter_links_toggle_one_option() {
        let mut state = ListingState::default().with_page(3);
        state.selection.bus_types = vec!["AC".into()];

        let panel = FilterPanelView::new(&state, &["SLTB".into()], &["AC".into(), "Normal".into()]);
        assert_eq!(panel.selected_count, 1);
        assert!(panel.reset_href.is_some());

        let bus_types = &panel.groups[1].options;
        assert!(bus_types[0].selected);
        assert_eq!(bus_types[0].href, "/journeys");
        assert_eq!(bus_types[1].href, "/journeys?bus_type=AC&bus_type=Normal");

        assert_eq!(panel.groups[2].options.len(), 7);
        assert_eq!(panel.groups[3].options.len(), 4);
    }

    #[test]
    fn sort_links_mark_current_and_keep_page() {
        let state = ListingState::default().with_page(2);
        let links = sort_links(&state);
        assert_eq!(links.len(), 7);
        assert!(links[0].active);
        assert_eq!(links[3].href, "/journeys?sort=fare_desc&page=2");
    }

    #[test]
    fn pagination_hidden_without_results() {
        let state = ListingState::default();
        assert!(PaginationView::new(&Pagination::new(0, 10, 1), &state).is_none());
    }

    #[test]
    fn pagination_links() {
        let state = ListingState::default().with_page(5);
        let view = PaginationView::new(&Pagination::new(95, 10, 5), &state).unwrap();

        assert_eq!(view.prev_href.as_deref(), Some("/journeys?page=4"));
        assert_eq!(view.next_href.as_deref(), Some("/journeys?page=6"));
        assert_eq!(view.summary, "Showing 41-50 of 95 journeys");

        let labels: Vec<&str> = view.pages.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["1", "...", "3", "4", "5", "6", "7", "...", "10"]);
        assert!(view.pages[4].current);
        assert!(view.pages[1].href.is_none());

        let active: Vec<&str> = view
            .page_sizes
            .iter()
            .filter(|l| l.active)
            .map(|l| l.label.as_str())
            .collect();
        assert_eq!(active, vec!["10"]);
    }

    #[test]
    fn last_page_has_no_next() {
        let state = ListingState::default().with_page(10);
        let view = PaginationView::new(&Pagination::new(95, 10, 10), &state).unwrap();
        assert!(view.next_href.is_none());
        assert_eq!(view.summary, "Showing 91-95 of 95 journeys");
    }

    #[test]
    fn search_form_carries_filters_and_sort() {
        let mut state = ListingState {
            from: "Colombo".into(),
            sort: SortOption::parse_key("fare_asc").unwrap(),
            ..Default::default()
        };
        state.selection.days_of_week = vec!["Monday".into()];

        let today = chrono::NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let form = SearchFormView::from_state(&state, today);

        assert_eq!(form.today, "2024-05-06");
        assert_eq!(form.swap_href.as_deref(), Some("/journeys?to=Colombo&day=Monday&sort=fare_asc"));
        assert!(form.hidden.contains(&("day".to_string(), "Monday".to_string())));
        assert!(form.hidden.contains(&("sort".to_string(), "fare_asc".to_string())));
    }

    #[test]
    fn stop_names_sorted_and_unique() {
        let stops = vec![stop("1", "Kandy", 0), stop("2", "Colombo", 0), stop("3", "Kandy", 0)];
        assert_eq!(stop_names(&stops), vec!["Colombo", "Kandy"]);
    }
}
