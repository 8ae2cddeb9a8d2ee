//! Query composition for the journey listing.
//!
//! Everything here is plain data and pure functions: turning what the user
//! picked in the search form, filter panel, sort menu and pager into the
//! request the backend understands. No I/O happens in this module except
//! through [`JourneySearch::run`].

mod error;
mod filter;
mod orchestrator;
mod params;
mod search;
mod sort;
mod time_window;

pub use error::QueryError;
pub use filter::{FilterCategory, FilterSelection, WEEKDAYS, abbreviate_day, toggle};
pub use orchestrator::{
    FETCH_ERROR_MESSAGE, JourneySearch, PendingRequest, RequestToken, SearchStatus,
};
pub use params::{
    FilterParams, JourneyQuery, ScheduleQuery, SearchParams, format_date, parse_date,
};
pub use search::{SearchForm, StopRef, matching_stops};
pub use sort::{SortField, SortOption, SortOrder};
pub use time_window::{TimeRange, TimeWindow, merge_windows, time_window_to_range};
