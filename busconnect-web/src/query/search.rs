//! Search form state: where from, where to, and when.

use chrono::NaiveDate;

use crate::api::Stop;

use super::params::SearchParams;

/// What the user has put in a "From" or "To" field.
///
/// A stop picked from the directory (or typed with its exact name) is sent
/// by id. Anything else is sent as typed, and the backend matches it as
/// free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StopRef {
    #[default]
    Empty,
    Stop {
        id: String,
        name: String,
    },
    Text(String),
}

impl StopRef {
    /// Resolve typed text against the known stops.
    ///
    /// Stop names are compared case-insensitively. Blank text clears the
    /// field.
    pub fn resolve(text: &str, stops: &[Stop]) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return StopRef::Empty;
        }

        match stops.iter().find(|s| s.name.eq_ignore_ascii_case(text)) {
            Some(stop) => StopRef::from_stop(stop),
            None => StopRef::Text(text.to_string()),
        }
    }

    pub fn from_stop(stop: &Stop) -> Self {
        StopRef::Stop {
            id: stop.id.clone(),
            name: stop.name.clone(),
        }
    }

    /// The value sent to the backend, if any.
    pub fn param(&self) -> Option<String> {
        match self {
            StopRef::Empty => None,
            StopRef::Stop { id, .. } => Some(id.clone()),
            StopRef::Text(text) => Some(text.clone()),
        }
    }

    /// Text shown back in the input.
    pub fn display(&self) -> &str {
        match self {
            StopRef::Empty => "",
            StopRef::Stop { name, .. } => name,
            StopRef::Text(text) => text,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, StopRef::Empty)
    }
}

/// Autocomplete: stops whose name or city contains `query`.
///
/// Matching is case-insensitive; a blank query matches every stop.
pub fn matching_stops<'a>(query: &str, stops: &'a [Stop]) -> Vec<&'a Stop> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return stops.iter().collect();
    }

    stops
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&query) || s.city.to_lowercase().contains(&query)
        })
        .collect()
}

/// State of the search form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub source: StopRef,
    pub destination: StopRef,
    pub date: Option<NaiveDate>,
}

impl SearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_source(&mut self, stop: &Stop) {
        self.source = StopRef::from_stop(stop);
    }

    pub fn select_destination(&mut self, stop: &Stop) {
        self.destination = StopRef::from_stop(stop);
    }

    pub fn type_source(&mut self, text: &str, stops: &[Stop]) {
        self.source = StopRef::resolve(text, stops);
    }

    pub fn type_destination(&mut self, text: &str, stops: &[Stop]) {
        self.destination = StopRef::resolve(text, stops);
    }

    /// Exchange source and destination.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.source, &mut self.destination);
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.set_date(today);
    }

    pub fn clear_date(&mut self) {
        self.date = None;
    }

    /// Package the non-empty fields.
    pub fn params(&self) -> SearchParams {
        SearchParams {
            source: self.source.param(),
            destination: self.destination.param(),
            date: self.date,
        }
    }

    /// Package the non-empty fields and hand them to `on_search`.
    pub fn submit<F>(&self, on_search: F)
    where
        F: FnOnce(SearchParams),
    {
        on_search(self.params());
    }
}
