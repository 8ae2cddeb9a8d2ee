//! Coarse time-of-day windows used by the departure/arrival filters.
//!
//! The filter UI offers four fixed 6-hour buckets. The backend only
//! understands `HH:MM:SS` bounds, so each bucket translates to a literal
//! `from`/`to` pair. All bounds are zero-padded 24-hour strings, which makes
//! lexicographic order and chronological order the same thing.

use std::fmt;

/// A `from`/`to` pair of `HH:MM:SS` strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

impl TimeRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// True for the `{"", ""}` range returned for unknown labels.
    pub fn is_empty(&self) -> bool {
        self.from.is_empty() && self.to.is_empty()
    }
}

/// One of the four fixed 6-hour buckets of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeWindow {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl TimeWindow {
    /// All windows in display order.
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::Night,
        TimeWindow::Morning,
        TimeWindow::Afternoon,
        TimeWindow::Evening,
    ];

    /// Parse a display label such as `"6 AM - 12 PM"`.
    ///
    /// Matching is exact; the labels are also the values submitted by the
    /// filter form.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.label() == label)
    }

    /// The human label shown in the filter panel.
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Night => "12 AM - 6 AM",
            TimeWindow::Morning => "6 AM - 12 PM",
            TimeWindow::Afternoon => "12 PM - 6 PM",
            TimeWindow::Evening => "6 PM - 12 AM",
        }
    }

    /// Inclusive start of the window.
    pub fn from(&self) -> &'static str {
        match self {
            TimeWindow::Night => "00:00:00",
            TimeWindow::Morning => "06:00:00",
            TimeWindow::Afternoon => "12:00:00",
            TimeWindow::Evening => "18:00:00",
        }
    }

    /// End of the window. The last window stops one second before midnight.
    pub fn to(&self) -> &'static str {
        match self {
            TimeWindow::Night => "06:00:00",
            TimeWindow::Morning => "12:00:00",
            TimeWindow::Afternoon => "18:00:00",
            TimeWindow::Evening => "23:59:59",
        }
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.from(), self.to())
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Translate a window label into its time range.
///
/// Unknown labels yield an empty range rather than an error.
pub fn time_window_to_range(label: &str) -> TimeRange {
    TimeWindow::parse(label)
        .map(|w| w.range())
        .unwrap_or_default()
}

/// Merge several window labels into one earliest-start to latest-end range.
///
/// Returns `None` when `labels` is empty. Unknown labels contribute their
/// empty bounds, which sort first, so callers should only pass labels that
/// came from [`TimeWindow::label`].
pub fn merge_windows<S: AsRef<str>>(labels: &[S]) -> Option<TimeRange> {
    let ranges: Vec<TimeRange> = labels
        .iter()
        .map(|l| time_window_to_range(l.as_ref()))
        .collect();

    let from = ranges.iter().map(|r| r.from.as_str()).min()?;
    let to = ranges.iter().map(|r| r.to.as_str()).max()?;

    Some(TimeRange::new(from, to))
}
