//! Page-number window for the journey listing.
//!
//! At most five consecutive page numbers are shown around the current page.
//! The first and last pages are always reachable; an ellipsis marks any gap
//! between them and the window.

use std::fmt;

/// Width of the window of consecutive page numbers.
pub const MAX_PAGES_SHOWN: usize = 5;

/// Choices offered by the items-per-page selector.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [1, 5, 10, 20, 50];

/// Items per page before the backend has echoed its own limit.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// One entry in the page navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageMarker::Page(n) => write!(f, "{n}"),
            PageMarker::Ellipsis => f.write_str("..."),
        }
    }
}

/// Paging position within a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub total_items: usize,
    pub items_per_page: usize,
    /// 1-based.
    pub current_page: usize,
}

impl Pagination {
    /// Zero page sizes and page numbers are bumped to 1.
    pub fn new(total_items: usize, items_per_page: usize, current_page: usize) -> Self {
        Self {
            total_items,
            items_per_page: items_per_page.max(1),
            current_page: current_page.max(1),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.items_per_page)
    }

    /// Number of items to skip for the current page, or `None` when it
    /// does not fit in a `usize`.
    pub fn offset(&self) -> Option<usize> {
        (self.current_page - 1).checked_mul(self.items_per_page)
    }

    /// Previous-page control is enabled everywhere except page 1.
    pub fn has_previous(&self) -> bool {
        self.current_page != 1
    }

    /// Next-page control is enabled everywhere except the last page.
    pub fn has_next(&self) -> bool {
        self.current_page != self.total_pages()
    }

    /// 1-based positions of the first and last item on this page, or `None`
    /// when the page is empty.
    pub fn item_range(&self) -> Option<(usize, usize)> {
        let offset = self.offset()?;
        if offset >= self.total_items {
            return None;
        }
        let last = offset.saturating_add(self.items_per_page).min(self.total_items);
        Some((offset + 1, last))
    }

    /// Page numbers and ellipses to render, in order.
    pub fn markers(&self) -> Vec<PageMarker> {
        let total_pages = self.total_pages();

        if total_pages <= MAX_PAGES_SHOWN {
            return (1..=total_pages).map(PageMarker::Page).collect();
        }

        let current = self.current_page.min(total_pages);
        let mut start = current.saturating_sub(2).max(1);
        let end = (start + MAX_PAGES_SHOWN - 1).min(total_pages);

        // Near the end the window would be short; slide it back.
        if end - start < MAX_PAGES_SHOWN - 1 {
            start = end.saturating_sub(MAX_PAGES_SHOWN - 1).max(1);
        }

        let mut markers = Vec::with_capacity(MAX_PAGES_SHOWN + 4);

        if start > 1 {
            markers.push(PageMarker::Page(1));
            if start > 2 {
                markers.push(PageMarker::Ellipsis);
            }
        }

        markers.extend((start..=end).map(PageMarker::Page));

        if end < total_pages {
            if end < total_pages - 1 {
                markers.push(PageMarker::Ellipsis);
            }
            markers.push(PageMarker::Page(total_pages));
        }

        markers
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn numbers(markers: &[PageMarker]) -> Vec<usize> {
        markers
            .iter()
            .filter_map(|m| match m {
                PageMarker::Page(n) => Some(*n),
                PageMarker::Ellipsis => None,
            })
            .collect()
    }

    proptest! {
        #[test]
        fn markers_are_strictly_increasing(total in 0usize..500, per in 1usize..50, page in 1usize..60) {
            let p = Pagination::new(total, per, page);
            let nums = numbers(&p.markers());
            prop_assert!(nums.windows(2).all(|w| w[0] < w[1]));
        }

        #[test]
        fn first_and_last_always_present(total in 1usize..500, per in 1usize..50, page_seed in 0usize..1000) {
            let p0 = Pagination::new(total, per, 1);
            let page = page_seed % p0.total_pages() + 1;
            let p = Pagination::new(total, per, page);
            let nums = numbers(&p.markers());
            prop_assert_eq!(nums.first().copied(), Some(1));
            prop_assert_eq!(nums.last().copied(), Some(p.total_pages()));
            prop_assert!(nums.contains(&page));
        }

        #[test]
        fn window_is_bounded(total in 0usize..500, per in 1usize..50, page in 1usize..60) {
            let markers = Pagination::new(total, per, page).markers();
            let ellipses = markers.iter().filter(|m| **m == PageMarker::Ellipsis).count();
            prop_assert!(ellipses <= 2);
            prop_assert!(numbers(&markers).len() <= MAX_PAGES_SHOWN + 2);
        }

        #[test]
        fn ellipsis_only_marks_real_gaps(total in 0usize..500, per in 1usize..50, page in 1usize..60) {
            let markers = Pagination::new(total, per, page).markers();
            for (i, m) in markers.iter().enumerate() {
                if *m == PageMarker::Ellipsis {
                    if let (PageMarker::Page(a), PageMarker::Page(b)) = (markers[i - 1], markers[i + 1]) {
                        prop_assert!(b > a + 1);
                    } else {
                        prop_assert!(false, "ellipsis must sit between two pages");
                    }
                }
            }
        }
    }
}
