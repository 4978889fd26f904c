//! Pagination math.
//!
//! Pure window arithmetic over a stably ordered collection; fetching the page
//! itself is the caller's job.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Caller-supplied page coordinates, already normalized.
///
/// Non-positive or unparsable values fall back to the defaults rather than
/// erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: positive_or(page, DEFAULT_PAGE),
            page_size: positive_or(page_size, DEFAULT_PAGE_SIZE),
        }
    }

    /// Normalize raw query-string values (`?page=2&page_size=25`).
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|s| s.trim().parse::<i64>().ok());
        Self::new(parse(page), parse(page_size))
    }
}

fn positive_or(value: Option<i64>, default: u32) -> u32 {
    match value {
        Some(v) if v > 0 => u32::try_from(v).unwrap_or(u32::MAX),
        _ => default,
    }
}

/// Slice coordinates and navigation flags for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Compute the window for `page` of `page_size` over `total_items`.
///
/// `page`/`page_size` of zero fall back to the defaults. An empty collection
/// has zero pages, so both navigation flags are false on page 1. Requesting a
/// page past the end yields an offset beyond the collection (an empty slice),
/// not an error.
pub fn paginate(total_items: u64, page: u32, page_size: u32) -> PageWindow {
    let page = if page == 0 { DEFAULT_PAGE } else { page };
    let page_size = if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size };

    let page = u64::from(page);
    let size = u64::from(page_size);
    let total_pages = total_items.div_ceil(size);

    PageWindow {
        offset: (page - 1).saturating_mul(size),
        limit: size,
        total_pages,
        has_next: page < total_pages,
        has_prev: page > 1,
    }
}

impl PageRequest {
    pub fn window(&self, total_items: u64) -> PageWindow {
        paginate(total_items, self.page, self.page_size)
    }
}

/// Pagination envelope returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let window = request.window(total_items);
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages: window.total_pages,
            has_next: window.has_next,
            has_prev: window.has_prev,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn last_partial_page() {
        let w = paginate(25, 3, 10);
        assert_eq!(w.offset, 20);
        assert_eq!(w.limit, 10);
        assert_eq!(w.total_pages, 3);
        assert!(!w.has_next);
        assert!(w.has_prev);
    }

    #[test]
    fn empty_collection_has_no_pages() {
        let w = paginate(0, 1, 10);
        assert_eq!(w.offset, 0);
        assert_eq!(w.total_pages, 0);
        assert!(!w.has_next);
        assert!(!w.has_prev);
    }

    #[test]
    fn first_of_many() {
        let w = paginate(830, 1, 10);
        assert_eq!(w.offset, 0);
        assert_eq!(w.total_pages, 83);
        assert!(w.has_next);
        assert!(!w.has_prev);
    }

    #[test]
    fn zero_inputs_use_defaults() {
        assert_eq!(paginate(25, 0, 0), paginate(25, 1, 10));
    }

    #[test]
    fn page_past_the_end_is_empty_not_an_error() {
        let w = paginate(25, 9, 10);
        assert_eq!(w.offset, 80);
        assert!(!w.has_next);
        assert!(w.has_prev);
    }

    #[test]
    fn request_falls_back_on_invalid_values() {
        assert_eq!(PageRequest::new(None, None), PageRequest::default());
        assert_eq!(PageRequest::new(Some(-3), Some(0)), PageRequest::default());
        assert_eq!(
            PageRequest::new(Some(4), Some(25)),
            PageRequest { page: 4, page_size: 25 }
        );
        assert_eq!(PageRequest::parse(Some("abc"), Some("")), PageRequest::default());
        assert_eq!(
            PageRequest::parse(Some(" 2 "), Some("5")),
            PageRequest { page: 2, page_size: 5 }
        );
    }

    #[test]
    fn envelope_serializes_with_stable_keys() {
        let page = Paginated::new(vec![1, 2], PageRequest::new(Some(2), Some(2)), 5);
        let value = serde_json::to_value(&page).unwrap();

        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec!["has_next", "has_prev", "items", "page", "page_size", "total_items", "total_pages"]
        );
        assert_eq!(
            value,
            serde_json::json!({
                "items": [1, 2],
                "page": 2,
                "page_size": 2,
                "total_items": 5,
                "total_pages": 3,
                "has_next": true,
                "has_prev": true,
            })
        );
    }

    #[test]
    fn envelope_carries_window_metadata() {
        let req = PageRequest { page: 2, page_size: 2 };
        let page = Paginated::new(vec!["c", "d"], req, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next);
        assert!(page.has_prev);

        let mapped = page.map(str::len);
        assert_eq!(mapped.items, vec![1, 1]);
        assert_eq!(mapped.total_items, 5);
    }

    proptest! {
        /// Property: pages tile the collection exactly once.
        #[test]
        fn pages_tile_the_collection(total in 0u64..5_000, size in 1u32..200) {
            let first = paginate(total, 1, size);
            let mut covered = 0u64;
            for page in 1..=first.total_pages {
                let w = paginate(total, page as u32, size);
                prop_assert_eq!(w.offset, covered);
                covered += w.limit.min(total - w.offset);
                prop_assert_eq!(w.has_next, page < first.total_pages);
                prop_assert_eq!(w.has_prev, page > 1);
            }
            prop_assert_eq!(covered, total);
        }
    }
}
