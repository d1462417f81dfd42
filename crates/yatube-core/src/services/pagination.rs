//! Page arithmetic for listings.
//!
//! Out-of-range page numbers never fail: anything below 1 resolves to the
//! first page and anything past the end resolves to the last one. An empty
//! collection still has a single (empty) page.

use serde::Serialize;

/// Page size used by every listing.
pub const POSTS_PER_PAGE: u64 = 10;

/// Parse a raw `?page=` value. Absent or non-numeric input yields `None`.
pub fn parse_page_number(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse().ok()
}

/// Position of a page inside a collection of `count` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Fixed-size paginator.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: u64,
}

impl Paginator {
    pub fn new(per_page: u64) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> u64 {
        self.per_page
    }

    pub fn num_pages(&self, count: u64) -> u64 {
        count.div_ceil(self.per_page).max(1)
    }

    /// Resolve the requested page number against a collection size.
    pub fn locate(&self, count: u64, requested: Option<i64>) -> PageWindow {
        let num_pages = self.num_pages(count);
        let number = match requested {
            Some(n) if n > num_pages as i64 => num_pages,
            Some(n) if n >= 1 => n as u64,
            _ => 1,
        };
        let offset = (number - 1) * self.per_page;

        PageWindow {
            number,
            num_pages,
            count,
            offset,
            limit: self.per_page.min(count.saturating_sub(offset)),
        }
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(POSTS_PER_PAGE)
    }
}

/// One page of an ordered collection.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub object_list: Vec<T>,
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page_number: Option<u64>,
    pub next_page_number: Option<u64>,
}

impl<T> Page<T> {
    pub fn new(object_list: Vec<T>, window: PageWindow) -> Self {
        let has_previous = window.number > 1;
        let has_next = window.number < window.num_pages;

        Self {
            object_list,
            number: window.number,
            num_pages: window.num_pages,
            count: window.count,
            has_previous,
            has_next,
            previous_page_number: has_previous.then(|| window.number - 1),
            next_page_number: has_next.then(|| window.number + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }
}

/// Slice an in-memory ordered collection into a page.
pub fn paginate<T: Clone>(collection: &[T], page_size: u64, requested: Option<i64>) -> Page<T> {
    let window = Paginator::new(page_size).locate(collection.len() as u64, requested);
    let start = window.offset as usize;
    let end = start + window.limit as usize;

    Page::new(collection[start..end].to_vec(), window)
}
