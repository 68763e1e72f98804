//! Fixed-size pagination over a result set.
//!
//! Pages are 1-indexed. Navigation saturates into `[1, total_pages]` and never
//! fails; an empty result set still has one (empty) page.

use std::ops::Range;

pub const MIN_PAGE_SIZE: usize = 5;
pub const MAX_PAGE_SIZE: usize = 50;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Rows the browse screen spends on everything but table rows
const CHROME_ROWS: u16 = 12;

/// One entry of the page-link strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    total_items: usize,
    current: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    /// Create a pager; the size is clamped to the supported range
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
            total_items: 0,
            current: 1,
        }
    }

    /// Derive the page size from the terminal height
    pub fn from_display_rows(rows: u16) -> Self {
        Self::new(usize::from(rows.saturating_sub(CHROME_ROWS)))
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Replace the result-set size; always returns to page 1
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current = 1;
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size).max(1)
    }

    pub fn current_page(&self) -> usize {
        self.current
    }

    /// Offsets shown on the current page
    pub fn visible_range(&self) -> Range<usize> {
        let start = ((self.current - 1) * self.page_size).min(self.total_items);
        let end = (start + self.page_size).min(self.total_items);
        start..end
    }

    /// The current page's slice of `items`
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.visible_range();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }

    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    pub fn is_last(&self) -> bool {
        self.current == self.total_pages()
    }

    pub fn previous(&mut self) {
        self.go_to(self.current.saturating_sub(1));
    }

    pub fn next(&mut self) {
        self.go_to(self.current.saturating_add(1));
    }

    pub fn first(&mut self) {
        self.current = 1;
    }

    pub fn last(&mut self) {
        self.current = self.total_pages();
    }

    /// Jump to `page`, saturating into the valid range
    pub fn go_to(&mut self, page: usize) {
        self.current = page.clamp(1, self.total_pages());
    }

    /// Page links to display: first, last and the neighbours of the current
    /// page, with an ellipsis standing in for each hidden run.
    pub fn page_window(&self) -> Vec<PageLink> {
        let total = self.total_pages();
        let mut links = Vec::new();
        let mut previous = 0;
        for page in 1..=total {
            let shown = page == 1 || page == total || page.abs_diff(self.current) <= 1;
            if !shown {
                continue;
            }
            if page > previous + 1 {
                links.push(PageLink::Ellipsis);
            }
            links.push(PageLink::Page(page));
            previous = page;
        }
        links
    }

    /// `(first, last, total)` as 1-based item numbers, `None` when empty
    pub fn showing(&self) -> Option<(usize, usize, usize)> {
        let range = self.visible_range();
        if range.is_empty() {
            None
        } else {
            Some((range.start + 1, range.end, self.total_items))
        }
    }
}
