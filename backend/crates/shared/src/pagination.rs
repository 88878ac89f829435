//! Page-number pagination
//!
//! Page numbers arrive as raw query strings. Anything that is not an
//! integer resolves to the first page, numbers outside the valid range
//! resolve to the last page, and an empty result set still has one
//! (empty) page.

use serde::Serialize;

/// Reserved `page` value that disables pagination
pub const SHOW_ALL: &str = "all";

/// True when the raw page parameter asks for everything
pub fn is_show_all(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case(SHOW_ALL)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: u64,
    per_page: u64,
}

impl Paginator {
    /// `per_page` of zero is treated as one
    pub fn new(count: u64, per_page: u64) -> Self {
        Self {
            count,
            per_page: per_page.max(1),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn num_pages(&self) -> u64 {
        if self.count == 0 {
            1
        } else {
            self.count.div_ceil(self.per_page)
        }
    }

    /// Resolve a raw page parameter to a valid page
    pub fn get_page(&self, raw: &str) -> Page {
        let last = self.num_pages();
        let number = match raw.trim().parse::<i64>() {
            Err(_) => 1,
            Ok(n) if n < 1 => last,
            Ok(n) if n as u64 > last => last,
            Ok(n) => n as u64,
        };
        self.page(number)
    }

    fn page(&self, number: u64) -> Page {
        let offset = (number - 1) * self.per_page;
        let limit = self.per_page.min(self.count.saturating_sub(offset));
        Page {
            number,
            num_pages: self.num_pages(),
            count: self.count,
            offset,
            limit,
        }
    }
}

/// One resolved page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub number: u64,
    pub num_pages: u64,
    pub count: u64,
    /// Rows to skip
    pub offset: u64,
    /// Rows on this page
    pub limit: u64,
}

impl Page {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_other_pages(&self) -> bool {
        self.has_next() || self.has_previous()
    }
}
