//! Offset/limit pagination for list endpoints.

use serde::Serialize;

/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Normalize raw values: page < 1 becomes 1, a zero or missing limit
    /// becomes `default_limit`, and limits are capped at [`MAX_LIMIT`].
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(1);
        let limit = limit
            .filter(|l| *l >= 1)
            .unwrap_or(default_limit)
            .clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    /// Lenient variant for raw query-string values; unparseable input falls
    /// back to the defaults.
    pub fn parse(page: Option<&str>, limit: Option<&str>, default_limit: u32) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|s| s.trim().parse::<u32>().ok());
        Self::new(parse(page), parse(limit), default_limit)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.limit as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub pages: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Page<T> {
    /// Slice `[(page-1)*limit, page*limit)` out of an already ordered list.
    pub fn from_items(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len();
        let limit = request.limit as usize;
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(limit)
            .collect();

        Self {
            items,
            pagination: PaginationMeta {
                total,
                page: request.page,
                limit: request.limit,
                pages: total.div_ceil(limit),
            },
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
