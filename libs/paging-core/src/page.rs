use serde::{Deserialize, Serialize};

/// Default and upper bound for page sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSizeCfg {
    pub default: u64,
    pub max: u64,
}

impl Default for PageSizeCfg {
    fn default() -> Self {
        Self { default: 5, max: 20 }
    }
}

/// A 1-based page window request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u64,
    pub page_size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::clamped(None, None, PageSizeCfg::default())
    }
}

impl PageRequest {
    pub fn new(page_number: u64, page_size: u64) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Normalize caller input: missing size takes the default, size is kept
    /// in `1..=cfg.max`, and page numbers start at 1.
    pub fn clamped(page_number: Option<u64>, page_size: Option<u64>, cfg: PageSizeCfg) -> Self {
        let mut size = page_size.unwrap_or(cfg.default);
        if size == 0 {
            size = 1;
        }
        if size > cfg.max {
            size = cfg.max;
        }
        Self {
            page_number: page_number.unwrap_or(1).max(1),
            page_size: size,
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        self.page_number
            .saturating_sub(1)
            .saturating_mul(self.page_size)
    }
}

/// `ceil(total_count / page_size)`; a zero page size counts as 1.
pub fn total_pages(total_count: u64, page_size: u64) -> u64 {
    total_count.div_ceil(page_size.max(1))
}

/// One materialized page plus its metadata.
///
/// `total_pages` is derived from `total_count` and `page_size` in
/// [`PagedList::new`] and cannot be set on its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedList<T> {
    items: Vec<T>,
    current_page: u64,
    page_size: u64,
    total_count: u64,
    total_pages: u64,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, current_page: u64, page_size: u64, total_count: u64) -> Self {
        Self {
            items,
            current_page,
            page_size,
            total_count,
            total_pages: total_pages(total_count, page_size),
        }
    }

    /// Empty page for `request` over a result set of `total_count` rows.
    pub fn empty(request: PageRequest, total_count: u64) -> Self {
        Self::new(
            Vec::new(),
            request.page_number,
            request.page_size,
            total_count,
        )
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Map items while preserving the metadata (domain → DTO convenience).
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            page_size: self.page_size,
            total_count: self.total_count,
            total_pages: self.total_pages,
        }
    }

    pub fn metadata(&self) -> PaginationMetadata {
        PaginationMetadata {
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

/// Serializable page metadata, e.g. for an `X-Pagination` response header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: u64,
    pub page_size: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

impl PaginationMetadata {
    pub fn to_header_value(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
