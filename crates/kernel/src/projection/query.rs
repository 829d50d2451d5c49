//! Listing order, free-text filtering and paging.

use formsmith_sdk::types::Submission;
use serde::{Deserialize, Serialize};

/// Caller-supplied listing parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Free-text filter; blank means no filter.
    #[serde(default)]
    pub q: Option<String>,

    /// Page number (1-indexed).
    #[serde(default)]
    pub page: Option<u32>,

    #[serde(default)]
    pub per_page: Option<u32>,
}

impl ListQuery {
    pub fn search(mut self, q: &str) -> Self {
        self.q = Some(q.to_string());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Trimmed filter text, if any.
    pub fn filter_text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Page number, at least 1.
    pub fn page_number(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size clamped to `[1, max]`, `default` when absent.
    pub fn page_size(&self, default: u32, max: u32) -> u32 {
        self.page_size_within(default, 1, max)
    }

    /// Page size clamped to `[min, max]`, `default` when absent.
    pub fn page_size_within(&self, default: u32, min: u32, max: u32) -> u32 {
        let min = min.max(1);
        let max = max.max(min);
        self.per_page.unwrap_or(default).clamp(min, max)
    }
}

/// Sort newest first. Ties keep their existing order.
pub fn sort_newest_first(submissions: &mut [Submission]) {
    submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Case-insensitive substring match against a submission's stored values.
///
/// Values are joined by spaces in column order, followed by any stored
/// values for ids outside `columns` (retired fields).
pub fn matches_query(columns: &[String], submission: &Submission, query: &str) -> bool {
    let needle = query.to_lowercase();
    let declared = columns.iter().filter_map(|id| submission.fields.get(id));
    let retired = submission
        .fields
        .iter()
        .filter(|(id, _)| !columns.contains(id))
        .map(|(_, value)| value);
    let haystack = declared
        .chain(retired)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    haystack.contains(&needle)
}

/// One page of results plus paging metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Total count before paging.
    pub total: usize,

    /// Current page number (1-indexed).
    pub page: u32,

    pub per_page: u32,

    /// Total number of pages.
    pub pages: u32,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            pages: self.pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Slice `items` into the requested page.
pub fn paginate<T>(items: Vec<T>, page: u32, per_page: u32) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total = items.len();
    let pages = total.div_ceil(per_page as usize) as u32;
    let skip = (page as usize - 1).saturating_mul(per_page as usize);

    Page {
        items: items.into_iter().skip(skip).take(per_page as usize).collect(),
        total,
        page,
        per_page,
        pages,
    }
}
