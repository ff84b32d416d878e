//! View derivation: search, filter, sort and pagination.
//!
//! A [`View`] is a disposable projection of the record set. It borrows the
//! records it was derived from and is recomputed on every parameter or
//! record-set change, so it never needs invalidation.
//!
//! Free-text search and the structured major filter + sort are two exclusive
//! modes: a non-empty search query selects matching records from the full
//! record set, in record-set order, ignoring `filter_major` and `sort`.

use crate::{error::Result, Error, SortKey, Student};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort key plus direction, written as `name_asc`, `major_desc`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn asc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Asc)
    }

    pub fn desc(key: SortKey) -> Self {
        Self::new(key, SortDirection::Desc)
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}_{}", self.key, dir)
    }
}

impl FromStr for SortSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (key, dir) = s
            .trim()
            .rsplit_once('_')
            .ok_or_else(|| Error::InvalidSortSpec(s.to_string()))?;
        let key = key
            .parse::<SortKey>()
            .map_err(|_| Error::InvalidSortSpec(s.to_string()))?;
        let direction = match dir.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(Error::InvalidSortSpec(s.to_string())),
        };
        Ok(Self { key, direction })
    }
}

/// User-controlled parameters that drive derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewParams {
    /// Case-insensitive substring over name, email and major
    pub search_query: String,
    /// Exact, case-sensitive major filter; `None` shows every major
    pub filter_major: Option<String>,
    pub sort: SortSpec,
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            filter_major: None,
            sort: SortSpec::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ViewParams {
    /// Params with a given page size and everything else defaulted.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// The normalized search needle, or `None` when search is inactive.
    pub fn search_needle(&self) -> Option<String> {
        let needle = self.search_query.trim();
        if needle.is_empty() {
            None
        } else {
            Some(needle.to_lowercase())
        }
    }
}

/// Result of deriving a view.
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    /// Every record that survives search or filter + sort, in display order
    pub filtered: Vec<&'a Student>,
    /// The window of `filtered` for the current page
    pub page_slice: Vec<&'a Student>,
    /// Page number after clamping
    pub page: usize,
    pub total_pages: usize,
}

/// Number of pages needed for `len` rows; never less than one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a requested page into `[1, total]`.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// Derive the filtered list and current page from records and params.
///
/// Pure: the same inputs always produce the same output.
pub fn derive<'a>(records: &'a [Student], params: &ViewParams) -> View<'a> {
    let filtered = match params.search_needle() {
        Some(needle) => search(records, &needle),
        None => filter_and_sort(records, params),
    };

    let page_size = params.page_size.max(1);
    let total = total_pages(filtered.len(), page_size);
    let page = clamp_page(params.page, total);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(filtered.len());
    let page_slice = filtered
        .get(start..end)
        .map(|slice| slice.to_vec())
        .unwrap_or_default();

    View {
        filtered,
        page_slice,
        page,
        total_pages: total,
    }
}

fn search<'a>(records: &'a [Student], needle: &str) -> Vec<&'a Student> {
    records
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(needle)
                || s.email.to_lowercase().contains(needle)
                || s.major.to_lowercase().contains(needle)
        })
        .collect()
}

fn filter_and_sort<'a>(records: &'a [Student], params: &ViewParams) -> Vec<&'a Student> {
    let mut out: Vec<&Student> = match &params.filter_major {
        Some(major) => records.iter().filter(|s| &s.major == major).collect(),
        None => records.iter().collect(),
    };

    // Both sorts are stable, so ties keep record-set order in either direction.
    let key = params.sort.key;
    match params.sort.direction {
        SortDirection::Asc => out.sort_by_cached_key(|s| s.field(key).to_lowercase()),
        SortDirection::Desc => out.sort_by_cached_key(|s| Reverse(s.field(key).to_lowercase())),
    }
    out
}
