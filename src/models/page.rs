//! Shared pagination contract for catalog searches
//!
//! Every list endpoint speaks the same language: an optional free-text
//! `term` plus optional `page`/`pageSize`/`sortBy`/`sortDirection`
//! parameters. `QueryPlan` turns one set of parameters into the query the
//! storage layer should run, and `Listing` carries the matching response
//! shape back out: a plain array when no paging was requested, a `Page`
//! envelope when it was.

use serde::{Deserialize, Serialize};

/// Sort direction for paged queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parse a client-supplied direction. Case-insensitive; anything that
    /// is not "desc" means ascending.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    /// The SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Allow-list of sortable columns for one entity.
///
/// Maps client-facing sort keys to the SQL identifiers the repository may
/// interpolate. Client input never reaches the query text directly: a key
/// either resolves to one of these identifiers or falls back to the
/// entity's default column.
#[derive(Debug, Clone, Copy)]
pub struct SortColumns {
    columns: &'static [(&'static str, &'static str)],
    default: &'static str,
}

impl SortColumns {
    /// Create an allow-list from (client key, SQL column) pairs plus the
    /// default SQL column used when no key matches.
    pub const fn new(
        columns: &'static [(&'static str, &'static str)],
        default: &'static str,
    ) -> Self {
        Self { columns, default }
    }

    /// Resolve a requested sort key to a safe SQL column identifier.
    /// Unknown or absent keys resolve to the default column.
    pub fn resolve(&self, requested: Option<&str>) -> &'static str {
        match requested {
            Some(key) => self
                .columns
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, column)| *column)
                .unwrap_or(self.default),
            None => self.default,
        }
    }
}

/// Error for page parameters that violate the contract
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageParamsError {
    #[error("page must be at least 1")]
    InvalidPageNumber,
    #[error("pageSize must be at least 1")]
    InvalidPageSize,
}

/// A validated page request.
///
/// Construction is the only way to obtain one, so holders can rely on
/// `page_number >= 1`, `page_size >= 1`, and `sort_by` being an
/// allow-listed column identifier.
#[derive(Debug, Clone)]
pub struct PageOptions {
    page_number: u32,
    page_size: u32,
    sort_by: &'static str,
    sort_direction: SortDirection,
}

impl PageOptions {
    /// Validate raw page parameters against the contract and the entity's
    /// sortable columns.
    pub fn new(
        page_number: u32,
        page_size: u32,
        sort_by: Option<&str>,
        sort_direction: SortDirection,
        columns: &SortColumns,
    ) -> Result<Self, PageParamsError> {
        if page_number < 1 {
            return Err(PageParamsError::InvalidPageNumber);
        }
        if page_size < 1 {
            return Err(PageParamsError::InvalidPageSize);
        }
        Ok(Self {
            page_number,
            page_size,
            sort_by: columns.resolve(sort_by),
            sort_direction,
        })
    }

    /// Page number (1-indexed)
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Number of items per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The resolved SQL sort column
    pub fn sort_by(&self) -> &'static str {
        self.sort_by
    }

    /// Sort direction
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Calculate the offset for database queries
    pub fn offset(&self) -> i64 {
        (self.page_number as i64 - 1) * self.page_size as i64
    }

    /// Get the limit for database queries
    pub fn limit(&self) -> i64 {
        self.page_size as i64
    }
}

/// Raw search parameters as they arrive on a list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParams {
    pub term: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

/// The query a set of search parameters asks the storage layer to run
#[derive(Debug, Clone)]
pub enum QueryPlan {
    /// No term and no paging: the full collection in default order
    Full,
    /// A term but no paging: the filtered collection in default order
    Filtered(String),
    /// Paging requested: a bounded, sorted, optionally filtered page
    Paged {
        term: Option<String>,
        options: PageOptions,
    },
}

impl QueryPlan {
    /// Decide which query shape a request gets.
    ///
    /// Presence of `page` and/or `pageSize` switches to the paged shape
    /// with defaults (page 1, pageSize 10, default sort, ascending) for
    /// whatever was left out. A blank term counts as no term, and sort
    /// parameters alone never trigger pagination.
    pub fn from_params(
        params: &SearchParams,
        columns: &SortColumns,
    ) -> Result<Self, PageParamsError> {
        let term = params
            .term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from);

        if params.page.is_none() && params.page_size.is_none() {
            return Ok(match term {
                Some(term) => QueryPlan::Filtered(term),
                None => QueryPlan::Full,
            });
        }

        let options = PageOptions::new(
            params.page.unwrap_or(1),
            params.page_size.unwrap_or(10),
            params.sort_by.as_deref(),
            SortDirection::parse(params.sort_direction.as_deref()),
            columns,
        )?;

        Ok(QueryPlan::Paged { term, options })
    }
}

/// One page of results plus navigation metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Current page number (1-indexed)
    pub page_number: u32,
    /// Number of items per page
    pub page_size: u32,
    /// Total number of pages
    pub total_pages: u32,
    /// Total number of items across all pages
    pub total_count: i64,
    /// Items in the current page
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Assemble a page from one result window and the matching total count.
    ///
    /// `total_pages` is the ceiling of `total_count / page_size`; an empty
    /// collection yields zero pages.
    pub fn new(items: Vec<T>, total_count: i64, options: &PageOptions) -> Self {
        let page_size = options.page_size();
        let total_pages = if total_count <= 0 {
            0
        } else {
            ((total_count + page_size as i64 - 1) / page_size as i64) as u32
        };

        Self {
            page_number: options.page_number(),
            page_size,
            total_pages,
            total_count,
            items,
        }
    }

    /// Map the items into another type, keeping the page metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            total_count: self.total_count,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

/// Outcome of a catalog search: a plain list or a full page.
///
/// Serializes untagged, so clients receive either a bare JSON array or the
/// page envelope. The two shapes are never mixed.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Plain(Vec<T>),
    Paged(Page<T>),
}

impl<T> Listing<T> {
    /// Map the contained items into another type, keeping the shape
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Listing<U> {
        match self {
            Listing::Plain(items) => Listing::Plain(items.into_iter().map(&mut f).collect()),
            Listing::Paged(page) => Listing::Paged(page.map(f)),
        }
    }
}
