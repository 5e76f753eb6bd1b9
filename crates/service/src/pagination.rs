//! Pagination utilities for service layer
//!
//! Provides a zero-based `PageRequest` with a closed sort-field set, and the
//! `Page` envelope returned by listings.

use serde::Serialize;

use crate::errors::ServiceError;
use crate::shop::domain::SortField;

/// Upper bound on page size unless configured otherwise.
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl Direction {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending { Direction::Asc } else { Direction::Desc }
    }
}

/// Paging parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// 0-based page index
    pub page: u64,
    /// items per page
    pub size: u64,
    pub sort: SortField,
    pub direction: Direction,
}

impl PageRequest {
    pub fn new(page: u64, size: u64, sort: SortField, ascending: bool) -> Self {
        Self { page, size, sort, direction: Direction::from_ascending(ascending) }
    }

    /// Clamp `size` into `1..=max_size`; fails when the row offset is not addressable.
    pub fn normalize(self, max_size: u64) -> Result<Self, ServiceError> {
        let max_size = max_size.max(1);
        let req = Self { size: self.size.clamp(1, max_size), ..self };
        req.checked_offset()?;
        Ok(req)
    }

    pub fn offset(&self) -> u64 { self.page.saturating_mul(self.size) }

    /// `page * size`, bounded by what a SQL OFFSET (signed 64-bit) can hold.
    pub fn checked_offset(&self) -> Result<u64, ServiceError> {
        self.page
            .checked_mul(self.size)
            .filter(|o| *o <= i64::MAX as u64)
            .ok_or_else(|| ServiceError::Validation(format!("page {} out of range for size {}", self.page, self.size)))
    }
}

impl Default for PageRequest {
    fn default() -> Self { Self { page: 0, size: 10, sort: SortField::Id, direction: Direction::Desc } }
}

/// One page of results plus totals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, req: &PageRequest, total_elements: u64) -> Self {
        let total_pages = if req.size == 0 { 0 } else { total_elements.div_ceil(req.size) };
        Self { content, page: req.page, size: req.size, total_elements, total_pages }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
