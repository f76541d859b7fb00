//! Paged admin listings of requests and search logs

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::filter::ALL_STATUSES;
use crate::survey::{SearchLog, SurveyRequest};
use crate::text::{contains_ignore_case, normalize_text};

/// Largest page of search logs served at once
pub const MAX_LOG_PAGE: u32 = 100;

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
    /// Items across all pages
    pub total: usize,
    pub pages: usize,
}

impl<T> Page<T> {
    /// Cut page `page` (1-based) of `limit` items out of `items`
    ///
    /// Page and limit below 1 are raised to 1.
    pub fn paginate(items: Vec<T>, page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total = items.len();
        let pages = (total + limit as usize - 1) / limit as usize;

        let offset = (page as usize - 1).saturating_mul(limit as usize);
        let data = items.into_iter().skip(offset).take(limit as usize).collect();

        Page {
            data,
            page,
            limit,
            total,
            pages,
        }
    }

    pub fn has_next(&self) -> bool {
        (self.page as usize) < self.pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Admin request listing: newest first, 10 per page by default
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    /// Matched against request number and applicant name
    pub search: String,
    /// Exact status; empty or `"all"` lists every status
    pub status: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            search: String::new(),
            status: String::new(),
        }
    }
}

impl ListQuery {
    pub fn matches(&self, request: &SurveyRequest) -> bool {
        let needle = normalize_text(&self.search);
        let search_ok = needle.is_empty()
            || contains_ignore_case(&request.request_number, &needle)
            || contains_ignore_case(&request.applicant_name, &needle);
        let status_ok =
            self.status.is_empty() || self.status == ALL_STATUSES || request.status == self.status;
        search_ok && status_ok
    }
}

/// Search log listing: newest first, 50 per page by default, at most 100
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogQuery {
    pub page: u32,
    pub limit: u32,
    /// First day included, in the display offset
    pub date_from: Option<NaiveDate>,
    /// Last day included, in the display offset
    pub date_to: Option<NaiveDate>,
    /// Matched against the queried request number, applicant name and IP
    pub search: String,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 50,
            date_from: None,
            date_to: None,
            search: String::new(),
        }
    }
}

impl LogQuery {
    /// Page size after applying the cap
    pub fn effective_limit(&self) -> u32 {
        self.limit.min(MAX_LOG_PAGE)
    }

    pub fn matches(&self, log: &SearchLog, offset: FixedOffset) -> bool {
        let day = log.created_at.with_timezone(&offset).date_naive();
        if self.date_from.map_or(false, |from| day < from) {
            return false;
        }
        if self.date_to.map_or(false, |to| day > to) {
            return false;
        }

        let needle = normalize_text(&self.search);
        needle.is_empty()
            || contains_ignore_case(&log.search_query.request_number, &needle)
            || contains_ignore_case(&log.search_query.applicant_name, &needle)
            || contains_ignore_case(&log.ip_address, &needle)
    }
}

/// Sort key for stored timestamps; unreadable values sort last when newest-first
pub(crate) fn timestamp_key(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%#z"))
        .ok()
}
