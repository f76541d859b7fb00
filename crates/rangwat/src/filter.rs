//! Admin filters and the public lookup query

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::survey::SurveyRequest;
use crate::text::{contains_ignore_case, normalize_text};

/// Status value that disables status filtering
pub const ALL_STATUSES: &str = "all";

/// Filter applied to admin listings and exports
///
/// Empty fields do not filter. Deserializes from the export query string
/// (`search`, `status`, `dateFrom`, `dateTo`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurveyFilter {
    /// Case-insensitive text searched in request number, applicant,
    /// surveyor and status
    pub search: String,
    /// Exact status, or `"all"`
    pub status: String,
    /// Earliest appointment date (inclusive)
    pub date_from: Option<NaiveDate>,
    /// Latest appointment date (inclusive)
    pub date_to: Option<NaiveDate>,
}

impl SurveyFilter {
    /// Filter that accepts every request
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search<S: Into<String>>(mut self, search: S) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_status<S: Into<String>>(mut self, status: S) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Whether a request passes every active filter
    pub fn matches(&self, request: &SurveyRequest) -> bool {
        self.matches_search(request) && self.matches_status(request) && self.matches_dates(request)
    }

    fn matches_search(&self, request: &SurveyRequest) -> bool {
        let needle = normalize_text(&self.search);
        if needle.is_empty() {
            return true;
        }

        [
            &request.request_number,
            &request.applicant_name,
            &request.surveyor_name,
            &request.status,
        ]
        .iter()
        .any(|field| contains_ignore_case(&normalize_text(field), &needle))
    }

    fn matches_status(&self, request: &SurveyRequest) -> bool {
        self.status.is_empty() || self.status == ALL_STATUSES || request.status == self.status
    }

    fn matches_dates(&self, request: &SurveyRequest) -> bool {
        if self.date_from.is_none() && self.date_to.is_none() {
            return true;
        }

        // Requests without a readable appointment date fall outside any range
        let date = match appointment_date(&request.appointment_date) {
            Some(date) => date,
            None => return false,
        };

        self.date_from.map_or(true, |from| date >= from) && self.date_to.map_or(true, |to| date <= to)
    }
}

/// Appointment date from a `YYYY-MM-DD` value (or a timestamp starting with one)
fn appointment_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Public status lookup: both fields are required
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub request_number: String,
    pub applicant_name: String,
}

impl SearchQuery {
    pub fn new<R: Into<String>, A: Into<String>>(request_number: R, applicant_name: A) -> Self {
        Self {
            request_number: request_number.into(),
            applicant_name: applicant_name.into(),
        }
    }

    /// Normalize both fields and check that neither is empty
    pub fn validate(&self) -> Result<SearchQuery, SearchError> {
        let request_number = normalize_text(&self.request_number);
        if request_number.is_empty() {
            return Err(SearchError::MissingRequestNumber);
        }

        let applicant_name = normalize_text(&self.applicant_name);
        if applicant_name.is_empty() {
            return Err(SearchError::MissingApplicantName);
        }

        Ok(SearchQuery {
            request_number,
            applicant_name,
        })
    }

    /// Whether both fields match as case-insensitive substrings
    pub fn matches(&self, request: &SurveyRequest) -> bool {
        contains_ignore_case(
            &normalize_text(&request.request_number),
            &normalize_text(&self.request_number),
        ) && contains_ignore_case(
            &normalize_text(&request.applicant_name),
            &normalize_text(&self.applicant_name),
        )
    }
}
