//! Store access, authentication and the export/search entry points

use std::io::Read;

use ahash::{AHashMap, AHashSet};
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, SearchError, StoreError};
use crate::export::{build_export, ExportFile, ExportFormat, ExportOptions};
use crate::filter::{SearchQuery, SurveyFilter};
use crate::listing::{timestamp_key, ListQuery, LogQuery, Page};
use crate::stats::SurveyStats;
use crate::survey::{SearchLog, SurveyInput, SurveyRequest, UploadRow};

/// Storage for survey requests and the search log
pub trait SurveyStore {
    /// Requests passing `filter`, ordered by order number
    fn query(&self, filter: &SurveyFilter) -> Result<Vec<SurveyRequest>, StoreError>;

    /// The request matching `query`, if exactly one does
    fn find(&self, query: &SearchQuery) -> Result<Option<SurveyRequest>, StoreError>;

    /// One page of requests matching `query`, newest first
    fn list(&self, query: &ListQuery) -> Result<Page<SurveyRequest>, StoreError>;

    fn get(&self, id: &str) -> Result<Option<SurveyRequest>, StoreError>;

    /// Store a new request; fails with `Duplicate` if its request number is taken
    fn insert(&mut self, row: UploadRow, now: DateTime<Utc>) -> Result<SurveyRequest, StoreError>;

    /// Apply the present fields of `input` and stamp `updated_at`
    fn update(
        &mut self,
        id: &str,
        input: &SurveyInput,
        now: DateTime<Utc>,
    ) -> Result<SurveyRequest, StoreError>;

    /// Remove a request, returning it
    fn delete(&mut self, id: &str) -> Result<SurveyRequest, StoreError>;

    /// Swap every stored request for `rows`, returning how many were stored
    ///
    /// On error the stored requests are left as they were.
    fn replace_all(&mut self, rows: Vec<UploadRow>, now: DateTime<Utc>)
        -> Result<usize, StoreError>;

    /// Record one public lookup
    fn log_search(
        &mut self,
        query: &SearchQuery,
        client_ip: &str,
        found: bool,
        now: DateTime<Utc>,
    ) -> Result<SearchLog, StoreError>;

    /// One page of search logs, newest first; days are read at `offset`
    fn search_logs(
        &self,
        query: &LogQuery,
        offset: FixedOffset,
    ) -> Result<Page<SearchLog>, StoreError>;

    /// Dashboard figures at `now`
    fn stats(&self, now: DateTime<Utc>, offset: FixedOffset) -> Result<SurveyStats, StoreError>;
}

/// In-memory store, loaded from a JSON array of requests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    requests: Vec<SurveyRequest>,
    search_logs: Vec<SearchLog>,
    next_id: u64,
}

impl MemoryStore {
    pub fn new(requests: Vec<SurveyRequest>) -> Self {
        Self {
            requests,
            ..Self::default()
        }
    }

    /// Load requests from JSON (an array of request objects)
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, StoreError> {
        let requests: Vec<SurveyRequest> = serde_json::from_reader(reader)
            .map_err(|e| StoreError::new(format!("invalid request data: {}", e)))?;
        Ok(Self::new(requests))
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[SurveyRequest] {
        &self.requests
    }

    /// Every recorded lookup, oldest first
    pub fn search_log_entries(&self) -> &[SearchLog] {
        &self.search_logs
    }

    fn next_id(&mut self, prefix: &str) -> String {
        loop {
            self.next_id += 1;
            let id = format!("{}-{}", prefix, self.next_id);
            let taken = self.requests.iter().any(|r| r.id == id)
                || self.search_logs.iter().any(|l| l.id == id);
            if !taken {
                return id;
            }
        }
    }

    fn new_request(&mut self, row: UploadRow, stamp: &str) -> SurveyRequest {
        SurveyRequest {
            id: self.next_id("sr"),
            order_number: row.order_number,
            request_number: row.request_number,
            applicant_name: row.applicant_name,
            days_pending: row.days_pending,
            surveyor_name: row.surveyor_name,
            survey_type: row.survey_type,
            appointment_date: row.appointment_date,
            status: row.status,
            created_at: stamp.to_string(),
            updated_at: stamp.to_string(),
        }
    }

    fn position(&self, id: &str) -> Result<usize, StoreError> {
        self.requests
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

fn stamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl SurveyStore for MemoryStore {
    fn query(&self, filter: &SurveyFilter) -> Result<Vec<SurveyRequest>, StoreError> {
        let mut matched: Vec<SurveyRequest> = self
            .requests
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matched.sort_by_key(|r| r.order_number);
        Ok(matched)
    }

    fn find(&self, query: &SearchQuery) -> Result<Option<SurveyRequest>, StoreError> {
        let mut matches = self.requests.iter().filter(|r| query.matches(r));
        match (matches.next(), matches.next()) {
            (Some(found), None) => Ok(Some(found.clone())),
            _ => Ok(None),
        }
    }

    fn list(&self, query: &ListQuery) -> Result<Page<SurveyRequest>, StoreError> {
        let mut matched: Vec<SurveyRequest> = self
            .requests
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| timestamp_key(&b.created_at).cmp(&timestamp_key(&a.created_at)));
        Ok(Page::paginate(matched, query.page, query.limit))
    }

    fn get(&self, id: &str) -> Result<Option<SurveyRequest>, StoreError> {
        Ok(self.requests.iter().find(|r| r.id == id).cloned())
    }

    fn insert(&mut self, row: UploadRow, now: DateTime<Utc>) -> Result<SurveyRequest, StoreError> {
        if self
            .requests
            .iter()
            .any(|r| r.request_number == row.request_number)
        {
            return Err(StoreError::Duplicate(row.request_number));
        }

        let request = self.new_request(row, &stamp(now));
        self.requests.push(request.clone());
        Ok(request)
    }

    fn update(
        &mut self,
        id: &str,
        input: &SurveyInput,
        now: DateTime<Utc>,
    ) -> Result<SurveyRequest, StoreError> {
        let index = self.position(id)?;
        if let Some(number) = &input.request_number {
            if self
                .requests
                .iter()
                .any(|r| r.id != id && &r.request_number == number)
            {
                return Err(StoreError::Duplicate(number.clone()));
            }
        }

        let request = &mut self.requests[index];
        input.apply(request);
        request.updated_at = stamp(now);
        Ok(request.clone())
    }

    fn delete(&mut self, id: &str) -> Result<SurveyRequest, StoreError> {
        let index = self.position(id)?;
        Ok(self.requests.remove(index))
    }

    fn replace_all(
        &mut self,
        rows: Vec<UploadRow>,
        now: DateTime<Utc>,
    ) -> Result<usize, StoreError> {
        {
            let mut seen = AHashSet::with_capacity(rows.len());
            if let Some(dup) = rows
                .iter()
                .find(|row| !seen.insert(row.request_number.as_str()))
            {
                return Err(StoreError::Duplicate(dup.request_number.clone()));
            }
        }

        let stamp = stamp(now);
        self.requests.clear();
        for row in rows {
            let request = self.new_request(row, &stamp);
            self.requests.push(request);
        }
        Ok(self.requests.len())
    }

    fn log_search(
        &mut self,
        query: &SearchQuery,
        client_ip: &str,
        found: bool,
        now: DateTime<Utc>,
    ) -> Result<SearchLog, StoreError> {
        let log = SearchLog {
            id: self.next_id("log"),
            ip_address: client_ip.to_string(),
            search_query: query.clone(),
            search_result: found,
            created_at: now,
        };
        self.search_logs.push(log.clone());
        Ok(log)
    }

    fn search_logs(
        &self,
        query: &LogQuery,
        offset: FixedOffset,
    ) -> Result<Page<SearchLog>, StoreError> {
        let mut matched: Vec<SearchLog> = self
            .search_logs
            .iter()
            .filter(|log| query.matches(log, offset))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Page::paginate(matched, query.page, query.effective_limit()))
    }

    fn stats(&self, now: DateTime<Utc>, offset: FixedOffset) -> Result<SurveyStats, StoreError> {
        Ok(SurveyStats::compute(
            &self.requests,
            &self.search_logs,
            now,
            offset,
        ))
    }
}

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// Resolves bearer tokens to users
pub trait TokenVerifier {
    fn verify(&self, token: &str) -> Option<User>;
}

/// Fixed token table
#[derive(Debug, Clone, Default)]
pub struct StaticTokens {
    tokens: AHashMap<String, User>,
}

impl StaticTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token<S: Into<String>>(mut self, token: S, user: User) -> Self {
        self.tokens.insert(token.into(), user);
        self
    }
}

impl TokenVerifier for StaticTokens {
    fn verify(&self, token: &str) -> Option<User> {
        self.tokens.get(token).cloned()
    }
}

/// Token from an `Authorization: Bearer <token>` header value
///
/// ```
/// use rangwat::bearer_token;
///
/// assert_eq!(bearer_token("Bearer abc"), Some("abc"));
/// assert_eq!(bearer_token("Basic abc"), None);
/// ```
pub fn bearer_token(header: &str) -> Option<&str> {
    let rest = header.strip_prefix("Bearer ")?;
    rest.split(' ').next().filter(|token| !token.is_empty())
}

/// User behind a raw `Authorization` header value
pub(crate) fn authenticate<V: TokenVerifier>(
    verifier: &V,
    authorization: Option<&str>,
) -> Option<User> {
    let token = authorization.and_then(bearer_token)?;
    verifier.verify(token)
}

/// Client address from `X-Forwarded-For`, then `X-Real-IP`, else `"unknown"`
///
/// ```
/// use rangwat::client_ip;
///
/// assert_eq!(client_ip(Some("203.0.113.9"), Some("10.0.0.1")), "203.0.113.9");
/// assert_eq!(client_ip(None, None), "unknown");
/// ```
pub fn client_ip(forwarded_for: Option<&str>, real_ip: Option<&str>) -> String {
    [forwarded_for, real_ip]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Authenticated export of filtered survey requests
pub struct ExportService<S, V> {
    store: S,
    verifier: V,
    options: ExportOptions,
}

impl<S: SurveyStore, V: TokenVerifier> ExportService<S, V> {
    pub fn new(store: S, verifier: V) -> Self {
        Self {
            store,
            verifier,
            options: ExportOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Authenticate, query the store and build the export file
    ///
    /// `authorization` is the raw `Authorization` header value.
    pub fn export(
        &self,
        authorization: Option<&str>,
        filter: &SurveyFilter,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<ExportFile, ExportError> {
        let user = authenticate(&self.verifier, authorization).ok_or(ExportError::Unauthorized)?;
        log::debug!("export requested by {}", user.email);

        let requests = self.store.query(filter).map_err(|e| {
            log::error!("export query failed: {}", e);
            ExportError::Store(e)
        })?;

        build_export(&requests, format, &self.options, now).map_err(|e| {
            if !matches!(e, ExportError::NoData) {
                log::error!("export generation failed: {}", e);
            }
            e
        })
    }
}

/// Public status lookup by request number and applicant name
///
/// Every lookup that reaches the store is logged against `client_ip`, found
/// or not. A failure to write the log does not fail the lookup.
pub fn search<S: SurveyStore>(
    store: &mut S,
    query: &SearchQuery,
    client_ip: &str,
    now: DateTime<Utc>,
) -> Result<SurveyRequest, SearchError> {
    let query = query.validate()?;

    let found = store.find(&query).map_err(|e| {
        log::error!("search failed: {}", e);
        SearchError::Store(e)
    })?;

    if let Err(e) = store.log_search(&query, client_ip, found.is_some(), now) {
        log::warn!("failed to record search from {}: {}", client_ip, e);
    }

    found.ok_or(SearchError::NotFound)
}
