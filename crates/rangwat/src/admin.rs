//! Authenticated admin operations: request management, uploads and monitoring

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::{AdminError, StoreError, UploadError};
use crate::export::ExportOptions;
use crate::listing::{ListQuery, LogQuery, Page};
use crate::service::{authenticate, SurveyStore, TokenVerifier, User};
use crate::stats::SurveyStats;
use crate::survey::{SearchLog, SurveyInput, SurveyRequest, UploadRow};
use crate::upload::{parse_upload, validate_upload};

/// Confirmation shown after a committed upload
pub fn upload_message(count: usize) -> String {
    format!("อัพโหลดข้อมูลสำเร็จ จำนวน {} รายการ", count)
}

/// Confirmation shown after a delete
pub fn delete_message(request: &SurveyRequest) -> String {
    format!("Survey request {} deleted successfully", request.request_number)
}

/// Admin side of the store, behind bearer-token authentication
///
/// Every call takes the raw `Authorization` header value and checks it
/// before touching the store.
pub struct AdminService<S, V> {
    store: S,
    verifier: V,
    offset: FixedOffset,
}

impl<S: SurveyStore, V: TokenVerifier> AdminService<S, V> {
    pub fn new(store: S, verifier: V) -> Self {
        Self {
            store,
            verifier,
            offset: ExportOptions::default().offset(),
        }
    }

    /// Offset that decides calendar days for stats and log filters
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn user(&self, authorization: Option<&str>) -> Result<User, AdminError> {
        authenticate(&self.verifier, authorization).ok_or(AdminError::Unauthorized)
    }

    pub fn list(
        &self,
        authorization: Option<&str>,
        query: &ListQuery,
    ) -> Result<Page<SurveyRequest>, AdminError> {
        self.user(authorization)?;
        self.store
            .list(query)
            .map_err(|e| store_failure("fetch survey requests", e))
    }

    /// Create a request from form input; required fields are checked first
    pub fn create(
        &mut self,
        authorization: Option<&str>,
        input: SurveyInput,
        now: DateTime<Utc>,
    ) -> Result<SurveyRequest, AdminError> {
        let user = self.user(authorization)?;
        let row = input.into_new_row()?;

        let created = self
            .store
            .insert(row, now)
            .map_err(|e| store_failure("create survey request", e))?;
        log::info!("{} created request {}", user.email, created.request_number);
        Ok(created)
    }

    pub fn update(
        &mut self,
        authorization: Option<&str>,
        id: &str,
        input: &SurveyInput,
        now: DateTime<Utc>,
    ) -> Result<SurveyRequest, AdminError> {
        let user = self.user(authorization)?;
        if id.is_empty() {
            return Err(AdminError::MissingId);
        }

        let updated = self
            .store
            .update(id, input, now)
            .map_err(|e| store_failure("update survey request", e))?;
        log::info!("{} updated request {}", user.email, updated.request_number);
        Ok(updated)
    }

    pub fn delete(
        &mut self,
        authorization: Option<&str>,
        id: &str,
    ) -> Result<SurveyRequest, AdminError> {
        let user = self.user(authorization)?;
        if id.is_empty() {
            return Err(AdminError::MissingId);
        }

        let removed = self
            .store
            .delete(id)
            .map_err(|e| store_failure("delete survey request", e))?;
        log::info!("{} deleted request {}", user.email, removed.request_number);
        Ok(removed)
    }

    /// Validate parsed upload rows and replace every stored request with them
    pub fn upload(
        &mut self,
        authorization: Option<&str>,
        rows: Vec<UploadRow>,
        now: DateTime<Utc>,
    ) -> Result<usize, UploadError> {
        let user = authenticate(&self.verifier, authorization).ok_or(UploadError::Unauthorized)?;
        validate_upload(&rows)?;

        let stored = self.store.replace_all(rows, now).map_err(|e| {
            log::error!("upload save failed: {}", e);
            UploadError::Save(e)
        })?;
        log::info!("{} replaced survey data with {} rows", user.email, stored);
        Ok(stored)
    }

    /// [`AdminService::upload`] straight from spreadsheet bytes
    pub fn upload_file(
        &mut self,
        authorization: Option<&str>,
        bytes: &[u8],
        now: DateTime<Utc>,
    ) -> Result<usize, UploadError> {
        if authenticate(&self.verifier, authorization).is_none() {
            return Err(UploadError::Unauthorized);
        }
        let rows = parse_upload(bytes)?;
        self.upload(authorization, rows, now)
    }

    pub fn stats(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SurveyStats, AdminError> {
        self.user(authorization)?;
        self.store
            .stats(now, self.offset)
            .map_err(|e| store_failure("fetch stats", e))
    }

    pub fn search_logs(
        &self,
        authorization: Option<&str>,
        query: &LogQuery,
    ) -> Result<Page<SearchLog>, AdminError> {
        self.user(authorization)?;
        self.store
            .search_logs(query, self.offset)
            .map_err(|e| store_failure("fetch search logs", e))
    }
}

fn store_failure(action: &'static str, err: StoreError) -> AdminError {
    let err = AdminError::from_store(action, err);
    if let AdminError::Store { source, .. } = &err {
        log::error!("failed to {}: {}", action, source);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::{MemoryStore, StaticTokens};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    const AUTH: Option<&str> = Some("Bearer admin-token");

    fn service(store: MemoryStore) -> AdminService<MemoryStore, StaticTokens> {
        let tokens = StaticTokens::new().with_token(
            "admin-token",
            User {
                id: "u1".to_string(),
                email: "admin@example.com".to_string(),
            },
        );
        AdminService::new(store, tokens)
    }

    fn input(number: &str) -> SurveyInput {
        SurveyInput {
            order_number: Some(1),
            request_number: Some(number.to_string()),
            applicant_name: Some("นางสาวมาลี ดีงาม".to_string()),
            days_pending: Some(0),
            surveyor_name: Some("ช่าง ข".to_string()),
            survey_type: Some("รังวัดสอบเขต".to_string()),
            appointment_date: Some("2024-06-01".to_string()),
            status: Some("รอดำเนินการ".to_string()),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 3, 0, 0).unwrap()
    }

    #[test]
    fn test_every_call_needs_a_token() {
        let mut admin = service(MemoryStore::default());
        for auth in [None, Some("Bearer wrong"), Some("admin-token")] {
            assert_eq!(admin.list(auth, &ListQuery::default()).unwrap_err().status_code(), 401);
            assert_eq!(admin.create(auth, input("R-1"), now()).unwrap_err().status_code(), 401);
            assert_eq!(admin.delete(auth, "x").unwrap_err().status_code(), 401);
            assert_eq!(admin.stats(auth, now()).unwrap_err().status_code(), 401);
            assert_eq!(
                admin.search_logs(auth, &LogQuery::default()).unwrap_err().status_code(),
                401
            );
            assert!(matches!(
                admin.upload_file(auth, b"not a spreadsheet", now()),
                Err(UploadError::Unauthorized)
            ));
        }
        assert!(admin.store().is_empty());
    }

    #[test]
    fn test_create_checks_fields_and_duplicates() {
        let mut admin = service(MemoryStore::default());
        let created = admin.create(AUTH, input("R-1"), now()).unwrap();
        assert_eq!(created.request_number, "R-1");

        let err = admin.create(AUTH, input("R-1"), now()).unwrap_err();
        assert_eq!(err.status_code(), 409);

        let mut partial = input("R-2");
        partial.surveyor_name = None;
        let err = admin.create(AUTH, partial, now()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: surveyor_name");
        assert_eq!(admin.store().len(), 1);
    }

    #[test]
    fn test_update_and_delete_unknown_id() {
        let mut admin = service(MemoryStore::default());
        let err = admin.update(AUTH, "", &SurveyInput::default(), now()).unwrap_err();
        assert_eq!(err.to_string(), "Survey request ID is required");

        let err = admin.update(AUTH, "nope", &SurveyInput::default(), now()).unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Survey request not found");
        assert_eq!(admin.delete(AUTH, "nope").unwrap_err().status_code(), 404);
    }

    #[test]
    fn test_messages() {
        assert_eq!(upload_message(3), "อัพโหลดข้อมูลสำเร็จ จำนวน 3 รายการ");

        let mut admin = service(MemoryStore::default());
        let created = admin.create(AUTH, input("R-7"), now()).unwrap();
        let removed = admin.delete(AUTH, &created.id).unwrap();
        assert_eq!(delete_message(&removed), "Survey request R-7 deleted successfully");
    }
}
