//! Error types for survey export, search and upload

use thiserror::Error;

use rangwat_csv::CsvError;
use rangwat_xlsx::XlsxError;

/// Failure reported by a [`crate::SurveyStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another request already uses this request number
    #[error("Request number '{0}' already exists")]
    Duplicate(String),

    /// No request has this id
    #[error("No survey request with id '{0}'")]
    NotFound(String),

    /// The backing store failed
    #[error("Store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Backend failure with a message
    pub fn new<S: Into<String>>(msg: S) -> Self {
        StoreError::Backend(msg.into())
    }
}

/// Errors from building or serving an export
#[derive(Debug, Error)]
pub enum ExportError {
    /// Missing, malformed or rejected bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// The store query failed
    #[error("Failed to fetch survey requests for export")]
    Store(#[source] StoreError),

    /// The filter matched no requests
    #[error("No data found to export")]
    NoData,

    /// Spreadsheet generation failed
    #[error("Internal server error during export")]
    Xlsx(#[from] XlsxError),

    /// CSV generation failed
    #[error("Internal server error during export")]
    Csv(#[from] CsvError),
}

impl ExportError {
    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ExportError::Unauthorized => 401,
            ExportError::NoData => 404,
            ExportError::Store(_) | ExportError::Xlsx(_) | ExportError::Csv(_) => 500,
        }
    }
}

/// Errors from the public status lookup
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("กรุณาระบุเลขที่คำขอ")]
    MissingRequestNumber,

    #[error("กรุณาระบุชื่อผู้ขอ")]
    MissingApplicantName,

    /// No single request matched
    #[error("ไม่พบข้อมูลที่ตรงกับการค้นหา")]
    NotFound,

    #[error("เกิดข้อผิดพลาดในระบบ")]
    Store(#[source] StoreError),
}

impl SearchError {
    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            SearchError::MissingRequestNumber | SearchError::MissingApplicantName => 400,
            SearchError::NotFound => 404,
            SearchError::Store(_) => 500,
        }
    }
}

/// Errors from the authenticated admin operations
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Unauthorized")]
    Unauthorized,

    /// A required create field is absent or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Survey request ID is required")]
    MissingId,

    #[error("Survey request not found")]
    NotFound,

    #[error("Survey request with this number already exists")]
    Duplicate,

    /// The store failed; `action` names what was attempted
    #[error("Failed to {action}")]
    Store {
        action: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AdminError {
    /// Map a store failure during `action`
    pub fn from_store(action: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(_) => AdminError::Duplicate,
            StoreError::NotFound(_) => AdminError::NotFound,
            source => AdminError::Store { action, source },
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AdminError::Unauthorized => 401,
            AdminError::MissingField(_) | AdminError::MissingId => 400,
            AdminError::NotFound => 404,
            AdminError::Duplicate => 409,
            AdminError::Store { .. } => 500,
        }
    }
}

/// A row of an upload that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// Data row number (1-based)
    pub row: usize,
    /// Fields that failed
    pub fields: Vec<&'static str>,
}

/// Errors from reading or validating an upload
#[derive(Debug, Error)]
pub enum UploadError {
    /// Missing, malformed or rejected bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// The file is not a readable spreadsheet
    #[error("ไม่สามารถอ่านไฟล์ Excel ได้")]
    Read(#[from] XlsxError),

    /// No data rows were found
    #[error("ไม่มีข้อมูลสำหรับการอัพโหลด")]
    Empty,

    /// One or more rows failed validation
    #[error("พบข้อผิดพลาด: {}", format_row_errors(.0))]
    Invalid(Vec<RowError>),

    /// The validated rows could not be stored
    #[error("ไม่สามารถบันทึกข้อมูลได้")]
    Save(#[source] StoreError),
}

impl UploadError {
    /// HTTP status for this error
    pub fn status_code(&self) -> u16 {
        match self {
            UploadError::Unauthorized => 401,
            UploadError::Read(_) | UploadError::Empty | UploadError::Invalid(_) => 400,
            UploadError::Save(_) => 500,
        }
    }
}

fn format_row_errors(errors: &[RowError]) -> String {
    errors
        .iter()
        .map(|e| format!("แถวที่ {}: ข้อมูลไม่ถูกต้อง", e.row))
        .collect::<Vec<_>>()
        .join(", ")
}
