//! # rangwat
//!
//! Survey request handling for a land-survey office: exports to XLSX and
//! CSV, the public status lookup and spreadsheet uploads.
//!
//! ## Features
//!
//! - Export filtered survey requests with Thai headers and Buddhist-era dates
//! - Bearer-token authenticated export and admin services
//! - Status lookup by request number and applicant name, with a search log
//! - Parse, validate and commit uploaded spreadsheets
//! - Paged admin listings and dashboard statistics
//!
//! ## Example
//!
//! ```rust
//! use rangwat::prelude::*;
//! use chrono::Utc;
//!
//! let store = MemoryStore::new(vec![SurveyRequest {
//!     id: "1".to_string(),
//!     order_number: 1,
//!     request_number: "ร.ว. 1/2567".to_string(),
//!     applicant_name: "นายสมชาย ใจดี".to_string(),
//!     days_pending: 5,
//!     surveyor_name: "นายช่าง หนึ่ง".to_string(),
//!     survey_type: "แบ่งแยก".to_string(),
//!     appointment_date: "2024-03-15".to_string(),
//!     status: "รอดำเนินการ".to_string(),
//!     created_at: String::new(),
//!     updated_at: String::new(),
//! }]);
//!
//! let requests = store.query(&SurveyFilter::new()).unwrap();
//! let file = build_export(&requests, ExportFormat::Xlsx, &ExportOptions::default(), Utc::now()).unwrap();
//! assert!(file.file_name.ends_with(".xlsx"));
//! ```

pub mod admin;
pub mod error;
pub mod export;
pub mod filter;
pub mod listing;
pub mod prelude;
pub mod service;
pub mod stats;
pub mod survey;
pub mod upload;

mod text;

pub use admin::{delete_message, upload_message, AdminService};
pub use error::{AdminError, ExportError, RowError, SearchError, StoreError, UploadError};
pub use export::{
    build_export, export_column_widths, export_file_name, export_record, format_thai_date,
    format_thai_datetime, ExportFile, ExportFormat, ExportOptions, BUDDHIST_ERA_OFFSET,
    EXPORT_COLUMNS,
};
pub use filter::{SearchQuery, SurveyFilter, ALL_STATUSES};
pub use listing::{ListQuery, LogQuery, Page, MAX_LOG_PAGE};
pub use service::{
    bearer_token, client_ip, search, ExportService, MemoryStore, StaticTokens, SurveyStore,
    TokenVerifier, User,
};
pub use stats::{SurveyStats, COMPLETED_STATUS, RECENT_SEARCH_DAYS};
pub use survey::{SearchLog, SurveyInput, SurveyRequest, UploadRow};
pub use text::normalize_text;
pub use upload::{parse_upload, validate_upload, UPLOAD_COLUMNS};

// Re-export the spreadsheet layers
pub use rangwat_core::{CellValue, ColumnWidths, Record};
pub use rangwat_csv::{CsvWriteOptions, CsvWriter};
pub use rangwat_xlsx::{generate_xlsx, SheetContents, XlsxReader, XlsxWriter};
