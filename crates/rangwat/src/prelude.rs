//! Prelude module - common imports for rangwat users
//!
//! ```rust
//! use rangwat::prelude::*;
//! ```

pub use crate::{
    // Export
    build_export,
    // Lookup
    client_ip,
    search,
    // Upload
    parse_upload,
    validate_upload,
    AdminError,
    AdminService,
    CellValue,
    ExportError,
    ExportFile,
    ExportFormat,
    ExportOptions,
    ExportService,
    ListQuery,
    LogQuery,
    MemoryStore,
    Page,
    Record,
    SearchError,
    SearchLog,
    SearchQuery,
    StaticTokens,
    SurveyFilter,
    SurveyInput,
    SurveyRequest,
    SurveyStats,
    SurveyStore,
    TokenVerifier,
    UploadError,
    UploadRow,
    User,
};
