//! Survey data export (xlsx/csv)
//!
//! Survey requests are mapped to ten Thai-labelled columns in a fixed order,
//! with dates rendered the way Thai users read them (day/month/Buddhist-era
//! year), then handed to the spreadsheet or CSV writer.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::survey::SurveyRequest;
use rangwat_core::{ColumnWidths, Record};
use rangwat_csv::{CsvWriteOptions, CsvWriter, CSV_CONTENT_TYPE};
use rangwat_xlsx::{generate_xlsx, XLSX_CONTENT_TYPE};

/// Years between the Common Era and the Thai Buddhist Era
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Export columns in header order, with their display widths
pub const EXPORT_COLUMNS: [(&str, f64); 10] = [
    ("ลำดับ", 8.0),
    ("เลขที่คำขอ", 15.0),
    ("ชื่อผู้ขอ", 25.0),
    ("ประเภทงาน", 15.0),
    ("วันนัดหมาย", 15.0),
    ("วันค้าง", 10.0),
    ("ช่างรังวัด", 20.0),
    ("สถานะ", 15.0),
    ("วันที่สร้าง", 20.0),
    ("วันที่แก้ไขล่าสุด", 20.0),
];

/// Export file format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    /// Format from a request parameter: `"csv"` selects CSV, anything else xlsx
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some(p) if p.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
            _ => ExportFormat::Xlsx,
        }
    }

    /// MIME type for the download
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => XLSX_CONTENT_TYPE,
            ExportFormat::Csv => CSV_CONTENT_TYPE,
        }
    }

    /// File extension (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

/// Export settings
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Worksheet tab name (default: "Survey Data")
    pub sheet_name: String,
    /// Offset used to render timestamps, in seconds east of UTC
    /// (default: +07:00, Indochina Time)
    pub utc_offset_seconds: i32,
    /// Write column width directives into xlsx exports (default: true)
    pub column_widths: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Survey Data".to_string(),
            utc_offset_seconds: 7 * 3600,
            column_widths: true,
        }
    }
}

impl ExportOptions {
    /// Display offset; an out-of-range offset falls back to UTC
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_seconds).unwrap_or_else(|| Utc.fix())
    }
}

/// A generated export, ready to send as a download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Response headers for an attachment download
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Content-Type", self.content_type.to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.file_name),
            ),
            (
                "Cache-Control",
                "no-cache, no-store, must-revalidate".to_string(),
            ),
            ("Pragma", "no-cache".to_string()),
            ("Expires", "0".to_string()),
        ]
    }
}

/// `survey-data-export_YYYY-MM-DDTHH-MM-SS.<ext>` for the UTC time `now`
pub fn export_file_name(now: DateTime<Utc>, format: ExportFormat) -> String {
    format!(
        "survey-data-export_{}.{}",
        now.format("%Y-%m-%dT%H-%M-%S"),
        format.extension()
    )
}

/// Widths of the export columns
pub fn export_column_widths() -> ColumnWidths {
    EXPORT_COLUMNS.iter().copied().collect()
}

/// Map one request to an export row
pub fn export_record(request: &SurveyRequest, offset: FixedOffset) -> Record {
    let values: [rangwat_core::CellValue; 10] = [
        request.order_number.into(),
        request.request_number.as_str().into(),
        request.applicant_name.as_str().into(),
        request.survey_type.as_str().into(),
        format_thai_date(&request.appointment_date, offset).into(),
        request.days_pending.into(),
        request.surveyor_name.as_str().into(),
        request.status.as_str().into(),
        format_thai_datetime(&request.created_at, offset).into(),
        format_thai_datetime(&request.updated_at, offset).into(),
    ];

    let mut record = Record::with_capacity(EXPORT_COLUMNS.len());
    for ((name, _), value) in EXPORT_COLUMNS.iter().zip(values) {
        record.push(*name, value);
    }
    record
}

/// Build an export of `requests` in `format`
///
/// Fails with [`ExportError::NoData`] when `requests` is empty.
pub fn build_export(
    requests: &[SurveyRequest],
    format: ExportFormat,
    options: &ExportOptions,
    now: DateTime<Utc>,
) -> Result<ExportFile, ExportError> {
    if requests.is_empty() {
        return Err(ExportError::NoData);
    }

    let offset = options.offset();
    let records: Vec<Record> = requests.iter().map(|r| export_record(r, offset)).collect();

    let bytes = match format {
        ExportFormat::Xlsx => {
            let widths = options.column_widths.then(export_column_widths);
            generate_xlsx(&options.sheet_name, &records, widths.as_ref())?
        }
        ExportFormat::Csv => {
            CsvWriter::records_to_string(&records, &CsvWriteOptions::default())?.into_bytes()
        }
    };

    log::info!(
        "exported {} survey requests as {} ({} bytes)",
        requests.len(),
        format,
        bytes.len()
    );

    Ok(ExportFile {
        file_name: export_file_name(now, format),
        content_type: format.content_type(),
        bytes,
    })
}

/// Render a date as `dd/mm/yyyy` with a Buddhist-era year
///
/// Empty input stays empty; input that is not a date is returned unchanged.
pub fn format_thai_date(value: &str, offset: FixedOffset) -> String {
    match parse_local(value, offset) {
        Some(local) => format!("{}/{}", local.format("%d/%m"), buddhist_year(&local)),
        None => value.to_string(),
    }
}

/// Render a timestamp as `dd/mm/yyyy HH:MM` with a Buddhist-era year
///
/// Empty input stays empty; input that is not a timestamp is returned unchanged.
pub fn format_thai_datetime(value: &str, offset: FixedOffset) -> String {
    match parse_local(value, offset) {
        Some(local) => format!(
            "{}/{} {}",
            local.format("%d/%m"),
            buddhist_year(&local),
            local.format("%H:%M")
        ),
        None => value.to_string(),
    }
}

fn buddhist_year(local: &NaiveDateTime) -> i32 {
    local.year() + BUDDHIST_ERA_OFFSET
}

/// Wall-clock time at `offset` for a stored date or timestamp
///
/// Timestamps with an offset are converted; timestamps without one are taken
/// as already local; a bare date is midnight UTC.
fn parse_local(value: &str, offset: FixedOffset) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&offset).naive_local());
    }
    // Postgres text form: "2024-01-15 10:30:00.123+00"
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(dt.with_timezone(&offset).naive_local());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(naive);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight).with_timezone(&offset).naive_local());
    }

    None
}
