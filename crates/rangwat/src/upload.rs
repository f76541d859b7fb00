//! Spreadsheet upload parsing and validation
//!
//! Uploads use a fixed column layout with a header row:
//!
//! | A | B | C | D | E | F | G | H |
//! |---|---|---|---|---|---|---|---|
//! | order | request number | applicant | days pending | surveyor | survey type | appointment date | status |

use rangwat_core::CellValue;
use rangwat_xlsx::XlsxReader;

use crate::error::{RowError, UploadError};
use crate::survey::UploadRow;

/// Cells a row needs before it is read
pub const UPLOAD_COLUMNS: usize = 8;

/// Read upload rows from the first sheet of an xlsx file
///
/// The header row is skipped and rows with fewer than eight cells are
/// ignored. A missing or zero order number becomes the row's position;
/// a missing days-pending value becomes 0. Text is trimmed.
pub fn parse_upload(bytes: &[u8]) -> Result<Vec<UploadRow>, UploadError> {
    let contents = XlsxReader::read_bytes(bytes)?;

    let mut rows = Vec::new();
    for (position, cells) in contents.rows.iter().enumerate().skip(1) {
        let used = used_len(cells);
        if used < UPLOAD_COLUMNS {
            if used > 0 {
                log::warn!(
                    "skipping upload row {}: {} of {} cells",
                    position + 1,
                    used,
                    UPLOAD_COLUMNS
                );
            }
            continue;
        }

        rows.push(UploadRow {
            order_number: number_or(&cells[0], position as i64),
            request_number: text(&cells[1]),
            applicant_name: text(&cells[2]),
            days_pending: number_or(&cells[3], 0),
            surveyor_name: text(&cells[4]),
            survey_type: text(&cells[5]),
            appointment_date: text(&cells[6]),
            status: text(&cells[7]),
        });
    }

    log::debug!("parsed {} upload rows from '{}'", rows.len(), contents.name);
    Ok(rows)
}

/// Check every row, reporting all failing rows (1-based)
///
/// Order numbers must be at least 1, days pending at least 0 and every
/// text field non-empty.
pub fn validate_upload(rows: &[UploadRow]) -> Result<(), UploadError> {
    if rows.is_empty() {
        return Err(UploadError::Empty);
    }

    let errors: Vec<RowError> = rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let fields = invalid_fields(row);
            (!fields.is_empty()).then(|| RowError {
                row: idx + 1,
                fields,
            })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(UploadError::Invalid(errors))
    }
}

fn invalid_fields(row: &UploadRow) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if row.order_number < 1 {
        fields.push("order_number");
    }
    if row.days_pending < 0 {
        fields.push("days_pending");
    }

    let text_fields = [
        ("request_number", &row.request_number),
        ("applicant_name", &row.applicant_name),
        ("surveyor_name", &row.surveyor_name),
        ("survey_type", &row.survey_type),
        ("appointment_date", &row.appointment_date),
        ("status", &row.status),
    ];
    for (name, value) in text_fields {
        if value.is_empty() {
            fields.push(name);
        }
    }
    fields
}

/// Cells up to and including the last non-empty one
fn used_len(cells: &[CellValue]) -> usize {
    cells
        .iter()
        .rposition(|c| !c.is_empty())
        .map_or(0, |idx| idx + 1)
}

/// Whole number from a cell; blank, zero or non-numeric cells give `default`
fn number_or(cell: &CellValue, default: i64) -> i64 {
    let n = match cell {
        CellValue::Number(n) => *n,
        CellValue::String(s) if s.trim().is_empty() => 0.0,
        CellValue::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        CellValue::Empty => f64::NAN,
    };

    if n.is_finite() && n != 0.0 {
        n.trunc() as i64
    } else {
        default
    }
}

/// Trimmed text of a cell; blank and zero cells give ""
fn text(cell: &CellValue) -> String {
    match cell {
        CellValue::Number(n) if *n == 0.0 => String::new(),
        other => other.to_text().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row() -> UploadRow {
        UploadRow {
            order_number: 1,
            request_number: "R-1".to_string(),
            applicant_name: "นาย ก".to_string(),
            days_pending: 0,
            surveyor_name: "ช่าง ข".to_string(),
            survey_type: "แบ่งแยก".to_string(),
            appointment_date: "2024-01-01".to_string(),
            status: "รอดำเนินการ".to_string(),
        }
    }

    #[test]
    fn test_number_or() {
        assert_eq!(number_or(&CellValue::Number(12.0), 5), 12);
        assert_eq!(number_or(&CellValue::string(" 7 "), 5), 7);
        assert_eq!(number_or(&CellValue::string("abc"), 5), 5);
        assert_eq!(number_or(&CellValue::Number(0.0), 5), 5);
        assert_eq!(number_or(&CellValue::Empty, 0), 0);
    }

    #[test]
    fn test_text() {
        assert_eq!(text(&CellValue::string("  R-1 ")), "R-1");
        assert_eq!(text(&CellValue::Number(2567.0)), "2567");
        assert_eq!(text(&CellValue::Number(0.0)), "");
        assert_eq!(text(&CellValue::Empty), "");
    }

    #[test]
    fn test_used_len() {
        let cells = vec![CellValue::Number(1.0), CellValue::Empty, CellValue::string("x"), CellValue::Empty];
        assert_eq!(used_len(&cells), 3);
        assert_eq!(used_len(&[CellValue::Empty]), 0);
    }

    #[test]
    fn test_validate_ok() {
        assert!(validate_upload(&[row(), row()]).is_ok());
    }

    #[test]
    fn test_validate_reports_every_row() {
        let mut bad_order = row();
        bad_order.order_number = 0;
        let mut bad_text = row();
        bad_text.status = String::new();
        bad_text.days_pending = -1;

        match validate_upload(&[row(), bad_order, bad_text]) {
            Err(UploadError::Invalid(errors)) => {
                assert_eq!(
                    errors,
                    vec![
                        RowError {
                            row: 2,
                            fields: vec!["order_number"],
                        },
                        RowError {
                            row: 3,
                            fields: vec!["days_pending", "status"],
                        },
                    ]
                );
            }
            other => panic!("expected invalid rows, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_empty() {
        assert!(matches!(validate_upload(&[]), Err(UploadError::Empty)));
    }
}
