//! Survey request types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AdminError;
use crate::filter::SearchQuery;

/// A survey request as stored in the database
///
/// Dates are kept as the strings the store returns (`YYYY-MM-DD` for the
/// appointment, RFC 3339 timestamps for `created_at`/`updated_at`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyRequest {
    pub id: String,
    pub order_number: i64,
    pub request_number: String,
    pub applicant_name: String,
    pub days_pending: i64,
    pub surveyor_name: String,
    pub survey_type: String,
    pub appointment_date: String,
    pub status: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// One row of an uploaded spreadsheet, before it is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRow {
    pub order_number: i64,
    pub request_number: String,
    pub applicant_name: String,
    pub days_pending: i64,
    pub surveyor_name: String,
    pub survey_type: String,
    pub appointment_date: String,
    pub status: String,
}

/// Admin form input for creating or editing a request
///
/// Absent fields are `None`. On create the required fields must be present
/// (text non-empty, numbers may be 0); on update only present fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyInput {
    pub order_number: Option<i64>,
    pub request_number: Option<String>,
    pub applicant_name: Option<String>,
    pub days_pending: Option<i64>,
    pub surveyor_name: Option<String>,
    pub survey_type: Option<String>,
    pub appointment_date: Option<String>,
    pub status: Option<String>,
}

impl SurveyInput {
    /// Row for a new request; `survey_type` and `appointment_date` default to ""
    pub fn into_new_row(self) -> Result<UploadRow, AdminError> {
        fn text(value: Option<String>, field: &'static str) -> Result<String, AdminError> {
            value
                .filter(|v| !v.is_empty())
                .ok_or(AdminError::MissingField(field))
        }

        let order_number = self.order_number.ok_or(AdminError::MissingField("order_number"))?;
        let request_number = text(self.request_number, "request_number")?;
        let applicant_name = text(self.applicant_name, "applicant_name")?;
        let days_pending = self.days_pending.ok_or(AdminError::MissingField("days_pending"))?;
        let surveyor_name = text(self.surveyor_name, "surveyor_name")?;
        let status = text(self.status, "status")?;

        Ok(UploadRow {
            order_number,
            request_number,
            applicant_name,
            days_pending,
            surveyor_name,
            survey_type: self.survey_type.unwrap_or_default(),
            appointment_date: self.appointment_date.unwrap_or_default(),
            status,
        })
    }

    /// Copy the present fields onto `request`
    pub fn apply(&self, request: &mut SurveyRequest) {
        if let Some(n) = self.order_number {
            request.order_number = n;
        }
        if let Some(v) = &self.request_number {
            request.request_number = v.clone();
        }
        if let Some(v) = &self.applicant_name {
            request.applicant_name = v.clone();
        }
        if let Some(n) = self.days_pending {
            request.days_pending = n;
        }
        if let Some(v) = &self.surveyor_name {
            request.surveyor_name = v.clone();
        }
        if let Some(v) = &self.survey_type {
            request.survey_type = v.clone();
        }
        if let Some(v) = &self.appointment_date {
            request.appointment_date = v.clone();
        }
        if let Some(v) = &self.status {
            request.status = v.clone();
        }
    }
}

/// One public lookup, kept for monitoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLog {
    pub id: String,
    /// Client address from the proxy headers, or `"unknown"`
    pub ip_address: String,
    pub search_query: SearchQuery,
    /// Whether the lookup found a request
    pub search_result: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_store_row() {
        let json = r#"{
            "id": "6f1c",
            "order_number": 3,
            "request_number": "ร.ว. 12/2567",
            "applicant_name": "นายสมชาย ใจดี",
            "days_pending": 14,
            "surveyor_name": "นายช่าง หนึ่ง",
            "survey_type": "แบ่งแยก",
            "appointment_date": "2024-03-15",
            "status": "รอดำเนินการ",
            "created_at": "2024-03-01T02:30:00+00:00",
            "updated_at": "2024-03-02T09:05:00+00:00"
        }"#;

        let request: SurveyRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.order_number, 3);
        assert_eq!(request.days_pending, 14);
        assert_eq!(request.status, "รอดำเนินการ");
    }

    #[test]
    fn test_timestamps_are_optional() {
        let json = r#"{
            "id": "1", "order_number": 1, "request_number": "R1",
            "applicant_name": "A", "days_pending": 0, "surveyor_name": "S",
            "survey_type": "T", "appointment_date": "2024-01-01", "status": "X"
        }"#;

        let request: SurveyRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.created_at, "");
    }

    #[test]
    fn test_input_required_fields() {
        let input: SurveyInput = serde_json::from_str(
            r#"{"order_number": 0, "request_number": "R-1", "applicant_name": "A",
                "days_pending": 0, "surveyor_name": "S", "status": "รอดำเนินการ"}"#,
        )
        .unwrap();
        let row = input.into_new_row().unwrap();
        assert_eq!(row.order_number, 0);
        assert_eq!(row.survey_type, "");
        assert_eq!(row.appointment_date, "");

        let missing: SurveyInput =
            serde_json::from_str(r#"{"order_number": 1, "request_number": ""}"#).unwrap();
        let err = missing.into_new_row().unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: request_number");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_input_apply_only_present_fields() {
        let mut request: SurveyRequest = serde_json::from_str(
            r#"{"id": "1", "order_number": 1, "request_number": "R1",
                "applicant_name": "A", "days_pending": 4, "surveyor_name": "S",
                "survey_type": "T", "appointment_date": "2024-01-01", "status": "X"}"#,
        )
        .unwrap();

        let update = SurveyInput {
            days_pending: Some(9),
            status: Some("เสร็จสิ้น".to_string()),
            ..SurveyInput::default()
        };
        update.apply(&mut request);

        assert_eq!(request.days_pending, 9);
        assert_eq!(request.status, "เสร็จสิ้น");
        assert_eq!(request.request_number, "R1");
        assert_eq!(request.order_number, 1);
    }
}
