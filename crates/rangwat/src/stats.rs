//! Dashboard statistics

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;

use crate::survey::{SearchLog, SurveyRequest};

/// Status counted as completed work
pub const COMPLETED_STATUS: &str = "เสร็จสิ้น";

/// Days of search history in [`SurveyStats::daily_searches`]
pub const RECENT_SEARCH_DAYS: i64 = 7;

/// Admin dashboard figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyStats {
    pub total_items: usize,
    pub completed_items: usize,
    /// Every request not in [`COMPLETED_STATUS`]
    pub pending_items: usize,
    /// Lookups made since local midnight
    pub today_searches: usize,
    /// Requests per status; an empty status counts as `"unknown"`
    pub status_breakdown: BTreeMap<String, usize>,
    /// Lookups per local day over the last seven days
    pub daily_searches: BTreeMap<NaiveDate, usize>,
    /// Completed share of all requests, rounded percent (0 with no requests)
    pub completion_rate: u32,
}

impl SurveyStats {
    /// Figures at `now`; days are calendar days at `offset`
    pub fn compute(
        requests: &[SurveyRequest],
        logs: &[SearchLog],
        now: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Self {
        let total_items = requests.len();
        let completed_items = requests
            .iter()
            .filter(|r| r.status == COMPLETED_STATUS)
            .count();

        let mut status_breakdown = BTreeMap::new();
        for request in requests {
            let status = if request.status.is_empty() {
                "unknown"
            } else {
                request.status.as_str()
            };
            *status_breakdown.entry(status.to_string()).or_insert(0) += 1;
        }

        let today = now.with_timezone(&offset).date_naive();
        let local_day = |log: &SearchLog| log.created_at.with_timezone(&offset).date_naive();
        let today_searches = logs.iter().filter(|&log| local_day(log) == today).count();

        let since = now - Duration::days(RECENT_SEARCH_DAYS);
        let mut daily_searches = BTreeMap::new();
        for log in logs.iter().filter(|log| log.created_at >= since) {
            *daily_searches.entry(local_day(log)).or_insert(0) += 1;
        }

        let completion_rate = if total_items > 0 {
            (completed_items as f64 / total_items as f64 * 100.0).round() as u32
        } else {
            0
        };

        SurveyStats {
            total_items,
            completed_items,
            pending_items: total_items - completed_items,
            today_searches,
            status_breakdown,
            daily_searches,
            completion_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::SearchQuery;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn request(status: &str) -> SurveyRequest {
        SurveyRequest {
            id: status.to_string(),
            order_number: 1,
            request_number: "R".to_string(),
            applicant_name: "A".to_string(),
            days_pending: 0,
            surveyor_name: "S".to_string(),
            survey_type: "T".to_string(),
            appointment_date: "2024-01-01".to_string(),
            status: status.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn log_at(created_at: DateTime<Utc>) -> SearchLog {
        SearchLog {
            id: created_at.to_rfc3339(),
            ip_address: "unknown".to_string(),
            search_query: SearchQuery::new("R", "A"),
            search_result: true,
            created_at,
        }
    }

    fn ict() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    #[test]
    fn test_request_counts() {
        let requests = vec![
            request(COMPLETED_STATUS),
            request("รอดำเนินการ"),
            request("รอดำเนินการ"),
            request(""),
        ];
        let stats = SurveyStats::compute(&requests, &[], Utc::now(), ict());

        assert_eq!(stats.total_items, 4);
        assert_eq!(stats.completed_items, 1);
        assert_eq!(stats.pending_items, 3);
        assert_eq!(stats.completion_rate, 25);
        assert_eq!(stats.status_breakdown.get("รอดำเนินการ"), Some(&2));
        assert_eq!(stats.status_breakdown.get("unknown"), Some(&1));
    }

    #[test]
    fn test_completion_rate_rounds() {
        let requests = vec![
            request(COMPLETED_STATUS),
            request(COMPLETED_STATUS),
            request("x"),
        ];
        let stats = SurveyStats::compute(&requests, &[], Utc::now(), ict());
        assert_eq!(stats.completion_rate, 67);

        let empty = SurveyStats::compute(&[], &[], Utc::now(), ict());
        assert_eq!(empty.completion_rate, 0);
        assert_eq!(empty.pending_items, 0);
    }

    #[test]
    fn test_search_activity() {
        // 2024-03-10 09:00 at +07:00
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 2, 0, 0).unwrap();
        let logs = vec![
            // 2024-03-10 07:30 local: today
            log_at(Utc.with_ymd_and_hms(2024, 3, 10, 0, 30, 0).unwrap()),
            // 2024-03-10 00:10 local: today, though still the 9th in UTC
            log_at(Utc.with_ymd_and_hms(2024, 3, 9, 17, 10, 0).unwrap()),
            // 2024-03-05 local
            log_at(Utc.with_ymd_and_hms(2024, 3, 5, 5, 0, 0).unwrap()),
            // older than seven days
            log_at(Utc.with_ymd_and_hms(2024, 3, 2, 5, 0, 0).unwrap()),
        ];

        let stats = SurveyStats::compute(&[], &logs, now, ict());
        assert_eq!(stats.today_searches, 2);

        let days: Vec<(String, usize)> = stats
            .daily_searches
            .iter()
            .map(|(day, n)| (day.to_string(), *n))
            .collect();
        assert_eq!(
            days,
            vec![("2024-03-05".to_string(), 1), ("2024-03-10".to_string(), 2)]
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let stats = SurveyStats::compute(&[request(COMPLETED_STATUS)], &[], Utc::now(), ict());
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["completionRate"], 100);
        assert_eq!(json["totalItems"], 1);
        assert_eq!(json["statusBreakdown"][COMPLETED_STATUS], 1);
    }
}
