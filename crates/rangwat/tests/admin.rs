//! Admin service flows over the in-memory store

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use pretty_assertions::assert_eq;
use rangwat::prelude::*;
use rangwat::{delete_message, generate_xlsx, upload_message, COMPLETED_STATUS};

const AUTH: Option<&str> = Some("Bearer office-token");

fn admin(store: MemoryStore) -> AdminService<MemoryStore, StaticTokens> {
    let tokens = StaticTokens::new().with_token(
        "office-token",
        User {
            id: "staff-1".to_string(),
            email: "staff@rangwat.example".to_string(),
        },
    );
    AdminService::new(store, tokens)
}

fn day(d: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, hour, 0, 0).unwrap()
}

fn form(order: i64, number: &str, applicant: &str) -> SurveyInput {
    SurveyInput {
        order_number: Some(order),
        request_number: Some(number.to_string()),
        applicant_name: Some(applicant.to_string()),
        days_pending: Some(2),
        surveyor_name: Some("นายช่าง หนึ่ง".to_string()),
        survey_type: Some("แบ่งแยก".to_string()),
        appointment_date: Some("2024-03-20".to_string()),
        status: Some("รอดำเนินการ".to_string()),
    }
}

fn upload_row(order: i64, number: &str, status: &str) -> UploadRow {
    UploadRow {
        order_number: order,
        request_number: number.to_string(),
        applicant_name: "นางสาวมาลี ดีงาม".to_string(),
        days_pending: 1,
        surveyor_name: "นายช่าง สอง".to_string(),
        survey_type: "รวมโฉนด".to_string(),
        appointment_date: "2024-04-02".to_string(),
        status: status.to_string(),
    }
}

#[test]
fn test_create_update_delete() {
    let mut admin = admin(MemoryStore::default());

    let created = admin
        .create(AUTH, form(1, "ร.ว. 1/2567", "นายสมชาย ใจดี"), day(1, 2))
        .unwrap();
    assert_eq!(created.created_at, "2024-03-01T02:00:00.000Z");

    let dup = admin
        .create(AUTH, form(2, "ร.ว. 1/2567", "นายอื่น"), day(1, 3))
        .unwrap_err();
    assert_eq!(dup.status_code(), 409);
    assert_eq!(dup.to_string(), "Survey request with this number already exists");

    let change = SurveyInput {
        status: Some(COMPLETED_STATUS.to_string()),
        days_pending: Some(0),
        ..SurveyInput::default()
    };
    let updated = admin.update(AUTH, &created.id, &change, day(2, 9)).unwrap();
    assert_eq!(updated.status, COMPLETED_STATUS);
    assert_eq!(updated.applicant_name, "นายสมชาย ใจดี");
    assert_eq!(updated.updated_at, "2024-03-02T09:00:00.000Z");

    let removed = admin.delete(AUTH, &created.id).unwrap();
    assert_eq!(
        delete_message(&removed),
        "Survey request ร.ว. 1/2567 deleted successfully"
    );
    assert_eq!(admin.delete(AUTH, &created.id).unwrap_err().status_code(), 404);
    assert_eq!(
        admin.update(None, &created.id, &change, day(2, 9)).unwrap_err().status_code(),
        401
    );
}

#[test]
fn test_paginated_listing() {
    let mut admin = admin(MemoryStore::default());
    for i in 1..=15 {
        admin
            .create(
                AUTH,
                form(i, &format!("RW-{:02}", i), "นายสมชาย ใจดี"),
                day(1, 0) + Duration::hours(i),
            )
            .unwrap();
    }

    let first = admin.list(AUTH, &ListQuery::default()).unwrap();
    assert_eq!((first.page, first.limit, first.total, first.pages), (1, 10, 15, 2));
    assert_eq!(first.data.first().map(|r| r.order_number), Some(15));
    assert!(first.has_next());

    let query = ListQuery {
        page: 2,
        limit: 10,
        ..ListQuery::default()
    };
    let second = admin.list(AUTH, &query).unwrap();
    let orders: Vec<i64> = second.data.iter().map(|r| r.order_number).collect();
    assert_eq!(orders, vec![5, 4, 3, 2, 1]);
    assert!(second.has_prev());

    let searched = admin
        .list(
            AUTH,
            &ListQuery {
                search: "rw-1".to_string(),
                ..ListQuery::default()
            },
        )
        .unwrap();
    assert_eq!(searched.total, 6);
}

#[test]
fn test_upload_replaces_rows() {
    let mut admin = admin(MemoryStore::default());
    admin
        .create(AUTH, form(1, "OLD-1", "นายสมชาย ใจดี"), day(1, 1))
        .unwrap();

    let rows = vec![
        upload_row(1, "NEW-1", "รอดำเนินการ"),
        upload_row(2, "NEW-2", COMPLETED_STATUS),
    ];
    let stored = admin.upload(AUTH, rows, day(3, 4)).unwrap();
    assert_eq!(upload_message(stored), "อัพโหลดข้อมูลสำเร็จ จำนวน 2 รายการ");

    let numbers: Vec<&str> = admin
        .store()
        .requests()
        .iter()
        .map(|r| r.request_number.as_str())
        .collect();
    assert_eq!(numbers, vec!["NEW-1", "NEW-2"]);
}

#[test]
fn test_upload_rejections_keep_rows() {
    let mut admin = admin(MemoryStore::default());
    admin
        .create(AUTH, form(1, "OLD-1", "นายสมชาย ใจดี"), day(1, 1))
        .unwrap();

    let err = admin
        .upload(Some("Bearer nope"), vec![upload_row(1, "N", "x")], day(3, 4))
        .unwrap_err();
    assert_eq!(err.status_code(), 401);

    let err = admin
        .upload(AUTH, vec![upload_row(0, "N", "x")], day(3, 4))
        .unwrap_err();
    assert!(matches!(err, UploadError::Invalid(_)));

    let err = admin
        .upload(
            AUTH,
            vec![upload_row(1, "SAME", "x"), upload_row(2, "SAME", "x")],
            day(3, 4),
        )
        .unwrap_err();
    assert_eq!(err.status_code(), 500);
    assert_eq!(err.to_string(), "ไม่สามารถบันทึกข้อมูลได้");

    assert_eq!(admin.store().requests()[0].request_number, "OLD-1");
}

#[test]
fn test_upload_file_commits_sheet() {
    let headers = [
        "ลำดับ",
        "เลขที่คำขอ",
        "ชื่อผู้ขอ",
        "วันค้าง",
        "ช่างรังวัด",
        "ประเภทงาน",
        "วันนัดหมาย",
        "สถานะ",
    ];
    let values = [
        CellValue::Number(1.0),
        CellValue::string("ร.ว. 9/2567"),
        CellValue::string("นายสมชาย ใจดี"),
        CellValue::Number(4.0),
        CellValue::string("นายช่าง หนึ่ง"),
        CellValue::string("แบ่งแยก"),
        CellValue::string("2024-03-15"),
        CellValue::string("รอดำเนินการ"),
    ];
    let record: Record = headers.iter().copied().zip(values).collect();
    let bytes = generate_xlsx("Sheet1", &[record], None).unwrap();

    let mut admin = admin(MemoryStore::default());
    assert_eq!(admin.upload_file(AUTH, &bytes, day(5, 1)).unwrap(), 1);
    assert_eq!(admin.store().requests()[0].days_pending, 4);

    let err = admin.upload_file(AUTH, b"garbage", day(5, 1)).unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_search_logs_and_stats() {
    let mut store = MemoryStore::new(Vec::new());
    store
        .replace_all(
            vec![
                upload_row(1, "RW-001", COMPLETED_STATUS),
                upload_row(2, "RW-002", "รอดำเนินการ"),
                upload_row(3, "RW-003", "รอดำเนินการ"),
            ],
            day(1, 0),
        )
        .unwrap();

    let ip = client_ip(Some("203.0.113.5"), Some("10.0.0.1"));
    search(&mut store, &SearchQuery::new("RW-001", "มาลี"), &ip, day(9, 1)).unwrap();
    search(&mut store, &SearchQuery::new("RW-404", "มาลี"), "unknown", day(10, 2)).unwrap_err();
    search(&mut store, &SearchQuery::new("RW-002", "มาลี"), &ip, day(10, 3)).unwrap();

    let ict = FixedOffset::east_opt(7 * 3600).unwrap();
    let admin = admin(store).with_offset(ict);

    let logs = admin.search_logs(AUTH, &LogQuery::default()).unwrap();
    assert_eq!(logs.total, 3);
    let results: Vec<bool> = logs.data.iter().map(|l| l.search_result).collect();
    assert_eq!(results, vec![true, false, true]);
    assert_eq!(logs.data[2].ip_address, "203.0.113.5");

    let on_ninth = admin
        .search_logs(
            AUTH,
            &LogQuery {
                date_from: NaiveDate::from_ymd_opt(2024, 3, 9),
                date_to: NaiveDate::from_ymd_opt(2024, 3, 9),
                ..LogQuery::default()
            },
        )
        .unwrap();
    assert_eq!(on_ninth.total, 1);

    let stats = admin.stats(AUTH, day(10, 5)).unwrap();
    assert_eq!(stats.total_items, 3);
    assert_eq!(stats.completed_items, 1);
    assert_eq!(stats.pending_items, 2);
    assert_eq!(stats.completion_rate, 33);
    assert_eq!(stats.status_breakdown.get("รอดำเนินการ"), Some(&2));
    assert_eq!(stats.today_searches, 2);
    assert_eq!(stats.daily_searches.values().sum::<usize>(), 3);

    assert_eq!(admin.stats(None, day(10, 5)).unwrap_err().status_code(), 401);
}
