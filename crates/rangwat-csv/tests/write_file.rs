//! CSV file output

use pretty_assertions::assert_eq;
use rangwat_core::{Record, Table};
use rangwat_csv::{CsvWriteOptions, CsvWriter};

#[test]
fn test_write_file_thai_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");

    let records = vec![
        Record::new()
            .with("ลำดับ", 1)
            .with("ชื่อผู้ขอ", "นายสมชาย ใจดี")
            .with("สถานะ", "รอดำเนินการ"),
        Record::new()
            .with("ลำดับ", 2)
            .with("ชื่อผู้ขอ", "บริษัท ก, จำกัด")
            .with("สถานะ", "เสร็จสิ้น"),
    ];
    let table = Table::from_records(&records).unwrap();

    CsvWriter::write_file(&table, &path, &CsvWriteOptions::default()).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        "ลำดับ,ชื่อผู้ขอ,สถานะ\n1,นายสมชาย ใจดี,รอดำเนินการ\n2,\"บริษัท ก, จำกัด\",เสร็จสิ้น\n"
    );
    assert_eq!(written, CsvWriter::to_string(&table, &CsvWriteOptions::default()).unwrap());
}
