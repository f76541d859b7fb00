//! XLSX writer

use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use crate::error::XlsxResult;
use crate::shared_strings::SharedStringTable;
use crate::styles::{ExportStyles, BODY_STYLE, HEADER_STYLE};
use crate::xml::escape_xml;
use rangwat_core::{CellAddress, CellValue, ColumnWidths, Record, Sheet, Table};

/// Part names, in the order they are written
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const ROOT_RELS_PART: &str = "_rels/.rels";
const WORKBOOK_PART: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
const STYLES_PART: &str = "xl/styles.xml";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const WORKSHEET_PART: &str = "xl/worksheets/sheet1.xml";

/// Every part of a generated package
pub const PACKAGE_PARTS: [&str; 7] = [
    CONTENT_TYPES_PART,
    ROOT_RELS_PART,
    WORKBOOK_PART,
    WORKBOOK_RELS_PART,
    STYLES_PART,
    SHARED_STRINGS_PART,
    WORKSHEET_PART,
];

/// Generate a single-sheet XLSX package from records
///
/// The first record's columns become the header row. With `column_widths`
/// every header column gets a width directive (15 when not configured);
/// without it the worksheet carries no width directives at all.
///
/// Fails with [`rangwat_core::Error::EmptyData`] (wrapped in
/// [`crate::XlsxError::Core`]) when `records` is empty.
pub fn generate_xlsx(
    sheet_name: &str,
    records: &[Record],
    column_widths: Option<&ColumnWidths>,
) -> XlsxResult<Vec<u8>> {
    let table = Table::from_records(records)?;
    let mut sheet = Sheet::new(sheet_name, table);
    if let Some(widths) = column_widths {
        sheet = sheet.with_column_widths(widths.clone());
    }
    XlsxWriter::to_bytes(&sheet)
}

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a sheet to a file path
    pub fn write_file<P: AsRef<Path>>(sheet: &Sheet, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(sheet, file)
    }

    /// Write a sheet into an in-memory buffer
    pub fn to_bytes(sheet: &Sheet) -> XlsxResult<Vec<u8>> {
        let mut buf = Vec::new();
        Self::write(sheet, Cursor::new(&mut buf))?;
        Ok(buf)
    }

    /// Write a sheet to a writer
    pub fn write<W: Write + Seek>(sheet: &Sheet, writer: W) -> XlsxResult<()> {
        sheet.validate_name()?;
        let mut zip = zip::ZipWriter::new(writer);

        // The worksheet fills the shared string table, so it is built first
        let mut shared_strings =
            SharedStringTable::with_capacity(sheet.table().column_count() * 4);
        let worksheet = Self::build_worksheet(sheet, &mut shared_strings);

        Self::write_content_types(&mut zip)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, sheet.name())?;
        Self::write_workbook_rels(&mut zip)?;
        Self::write_part(&mut zip, STYLES_PART, &ExportStyles::new().to_styles_xml())?;
        Self::write_part(&mut zip, SHARED_STRINGS_PART, &shared_strings.to_xml())?;
        Self::write_part(&mut zip, WORKSHEET_PART, &worksheet)?;

        zip.finish()?;

        log::debug!(
            "wrote sheet '{}': {} rows x {} columns, {} shared strings ({} references)",
            sheet.name(),
            sheet.table().row_count(),
            sheet.table().column_count(),
            shared_strings.len(),
            shared_strings.reference_count()
        );
        Ok(())
    }

    fn write_part<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        name: &'static str,
        content: &str,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    <Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
</Types>"#;

        Self::write_part(zip, CONTENT_TYPES_PART, content)
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        Self::write_part(zip, ROOT_RELS_PART, content)
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet_name: &str,
    ) -> XlsxResult<()> {
        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <sheets>"#,
        );

        content.push_str(&format!(
            r#"
        <sheet name="{}" sheetId="1" r:id="rId1"/>"#,
            escape_xml(sheet_name)
        ));

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        Self::write_part(zip, WORKBOOK_PART, &content)
    }

    fn write_workbook_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;

        Self::write_part(zip, WORKBOOK_RELS_PART, content)
    }

    /// Build `xl/worksheets/sheet1.xml`, registering every emitted string
    fn build_worksheet(sheet: &Sheet, shared_strings: &mut SharedStringTable) -> String {
        let table = sheet.table();

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        content.push_str(&format!(
            "\n    <dimension ref=\"{}\"/>",
            table.dimension().to_a1_string()
        ));

        // Column widths must precede sheetData
        if let Some(columns) = sheet.columns() {
            content.push_str("\n    <cols>");
            for col in &columns {
                content.push_str(&format!(
                    "\n        <col min=\"{}\" max=\"{}\" width=\"{}\" customWidth=\"1\"/>",
                    col.min + 1,
                    col.max + 1,
                    col.width
                ));
            }
            content.push_str("\n    </cols>");
        }

        content.push_str("\n    <sheetData>");

        // Header row
        content.push_str("\n        <row r=\"1\">");
        for (col, name) in table.schema().columns().iter().enumerate() {
            let idx = shared_strings.reference(name);
            Self::push_string_cell(&mut content, 0, col, idx, HEADER_STYLE);
        }
        content.push_str("\n        </row>");

        // Data rows
        for (row_idx, row) in table.rows().iter().enumerate() {
            let row_num = row_idx + 1;
            content.push_str(&format!("\n        <row r=\"{}\">", row_num + 1));
            for (col, value) in row.iter().enumerate() {
                match value {
                    CellValue::Number(n) => {
                        content.push_str(&format!(
                            "\n            <c r=\"{}\" s=\"{}\"><v>{}</v></c>",
                            Self::cell_ref(row_num, col),
                            BODY_STYLE,
                            n
                        ));
                    }
                    other => {
                        let idx = shared_strings.reference(&other.to_text());
                        Self::push_string_cell(&mut content, row_num, col, idx, BODY_STYLE);
                    }
                }
            }
            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>");
        content.push_str("\n</worksheet>");
        content
    }

    fn push_string_cell(content: &mut String, row: usize, col: usize, idx: u32, style: u32) {
        content.push_str(&format!(
            "\n            <c r=\"{}\" t=\"s\" s=\"{}\"><v>{}</v></c>",
            Self::cell_ref(row, col),
            style,
            idx
        ));
    }

    /// Table bounds are checked on construction, so indices fit the sheet limits
    fn cell_ref(row: usize, col: usize) -> String {
        CellAddress::new(row as u32, col as u16).to_a1_string()
    }
}
