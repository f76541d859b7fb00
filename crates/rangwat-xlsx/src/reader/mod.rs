//! XLSX reader
//!
//! Reads the first worksheet of a package into dense rows. Used to parse
//! uploaded files and to verify generated packages.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use ahash::AHashMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::xml::decode_excel_escapes;
use rangwat_core::{CellAddress, CellRange, CellValue, ColumnData, Table};

/// Contents of one worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetContents {
    /// Visible tab name
    pub name: String,
    /// Declared dimension, if present and valid
    pub dimension: Option<CellRange>,
    /// Column width definitions (0-based indices)
    pub columns: Vec<ColumnData>,
    /// Rows from row 1, each dense from column A
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetContents {
    /// Width defined for a 0-based column, if any
    pub fn column_width(&self, col: u16) -> Option<f64> {
        self.columns
            .iter()
            .find(|c| c.contains(col))
            .map(|c| c.width)
    }

    /// Value at a 0-based row/column
    pub fn value(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Interpret the first row as the header
    pub fn to_table(&self) -> XlsxResult<Table> {
        Ok(Table::from_grid(self.rows.clone())?)
    }
}

/// Cell being parsed
#[derive(Debug, Default)]
struct PendingCell {
    col: u16,
    cell_type: Option<String>,
    value: Option<String>,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read the first sheet from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<SheetContents> {
        let file = File::open(path)?;
        Self::read(file)
    }

    /// Read the first sheet from an in-memory package
    pub fn read_bytes(bytes: &[u8]) -> XlsxResult<SheetContents> {
        Self::read(Cursor::new(bytes))
    }

    /// Read the first sheet from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<SheetContents> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;

        let sheets = Self::read_workbook_xml(&mut archive)?;
        let (name, r_id) = sheets
            .first()
            .cloned()
            .ok_or_else(|| XlsxError::InvalidFormat("Workbook has no sheets".into()))?;
        if sheets.len() > 1 {
            log::warn!(
                "workbook has {} sheets, reading only '{}'",
                sheets.len(),
                name
            );
        }

        let sheet_paths = Self::read_workbook_rels(&mut archive)?;
        let path = sheet_paths.get(&r_id).ok_or_else(|| {
            XlsxError::InvalidFormat(format!("No worksheet relationship for {}", r_id))
        })?;

        let mut contents = Self::read_worksheet(&mut archive, path, &shared_strings)?;
        contents.name = name;
        Ok(contents)
    }

    /// Shared string table, in index order
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // numbers-only workbooks omit the part
        };

        // Whitespace inside <t> is significant, so text is not trimmed
        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        // Phonetic runs are not part of the cell text
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) if e.name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Ok(Event::Text(e)) if in_t => {
                    current_string.push_str(&e.unescape()?);
                }
                Ok(Event::CData(e)) if in_t => {
                    current_string.push_str(&String::from_utf8_lossy(&e));
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    /// `(name, r:id)` of each sheet, in tab order
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<(String, String)>> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"sheet" => {
                    let name = Self::attr(&e, b"name");
                    let r_id = Self::attr(&e, b"r:id");

                    if let (Some(name), Some(r_id)) = (name, r_id) {
                        sheets.push((name, r_id));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(sheets)
    }

    /// Read workbook.xml.rels to get worksheet paths by rId
    fn read_workbook_rels<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<AHashMap<String, String>> {
        let file = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .map_err(|_| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = AHashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let id = Self::attr(&e, b"Id");
                    let target = Self::attr(&e, b"Target");
                    let rel_type = Self::attr(&e, b"Type");

                    if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                        if rel_type.ends_with("/worksheet") {
                            let full_path = match target.strip_prefix('/') {
                                Some(absolute) => absolute.to_string(),
                                None => format!("xl/{}", target),
                            };
                            rels.insert(id, full_path);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        shared_strings: &[String],
    ) -> XlsxResult<SheetContents> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut contents = SheetContents {
            name: String::new(),
            dimension: None,
            columns: Vec::new(),
            rows: Vec::new(),
        };

        let mut current_row: Option<usize> = None;
        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"row" => {
                        current_row = Some(Self::row_index(&e, current_row)?);
                    }
                    b"c" => {
                        let row = current_row.unwrap_or(0);
                        cell = Some(Self::start_cell(&e, &contents.rows, row)?);
                    }
                    b"v" if cell.is_some() => in_value = true,
                    b"is" if cell.is_some() => in_inline_str = true,
                    b"rPh" if in_inline_str => in_phonetic = true,
                    b"t" if in_inline_str && !in_phonetic => in_inline_text = true,
                    _ => {}
                },
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"dimension" => {
                        contents.dimension = Self::attr(&e, b"ref")
                            .and_then(|r| CellRange::parse(&r).ok());
                    }
                    b"col" => {
                        if let Some(col) = Self::parse_col(&e) {
                            contents.columns.push(col);
                        }
                    }
                    b"row" => {
                        // Row without cells
                        let row = Self::row_index(&e, current_row)?;
                        Self::ensure_row(&mut contents.rows, row);
                        current_row = Some(row);
                    }
                    b"c" => {
                        // Cell without a value
                        let row = current_row.unwrap_or(0);
                        let pending = Self::start_cell(&e, &contents.rows, row)?;
                        Self::set_cell(&mut contents.rows, row, pending.col, CellValue::Empty);
                    }
                    _ => {}
                },
                Ok(Event::Text(e)) if in_value || in_inline_text => {
                    if let Some(pending) = cell.as_mut() {
                        let text = e.unescape()?;
                        pending
                            .value
                            .get_or_insert_with(String::new)
                            .push_str(&text);
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"rPh" => in_phonetic = false,
                    b"t" => in_inline_text = false,
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            let row = current_row.unwrap_or(0);
                            let col = pending.col;
                            let value = Self::cell_value(pending, shared_strings)?;
                            Self::set_cell(&mut contents.rows, row, col, value);
                        }
                    }
                    b"row" => {
                        if let Some(row) = current_row {
                            Self::ensure_row(&mut contents.rows, row);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(XlsxError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(contents)
    }

    fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
        e.attributes()
            .flatten()
            .find(|attr| attr.key.as_ref() == key)
            .and_then(|attr| attr.unescape_value().ok().map(|s| s.to_string()))
    }

    /// 0-based row index from `r`, or the row after `previous`
    fn row_index(e: &BytesStart<'_>, previous: Option<usize>) -> XlsxResult<usize> {
        match Self::attr(e, b"r") {
            Some(r) => {
                let row: u32 = r
                    .parse()
                    .map_err(|_| XlsxError::Parse(format!("Invalid row number '{}'", r)))?;
                if row == 0 || row > rangwat_core::MAX_ROWS {
                    return Err(XlsxError::Parse(format!("Row number {} out of range", row)));
                }
                Ok(row as usize - 1)
            }
            None => Ok(previous.map_or(0, |p| p + 1)),
        }
    }

    fn start_cell(
        e: &BytesStart<'_>,
        rows: &[Vec<CellValue>],
        row: usize,
    ) -> XlsxResult<PendingCell> {
        let col = match Self::attr(e, b"r") {
            Some(cell_ref) => {
                CellAddress::parse(&cell_ref)
                    .map_err(|e| {
                        XlsxError::Parse(format!("Invalid cell reference '{}': {}", cell_ref, e))
                    })?
                    .col
            }
            // Without a reference the cell follows the previous one
            None => rows.get(row).map_or(0, |r| r.len() as u16),
        };

        Ok(PendingCell {
            col,
            cell_type: Self::attr(e, b"t"),
            value: None,
        })
    }

    /// Convert parsed cell content based on its type
    fn cell_value(cell: PendingCell, shared_strings: &[String]) -> XlsxResult<CellValue> {
        let value = match cell.value {
            Some(value) => value,
            None => return Ok(CellValue::Empty),
        };

        let cell_value = match cell.cell_type.as_deref() {
            // Shared string
            Some("s") => {
                let idx: usize = value.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {}", value))
                })?;
                let s = shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {} out of bounds", idx))
                })?;
                CellValue::String(s.clone())
            }

            // Boolean
            Some("b") => {
                let truthy = value == "1" || value.eq_ignore_ascii_case("true");
                CellValue::string(if truthy { "TRUE" } else { "FALSE" })
            }

            // Error, kept as its text
            Some("e") => CellValue::String(value),

            // Inline or formula string - decode Excel escape sequences
            Some("inlineStr") | Some("str") => CellValue::String(decode_excel_escapes(&value)),

            None | Some("n") => match value.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => {
                    log::warn!("non-numeric value '{}' in number cell, keeping text", value);
                    CellValue::String(value)
                }
            },

            // unknown type: keep the raw text
            Some(_) => CellValue::String(value),
        };

        Ok(cell_value)
    }

    fn parse_col(e: &BytesStart<'_>) -> Option<ColumnData> {
        let min: u16 = Self::attr(e, b"min")?.parse().ok()?;
        let max: u16 = Self::attr(e, b"max")?.parse().ok()?;
        let width: f64 = Self::attr(e, b"width")?.parse().ok()?;
        if min == 0 || max < min {
            log::warn!("skipping invalid column definition {}..{}", min, max);
            return None;
        }
        Some(ColumnData {
            min: min - 1,
            max: max - 1,
            width,
        })
    }

    fn ensure_row(rows: &mut Vec<Vec<CellValue>>, row: usize) {
        if rows.len() <= row {
            rows.resize_with(row + 1, Vec::new);
        }
    }

    fn set_cell(rows: &mut Vec<Vec<CellValue>>, row: usize, col: u16, value: CellValue) {
        Self::ensure_row(rows, row);
        let cells = &mut rows[row];
        let col = col as usize;
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
    }
}
