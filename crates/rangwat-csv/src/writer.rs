//! CSV writer

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::options::{CsvWriteOptions, LineTerminator};
use rangwat_core::{Record, Table};

/// CSV file writer
pub struct CsvWriter;

impl CsvWriter {
    /// Write a table to a CSV file
    pub fn write_file<P: AsRef<Path>>(
        table: &Table,
        path: P,
        options: &CsvWriteOptions,
    ) -> CsvResult<()> {
        let file = File::create(path)?;
        Self::write(table, file, options)
    }

    /// Write records to a string, using the first record's columns as the header
    pub fn records_to_string(records: &[Record], options: &CsvWriteOptions) -> CsvResult<String> {
        let table = Table::from_records(records)?;
        Self::to_string(&table, options)
    }

    /// Write a table to a string
    pub fn to_string(table: &Table, options: &CsvWriteOptions) -> CsvResult<String> {
        let mut buf = Vec::new();
        Self::write(table, &mut buf, options)?;
        String::from_utf8(buf).map_err(|e| {
            CsvError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }

    /// Write a table to a writer
    ///
    /// Fields are quoted only when they contain the delimiter, the quote
    /// character or a line break; quotes inside a field are doubled.
    pub fn write<W: Write>(table: &Table, writer: W, options: &CsvWriteOptions) -> CsvResult<()> {
        let terminator = match options.line_terminator {
            LineTerminator::LF => csv::Terminator::Any(b'\n'),
            LineTerminator::CRLF => csv::Terminator::CRLF,
        };

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .quote_style(csv::QuoteStyle::Necessary)
            .double_quote(true)
            .terminator(terminator)
            .from_writer(writer);

        if options.write_header {
            csv_writer.write_record(table.schema().columns())?;
        }

        for row in table.rows() {
            csv_writer.write_record(row.iter().map(|value| value.to_text().into_owned()))?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
