//! CSV Exporter - writes rows as comma-separated values.
//!
//! Fields are quoted only when they contain a comma, a double quote or a line
//! break; embedded quotes are doubled.

use std::borrow::Cow;
use std::io::{self, Write};

use super::{ExportRow, Exporter, SortOrder, prepare_rows};
use crate::flatten::Row;

/// Column headers, in output order.
pub const COLUMNS: [&str; 9] = [
    "Type", "Track", "Name", "Title", "ClipType", "Source", "StockID", "StartTC", "EndTC",
];

/// Configuration for CSV export.
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Row order.
    pub sort: SortOrder,
    /// Write the header line.
    pub header: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            sort: SortOrder::default(),
            header: true,
        }
    }
}

/// Exporter for CSV output.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    config: CsvConfig,
}

impl CsvExporter {
    /// Create a new CsvExporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a CsvExporter with the specified configuration.
    pub fn with_config(config: CsvConfig) -> Self {
        Self { config }
    }
}

impl Exporter for CsvExporter {
    fn export<W: Write>(&self, rows: &[Row], writer: &mut W) -> io::Result<()> {
        if self.config.header {
            write_record(writer, COLUMNS)?;
        }
        for row in prepare_rows(rows, self.config.sort) {
            write_record(writer, fields(&row))?;
        }
        writer.flush()
    }
}

fn fields(row: &ExportRow) -> [Cow<'_, str>; 9] {
    [
        Cow::Borrowed(row.kind.as_str()),
        Cow::Owned(row.track.to_string()),
        Cow::Borrowed(row.name.as_str()),
        Cow::Borrowed(row.title.as_str()),
        Cow::Borrowed(row.clip_type.as_str()),
        Cow::Borrowed(row.source.map(|s| s.as_str()).unwrap_or("")),
        Cow::Borrowed(row.stock_id.as_str()),
        Cow::Borrowed(row.start_tc.as_str()),
        Cow::Borrowed(row.end_tc.as_str()),
    ]
}

fn write_record<W, I, S>(writer: &mut W, fields: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        writer.write_all(escape_field(field.as_ref()).as_bytes())?;
    }
    writer.write_all(b"\n")
}

/// Quote a field if it needs it.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
