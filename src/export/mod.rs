//! Export of flattened rows to tabular formats.
//!
//! Provides the `Exporter` trait and format-specific implementations.
//!
//! # Architecture
//!
//! Exporters use a builder pattern:
//! - `new()` creates an exporter with default configuration
//! - `with_config()` allows customization
//! - `export()` writes to any `Write` destination
//!
//! Rows leave the flattener in raw ticks. Exporters turn them into
//! [`ExportRow`]s, adding timecodes and the title / stock-ID columns, and
//! optionally sort them.
//!
//! # Example
//!
//! ```no_run
//! use flatcut::{FlattenConfig, Project};
//! use flatcut::export::{CsvExporter, Exporter};
//! use std::fs::File;
//!
//! let project = Project::open("edit.prproj")?;
//! let rows = project.flatten("Main", &FlattenConfig::default())?.unwrap_or_default();
//!
//! let mut file = File::create("edit.csv")?;
//! CsvExporter::new().export(&rows, &mut file)?;
//! # Ok::<(), flatcut::Error>(())
//! ```

use std::io::{self, Write};

use crate::classify::{ClipType, StockProvider};
use crate::flatten::Row;
use crate::timecode::{rounded_seconds, ticks_to_timecode};
use crate::tracks::TrackKind;

mod csv;
#[cfg(feature = "json")]
mod json;
mod stock;

pub use csv::{CsvConfig, CsvExporter};
#[cfg(feature = "json")]
pub use json::{JsonConfig, JsonExporter};
pub use stock::derive_title_and_stock;

/// Trait for exporting rows to specific formats.
///
/// Exporters use a builder pattern where configuration is held in the struct,
/// and the `export` method writes to any `Write` destination.
pub trait Exporter {
    /// Export the rows to the provided writer.
    fn export<W: Write>(&self, rows: &[Row], writer: &mut W) -> io::Result<()>;
}

/// Order of exported rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Flattener output order.
    Traversal,
    /// Video before audio, then start second, then track, then name.
    #[default]
    Chronological,
}

/// A row as it appears in exported output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ExportRow {
    #[cfg_attr(feature = "json", serde(rename = "Type"))]
    pub kind: TrackKind,
    #[cfg_attr(feature = "json", serde(rename = "Track"))]
    pub track: u32,
    #[cfg_attr(feature = "json", serde(rename = "Name"))]
    pub name: String,
    #[cfg_attr(feature = "json", serde(rename = "Title"))]
    pub title: String,
    #[cfg_attr(feature = "json", serde(rename = "ClipType"))]
    pub clip_type: ClipType,
    #[cfg_attr(feature = "json", serde(rename = "Source"))]
    pub source: Option<StockProvider>,
    #[cfg_attr(feature = "json", serde(rename = "StockID"))]
    pub stock_id: String,
    #[cfg_attr(feature = "json", serde(rename = "StartTC"))]
    pub start_tc: String,
    #[cfg_attr(feature = "json", serde(rename = "EndTC"))]
    pub end_tc: String,
    #[cfg_attr(feature = "json", serde(skip))]
    start_seconds: u64,
}

impl ExportRow {
    pub fn from_row(row: &Row) -> Self {
        let (title, stock_id) = derive_title_and_stock(&row.name);
        Self {
            kind: row.kind,
            track: row.track,
            name: row.name.clone(),
            title,
            clip_type: row.clip_type,
            source: row.source,
            stock_id,
            start_tc: ticks_to_timecode(row.start_ticks),
            end_tc: ticks_to_timecode(row.end_ticks),
            start_seconds: rounded_seconds(row.start_ticks),
        }
    }

    /// Start of the row in whole (rounded) seconds.
    pub fn start_seconds(&self) -> u64 {
        self.start_seconds
    }
}

/// Convert rows for export, in the requested order.
///
/// The chronological sort is stable, so rows that tie on every key keep
/// their traversal order.
pub fn prepare_rows(rows: &[Row], order: SortOrder) -> Vec<ExportRow> {
    let mut out: Vec<ExportRow> = rows.iter().map(ExportRow::from_row).collect();
    if order == SortOrder::Chronological {
        out.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then(a.start_seconds.cmp(&b.start_seconds))
                .then(a.track.cmp(&b.track))
                .then_with(|| a.name.cmp(&b.name))
        });
    }
    out
}
