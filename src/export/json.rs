//! JSON Exporter - writes rows as an array of objects.

use std::io::{self, Write};

use super::{Exporter, SortOrder, prepare_rows};
use crate::flatten::Row;

/// Configuration for JSON export.
#[derive(Debug, Clone)]
pub struct JsonConfig {
    /// Row order.
    pub sort: SortOrder,
    /// Indent the output.
    pub pretty: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            sort: SortOrder::default(),
            pretty: true,
        }
    }
}

/// Exporter for JSON output.
///
/// Objects carry the same fields as the CSV columns; an unknown source is
/// `null` rather than an empty string.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    config: JsonConfig,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: JsonConfig) -> Self {
        Self { config }
    }
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, rows: &[Row], writer: &mut W) -> io::Result<()> {
        let rows = prepare_rows(rows, self.config.sort);
        if self.config.pretty {
            serde_json::to_writer_pretty(&mut *writer, &rows)?;
        } else {
            serde_json::to_writer(&mut *writer, &rows)?;
        }
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ClipType, StockProvider};
    use crate::timecode::TICKS_PER_SECOND;
    use crate::tracks::TrackKind;

    #[test]
    fn test_export_fields() {
        let rows = vec![Row {
            kind: TrackKind::Video,
            track: 2,
            name: "Imago_12345678".into(),
            clip_type: ClipType::Image,
            source: Some(StockProvider::Imago),
            start_ticks: 0,
            end_ticks: 3 * TICKS_PER_SECOND,
        }];
        let config = JsonConfig {
            sort: SortOrder::Traversal,
            pretty: false,
        };
        let mut out = Vec::new();
        JsonExporter::with_config(config).export(&rows, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let obj = &value[0];
        assert_eq!(obj["Type"], "Video");
        assert_eq!(obj["Track"], 2);
        assert_eq!(obj["Title"], "");
        assert_eq!(obj["ClipType"], "Image");
        assert_eq!(obj["Source"], "Imago");
        assert_eq!(obj["StockID"], "12345678");
        assert_eq!(obj["EndTC"], "00:00:03");
        assert!(obj.get("start_seconds").is_none());
    }
}
