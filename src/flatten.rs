//! Timeline flattening: sequences (with nesting) to a flat list of rows.
//!
//! The flattener walks a sequence's video tracks, then its audio tracks, and
//! each track's items in document order. An item that stands for a nested
//! sequence is replaced by that sequence's own rows, shifted by the item's
//! start and reported on the item's track.
//!
//! # Example
//!
//! ```
//! use flatcut::{Document, FlattenConfig, ObjectIndex, SequenceCatalog, TimelineFlattener};
//!
//! let doc = Document::parse_str(r#"
//!     <PremiereData>
//!         <Sequence ObjectUID="s"><Name>Main</Name><VideoTrack>
//!             <TrackItem><Name>a.mov</Name><Start>0</Start><End>10</End></TrackItem>
//!         </VideoTrack></Sequence>
//!     </PremiereData>"#)?;
//! let index = ObjectIndex::build(&doc);
//! let catalog = SequenceCatalog::discover(&doc);
//!
//! let rows = TimelineFlattener::new(&doc, &index, &catalog)
//!     .with_config(FlattenConfig::default())
//!     .flatten("Main")?
//!     .expect("sequence exists");
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].name, "a.mov");
//! # Ok::<(), flatcut::Error>(())
//! ```

use log::{debug, trace, warn};

use crate::catalog::{SequenceCatalog, sequence_name};
use crate::classify::{Classifier, ClipType, HeuristicClassifier, StockProvider};
use crate::clip::resolve_clip;
use crate::document::{Document, NodeId};
use crate::error::{Error, Result};
use crate::index::ObjectIndex;
use crate::tracks::{TrackItem, TrackKind, resolve_tracks, track_items};

/// Options for [`TimelineFlattener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenConfig {
    /// Replace nested-sequence items with the nested sequence's rows.
    pub expand_nested: bool,
    /// Also emit the row of the item that holds an expanded nested sequence.
    pub include_parent_row: bool,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            expand_nested: true,
            include_parent_row: false,
        }
    }
}

impl FlattenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expand_nested(mut self, expand: bool) -> Self {
        self.expand_nested = expand;
        self
    }

    pub fn with_include_parent_row(mut self, include: bool) -> Self {
        self.include_parent_row = include;
        self
    }
}

/// One clip of the flattened timeline, in ticks of the top-level sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "PascalCase"))]
pub struct Row {
    #[cfg_attr(feature = "json", serde(rename = "Type"))]
    pub kind: TrackKind,
    pub track: u32,
    pub name: String,
    pub clip_type: ClipType,
    pub source: Option<StockProvider>,
    pub start_ticks: u64,
    pub end_ticks: u64,
}

impl Row {
    /// Duration in ticks.
    pub fn duration_ticks(&self) -> u64 {
        self.end_ticks - self.start_ticks
    }

    /// Provider name, or `""` when the source is unknown.
    pub fn source_str(&self) -> &'static str {
        self.source.map(StockProvider::as_str).unwrap_or("")
    }
}

/// Flattens sequences of one document.
///
/// The flattener only borrows the document, index and catalog, so any number
/// of flatteners may run over the same project concurrently.
pub struct TimelineFlattener<'a, C = HeuristicClassifier> {
    doc: &'a Document,
    index: &'a ObjectIndex,
    catalog: &'a SequenceCatalog,
    config: FlattenConfig,
    classifier: C,
}

impl<'a> TimelineFlattener<'a> {
    /// Create a flattener with the default configuration and classifier.
    pub fn new(doc: &'a Document, index: &'a ObjectIndex, catalog: &'a SequenceCatalog) -> Self {
        Self {
            doc,
            index,
            catalog,
            config: FlattenConfig::default(),
            classifier: HeuristicClassifier,
        }
    }
}

/// Traversal state for one `flatten` call.
struct Walk {
    rows: Vec<Row>,
    /// Sequences currently being expanded, outermost first.
    path: Vec<NodeId>,
}

impl<'a, C: Classifier> TimelineFlattener<'a, C> {
    pub fn with_config(mut self, config: FlattenConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the row classification policy.
    pub fn with_classifier<D: Classifier>(self, classifier: D) -> TimelineFlattener<'a, D> {
        TimelineFlattener {
            doc: self.doc,
            index: self.index,
            catalog: self.catalog,
            config: self.config,
            classifier,
        }
    }

    pub fn config(&self) -> &FlattenConfig {
        &self.config
    }

    /// Flatten the sequence with the given name.
    ///
    /// Returns `Ok(None)` when no sequence has that name, and `Ok(Some(rows))`
    /// (possibly empty) otherwise. Fails only when nested sequences form a
    /// cycle.
    pub fn flatten(&self, name: &str) -> Result<Option<Vec<Row>>> {
        let Some(sequence) = self.catalog.find(self.doc, name) else {
            debug!("No sequence named '{name}'");
            return Ok(None);
        };
        self.flatten_sequence(sequence).map(Some)
    }

    /// Flatten an already-located sequence node.
    pub fn flatten_sequence(&self, sequence: NodeId) -> Result<Vec<Row>> {
        let mut walk = Walk {
            rows: Vec::new(),
            path: Vec::new(),
        };
        self.expand(sequence, 0, None, &mut walk)?;
        debug!("Flattened sequence node {} into {} rows", sequence.0, walk.rows.len());
        Ok(walk.rows)
    }

    /// Emit the rows of `sequence`, shifted by `offset` ticks.
    ///
    /// `track_number` overrides the track column for nested sequences so
    /// their rows land on the parent item's track.
    fn expand(
        &self,
        sequence: NodeId,
        offset: u64,
        track_number: Option<u32>,
        walk: &mut Walk,
    ) -> Result<()> {
        if walk.path.contains(&sequence) {
            let name = sequence_name(self.doc, sequence).unwrap_or("<unnamed>");
            return Err(Error::NestingCycle {
                sequence: name.to_string(),
            });
        }
        walk.path.push(sequence);

        let tracks = resolve_tracks(self.doc, self.index, sequence);
        for track in tracks.iter() {
            let number = track_number.unwrap_or(track.number);
            for item in track_items(self.doc, self.index, track.node) {
                match item {
                    TrackItem::Placed { node, start, end } => {
                        self.place(track.kind, number, node, start, end, offset, walk)?;
                    }
                    TrackItem::Malformed { node, reason } => {
                        warn!(
                            "Skipping {} item (node {}) on track {number}: {reason}",
                            track.kind, node.0
                        );
                    }
                }
            }
        }

        walk.path.pop();
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn place(
        &self,
        kind: TrackKind,
        track: u32,
        item: NodeId,
        start: u64,
        end: u64,
        offset: u64,
        walk: &mut Walk,
    ) -> Result<()> {
        let clip = resolve_clip(self.doc, self.index, self.catalog, item);
        let row = self.row(kind, track, clip.name, start.saturating_add(offset), end.saturating_add(offset));

        let nested = match clip.nested {
            Some(nested) if self.config.expand_nested => nested,
            _ => {
                trace!("{row:?}");
                walk.rows.push(row);
                return Ok(());
            }
        };

        // A clip named after an enclosing sequence is a clip, not a cycle.
        if clip.inferred && walk.path.contains(&nested) {
            debug!("'{}' only shares its name with an enclosing sequence; keeping as a clip", row.name);
            walk.rows.push(row);
            return Ok(());
        }

        let include_parent = self.config.include_parent_row;
        if include_parent {
            walk.rows.push(row.clone());
        }
        let before = walk.rows.len();
        self.expand(nested, row.start_ticks, Some(track), walk)?;

        // An empty expansion still keeps its parent row so the nested clip
        // never vanishes from the output.
        if walk.rows.len() == before && !include_parent {
            debug!("Nested sequence '{}' produced no rows; keeping parent", row.name);
            walk.rows.push(row);
        }
        Ok(())
    }

    fn row(&self, kind: TrackKind, track: u32, name: String, start_ticks: u64, end_ticks: u64) -> Row {
        let class = self.classifier.classify(&name, kind);
        Row {
            kind,
            track,
            name,
            clip_type: class.clip_type,
            source: class.source,
            start_ticks,
            end_ticks,
        }
    }
}
