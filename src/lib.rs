//! # flatcut
//!
//! Flatten Premiere Pro timelines into a plain list of clips.
//!
//! ## Features
//!
//! - Read `.prproj` files (gzip-compressed XML) or their uncompressed XML
//! - Resolve the project's cross-referenced object graph
//! - Expand nested sequences in place, with times shifted into the parent
//! - Tag rows with a clip type and stock provider
//! - Export to CSV (and JSON with the `json` feature) with `HH:MM:SS` timecodes
//!
//! ## Quick Start
//!
//! ```no_run
//! use flatcut::{FlattenConfig, Project};
//! use flatcut::export::{CsvExporter, Exporter};
//!
//! let project = Project::open("edit.prproj")?;
//! println!("Sequences: {:?}", project.sequence_names());
//!
//! if let Some(rows) = project.flatten("Main", &FlattenConfig::default())? {
//!     CsvExporter::new().export(&rows, &mut std::io::stdout())?;
//! }
//! # Ok::<(), flatcut::Error>(())
//! ```
//!
//! ## Working with the Graph
//!
//! [`Project`] bundles the three read-only structures the flattener needs.
//! They can also be built and borrowed separately:
//!
//! ```
//! use flatcut::{Document, ObjectIndex, SequenceCatalog, TimelineFlattener};
//!
//! let doc = Document::parse_str(r#"<PremiereData><Sequence ObjectUID="s"><Name>Main</Name></Sequence></PremiereData>"#)?;
//! let index = ObjectIndex::build(&doc);
//! let catalog = SequenceCatalog::discover(&doc);
//!
//! let rows = TimelineFlattener::new(&doc, &index, &catalog).flatten("Main")?;
//! assert_eq!(rows, Some(Vec::new()));
//! # Ok::<(), flatcut::Error>(())
//! ```

pub mod catalog;
pub mod classify;
pub mod clip;
pub mod document;
pub mod error;
pub mod export;
pub mod flatten;
pub mod index;
pub mod project;
pub mod timecode;
pub mod tracks;
pub mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use catalog::SequenceCatalog;
pub use classify::{Classification, Classifier, ClipType, HeuristicClassifier, StockProvider};
pub use clip::ClipReference;
pub use document::{Document, Node, NodeId};
pub use error::{Error, Result};
pub use flatten::{FlattenConfig, Row, TimelineFlattener};
pub use index::ObjectIndex;
pub use project::Project;
pub use tracks::{ResolvedTrack, SequenceTracks, TrackItem, TrackKind, TrackStrategy};
