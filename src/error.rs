//! Error types for flatcut operations.

use thiserror::Error;

/// Errors that can occur while reading a project or flattening a timeline.
///
/// Lookups that simply find nothing (an unknown reference, a sequence name
/// that is not in the project) are not errors; they surface as `None`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Document has no root element")]
    EmptyDocument,

    #[error("Unbalanced XML: {0}")]
    UnbalancedXml(String),

    /// A nested sequence refers back to a sequence already being expanded.
    #[error("Nested sequence cycle detected at sequence '{sequence}'")]
    NestingCycle { sequence: String },
}

pub type Result<T> = std::result::Result<T, Error>;
