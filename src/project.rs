//! A loaded project: document plus the lookup tables built over it.

use std::path::Path;

use log::info;

use crate::catalog::SequenceCatalog;
use crate::document::Document;
use crate::error::Result;
use crate::flatten::{FlattenConfig, Row, TimelineFlattener};
use crate::index::ObjectIndex;

/// A parsed project, ready to flatten.
///
/// Building the index and catalog costs a full pass over the document each,
/// so a `Project` is the natural unit to keep around when flattening several
/// sequences of the same file.
#[derive(Debug, Clone)]
pub struct Project {
    document: Document,
    index: ObjectIndex,
    catalog: SequenceCatalog,
}

impl Project {
    /// Read and parse a project file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        info!("Read {} bytes from {}", bytes.len(), path.display());
        Self::from_bytes(&bytes)
    }

    /// Parse project bytes (gzip-compressed or plain XML).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_document(Document::from_bytes(bytes)?))
    }

    pub fn from_document(document: Document) -> Self {
        let index = ObjectIndex::build(&document);
        let catalog = SequenceCatalog::discover(&document);
        info!(
            "Indexed {} elements ({} IDs, {} UIDs, {} sequences)",
            document.len(),
            index.id_count(),
            index.uid_count(),
            catalog.len()
        );
        Self {
            document,
            index,
            catalog,
        }
    }

    /// Sequence names, sorted case-insensitively.
    pub fn sequence_names(&self) -> Vec<&str> {
        self.catalog.names()
    }

    /// Flatten a sequence by name.
    ///
    /// `Ok(None)` means the project has no sequence with that name.
    pub fn flatten(&self, name: &str, config: &FlattenConfig) -> Result<Option<Vec<Row>>> {
        self.flattener().with_config(*config).flatten(name)
    }

    /// A flattener over this project with the default configuration.
    pub fn flattener(&self) -> TimelineFlattener<'_> {
        TimelineFlattener::new(&self.document, &self.index, &self.catalog)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn index(&self) -> &ObjectIndex {
        &self.index
    }

    pub fn catalog(&self) -> &SequenceCatalog {
        &self.catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
        <PremiereData>
            <Sequence ObjectUID="b"><Name>beta</Name><VideoTrack>
                <TrackItem><Name>x.mov</Name><Start>0</Start><End>5</End></TrackItem>
            </VideoTrack></Sequence>
            <Sequence ObjectUID="a"><Name>Alpha</Name></Sequence>
        </PremiereData>"#;

    #[test]
    fn test_from_bytes() {
        let project = Project::from_bytes(XML).unwrap();
        assert_eq!(project.sequence_names(), vec!["Alpha", "beta"]);
        assert_eq!(project.index().uid_count(), 2);
    }

    #[test]
    fn test_flatten() {
        let project = Project::from_bytes(XML).unwrap();
        let config = FlattenConfig::default();

        let rows = project.flatten("beta", &config).unwrap().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(project.flatten("Alpha", &config).unwrap(), Some(Vec::new()));
        assert_eq!(project.flatten("gamma", &config).unwrap(), None);
    }

    #[test]
    fn test_open_missing_file() {
        let err = Project::open("/definitely/not/here.prproj").unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
