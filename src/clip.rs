//! Display name and nested-sequence resolution for track items.
//!
//! A track item rarely carries its own name. The name usually lives on the
//! sub-clip or master clip it references, and a nested sequence may be
//! reachable by reference or only implied by a matching name. The resolver
//! runs a fixed cascade of lookups:
//!
//! 1. `Name` on the item itself (or its `ClipTrackItem` wrapper)
//! 2. the `SubClip` reference
//! 3. the `MasterClip` reference
//! 4. any reference under the item that lands on a sequence
//! 5. a numeric `…Sequence` value under `ClipTrackItem` matching a
//!    sequence's `<ID>`
//! 6. a catalogued sequence with exactly the resolved name
//! 7. name-like descendants, then the basename of a media path
//!
//! Name lookups stop at the first name found; sequence lookups stop at the
//! first sequence found. A step that finds nothing is skipped.
//!
//! Premiere names a sequence created with "New Sequence From Clip" after
//! the clip, so step 6 can match the very sequence an item sits in. Such a
//! match is flagged as [`ClipReference::inferred`].

use crate::catalog::{SequenceCatalog, is_sequence, sequence_name};
use crate::document::{Document, NodeId};
use crate::index::{ObjectIndex, reference_of};
use crate::util::basename;

/// Descendant tags that may hold a display name, in priority order.
const NAME_TAGS: [&str; 3] = ["Name", "ClipName", "Title"];

/// Descendant tags that may hold a media path.
const PATH_TAGS: [&str; 5] = ["ActualMediaFilePath", "FilePath", "RelativePath", "pathurl", "Path"];

/// What a track item shows and what it nests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipReference {
    /// Display name, empty when nothing could be found.
    pub name: String,
    /// Nested sequence the item stands for, if any.
    pub nested: Option<NodeId>,
    /// The nested sequence was inferred from the name alone.
    pub inferred: bool,
}

/// Resolve the display name and nested sequence of a track item.
pub fn resolve_clip(
    doc: &Document,
    index: &ObjectIndex,
    catalog: &SequenceCatalog,
    item: NodeId,
) -> ClipReference {
    let mut name = direct_name(doc, item).map(str::to_string);
    let mut nested = None;

    for tag in ["SubClip", "MasterClip"] {
        if name.is_some() && nested.is_some() {
            break;
        }
        let Some(target) = find_reference(doc, item, tag).and_then(|r| index.resolve(r)) else {
            continue;
        };
        if is_sequence(doc, target) {
            nested = nested.or(Some(target));
            if name.is_none() {
                name = sequence_name(doc, target).map(str::to_string);
            }
        } else if name.is_none() {
            name = target_name(doc, index, target).map(str::to_string);
        }
    }

    if nested.is_none() {
        nested = referenced_sequence(doc, index, item)
            .or_else(|| sequence_by_id_value(doc, catalog, item));
    }

    let mut inferred = false;
    if nested.is_none()
        && let Some(candidate) = name.as_deref()
    {
        nested = catalog.lookup(candidate);
        inferred = nested.is_some();
    }

    let name = name
        .or_else(|| descendant_name(doc, item).map(str::to_string))
        .or_else(|| path_basename(doc, item).map(str::to_string))
        .unwrap_or_default();

    ClipReference { name, nested, inferred }
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// `Name` directly on the item or on its `ClipTrackItem` wrapper.
fn direct_name(doc: &Document, item: NodeId) -> Option<&str> {
    non_empty(doc.child_text(item, "Name")).or_else(|| {
        let wrapper = doc.child(item, "ClipTrackItem")?;
        non_empty(doc.child_text(wrapper, "Name"))
    })
}

/// First element tagged `tag` under the item that carries a reference.
fn find_reference<'a>(doc: &'a Document, item: NodeId, tag: &str) -> Option<&'a str> {
    doc.descendants(item)
        .filter(|&d| doc.tag(d) == tag)
        .find_map(|d| reference_of(doc, d))
}

/// Name of a non-sequence reference target.
///
/// Sub-clips often leave their own name empty and defer to the master clip
/// or clip they point at, so one further hop is followed.
fn target_name<'a>(doc: &'a Document, index: &ObjectIndex, target: NodeId) -> Option<&'a str> {
    if let Some(name) = non_empty(doc.child_text(target, "Name")) {
        return Some(name);
    }
    ["MasterClip", "Clip"]
        .iter()
        .filter_map(|tag| doc.child(target, tag))
        .filter_map(|slot| index.resolve_node(doc, slot))
        .find_map(|hop| non_empty(doc.child_text(hop, "Name")))
}

/// Any reference under the item that resolves to a sequence.
fn referenced_sequence(doc: &Document, index: &ObjectIndex, item: NodeId) -> Option<NodeId> {
    doc.descendants(item)
        .filter_map(|d| index.resolve_node(doc, d))
        .find(|&target| is_sequence(doc, target))
}

/// Sequence named by a numeric value field such as `<Sequence>7</Sequence>`
/// under the item's `ClipTrackItem`.
fn sequence_by_id_value(doc: &Document, catalog: &SequenceCatalog, item: NodeId) -> Option<NodeId> {
    let wrapper = doc.child(item, "ClipTrackItem")?;
    doc.descendants(wrapper)
        .filter(|&d| doc.tag(d).ends_with("Sequence"))
        .filter_map(|d| non_empty(doc.text(d)))
        .filter(|text| text.bytes().all(|b| b.is_ascii_digit()))
        .find_map(|text| catalog.by_id_value(text))
}

fn descendant_name(doc: &Document, item: NodeId) -> Option<&str> {
    NAME_TAGS.iter().find_map(|tag| {
        doc.descendants(item)
            .filter(|&d| doc.tag(d) == *tag)
            .find_map(|d| non_empty(doc.text(d)))
    })
}

fn path_basename(doc: &Document, item: NodeId) -> Option<&str> {
    PATH_TAGS.iter().find_map(|tag| {
        doc.descendants(item)
            .filter(|&d| doc.tag(d) == *tag)
            .filter_map(|d| non_empty(doc.text(d)))
            .map(basename)
            .find(|b| !b.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        doc: Document,
        index: ObjectIndex,
        catalog: SequenceCatalog,
    }

    impl Fixture {
        fn new(xml: &str) -> Self {
            let doc = Document::parse_str(xml).unwrap();
            let index = ObjectIndex::build(&doc);
            let catalog = SequenceCatalog::discover(&doc);
            Self { doc, index, catalog }
        }

        fn resolve(&self, item_id: &str) -> ClipReference {
            let item = self.index.by_id(item_id).unwrap();
            resolve_clip(&self.doc, &self.index, &self.catalog, item)
        }

        fn uid(&self, uid: &str) -> NodeId {
            self.index.by_uid(uid).unwrap()
        }
    }

    const XML: &str = r#"
        <PremiereData>
            <Sequence ObjectUID="nested-seq"><TrackGroups/><Name>Nested A</Name></Sequence>
            <Sequence ObjectUID="by-name"><TrackGroups/><Name>Interview Edit</Name></Sequence>

            <!-- 1: direct name -->
            <VideoClipTrackItem ObjectID="1"><Name>Direct.mov</Name></VideoClipTrackItem>

            <!-- 2: sub-clip with its own name -->
            <VideoClipTrackItem ObjectID="2"><ClipTrackItem><SubClip ObjectRef="100"/></ClipTrackItem></VideoClipTrackItem>
            <SubClip ObjectID="100"><Name>Artlist_123456_Song.wav</Name></SubClip>

            <!-- 3: sub-clip deferring to its master clip -->
            <VideoClipTrackItem ObjectID="3"><ClipTrackItem><SubClip ObjectRef="101"/></ClipTrackItem></VideoClipTrackItem>
            <SubClip ObjectID="101"><MasterClip ObjectURef="mc-1"/></SubClip>
            <MasterClip ObjectUID="mc-1"><Name>B-Roll 04.mp4</Name></MasterClip>

            <!-- 4: sub-clip pointing straight at a sequence -->
            <VideoClipTrackItem ObjectID="4"><ClipTrackItem><SubClip ObjectURef="nested-seq"/></ClipTrackItem></VideoClipTrackItem>

            <!-- 5: master-clip reference only -->
            <VideoClipTrackItem ObjectID="5"><MasterClip ObjectURef="mc-1"/></VideoClipTrackItem>

            <!-- 6: unrelated reference that lands on a sequence -->
            <VideoClipTrackItem ObjectID="6">
                <ClipTrackItem><ComponentOwner ObjectURef="nested-seq"/></ClipTrackItem>
            </VideoClipTrackItem>

            <!-- 7: name matches a catalogued sequence -->
            <VideoClipTrackItem ObjectID="7"><ClipTrackItem><SubClip ObjectRef="102"/></ClipTrackItem></VideoClipTrackItem>
            <SubClip ObjectID="102"><Name>Interview Edit</Name></SubClip>

            <!-- 8: only a deep name field -->
            <VideoClipTrackItem ObjectID="8"><Meta><Info><ClipName>Deep Name</ClipName></Info></Meta></VideoClipTrackItem>

            <!-- 9: only a media path -->
            <VideoClipTrackItem ObjectID="9"><Media><ActualMediaFilePath>C:\Footage\Day 1\A001.mxf</ActualMediaFilePath></Media></VideoClipTrackItem>

            <!-- 10: nothing at all, dangling reference -->
            <VideoClipTrackItem ObjectID="10"><SubClip ObjectRef="999"/></VideoClipTrackItem>

            <!-- 11: direct name, sub-clip is a sequence -->
            <VideoClipTrackItem ObjectID="11"><Name>Renamed nest</Name><SubClip ObjectURef="nested-seq"/></VideoClipTrackItem>

            <!-- 12: sequence named only by its ID value -->
            <Sequence ObjectUID="by-id"><TrackGroups/><Name>Selects</Name><ID>7</ID></Sequence>
            <VideoClipTrackItem ObjectID="12">
                <ClipTrackItem><Name>Selects copy</Name><VideoSequence>7</VideoSequence></ClipTrackItem>
            </VideoClipTrackItem>

            <!-- 13: ID value that matches no sequence -->
            <VideoClipTrackItem ObjectID="13">
                <ClipTrackItem><Name>Orphan.mov</Name><Sequence>8</Sequence></ClipTrackItem>
            </VideoClipTrackItem>
        </PremiereData>"#;

    #[test]
    fn test_direct_name() {
        let f = Fixture::new(XML);
        assert_eq!(f.resolve("1"), ClipReference { name: "Direct.mov".into(), nested: None, inferred: false });
    }

    #[test]
    fn test_sub_clip_name() {
        let f = Fixture::new(XML);
        assert_eq!(f.resolve("2").name, "Artlist_123456_Song.wav");
        assert_eq!(f.resolve("3").name, "B-Roll 04.mp4");
        assert_eq!(f.resolve("3").nested, None);
    }

    #[test]
    fn test_sub_clip_sequence_is_nested() {
        let f = Fixture::new(XML);
        let clip = f.resolve("4");
        assert_eq!(clip.name, "Nested A");
        assert_eq!(clip.nested, Some(f.uid("nested-seq")));
    }

    #[test]
    fn test_master_clip_name() {
        let f = Fixture::new(XML);
        assert_eq!(f.resolve("5").name, "B-Roll 04.mp4");
    }

    #[test]
    fn test_any_reference_to_sequence() {
        let f = Fixture::new(XML);
        let clip = f.resolve("6");
        assert_eq!(clip.nested, Some(f.uid("nested-seq")));
        assert_eq!(clip.name, "");
        assert!(!clip.inferred);
    }

    #[test]
    fn test_sequence_id_value() {
        let f = Fixture::new(XML);
        let clip = f.resolve("12");
        assert_eq!(clip.name, "Selects copy");
        assert_eq!(clip.nested, Some(f.uid("by-id")));
        assert!(!clip.inferred);

        let orphan = f.resolve("13");
        assert_eq!(orphan.name, "Orphan.mov");
        assert_eq!(orphan.nested, None);
    }

    #[test]
    fn test_name_implies_nesting() {
        let f = Fixture::new(XML);
        let clip = f.resolve("7");
        assert_eq!(clip.name, "Interview Edit");
        assert_eq!(clip.nested, Some(f.uid("by-name")));
        assert!(clip.inferred);
    }

    #[test]
    fn test_descendant_and_path_fallbacks() {
        let f = Fixture::new(XML);
        assert_eq!(f.resolve("8").name, "Deep Name");
        assert_eq!(f.resolve("9").name, "A001.mxf");
    }

    #[test]
    fn test_nothing_found() {
        let f = Fixture::new(XML);
        assert_eq!(f.resolve("10"), ClipReference::default());
    }

    #[test]
    fn test_direct_name_kept_with_nested_reference() {
        let f = Fixture::new(XML);
        let clip = f.resolve("11");
        assert_eq!(clip.name, "Renamed nest");
        assert_eq!(clip.nested, Some(f.uid("nested-seq")));
        assert!(!clip.inferred);
    }
}
