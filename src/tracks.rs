//! Track resolution for a sequence.
//!
//! Projects encode "the tracks of a sequence" in several shapes depending on
//! the application version that wrote them. Each shape is handled by a
//! [`TrackStrategy`]; strategies are tried in order and the first that finds
//! any track wins.
//!
//! ```text
//! Sequence
//! └─ TrackGroups
//!    └─ TrackGroup ─ First/Second ─▶ VideoTrackGroup / AudioTrackGroup
//!                                    └─ TrackGroup
//!                                       └─ Tracks
//!                                          └─ Track Index="n" ─▶ VideoClipTrack / AudioClipTrack
//!                                                                └─ ClipTrack/ClipItems/TrackItems
//!                                                                   └─ TrackItem ─▶ VideoClipTrackItem
//! ```

use std::collections::HashSet;
use std::fmt;

use log::debug;

use crate::catalog::TRACK_GROUPS;
use crate::document::{Document, NodeId};
use crate::index::{ObjectIndex, reference_of};

/// Kind of a track, and of every row emitted from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum TrackKind {
    Video,
    Audio,
}

impl TrackKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackKind::Video => "Video",
            TrackKind::Audio => "Audio",
        }
    }

    /// Kind of a concrete clip-track object (`VideoClipTrack`, `AudioClipTrack`).
    pub fn from_clip_track_tag(tag: &str) -> Option<Self> {
        match tag {
            "VideoClipTrack" => Some(TrackKind::Video),
            "AudioClipTrack" => Some(TrackKind::Audio),
            _ => None,
        }
    }

    /// Kind of any track element, including bare `VideoTrack` / `AudioTrack`.
    pub fn from_track_tag(tag: &str) -> Option<Self> {
        match tag {
            "VideoTrack" => Some(TrackKind::Video),
            "AudioTrack" => Some(TrackKind::Audio),
            _ => Self::from_clip_track_tag(tag),
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A track of a sequence, in resolved order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub kind: TrackKind,
    /// `Index` declared by the document, if any.
    pub declared_index: Option<u32>,
    /// Track number used in output: the declared index, or for index-less
    /// tracks the next numbers after the highest declared index.
    pub number: u32,
    /// The concrete track object.
    pub node: NodeId,
}

/// How the tracks of a sequence were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackStrategy {
    /// `TrackGroups` → group object → `TrackGroup/Tracks/Track` → clip track.
    Grouped,
    /// `Track` entries under `TrackGroups` resolved straight through their UID.
    DeclaredUid,
    /// Track elements nested directly inside the sequence.
    Direct,
}

impl TrackStrategy {
    /// Strategies in the order they are tried.
    pub const ALL: [TrackStrategy; 3] = [
        TrackStrategy::Grouped,
        TrackStrategy::DeclaredUid,
        TrackStrategy::Direct,
    ];

    fn collect(self, doc: &Document, index: &ObjectIndex, sequence: NodeId) -> Vec<FoundTrack> {
        match self {
            TrackStrategy::Grouped => grouped_tracks(doc, index, sequence),
            TrackStrategy::DeclaredUid => declared_uid_tracks(doc, index, sequence),
            TrackStrategy::Direct => direct_tracks(doc, sequence),
        }
    }
}

/// The ordered video and audio tracks of a sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceTracks {
    pub video: Vec<ResolvedTrack>,
    pub audio: Vec<ResolvedTrack>,
    /// Strategy that produced the tracks, `None` when nothing was found.
    pub strategy: Option<TrackStrategy>,
}

impl SequenceTracks {
    /// All tracks, video first.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedTrack> {
        self.video.iter().chain(self.audio.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.video.is_empty() && self.audio.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct FoundTrack {
    kind: TrackKind,
    declared_index: Option<u32>,
    /// Position among the kind's tracks, `None` sorts last.
    sort_key: Option<u32>,
    node: NodeId,
}

/// Resolve the ordered tracks of a sequence.
///
/// Within a kind, tracks are sorted by declared index with index-less tracks
/// last, keeping document order among equals. Index-less tracks are numbered
/// after the highest declared index so numbers never collide.
pub fn resolve_tracks(doc: &Document, index: &ObjectIndex, sequence: NodeId) -> SequenceTracks {
    for strategy in TrackStrategy::ALL {
        let found = strategy.collect(doc, index, sequence);
        if found.is_empty() {
            continue;
        }
        debug!(
            "Resolved {} tracks of sequence node {} via {:?}",
            found.len(),
            sequence.0,
            strategy
        );
        return SequenceTracks {
            video: order(&found, TrackKind::Video),
            audio: order(&found, TrackKind::Audio),
            strategy: Some(strategy),
        };
    }
    SequenceTracks::default()
}

fn order(found: &[FoundTrack], kind: TrackKind) -> Vec<ResolvedTrack> {
    let mut seen = HashSet::new();
    let mut tracks: Vec<FoundTrack> = found
        .iter()
        .filter(|t| t.kind == kind && seen.insert(t.node))
        .copied()
        .collect();
    tracks.sort_by_key(|t| (t.sort_key.is_none(), t.sort_key));

    let mut next = tracks
        .iter()
        .filter_map(|t| t.declared_index)
        .max()
        .map_or(0, |max| max.saturating_add(1));
    tracks
        .into_iter()
        .map(|t| {
            let number = t.declared_index.unwrap_or_else(|| {
                let number = next;
                next = next.saturating_add(1);
                number
            });
            ResolvedTrack {
                kind: t.kind,
                declared_index: t.declared_index,
                number,
                node: t.node,
            }
        })
        .collect()
}

fn declared_index(doc: &Document, node: NodeId) -> Option<u32> {
    doc.attr(node, "Index")?.trim().parse().ok()
}

/// Group objects are referenced from a `First` or `Second` slot (the later
/// slot wins) or from the group entry itself.
fn group_target(doc: &Document, index: &ObjectIndex, entry: NodeId) -> Option<NodeId> {
    let slot_ref = ["First", "Second"]
        .iter()
        .filter_map(|slot| doc.child(entry, slot))
        .filter_map(|slot| reference_of(doc, slot))
        .last();
    let reference = slot_ref.or_else(|| reference_of(doc, entry))?;
    index.resolve(reference)
}

fn grouped_tracks(doc: &Document, index: &ObjectIndex, sequence: NodeId) -> Vec<FoundTrack> {
    let mut found = Vec::new();
    let Some(groups) = doc.child(sequence, TRACK_GROUPS) else {
        return found;
    };

    for entry in doc.children_named(groups, "TrackGroup") {
        let Some(group) = group_target(doc, index, entry) else {
            continue;
        };
        let Some(tracks) = doc.child_path(group, &["TrackGroup", "Tracks"]) else {
            continue;
        };
        for track in doc.children_named(tracks, "Track") {
            let Some(target) = index.resolve_node(doc, track) else {
                continue;
            };
            if let Some(kind) = TrackKind::from_clip_track_tag(doc.tag(target)) {
                let declared = declared_index(doc, track);
                found.push(FoundTrack {
                    kind,
                    declared_index: declared,
                    sort_key: declared,
                    node: target,
                });
            }
        }
    }
    found
}

fn declared_uid_tracks(doc: &Document, index: &ObjectIndex, sequence: NodeId) -> Vec<FoundTrack> {
    let Some(groups) = doc.child(sequence, TRACK_GROUPS) else {
        return Vec::new();
    };

    doc.descendants(groups)
        .filter(|&d| doc.tag(d) == "Track")
        .filter_map(|track| {
            let target = index.by_uid(doc.attr(track, "ObjectURef")?)?;
            let kind = TrackKind::from_clip_track_tag(doc.tag(target))?;
            let declared = declared_index(doc, track);
            Some(FoundTrack {
                kind,
                declared_index: declared,
                sort_key: declared,
                node: target,
            })
        })
        .collect()
}

fn direct_tracks(doc: &Document, sequence: NodeId) -> Vec<FoundTrack> {
    let mut video_seen = 0u32;
    let mut audio_seen = 0u32;

    doc.descendants(sequence)
        .filter_map(|node| {
            let kind = TrackKind::from_track_tag(doc.tag(node))?;
            let seen = match kind {
                TrackKind::Video => &mut video_seen,
                TrackKind::Audio => &mut audio_seen,
            };
            let position = *seen;
            *seen += 1;
            let declared = declared_index(doc, node);
            Some(FoundTrack {
                kind,
                declared_index: declared,
                sort_key: declared.or(Some(position)),
                node,
            })
        })
        .collect()
}

// ============================================================================
// Track Items
// ============================================================================

/// An item placed on a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackItem {
    /// An item with valid timing, in ticks local to its sequence.
    Placed { node: NodeId, start: u64, end: u64 },
    /// An item whose timing is missing or invalid.
    Malformed { node: NodeId, reason: &'static str },
}

/// Containers of item stubs on a clip track, most specific first.
const ITEM_CONTAINERS: [&[&str]; 3] = [
    &["ClipTrack", "ClipItems", "TrackItems"],
    &["ClipItems", "TrackItems"],
    &["TrackItems"],
];

/// List the items of a track in document order.
///
/// Stubs carrying a reference are resolved through the index; unresolvable
/// stubs are dropped. A stub without a reference is itself the item. Tracks
/// without a stub container hold their items inline.
pub fn track_items(doc: &Document, index: &ObjectIndex, track: NodeId) -> Vec<TrackItem> {
    let items: Vec<NodeId> = match ITEM_CONTAINERS
        .iter()
        .find_map(|path| doc.child_path(track, path))
    {
        Some(container) => doc
            .children_named(container, "TrackItem")
            .filter_map(|stub| match reference_of(doc, stub) {
                Some(reference) => {
                    let item = index.resolve(reference);
                    if item.is_none() {
                        debug!("Track item reference {reference} does not resolve");
                    }
                    item
                }
                None => Some(stub),
            })
            .collect(),
        None => doc
            .children(track)
            .filter(|&c| is_inline_item(doc.tag(c)))
            .collect(),
    };

    items
        .into_iter()
        .map(|node| match item_span(doc, node) {
            Ok((start, end)) => TrackItem::Placed { node, start, end },
            Err(reason) => TrackItem::Malformed { node, reason },
        })
        .collect()
}

fn is_inline_item(tag: &str) -> bool {
    tag.ends_with("TrackItem") || tag.eq_ignore_ascii_case("clipitem")
}

/// Read `(start, end)` ticks of an item.
///
/// Timing lives at `ClipTrackItem/TrackItem`, `TrackItem`, or directly on
/// the item, tried in that order.
pub fn item_span(doc: &Document, item: NodeId) -> Result<(u64, u64), &'static str> {
    let timing = doc
        .child_path(item, &["ClipTrackItem", "TrackItem"])
        .or_else(|| doc.child(item, "TrackItem"))
        .unwrap_or(item);

    let start = parse_ticks(doc.child_text(timing, "Start").ok_or("missing start")?)?;
    let end = parse_ticks(doc.child_text(timing, "End").ok_or("missing end")?)?;
    if end < start {
        return Err("end before start");
    }
    Ok((start, end))
}

fn parse_ticks(text: &str) -> Result<u64, &'static str> {
    let value: i64 = text.trim().parse().map_err(|_| "non-integer ticks")?;
    u64::try_from(value).map_err(|_| "negative ticks")
}
