//! Clip type and stock provider heuristics for output rows.
//!
//! These rules only look at a clip's name. They never fail: an unrecognised
//! name is a plain video clip with no known source.

use std::fmt;

use crate::tracks::TrackKind;
use crate::util::MediaKind;

/// Coarse category of a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum ClipType {
    #[default]
    Video,
    Audio,
    Image,
    Graphic,
    Title,
}

impl ClipType {
    pub fn as_str(self) -> &'static str {
        match self {
            ClipType::Video => "Video",
            ClipType::Audio => "Audio",
            ClipType::Image => "Image",
            ClipType::Graphic => "Graphic",
            ClipType::Title => "Title",
        }
    }
}

impl fmt::Display for ClipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stock footage and music libraries recognised in clip names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum StockProvider {
    Artlist,
    Imago,
    Colourbox,
    Shutterstock,
    Getty,
    Pond5,
    Storyblocks,
    Envato,
}

impl StockProvider {
    /// Providers in matching order.
    pub const ALL: [StockProvider; 8] = [
        StockProvider::Artlist,
        StockProvider::Imago,
        StockProvider::Colourbox,
        StockProvider::Shutterstock,
        StockProvider::Getty,
        StockProvider::Pond5,
        StockProvider::Storyblocks,
        StockProvider::Envato,
    ];

    /// Lowercase token searched for in names.
    pub fn token(self) -> &'static str {
        match self {
            StockProvider::Artlist => "artlist",
            StockProvider::Imago => "imago",
            StockProvider::Colourbox => "colourbox",
            StockProvider::Shutterstock => "shutterstock",
            StockProvider::Getty => "getty",
            StockProvider::Pond5 => "pond5",
            StockProvider::Storyblocks => "storyblocks",
            StockProvider::Envato => "envato",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StockProvider::Artlist => "Artlist",
            StockProvider::Imago => "Imago",
            StockProvider::Colourbox => "Colourbox",
            StockProvider::Shutterstock => "Shutterstock",
            StockProvider::Getty => "Getty",
            StockProvider::Pond5 => "Pond5",
            StockProvider::Storyblocks => "Storyblocks",
            StockProvider::Envato => "Envato",
        }
    }

    /// First provider whose token appears in `name`, ignoring case.
    pub fn detect(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::ALL.into_iter().find(|p| lower.contains(p.token()))
    }
}

impl fmt::Display for StockProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a clip name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub clip_type: ClipType,
    pub source: Option<StockProvider>,
}

/// Policy that tags each output row from its name and track kind.
///
/// Closures `Fn(&str, TrackKind) -> Classification` implement this trait, so
/// a custom policy can be passed straight to
/// [`TimelineFlattener::with_classifier`](crate::TimelineFlattener::with_classifier).
pub trait Classifier {
    fn classify(&self, name: &str, kind: TrackKind) -> Classification;
}

impl<F> Classifier for F
where
    F: Fn(&str, TrackKind) -> Classification,
{
    fn classify(&self, name: &str, kind: TrackKind) -> Classification {
        self(name, kind)
    }
}

/// Default name-based classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl Classifier for HeuristicClassifier {
    fn classify(&self, name: &str, kind: TrackKind) -> Classification {
        Classification {
            clip_type: clip_type(name, kind),
            source: StockProvider::detect(name),
        }
    }
}

fn clip_type(name: &str, kind: TrackKind) -> ClipType {
    if kind == TrackKind::Audio {
        return ClipType::Audio;
    }

    let sentinel = name.trim().to_lowercase();
    match sentinel.as_str() {
        "graphic" | "graphics" => return ClipType::Graphic,
        "title" | "text" => return ClipType::Title,
        _ => {}
    }

    match MediaKind::from_name(name.trim()) {
        Some(MediaKind::Image) => ClipType::Image,
        _ => ClipType::Video,
    }
}
