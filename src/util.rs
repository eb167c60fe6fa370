//! Text decoding and file-name helpers shared by the reader, resolver and exporters.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<?xml encoding="..."?>`)
/// 3. Falls back to Windows-1252
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Read the `encoding="..."` pseudo-attribute from an XML declaration, if any.
pub fn xml_declared_encoding(bytes: &[u8]) -> Option<&str> {
    let head = &bytes[..bytes.len().min(256)];
    if !head.starts_with(b"<?xml") {
        return None;
    }
    let decl_end = memchr::memmem::find(head, b"?>")?;
    let decl = std::str::from_utf8(&head[..decl_end]).ok()?;
    let start = decl.find("encoding=")? + "encoding=".len();
    let rest = &decl[start..];
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let rest = &rest[1..];
    rest.find(quote).map(|end| &rest[..end])
}

/// Final path component of a filesystem-style path or `file://` URL.
///
/// Both `/` and `\` are treated as separators since projects move between
/// macOS and Windows machines.
///
/// ```
/// use flatcut::util::basename;
///
/// assert_eq!(basename("/Volumes/Media/clip.mov"), "clip.mov");
/// assert_eq!(basename("C:\\Footage\\shot 01.mxf"), "shot 01.mxf");
/// assert_eq!(basename("file://localhost/Users/me/a.wav"), "a.wav");
/// ```
pub fn basename(path: &str) -> &str {
    let path = path.trim().trim_end_matches(['/', '\\']);
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Lowercased extension of a file name, without the dot.
///
/// Returns `None` when the name has no extension or only a leading dot.
pub fn extension(name: &str) -> Option<String> {
    let file = basename(name);
    let dot = file.rfind('.')?;
    if dot == 0 || dot + 1 == file.len() {
        return None;
    }
    Some(file[dot + 1..].to_ascii_lowercase())
}

/// Split a file name into stem and extension (`"a.b.mov"` → `("a.b", Some("mov"))`).
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < name.len() => (&name[..dot], Some(&name[dot + 1..])),
        _ => (name, None),
    }
}

// ============================================================================
// Media Kind Detection
// ============================================================================

/// Coarse media kind inferred from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Still image (png, jpeg, psd, ...)
    Image,
    /// Video container (mp4, mov, mxf, ...)
    Video,
    /// Audio file (wav, mp3, aiff, ...)
    Audio,
}

impl MediaKind {
    /// Detect the media kind from a file name's extension.
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = extension(name)?;
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tif" | "tiff" | "psd" | "ai" | "webp"
            | "heic" | "exr" | "dpx" => Some(MediaKind::Image),
            "mp4" | "mov" | "m4v" | "avi" | "mxf" | "mkv" | "webm" | "mts" | "m2ts" | "r3d"
            | "braw" | "mpg" | "mpeg" => Some(MediaKind::Video),
            "wav" | "mp3" | "aif" | "aiff" | "m4a" | "aac" | "flac" | "ogg" => {
                Some(MediaKind::Audio)
            }
            _ => None,
        }
    }
}
