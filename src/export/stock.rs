//! Title and stock-ID extraction from clip names.
//!
//! Stock libraries bake their catalogue number into the file name. The rules
//! below recover a human title and that number for the export columns:
//!
//! | Name                                   | Title        | Stock ID      |
//! |----------------------------------------|--------------|---------------|
//! | `Artlist_Music_Sunrise_ID-123456.wav`  | `Sunrise`    | `ID-123456.wav` |
//! | `Imago_98765432`                       | (empty)      | `98765432`    |
//! | `City Aerial 1234567`                  | `City Aerial`| `1234567`     |
//! | `Drone_Harbour.mov`                    | `Harbour`    | (empty)       |

use crate::util::split_extension;

/// Extensions stripped from titles.
const MEDIA_EXTENSIONS: [&str; 10] = [
    "mp4", "mov", "m4v", "avi", "mxf", "mkv", "mp3", "wav", "aif", "aiff",
];

/// Minimum length of a trailing numeric ID.
const MIN_ID_DIGITS: usize = 6;

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Derive `(title, stock_id)` from a clip name.
///
/// Both parts are trimmed; either may be empty.
///
/// ```
/// use flatcut::export::derive_title_and_stock;
///
/// assert_eq!(
///     derive_title_and_stock("Artlist_Music_Sunrise_ID-123456"),
///     ("Sunrise".to_string(), "ID-123456".to_string())
/// );
/// assert_eq!(
///     derive_title_and_stock("Colourbox_445566"),
///     (String::new(), "445566".to_string())
/// );
/// ```
pub fn derive_title_and_stock(name: &str) -> (String, String) {
    let lower = name.to_lowercase();
    let is_artlist = lower.contains("artlist");
    let mut title = name;
    let mut stock_id = "";

    if is_artlist && (name.contains("_id-") || name.contains("_ID-")) {
        let parts: Vec<&str> = name.split('_').collect();
        if parts.len() >= 4 {
            title = parts[2];
            stock_id = parts[parts.len() - 1];
        }
    } else if lower.contains("imago") || lower.contains("colourbox") {
        let mut parts = name.split('_');
        if let Some(id) = parts.nth(1)
            && is_digits(id)
        {
            stock_id = id;
            title = "";
        }
    }

    if stock_id.is_empty() {
        for separator in ['_', ' '] {
            if let Some((head, id)) = name.rsplit_once(separator)
                && is_digits(id)
                && id.len() >= MIN_ID_DIGITS
            {
                title = head;
                stock_id = id;
                break;
            }
        }
    }

    let (base, ext) = split_extension(title);
    if ext.is_some_and(|e| MEDIA_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str())) {
        title = base;
    }

    if !is_artlist
        && stock_id.is_empty()
        && let Some((_, rest)) = base.split_once('_')
        && !rest.trim().is_empty()
    {
        title = rest;
    }

    (title.trim().to_string(), stock_id.trim().to_string())
}
