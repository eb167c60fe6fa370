//! Tick to timecode conversion at a fixed 24 fps.
//!
//! Project files store every instant as an integer tick count with
//! [`TICKS_PER_SECOND`] ticks per second. Exported timecodes are whole
//! seconds (`HH:MM:SS`); the leftover fraction is rounded to the nearest
//! frame (exact halves to the even frame) and a clip sitting at frame 13 or
//! later is pushed to the next second.

/// Ticks per second of the project time base.
pub const TICKS_PER_SECOND: u64 = 254_016_000_000;

/// Fixed export frame rate.
pub const FRAMES_PER_SECOND: u64 = 24;

/// Rounded frame at which the second is rounded up.
pub const ROUND_UP_FRAME: u64 = 13;

/// Ticks in one frame at [`FRAMES_PER_SECOND`].
pub const TICKS_PER_FRAME: u64 = TICKS_PER_SECOND / FRAMES_PER_SECOND;

/// Convert a tick count to `HH:MM:SS`.
///
/// Hours are not wrapped at 24.
///
/// ```
/// use flatcut::timecode::{ticks_to_timecode, TICKS_PER_SECOND};
///
/// assert_eq!(ticks_to_timecode(0), "00:00:00");
/// assert_eq!(ticks_to_timecode(TICKS_PER_SECOND), "00:00:01");
/// assert_eq!(ticks_to_timecode(3_725 * TICKS_PER_SECOND), "01:02:05");
/// ```
pub fn ticks_to_timecode(ticks: u64) -> String {
    format_seconds(rounded_seconds(ticks))
}

/// Whole seconds of a tick count after frame rounding.
pub fn rounded_seconds(ticks: u64) -> u64 {
    let whole = ticks / TICKS_PER_SECOND;
    if nearest_frame(ticks % TICKS_PER_SECOND) >= ROUND_UP_FRAME {
        whole + 1
    } else {
        whole
    }
}

/// Nearest whole frame of a sub-second tick remainder, ties to even.
fn nearest_frame(remainder: u64) -> u64 {
    let scaled = remainder * FRAMES_PER_SECOND;
    let frames = scaled / TICKS_PER_SECOND;
    let twice_rest = (scaled % TICKS_PER_SECOND) * 2;
    if twice_rest > TICKS_PER_SECOND || (twice_rest == TICKS_PER_SECOND && frames % 2 == 1) {
        frames + 1
    } else {
        frames
    }
}

/// Format whole seconds as zero-padded `HH:MM:SS`.
pub fn format_seconds(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

/// Parse `HH:MM:SS` back to whole seconds.
///
/// Returns `None` unless the input is exactly three colon-separated groups of
/// two or more digits with minutes and seconds below 60.
pub fn timecode_to_seconds(timecode: &str) -> Option<u64> {
    let mut parts = timecode.split(':');
    let (h, m, s) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let field = |part: &str| -> Option<u64> {
        if part.len() < 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        part.parse().ok()
    };
    let (h, m, s) = (field(h)?, field(m)?, field(s)?);
    if m >= 60 || s >= 60 {
        return None;
    }
    Some(h * 3600 + m * 60 + s)
}
