//! Line splitting and fixed-width cell helpers.

use std::borrow::Cow;

/// Marker appended to lines cut down by [`truncate`].
pub const ELLIPSIS: &str = "...";

/// Narrowest column the table renderer will draw: one character plus the ellipsis.
pub const MIN_COLUMN_WIDTH: usize = ELLIPSIS.len() + 1;

/// Split a blob on `\n` boundaries.
///
/// A trailing newline yields a trailing empty line, and an empty blob yields
/// a single empty line. `\r` is left in place.
pub fn split_lines(blob: &[u8]) -> impl Iterator<Item = &[u8]> {
    blob.split(|&b| b == b'\n')
}

/// Cut `line` down to at most `width` characters.
///
/// Lines that fit are returned untouched. Longer lines keep their first
/// `width - 3` characters followed by [`ELLIPSIS`], for a total of exactly
/// `width`. Below three columns only the leading part of the ellipsis fits.
pub fn truncate(line: &str, width: usize) -> Cow<'_, str> {
    if line.chars().count() <= width {
        return Cow::Borrowed(line);
    }
    if width < ELLIPSIS.len() {
        return Cow::Owned(ELLIPSIS[..width].to_string());
    }

    let mut out: String = line.chars().take(width - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    Cow::Owned(out)
}

/// Right-pad `cell` with spaces to `width` characters.
///
/// Cells already at or beyond `width` are returned as-is.
pub fn pad(cell: &str, width: usize) -> String {
    format!("{cell:<width$}")
}
