//! Trigger detection: decides whether the user is mid-way through a
//! `/command` and extracts the fragment typed after the slash.
//!
//! Only the text before the cursor is considered. The closest `/` to the
//! left of the cursor opens the trigger; everything between it and the cursor,
//! trimmed, is the fragment. There is no whitespace break: `"/foo bar"` with
//! the cursor at the end yields the fragment `"foo bar"`.

/// The character that opens a slash command.
pub const TRIGGER_CHAR: char = '/';

/// An open slash command found in an input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// Byte offset of the `/` that opened the trigger.
    pub slash: usize,
    /// Byte offset of the cursor the detector ran against (clamped).
    pub cursor: usize,
    /// Text between the slash and the cursor, trimmed.
    pub fragment: String,
}

impl Trigger {
    /// Byte range of `/fragment` in the input, ending at the cursor.
    pub fn span(&self) -> std::ops::Range<usize> {
        self.slash..self.cursor
    }
}

/// Detect an open trigger in `value` for a cursor at byte offset `cursor`.
///
/// Offsets past the end are clamped to the end; offsets inside a multi-byte
/// character move back to the previous character boundary.
pub fn detect(value: &str, cursor: usize) -> Option<Trigger> {
    let cursor = floor_char_boundary(value, cursor);
    let before = &value[..cursor];
    let slash = before.rfind(TRIGGER_CHAR)?;
    let fragment = before[slash + TRIGGER_CHAR.len_utf8()..].trim().to_string();
    Some(Trigger {
        slash,
        cursor,
        fragment,
    })
}

fn floor_char_boundary(value: &str, offset: usize) -> usize {
    let mut offset = offset.min(value.len());
    while !value.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
