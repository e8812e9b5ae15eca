//! Run scanning: splits a name into maximal printable and unprintable runs.
//!
//! Both scanners decode one scalar value at a time and report how many
//! *bytes* they consumed. A byte that does not start a valid UTF-8 sequence
//! is consumed on its own as unprintable, so scanning never fails.

use std::ops::{BitOr, BitOrAssign};
use unicode_general_category::{get_general_category, GeneralCategory};

/// Which quote-relevant characters appear in a printable run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct QuoteFlags(u8);

impl QuoteFlags {
    pub const NONE: QuoteFlags = QuoteFlags(0);
    pub const DOUBLE_QUOTE: QuoteFlags = QuoteFlags(1);
    pub const SINGLE_QUOTE: QuoteFlags = QuoteFlags(1 << 1);
    pub const BACKTICK: QuoteFlags = QuoteFlags(1 << 2);
    pub const BACKSLASH: QuoteFlags = QuoteFlags(1 << 3);
    pub const SPACE: QuoteFlags = QuoteFlags(1 << 4);

    pub const ALL: QuoteFlags = QuoteFlags(0b1_1111);

    pub fn from_bits(bits: u8) -> Self {
        QuoteFlags(bits & Self::ALL.0)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: QuoteFlags) -> bool {
        self.0 & other.0 == other.0
    }

    fn for_char(c: char) -> QuoteFlags {
        match c {
            '"' => Self::DOUBLE_QUOTE,
            '\'' => Self::SINGLE_QUOTE,
            '`' => Self::BACKTICK,
            '\\' => Self::BACKSLASH,
            ' ' => Self::SPACE,
            _ => Self::NONE,
        }
    }
}

impl BitOr for QuoteFlags {
    type Output = QuoteFlags;

    fn bitor(self, rhs: QuoteFlags) -> QuoteFlags {
        QuoteFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for QuoteFlags {
    fn bitor_assign(&mut self, rhs: QuoteFlags) {
        self.0 |= rhs.0;
    }
}

/// Decodes the scalar value at the start of `bytes`.
///
/// Returns the char and its encoded length, or `None` with the caller
/// expected to skip a single byte.
pub(crate) fn decode_char(bytes: &[u8]) -> Option<(char, usize)> {
    let end = bytes.len().min(4);
    let valid = match std::str::from_utf8(&bytes[..end]) {
        Ok(s) => s,
        Err(e) if e.valid_up_to() > 0 => {
            // valid_up_to is always on a char boundary
            std::str::from_utf8(&bytes[..e.valid_up_to()]).ok()?
        }
        Err(_) => return None,
    };
    let c = valid.chars().next()?;
    Some((c, c.len_utf8()))
}

/// Graphic characters plus the ASCII space.
///
/// Graphic means a letter, mark, number, punctuation or symbol in the
/// Unicode general category table, so unassigned code points never print.
/// The replacement character counts as unprintable: it is what a decode
/// failure looks like, and rendering it as text would hide the difference.
pub fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c == char::REPLACEMENT_CHARACTER {
        return false;
    }
    !matches!(
        get_general_category(c),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::PrivateUse
            | GeneralCategory::Surrogate
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

/// Length of the longest printable prefix, and the quote flags seen in it.
pub fn printable_run(bytes: &[u8]) -> (usize, QuoteFlags) {
    let mut flags = QuoteFlags::NONE;
    let mut i = 0;
    while i < bytes.len() {
        match decode_char(&bytes[i..]) {
            Some((c, size)) if is_printable(c) => {
                flags |= QuoteFlags::for_char(c);
                i += size;
            }
            _ => return (i, flags),
        }
    }
    (bytes.len(), flags)
}

/// Length of the longest prefix made of undecodable or unprintable chars.
pub fn unprintable_run(bytes: &[u8]) -> usize {
    let mut i = 0;
    while i < bytes.len() {
        match decode_char(&bytes[i..]) {
            Some((c, _)) if is_printable(c) => return i,
            Some((_, size)) => i += size,
            None => i += 1,
        }
    }
    bytes.len()
}
