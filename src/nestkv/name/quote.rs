//! Wrapper selection for text runs in `stringify` output.

use super::scan::QuoteFlags;

/// How a text run is wrapped when stringified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    Bare,
    Single,
    Backtick,
    Double,
    /// Double quotes with `"` and `\` backslash-escaped.
    Escaped,
}

/// Picks the first style in priority order that the run's contents allow.
pub fn select(flags: QuoteFlags) -> QuoteStyle {
    if flags.is_empty() {
        QuoteStyle::Bare
    } else if !flags.contains(QuoteFlags::SINGLE_QUOTE) {
        QuoteStyle::Single
    } else if !flags.contains(QuoteFlags::BACKTICK) {
        QuoteStyle::Backtick
    } else if !flags.contains(QuoteFlags::DOUBLE_QUOTE) && !flags.contains(QuoteFlags::BACKSLASH)
    {
        QuoteStyle::Double
    } else {
        QuoteStyle::Escaped
    }
}

impl QuoteStyle {
    pub fn apply(self, text: &str) -> String {
        match self {
            QuoteStyle::Bare => text.to_string(),
            QuoteStyle::Single => format!("'{}'", text),
            QuoteStyle::Backtick => format!("`{}`", text),
            QuoteStyle::Double => format!("\"{}\"", text),
            QuoteStyle::Escaped => {
                let mut out = String::with_capacity(text.len() + 2);
                out.push('"');
                for c in text.chars() {
                    if c == '"' || c == '\\' {
                        out.push('\\');
                    }
                    out.push(c);
                }
                out.push('"');
                out
            }
        }
    }
}

/// Quotes `text` according to `flags`.
pub fn quote(text: &str, flags: QuoteFlags) -> String {
    select(flags).apply(text)
}
