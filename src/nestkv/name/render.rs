//! Rendering of names for display.

use super::quote::quote;
use super::token::{tokenize, Token};
use crate::error::NestError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Output encoding selected with `--format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// Raw bytes, unmodified.
    #[default]
    Binary,
    /// Text runs quoted where needed so names stay unambiguous.
    Stringify,
    /// Text runs as-is.
    Text,
    /// Whole name as lowercase hex digits.
    Hex,
    /// Whole name as uppercase hex digits.
    UpperHex,
}

impl FromStr for RenderMode {
    type Err = NestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // case matters: "hex" and "HEX" are different modes
        match s {
            "binary" => Ok(RenderMode::Binary),
            "stringify" => Ok(RenderMode::Stringify),
            "text" => Ok(RenderMode::Text),
            "hex" => Ok(RenderMode::Hex),
            "HEX" => Ok(RenderMode::UpperHex),
            other => Err(NestError::UnsupportedMode(other.to_string())),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RenderMode::Binary => "binary",
            RenderMode::Stringify => "stringify",
            RenderMode::Text => "text",
            RenderMode::Hex => "hex",
            RenderMode::UpperHex => "HEX",
        };
        f.write_str(s)
    }
}

/// A rendered name: either raw bytes or display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Rendered {
    Binary(Vec<u8>),
    Text(String),
}

impl Rendered {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Rendered::Binary(b) => b,
            Rendered::Text(s) => s.as_bytes(),
        }
    }
}

/// `0x[...]` literal with lowercase digits.
pub fn hex_literal(bytes: &[u8]) -> String {
    format!("0x[{}]", hex::encode(bytes))
}

fn render_token(token: &Token, stringify: bool) -> String {
    match token {
        Token::Text(s, flags) if stringify => quote(s, *flags),
        Token::Text(s, _) => s.clone(),
        Token::Binary(b) => hex_literal(b),
    }
}

/// Renders tokens in `stringify` (`true`) or `text` (`false`) style.
///
/// A single token renders on its own, anything else as a bracketed list.
pub fn render_tokens(tokens: &[Token], stringify: bool) -> String {
    match tokens {
        [single] => render_token(single, stringify),
        _ => {
            let parts: Vec<String> = tokens
                .iter()
                .map(|t| render_token(t, stringify))
                .collect();
            format!("[{}]", parts.join(", "))
        }
    }
}

pub fn stringify(name: &[u8]) -> String {
    render_tokens(&tokenize(name), true)
}

pub fn text(name: &[u8]) -> String {
    render_tokens(&tokenize(name), false)
}

/// Renders a whole name in `mode`. Hex and binary modes skip tokenization.
pub fn render(name: &[u8], mode: RenderMode) -> Rendered {
    match mode {
        RenderMode::Binary => Rendered::Binary(name.to_vec()),
        RenderMode::Stringify => Rendered::Text(stringify(name)),
        RenderMode::Text => Rendered::Text(text(name)),
        RenderMode::Hex => Rendered::Text(hex::encode(name)),
        RenderMode::UpperHex => Rendered::Text(hex::encode_upper(name)),
    }
}
