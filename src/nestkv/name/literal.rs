//! Parsing of names given on the command line.
//!
//! The accepted syntax mirrors what `stringify` prints, so a rendered name can
//! be pasted back as an argument:
//!
//! - `0x[00ff]` is a binary literal,
//! - `[foo, 0x[00], 'a b', #7]` concatenates its items,
//! - anything else is taken verbatim as UTF-8.

use crate::error::{NestError, Result};

/// Converts a command-line argument into name bytes.
pub fn parse_name(input: &str) -> Result<Vec<u8>> {
    if let Some(bytes) = parse_hex_literal(input)? {
        return Ok(bytes);
    }
    if input.starts_with('[') && input.ends_with(']') && input.len() >= 2 {
        return parse_list(&input[1..input.len() - 1]);
    }
    Ok(input.as_bytes().to_vec())
}

/// Returns `None` when `input` is not shaped like `0x[...]`.
fn parse_hex_literal(input: &str) -> Result<Option<Vec<u8>>> {
    let Some(body) = input
        .strip_prefix("0x[")
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return Ok(None);
    };
    let digits: String = body.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&digits)
        .map(Some)
        .map_err(|e| NestError::InvalidName(format!("{}: {}", input, e)))
}

fn parse_list(body: &str) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut rest = body.trim_start();
    while !rest.is_empty() {
        let (item, tail) = next_item(rest)?;
        out.extend_from_slice(&item);
        rest = tail.trim_start();
        if let Some(after) = rest.strip_prefix(',') {
            rest = after.trim_start();
        } else if !rest.is_empty() {
            return Err(NestError::InvalidName(format!(
                "expected ',' between list items, found {:?}",
                rest
            )));
        }
    }
    Ok(out)
}

/// Splits the first list item off `s`, returning its bytes and the remainder.
fn next_item(s: &str) -> Result<(Vec<u8>, &str)> {
    if s.starts_with("0x[") {
        let end = s
            .find(']')
            .ok_or_else(|| NestError::InvalidName(format!("unterminated binary literal {:?}", s)))?;
        let bytes = parse_hex_literal(&s[..=end])?.unwrap_or_default();
        return Ok((bytes, &s[end + 1..]));
    }

    let mut chars = s.chars();
    match chars.next() {
        Some(q @ ('\'' | '`')) => {
            let body = &s[1..];
            let end = body
                .find(q)
                .ok_or_else(|| NestError::InvalidName(format!("unterminated {} string", q)))?;
            Ok((body[..end].as_bytes().to_vec(), &body[end + 1..]))
        }
        Some('"') => parse_escaped(&s[1..]),
        Some('#') => {
            let end = s.find([',', ']']).unwrap_or(s.len());
            let digits = s[1..end].trim();
            let n: u16 = digits
                .parse()
                .map_err(|_| NestError::InvalidName(format!("invalid byte value #{}", digits)))?;
            let byte = u8::try_from(n).map_err(|_| {
                NestError::InvalidName(format!("byte value must fit into 0..=255, got {}", n))
            })?;
            Ok((vec![byte], &s[end..]))
        }
        _ => {
            // stringify joins items with ", " and never leaves a space in a
            // bare item, so a lone ',' belongs to the item
            let end = s.find(", ").unwrap_or(s.len());
            Ok((s[..end].trim_end().as_bytes().to_vec(), &s[end..]))
        }
    }
}

/// Double-quoted string with `\"` and `\\` escapes; `s` starts after the
/// opening quote.
fn parse_escaped(s: &str) -> Result<(Vec<u8>, &str)> {
    let mut out = String::new();
    let mut iter = s.char_indices();
    while let Some((i, c)) = iter.next() {
        match c {
            '"' => return Ok((out.into_bytes(), &s[i + 1..])),
            '\\' => match iter.next() {
                Some((_, e @ ('"' | '\\'))) => out.push(e),
                Some((_, other)) => {
                    return Err(NestError::InvalidName(format!(
                        "unsupported escape \\{} in quoted string",
                        other
                    )))
                }
                None => break,
            },
            c => out.push(c),
        }
    }
    Err(NestError::InvalidName("unterminated \" string".to_string()))
}
