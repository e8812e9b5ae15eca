//! Tokenization of names into text and binary segments.

use super::scan::{printable_run, unprintable_run, QuoteFlags};

/// Printable runs shorter than this are folded into the neighbouring binary
/// segment, unless they start the name.
pub const MIN_TEXT_RUN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(String, QuoteFlags),
    Binary(Vec<u8>),
}

impl Token {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Token::Text(s, _) => s.as_bytes(),
            Token::Binary(b) => b,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text(..))
    }

    /// Appends `bytes`, turning a text token into a binary one.
    fn extend_binary(&mut self, bytes: &[u8]) {
        match self {
            Token::Binary(b) => b.extend_from_slice(bytes),
            Token::Text(s, _) => {
                let mut b = std::mem::take(s).into_bytes();
                b.extend_from_slice(bytes);
                *self = Token::Binary(b);
            }
        }
    }
}

/// Splits `name` into alternating text and binary tokens.
///
/// Adjacent binary fragments are coalesced, and concatenating the bytes of
/// the returned tokens always reproduces `name`.
pub fn tokenize(name: &[u8]) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::with_capacity(1);
    let mut i = 0;
    while i < name.len() {
        let (size, flags) = printable_run(&name[i..]);
        if size > 0 {
            let run = &name[i..i + size];
            if size < MIN_TEXT_RUN && !tokens.is_empty() {
                extend_last(&mut tokens, run);
            } else {
                // the scanner only accepts runs that decode cleanly
                let text = String::from_utf8_lossy(run).into_owned();
                tokens.push(Token::Text(text, flags));
            }
        }

        i += size;
        if i == name.len() {
            break;
        }

        let size = unprintable_run(&name[i..]);
        let run = &name[i..i + size];
        if tokens.last().is_some_and(|t| !t.is_text()) {
            extend_last(&mut tokens, run);
        } else {
            tokens.push(Token::Binary(run.to_vec()));
        }
        i += size;
    }
    tokens
}

fn extend_last(tokens: &mut [Token], bytes: &[u8]) {
    if let Some(last) = tokens.last_mut() {
        last.extend_binary(bytes);
    }
}

/// Concatenates the bytes of `tokens` in order.
pub fn join_bytes(tokens: &[Token]) -> Vec<u8> {
    tokens.iter().flat_map(|t| t.as_bytes()).copied().collect()
}
