//! # Names
//!
//! Bucket and key names are arbitrary byte strings. This module turns them
//! into something a person can read without losing the ability to tell two
//! names apart.
//!
//! ```text
//! bytes ──► scan (printable / unprintable runs)
//!       ──► token (Text | Binary, short runs folded)
//!       ──► render (stringify, text, hex, HEX, binary)
//! ```
//!
//! A name that is entirely printable renders as itself (`str`), quoted when it
//! contains spaces or quote characters (`'foo bar'`). Binary names render as
//! hex literals (`0x[00ff]`), and mixed names as a list of segments
//! (`[str, 0x[0000]]`).
//!
//! [`literal::parse_name`] goes the other way and accepts the same notation on
//! the command line.

pub mod literal;
pub mod quote;
pub mod render;
pub mod scan;
pub mod token;

pub use literal::parse_name;
pub use render::{render, stringify, text, RenderMode, Rendered};
pub use token::{tokenize, Token};
