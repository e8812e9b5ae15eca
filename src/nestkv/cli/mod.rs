//! # CLI Layer
//!
//! This module is **one possible client** for nestkv. It is the only place
//! that:
//! - Parses arguments
//! - Reads stdin and writes stdout/stderr
//! - Installs the tracing subscriber
//! - Turns configuration and flags into store options
//!
//! ## Structure
//!
//! - `setup`: clap definitions
//! - `commands`: `run()`, context setup and one `handle_*` per action
//! - `print`: output formatting (raw bytes, JSON lines, tables)
//!
//! Argument validation that does not need the database (render mode, name
//! literals) happens before the database is opened.

mod commands;
mod print;
mod setup;

pub use commands::run;
