//! # Nestkv Architecture
//!
//! Nestkv is a **library for inspecting and editing nested bucket stores**, with
//! a command-line client on top. Bucket and key names are arbitrary byte
//! strings, so most of the work is in showing binary names to a person without
//! losing information, and in reading them back from the command line.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (name literals → bytes)                │
//! │  - Validates which actions accept a key                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per action: list, get, set, add, delete, stat │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait with view/update transactions            │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two modules sit beside the stack and are used by every layer:
//!
//! - [`name`]: tokenizing and rendering byte-string names, and parsing name
//!   literals such as `0x[00ff]` or `[foo, 0x[00]]`.
//! - [`path`]: walking a bucket path inside a transaction, with errors that
//!   name the exact segment that is missing.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments and returns
//! `Result<CmdResult>` (or streams through a callback). It never writes to
//! stdout/stderr and never calls `std::process::exit`.
//!
//! ## Testing Strategy
//!
//! 1. **Names and paths**: exhaustive unit tests of rendering, plus property
//!    tests in `tests/` for the invariants that must hold for any input.
//! 2. **Commands** (`commands/*.rs`): business logic against `InMemoryStore`.
//! 3. **API** (`api.rs`): dispatch and argument validation.
//! 4. **Store** (`store/`): persistence, locking and rollback on a temp dir.
//! 5. **CLI**: end-to-end runs of the binary with `assert_cmd`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each action
//! - [`store`]: Bucket tree, storage abstraction and implementations
//! - [`name`]: Name tokenizing, rendering and parsing
//! - [`path`]: Bucket path resolution
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod name;
pub mod path;
pub mod store;
