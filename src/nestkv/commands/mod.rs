use crate::name::Rendered;
use crate::store::{BucketStats, BucketStructure, DbStats};
use serde::Serialize;

pub mod add;
pub mod delete;
pub mod get;
pub mod helpers;
pub mod list;
pub mod set;
pub mod stat;

/// Where a command operates: a bucket path from the root, plus an optional
/// key inside the bucket at its end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub bucket: Vec<Vec<u8>>,
    pub key: Option<Vec<u8>>,
}

impl Location {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn bucket<I, N>(path: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: AsRef<[u8]>,
    {
        Self {
            bucket: path.into_iter().map(|n| n.as_ref().to_vec()).collect(),
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl AsRef<[u8]>) -> Self {
        self.key = Some(key.as_ref().to_vec());
        self
    }
}

/// One key/value pair emitted by `get` without a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub key: Rendered,
    pub value: Rendered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Outcome of a non-streaming command.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub value: Option<Rendered>,
    pub db_stats: Option<DbStats>,
    pub bucket_stats: Option<BucketStats>,
    pub structure: Option<BucketStructure>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_value(mut self, value: Rendered) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_db_stats(mut self, stats: DbStats) -> Self {
        self.db_stats = Some(stats);
        self
    }

    pub fn with_bucket_stats(mut self, stats: BucketStats) -> Self {
        self.bucket_stats = Some(stats);
        self
    }

    pub fn with_structure(mut self, structure: BucketStructure) -> Self {
        self.structure = Some(structure);
        self
    }
}
