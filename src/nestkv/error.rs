use thiserror::Error;

#[derive(Error, Debug)]
pub enum NestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    /// A path segment has no matching child bucket. `prefix` is `None` when
    /// the lookup failed directly below the root bucket.
    #[error("{}", path_not_found(.prefix, .missing))]
    PathNotFound {
        prefix: Option<String>,
        missing: String,
    },

    #[error("bucket {0} does not exist")]
    BucketNotFound(String),

    #[error("incompatible value: {0}")]
    IncompatibleValue(String),

    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("value too large: {0} bytes")]
    ValueTooLarge(usize),

    #[error("unsupported format {0:?}, expected one of: binary, stringify, text, hex, HEX")]
    UnsupportedMode(String),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("database {0} does not exist")]
    DatabaseMissing(String),

    #[error("database is opened in read-only mode")]
    ReadOnly,

    #[error("timed out after {0}ms waiting for the database lock")]
    Timeout(u64),

    #[error("invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),
}

fn path_not_found(prefix: &Option<String>, missing: &str) -> String {
    match prefix {
        Some(prefix) => format!(
            "invalid path, bucket {} does not contain bucket {}",
            prefix, missing
        ),
        None => format!(
            "invalid path, root bucket does not contain bucket {}",
            missing
        ),
    }
}

pub type Result<T> = std::result::Result<T, NestError>;
