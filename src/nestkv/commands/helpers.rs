use crate::error::Result;
use crate::path;
use crate::store::Bucket;
use regex::bytes::Regex;

/// Name filter built from an optional `--match` pattern.
///
/// The pattern is matched against raw name bytes, so it can select
/// binary names (`(?-u)\x00`) as well as text.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    pattern: Option<Regex>,
}

impl NameFilter {
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        let pattern = pattern.map(Regex::new).transpose()?;
        Ok(Self { pattern })
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn matches(&self, name: &[u8]) -> bool {
        self.pattern.as_ref().map_or(true, |re| re.is_match(name))
    }
}

/// Resolves `path` for reading inside a view transaction.
pub fn bucket_at<'a>(root: &'a Bucket, path: &[Vec<u8>]) -> Result<&'a Bucket> {
    path::resolve(root, path)
}

/// Resolves `path` for writing inside an update transaction.
pub fn bucket_at_mut<'a>(root: &'a mut Bucket, path: &[Vec<u8>]) -> Result<&'a mut Bucket> {
    path::resolve(root, path)
}
