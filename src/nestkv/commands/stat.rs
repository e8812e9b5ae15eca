use crate::commands::helpers::bucket_at;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DataStore;

/// Database statistics for an empty path, bucket statistics otherwise.
pub fn stat<S: DataStore>(store: &S, path: &[Vec<u8>]) -> Result<CmdResult> {
    if path.is_empty() {
        return Ok(CmdResult::default().with_db_stats(store.db_stats()?));
    }
    let stats = store.view(|root| Ok(bucket_at(root, path)?.stats()))?;
    Ok(CmdResult::default().with_bucket_stats(stats))
}

/// Recursive structure of the bucket at `path`.
pub fn info<S: DataStore>(store: &S, path: &[Vec<u8>]) -> Result<CmdResult> {
    let structure = store.view(|root| {
        let label = path.last().map(Vec::as_slice).unwrap_or(&b"root"[..]);
        Ok(bucket_at(root, path)?.inspect(label))
    })?;
    Ok(CmdResult::default().with_structure(structure))
}
