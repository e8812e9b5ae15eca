use crate::commands::helpers::{bucket_at, NameFilter};
use crate::commands::{CmdResult, Record};
use crate::error::Result;
use crate::name::{render, RenderMode};
use crate::store::DataStore;

/// Reads the value of `key` in the bucket at `path`.
///
/// A missing key is not an error; the result simply carries no value.
pub fn value<S: DataStore>(
    store: &S,
    path: &[Vec<u8>],
    key: &[u8],
    mode: RenderMode,
) -> Result<CmdResult> {
    store.view(|root| {
        let bucket = bucket_at(root, path)?;
        let result = CmdResult::default();
        Ok(match bucket.get(key) {
            Some(v) => result.with_value(render(v, mode)),
            None => result,
        })
    })
}

/// Streams every key/value pair at `path` whose key passes `filter`.
pub fn records<S, F>(
    store: &S,
    path: &[Vec<u8>],
    filter: &NameFilter,
    mode: RenderMode,
    mut emit: F,
) -> Result<usize>
where
    S: DataStore,
    F: FnMut(Record) -> Result<()>,
{
    store.view(|root| {
        let bucket = bucket_at(root, path)?;
        let mut count = 0;
        for (k, v) in bucket.keys().filter(|(k, _)| filter.matches(k)) {
            emit(Record {
                key: render(k, mode),
                value: render(v, mode),
            })?;
            count += 1;
        }
        Ok(count)
    })
}
