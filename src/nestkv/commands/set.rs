use crate::commands::helpers::bucket_at_mut;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::name;
use crate::path;
use crate::store::DataStore;
use tracing::debug;

/// Stores `value` under `key` in the existing bucket at `path`.
pub fn run<S: DataStore>(
    store: &mut S,
    path: &[Vec<u8>],
    key: &[u8],
    value: &[u8],
) -> Result<CmdResult> {
    store.update(|root| bucket_at_mut(root, path)?.put(key, value))?;
    debug!(bytes = value.len(), "stored value");

    let mut result = CmdResult::default();
    let location = if path.is_empty() {
        "root bucket".to_string()
    } else {
        path::display(path)
    };
    result.add_message(CmdMessage::success(format!(
        "Set {} in {} ({} bytes)",
        name::stringify(key),
        location,
        value.len()
    )));
    Ok(result)
}
