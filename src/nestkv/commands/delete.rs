use crate::commands::helpers::bucket_at_mut;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NestError, Result};
use crate::path;
use crate::store::DataStore;

/// Deletes key `name` from the bucket at `path`. Deleting a missing key
/// succeeds with a warning.
pub fn key<S: DataStore>(store: &mut S, path: &[Vec<u8>], name: &[u8]) -> Result<CmdResult> {
    let existed = store.update(|root| {
        let bucket = bucket_at_mut(root, path)?;
        let existed = bucket.get(name).is_some();
        bucket.delete(name)?;
        Ok(existed)
    })?;

    let name = crate::name::stringify(name);
    let mut result = CmdResult::default();
    result.add_message(if existed {
        CmdMessage::success(format!("Deleted key {}", name))
    } else {
        CmdMessage::warning(format!("Key {} not found, nothing deleted", name))
    });
    Ok(result)
}

/// Deletes the last bucket of `path`, with everything inside it.
pub fn bucket<S: DataStore>(store: &mut S, path: &[Vec<u8>]) -> Result<CmdResult> {
    let Some((last, parent)) = path.split_last() else {
        return Err(NestError::InvalidArgs(
            "delete requires a bucket or a key".to_string(),
        ));
    };

    store.update(|root| bucket_at_mut(root, parent)?.delete_bucket(last))?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Deleted bucket {}",
        path::display(path)
    )));
    Ok(result)
}
