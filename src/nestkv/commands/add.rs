use crate::commands::{CmdMessage, CmdResult};
use crate::error::{NestError, Result};
use crate::path;
use crate::store::DataStore;

/// Creates every bucket along `path` that does not exist yet. A path that
/// already exists in full is reported at info level.
pub fn run<S: DataStore>(store: &mut S, path: &[Vec<u8>]) -> Result<CmdResult> {
    if path.is_empty() {
        return Err(NestError::InvalidArgs(
            "add requires at least one bucket".to_string(),
        ));
    }

    let created = store.update(|root| {
        let mut created = false;
        let mut bucket = root;
        for segment in path {
            created |= bucket.bucket(segment).is_none();
            bucket = bucket.create_bucket_if_not_exists(segment)?;
        }
        Ok(created)
    })?;

    let mut result = CmdResult::default();
    result.add_message(if created {
        CmdMessage::success(format!("Bucket ready: {}", path::display(path)))
    } else {
        CmdMessage::info(format!("Bucket already exists: {}", path::display(path)))
    });
    Ok(result)
}
