use super::{Bucket, DataStore, DbStats};
use crate::error::{NestError, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How a [`FileStore`] is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// How long a writer waits for the lock. Zero waits forever.
    pub timeout: Duration,
    pub read_only: bool,
    /// Permission bits for a newly written database file (unix only).
    pub file_mode: u32,
    /// Whether a missing database file may be created.
    pub create: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            read_only: false,
            file_mode: 0o600,
            create: false,
        }
    }
}

pub struct FileStore {
    path: PathBuf,
    options: StoreOptions,
}

/// Exclusive advisory lock, released on drop.
struct WriteLock {
    file: File,
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(error = %e, "failed to release database lock");
        }
    }
}

impl FileStore {
    /// Opens the database at `path`.
    ///
    /// A missing file is an error unless `options.create` is set and the
    /// store is writable; the file itself is only written by the first
    /// committed update.
    pub fn open(path: impl Into<PathBuf>, options: StoreOptions) -> Result<Self> {
        let path = path.into();
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => {
                return Err(NestError::Store(format!(
                    "{} is a directory",
                    path.display()
                )))
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if !options.create || options.read_only {
                    return Err(NestError::DatabaseMissing(path.display().to_string()));
                }
                debug!(path = %path.display(), "database will be created on first write");
            }
            Err(e) => return Err(NestError::Io(e)),
        }
        debug!(path = %path.display(), read_only = options.read_only, "opened database");
        Ok(Self { path, options })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn acquire_lock(&self) -> Result<WriteLock> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(self.lock_path())?;

        let started = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    debug!(waited_ms = started.elapsed().as_millis() as u64, "acquired write lock");
                    return Ok(WriteLock { file });
                }
                Err(_)
                    if self.options.timeout.is_zero()
                        || started.elapsed() < self.options.timeout =>
                {
                    thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(_) => {
                    return Err(NestError::Timeout(self.options.timeout.as_millis() as u64));
                }
            }
        }
    }

    fn load(&self) -> Result<Bucket> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Bucket::new()),
            Err(e) => return Err(NestError::Io(e)),
        };
        if content.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Bucket::new());
        }
        Ok(serde_json::from_slice(&content)?)
    }

    fn save(&self, root: &Bucket) -> Result<()> {
        let content = serde_json::to_vec_pretty(root)?;
        write_atomic(&self.path, &content, self.options.file_mode)?;
        debug!(path = %self.path.display(), bytes = content.len(), "committed");
        Ok(())
    }
}

/// Replaces `target` with `content` through a temp file in the same
/// directory, so the document is either the old or the new tree. The temp
/// file never outlives a failed write.
fn write_atomic(target: &Path, content: &[u8], mode: u32) -> Result<()> {
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let tmp_path = dir.join(format!(".nestkv-{}.tmp", Uuid::new_v4()));

    let written = fs::write(&tmp_path, content)
        .map_err(NestError::Io)
        .and_then(|()| set_mode(&tmp_path, mode))
        .and_then(|()| fs::rename(&tmp_path, target).map_err(NestError::Io));
    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

impl DataStore for FileStore {
    fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Bucket) -> Result<T>,
    {
        let root = self.load()?;
        f(&root)
    }

    fn update<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Bucket) -> Result<T>,
    {
        if self.options.read_only {
            return Err(NestError::ReadOnly);
        }
        let _lock = self.acquire_lock()?;
        // reload under the lock so concurrent writers are not lost
        let mut root = self.load()?;
        let out = f(&mut root)?;
        self.save(&root)?;
        Ok(out)
    }

    fn db_stats(&self) -> Result<DbStats> {
        let (file_size, modified) = match fs::metadata(&self.path) {
            Ok(meta) => (
                meta.len(),
                meta.modified().ok().map(DateTime::<Utc>::from),
            ),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (0, None),
            Err(e) => return Err(NestError::Io(e)),
        };
        let root = self.view(|root| Ok(root.stats()))?;
        Ok(DbStats {
            path: self.path.display().to_string(),
            file_size,
            modified,
            root,
        })
    }
}
