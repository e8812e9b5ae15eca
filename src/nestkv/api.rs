//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for all nestkv operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Normalizes inputs**: name literals become bytes, `--match` patterns
//!   become compiled filters
//! - **Validates argument combinations** (which actions take a key)
//! - **Dispatches** to the appropriate command function
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O operations**: No stdout, stderr, or terminal handling
//! - **Presentation concerns**: Returns data structures, not strings
//!
//! ## Streaming
//!
//! Listing operations take an `emit` callback and return the number of
//! entries emitted. The callback runs inside the read transaction, so a
//! bucket of any size is written out entry by entry.
//!
//! ## Generic Over DataStore
//!
//! `NestApi<S: DataStore>` is generic over the storage backend:
//! - Production: `NestApi<FileStore>`
//! - Testing: `NestApi<InMemoryStore>`

use crate::commands::{self, helpers::NameFilter, CmdResult, Location, Record};
use crate::error::{NestError, Result};
use crate::name::{parse_name, RenderMode, Rendered};
use crate::store::DataStore;
use tracing::debug;

/// The main API facade for nestkv operations.
pub struct NestApi<S: DataStore> {
    store: S,
}

impl<S: DataStore> NestApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn buckets<F>(
        &self,
        location: &Location,
        pattern: Option<&str>,
        mode: RenderMode,
        emit: F,
    ) -> Result<usize>
    where
        F: FnMut(Rendered) -> Result<()>,
    {
        reject_key("buckets", location)?;
        let filter = NameFilter::new(pattern)?;
        commands::list::buckets(&self.store, &location.bucket, &filter, mode, emit)
    }

    pub fn keys<F>(
        &self,
        location: &Location,
        pattern: Option<&str>,
        mode: RenderMode,
        emit: F,
    ) -> Result<usize>
    where
        F: FnMut(Rendered) -> Result<()>,
    {
        reject_key("keys", location)?;
        let filter = NameFilter::new(pattern)?;
        commands::list::keys(&self.store, &location.bucket, &filter, mode, emit)
    }

    /// Value of the key named by `location`.
    pub fn get(&self, location: &Location, mode: RenderMode) -> Result<CmdResult> {
        let key = require_key("get", location)?;
        commands::get::value(&self.store, &location.bucket, key, mode)
    }

    /// Every key/value pair in the bucket named by `location`.
    pub fn records<F>(
        &self,
        location: &Location,
        pattern: Option<&str>,
        mode: RenderMode,
        emit: F,
    ) -> Result<usize>
    where
        F: FnMut(Record) -> Result<()>,
    {
        reject_key("get", location)?;
        let filter = NameFilter::new(pattern)?;
        commands::get::records(&self.store, &location.bucket, &filter, mode, emit)
    }

    pub fn set(&mut self, location: &Location, value: &[u8]) -> Result<CmdResult> {
        let key = require_key("set", location)?;
        commands::set::run(&mut self.store, &location.bucket, key, value)
    }

    pub fn add(&mut self, location: &Location) -> Result<CmdResult> {
        reject_key("add", location)?;
        commands::add::run(&mut self.store, &location.bucket)
    }

    /// Deletes the key named by `location`, or the last bucket of its path
    /// when no key is given.
    pub fn delete(&mut self, location: &Location) -> Result<CmdResult> {
        match &location.key {
            Some(key) => commands::delete::key(&mut self.store, &location.bucket, key),
            None => commands::delete::bucket(&mut self.store, &location.bucket),
        }
    }

    pub fn stat(&self, location: &Location) -> Result<CmdResult> {
        reject_key("stat", location)?;
        commands::stat::stat(&self.store, &location.bucket)
    }

    pub fn info(&self, location: &Location) -> Result<CmdResult> {
        reject_key("info", location)?;
        commands::stat::info(&self.store, &location.bucket)
    }
}

/// Builds a [`Location`] from command-line name literals.
pub fn parse_location<B: AsRef<str>>(bucket: &[B], key: Option<&str>) -> Result<Location> {
    let bucket = bucket
        .iter()
        .map(|segment| {
            parse_name(segment.as_ref()).map_err(|e| {
                NestError::InvalidArgs(format!("invalid bucket name {:?}: {}", segment.as_ref(), e))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let key = key
        .map(|k| {
            parse_name(k)
                .map_err(|e| NestError::InvalidArgs(format!("invalid key name {:?}: {}", k, e)))
        })
        .transpose()?;
    debug!(segments = bucket.len(), has_key = key.is_some(), "parsed location");
    Ok(Location { bucket, key })
}

fn require_key<'a>(action: &str, location: &'a Location) -> Result<&'a [u8]> {
    location.key.as_deref().ok_or_else(|| {
        NestError::InvalidArgs(format!(r#"action "{}" requires "key" flag to be provided"#, action))
    })
}

fn reject_key(action: &str, location: &Location) -> Result<()> {
    match location.key {
        Some(_) => Err(NestError::InvalidArgs(format!(
            r#"action "{}" doesn't allow "key" flag"#,
            action
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn api() -> NestApi<InMemoryStore> {
        NestApi::new(InMemoryStore::new())
    }

    fn collect<F>(f: F) -> Vec<Rendered>
    where
        F: FnOnce(&mut dyn FnMut(Rendered) -> Result<()>) -> Result<usize>,
    {
        let mut out = Vec::new();
        f(&mut |r| {
            out.push(r);
            Ok(())
        })
        .unwrap();
        out
    }

    #[test]
    fn parse_location_decodes_literals() {
        let loc = parse_location(&["foo", "0x[0001]", "[a, 0x[ff]]"], Some("['k']")).unwrap();
        assert_eq!(
            loc.bucket,
            vec![b"foo".to_vec(), vec![0, 1], b"a\xff".to_vec()]
        );
        assert_eq!(loc.key, Some(b"k".to_vec()));
    }

    #[test]
    fn parse_location_reports_bad_literal() {
        let err = parse_location(&["0x[zz]"], None).unwrap_err();
        assert!(matches!(err, NestError::InvalidArgs(_)));
        assert!(err.to_string().contains("invalid bucket name"));
    }

    #[test]
    fn add_set_get_roundtrip() {
        let mut api = api();
        api.add(&Location::bucket(["foo", "bar"])).unwrap();
        api.set(&Location::bucket(["foo", "bar"]).with_key("buz"), b"\x01\x02")
            .unwrap();

        let result = api
            .get(&Location::bucket(["foo", "bar"]).with_key("buz"), RenderMode::Hex)
            .unwrap();
        assert_eq!(result.value, Some(Rendered::Text("0102".to_string())));
    }

    #[test]
    fn key_rules_follow_the_action() {
        let mut api = api();
        let with_key = Location::root().with_key("k");
        for err in [
            api.add(&with_key).unwrap_err(),
            api.stat(&with_key).unwrap_err(),
            api.info(&with_key).unwrap_err(),
        ] {
            assert!(err.to_string().contains(r#"doesn't allow "key" flag"#));
        }
        let err = api.set(&Location::root(), b"v").unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"invalid arguments: action "set" requires "key" flag to be provided"#
        );
        assert!(api.keys(&with_key, None, RenderMode::Text, |_| Ok(())).is_err());
    }

    #[test]
    fn listings_stream_through_callback() {
        let mut api = api();
        api.add(&Location::bucket(["a"])).unwrap();
        api.add(&Location::bucket(["b"])).unwrap();
        api.set(&Location::root().with_key("k"), b"v").unwrap();

        let buckets =
            collect(|emit| api.buckets(&Location::root(), Some("b"), RenderMode::Text, emit));
        assert_eq!(buckets, vec![Rendered::Text("b".to_string())]);
        let keys = collect(|emit| api.keys(&Location::root(), None, RenderMode::Text, emit));
        assert_eq!(keys, vec![Rendered::Text("k".to_string())]);
    }

    #[test]
    fn invalid_pattern_fails_before_listing() {
        let api = api();
        let err = api
            .buckets(&Location::root(), Some("["), RenderMode::Text, |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, NestError::Pattern(_)));
    }

    #[test]
    fn delete_dispatches_on_key() {
        let mut api = api();
        api.add(&Location::bucket(["a", "b"])).unwrap();
        api.set(&Location::bucket(["a"]).with_key("k"), b"v").unwrap();

        api.delete(&Location::bucket(["a"]).with_key("k")).unwrap();
        api.delete(&Location::bucket(["a", "b"])).unwrap();
        let stats = api.stat(&Location::bucket(["a"])).unwrap().bucket_stats.unwrap();
        assert_eq!(stats.key_n, 0);
        assert_eq!(stats.bucket_n, 0);
    }

    #[test]
    fn records_reject_key() {
        let api = api();
        let err = api
            .records(&Location::root().with_key("k"), None, RenderMode::Text, |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, NestError::InvalidArgs(_)));
    }
}
