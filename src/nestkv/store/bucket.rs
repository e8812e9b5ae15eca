use crate::error::{NestError, Result};
use crate::name;
use crate::path::Container;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Longest key accepted by [`Bucket::put`].
pub const MAX_KEY_SIZE: usize = 32768;
/// Longest value accepted by [`Bucket::put`].
pub const MAX_VALUE_SIZE: usize = (1 << 31) - 2;

/// Byte string stored as hex text in the on-disk document.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Borrow<[u8]> for Bytes {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for Bytes {
    fn from(b: &[u8]) -> Self {
        Bytes(b.to_vec())
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct HexVisitor;

        impl Visitor<'_> for HexVisitor {
            type Value = Bytes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a hex encoded byte string")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Bytes, E> {
                hex::decode(v).map(Bytes).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}

/// A node of the store: child buckets plus key/value entries.
///
/// Buckets and keys share one namespace, so a name is never both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    buckets: BTreeMap<Bytes, Bucket>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    keys: BTreeMap<Bytes, Bytes>,
}

/// Recursive counters for a bucket and everything below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    /// Keys, excluding bucket entries.
    pub key_n: usize,
    /// Nested buckets, excluding the bucket itself.
    pub bucket_n: usize,
    /// Levels of nesting, 1 for a bucket with no children.
    pub depth: usize,
    pub key_bytes: usize,
    pub value_bytes: usize,
}

/// Shape of a bucket tree, with each name rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketStructure {
    pub name: String,
    pub key_n: usize,
    pub children: Vec<BucketStructure>,
}

impl Bucket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bucket(&self, name: &[u8]) -> Option<&Bucket> {
        self.buckets.get(name)
    }

    pub fn bucket_mut(&mut self, name: &[u8]) -> Option<&mut Bucket> {
        self.buckets.get_mut(name)
    }

    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.keys.get(key).map(|v| v.0.as_slice())
    }

    pub fn create_bucket_if_not_exists(&mut self, name: &[u8]) -> Result<&mut Bucket> {
        if name.is_empty() {
            return Err(NestError::InvalidName("bucket name is empty".to_string()));
        }
        if self.keys.contains_key(name) {
            return Err(NestError::IncompatibleValue(format!(
                "{} is a key, not a bucket",
                name::text(name)
            )));
        }
        Ok(self.buckets.entry(Bytes::from(name)).or_default())
    }

    pub fn delete_bucket(&mut self, name: &[u8]) -> Result<()> {
        if self.buckets.remove(name).is_some() {
            return Ok(());
        }
        if self.keys.contains_key(name) {
            return Err(NestError::IncompatibleValue(format!(
                "{} is a key, not a bucket",
                name::text(name)
            )));
        }
        Err(NestError::BucketNotFound(name::text(name)))
    }

    pub fn put(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(NestError::InvalidName("key is empty".to_string()));
        }
        if key.len() > MAX_KEY_SIZE {
            return Err(NestError::InvalidName(format!(
                "key is {} bytes, the limit is {}",
                key.len(),
                MAX_KEY_SIZE
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(NestError::ValueTooLarge(value.len()));
        }
        if self.buckets.contains_key(key) {
            return Err(NestError::IncompatibleValue(format!(
                "{} is a bucket, not a key",
                name::text(key)
            )));
        }
        self.keys.insert(Bytes::from(key), Bytes::from(value));
        Ok(())
    }

    /// Removes `key`. Deleting a key that does not exist is not an error.
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        if self.buckets.contains_key(key) {
            return Err(NestError::IncompatibleValue(format!(
                "{} is a bucket, use bucket deletion instead",
                name::text(key)
            )));
        }
        self.keys.remove(key);
        Ok(())
    }

    /// Child bucket names in byte order.
    pub fn buckets(&self) -> impl Iterator<Item = (&[u8], &Bucket)> {
        self.buckets.iter().map(|(k, b)| (k.0.as_slice(), b))
    }

    /// Key/value entries in byte order.
    pub fn keys(&self) -> impl Iterator<Item = (&[u8], &[u8])> {
        self.keys.iter().map(|(k, v)| (k.0.as_slice(), v.0.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty() && self.keys.is_empty()
    }

    pub fn stats(&self) -> BucketStats {
        let mut stats = BucketStats {
            key_n: self.keys.len(),
            bucket_n: self.buckets.len(),
            depth: 1,
            key_bytes: self.keys.keys().map(|k| k.0.len()).sum(),
            value_bytes: self.keys.values().map(|v| v.0.len()).sum(),
        };
        for child in self.buckets.values() {
            let c = child.stats();
            stats.key_n += c.key_n;
            stats.bucket_n += c.bucket_n;
            stats.depth = stats.depth.max(c.depth + 1);
            stats.key_bytes += c.key_bytes;
            stats.value_bytes += c.value_bytes;
        }
        stats
    }

    /// Structure of this bucket, labelled with `name`.
    pub fn inspect(&self, name: &[u8]) -> BucketStructure {
        BucketStructure {
            name: name::text(name),
            key_n: self.keys.len(),
            children: self
                .buckets
                .iter()
                .map(|(k, b)| b.inspect(&k.0))
                .collect(),
        }
    }
}

impl<'a> Container for &'a Bucket {
    fn child(self, name: &[u8]) -> Option<Self> {
        self.bucket(name)
    }
}

impl<'a> Container for &'a mut Bucket {
    fn child(self, name: &[u8]) -> Option<Self> {
        self.bucket_mut(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::resolve;

    fn sample() -> Bucket {
        let mut root = Bucket::new();
        let foo = root.create_bucket_if_not_exists(b"foo").unwrap();
        foo.put(b"a", b"1").unwrap();
        foo.put(b"bb", b"22").unwrap();
        let bar = foo.create_bucket_if_not_exists(b"bar").unwrap();
        bar.put(b"\x00k", b"value").unwrap();
        root.put(b"top", b"level").unwrap();
        root
    }

    #[test]
    fn create_is_idempotent() {
        let mut root = sample();
        root.create_bucket_if_not_exists(b"foo").unwrap();
        assert_eq!(root.bucket(b"foo").unwrap().get(b"a"), Some(&b"1"[..]));
    }

    #[test]
    fn names_are_either_bucket_or_key() {
        let mut root = sample();
        assert!(matches!(
            root.create_bucket_if_not_exists(b"top"),
            Err(NestError::IncompatibleValue(_))
        ));
        assert!(matches!(
            root.put(b"foo", b"x"),
            Err(NestError::IncompatibleValue(_))
        ));
        assert!(matches!(
            root.delete(b"foo"),
            Err(NestError::IncompatibleValue(_))
        ));
        assert!(matches!(
            root.delete_bucket(b"top"),
            Err(NestError::IncompatibleValue(_))
        ));
    }

    #[test]
    fn empty_and_oversized_names_are_rejected() {
        let mut root = Bucket::new();
        assert!(matches!(
            root.create_bucket_if_not_exists(b""),
            Err(NestError::InvalidName(_))
        ));
        assert!(matches!(root.put(b"", b"v"), Err(NestError::InvalidName(_))));
        let long = vec![b'k'; MAX_KEY_SIZE + 1];
        assert!(matches!(root.put(&long, b"v"), Err(NestError::InvalidName(_))));
        root.put(&long[..MAX_KEY_SIZE], b"v").unwrap();
    }

    #[test]
    fn delete_bucket_reports_missing() {
        let mut root = sample();
        let err = root.delete_bucket(b"\x00nope").unwrap_err();
        assert_eq!(err.to_string(), "bucket [0x[00], nope] does not exist");
        root.delete_bucket(b"foo").unwrap();
        assert!(root.bucket(b"foo").is_none());
    }

    #[test]
    fn delete_missing_key_is_fine() {
        let mut root = sample();
        root.delete(b"absent").unwrap();
        root.delete(b"top").unwrap();
        assert_eq!(root.get(b"top"), None);
    }

    #[test]
    fn iteration_is_in_byte_order() {
        let mut root = Bucket::new();
        for k in [&b"b"[..], b"\x00", b"a", b"\xff"] {
            root.put(k, b"").unwrap();
        }
        let keys: Vec<&[u8]> = root.keys().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![&b"\x00"[..], b"a", b"b", b"\xff"]);
    }

    #[test]
    fn stats_are_recursive() {
        let stats = sample().stats();
        assert_eq!(
            stats,
            BucketStats {
                key_n: 4,
                bucket_n: 2,
                depth: 3,
                key_bytes: 3 + 1 + 2 + 2,
                value_bytes: 5 + 1 + 2 + 5,
            }
        );
    }

    #[test]
    fn inspect_renders_names() {
        let root = sample();
        let s = root.inspect(b"root");
        assert_eq!(s.key_n, 1);
        assert_eq!(s.children.len(), 1);
        assert_eq!(s.children[0].name, "foo");
        assert_eq!(s.children[0].key_n, 2);
        assert_eq!(s.children[0].children[0].name, "bar");
    }

    #[test]
    fn resolves_through_container_impls() {
        let mut root = sample();
        let bar = resolve(&mut root, &["foo", "bar"]).unwrap();
        bar.put(b"new", b"v").unwrap();
        let bar = resolve(&root, &["foo", "bar"]).unwrap();
        assert_eq!(bar.get(b"new"), Some(&b"v"[..]));
    }

    #[test]
    fn serializes_names_as_hex() {
        let mut root = Bucket::new();
        root.create_bucket_if_not_exists(b"\x00b")
            .unwrap()
            .put(b"k", b"\xff")
            .unwrap();
        let json = serde_json::to_string(&root).unwrap();
        assert_eq!(json, r#"{"buckets":{"0062":{"keys":{"6b":"ff"}}}}"#);
        let back: Bucket = serde_json::from_str(&json).unwrap();
        assert_eq!(back, root);
    }

    #[test]
    fn rejects_invalid_hex_in_document() {
        let err = serde_json::from_str::<Bucket>(r#"{"keys":{"zz":"00"}}"#);
        assert!(err.is_err());
    }
}
