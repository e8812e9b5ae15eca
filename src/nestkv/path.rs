//! Resolution of bucket paths.
//!
//! A path is a list of names walked from the root bucket. Lookups go through
//! the [`Container`] trait so the walk works the same over shared and mutable
//! bucket references, and over test doubles.

use crate::error::{NestError, Result};
use crate::name;

/// A bucket handle that can step into a child bucket.
///
/// Taking `self` by value lets `&mut` handles hand out a child borrowed for
/// the same lifetime.
pub trait Container: Sized {
    fn child(self, name: &[u8]) -> Option<Self>;
}

/// Walks `path` from `root`, returning the bucket at its end.
///
/// An empty path resolves to `root` itself.
pub fn resolve<C: Container, N: AsRef<[u8]>>(root: C, path: &[N]) -> Result<C> {
    let mut current = root;
    for (i, segment) in path.iter().enumerate() {
        current = current
            .child(segment.as_ref())
            .ok_or_else(|| not_found(&path[..i], segment.as_ref()))?;
    }
    Ok(current)
}

/// Error for `missing` not existing below the bucket at `prefix`.
pub fn not_found<N: AsRef<[u8]>>(prefix: &[N], missing: &[u8]) -> NestError {
    NestError::PathNotFound {
        prefix: (!prefix.is_empty()).then(|| display(prefix)),
        missing: name::text(missing),
    }
}

/// Renders a path as `a -> b -> c` using text-mode names.
pub fn display<N: AsRef<[u8]>>(path: &[N]) -> String {
    path.iter()
        .map(|segment| name::text(segment.as_ref()))
        .collect::<Vec<_>>()
        .join(" -> ")
}
