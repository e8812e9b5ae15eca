use crate::commands::helpers::{bucket_at, NameFilter};
use crate::error::Result;
use crate::name::{render, RenderMode, Rendered};
use crate::store::DataStore;
use tracing::debug;

/// Streams the names of the child buckets at `path` to `emit`.
///
/// Names are rendered one at a time inside the read transaction; nothing is
/// collected. Returns how many names were emitted.
pub fn buckets<S, F>(
    store: &S,
    path: &[Vec<u8>],
    filter: &NameFilter,
    mode: RenderMode,
    mut emit: F,
) -> Result<usize>
where
    S: DataStore,
    F: FnMut(Rendered) -> Result<()>,
{
    store.view(|root| {
        let bucket = bucket_at(root, path)?;
        let mut count = 0;
        for (name, _) in bucket.buckets().filter(|(name, _)| filter.matches(name)) {
            emit(render(name, mode))?;
            count += 1;
        }
        debug!(count, "listed buckets");
        Ok(count)
    })
}

/// Streams the key names at `path` to `emit`. Child buckets are skipped.
pub fn keys<S, F>(
    store: &S,
    path: &[Vec<u8>],
    filter: &NameFilter,
    mode: RenderMode,
    mut emit: F,
) -> Result<usize>
where
    S: DataStore,
    F: FnMut(Rendered) -> Result<()>,
{
    store.view(|root| {
        let bucket = bucket_at(root, path)?;
        let mut count = 0;
        for (name, _) in bucket.keys().filter(|(name, _)| filter.matches(name)) {
            emit(render(name, mode))?;
            count += 1;
        }
        debug!(count, "listed keys");
        Ok(count)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NestError;
    use crate::store::memory::InMemoryStore;

    fn store() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store
            .update(|root| {
                let foo = root.create_bucket_if_not_exists(b"foo")?;
                foo.create_bucket_if_not_exists(b"bar")?;
                foo.create_bucket_if_not_exists(b"\x00\x01zoo")?;
                foo.put(b"block", b"1")?;
                foo.put(b"able", b"2")?;
                root.create_bucket_if_not_exists(b"top")?;
                Ok(())
            })
            .unwrap();
        store
    }

    fn collect_buckets(
        store: &InMemoryStore,
        path: &[Vec<u8>],
        filter: &NameFilter,
        mode: RenderMode,
    ) -> Vec<Rendered> {
        let mut out = Vec::new();
        buckets(store, path, filter, mode, |r| {
            out.push(r);
            Ok(())
        })
        .unwrap();
        out
    }

    #[test]
    fn lists_root_buckets() {
        let names = collect_buckets(&store(), &[], &NameFilter::all(), RenderMode::Binary);
        assert_eq!(
            names,
            vec![
                Rendered::Binary(b"foo".to_vec()),
                Rendered::Binary(b"top".to_vec())
            ]
        );
    }

    #[test]
    fn lists_nested_buckets_in_byte_order() {
        let names = collect_buckets(
            &store(),
            &[b"foo".to_vec()],
            &NameFilter::all(),
            RenderMode::Stringify,
        );
        assert_eq!(
            names,
            vec![
                Rendered::Text("[0x[0001], zoo]".to_string()),
                Rendered::Text("bar".to_string())
            ]
        );
    }

    #[test]
    fn keys_exclude_buckets_and_apply_filter() {
        let filter = NameFilter::new(Some("^bl")).unwrap();
        let mut out = Vec::new();
        let n = keys(&store(), &[b"foo".to_vec()], &filter, RenderMode::Hex, |r| {
            out.push(r);
            Ok(())
        })
        .unwrap();
        assert_eq!(n, 1);
        assert_eq!(out, vec![Rendered::Text("626c6f636b".to_string())]);
    }

    #[test]
    fn missing_path_is_reported() {
        let path = [b"foo".to_vec(), b"nope".to_vec()];
        let err =
            keys(&store(), &path, &NameFilter::all(), RenderMode::Text, |_| Ok(())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid path, bucket foo does not contain bucket nope"
        );
    }

    #[test]
    fn emit_errors_stop_the_stream() {
        let mut seen = 0;
        let err = buckets(&store(), &[], &NameFilter::all(), RenderMode::Text, |_| {
            seen += 1;
            Err(NestError::Store("closed".to_string()))
        });
        assert!(err.is_err());
        assert_eq!(seen, 1);
    }
}
