//! List-per-key loaders
//!
//! Relationship loaders (residents, pilots, piloted starships) return a list
//! for every requested key. A key with no related rows resolves to an empty
//! list, never to "absent".

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

use super::batch::{BatchConfig, BatchFn, BatchLoader, LoaderError};

/// Group `(key, row)` pairs by key
///
/// Rows keep the order the store returned them in, and every requested key
/// gets an entry, empty if it had no rows. Rows for keys that were not
/// requested are dropped.
pub fn group_rows<K, R, I>(keys: &[K], rows: I) -> HashMap<K, Vec<R>>
where
    K: Clone + Eq + Hash,
    I: IntoIterator<Item = (K, R)>,
{
    let mut grouped: HashMap<K, Vec<R>> = keys.iter().map(|key| (key.clone(), Vec::new())).collect();
    for (key, row) in rows {
        if let Some(group) = grouped.get_mut(&key) {
            group.push(row);
        }
    }
    grouped
}

/// [`BatchLoader`] whose values are lists
pub struct ListLoader<F: BatchFn> {
    inner: BatchLoader<F>,
}

impl<F: BatchFn> Clone for ListLoader<F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<F, T> ListLoader<F>
where
    F: BatchFn<Value = Vec<T>>,
    T: Clone + Send + Sync + 'static,
{
    pub fn with_config(batch_fn: F, config: BatchConfig) -> Self {
        Self {
            inner: BatchLoader::with_config(batch_fn, config),
        }
    }

    /// Load the list for one key; see [`BatchLoader::load`]
    pub fn load(&self, key: F::Key) -> impl Future<Output = Result<Vec<T>, LoaderError>> + Send + 'static {
        let pending = self.inner.load(key);
        async move { pending.await.map(Option::unwrap_or_default) }
    }

    /// Load the lists for several keys, in input order
    pub async fn load_many<I>(&self, keys: I) -> Result<Vec<Vec<T>>, LoaderError>
    where
        I: IntoIterator<Item = F::Key>,
    {
        let lists = self.inner.load_many(keys).await?;
        Ok(lists.into_iter().map(Option::unwrap_or_default).collect())
    }

    /// Drop the cached list for `key`
    pub fn clear(&self, key: &F::Key) {
        self.inner.clear(key);
    }

    pub fn batches_dispatched(&self) -> usize {
        self.inner.batches_dispatched()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[test]
    fn test_group_rows_fills_missing_keys_and_keeps_row_order() {
        let grouped = group_rows(&[1, 2, 3], vec![(3, "c1"), (1, "a1"), (3, "c2"), (1, "a2")]);

        assert_eq!(grouped[&1], vec!["a1", "a2"]);
        assert_eq!(grouped[&2], Vec::<&str>::new());
        assert_eq!(grouped[&3], vec!["c1", "c2"]);
    }

    #[test]
    fn test_group_rows_ignores_unrequested_keys() {
        let grouped = group_rows(&[1], vec![(1, "a"), (9, "z")]);

        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[&1], vec!["a"]);
    }

    /// Reports only the even keys as having rows and omits the rest entirely
    #[derive(Default)]
    struct EvenChildren {
        calls: Arc<Mutex<Vec<Vec<i64>>>>,
    }

    impl BatchFn for EvenChildren {
        type Key = i64;
        type Value = Vec<i64>;

        async fn load(&self, keys: &[i64]) -> Result<HashMap<i64, Vec<i64>>, LoaderError> {
            self.calls.lock().unwrap().push(keys.to_vec());
            Ok(keys
                .iter()
                .filter(|key| *key % 2 == 0)
                .map(|key| (*key, vec![key * 10, key * 10 + 1]))
                .collect())
        }
    }

    fn loader() -> (ListLoader<EvenChildren>, Arc<Mutex<Vec<Vec<i64>>>>) {
        let batch_fn = EvenChildren::default();
        let calls = Arc::clone(&batch_fn.calls);
        let config = BatchConfig {
            delay: Duration::ZERO,
            ..BatchConfig::default()
        };
        (ListLoader::with_config(batch_fn, config), calls)
    }

    #[tokio::test]
    async fn test_key_without_rows_resolves_to_empty_list() {
        let (loader, _) = loader();

        assert_eq!(loader.load(3).await.unwrap(), Vec::<i64>::new());
        assert_eq!(loader.load(2).await.unwrap(), vec![20, 21]);
    }

    #[tokio::test]
    async fn test_load_many_batches_and_preserves_order() {
        let (loader, calls) = loader();

        let lists = loader.load_many([4, 1, 2]).await.unwrap();

        assert_eq!(lists, vec![vec![40, 41], vec![], vec![20, 21]]);
        assert_eq!(*calls.lock().unwrap(), vec![vec![4, 1, 2]]);
    }

    #[tokio::test]
    async fn test_clear_reloads_list() {
        let (loader, calls) = loader();

        loader.load(2).await.unwrap();
        loader.clear(&2);
        loader.load(2).await.unwrap();

        assert_eq!(calls.lock().unwrap().len(), 2);
    }
}
