//! Name cache using moka
//!
//! One [`NameCache`] per entity kind. Lookups of the same id that overlap in
//! time share a single fetch; a failed fetch stores the placeholder label so
//! the id is not retried until the cache is cleared.

use crate::index::NameIndex;
use crate::source::NameSource;
use moka::future::Cache;
use registry_model::EntityId;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Concurrent id → name cache
///
/// Cheap to clone; clones share entries.
#[derive(Debug, Clone)]
pub struct NameCache<K: EntityId> {
    inner: Cache<K, String>,
}

impl<K: EntityId> NameCache<K> {
    /// Create unbounded cache
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
        }
    }

    /// Create cache holding at most `max_capacity` names
    #[inline]
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Cached name, if any
    #[inline]
    pub async fn get(&self, id: K) -> Option<String> {
        self.inner.get(&id).await
    }

    /// Record a name, replacing any cached one
    #[inline]
    pub async fn insert(&self, id: K, name: impl Into<String>) {
        self.inner.insert(id, name.into()).await;
    }

    /// Record every entry of an index
    pub async fn insert_all(&self, index: &NameIndex<K>) {
        for (id, name) in index.iter() {
            self.inner.insert(*id, name.to_string()).await;
        }
    }

    /// Cached name, fetching it from `source` on a miss
    ///
    /// Never fails: a fetch error yields (and caches) the placeholder label.
    pub async fn resolve<S>(&self, id: K, source: &S) -> String
    where
        S: NameSource<K> + ?Sized,
    {
        self.inner
            .get_with(id, async move {
                match source.fetch_name(id).await {
                    Ok(name) => name,
                    Err(e) => {
                        tracing::warn!(kind = %K::KIND, %id, error = %e, "name lookup failed");
                        id.placeholder()
                    }
                }
            })
            .await
    }

    /// Copy of all entries
    #[must_use]
    pub fn snapshot(&self) -> NameIndex<K> {
        self.inner.iter().map(|(id, name)| (*id, name)).collect()
    }

    /// Drop one entry
    #[inline]
    pub async fn invalidate(&self, id: K) {
        self.inner.invalidate(&id).await;
    }

    /// Drop all entries
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Get cache statistics
    ///
    /// Settles pending maintenance first so the count is exact.
    pub async fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks().await;
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

impl<K: EntityId> Default for NameCache<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockNameSource;
    use mockall::predicate::eq;
    use registry_client::RegistryError;
    use registry_model::{StudentId, SubjectId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn resolve_fetches_once_then_hits_cache() {
        let mut source = MockNameSource::<StudentId>::new();
        source
            .expect_fetch_name()
            .with(eq(StudentId::new(7)))
            .times(1)
            .returning(|_| Ok("Ann".to_string()));

        let cache = NameCache::new();
        assert_eq!(cache.resolve(StudentId::new(7), &source).await, "Ann");
        assert_eq!(cache.resolve(StudentId::new(7), &source).await, "Ann");
    }

    #[tokio::test]
    async fn failure_caches_placeholder() {
        let mut source = MockNameSource::<SubjectId>::new();
        source
            .expect_fetch_name()
            .times(1)
            .returning(|_| Err(RegistryError::transport("connection refused")));

        let cache = NameCache::new();
        assert_eq!(cache.resolve(SubjectId::new(4), &source).await, "Предмет #4");
        assert_eq!(cache.get(SubjectId::new(4)).await.as_deref(), Some("Предмет #4"));
        assert_eq!(cache.resolve(SubjectId::new(4), &source).await, "Предмет #4");
    }

    #[tokio::test]
    async fn preloaded_names_skip_the_source() {
        let mut source = MockNameSource::<StudentId>::new();
        source.expect_fetch_name().never();

        let cache = NameCache::new();
        cache.insert(StudentId::new(1), "Boris").await;
        assert_eq!(cache.resolve(StudentId::new(1), &source).await, "Boris");
    }

    struct Slow {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl NameSource<StudentId> for Slow {
        async fn fetch_name(&self, id: StudentId) -> registry_client::RegistryResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(format!("student {id}"))
        }
    }

    #[tokio::test]
    async fn overlapping_lookups_share_one_fetch() {
        let source = Arc::new(Slow {
            calls: AtomicUsize::new(0),
        });
        let cache = NameCache::new();

        let lookups = (0..8).map(|_| cache.resolve(StudentId::new(5), source.as_ref()));
        let names = futures::future::join_all(lookups).await;

        assert!(names.iter().all(|n| n == "student 5"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn snapshot_and_stats() {
        let cache = NameCache::new();
        cache.insert(SubjectId::new(1), "Математика").await;
        cache.insert(SubjectId::new(2), "Физика").await;

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.get(&SubjectId::new(2)), Some("Физика"));
        assert_eq!(cache.stats().await.entry_count, 2);

        cache.invalidate_all();
        assert_eq!(cache.stats().await.entry_count, 0);
    }
}
