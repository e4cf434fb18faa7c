//! [`Cache`] of read results.

use std::{
    collections::HashMap, convert::Infallible, hash::Hash, sync::Arc, time,
};

use common::{
    operations::{By, Evict, Insert, Invalidate, Select},
    unit, DateTimeOf, Handler,
};
use tokio::sync::RwLock;

use crate::{domain::Employee, read::employee::list};

/// [`Cache`] of [`Employee`] lists.
pub type Listings = Cache<list::Filter, Vec<Employee>>;

/// [`DateTime`] when a value was fetched into a [`Cache`].
///
/// [`DateTime`]: common::DateTime
pub type FetchDateTime = DateTimeOf<unit::Fetch>;

/// Generation of a [`Cache`], advanced by every [`Invalidate`].
///
/// A value fetched before an [`Invalidate`] carries an outdated
/// [`Generation`], so is never [`Insert`]ed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Generation(u64);

/// Result of [`Select`]ing a [`Cache`] entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lookup<V> {
    /// Fresh cached value, if any.
    pub value: Option<V>,

    /// [`Generation`] of the [`Cache`] at the moment of the lookup.
    pub generation: Generation,
}

/// Read-through cache of `V`alues keyed by `K`.
///
/// Every entry remembers the moment it was fetched at, and is considered
/// fresh for the configured TTL since that moment. Stale entries are never
/// returned, but occupy memory until [`Evict`]ed.
///
/// Clones share the same storage.
#[derive(Debug)]
pub struct Cache<K, V> {
    /// Duration an entry stays fresh for.
    ttl: time::Duration,

    /// Cached entries along with the current [`Generation`].
    storage: Arc<RwLock<Storage<K, V>>>,
}

/// Shared storage of a [`Cache`].
#[derive(Debug)]
struct Storage<K, V> {
    /// Current [`Generation`].
    generation: Generation,

    /// Cached entries along with the moment they were fetched at.
    entries: HashMap<K, (V, FetchDateTime)>,
}

impl<K, V> Default for Storage<K, V> {
    fn default() -> Self {
        Self {
            generation: Generation::default(),
            entries: HashMap::new(),
        }
    }
}

impl<K, V> Cache<K, V> {
    /// Creates a new empty [`Cache`] keeping its entries fresh for the
    /// provided `ttl`.
    #[must_use]
    pub fn new(ttl: time::Duration) -> Self {
        Self {
            ttl,
            storage: Arc::default(),
        }
    }

    /// Returns the duration an entry of this [`Cache`] stays fresh for.
    #[must_use]
    pub fn ttl(&self) -> time::Duration {
        self.ttl
    }

    /// Checks whether an entry fetched at the provided moment is still fresh
    /// at the `now` one.
    fn is_fresh(
        &self,
        fetched_at: FetchDateTime,
        now: FetchDateTime,
    ) -> bool {
        fetched_at + self.ttl > now
    }
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        Self {
            ttl: self.ttl,
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<K, V> Handler<Select<By<Lookup<V>, K>>> for Cache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    type Ok = Lookup<V>;
    type Err = Infallible;

    async fn execute(
        &self,
        Select(by): Select<By<Lookup<V>, K>>,
    ) -> Result<Self::Ok, Self::Err> {
        let now = FetchDateTime::now();
        let storage = self.storage.read().await;
        Ok(Lookup {
            value: storage
                .entries
                .get(by.as_inner())
                .filter(|(_, fetched_at)| self.is_fresh(*fetched_at, now))
                .map(|(value, _)| value.clone()),
            generation: storage.generation,
        })
    }
}

/// Stores the value fetched in the provided [`Generation`].
///
/// Returns `false` without storing anything if the [`Cache`] has been
/// [`Invalidate`]d since.
impl<K, V> Handler<Insert<(K, V, Generation)>> for Cache<K, V>
where
    K: Eq + Hash,
{
    type Ok = bool;
    type Err = Infallible;

    async fn execute(
        &self,
        Insert((key, value, generation)): Insert<(K, V, Generation)>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut storage = self.storage.write().await;
        if storage.generation != generation {
            return Ok(false);
        }
        drop(storage.entries.insert(key, (value, FetchDateTime::now())));
        Ok(true)
    }
}

impl<K, V> Handler<Invalidate<()>> for Cache<K, V> {
    type Ok = ();
    type Err = Infallible;

    async fn execute(&self, _: Invalidate<()>) -> Result<Self::Ok, Self::Err> {
        let mut storage = self.storage.write().await;
        storage.entries.clear();
        storage.generation.0 = storage.generation.0.wrapping_add(1);
        Ok(())
    }
}

impl<K, V> Handler<Evict<FetchDateTime>> for Cache<K, V> {
    /// Number of evicted entries.
    type Ok = usize;
    type Err = Infallible;

    async fn execute(
        &self,
        Evict(now): Evict<FetchDateTime>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut storage = self.storage.write().await;
        let before = storage.entries.len();
        storage
            .entries
            .retain(|_, (_, fetched_at)| self.is_fresh(*fetched_at, now));
        Ok(before - storage.entries.len())
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{
        operations::{By, Evict, Insert, Invalidate, Select},
        Handler as _,
    };

    use super::{Cache, FetchDateTime, Generation, Lookup};

    async fn lookup(
        cache: &Cache<&'static str, u8>,
        key: &'static str,
    ) -> Lookup<u8> {
        cache
            .execute(Select(By::<Lookup<u8>, _>::new(key)))
            .await
            .unwrap_or_else(|e| match e {})
    }

    async fn get(
        cache: &Cache<&'static str, u8>,
        key: &'static str,
    ) -> Option<u8> {
        lookup(cache, key).await.value
    }

    async fn put(cache: &Cache<&'static str, u8>, key: &'static str, v: u8) {
        let generation = lookup(cache, key).await.generation;
        assert!(cache.execute(Insert((key, v, generation))).await.unwrap());
    }

    #[tokio::test]
    async fn serves_fresh_entries() {
        let cache = Cache::new(Duration::from_secs(60));
        assert_eq!(get(&cache, "a").await, None);

        put(&cache, "a", 1).await;
        assert_eq!(get(&cache, "a").await, Some(1));
        assert_eq!(get(&cache, "b").await, None);

        put(&cache, "a", 2).await;
        assert_eq!(get(&cache, "a").await, Some(2));
    }

    #[tokio::test]
    async fn skips_stale_entries() {
        let cache = Cache::new(Duration::ZERO);

        put(&cache, "a", 1).await;
        assert_eq!(get(&cache, "a").await, None);
    }

    #[tokio::test]
    async fn shares_entries_between_clones() {
        let cache = Cache::new(Duration::from_secs(60));
        let clone = cache.clone();

        put(&clone, "a", 1).await;
        assert_eq!(get(&cache, "a").await, Some(1));
    }

    #[tokio::test]
    async fn invalidates_everything() {
        let cache = Cache::new(Duration::from_secs(60));
        put(&cache, "a", 1).await;
        put(&cache, "b", 2).await;

        cache.execute(Invalidate(())).await.unwrap();

        assert_eq!(get(&cache, "a").await, None);
        assert_eq!(get(&cache, "b").await, None);
    }

    #[tokio::test]
    async fn drops_values_fetched_before_invalidation() {
        let cache = Cache::new(Duration::from_secs(60));
        let before = lookup(&cache, "a").await.generation;

        cache.execute(Invalidate(())).await.unwrap();

        let after = lookup(&cache, "a").await.generation;
        assert_ne!(before, after);
        assert!(!cache.execute(Insert(("a", 1, before))).await.unwrap());
        assert_eq!(get(&cache, "a").await, None);

        assert!(cache.execute(Insert(("a", 2, after))).await.unwrap());
        assert_eq!(get(&cache, "a").await, Some(2));
        assert_ne!(after, Generation::default());
    }

    #[tokio::test]
    async fn evicts_only_stale_entries() {
        let cache = Cache::new(Duration::from_secs(60));
        put(&cache, "a", 1).await;

        let evicted =
            cache.execute(Evict(FetchDateTime::now())).await.unwrap();
        assert_eq!(evicted, 0);
        assert_eq!(get(&cache, "a").await, Some(1));

        let later = FetchDateTime::now() + Duration::from_secs(61);
        let evicted = cache.execute(Evict(later)).await.unwrap();
        assert_eq!(evicted, 1);
        assert_eq!(get(&cache, "a").await, None);
    }
}
