use crate::core::cache::Cache;
use anyhow::Result;
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::hash::Hash;
use std::marker::PhantomData;
use std::time::{Duration, SystemTime};
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<SystemTime>,
}

/// Durable cache backed by one named partition of a shared fjall keyspace.
/// Storage errors degrade to cache misses; they are logged, never surfaced.
pub struct FjallCache<K, V>
where
    K: Eq + Hash + Send + Sync + Serialize + DeserializeOwned + 'static + Debug,
    V: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    partition: PartitionHandle,
    _marker: PhantomData<(K, V)>,
}

impl<K, V> FjallCache<K, V>
where
    K: Eq + Hash + Send + Sync + Serialize + DeserializeOwned + Debug,
    V: Clone + Send + Sync + Serialize + DeserializeOwned,
{
    pub fn new(keyspace: &Keyspace, name: &str) -> Result<Self> {
        let partition = keyspace.open_partition(name, PartitionCreateOptions::default())?;
        Ok(Self {
            partition,
            _marker: PhantomData,
        })
    }
}

#[async_trait]
impl<K, V> Cache<K, V> for FjallCache<K, V>
where
    K: Eq + Hash + Send + Sync + Serialize + DeserializeOwned + 'static + Debug,
    V: Clone + Send + Sync + Serialize + DeserializeOwned + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        let res: Result<Option<V>> = (|| {
            if let Some(value) = self.partition.get(serde_json::to_vec(key)?)? {
                let entry: CacheEntry<V> = serde_json::from_slice(&value)?;
                if let Some(expires_at) = entry.expires_at {
                    if SystemTime::now() > expires_at {
                        debug!("Cache entry expired for key: {:?}", key);
                        self.partition.remove(serde_json::to_vec(key)?)?;
                        return Ok(None);
                    }
                }
                debug!("Cache HIT for key: {:?}", key);
                return Ok(Some(entry.value));
            }
            debug!("Cache MISS for key: {:?}", key);
            Ok(None)
        })();

        match res {
            Ok(val) => val,
            Err(e) => {
                debug!("FjallCache get error: {}", e);
                None
            }
        }
    }

    async fn put(&self, key: K, value: V, ttl: Option<Duration>) {
        let res: Result<()> = (|| {
            let expires_at = ttl.map(|d| SystemTime::now() + d);
            let entry = CacheEntry { value, expires_at };
            self.partition
                .insert(serde_json::to_vec(&key)?, serde_json::to_vec(&entry)?)?;
            debug!("Cache PUT for key: {:?}", key);
            Ok(())
        })();
        if let Err(e) = res {
            debug!("FjallCache put error: {}", e);
        }
    }

    async fn remove(&self, key: &K) {
        let res: Result<()> = (|| Ok(self.partition.remove(serde_json::to_vec(key)?)?))();
        if let Err(e) = res {
            debug!("FjallCache remove error: {}", e);
        }
    }

    async fn clear(&self) {
        let res: Result<()> = (|| {
            for kv in self.partition.iter() {
                let (key, _) = kv?;
                self.partition.remove(key)?;
            }
            Ok(())
        })();
        if let Err(e) = res {
            debug!("FjallCache clear error: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_keyspace;
    use tempfile::tempdir;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_fjall_cache_get_put() {
        let dir = tempdir().unwrap();
        let keyspace = open_keyspace(dir.path()).unwrap();
        let cache = FjallCache::<String, i32>::new(&keyspace, "test").unwrap();

        // Initially, cache is empty
        assert!(cache.get(&"key1".to_string()).await.is_none());

        // Put a value without TTL
        cache.put("key1".to_string(), 123, None).await;

        // Get the value
        assert_eq!(cache.get(&"key1".to_string()).await, Some(123));

        // Get a non-existent key
        assert!(cache.get(&"key2".to_string()).await.is_none());
    }

    #[tokio::test]
    async fn test_fjall_cache_ttl_expiration() {
        let dir = tempdir().unwrap();
        let keyspace = open_keyspace(dir.path()).unwrap();
        let cache = FjallCache::<String, i32>::new(&keyspace, "test").unwrap();

        // Put value with 10ms TTL
        cache
            .put("key1".to_string(), 123, Some(Duration::from_millis(10)))
            .await;
        assert_eq!(cache.get(&"key1".to_string()).await, Some(123));

        // Wait for TTL expiration
        sleep(Duration::from_millis(20)).await;
        assert!(cache.get(&"key1".to_string()).await.is_none());
    }

    #[tokio::test]
    async fn test_fjall_cache_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let keyspace = open_keyspace(dir.path()).unwrap();
            let cache = FjallCache::<String, i32>::new(&keyspace, "test").unwrap();
            cache
                .put("key1".to_string(), 123, Some(Duration::from_secs(60)))
                .await;
            keyspace.persist(fjall::PersistMode::SyncAll).unwrap();
        }

        let keyspace = open_keyspace(dir.path()).unwrap();
        let cache = FjallCache::<String, i32>::new(&keyspace, "test").unwrap();
        assert_eq!(cache.get(&"key1".to_string()).await, Some(123));
    }

    #[tokio::test]
    async fn test_fjall_cache_remove_and_clear() {
        let dir = tempdir().unwrap();
        let keyspace = open_keyspace(dir.path()).unwrap();
        let cache = FjallCache::<String, i32>::new(&keyspace, "test").unwrap();

        cache.put("key1".to_string(), 123, None).await;
        cache.put("key2".to_string(), 456, None).await;
        assert_eq!(cache.get(&"key1".to_string()).await, Some(123));

        cache.remove(&"key1".to_string()).await;
        assert!(cache.get(&"key1".to_string()).await.is_none());

        cache.clear().await;
        assert!(cache.get(&"key2".to_string()).await.is_none());
    }
}
