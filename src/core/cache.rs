//! Cache abstraction injected into the feed
//!
//! Values are full replacements under fixed keys; a `put` racing another
//! `put` is benign and the later write wins. Entries past their TTL are
//! never returned.

use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait Cache<K, V>: Send + Sync {
    async fn get(&self, key: &K) -> Option<V>;
    async fn put(&self, key: K, value: V, ttl: Option<Duration>);
    async fn remove(&self, key: &K);
    async fn clear(&self);
}
