use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::domain::invoice::{CacheError, CacheLookup, ports::ListingCache};

const KEY_PREFIX: &str = "listing";

/// Redis-backed cache of rendered listing pages.
///
/// Every path carries a generation counter. Entries are written under the
/// current generation, so bumping the counter orphans all variants of the
/// path at once; orphans expire through their TTL.
#[derive(Clone)]
pub struct RedisListingCache {
  conn: ConnectionManager,
  ttl_seconds: u64,
  op_timeout: Duration,
}

impl RedisListingCache {
  pub fn new(conn: ConnectionManager, ttl_seconds: u64, op_timeout: Duration) -> Self {
    Self {
      conn,
      ttl_seconds,
      op_timeout,
    }
  }

  fn generation_key(path: &str) -> String {
    format!("{}:{}:generation", KEY_PREFIX, path)
  }

  fn entry_key(path: &str, generation: u64, variant: &str) -> String {
    format!("{}:{}:v{}:{}", KEY_PREFIX, path, generation, variant)
  }

  async fn run<T, F>(&self, op: F) -> Result<T, CacheError>
  where
    F: Future<Output = redis::RedisResult<T>>,
  {
    match timeout(self.op_timeout, op).await {
      Ok(result) => result.map_err(|e| CacheError::Backend(e.to_string())),
      Err(_) => Err(CacheError::Timeout),
    }
  }

  async fn generation(&self, path: &str) -> Result<u64, CacheError> {
    let mut conn = self.conn.clone();
    let key = Self::generation_key(path);
    let generation: Option<u64> = self.run(conn.get(&key)).await?;
    Ok(generation.unwrap_or(0))
  }
}

#[async_trait]
impl ListingCache for RedisListingCache {
  async fn get(&self, path: &str, variant: &str) -> Result<CacheLookup, CacheError> {
    let generation = self.generation(path).await?;
    let key = Self::entry_key(path, generation, variant);

    let mut conn = self.conn.clone();
    let body = self.run(conn.get(&key)).await?;
    Ok(CacheLookup { body, generation })
  }

  /// Stores under the generation the caller read. A render that raced with
  /// an invalidation lands under the old generation and is never served.
  async fn put(
    &self,
    path: &str,
    variant: &str,
    generation: u64,
    body: &str,
  ) -> Result<(), CacheError> {
    let key = Self::entry_key(path, generation, variant);

    let mut conn = self.conn.clone();
    self
      .run(conn.set_ex::<_, _, ()>(&key, body, self.ttl_seconds))
      .await
  }

  async fn invalidate(&self, path: &str) -> Result<(), CacheError> {
    let mut conn = self.conn.clone();
    let key = Self::generation_key(path);
    let generation: u64 = self.run(conn.incr(&key, 1u64)).await?;
    tracing::debug!(path, generation, "Listing cache invalidated");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use testcontainers_modules::redis::{REDIS_PORT, Redis};
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  async fn setup_test_cache() -> (RedisListingCache, ContainerAsync<Redis>) {
    let container = Redis::default()
      .start()
      .await
      .expect("Failed to start redis container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(REDIS_PORT)
      .await
      .expect("Failed to get port");

    let client = redis::Client::open(format!("redis://{}:{}", host, port)).unwrap();
    let conn = client.get_connection_manager().await.unwrap();

    (
      RedisListingCache::new(conn, 60, Duration::from_secs(2)),
      container,
    )
  }

  #[test]
  fn test_key_layout() {
    assert_eq!(
      RedisListingCache::generation_key("/dashboard/invoices"),
      "listing:/dashboard/invoices:generation"
    );
    assert_eq!(
      RedisListingCache::entry_key("/dashboard/invoices", 3, "query=&page=2"),
      "listing:/dashboard/invoices:v3:query=&page=2"
    );
  }

  async fn store(cache: &RedisListingCache, path: &str, variant: &str, body: &str) {
    let lookup = cache.get(path, variant).await.unwrap();
    cache
      .put(path, variant, lookup.generation, body)
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn test_invalidate_orphans_every_variant() {
    let (cache, _container) = setup_test_cache().await;
    let path = "/dashboard/invoices";

    store(&cache, path, "page=1", "<p>one</p>").await;
    store(&cache, path, "page=2", "<p>two</p>").await;
    store(&cache, "/dashboard/customers", "", "<p>c</p>").await;

    assert_eq!(
      cache.get(path, "page=1").await.unwrap().body.as_deref(),
      Some("<p>one</p>")
    );

    cache.invalidate(path).await.unwrap();

    assert!(cache.get(path, "page=1").await.unwrap().body.is_none());
    assert!(cache.get(path, "page=2").await.unwrap().body.is_none());
    assert!(cache.get("/dashboard/customers", "").await.unwrap().body.is_some());

    store(&cache, path, "page=1", "<p>fresh</p>").await;
    assert_eq!(
      cache.get(path, "page=1").await.unwrap().body.as_deref(),
      Some("<p>fresh</p>")
    );
  }

  #[tokio::test]
  async fn test_render_raced_by_invalidation_is_never_served() {
    let (cache, _container) = setup_test_cache().await;
    let path = "/dashboard/invoices";

    let miss = cache.get(path, "page=1").await.unwrap();
    assert!(miss.body.is_none());

    // A mutation commits between the read and the write of the render
    cache.invalidate(path).await.unwrap();
    cache
      .put(path, "page=1", miss.generation, "<p>stale</p>")
      .await
      .unwrap();

    let after = cache.get(path, "page=1").await.unwrap();
    assert!(after.body.is_none());
    assert_eq!(after.generation, miss.generation + 1);
  }
}
