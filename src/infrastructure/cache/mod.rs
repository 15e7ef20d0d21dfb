mod redis_listing_cache;

pub use redis_listing_cache::RedisListingCache;
