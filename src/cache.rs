//! Time-boxed cache for rendered feed pages, keyed by view + query params.
//! Only the global timeline uses it. Expiry is purely time-based; a page
//! may stay stale for up to the TTL after a write, which is accepted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const INDEX_CACHE_TTL: Duration = Duration::from_secs(20);

#[derive(Clone)]
pub struct FeedCache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, (Instant, String)>>>,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    pub fn put(&self, key: &str, body: String) {
        self.put_at(key, body, Instant::now());
    }

    /// Explicit-clock variant so tests can step time deterministically.
    pub fn get_at(&self, key: &str, now: Instant) -> Option<String> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((stored, body)) if now.duration_since(*stored) < self.ttl => Some(body.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn put_at(&self, key: &str, body: String, now: Instant) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), (now, body));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_within_the_ttl() {
        let cache = FeedCache::new(Duration::from_secs(20));
        let t0 = Instant::now();
        cache.put_at("index:page=1", "cached".to_owned(), t0);

        let just_before = t0 + Duration::from_secs(19);
        assert_eq!(
            cache.get_at("index:page=1", just_before).as_deref(),
            Some("cached")
        );
    }

    #[test]
    fn expires_exactly_at_the_ttl() {
        let cache = FeedCache::new(Duration::from_secs(20));
        let t0 = Instant::now();
        cache.put_at("index:page=1", "cached".to_owned(), t0);

        assert!(
            cache
                .get_at("index:page=1", t0 + Duration::from_secs(20))
                .is_none()
        );
        // the expired entry is gone, not resurrected by an earlier clock
        assert!(cache.get_at("index:page=1", t0).is_none());
    }

    #[test]
    fn keys_are_independent() {
        let cache = FeedCache::new(Duration::from_secs(20));
        let t0 = Instant::now();
        cache.put_at("index:page=1", "one".to_owned(), t0);
        cache.put_at("index:page=2", "two".to_owned(), t0);

        assert_eq!(cache.get_at("index:page=2", t0).as_deref(), Some("two"));
        assert!(cache.get_at("index:page=3", t0).is_none());
    }
}
