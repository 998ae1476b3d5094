use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::fetch::CadQuery;
use super::model::NeoDataset;

// ---------------------------------------------------------------------------
// Fetch memoization keyed by request parameters
// ---------------------------------------------------------------------------

/// Identifies one fetch: the endpoint (or offline file) plus its query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: String,
    pub query: CadQuery,
}

impl CacheKey {
    pub fn new(source: impl Into<String>, query: CadQuery) -> Self {
        CacheKey {
            source: source.into(),
            query,
        }
    }
}

struct Entry {
    dataset: Arc<NeoDataset>,
    stored: Instant,
}

/// Derived datasets by [`CacheKey`]. Without a TTL entries live until
/// invalidated.
pub struct FetchCache {
    entries: HashMap<CacheKey, Entry>,
    ttl: Option<Duration>,
}

impl FetchCache {
    pub fn new(ttl: Option<Duration>) -> Self {
        FetchCache {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Arc<NeoDataset>> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &CacheKey, now: Instant) -> Option<Arc<NeoDataset>> {
        let entry = self.entries.get(key)?;
        if let Some(ttl) = self.ttl {
            if now.saturating_duration_since(entry.stored) > ttl {
                return None;
            }
        }
        Some(Arc::clone(&entry.dataset))
    }

    pub fn insert(&mut self, key: CacheKey, dataset: Arc<NeoDataset>) {
        self.insert_at(key, dataset, Instant::now());
    }

    fn insert_at(&mut self, key: CacheKey, dataset: Arc<NeoDataset>, stored: Instant) {
        self.entries.insert(key, Entry { dataset, stored });
    }

    /// Drop one entry so the next request goes back to the source.
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dataset(source: &str) -> Arc<NeoDataset> {
        Arc::new(NeoDataset {
            records: Vec::new(),
            fields: vec!["des".into()],
            source: source.into(),
            fetched_at: Utc::now(),
        })
    }

    #[test]
    fn keyed_by_query_parameters() {
        let mut cache = FetchCache::new(None);
        let two_years = CacheKey::new("https://example.test/cad.api", CadQuery::default());
        let one_month = CacheKey::new(
            "https://example.test/cad.api",
            CadQuery { date_max_days: 30 },
        );

        cache.insert(two_years.clone(), dataset("a"));
        assert_eq!(cache.get(&two_years).unwrap().source, "a");
        assert!(cache.get(&one_month).is_none());

        cache.insert(one_month.clone(), dataset("b"));
        assert_eq!(cache.get(&two_years).unwrap().source, "a");
        assert_eq!(cache.get(&one_month).unwrap().source, "b");
    }

    #[test]
    fn source_is_part_of_the_key() {
        let mut cache = FetchCache::new(None);
        cache.insert(CacheKey::new("a.json", CadQuery::default()), dataset("a"));
        assert!(cache
            .get(&CacheKey::new("b.json", CadQuery::default()))
            .is_none());
    }

    #[test]
    fn ttl_expires_entries() {
        let mut cache = FetchCache::new(Some(Duration::from_secs(60)));
        let key = CacheKey::new("x", CadQuery::default());
        let t0 = Instant::now();
        cache.insert_at(key.clone(), dataset("x"), t0);

        assert!(cache.get_at(&key, t0 + Duration::from_secs(59)).is_some());
        assert!(cache.get_at(&key, t0 + Duration::from_secs(61)).is_none());
    }

    #[test]
    fn invalidate_drops_one_entry() {
        let mut cache = FetchCache::new(None);
        let key = CacheKey::new("x", CadQuery::default());
        let other = CacheKey::new("y", CadQuery::default());
        cache.insert(key.clone(), dataset("x"));
        cache.insert(other.clone(), dataset("y"));

        assert!(cache.invalidate(&key));
        assert!(!cache.invalidate(&key));
        assert!(cache.get(&key).is_none());
        assert!(cache.get(&other).is_some());
    }
}
