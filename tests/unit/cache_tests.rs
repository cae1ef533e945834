// Result cache tests through the public API

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use nutriboard::cache::{CacheConfig, CacheKey, Operation, ResultCache};

#[test]
fn test_cache_keys_are_deterministic_and_tagged() {
    let key = CacheKey::search("nutella", 10);
    assert_eq!(key, CacheKey::search("nutella", 10));
    assert_eq!(key.operation(), Operation::Search);

    let rendered = key.to_string();
    assert!(rendered.starts_with("off_search_"));
    // sha256 hex digest
    assert_eq!(rendered.len(), "off_search_".len() + 64);
}

#[test]
fn test_cache_keys_separate_parameters_and_operations() {
    assert_ne!(CacheKey::search("tea", 5), CacheKey::search("tea", 10));
    assert_ne!(CacheKey::search("tea", 5), CacheKey::category("tea", 5));
    assert_ne!(
        CacheKey::new(Operation::Search, &["ab", "c"]),
        CacheKey::new(Operation::Search, &["a", "bc"])
    );
    assert!(CacheKey::product("123").to_string().starts_with("off_product_"));
}

#[tokio::test]
async fn test_get_or_compute_caches_successes_only() {
    let cache: ResultCache<Vec<u32>> = ResultCache::new(&CacheConfig::default());
    let calls = AtomicUsize::new(0);
    let ttl = Duration::from_secs(60);

    let failed: Result<Vec<u32>, String> = cache
        .get_or_compute(CacheKey::category("snacks", 5), ttl, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err("upstream down".to_string())
        })
        .await;
    assert!(failed.is_err());

    for _ in 0..3 {
        let value: Result<Vec<u32>, String> = cache
            .get_or_compute(CacheKey::category("snacks", 5), ttl, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![1, 2, 3])
            })
            .await;
        assert_eq!(value.unwrap(), vec![1, 2, 3]);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let stats = cache.stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 2);
}

#[tokio::test]
async fn test_cached_absence_is_a_hit() {
    let cache: ResultCache<Option<String>> = ResultCache::with_capacity(10);
    let calls = AtomicUsize::new(0);
    let ttl = Duration::from_secs(60);

    for _ in 0..2 {
        let value: Result<Option<String>, String> = cache
            .get_or_compute(CacheKey::product("0000"), ttl, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })
            .await;
        assert_eq!(value.unwrap(), None);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
