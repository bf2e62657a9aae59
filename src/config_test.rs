use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn from_lookup_requires_base_url() {
    let err = StorefrontConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::Missing { var: "STOREFRONT_BASE_URL" }));
    assert_eq!(err.error_code(), "E_CONFIG_MISSING");
}

#[test]
fn from_lookup_rejects_blank_base_url() {
    let result = StorefrontConfig::from_lookup(lookup_from(&[("STOREFRONT_BASE_URL", "   ")]));
    assert!(result.is_err());
}

#[test]
fn from_lookup_applies_defaults() {
    let cfg = StorefrontConfig::from_lookup(lookup_from(&[("STOREFRONT_BASE_URL", "https://shop.test/")])).unwrap();
    assert_eq!(cfg.base_url, "https://shop.test");
    assert_eq!(cfg.namespace, DEFAULT_NAMESPACE);
    assert_eq!(cfg.wishlist_max, None);
    assert_eq!(cfg.recently_viewed_max, DEFAULT_RECENTLY_VIEWED_MAX);
    assert_eq!(cfg.notice_ttl, Duration::from_millis(DEFAULT_NOTICE_TTL_MS));
    assert_eq!(cfg.search, SearchSettings::default());
    assert_eq!(cfg.timeouts, HttpTimeouts::default());
    assert_eq!(cfg.storage_path, None);
}

#[test]
fn from_lookup_parses_overrides() {
    let cfg = StorefrontConfig::from_lookup(lookup_from(&[
        ("STOREFRONT_BASE_URL", "http://127.0.0.1:9000"),
        ("STOREFRONT_NAMESPACE", "shop"),
        ("STOREFRONT_WISHLIST_MAX", "50"),
        ("STOREFRONT_RECENTLY_VIEWED_MAX", "4"),
        ("STOREFRONT_NOTICE_TTL_MS", "1500"),
        ("STOREFRONT_SEARCH_DEBOUNCE_MS", "0"),
        ("STOREFRONT_SEARCH_MIN_CHARS", "3"),
        ("STOREFRONT_SEARCH_LIMIT", "8"),
        ("STOREFRONT_REQUEST_TIMEOUT_SECS", "5"),
        ("STOREFRONT_CONNECT_TIMEOUT_SECS", "2"),
        ("STOREFRONT_STORAGE_PATH", "/tmp/storefront.json"),
    ]))
    .unwrap();

    assert_eq!(cfg.namespace, "shop");
    assert_eq!(cfg.wishlist_max, Some(50));
    assert_eq!(cfg.recently_viewed_max, 4);
    assert_eq!(cfg.notice_ttl, Duration::from_millis(1500));
    assert_eq!(
        cfg.search,
        SearchSettings { debounce: Duration::ZERO, min_chars: 3, limit: 8 }
    );
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 5, connect_secs: 2 });
    assert_eq!(cfg.storage_path, Some(PathBuf::from("/tmp/storefront.json")));
}

#[test]
fn from_lookup_falls_back_on_unparsable_numbers() {
    let cfg = StorefrontConfig::from_lookup(lookup_from(&[
        ("STOREFRONT_BASE_URL", "https://shop.test"),
        ("STOREFRONT_RECENTLY_VIEWED_MAX", "ten"),
        ("STOREFRONT_WISHLIST_MAX", "-1"),
    ]))
    .unwrap();
    assert_eq!(cfg.recently_viewed_max, DEFAULT_RECENTLY_VIEWED_MAX);
    assert_eq!(cfg.wishlist_max, None);
}
