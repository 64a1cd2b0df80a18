use super::*;
use crate::storage::MemoryStorage;

fn runtime(bot_name: Option<&str>, shopify_domain: Option<&str>) -> RuntimeConfig {
    RuntimeConfig { bot_name: bot_name.map(str::to_owned), shopify_domain: shopify_domain.map(str::to_owned) }
}

// =============================================================
// SessionConfig::resolve
// =============================================================

#[test]
fn persisted_value_wins_over_runtime_config() {
    let mut storage = MemoryStorage::with_entries([(KEY_BOT_NAME, "Zed")]);
    let cfg = SessionConfig::resolve(&runtime(Some("Orb"), None), &mut storage);
    assert_eq!(cfg.bot_name, "Zed");
}

#[test]
fn runtime_config_used_when_storage_empty() {
    let mut storage = MemoryStorage::new();
    let cfg = SessionConfig::resolve(&runtime(Some("Orb"), Some("orb.myshopify.com")), &mut storage);
    assert_eq!(cfg.bot_name, "Orb");
    assert_eq!(cfg.shop_domain, "orb.myshopify.com");
}

#[test]
fn defaults_used_when_both_absent() {
    let mut storage = MemoryStorage::new();
    let cfg = SessionConfig::resolve(&RuntimeConfig::default(), &mut storage);
    assert_eq!(cfg.bot_name, DEFAULT_BOT_NAME);
    assert_eq!(cfg.shop_domain, DEFAULT_SHOP_DOMAIN);
    assert_eq!(cfg.auth_token, None);
}

#[test]
fn empty_strings_fall_through() {
    let mut storage = MemoryStorage::with_entries([(KEY_BOT_NAME, "")]);
    let cfg = SessionConfig::resolve(&runtime(Some(""), None), &mut storage);
    assert_eq!(cfg.bot_name, DEFAULT_BOT_NAME);
}

#[test]
fn resolved_values_written_back() {
    let mut storage = MemoryStorage::new();
    SessionConfig::resolve(&runtime(Some("Orb"), None), &mut storage);
    assert_eq!(storage.get(KEY_BOT_NAME).as_deref(), Some("Orb"));
    assert_eq!(storage.get(KEY_SHOPIFY_DOMAIN).as_deref(), Some(DEFAULT_SHOP_DOMAIN));
    assert_eq!(storage.get(KEY_SHOPIFY_TOKEN), None);
}

#[test]
fn reload_reuses_persisted_values_over_changed_config() {
    let mut storage = MemoryStorage::new();
    let first = SessionConfig::resolve(&runtime(Some("Orb"), None), &mut storage);
    let second = SessionConfig::resolve(&runtime(Some("Other"), Some("other.test")), &mut storage);
    assert_eq!(first, second);
}

#[test]
fn token_comes_from_storage_only() {
    let mut storage = MemoryStorage::with_entries([(KEY_SHOPIFY_TOKEN, "shpat_1234abcd")]);
    let cfg = SessionConfig::resolve(&RuntimeConfig::default(), &mut storage);
    assert_eq!(cfg.auth_token.as_deref(), Some("shpat_1234abcd"));
    assert_eq!(cfg.masked_token(), "**********abcd");
}

#[test]
fn masked_token_without_token() {
    let mut storage = MemoryStorage::new();
    let cfg = SessionConfig::resolve(&RuntimeConfig::default(), &mut storage);
    assert_eq!(cfg.masked_token(), "(none)");
}

// =============================================================
// RuntimeConfig
// =============================================================

#[test]
fn runtime_config_from_json_ignores_unknown_fields() {
    let cfg = RuntimeConfig::from_json(r#"{"bot_name":"Orb","theme":"dark"}"#).unwrap();
    assert_eq!(cfg, runtime(Some("Orb"), None));
}

#[test]
fn runtime_config_merge_prefers_overlay() {
    let base = runtime(Some("File"), Some("file.test"));
    let merged = base.merged_with(runtime(Some("Flag"), None));
    assert_eq!(merged, runtime(Some("Flag"), Some("file.test")));
}

// =============================================================
// ClientConfig
// =============================================================

#[test]
fn client_config_urls_trim_trailing_slash() {
    let cfg = ClientConfig::default().with_base_url("http://shop.test/");
    assert_eq!(cfg.chat_url(), "http://shop.test/chat");
    assert_eq!(cfg.health_url(), "http://shop.test/health");
}

#[test]
fn client_config_defaults() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.reveal_interval, Duration::from_millis(20));
    assert_eq!(cfg.request_timeout, Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
}

#[test]
fn env_parse_u64_falls_back_on_garbage() {
    assert_eq!(env_parse_u64("SEEP_TEST_UNSET_VARIABLE_FOR_PARSE", 9), 9);
}
