#![allow(clippy::unwrap_used)]

use std::collections::HashMap;

use super::*;

#[derive(Default)]
struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    fn with(pairs: &[(&str, &str)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn save_api_settings(&mut self, endpoint: &str, credential: &str) -> Result<()> {
        self.values.insert(KEY_API_BASE_URL.into(), endpoint.into());
        self.values.insert(KEY_API_KEY.into(), credential.into());
        Ok(())
    }
}

fn defaults() -> ApiConfig {
    ApiConfig::new("http://default:8000", "default-key")
}

// ── resolve ───────────────────────────────────────────────────

#[test]
fn test_no_overrides_equals_defaults() {
    let store = MemoryStore::default();
    assert_eq!(resolve(&store, &defaults()).unwrap(), defaults());
}

#[test]
fn test_endpoint_override_only() {
    let store = MemoryStore::with(&[(KEY_API_BASE_URL, "http://custom")]);
    let cfg = resolve(&store, &defaults()).unwrap();
    assert_eq!(cfg.endpoint, "http://custom");
    assert_eq!(cfg.credential, "default-key");
}

#[test]
fn test_credential_override_only() {
    let store = MemoryStore::with(&[(KEY_API_KEY, "mine")]);
    let cfg = resolve(&store, &defaults()).unwrap();
    assert_eq!(cfg.endpoint, "http://default:8000");
    assert_eq!(cfg.credential, "mine");
}

#[test]
fn test_empty_override_falls_back() {
    let store = MemoryStore::with(&[(KEY_API_BASE_URL, ""), (KEY_API_KEY, "")]);
    assert_eq!(resolve(&store, &defaults()).unwrap(), defaults());
}

#[test]
fn test_resolve_against_database() {
    let mut db = crate::db::Database::open_in_memory().unwrap();
    assert_eq!(resolve(&db, &defaults()).unwrap(), defaults());
    db.set_setting(KEY_API_KEY, "stored").unwrap();
    let cfg = resolve(&db, &defaults()).unwrap();
    assert_eq!(cfg.credential, "stored");
    assert_eq!(cfg.endpoint, "http://default:8000");
    save(&mut db, &ApiConfig::new("http://both", "both-key")).unwrap();
    assert_eq!(
        resolve(&db, &defaults()).unwrap(),
        ApiConfig::new("http://both", "both-key")
    );
}

// ── save ──────────────────────────────────────────────────────

#[test]
fn test_save_round_trips_through_resolve() {
    let mut store = MemoryStore::default();
    save(&mut store, &ApiConfig::new("http://saved", "saved-key")).unwrap();
    let cfg = resolve(&store, &defaults()).unwrap();
    assert_eq!(cfg, ApiConfig::new("http://saved", "saved-key"));
}

#[test]
fn test_save_strips_trailing_slash_and_whitespace() {
    let mut store = MemoryStore::default();
    save(&mut store, &ApiConfig::new("  http://api.example/  ", " k ")).unwrap();
    assert_eq!(store.values[KEY_API_BASE_URL], "http://api.example");
    assert_eq!(store.values[KEY_API_KEY], "k");
}

#[test]
fn test_save_does_not_validate() {
    let mut store = MemoryStore::default();
    save(&mut store, &ApiConfig::new("not a url", "")).unwrap();
    assert_eq!(store.values[KEY_API_BASE_URL], "not a url");
}

// ── mask ──────────────────────────────────────────────────────

#[test]
fn test_mask_short_secret() {
    assert_eq!(mask(""), "");
    assert_eq!(mask("abcd"), "****");
}

#[test]
fn test_mask_keeps_last_four() {
    assert_eq!(mask("secret-1234"), "*******1234");
    assert_eq!(ApiConfig::new("x", "abcdef").masked_credential(), "**cdef");
}
