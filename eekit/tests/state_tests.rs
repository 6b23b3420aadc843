//! Persistence tests: application state round-trips through the SQLite store

use eekit::state::{HistoryKind, DEFAULT_CREDITS};
use eekit::store::keys;
use eekit::{AppState, KvStore};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> KvStore {
    KvStore::open(&dir.path().join("nested").join("eekit.db")).unwrap()
}

#[test]
fn test_fresh_store_loads_defaults() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let state = AppState::load(&store).unwrap();
    assert_eq!(state, AppState::default());
    assert_eq!(state.credits(), DEFAULT_CREDITS);
}

#[test]
fn test_state_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = store_in(&dir);
        let mut state = AppState::load(&store).unwrap();
        assert!(state.consume(5));
        state.watch("nvda");
        state.record_search("buck converter 3A");
        state.record_history(HistoryKind::Chat, "Consult: LDO", "Use an AMS1117", None);
        state.settings.set("output_format", "json").unwrap();
        state.save(&store).unwrap();
    }

    let store = store_in(&dir);
    let state = AppState::load(&store).unwrap();
    assert_eq!(state.credits(), DEFAULT_CREDITS - 5);
    assert_eq!(state.watchlist, vec!["NVDA"]);
    assert_eq!(state.search_history, vec!["buck converter 3A"]);
    assert_eq!(state.history.len(), 1);
    assert_eq!(state.history[0].content, "Use an AMS1117");
    assert_eq!(state.settings.output_format, "json");
}

#[test]
fn test_malformed_entries_load_as_empty() {
    let store = KvStore::open_in_memory().unwrap();
    store.set(keys::WATCHLIST, "not json").unwrap();
    store.set(keys::AI_HISTORY, r#"{"unexpected":"object"}"#).unwrap();
    store.set(keys::SEARCH_HISTORY, r#"["ldo","buck"]"#).unwrap();

    let state = AppState::load(&store).unwrap();
    assert!(state.watchlist.is_empty());
    assert!(state.history.is_empty());
    assert_eq!(state.search_history, vec!["ldo", "buck"]);
}

#[test]
fn test_json_shapes_per_key() {
    let store = KvStore::open_in_memory().unwrap();
    let mut state = AppState::default();
    state.watch("TSM");
    state.save(&store).unwrap();

    let account: serde_json::Value = store.get_json(keys::USER_ACCOUNT).unwrap().unwrap();
    assert_eq!(account["credits"], DEFAULT_CREDITS);
    assert!(account.get("totalUsage").is_some());

    let raw = store.get(keys::WATCHLIST).unwrap().unwrap();
    assert_eq!(raw, r#"["TSM"]"#);

    let mut stored = store.keys().unwrap();
    stored.sort();
    assert!(stored.contains(&keys::SETTINGS.to_string()));
    assert_eq!(stored.len(), 7);
}
