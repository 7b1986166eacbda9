use super::keys::{RecordKind, StorageKey};
use crate::store::{KeyedLocalStore, StoreError};

/// Carry a record stored under the historical unescaped key over to the
/// escaped key.
///
/// The historical key cannot tell `("game-1", "team-1")` from
/// `("game-1-team", "1")`, so callers must only pass pairs taken from the
/// league directory. Only runs when the two keys differ (an id contains `-`
/// or `%`) and nothing is stored under the escaped key yet. The legacy entry
/// is left in place. Backend failures are silent here; the caller's own read
/// reports them. Returns whether anything was copied.
pub(crate) fn migrate_legacy_key(
    store: &KeyedLocalStore,
    game_id: &str,
    team_id: &str,
    kind: RecordKind,
) -> bool {
    let key = StorageKey::derive(game_id, team_id, kind);
    let legacy = StorageKey::legacy(game_id, team_id, kind);

    if key.is_unbound() || key == legacy {
        return false;
    }
    if !matches!(store.try_contains(key.as_str()), Ok(false)) {
        return false;
    }

    match store.try_read::<serde_json::Value>(legacy.as_str()) {
        Ok(Some(value)) => {
            let copied = store.write(key.as_str(), &value);
            if copied {
                log::info!("Migrated {} record from \"{}\" to \"{}\"", kind, legacy, key);
            }
            copied
        }
        Ok(None) => false,
        Err(e @ StoreError::Malformed { .. }) => {
            log::warn!("Skipping legacy key \"{}\": {}", legacy, e);
            false
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::{shared_memory, UnavailableStorage};
    use crate::store::StorageBackend;
    use crate::test_support::{capture_logs, lines_at, warnings};

    #[test]
    fn test_legacy_record_is_copied() {
        capture_logs();
        let (memory, store) = shared_memory();
        memory.set_item("game-game-1-team-3-stats", r#"{"p":{"assists":0,"goals":2}}"#).unwrap();

        assert!(migrate_legacy_key(&store, "game-1", "team-3", RecordKind::Stats));

        let migrated = memory.get_item("game-game%2D1-team%2D3-stats").unwrap();
        assert_eq!(migrated.as_deref(), Some(r#"{"p":{"assists":0,"goals":2}}"#));
        assert!(memory.get_item("game-game-1-team-3-stats").unwrap().is_some());
        assert_eq!(lines_at(log::Level::Info).len(), 1);
    }

    #[test]
    fn test_existing_new_key_wins() {
        let (memory, store) = shared_memory();
        memory.set_item("game-game-1-team-3-stats", "{}").unwrap();
        memory.set_item("game-game%2D1-team%2D3-stats", r#"{"p":{"assists":1,"goals":0}}"#).unwrap();

        assert!(!migrate_legacy_key(&store, "game-1", "team-3", RecordKind::Stats));
        assert_eq!(
            memory.get_item("game-game%2D1-team%2D3-stats").unwrap().as_deref(),
            Some(r#"{"p":{"assists":1,"goals":0}}"#)
        );
    }

    #[test]
    fn test_plain_ids_need_no_migration() {
        let (memory, store) = shared_memory();
        memory.set_item("game-g1-th-attendance", r#"{"p1":true}"#).unwrap();
        assert!(!migrate_legacy_key(&store, "g1", "th", RecordKind::Attendance));
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_corrupt_legacy_value_is_skipped() {
        capture_logs();
        let (memory, store) = shared_memory();
        memory.set_item("game-a-b-c-attendance", "oops").unwrap();

        assert!(!migrate_legacy_key(&store, "a-b", "c", RecordKind::Attendance));
        assert_eq!(warnings().len(), 1);
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_unavailable_backend_is_silent() {
        capture_logs();
        let store = KeyedLocalStore::new(UnavailableStorage);

        assert!(!migrate_legacy_key(&store, "game-1", "team-1", RecordKind::Stats));
        assert!(warnings().is_empty());
    }
}
