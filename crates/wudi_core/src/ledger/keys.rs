//! Storage key derivation
//!
//! Keys have the shape `game-<game>-<team>-<kind>`. Inside each id `%`
//! becomes `%25` and `-` becomes `%2D`, so no id can bleed into its
//! neighbour and distinct (game, team, kind) triples never share a key. Ids
//! without either character produce exactly the historical unescaped key.

use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Attendance,
    Stats,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Attendance => "attendance",
            RecordKind::Stats => "stats",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of one attendance or stats record. The empty key is "unbound".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn derive(game_id: &str, team_id: &str, kind: RecordKind) -> Self {
        if game_id.is_empty() || team_id.is_empty() {
            return Self::unbound();
        }
        StorageKey(format!(
            "game-{}-{}-{}",
            escape_component(game_id),
            escape_component(team_id),
            kind.as_str()
        ))
    }

    /// Key as written before ids were escaped. Equal to `derive` for ids
    /// containing neither `-` nor `%`.
    pub(crate) fn legacy(game_id: &str, team_id: &str, kind: RecordKind) -> Self {
        if game_id.is_empty() || team_id.is_empty() {
            return Self::unbound();
        }
        StorageKey(format!("game-{}-{}-{}", game_id, team_id, kind.as_str()))
    }

    pub fn unbound() -> Self {
        StorageKey(String::new())
    }

    pub fn is_unbound(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn attendance_key(game_id: &str, team_id: &str) -> StorageKey {
    StorageKey::derive(game_id, team_id, RecordKind::Attendance)
}

pub fn stats_key(game_id: &str, team_id: &str) -> StorageKey {
    StorageKey::derive(game_id, team_id, RecordKind::Stats)
}

fn escape_component(id: &str) -> Cow<'_, str> {
    if !id.contains(['-', '%']) {
        return Cow::Borrowed(id);
    }
    // '%' first so the escapes themselves are not re-escaped
    Cow::Owned(id.replace('%', "%25").replace('-', "%2D"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_ids_use_historical_shape() {
        assert_eq!(attendance_key("g1", "th").as_str(), "game-g1-th-attendance");
        assert_eq!(stats_key("g1", "th").as_str(), "game-g1-th-stats");
        assert_eq!(attendance_key("g1", "th"), StorageKey::legacy("g1", "th", RecordKind::Attendance));
    }

    #[test]
    fn test_dashed_ids_do_not_collide() {
        let a = stats_key("a-b", "c");
        let b = stats_key("a", "b-c");
        assert_ne!(a, b);
        assert_eq!(a.as_str(), "game-a%2Db-c-stats");
        assert_eq!(StorageKey::legacy("a-b", "c", RecordKind::Stats).as_str(), "game-a-b-c-stats");
    }

    #[test]
    fn test_escape_sequence_in_id_stays_distinct() {
        assert_ne!(stats_key("a%2Db", "c"), stats_key("a-b", "c"));
    }

    #[test]
    fn test_empty_ids_are_unbound() {
        assert!(attendance_key("", "th").is_unbound());
        assert!(stats_key("g1", "").is_unbound());
        assert!(!stats_key("g1", "th").is_unbound());
    }

    fn id() -> impl Strategy<Value = String> {
        "[a-z0-9%-]{1,8}"
    }

    proptest! {
        #[test]
        fn prop_keys_are_injective(g in id(), t in id(), g2 in id(), t2 in id()) {
            let same_ids = g == g2 && t == t2;
            prop_assert_eq!(attendance_key(&g, &t) == attendance_key(&g2, &t2), same_ids);
            prop_assert_eq!(stats_key(&g, &t) == stats_key(&g2, &t2), same_ids);
            prop_assert_ne!(attendance_key(&g, &t), stats_key(&g2, &t2));
        }

        #[test]
        fn prop_derivation_is_deterministic(g in ".{1,12}", t in ".{1,12}") {
            prop_assert_eq!(attendance_key(&g, &t), attendance_key(&g, &t));
            prop_assert_eq!(stats_key(&g, &t), stats_key(&g, &t));
        }
    }
}
