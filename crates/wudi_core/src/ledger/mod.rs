//! Game ledger
//!
//! Attendance and per-player stats for each (game, team) pair, kept in a
//! `KeyedLocalStore`. The ledger holds no state of its own: it derives keys,
//! reads and writes records, and computes scores from them on every call.

pub mod followed;
pub mod keys;
pub(crate) mod migration;
pub mod records;
pub mod session;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::Game;
use crate::store::{Binding, KeyedLocalStore};

pub use followed::FollowedTeams;
pub use keys::{attendance_key, stats_key, RecordKind, StorageKey};
pub use records::{
    adjust_stat, default_player_stats, team_score, toggle_attendance, AttendanceRecord,
    PlayerStatRecord, StatName, StatsRecord,
};
pub use session::{GameSession, RosterLine, SessionTab, TeamSide};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameScore {
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone)]
pub struct GameLedger {
    store: KeyedLocalStore,
}

impl GameLedger {
    pub fn new(store: KeyedLocalStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &KeyedLocalStore {
        &self.store
    }

    // ========================
    // Records
    // ========================

    pub fn attendance(&self, game_id: &str, team_id: &str) -> AttendanceRecord {
        self.read_record(game_id, team_id, RecordKind::Attendance)
    }

    pub fn stats(&self, game_id: &str, team_id: &str) -> StatsRecord {
        self.read_record(game_id, team_id, RecordKind::Stats)
    }

    pub fn save_attendance(&self, game_id: &str, team_id: &str, record: &AttendanceRecord) -> bool {
        self.store.write(attendance_key(game_id, team_id).as_str(), record)
    }

    pub fn save_stats(&self, game_id: &str, team_id: &str, record: &StatsRecord) -> bool {
        self.store.write(stats_key(game_id, team_id).as_str(), record)
    }

    /// Read, toggle, write back. Returns the new record.
    pub fn toggle_player_attendance(
        &self,
        game_id: &str,
        team_id: &str,
        player_id: &str,
    ) -> AttendanceRecord {
        let next = toggle_attendance(&self.attendance(game_id, team_id), player_id);
        self.save_attendance(game_id, team_id, &next);
        next
    }

    /// Read, adjust, write back. Returns the new record.
    pub fn adjust_player_stat(
        &self,
        game_id: &str,
        team_id: &str,
        player_id: &str,
        stat: StatName,
        delta: i32,
    ) -> StatsRecord {
        let next = adjust_stat(&self.stats(game_id, team_id), player_id, stat, delta);
        self.save_stats(game_id, team_id, &next);
        next
    }

    // ========================
    // Scores
    // ========================

    pub fn score_for(&self, game_id: &str, team_id: &str) -> u32 {
        team_score(&self.stats(game_id, team_id))
    }

    pub fn game_score(&self, game: &Game) -> GameScore {
        GameScore {
            home: self.score_for(&game.id, &game.home_team.id),
            away: self.score_for(&game.id, &game.away_team.id),
        }
    }

    /// Pair each game with its derived score, for schedule listings.
    pub fn scoreboard<'a>(
        &self,
        games: impl IntoIterator<Item = &'a Game>,
    ) -> Vec<(&'a Game, GameScore)> {
        games.into_iter().map(|game| (game, self.game_score(game))).collect()
    }

    // ========================
    // Page wiring
    // ========================

    /// Copy records saved under the historical unescaped keys of a directory
    /// game to their escaped keys. Returns how many records were copied.
    pub fn migrate_game(&self, game: &Game) -> usize {
        let mut copied = 0;
        for team_id in [&game.home_team.id, &game.away_team.id] {
            for kind in [RecordKind::Attendance, RecordKind::Stats] {
                if migration::migrate_legacy_key(&self.store, &game.id, team_id, kind) {
                    copied += 1;
                }
            }
        }
        copied
    }

    /// Make sure all four records of a game exist, so later reads of either
    /// team see `{}` rather than nothing. Legacy data is carried over first.
    pub fn initialize_game(&self, game: &Game) {
        self.migrate_game(game);
        for team_id in [&game.home_team.id, &game.away_team.id] {
            for kind in [RecordKind::Attendance, RecordKind::Stats] {
                let key = StorageKey::derive(&game.id, team_id, kind);
                match kind {
                    RecordKind::Attendance => {
                        self.store.ensure(key.as_str(), &AttendanceRecord::new())
                    }
                    RecordKind::Stats => self.store.ensure(key.as_str(), &StatsRecord::new()),
                };
            }
        }
    }

    pub fn bind_attendance(&self, game_id: &str, team_id: &str) -> Binding<AttendanceRecord> {
        self.bind_record(game_id, team_id, RecordKind::Attendance)
    }

    pub fn bind_stats(&self, game_id: &str, team_id: &str) -> Binding<StatsRecord> {
        self.bind_record(game_id, team_id, RecordKind::Stats)
    }

    fn read_record<T>(&self, game_id: &str, team_id: &str, kind: RecordKind) -> T
    where
        T: DeserializeOwned + Default,
    {
        let key = StorageKey::derive(game_id, team_id, kind);
        self.store.read(key.as_str(), T::default())
    }

    fn bind_record<T>(&self, game_id: &str, team_id: &str, kind: RecordKind) -> Binding<T>
    where
        T: Clone + Serialize + DeserializeOwned + Default,
    {
        let key = StorageKey::derive(game_id, team_id, kind);
        self.store.bind(key.as_str(), T::default())
    }
}
