//! # wudi_core - Local Scoreboard for the WUDI League Site
//!
//! This library holds everything below the page layer of the league site:
//! the read-only league directory, a keyed JSON store over pluggable
//! backends, and the game ledger that tracks attendance and per-player
//! stats for each (game, team) pair.
//!
//! ## Features
//! - Deterministic `game-<game>-<team>-<kind>` storage keys
//! - Scores derived from stat records, never stored
//! - Storage failures degrade to fallbacks with a logged warning
//! - Memory and file backends behind one `StorageBackend` port

pub mod config;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod models;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{BackendKind, StorageConfig};
pub use directory::{
    filter_games, format_game_date, format_game_time, games_by_date, GameDirectory,
    LeagueDirectory, ScheduleFilter,
};
pub use error::{CoreError, Result};
pub use ledger::{
    adjust_stat, attendance_key, default_player_stats, stats_key, team_score, toggle_attendance,
    AttendanceRecord, FollowedTeams, GameLedger, GameScore, GameSession, PlayerStatRecord,
    RecordKind, RosterLine, SessionTab, StatName, StatsRecord, StorageKey, TeamSide,
};
pub use models::{
    Game, GameStatus, League, LeagueInfo, LeagueType, Person, Season, SeasonInfo, Team,
};
pub use store::{
    Binding, BindingState, FileStorage, KeyedLocalStore, MemoryStorage, StorageBackend,
    StoreError,
};
