//! Read-only league directory
//!
//! The scoreboard never mutates league data; it only looks games up by id
//! and walks schedules for listings.

pub mod embedded;
pub mod schedule;

use once_cell::sync::Lazy;

use crate::error::{CoreError, Result};
use crate::models::{Game, League, LeagueInfo, LeagueType, SeasonInfo};

pub use schedule::{
    filter_games, format_game_date, format_game_time, games_by_date, ScheduleFilter,
};

static SAMPLE_DIRECTORY: Lazy<std::result::Result<LeagueDirectory, String>> =
    Lazy::new(|| LeagueDirectory::from_json(embedded::SAMPLE_LEAGUE_JSON).map_err(|e| e.to_string()));

/// Lookup interface the scoreboard consumes.
pub trait GameDirectory {
    fn info(&self) -> &LeagueInfo;

    fn current_season(&self) -> Option<&SeasonInfo> {
        self.info().current_season.as_ref()
    }

    /// Find a game by id across all leagues of the current season
    fn find_game_by_id(&self, game_id: &str) -> Option<&Game> {
        self.current_season()?
            .leagues
            .iter()
            .flat_map(|league| league.games())
            .find(|game| game.id == game_id)
    }

    fn find_league(&self, league_type: LeagueType) -> Option<&League> {
        self.current_season()?.leagues.iter().find(|l| l.league_type == league_type)
    }

    fn all_games(&self) -> Vec<&Game> {
        match self.current_season() {
            Some(season) => season.leagues.iter().flat_map(|l| l.games()).collect(),
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeagueDirectory {
    info: LeagueInfo,
}

impl LeagueDirectory {
    pub fn new(info: LeagueInfo) -> Self {
        Self { info }
    }

    /// Build from normalized JSON (see `embedded` for the shape)
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(embedded::parse(json)?))
    }

    /// Shared instance over the embedded sample season
    pub fn sample() -> Result<&'static LeagueDirectory> {
        (*SAMPLE_DIRECTORY).as_ref().map_err(|msg| CoreError::InvalidData(msg.clone()))
    }

    /// Like `find_game_by_id`, but a miss is an error for callers that
    /// render a "not found" state.
    pub fn require_game(&self, game_id: &str) -> Result<&Game> {
        self.find_game_by_id(game_id).ok_or_else(|| CoreError::game_not_found(game_id))
    }
}

impl GameDirectory for LeagueDirectory {
    fn info(&self) -> &LeagueInfo {
        &self.info
    }
}
