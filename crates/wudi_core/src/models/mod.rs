//! League domain types
//!
//! Denormalized read-only records as the page layer sees them: a `Game`
//! carries full `Team` values (with rosters) for both sides.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeagueType {
    #[serde(rename = "Co-ed")]
    Coed,
    #[serde(rename = "Women's")]
    Womens,
    #[serde(rename = "Recreational")]
    Recreational,
}

impl LeagueType {
    /// Short form used in page routes and storage keys.
    pub fn slug(&self) -> &'static str {
        match self {
            LeagueType::Coed => "coed",
            LeagueType::Womens => "womens",
            LeagueType::Recreational => "recreational",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LeagueType::Coed => "Co-ed",
            LeagueType::Womens => "Women's",
            LeagueType::Recreational => "Recreational",
        }
    }
}

impl FromStr for LeagueType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coed" | "co-ed" => Ok(LeagueType::Coed),
            "womens" | "women's" => Ok(LeagueType::Womens),
            "recreational" | "rec" => Ok(LeagueType::Recreational),
            other => Err(CoreError::NotFound { kind: "League", id: other.to_string() }),
        }
    }
}

impl fmt::Display for LeagueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
    Postponed,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            GameStatus::Scheduled => "Scheduled",
            GameStatus::InProgress => "In Progress",
            GameStatus::Completed => "Completed",
            GameStatus::Cancelled => "Cancelled",
            GameStatus::Postponed => "Postponed",
        };
        f.write_str(name)
    }
}

/// Player, captain or coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub captains: Vec<Person>,
    #[serde(default)]
    pub players: Vec<Person>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Team {
    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn find_player(&self, player_id: &str) -> Option<&Person> {
        self.players.iter().find(|p| p.id == player_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub name: String,
    pub number: u32,
}

/// A single scheduled match between two teams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub home_team: Team,
    pub away_team: Team,
    pub date: NaiveDate,
    /// 24-hour "HH:MM"
    pub time: String,
    pub field: Field,
    pub status: GameStatus,
    pub week: Option<u32>,
    /// "Semifinals", "Finals", ...
    pub round: Option<String>,
    pub notes: Option<String>,
}

impl Game {
    pub fn involves(&self, team_id: &str) -> bool {
        self.home_team.id == team_id || self.away_team.id == team_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub games: Vec<Game>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub playoff_start_date: Option<NaiveDate>,
    pub weeks: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub league_type: LeagueType,
    pub teams: Option<Vec<Team>>,
    pub schedule: Option<Schedule>,
    pub description: Option<String>,
}

impl League {
    pub fn games(&self) -> &[Game] {
        self.schedule.as_ref().map(|s| s.games.as_slice()).unwrap_or(&[])
    }
}

/// One season, containing several leagues
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonInfo {
    pub id: String,
    pub season: Season,
    pub year: i32,
    pub leagues: Vec<League>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub theme: Option<String>,
}

/// Top-level organization info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueInfo {
    pub current_season: Option<SeasonInfo>,
    pub contact_email: Option<String>,
    pub emergency_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_league_type_slugs_parse_back() {
        for lt in [LeagueType::Coed, LeagueType::Womens, LeagueType::Recreational] {
            assert_eq!(lt.slug().parse::<LeagueType>().unwrap(), lt);
        }
        assert!("ultimate".parse::<LeagueType>().is_err());
    }

    #[test]
    fn test_league_type_serde_names() {
        let json = serde_json::to_string(&LeagueType::Womens).unwrap();
        assert_eq!(json, "\"Women's\"");
        let parsed: LeagueType = serde_json::from_str("\"Co-ed\"").unwrap();
        assert_eq!(parsed, LeagueType::Coed);
    }

    #[test]
    fn test_game_status_in_progress_name() {
        let parsed: GameStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(parsed, GameStatus::InProgress);
        assert_eq!(parsed.to_string(), "In Progress");
    }
}
