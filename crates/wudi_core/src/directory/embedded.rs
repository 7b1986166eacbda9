//! Embedded sample league data
//!
//! `include_str!` keeps the sample dataset inside the binary. The JSON is
//! normalized (people, teams and fields are listed once and referenced by
//! id); `resolve` expands it into the denormalized `LeagueInfo` the pages
//! consume.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

use crate::error::{CoreError, Result};
use crate::models::{
    Field, Game, GameStatus, League, LeagueInfo, LeagueType, Person, Schedule, Season, SeasonInfo,
    Team,
};

/// Spring 2025 sample season (~9KB)
pub const SAMPLE_LEAGUE_JSON: &str = include_str!("../../data/sample_league.json");

// ============================================================================
// Normalized on-disk shape
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct RawDirectory {
    contact_email: Option<String>,
    emergency_number: Option<String>,
    #[serde(default)]
    people: Vec<Person>,
    #[serde(default)]
    fields: Vec<Field>,
    current_season: Option<RawSeason>,
}

#[derive(Debug, Deserialize)]
struct RawSeason {
    id: String,
    season: Season,
    year: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    description: Option<String>,
    theme: Option<String>,
    #[serde(default)]
    leagues: Vec<RawLeague>,
}

#[derive(Debug, Deserialize)]
struct RawLeague {
    id: String,
    name: String,
    #[serde(rename = "type")]
    league_type: LeagueType,
    description: Option<String>,
    teams: Option<Vec<RawTeam>>,
    schedule: Option<RawSchedule>,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    id: String,
    name: String,
    #[serde(default)]
    captains: Vec<String>,
    #[serde(default)]
    players: Vec<String>,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSchedule {
    id: String,
    #[serde(default)]
    games: Vec<RawGame>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    playoff_start_date: Option<NaiveDate>,
    weeks: u32,
}

#[derive(Debug, Deserialize)]
struct RawGame {
    id: String,
    home_team: String,
    away_team: String,
    date: NaiveDate,
    time: String,
    field: String,
    status: GameStatus,
    week: Option<u32>,
    round: Option<String>,
    notes: Option<String>,
}

// ============================================================================
// Resolution
// ============================================================================

pub(crate) fn parse(json: &str) -> Result<LeagueInfo> {
    let raw: RawDirectory = serde_json::from_str(json)?;
    resolve(raw)
}

fn resolve(raw: RawDirectory) -> Result<LeagueInfo> {
    let people: HashMap<&str, &Person> = raw.people.iter().map(|p| (p.id.as_str(), p)).collect();
    let fields: HashMap<&str, &Field> = raw.fields.iter().map(|f| (f.id.as_str(), f)).collect();

    let current_season = match raw.current_season {
        Some(season) => Some(resolve_season(season, &people, &fields)?),
        None => None,
    };

    Ok(LeagueInfo {
        current_season,
        contact_email: raw.contact_email,
        emergency_number: raw.emergency_number,
    })
}

fn resolve_season(
    raw: RawSeason,
    people: &HashMap<&str, &Person>,
    fields: &HashMap<&str, &Field>,
) -> Result<SeasonInfo> {
    let mut seen_games = HashSet::new();
    let mut leagues = Vec::with_capacity(raw.leagues.len());

    for league in raw.leagues {
        let resolved = resolve_league(league, people, fields)?;
        for game in resolved.games() {
            // Game ids are the lookup key for the whole season
            if !seen_games.insert(game.id.clone()) {
                return Err(CoreError::InvalidData(format!("duplicate game id '{}'", game.id)));
            }
        }
        leagues.push(resolved);
    }

    Ok(SeasonInfo {
        id: raw.id,
        season: raw.season,
        year: raw.year,
        leagues,
        start_date: raw.start_date,
        end_date: raw.end_date,
        description: raw.description,
        theme: raw.theme,
    })
}

fn resolve_league(
    raw: RawLeague,
    people: &HashMap<&str, &Person>,
    fields: &HashMap<&str, &Field>,
) -> Result<League> {
    let teams = match raw.teams {
        Some(teams) => Some(
            teams
                .into_iter()
                .map(|t| resolve_team(t, people))
                .collect::<Result<Vec<Team>>>()?,
        ),
        None => None,
    };

    let schedule = match raw.schedule {
        Some(schedule) => {
            let by_id: HashMap<&str, &Team> = teams
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .map(|t| (t.id.as_str(), t))
                .collect();
            let games = schedule
                .games
                .into_iter()
                .map(|g| resolve_game(g, &by_id, fields))
                .collect::<Result<Vec<Game>>>()?;
            Some(Schedule {
                id: schedule.id,
                games,
                start_date: schedule.start_date,
                end_date: schedule.end_date,
                playoff_start_date: schedule.playoff_start_date,
                weeks: schedule.weeks,
            })
        }
        None => None,
    };

    Ok(League {
        id: raw.id,
        name: raw.name,
        league_type: raw.league_type,
        teams,
        schedule,
        description: raw.description,
    })
}

fn resolve_team(raw: RawTeam, people: &HashMap<&str, &Person>) -> Result<Team> {
    let lookup = |id: &String| -> Result<Person> {
        people.get(id.as_str()).map(|p| (*p).clone()).ok_or_else(|| {
            CoreError::InvalidData(format!("team '{}' references unknown person '{}'", raw.id, id))
        })
    };

    let players = raw.players.iter().map(lookup).collect::<Result<Vec<_>>>()?;
    let captains = raw.captains.iter().map(lookup).collect::<Result<Vec<_>>>()?;

    Ok(Team { id: raw.id, name: raw.name, captains, players, color: raw.color })
}

fn resolve_game(
    raw: RawGame,
    teams: &HashMap<&str, &Team>,
    fields: &HashMap<&str, &Field>,
) -> Result<Game> {
    let team = |id: &str| -> Result<Team> {
        teams.get(id).map(|t| (*t).clone()).ok_or_else(|| {
            CoreError::InvalidData(format!("game '{}' references unknown team '{}'", raw.id, id))
        })
    };

    if raw.home_team == raw.away_team {
        return Err(CoreError::InvalidData(format!(
            "game '{}' has the same team on both sides",
            raw.id
        )));
    }

    let home_team = team(raw.home_team.as_str())?;
    let away_team = team(raw.away_team.as_str())?;
    let field = fields.get(raw.field.as_str()).map(|f| (*f).clone()).ok_or_else(|| {
        CoreError::InvalidData(format!("game '{}' references unknown field '{}'", raw.id, raw.field))
    })?;

    Ok(Game {
        id: raw.id,
        home_team,
        away_team,
        date: raw.date,
        time: raw.time,
        field,
        status: raw.status,
        week: raw.week,
        round: raw.round,
        notes: raw.notes,
    })
}
