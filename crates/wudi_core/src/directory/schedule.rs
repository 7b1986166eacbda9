//! Schedule listing helpers: filtering, grouping and display formatting.

use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::models::{Game, GameStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleFilter {
    #[default]
    All,
    /// Games on or after `today`
    Upcoming,
    Completed,
}

impl FromStr for ScheduleFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ScheduleFilter::All),
            "upcoming" => Ok(ScheduleFilter::Upcoming),
            "completed" => Ok(ScheduleFilter::Completed),
            other => Err(CoreError::InvalidData(format!("unknown schedule filter '{other}'"))),
        }
    }
}

impl fmt::Display for ScheduleFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ScheduleFilter::All => "all",
            ScheduleFilter::Upcoming => "upcoming",
            ScheduleFilter::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Apply `filter` and sort by date, then kick-off time.
pub fn filter_games<'a>(
    games: impl IntoIterator<Item = &'a Game>,
    filter: ScheduleFilter,
    today: NaiveDate,
) -> Vec<&'a Game> {
    let mut selected: Vec<&Game> = games
        .into_iter()
        .filter(|game| match filter {
            ScheduleFilter::All => true,
            ScheduleFilter::Upcoming => game.date >= today,
            ScheduleFilter::Completed => game.status == GameStatus::Completed,
        })
        .collect();

    // "HH:MM" sorts lexically
    selected.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
    selected
}

/// Group games by date, keeping only games that involve a followed team.
/// An empty `followed` list keeps every game.
pub fn games_by_date<'a>(
    games: impl IntoIterator<Item = &'a Game>,
    followed: &[String],
) -> BTreeMap<NaiveDate, Vec<&'a Game>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<&Game>> = BTreeMap::new();

    for game in games {
        if !followed.is_empty() && !followed.iter().any(|id| game.involves(id)) {
            continue;
        }
        grouped.entry(game.date).or_default().push(game);
    }

    for day in grouped.values_mut() {
        day.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.field.number.cmp(&b.field.number)));
    }
    grouped
}

/// "2025-04-22" -> "Tue, Apr 22, 2025"
pub fn format_game_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%a, %b %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// "18:00" -> "6:00 PM"
pub fn format_game_time(time: &str) -> String {
    match NaiveTime::parse_from_str(time, "%H:%M") {
        Ok(t) => t.format("%-I:%M %p").to_string(),
        Err(_) => time.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{GameDirectory, LeagueDirectory};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_filter_completed_and_upcoming() {
        let dir = LeagueDirectory::sample().unwrap();

        let completed = filter_games(dir.all_games(), ScheduleFilter::Completed, day("2025-05-01"));
        assert_eq!(completed.len(), 4);

        let upcoming = filter_games(dir.all_games(), ScheduleFilter::Upcoming, day("2025-05-06"));
        let ids: Vec<&str> = upcoming.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["game-7", "game-8", "game-9"]);
    }

    #[test]
    fn test_filter_all_sorted_by_date_then_time() {
        let dir = LeagueDirectory::sample().unwrap();
        let all = filter_games(dir.all_games(), ScheduleFilter::All, day("2025-01-01"));

        assert_eq!(all.len(), 9);
        for pair in all.windows(2) {
            assert!((pair[0].date, &pair[0].time) <= (pair[1].date, &pair[1].time));
        }
    }

    #[test]
    fn test_games_by_date_with_followed_teams() {
        let dir = LeagueDirectory::sample().unwrap();

        let everything = games_by_date(dir.all_games(), &[]);
        assert_eq!(everything.len(), 4);

        let followed = vec!["team-4".to_string()];
        let grouped = games_by_date(dir.all_games(), &followed);
        let total: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(total, 4);
        assert!(grouped.values().flatten().all(|g| g.involves("team-4")));
    }

    #[test]
    fn test_format_game_date_and_time() {
        assert_eq!(format_game_date("2025-04-22"), "Tue, Apr 22, 2025");
        assert_eq!(format_game_time("18:00"), "6:00 PM");
        assert_eq!(format_game_time("18:40"), "6:40 PM");
        assert_eq!(format_game_time("00:05"), "12:05 AM");
        assert_eq!(format_game_time("12:30"), "12:30 PM");
    }

    #[test]
    fn test_format_passes_through_garbage() {
        assert_eq!(format_game_date("someday"), "someday");
        assert_eq!(format_game_time("dusk"), "dusk");
    }

    #[test]
    fn test_schedule_filter_parse() {
        assert_eq!("Upcoming".parse::<ScheduleFilter>().unwrap(), ScheduleFilter::Upcoming);
        assert!("later".parse::<ScheduleFilter>().is_err());
    }
}
