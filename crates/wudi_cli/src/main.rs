//! WUDI league CLI
//!
//! Terminal stand-in for the site's pages: schedule listings with locally
//! derived scores, the game detail view, attendance / stat controls and the
//! followed-team filter. All persistence goes through `wudi_core`.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use wudi_core::{
    filter_games, format_game_date, format_game_time, games_by_date, BackendKind, FollowedTeams,
    Game, GameDirectory, GameLedger, GameScore, GameSession, LeagueDirectory, LeagueType,
    ScheduleFilter, SessionTab, StatName, StorageConfig, TeamSide,
};

#[derive(Parser)]
#[command(name = "wudi")]
#[command(about = "WUDI league schedules and a local scoreboard", long_about = None)]
struct Cli {
    /// Directory for stored attendance and stats (overrides WUDI_STORAGE_DIR)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    /// Storage namespace (overrides WUDI_ORIGIN)
    #[arg(long, global = true)]
    origin: Option<String>,

    /// Keep everything in memory for this run only
    #[arg(long, global = true)]
    memory: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the season schedule with local scores
    Schedule {
        /// all, upcoming or completed
        #[arg(long, default_value = "all")]
        filter: ScheduleFilter,

        /// Only this league (coed, womens, recreational)
        #[arg(long)]
        league: Option<LeagueType>,

        /// Reference date for "upcoming" (YYYY-MM-DD, default today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Show one game: score, rosters, attendance and stats
    Game {
        game_id: String,
    },

    /// Toggle a player's attendance
    Attend {
        game_id: String,
        /// home or away
        side: TeamSide,
        player_id: String,
    },

    /// Add (or with --down, remove) one assist or goal
    Stat {
        game_id: String,
        /// home or away
        side: TeamSide,
        player_id: String,
        /// goals or assists
        stat: StatName,
        #[arg(long)]
        down: bool,
    },

    /// Games of one league, grouped by date, limited to followed teams
    League {
        league: LeagueType,
    },

    /// Follow or unfollow a team on a league's page
    Follow {
        league: LeagueType,
        team_id: String,
    },

    /// Stop following every team in a league
    UnfollowAll {
        league: LeagueType,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = StorageConfig::load_from_env().context("Failed to load storage config")?;
    if let Some(dir) = cli.storage_dir {
        config.dir = dir;
    }
    if let Some(origin) = cli.origin {
        config.origin = origin;
    }
    if cli.memory {
        config.backend = BackendKind::Memory;
    }
    config.validate()?;

    let store = config.open_store().context("Failed to open local storage")?;
    let ledger = GameLedger::new(store.clone());
    let directory = LeagueDirectory::sample()?;

    match cli.command {
        Commands::Schedule { filter, league, today } => {
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            print_schedule(&ledger, directory, filter, league, today)?;
        }

        Commands::Game { game_id } => {
            let session = open_session(&ledger, directory, &game_id)?;
            print_game(&session);
        }

        Commands::Attend { game_id, side, player_id } => {
            let mut session = open_session(&ledger, directory, &game_id)?;
            session.select_team(side);
            if !session.toggle_attendance(&player_id) {
                bail!("{} is not on the {} roster", player_id, session.team(side).name);
            }
            let present = session.attendance(side).get(&player_id).copied().unwrap_or(false);
            println!(
                "✅ {} marked {}",
                player_name(&session, side, &player_id),
                if present { "present" } else { "absent" }
            );
        }

        Commands::Stat { game_id, side, player_id, stat, down } => {
            let mut session = open_session(&ledger, directory, &game_id)?;
            session.select_team(side);
            session.set_tab(SessionTab::Stats);
            let delta = if down { -1 } else { 1 };
            if !session.adjust_stat(&player_id, stat, delta) {
                bail!("{} is not on the {} roster", player_id, session.team(side).name);
            }
            let value =
                session.stats(side).get(&player_id).map(|s| s.get(stat)).unwrap_or_default();
            println!("✅ {} {}: {}", player_name(&session, side, &player_id), stat, value);
            print_score_line(&session);
        }

        Commands::League { league } => {
            let followed = FollowedTeams::new(store, league);
            print_league(&ledger, directory, league, &followed.team_ids())?;
        }

        Commands::Follow { league, team_id } => {
            let known = directory
                .find_league(league)
                .and_then(|l| l.teams.as_ref())
                .is_some_and(|teams| teams.iter().any(|t| t.id == team_id));
            if !known {
                bail!("No team '{}' in the {} league", team_id, league);
            }

            let followed = FollowedTeams::new(store, league);
            let now = followed.toggle(&team_id);
            let verb = if now.contains(&team_id) { "Following" } else { "Unfollowed" };
            println!("{} {} ({} followed)", verb, team_id, now.len());
        }

        Commands::UnfollowAll { league } => {
            FollowedTeams::new(store, league).clear();
            println!("Cleared followed teams for the {} league", league);
        }
    }

    Ok(())
}

fn open_session(
    ledger: &GameLedger,
    directory: &LeagueDirectory,
    game_id: &str,
) -> Result<GameSession> {
    GameSession::open(ledger, directory, game_id)
        .with_context(|| format!("The game you're looking for ('{}') could not be found", game_id))
}

fn player_name(session: &GameSession, side: TeamSide, player_id: &str) -> String {
    session
        .team(side)
        .find_player(player_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| player_id.to_string())
}

fn print_schedule(
    ledger: &GameLedger,
    directory: &LeagueDirectory,
    filter: ScheduleFilter,
    league: Option<LeagueType>,
    today: NaiveDate,
) -> Result<()> {
    let Some(season) = directory.current_season() else {
        bail!("No active season found");
    };

    let games: Vec<&Game> = match league {
        Some(league_type) => match directory.find_league(league_type) {
            Some(l) => l.games().iter().collect(),
            None => bail!("The {} league could not be found", league_type),
        },
        None => directory.all_games(),
    };

    println!("{} {} Schedule ({})", season.season, season.year, filter);
    let selected = filter_games(games, filter, today);
    if selected.is_empty() {
        println!("  No games.");
        return Ok(());
    }

    for game in &selected {
        ledger.migrate_game(game);
    }
    for (game, score) in ledger.scoreboard(selected) {
        print_game_row(game, score);
    }
    Ok(())
}

fn print_league(
    ledger: &GameLedger,
    directory: &LeagueDirectory,
    league: LeagueType,
    followed: &[String],
) -> Result<()> {
    let Some(league_data) = directory.find_league(league) else {
        bail!("The {} league could not be found", league.slug());
    };

    println!("{}", league_data.name);
    if !followed.is_empty() {
        println!("Following: {}", followed.join(", "));
    }

    let grouped = games_by_date(league_data.games(), followed);
    if grouped.is_empty() {
        println!("  No games scheduled.");
        return Ok(());
    }

    for (date, games) in grouped {
        println!("\n{}", format_game_date(&date.to_string()));
        for game in &games {
            ledger.migrate_game(game);
        }
        for (game, score) in ledger.scoreboard(games) {
            print_game_row(game, score);
        }
    }
    Ok(())
}

fn print_game_row(game: &Game, score: GameScore) {
    let round = game.round.as_deref().map(|r| format!(" [{}]", r)).unwrap_or_default();
    println!(
        "  {:<8} {} {:>8}  {:<10} {:>2} - {:<2} {:<10}  {}{}",
        game.id,
        game.date,
        format_game_time(&game.time),
        game.home_team.name,
        score.home,
        score.away,
        game.away_team.name,
        game.field.name,
        round
    );
}

fn print_score_line(session: &GameSession) {
    let score = session.scores();
    let game = session.game();
    println!("   {} {} - {} {}", game.home_team.name, score.home, score.away, game.away_team.name);
}

fn print_game(session: &GameSession) {
    let game = session.game();
    println!(
        "{} • {} • {}",
        format_game_date(&game.date.to_string()),
        format_game_time(&game.time),
        game.field.name
    );
    if let Some(round) = &game.round {
        println!("{}", round);
    }
    if let Some(notes) = &game.notes {
        println!("{}", notes);
    }
    print_score_line(session);

    for side in [TeamSide::Home, TeamSide::Away] {
        println!("\n{} ({})", session.team(side).name, side);
        println!("  {:<12} {:<20} {:>7} {:>7} {:>5}", "id", "player", "present", "assists", "goals");
        for line in session.roster_lines(side) {
            println!(
                "  {:<12} {:<20} {:>7} {:>7} {:>5}",
                line.player.id,
                line.player.name,
                if line.present { "yes" } else { "-" },
                line.stats.assists,
                line.stats.goals
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_stat_command() {
        let cli = Cli::try_parse_from([
            "wudi", "--memory", "stat", "game-3", "away", "person-6", "goals", "--down",
        ])
        .unwrap();

        match cli.command {
            Commands::Stat { side, stat, down, .. } => {
                assert_eq!(side, TeamSide::Away);
                assert_eq!(stat, StatName::Goals);
                assert!(down);
            }
            _ => panic!("expected stat command"),
        }
        assert!(cli.memory);
    }

    #[test]
    fn test_parse_rejects_unknown_side() {
        assert!(Cli::try_parse_from(["wudi", "attend", "game-3", "middle", "person-1"]).is_err());
    }
}
