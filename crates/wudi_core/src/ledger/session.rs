//! Game detail session
//!
//! Everything the game page keeps while it is open: the game, one binding
//! per (team, record kind), which team is selected and which tab is shown.
//! Bindings are fixed per team; switching the selected team only changes
//! which pair of bindings the controls act on.

use std::fmt;
use std::str::FromStr;

use super::records::{adjust_stat, team_score, toggle_attendance, PlayerStatRecord, StatName};
use super::{AttendanceRecord, GameLedger, GameScore, StatsRecord};
use crate::directory::GameDirectory;
use crate::error::{CoreError, Result};
use crate::models::{Game, Person, Team};
use crate::store::Binding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamSide {
    Home,
    Away,
}

impl FromStr for TeamSide {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(TeamSide::Home),
            "away" => Ok(TeamSide::Away),
            other => Err(CoreError::InvalidData(format!("unknown team side '{other}'"))),
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            TeamSide::Home => "home",
            TeamSide::Away => "away",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionTab {
    #[default]
    Attendance,
    Stats,
}

/// One roster row as the page renders it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterLine<'a> {
    pub player: &'a Person,
    pub present: bool,
    pub stats: PlayerStatRecord,
}

#[derive(Debug)]
struct TeamRecords {
    attendance: Binding<AttendanceRecord>,
    stats: Binding<StatsRecord>,
}

impl TeamRecords {
    fn bind(ledger: &GameLedger, game_id: &str, team_id: &str) -> Self {
        Self {
            attendance: ledger.bind_attendance(game_id, team_id),
            stats: ledger.bind_stats(game_id, team_id),
        }
    }
}

#[derive(Debug)]
pub struct GameSession {
    game: Game,
    home: TeamRecords,
    away: TeamRecords,
    selected: Option<TeamSide>,
    active_tab: SessionTab,
}

impl GameSession {
    /// Look the game up and bind its records. A directory miss is
    /// `CoreError::NotFound`; rendering it is up to the caller.
    pub fn open(ledger: &GameLedger, directory: &impl GameDirectory, game_id: &str) -> Result<Self> {
        let game = directory
            .find_game_by_id(game_id)
            .ok_or_else(|| CoreError::game_not_found(game_id))?;
        Ok(Self::for_game(ledger, game.clone()))
    }

    pub fn for_game(ledger: &GameLedger, game: Game) -> Self {
        ledger.initialize_game(&game);
        let home = TeamRecords::bind(ledger, &game.id, &game.home_team.id);
        let away = TeamRecords::bind(ledger, &game.id, &game.away_team.id);

        Self { game, home, away, selected: None, active_tab: SessionTab::default() }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::Home => &self.game.home_team,
            TeamSide::Away => &self.game.away_team,
        }
    }

    /// Which side a team id plays on in this game
    pub fn side_of(&self, team_id: &str) -> Option<TeamSide> {
        if self.game.home_team.id == team_id {
            Some(TeamSide::Home)
        } else if self.game.away_team.id == team_id {
            Some(TeamSide::Away)
        } else {
            None
        }
    }

    // ========================
    // Selection
    // ========================

    pub fn selected(&self) -> Option<TeamSide> {
        self.selected
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.selected.map(|side| self.team(side))
    }

    /// Select a team; the tab always resets to attendance.
    pub fn select_team(&mut self, side: TeamSide) {
        self.selected = Some(side);
        self.active_tab = SessionTab::Attendance;
    }

    pub fn active_tab(&self) -> SessionTab {
        self.active_tab
    }

    pub fn set_tab(&mut self, tab: SessionTab) {
        self.active_tab = tab;
    }

    // ========================
    // Controls
    // ========================

    /// Toggle a player on the selected team. `false` when no team is
    /// selected or the player is not on its roster.
    pub fn toggle_attendance(&mut self, player_id: &str) -> bool {
        let Some(side) = self.selected_roster_side(player_id) else {
            return false;
        };
        self.records_mut(side).attendance.update(|prev| toggle_attendance(prev, player_id));
        true
    }

    /// Adjust a stat for a player on the selected team (clamped at 0).
    pub fn adjust_stat(&mut self, player_id: &str, stat: StatName, delta: i32) -> bool {
        let Some(side) = self.selected_roster_side(player_id) else {
            return false;
        };
        self.records_mut(side).stats.update(|prev| adjust_stat(prev, player_id, stat, delta));
        true
    }

    fn selected_roster_side(&self, player_id: &str) -> Option<TeamSide> {
        let side = self.selected?;
        self.team(side).has_player(player_id).then_some(side)
    }

    // ========================
    // Read side
    // ========================

    pub fn attendance(&self, side: TeamSide) -> &AttendanceRecord {
        self.records(side).attendance.value()
    }

    pub fn stats(&self, side: TeamSide) -> &StatsRecord {
        self.records(side).stats.value()
    }

    /// Both scores, each from its own team's stats binding.
    pub fn scores(&self) -> GameScore {
        GameScore {
            home: team_score(self.stats(TeamSide::Home)),
            away: team_score(self.stats(TeamSide::Away)),
        }
    }

    pub fn roster_lines(&self, side: TeamSide) -> Vec<RosterLine<'_>> {
        let attendance = self.attendance(side);
        let stats = self.stats(side);

        self.team(side)
            .players
            .iter()
            .map(|player| RosterLine {
                player,
                present: attendance.get(&player.id).copied().unwrap_or(false),
                stats: stats.get(&player.id).copied().unwrap_or_default(),
            })
            .collect()
    }

    /// Re-read all four records (another tab or process may have written).
    pub fn refresh(&mut self) {
        for records in [&mut self.home, &mut self.away] {
            records.attendance.reload();
            records.stats.reload();
        }
    }

    fn records(&self, side: TeamSide) -> &TeamRecords {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    fn records_mut(&mut self, side: TeamSide) -> &mut TeamRecords {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }
}
