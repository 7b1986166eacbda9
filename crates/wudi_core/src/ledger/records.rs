//! Attendance and stat records, and the pure transforms the pages apply.
//!
//! Every transform returns a new record; inputs are never modified.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Player id -> present
pub type AttendanceRecord = BTreeMap<String, bool>;

/// Player id -> tallies
pub type StatsRecord = BTreeMap<String, PlayerStatRecord>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStatRecord {
    #[serde(default, deserialize_with = "lenient_count")]
    pub assists: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub goals: u32,
}

impl PlayerStatRecord {
    pub fn get(&self, stat: StatName) -> u32 {
        match stat {
            StatName::Assists => self.assists,
            StatName::Goals => self.goals,
        }
    }

    fn set(&mut self, stat: StatName, value: u32) {
        match stat {
            StatName::Assists => self.assists = value,
            StatName::Goals => self.goals = value,
        }
    }
}

/// Older records may hold `null`, negative or fractional counts; read them
/// as a clamped non-negative integer instead of rejecting the whole record.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let count = match value {
        Some(serde_json::Value::Number(n)) => match n.as_u64() {
            Some(u) => u.min(u32::MAX as u64) as u32,
            None => n.as_f64().filter(|f| *f > 0.0).map(|f| f.min(u32::MAX as f64) as u32).unwrap_or(0),
        },
        _ => 0,
    };
    Ok(count)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatName {
    Assists,
    Goals,
}

impl StatName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatName::Assists => "assists",
            StatName::Goals => "goals",
        }
    }
}

impl FromStr for StatName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assists" | "assist" => Ok(StatName::Assists),
            "goals" | "goal" => Ok(StatName::Goals),
            other => Err(CoreError::InvalidData(format!("unknown stat '{other}'"))),
        }
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn default_player_stats() -> PlayerStatRecord {
    PlayerStatRecord { assists: 0, goals: 0 }
}

/// Sum of goals across the record. Assists never count.
pub fn team_score(stats: &StatsRecord) -> u32 {
    stats.values().fold(0u32, |score, player| score.saturating_add(player.goals))
}

/// Flip one player's presence; an absent entry counts as `false`.
pub fn toggle_attendance(record: &AttendanceRecord, player_id: &str) -> AttendanceRecord {
    let mut next = record.clone();
    let present = record.get(player_id).copied().unwrap_or(false);
    next.insert(player_id.to_string(), !present);
    next
}

/// Add `delta` to one player's stat, clamping at zero.
pub fn adjust_stat(
    record: &StatsRecord,
    player_id: &str,
    stat: StatName,
    delta: i32,
) -> StatsRecord {
    let mut next = record.clone();
    let entry = next.entry(player_id.to_string()).or_insert_with(default_player_stats);

    let current = entry.get(stat);
    let updated = if delta >= 0 {
        current.saturating_add(delta.unsigned_abs())
    } else {
        current.saturating_sub(delta.unsigned_abs())
    };
    entry.set(stat, updated);
    next
}
