use crate::models::LeagueType;
use crate::store::KeyedLocalStore;

pub const FOLLOWED_TEAMS_PREFIX: &str = "wudi-selected-teams-";

/// Teams a visitor follows on a league's schedule page, stored per league
/// type as a JSON array of team ids.
#[derive(Debug, Clone)]
pub struct FollowedTeams {
    store: KeyedLocalStore,
    key: String,
}

impl FollowedTeams {
    pub fn new(store: KeyedLocalStore, league_type: LeagueType) -> Self {
        Self { store, key: format!("{}{}", FOLLOWED_TEAMS_PREFIX, league_type.slug()) }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn team_ids(&self) -> Vec<String> {
        self.store.read(&self.key, Vec::new())
    }

    pub fn is_followed(&self, team_id: &str) -> bool {
        self.team_ids().iter().any(|id| id == team_id)
    }

    /// Follow or unfollow; returns the updated list.
    pub fn toggle(&self, team_id: &str) -> Vec<String> {
        let mut ids = self.team_ids();
        if let Some(pos) = ids.iter().position(|id| id == team_id) {
            ids.remove(pos);
        } else {
            ids.push(team_id.to_string());
        }
        self.store.write(&self.key, &ids);
        ids
    }

    pub fn clear(&self) {
        self.store.remove(&self.key);
    }
}
