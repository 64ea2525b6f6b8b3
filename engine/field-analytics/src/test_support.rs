//! Shared fixtures for unit tests.

use contest_registry::{ContestTable, Entry, EntryId, PlayerId, PlayerInfo, Rank};

pub fn entry(entry_id: EntryId, rank: Rank, roster: &[PlayerId]) -> Entry {
    entry_for_user(entry_id, &format!("user{entry_id}"), rank, roster)
}

pub fn entry_for_user(
    entry_id: EntryId,
    username: &str,
    rank: Rank,
    roster: &[PlayerId],
) -> Entry {
    Entry {
        entry_id,
        username: username.to_string(),
        rank,
        points: 400.0 - rank as f64,
        roster: roster.to_vec(),
    }
}

pub fn player(player_id: PlayerId, name: &str, team: &str) -> PlayerInfo {
    player_in_game(player_id, name, team, &format!("{team}@OPP"))
}

pub fn player_in_game(
    player_id: PlayerId,
    name: &str,
    team: &str,
    game_id: &str,
) -> PlayerInfo {
    PlayerInfo {
        player_id,
        name: name.to_string(),
        team: Some(team.to_string()),
        game_id: Some(game_id.to_string()),
        salary: Some(7500),
    }
}

pub fn contest(entries: Vec<Entry>, players: Vec<PlayerInfo>) -> ContestTable {
    ContestTable::freeze("draftkings".into(), "nba".into(), entries, players, vec![])
        .unwrap()
}
