//! Game metadata.
//!
//! The renderer only needs a game to learn which variant it is played in,
//! but the adapters normalize the whole record so callers can show it.

use serde::{Deserialize, Serialize};

/// Lifecycle stage of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Staging,
    Started,
    Finished,
}

impl GameStatus {
    /// Derives the status from the upstream flags. A finished game counts
    /// as finished even if it never reports having started.
    pub const fn from_flags(started: bool, finished: bool) -> Self {
        if finished {
            GameStatus::Finished
        } else if started {
            GameStatus::Started
        } else {
            GameStatus::Staging
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerIdentity {
    Anonymous,
    Public,
}

/// Summary of a phase as listed on its game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseMeta {
    pub ordinal: u32,
    pub season: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub phase_type: String,
    pub resolved: bool,
    pub created_at: String,
    pub resolved_at: String,
    pub deadline_at: String,
}

/// Normalized game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub name: String,
    pub variant: String,
    pub status: GameStatus,
    pub visibility: Visibility,
    pub player_identity: PlayerIdentity,
    pub anonymous: bool,
    pub private_game: bool,
    pub closed: bool,
    pub started: bool,
    pub finished: bool,
    /// True only when conference, group and private chat are all disabled.
    pub chat_disabled: bool,
    pub conference_chat_enabled: bool,
    pub group_chat_enabled: bool,
    pub private_chat_enabled: bool,
    pub chat_language: String,
    pub num_players: u32,
    pub end_year: i32,
    pub created_at: String,
    pub started_at: String,
    pub finished_at: String,
    pub newest_phase_meta: Vec<PhaseMeta>,
}

impl Game {
    /// Returns the most recent phase summary, if the game has one.
    pub fn newest_phase(&self) -> Option<&PhaseMeta> {
        self.newest_phase_meta.iter().max_by_key(|meta| meta.ordinal)
    }
}
