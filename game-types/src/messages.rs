use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Difficulty, PlayerId, RoleInfo, RosterPlayer, SharedState};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ClientMessage {
    CreateRoom {
        player_name: String,
        difficulty: Difficulty,
        impostor_hint_enabled: bool,
    },
    JoinRoom {
        room_code: String,
        player_name: String,
    },
    ToggleReady {
        room_code: String,
    },
    StartGame {
        room_code: String,
    },
    SubmitClue {
        room_code: String,
        clue: String,
    },
    SubmitVote {
        room_code: String,
        target_id: PlayerId,
    },
    DismissRoleReveal {
        room_code: String,
    },
    GetRoomState {
        room_code: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ServerMessage {
    RoomCreated {
        room_code: String,
        player_id: PlayerId,
    },
    RoomJoined {
        room_code: String,
        player_id: PlayerId,
    },
    RoomUpdated {
        players: Vec<RosterPlayer>,
    },
    /// Sent individually to each player: the shared state is identical for
    /// everyone, the role payload is the recipient's own.
    GameStarted {
        state: SharedState,
        role_info: RoleInfo,
    },
    GameStateUpdated {
        state: SharedState,
    },
    GameEnded {
        message: String,
    },
    Error {
        message: String,
    },
}
