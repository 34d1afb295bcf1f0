use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Rejections produced by the session state machine. The Display strings are
/// the exact messages relayed to the offending client; none of these mutate
/// state or end a session.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SessionError {
    #[error("Game already started")]
    AlreadyStarted,
    #[error("Need at least 3 players")]
    NotEnoughPlayers,
    #[error("Not clue phase")]
    NotCluePhase,
    #[error("Not your turn")]
    NotYourTurn,
    #[error("Not voting phase")]
    NotVotingPhase,
    #[error("Player not in game")]
    UnknownPlayer,
    #[error("Vote target not in game")]
    UnknownTarget,
}

/// Rejections produced by the room directory, reported to the requester only.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoomError {
    #[error("Room not found")]
    RoomNotFound,
    #[error("Game already in progress")]
    GameInProgress,
    #[error("Room is full")]
    RoomFull,
    #[error("Only host can start the game")]
    NotHost,
    #[error("All players must be ready")]
    PlayersNotReady,
    #[error("No game in progress")]
    NoActiveGame,
    #[error("{0}")]
    InvalidClue(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}
