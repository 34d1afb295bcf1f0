use std::sync::Arc;
use tracing::info;

use crate::directory::{RoomDirectory, canonical_code};
use crate::websocket::connection::{ConnectionId, ConnectionManager};
use game_types::{ClientMessage, Difficulty, PlayerId, ServerMessage, Settings};

#[derive(Clone)]
pub struct MessageHandler {
    connection_id: ConnectionId,
    connection_manager: Arc<ConnectionManager>,
    directory: Arc<RoomDirectory>,
}

impl MessageHandler {
    pub fn new(
        connection_id: ConnectionId,
        connection_manager: Arc<ConnectionManager>,
        directory: Arc<RoomDirectory>,
    ) -> Self {
        Self {
            connection_id,
            connection_manager,
            directory,
        }
    }

    pub async fn handle_message(&self, message: ClientMessage) -> Result<(), String> {
        match message {
            ClientMessage::CreateRoom {
                player_name,
                difficulty,
                impostor_hint_enabled,
            } => {
                self.handle_create_room(player_name, difficulty, impostor_hint_enabled)
                    .await
            }
            ClientMessage::JoinRoom {
                room_code,
                player_name,
            } => self.handle_join_room(room_code, player_name).await,
            ClientMessage::ToggleReady { room_code } => self.handle_toggle_ready(room_code).await,
            ClientMessage::StartGame { room_code } => self.handle_start_game(room_code).await,
            ClientMessage::SubmitClue { room_code, clue } => {
                self.handle_submit_clue(room_code, clue).await
            }
            ClientMessage::SubmitVote {
                room_code,
                target_id,
            } => self.handle_submit_vote(room_code, target_id).await,
            ClientMessage::DismissRoleReveal { room_code } => {
                self.handle_dismiss_role_reveal(room_code).await
            }
            ClientMessage::GetRoomState { room_code } => {
                self.handle_get_room_state(room_code).await
            }
        }
    }

    pub async fn handle_disconnect(&self) {
        info!("Handling disconnect for connection {}", self.connection_id);
        self.leave_current_room().await;
    }

    async fn handle_create_room(
        &self,
        player_name: String,
        difficulty: Difficulty,
        impostor_hint_enabled: bool,
    ) -> Result<(), String> {
        // A socket that was already seated somewhere leaves that room first,
        // so no ghost roster entry lingers behind.
        self.leave_current_room().await;

        let settings = Settings {
            difficulty,
            impostor_hint_enabled,
        };
        let created = self.directory.create_room(&player_name, settings).await;

        self.connection_manager
            .bind_player(
                self.connection_id,
                created.player_id,
                created.room_code.clone(),
            )
            .await;

        self.send_message(ServerMessage::RoomCreated {
            room_code: created.room_code.clone(),
            player_id: created.player_id,
        })
        .await?;
        self.connection_manager
            .send_to_room(
                &created.room_code,
                ServerMessage::RoomUpdated {
                    players: created.roster,
                },
            )
            .await;

        Ok(())
    }

    async fn handle_join_room(
        &self,
        room_code: String,
        player_name: String,
    ) -> Result<(), String> {
        match self.directory.join_room(&room_code, &player_name).await {
            Ok(joined) => {
                self.leave_current_room().await;
                self.connection_manager
                    .bind_player(
                        self.connection_id,
                        joined.player_id,
                        joined.room_code.clone(),
                    )
                    .await;

                self.send_message(ServerMessage::RoomJoined {
                    room_code: joined.room_code.clone(),
                    player_id: joined.player_id,
                })
                .await?;
                self.connection_manager
                    .send_to_room(
                        &joined.room_code,
                        ServerMessage::RoomUpdated {
                            players: joined.roster,
                        },
                    )
                    .await;
                Ok(())
            }
            Err(e) => self.send_error(&e.to_string()).await,
        }
    }

    async fn handle_toggle_ready(&self, room_code: String) -> Result<(), String> {
        let Some(player_id) = self.current_player().await else {
            return self.send_error("Not in a room").await;
        };
        let room_code = canonical_code(&room_code);

        match self.directory.toggle_ready(&room_code, player_id).await {
            Ok(roster) => {
                self.connection_manager
                    .send_to_room(&room_code, ServerMessage::RoomUpdated { players: roster })
                    .await;
                Ok(())
            }
            Err(e) => self.send_error(&e.to_string()).await,
        }
    }

    async fn handle_start_game(&self, room_code: String) -> Result<(), String> {
        let Some(player_id) = self.current_player().await else {
            return self.send_error("Not in a room").await;
        };
        let room_code = canonical_code(&room_code);

        match self.directory.start_game(&room_code, player_id).await {
            Ok(started) => {
                // Everyone gets the same shared snapshot but only their own
                // role payload; the secret word never rides a broadcast.
                for role_info in started.role_infos {
                    let _ = self
                        .connection_manager
                        .send_to_player(
                            role_info.player_id,
                            ServerMessage::GameStarted {
                                state: started.state.clone(),
                                role_info,
                            },
                        )
                        .await;
                }
                Ok(())
            }
            Err(e) => self.send_error(&e.to_string()).await,
        }
    }

    async fn handle_submit_clue(&self, room_code: String, clue: String) -> Result<(), String> {
        let Some(player_id) = self.current_player().await else {
            return self.send_error("Not in a room").await;
        };
        let room_code = canonical_code(&room_code);

        match self
            .directory
            .submit_clue(&room_code, player_id, &clue)
            .await
        {
            Ok(state) => {
                self.connection_manager
                    .send_to_room(&room_code, ServerMessage::GameStateUpdated { state })
                    .await;
                Ok(())
            }
            Err(e) => self.send_error(&e.to_string()).await,
        }
    }

    async fn handle_submit_vote(
        &self,
        room_code: String,
        target_id: PlayerId,
    ) -> Result<(), String> {
        let Some(player_id) = self.current_player().await else {
            return self.send_error("Not in a room").await;
        };
        let room_code = canonical_code(&room_code);

        match self
            .directory
            .submit_vote(&room_code, player_id, target_id)
            .await
        {
            Ok(state) => {
                self.connection_manager
                    .send_to_room(&room_code, ServerMessage::GameStateUpdated { state })
                    .await;
                Ok(())
            }
            Err(e) => self.send_error(&e.to_string()).await,
        }
    }

    async fn handle_dismiss_role_reveal(&self, room_code: String) -> Result<(), String> {
        let room_code = canonical_code(&room_code);

        match self.directory.dismiss_role_reveal(&room_code).await {
            Ok(state) => {
                self.connection_manager
                    .send_to_room(&room_code, ServerMessage::GameStateUpdated { state })
                    .await;
                Ok(())
            }
            Err(e) => self.send_error(&e.to_string()).await,
        }
    }

    /// Replays the roster and any in-flight game to the requester only, so a
    /// client that reconnected mid-game can catch up.
    async fn handle_get_room_state(&self, room_code: String) -> Result<(), String> {
        match self.directory.room_state(&room_code).await {
            Ok(view) => {
                self.send_message(ServerMessage::RoomUpdated {
                    players: view.roster,
                })
                .await?;
                if let Some(state) = view.state {
                    self.send_message(ServerMessage::GameStateUpdated { state })
                        .await?;
                }
                Ok(())
            }
            Err(e) => self.send_error(&e.to_string()).await,
        }
    }

    async fn leave_current_room(&self) {
        let Some(connection) = self
            .connection_manager
            .get_connection(self.connection_id)
            .await
        else {
            return;
        };
        let (Some(player_id), Some(room_code)) = (connection.player_id, connection.room_code)
        else {
            return;
        };

        let Some(outcome) = self.directory.handle_leave(&room_code, player_id).await else {
            return;
        };

        self.connection_manager
            .send_to_room_except(
                &outcome.room_code,
                self.connection_id,
                ServerMessage::RoomUpdated {
                    players: outcome.roster,
                },
            )
            .await;

        if outcome.session_abandoned {
            self.connection_manager
                .send_to_room_except(
                    &outcome.room_code,
                    self.connection_id,
                    ServerMessage::GameEnded {
                        message: "Not enough players".to_string(),
                    },
                )
                .await;
        }
    }

    async fn current_player(&self) -> Option<PlayerId> {
        self.connection_manager
            .get_connection(self.connection_id)
            .await?
            .player_id
    }

    async fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.connection_manager
            .send_to_connection(self.connection_id, message)
            .await
    }

    async fn send_error(&self, error_message: &str) -> Result<(), String> {
        self.send_message(ServerMessage::Error {
            message: error_message.to_string(),
        })
        .await
    }
}
