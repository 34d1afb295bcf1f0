use std::sync::Arc;
use warp::Filter;

use crate::directory::RoomDirectory;
use crate::websocket::ConnectionManager;

pub mod config;
pub mod directory;
pub mod websocket;

pub fn create_routes(
    connection_manager: Arc<ConnectionManager>,
    directory: Arc<RoomDirectory>,
    cors_origin: String,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let connection_manager_filter = warp::any().map({
        let connection_manager = connection_manager.clone();
        move || connection_manager.clone()
    });

    let directory_filter = warp::any().map({
        let directory = directory.clone();
        move || directory.clone()
    });

    // WebSocket endpoint
    let websocket = warp::path("ws")
        .and(warp::ws())
        .and(connection_manager_filter.clone())
        .and(directory_filter.clone())
        .map(|ws: warp::ws::Ws, conn_mgr, directory| {
            ws.on_upgrade(move |socket| websocket::handle_connection(socket, conn_mgr, directory))
        });

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    // CORS configuration
    let cors = warp::cors()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST"]);
    let cors = if cors_origin == "*" {
        cors.allow_any_origin()
    } else {
        cors.allow_origin(cors_origin.as_str())
    };

    websocket
        .or(health)
        .with(cors)
        .with(warp::log("word_mole"))
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use game_types::{
        ClientMessage, Difficulty, Phase, PlayerId, Role, RoleInfo, ServerMessage, SharedState,
        Winner,
    };

    fn create_test_app() -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone
    {
        let connection_manager = Arc::new(ConnectionManager::new());
        let directory = Arc::new(RoomDirectory::new(8));
        create_routes(connection_manager, directory, "*".to_string())
    }

    async fn recv_message(ws: &mut warp::test::WsClient) -> ServerMessage {
        let msg = ws.recv().await.expect("Should receive a message");
        let text = msg.to_str().expect("Should be a text message");
        serde_json::from_str(text).expect("Should be valid ServerMessage")
    }

    async fn drain(ws: &mut warp::test::WsClient, count: usize) {
        for _ in 0..count {
            let _ = ws.recv().await.expect("Should receive a message");
        }
    }

    async fn send(ws: &mut warp::test::WsClient, message: &ClientMessage) {
        let json = serde_json::to_string(message).expect("Should serialize");
        ws.send_text(json).await;
    }

    fn create_room_message(player_name: &str) -> ClientMessage {
        ClientMessage::CreateRoom {
            player_name: player_name.to_string(),
            difficulty: Difficulty::Medium,
            impostor_hint_enabled: true,
        }
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = warp::test::request()
            .method("GET")
            .path("/health")
            .reply(&app)
            .await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), "OK");
    }

    #[tokio::test]
    async fn test_websocket_invalid_message_handling() {
        let app = create_test_app();

        let mut ws = warp::test::ws()
            .path("/ws")
            .handshake(app)
            .await
            .expect("WebSocket handshake should succeed");

        ws.send_text("invalid json").await;

        let msg = recv_message(&mut ws).await;
        if let ServerMessage::Error { message } = msg {
            assert!(message.contains("Invalid JSON message"));
        } else {
            panic!("Expected error message, got: {:?}", msg);
        }

        // A bad frame must not kill the connection
        send(&mut ws, &create_room_message("Alice")).await;
        let msg = recv_message(&mut ws).await;
        assert!(matches!(msg, ServerMessage::RoomCreated { .. }));
    }

    #[tokio::test]
    async fn test_join_unknown_room_reports_error() {
        let app = create_test_app();

        let mut ws = warp::test::ws()
            .path("/ws")
            .handshake(app)
            .await
            .expect("WebSocket handshake should succeed");

        send(
            &mut ws,
            &ClientMessage::JoinRoom {
                room_code: "ZZZZZZ".to_string(),
                player_name: "Bob".to_string(),
            },
        )
        .await;

        let msg = recv_message(&mut ws).await;
        if let ServerMessage::Error { message } = msg {
            assert_eq!(message, "Room not found");
        } else {
            panic!("Expected error message, got: {:?}", msg);
        }
    }

    #[tokio::test]
    async fn test_create_room_flow() {
        let app = create_test_app();

        let mut ws = warp::test::ws()
            .path("/ws")
            .handshake(app)
            .await
            .expect("WebSocket handshake should succeed");

        send(&mut ws, &create_room_message("Alice")).await;

        let msg = recv_message(&mut ws).await;
        let room_code = if let ServerMessage::RoomCreated {
            room_code,
            player_id: _,
        } = msg
        {
            assert_eq!(room_code.len(), 6);
            room_code
        } else {
            panic!("Expected RoomCreated, got: {:?}", msg);
        };

        let msg = recv_message(&mut ws).await;
        if let ServerMessage::RoomUpdated { players } = msg {
            assert_eq!(players.len(), 1);
            assert_eq!(players[0].name, "Alice");
            assert!(players[0].is_host);
        } else {
            panic!("Expected RoomUpdated, got: {:?}", msg);
        }

        // Reconnect support: the roster is replayed on request
        send(
            &mut ws,
            &ClientMessage::GetRoomState {
                room_code: room_code.clone(),
            },
        )
        .await;
        let msg = recv_message(&mut ws).await;
        assert!(matches!(msg, ServerMessage::RoomUpdated { .. }));
    }

    #[tokio::test]
    async fn test_join_room_updates_everyone() {
        let app = create_test_app();

        let mut ws1 = warp::test::ws()
            .path("/ws")
            .handshake(app.clone())
            .await
            .expect("WebSocket handshake should succeed");
        let mut ws2 = warp::test::ws()
            .path("/ws")
            .handshake(app)
            .await
            .expect("WebSocket handshake should succeed");

        send(&mut ws1, &create_room_message("Alice")).await;
        let msg = recv_message(&mut ws1).await;
        let room_code = if let ServerMessage::RoomCreated { room_code, .. } = msg {
            room_code
        } else {
            panic!("Expected RoomCreated, got: {:?}", msg);
        };
        drain(&mut ws1, 1).await;

        send(
            &mut ws2,
            &ClientMessage::JoinRoom {
                room_code: room_code.to_lowercase(),
                player_name: "Bob".to_string(),
            },
        )
        .await;

        let msg = recv_message(&mut ws2).await;
        if let ServerMessage::RoomJoined {
            room_code: joined_code,
            ..
        } = msg
        {
            assert_eq!(joined_code, room_code);
        } else {
            panic!("Expected RoomJoined, got: {:?}", msg);
        }

        let msg = recv_message(&mut ws2).await;
        if let ServerMessage::RoomUpdated { players } = msg {
            assert_eq!(players.len(), 2);
        } else {
            panic!("Expected RoomUpdated, got: {:?}", msg);
        }

        // The creator sees the joiner arrive too
        let msg = recv_message(&mut ws1).await;
        if let ServerMessage::RoomUpdated { players } = msg {
            assert_eq!(players.len(), 2);
            assert_eq!(players[1].name, "Bob");
        } else {
            panic!("Expected RoomUpdated, got: {:?}", msg);
        }
    }

    #[tokio::test]
    async fn test_start_game_requires_ready_players() {
        let app = create_test_app();

        let mut ws1 = warp::test::ws()
            .path("/ws")
            .handshake(app.clone())
            .await
            .expect("WebSocket handshake should succeed");
        let mut ws2 = warp::test::ws()
            .path("/ws")
            .handshake(app.clone())
            .await
            .expect("WebSocket handshake should succeed");
        let mut ws3 = warp::test::ws()
            .path("/ws")
            .handshake(app)
            .await
            .expect("WebSocket handshake should succeed");

        send(&mut ws1, &create_room_message("Alice")).await;
        let msg = recv_message(&mut ws1).await;
        let room_code = if let ServerMessage::RoomCreated { room_code, .. } = msg {
            room_code
        } else {
            panic!("Expected RoomCreated, got: {:?}", msg);
        };
        drain(&mut ws1, 1).await;

        for (ws, name) in [(&mut ws2, "Bob"), (&mut ws3, "Cleo")] {
            send(
                ws,
                &ClientMessage::JoinRoom {
                    room_code: room_code.clone(),
                    player_name: name.to_string(),
                },
            )
            .await;
            drain(ws, 2).await;
        }
        drain(&mut ws1, 2).await;
        drain(&mut ws2, 1).await;

        send(
            &mut ws1,
            &ClientMessage::StartGame {
                room_code: room_code.clone(),
            },
        )
        .await;

        let msg = recv_message(&mut ws1).await;
        if let ServerMessage::Error { message } = msg {
            assert_eq!(message, "All players must be ready");
        } else {
            panic!("Expected error message, got: {:?}", msg);
        }
    }

    /// Three clients play a complete game: lobby, reveal, two clue rounds,
    /// voting, result. Along the way every broadcast is checked for the
    /// secret word, which must only ever travel inside the per-player
    /// role payload at game start.
    #[tokio::test]
    async fn test_full_game_over_websocket() {
        let app = create_test_app();

        let mut ws1 = warp::test::ws()
            .path("/ws")
            .handshake(app.clone())
            .await
            .expect("WebSocket handshake should succeed");
        let mut ws2 = warp::test::ws()
            .path("/ws")
            .handshake(app.clone())
            .await
            .expect("WebSocket handshake should succeed");
        let mut ws3 = warp::test::ws()
            .path("/ws")
            .handshake(app)
            .await
            .expect("WebSocket handshake should succeed");

        // Lobby: create, two joins, everyone readies up
        send(&mut ws1, &create_room_message("Alice")).await;
        let msg = recv_message(&mut ws1).await;
        let (room_code, host_id) =
            if let ServerMessage::RoomCreated {
                room_code,
                player_id,
            } = msg
            {
                (room_code, player_id)
            } else {
                panic!("Expected RoomCreated, got: {:?}", msg);
            };
        drain(&mut ws1, 1).await;

        let mut player_ids: Vec<PlayerId> = vec![host_id];
        for (ws, name) in [(&mut ws2, "Bob"), (&mut ws3, "Cleo")] {
            send(
                ws,
                &ClientMessage::JoinRoom {
                    room_code: room_code.clone(),
                    player_name: name.to_string(),
                },
            )
            .await;
            let msg = recv_message(ws).await;
            if let ServerMessage::RoomJoined { player_id, .. } = msg {
                player_ids.push(player_id);
            } else {
                panic!("Expected RoomJoined, got: {:?}", msg);
            }
            drain(ws, 1).await;
        }
        drain(&mut ws1, 2).await;
        drain(&mut ws2, 1).await;

        let ready = ClientMessage::ToggleReady {
            room_code: room_code.clone(),
        };
        send(&mut ws1, &ready).await;
        send(&mut ws2, &ready).await;
        send(&mut ws3, &ready).await;
        drain(&mut ws1, 3).await;
        drain(&mut ws2, 3).await;
        drain(&mut ws3, 3).await;

        // Start: each client receives its own role payload
        send(
            &mut ws1,
            &ClientMessage::StartGame {
                room_code: room_code.clone(),
            },
        )
        .await;

        let mut states: Vec<SharedState> = Vec::new();
        let mut role_infos: Vec<RoleInfo> = Vec::new();
        for ws in [&mut ws1, &mut ws2, &mut ws3] {
            let msg = recv_message(ws).await;
            if let ServerMessage::GameStarted { state, role_info } = msg {
                states.push(state);
                role_infos.push(role_info);
            } else {
                panic!("Expected GameStarted, got: {:?}", msg);
            }
        }

        assert!(states.iter().all(|s| s.phase == Phase::RoleReveal));
        assert_eq!(role_infos.iter().zip(&player_ids).filter(|(info, id)| info.player_id == **id).count(), 3);

        let impostors: Vec<&RoleInfo> = role_infos
            .iter()
            .filter(|info| info.role == Role::Impostor)
            .collect();
        assert_eq!(impostors.len(), 1);
        assert!(impostors[0].secret_word.is_none());
        assert!(impostors[0].category.is_some());

        let secret = role_infos
            .iter()
            .find_map(|info| info.secret_word.clone())
            .expect("civilians should know the secret word");
        let quoted_secret = format!("\"{}\"", secret);

        // Drive the game: dismiss the reveal, then six clues in turn order
        let turn_order = states[0].turn_order.clone();
        let impostor_id = impostors[0].player_id;

        send(
            &mut ws1,
            &ClientMessage::DismissRoleReveal {
                room_code: room_code.clone(),
            },
        )
        .await;
        for ws in [&mut ws1, &mut ws2, &mut ws3] {
            let msg = recv_message(ws).await;
            if let ServerMessage::GameStateUpdated { state } = msg {
                assert_eq!(state.phase, Phase::Round1);
            } else {
                panic!("Expected GameStateUpdated, got: {:?}", msg);
            }
        }

        let clue_words = ["planks", "copper", "velvet", "garlic", "maples", "donkey"];
        let mut clue_n = 0;
        for _round in 0..2 {
            for current in &turn_order {
                let seat = player_ids
                    .iter()
                    .position(|id| id == current)
                    .expect("turn order references a seated player");
                let clue = ClientMessage::SubmitClue {
                    room_code: room_code.clone(),
                    clue: clue_words[clue_n].to_string(),
                };
                match seat {
                    0 => send(&mut ws1, &clue).await,
                    1 => send(&mut ws2, &clue).await,
                    _ => send(&mut ws3, &clue).await,
                }
                clue_n += 1;

                for ws in [&mut ws1, &mut ws2, &mut ws3] {
                    let msg = ws.recv().await.expect("Should receive a message");
                    let text = msg.to_str().expect("Should be a text message");
                    assert!(
                        !text.contains(&quoted_secret),
                        "broadcast leaked the secret word"
                    );
                    let parsed: ServerMessage =
                        serde_json::from_str(text).expect("Should be valid ServerMessage");
                    assert!(matches!(parsed, ServerMessage::GameStateUpdated { .. }));
                }
            }
        }

        // Everyone votes for the impostor
        let vote = ClientMessage::SubmitVote {
            room_code: room_code.clone(),
            target_id: impostor_id,
        };
        send(&mut ws1, &vote).await;
        send(&mut ws2, &vote).await;
        send(&mut ws3, &vote).await;

        let mut final_state = None;
        for ws in [&mut ws1, &mut ws2, &mut ws3] {
            for _ in 0..3 {
                let msg = ws.recv().await.expect("Should receive a message");
                let text = msg.to_str().expect("Should be a text message");
                assert!(
                    !text.contains(&quoted_secret),
                    "broadcast leaked the secret word"
                );
                let parsed: ServerMessage =
                    serde_json::from_str(text).expect("Should be valid ServerMessage");
                if let ServerMessage::GameStateUpdated { state } = parsed {
                    final_state = Some(state);
                } else {
                    panic!("Expected GameStateUpdated, got: {:?}", parsed);
                }
            }
        }

        let state = final_state.expect("voting should produce state updates");
        assert_eq!(state.phase, Phase::Result);
        assert_eq!(state.winner, Some(Winner::Civilians));
        assert_eq!(state.vote_counts.values().sum::<u32>(), 3);
    }
}
