use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};
use warp::ws::{Message, WebSocket};

use crate::directory::RoomDirectory;
use game_types::{ClientMessage, ServerMessage};

pub mod connection;
pub mod handlers;
pub mod rate_limiter;

use connection::ConnectionId;
pub use connection::ConnectionManager;
use handlers::MessageHandler;
use rate_limiter::RateLimiter;

/// Owns one websocket from upgrade to teardown. Inbound frames are decoded
/// and dispatched to the message handler; outbound messages arrive on the
/// connection's channel and are written back as JSON text frames.
pub async fn handle_connection(
    websocket: WebSocket,
    connection_manager: Arc<ConnectionManager>,
    directory: Arc<RoomDirectory>,
) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection: {}", connection_id);

    let (mut ws_tx, mut ws_rx) = websocket.split();
    let mut outbound = connection_manager.create_connection(connection_id).await;

    let handler = MessageHandler::new(connection_id, connection_manager.clone(), directory);

    let read_loop = {
        let handler = handler.clone();
        let manager = connection_manager.clone();
        let mut limiter = RateLimiter::new();

        async move {
            while let Some(frame) = ws_rx.next().await {
                let frame = match frame {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!("WebSocket error for {}: {}", connection_id, e);
                        break;
                    }
                };

                if !limiter.allow() {
                    warn!("Rate limit exceeded for connection {}", connection_id);
                    break;
                }

                // Pings, pongs and binary frames carry no game events.
                let Ok(text) = frame.to_str() else { continue };

                let client_message: ClientMessage = match serde_json::from_str(text) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        // A malformed frame earns a reply, not a hangup.
                        let reply = ServerMessage::Error {
                            message: format!("Invalid JSON message: {}", e),
                        };
                        let _ = manager.send_to_connection(connection_id, reply).await;
                        continue;
                    }
                };

                if let Err(e) = handler.handle_message(client_message).await {
                    warn!("Message handling error for {}: {}", connection_id, e);
                    break;
                }
            }
        }
    };

    let write_loop = async move {
        while let Some(message) = outbound.recv().await {
            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize message: {:?}", e);
                    continue;
                }
            };

            if ws_tx.send(Message::text(json)).await.is_err() {
                break;
            }
        }
    };

    // Either side ending tears the whole connection down.
    tokio::select! {
        _ = read_loop => {},
        _ = write_loop => {},
    }

    info!("Connection {} disconnected", connection_id);
    handler.handle_disconnect().await;
    connection_manager.remove_connection(connection_id).await;
}
