use game_types::{PlayerId, ServerMessage};
use std::collections::HashMap;
use std::fmt;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One open socket. The transport identity stays a [`ConnectionId`]; the
/// domain player id is assigned separately when the client creates or joins
/// a room, so the two are never conflated.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub player_id: Option<PlayerId>,
    pub room_code: Option<String>,
    pub sender: mpsc::UnboundedSender<ServerMessage>,
}

impl Connection {
    pub fn new(id: ConnectionId) -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let connection = Self {
            id,
            player_id: None,
            room_code: None,
            sender,
        };
        (connection, receiver)
    }

    pub fn set_room(&mut self, player_id: PlayerId, room_code: String) {
        self.player_id = Some(player_id);
        self.room_code = Some(room_code);
    }

    pub fn send_message(&self, message: ServerMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .map_err(|_| "Connection closed".to_string())
    }
}

/// Registry of live sockets plus the player-id routing table used for
/// private payloads. Room broadcasts scan connections by bound room code.
pub struct ConnectionManager {
    connections: RwLock<HashMap<ConnectionId, Connection>>,
    players: RwLock<HashMap<PlayerId, ConnectionId>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            players: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create_connection(
        &self,
        id: ConnectionId,
    ) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (connection, receiver) = Connection::new(id);
        self.connections.write().await.insert(id, connection);
        receiver
    }

    pub async fn remove_connection(&self, id: ConnectionId) {
        let player_id = {
            let mut connections = self.connections.write().await;
            connections.remove(&id).and_then(|conn| conn.player_id)
        };

        if let Some(player_id) = player_id {
            self.players.write().await.remove(&player_id);
        }
    }

    pub async fn get_connection(&self, id: ConnectionId) -> Option<Connection> {
        self.connections.read().await.get(&id).cloned()
    }

    /// Record which player and room a connection now speaks for. Rebinding a
    /// connection (leave one room, join another) drops the stale player
    /// mapping so messages never route to the old identity.
    pub async fn bind_player(&self, id: ConnectionId, player_id: PlayerId, room_code: String) {
        let previous = {
            let mut connections = self.connections.write().await;
            let Some(connection) = connections.get_mut(&id) else {
                return;
            };
            let previous = connection.player_id;
            connection.set_room(player_id, room_code);
            previous
        };

        let mut players = self.players.write().await;
        if let Some(previous) = previous {
            players.remove(&previous);
        }
        players.insert(player_id, id);
    }

    pub async fn send_to_connection(
        &self,
        id: ConnectionId,
        message: ServerMessage,
    ) -> Result<(), String> {
        match self.connections.read().await.get(&id) {
            Some(connection) => connection.send_message(message),
            None => Err("Connection not found".to_string()),
        }
    }

    pub async fn send_to_player(
        &self,
        player_id: PlayerId,
        message: ServerMessage,
    ) -> Result<(), String> {
        let connection_id = self.players.read().await.get(&player_id).copied();

        match connection_id {
            Some(connection_id) => self.send_to_connection(connection_id, message).await,
            None => Err("Player not connected".to_string()),
        }
    }

    pub async fn send_to_room(&self, room_code: &str, message: ServerMessage) {
        let connections = self.connections.read().await;
        for connection in connections.values() {
            if connection.room_code.as_deref() == Some(room_code) {
                let _ = connection.send_message(message.clone());
            }
        }
    }

    pub async fn send_to_room_except(
        &self,
        room_code: &str,
        except_connection: ConnectionId,
        message: ServerMessage,
    ) {
        let connections = self.connections.read().await;
        for connection in connections.values() {
            if connection.id != except_connection
                && connection.room_code.as_deref() == Some(room_code)
            {
                let _ = connection.send_message(message.clone());
            }
        }
    }

    // Test helper methods
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn player_connection_count(&self) -> usize {
        self.players.read().await.len()
    }
}
