use crate::util;
use common::messages::Event;
use common::EventSink;
use hashbrown::HashMap;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, warn};
use warp::ws::Message;

#[derive(Error, Debug)]
#[error("Error sending message")]
pub struct SendError;

pub trait SendMsg {
    fn send(&self, msg: &str) -> Result<(), SendError>;
}

#[derive(Debug, Clone)]
pub struct Sender(pub mpsc::UnboundedSender<Result<Message, warp::Error>>);

impl SendMsg for Sender {
    fn send(&self, msg: &str) -> Result<(), SendError> {
        self.0.send(Ok(Message::text(msg))).map_err(|_| SendError)
    }
}

// Open websockets of a game's players. A player may hold several at once,
// e.g. one per browser tab.
#[derive(Debug)]
pub struct Sockets<S: SendMsg> {
    by_player: HashMap<String, Vec<(String, S)>>,
}

impl<S: SendMsg> Default for Sockets<S> {
    fn default() -> Self {
        Sockets {
            by_player: HashMap::new(),
        }
    }
}

impl<S: SendMsg> Sockets<S> {
    // Returns how many sockets the player has open, including this one
    pub fn attach(&mut self, player_id: &str, socket_id: String, sender: S) -> usize {
        let sockets = self.by_player.entry(player_id.to_string()).or_default();
        sockets.push((socket_id, sender));
        sockets.len()
    }

    pub fn detach(&mut self, player_id: &str, socket_id: &str) {
        if let Some(sockets) = self.by_player.get_mut(player_id) {
            sockets.retain(|(id, _)| id != socket_id);
            if sockets.is_empty() {
                self.by_player.remove(player_id);
            }
        }
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.by_player.contains_key(player_id)
    }

    pub fn is_empty(&self) -> bool {
        self.by_player.is_empty()
    }

    pub fn send_to_socket(&self, player_id: &str, socket_id: &str, msg: &str) {
        let socket = self
            .by_player
            .get(player_id)
            .and_then(|sockets| sockets.iter().find(|(id, _)| id == socket_id));
        match socket {
            Some((_, sender)) => deliver(sender, msg),
            None => error!("Socket {} of player {} is not attached", socket_id, player_id),
        }
    }

    pub fn send_all(&self, msg: &str) {
        for (_, sender) in self.by_player.values().flatten() {
            deliver(sender, msg);
        }
    }

    fn send_player(&self, player_id: &str, msg: &str) {
        for (_, sender) in self.by_player.get(player_id).into_iter().flatten() {
            deliver(sender, msg);
        }
    }

    // Dropping the senders ends the forwarding tasks, which closes the sockets
    pub fn clear(&mut self) {
        self.by_player.clear();
    }
}

impl<S: SendMsg> EventSink for Sockets<S> {
    fn broadcast(&self, event: &Event) {
        if let Some(msg) = encode(event) {
            self.send_all(&msg);
        }
    }

    fn send_to(&self, player_id: &str, event: &Event) {
        if let Some(msg) = encode(event) {
            self.send_player(player_id, &msg);
        }
    }
}

pub fn encode(event: &Event) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(msg) => Some(msg),
        Err(err) => {
            error!("Failed to serialize event {:?}: {}", event, err);
            None
        }
    }
}

fn deliver(sender: &impl SendMsg, msg: &str) {
    // If the message fails to send even after retries, there's not much we can do but proceed
    if util::retry(1, || sender.send(msg)).is_err() {
        warn!("Dropping undeliverable message: {}", msg);
    }
}
