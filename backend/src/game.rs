use crate::client::{self, SendMsg, Sender, Sockets};
use common::{CoinFlip, GameConfig, GameController, Lifecycle, Phase, SlotRng};
use hashbrown::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

pub const MAX_PLAYERS: usize = 2;

pub const DELETE_INACTIVE_GAME_DELAY: Duration = Duration::from_secs(60 * 60);
pub const KICK_INACTIVE_PLAYER_DELAY: Duration = Duration::from_secs(30 * 60);

pub type Games = Arc<RwLock<HashMap<String, Game<Sender, CoinFlip>>>>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("The game already has {0} players")]
    Full(usize),
    #[error("Player {0} is not registered for this game")]
    UnknownPlayer(String),
}

// How long a game or a player may stay idle before the host drops them
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Eviction {
    pub inactive_game: Duration,
    pub inactive_player: Duration,
}

impl Default for Eviction {
    fn default() -> Self {
        Eviction {
            inactive_game: DELETE_INACTIVE_GAME_DELAY,
            inactive_player: KICK_INACTIVE_PLAYER_DELAY,
        }
    }
}

// One hosted game: the engine plus the players' sockets. Every call happens
// under the games map's write lock, so the engine sees one call at a time.
#[derive(Debug)]
pub struct Game<S: SendMsg, R: SlotRng + Debug> {
    controller: GameController<R>,
    // Player IDs handed out by the register route, in order
    player_ids: Vec<String>,
    sockets: Sockets<S>,
    last_activity: Instant,
    // Registered players without an open socket, and since when
    idle_since: HashMap<String, Instant>,
}

impl<S: SendMsg, R: SlotRng + Debug> Game<S, R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        Game {
            controller: GameController::new(config, rng),
            player_ids: Vec::with_capacity(MAX_PLAYERS),
            sockets: Sockets::default(),
            last_activity: Instant::now(),
            idle_since: HashMap::new(),
        }
    }

    pub fn register(&mut self) -> Result<String, SessionError> {
        if self.player_ids.len() >= MAX_PLAYERS {
            return Err(SessionError::Full(MAX_PLAYERS));
        }
        let player_id = Uuid::new_v4().as_simple().to_string();
        self.player_ids.push(player_id.clone());
        self.last_activity = Instant::now();
        self.idle_since.insert(player_id.clone(), self.last_activity);
        Ok(player_id)
    }

    pub fn is_registered(&self, player_id: &str) -> bool {
        self.player_ids.iter().any(|id| id == player_id)
    }

    // Won, or ended by a departure
    pub fn is_over(&self) -> bool {
        self.controller.is_terminated() || matches!(self.controller.phase(), Phase::Over { .. })
    }

    // The first socket of a player joins them into the game. Any later socket
    // is brought up to date with a resync packet sent to it alone.
    pub fn connect(&mut self, player_id: &str, socket_id: String, sender: S) -> Result<(), SessionError> {
        if !self.is_registered(player_id) {
            return Err(SessionError::UnknownPlayer(player_id.to_string()));
        }
        self.sockets.attach(player_id, socket_id.clone(), sender);
        self.last_activity = Instant::now();
        self.idle_since.remove(player_id);

        if self.controller.slot_of(player_id).is_none() {
            if let Err(err) = self.controller.on_join(player_id, &self.sockets) {
                warn!("Player {} could not join: {}", player_id, err);
            }
            return Ok(());
        }
        for event in self.controller.on_reconnect(player_id) {
            if let Some(msg) = client::encode(&event) {
                self.sockets.send_to_socket(player_id, &socket_id, &msg);
            }
        }
        Ok(())
    }

    // A finished game is done once its last socket closes
    pub fn disconnect(&mut self, player_id: &str, socket_id: &str) -> Lifecycle {
        self.sockets.detach(player_id, socket_id);
        if !self.sockets.has_player(player_id) && self.is_registered(player_id) {
            self.idle_since.insert(player_id.to_string(), Instant::now());
        }
        if self.is_over() && self.sockets.is_empty() {
            Lifecycle::Terminate
        } else {
            Lifecycle::Continue
        }
    }

    pub fn handle_message(&mut self, player_id: &str, msg: &str) {
        self.last_activity = Instant::now();
        self.controller.on_command(player_id, msg, &self.sockets);
    }

    // Permanent departure. When the engine ends the game, every socket is told
    // to leave and then closed.
    pub fn leave(&mut self, player_id: &str) -> Result<Lifecycle, SessionError> {
        if !self.is_registered(player_id) {
            return Err(SessionError::UnknownPlayer(player_id.to_string()));
        }
        self.idle_since.remove(player_id);
        let lifecycle = match self.controller.on_departure(player_id) {
            // Registered but never connected; the slot is still free
            Lifecycle::Continue if self.controller.slot_of(player_id).is_none() => {
                self.player_ids.retain(|id| id != player_id);
                Lifecycle::Continue
            }
            lifecycle => lifecycle,
        };
        if lifecycle == Lifecycle::Terminate {
            info!("Closing game after player {} left", player_id);
            self.close();
        }
        Ok(lifecycle)
    }

    // Drops idle players, then decides whether the game itself should go
    pub fn sweep(&mut self, now: Instant, eviction: &Eviction) -> Lifecycle {
        if now.saturating_duration_since(self.last_activity) >= eviction.inactive_game {
            info!("Closing game after {:?} without activity", eviction.inactive_game);
            self.close();
            return Lifecycle::Terminate;
        }

        let idle: Vec<String> = self
            .idle_since
            .iter()
            .filter(|(_, since)| now.saturating_duration_since(**since) >= eviction.inactive_player)
            .map(|(player_id, _)| player_id.clone())
            .collect();
        for player_id in idle {
            info!("Kicking inactive player {}", player_id);
            if let Ok(Lifecycle::Terminate) = self.leave(&player_id) {
                return Lifecycle::Terminate;
            }
        }

        if self.is_over() && self.sockets.is_empty() {
            Lifecycle::Terminate
        } else {
            Lifecycle::Continue
        }
    }

    fn close(&mut self) {
        self.sockets.send_all("leave");
        self.sockets.clear();
    }
}

pub async fn sweep_games(games: &Games, eviction: &Eviction) {
    let now = Instant::now();
    games.write().await.retain(|game_id, game| match game.sweep(now, eviction) {
        Lifecycle::Terminate => {
            info!("removed game {}", game_id);
            false
        }
        Lifecycle::Continue => true,
    });
}
