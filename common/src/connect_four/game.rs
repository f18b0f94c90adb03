use crate::connect_four::config::GameConfig;
use crate::connect_four::grid::{Color, Grid};
use crate::connect_four::moves::{self, MoveError};
use crate::connect_four::player::{JoinError, Slot, SlotRng, Slots};
use crate::connect_four::turn::TurnController;
use crate::connect_four::win::{find_winning_line, WinningLine};
use crate::messages::{Command, Event};
use serde_json::from_str;
use std::fmt::Debug;
use thiserror::Error;
use tracing::{info, warn};

// Outgoing side of the host. Delivery failures are the host's problem.
pub trait EventSink {
    fn broadcast(&self, event: &Event);
    fn send_to(&self, player_id: &str, event: &Event);
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error("It is not your turn.")]
    NotYourTurn,
    #[error("The game is not running.")]
    GameNotRunning,
    #[error("Invalid command: {0}")]
    MalformedCommand(String),
    #[error("Player {0} is not part of this game.")]
    UnknownPlayer(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Waiting,
    Running(TurnController),
    Over { winner: Color, line: WinningLine },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Continue,
    Terminate,
}

#[derive(Debug)]
pub struct GameController<R: SlotRng + Debug> {
    config: GameConfig,
    grid: Grid,
    slots: Slots,
    phase: Phase,
    terminated: bool,
    rng: R,
}

impl<R: SlotRng + Debug> GameController<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        debug_assert!(config.is_valid(), "unclamped config {:?}", config);
        GameController {
            grid: Grid::new(config.height, config.width),
            config,
            slots: Slots::default(),
            phase: Phase::Waiting,
            terminated: false,
            rng,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn slot_of(&self, player_id: &str) -> Option<Slot> {
        self.slots.slot_of(player_id)
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn on_join(&mut self, player_id: &str, sink: &impl EventSink) -> Result<Slot, JoinError> {
        if self.terminated {
            return Err(JoinError::GameClosed);
        }
        let slot = self.slots.assign(player_id, &mut self.rng)?;
        info!(player_id, ?slot, "player joined");
        if self.slots.is_full() {
            self.start(sink);
        }
        Ok(slot)
    }

    fn start(&mut self, sink: &impl EventSink) {
        if let Some(start) = self.start_event() {
            sink.broadcast(&start);
        }
        sink.broadcast(&self.grid_event());
        let turn = TurnController::primed();
        sink.broadcast(&Event::Turn {
            color: turn.current(),
        });
        self.phase = Phase::Running(turn);
        info!(config = ?self.config, "game started");
    }

    // Events that bring a freshly connected endpoint of a known player up to
    // date. Nothing is returned before both slots are filled.
    pub fn on_reconnect(&self, player_id: &str) -> Vec<Event> {
        if self.slots.slot_of(player_id).is_none() {
            return vec![];
        }
        let start = match self.start_event() {
            Some(start) => start,
            None => return vec![],
        };
        match &self.phase {
            Phase::Waiting => vec![],
            Phase::Running(turn) => vec![
                start,
                self.grid_event(),
                Event::Turn {
                    color: turn.current(),
                },
            ],
            Phase::Over { winner, line } => vec![
                start,
                self.grid_event(),
                Event::Turn { color: *winner },
                Event::GameOver {
                    winner_color: *winner,
                    winning_line: line.cells().to_vec(),
                },
            ],
        }
    }

    // A slotted player leaving for good ends the game in any phase
    pub fn on_departure(&mut self, player_id: &str) -> Lifecycle {
        match self.slots.slot_of(player_id) {
            Some(slot) => {
                info!(player_id, ?slot, "player left, terminating game");
                self.terminated = true;
                Lifecycle::Terminate
            }
            None => Lifecycle::Continue,
        }
    }

    // Entry point for raw command payloads. Any rejection is reported to the
    // sender only.
    pub fn on_command(&mut self, player_id: &str, msg: &str, sink: &impl EventSink) {
        let result = self.running_slot(player_id).and_then(|slot| {
            let command: Command =
                from_str(msg).map_err(|err| ActionError::MalformedCommand(err.to_string()))?;
            self.apply(slot, command, sink)
        });
        report(player_id, result, sink);
    }

    pub fn handle_command(&mut self, player_id: &str, command: Command, sink: &impl EventSink) {
        let result = self
            .running_slot(player_id)
            .and_then(|slot| self.apply(slot, command, sink));
        report(player_id, result, sink);
    }

    fn running_slot(&self, player_id: &str) -> Result<Slot, ActionError> {
        let slot = self
            .slots
            .slot_of(player_id)
            .ok_or_else(|| ActionError::UnknownPlayer(player_id.to_string()))?;
        match self.phase {
            Phase::Running(_) if !self.terminated => Ok(slot),
            _ => Err(ActionError::GameNotRunning),
        }
    }

    fn apply(&mut self, slot: Slot, command: Command, sink: &impl EventSink) -> Result<(), ActionError> {
        let mut turn = match self.phase {
            Phase::Running(turn) => turn,
            _ => return Err(ActionError::GameNotRunning),
        };
        let color = slot.color();

        // Under the original rules pop_out is refused for both players alike
        if matches!(command, Command::PopOut { .. }) && !self.config.variation.allows_pop_out() {
            return Err(MoveError::UnsupportedVariation(self.config.variation).into());
        }
        if !turn.is_active(color) {
            return Err(ActionError::NotYourTurn);
        }

        match command {
            Command::DropDisc { column } => {
                moves::drop_disc(&mut self.grid, &self.config, color, column)?;
            }
            Command::PopOut { column } => {
                moves::pop_out(&mut self.grid, &self.config, color, column)?;
            }
        }
        sink.broadcast(&self.grid_event());

        match find_winning_line(&self.grid, self.config.win_length) {
            Some(line) => {
                info!(winner = %color, direction = ?line.direction(), "game over");
                sink.broadcast(&Event::GameOver {
                    winner_color: color,
                    winning_line: line.cells().to_vec(),
                });
                self.phase = Phase::Over {
                    winner: color,
                    line,
                };
            }
            None => {
                turn.advance();
                sink.broadcast(&Event::Turn {
                    color: turn.current(),
                });
                self.phase = Phase::Running(turn);
            }
        }
        Ok(())
    }

    fn start_event(&self) -> Option<Event> {
        self.slots.colors().map(|colors| Event::Start {
            colors: colors.into_iter().collect(),
        })
    }

    fn grid_event(&self) -> Event {
        Event::Grid {
            cells: self.grid.clone(),
        }
    }
}

fn report(player_id: &str, result: Result<(), ActionError>, sink: &impl EventSink) {
    if let Err(err) = result {
        warn!(player_id, "invalid action: {}", err);
        sink.send_to(
            player_id,
            &Event::InvalidAction {
                message: err.to_string(),
            },
        );
    }
}
