mod config;
mod game;
mod grid;
mod moves;
mod player;
mod turn;
mod win;

pub use config::{GameConfig, Variation};
pub use game::{ActionError, EventSink, GameController, Lifecycle, Phase};
pub use grid::{Cell, Color, Grid};
pub use moves::{drop_disc, pop_out, MoveError};
pub use player::{CoinFlip, JoinError, Slot, SlotRng, Slots};
pub use turn::TurnController;
pub use win::{find_winning_line, Direction, WinningLine, DIRECTIONS};
