use crate::connect_four::{Cell, Color, Grid};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// Sent by a player. On the wire: {"name": "drop_disc", "data": {"column": 3}}
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "name", content = "data", rename_all = "snake_case")]
pub enum Command {
    DropDisc { column: i64 },
    PopOut { column: i64 },
}

// Sent by the game, either to every player or only to the offending one
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "name", content = "data", rename_all = "snake_case")]
pub enum Event {
    Start {
        colors: BTreeMap<String, Color>,
    },
    Grid {
        cells: Grid,
    },
    Turn {
        color: Color,
    },
    InvalidAction {
        message: String,
    },
    GameOver {
        winner_color: Color,
        winning_line: Vec<Cell>,
    },
}
