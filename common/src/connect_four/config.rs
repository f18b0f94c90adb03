use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_WIDTH: usize = 7;
pub const DEFAULT_HEIGHT: usize = 6;
pub const DEFAULT_WIN_LENGTH: usize = 4;

pub const MIN_WIDTH: usize = 3;
pub const MIN_HEIGHT: usize = 3;
pub const MIN_WIN_LENGTH: usize = 2;

#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Variation {
    #[default]
    Original,
    PopOut,
}

impl Variation {
    pub fn allows_pop_out(self) -> bool {
        matches!(self, Variation::PopOut)
    }
}

impl fmt::Display for Variation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variation::Original => write!(f, "original"),
            Variation::PopOut => write!(f, "pop_out"),
        }
    }
}

// Fixed for the lifetime of a game. The engine assumes the minimums hold, so
// anything coming from outside goes through `clamped` first.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    pub win_length: usize,
    pub variation: Variation,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            win_length: DEFAULT_WIN_LENGTH,
            variation: Variation::Original,
        }
    }
}

impl GameConfig {
    // Values under a minimum fall back to the default rather than the minimum
    pub fn clamped(self) -> Self {
        GameConfig {
            width: if self.width < MIN_WIDTH {
                DEFAULT_WIDTH
            } else {
                self.width
            },
            height: if self.height < MIN_HEIGHT {
                DEFAULT_HEIGHT
            } else {
                self.height
            },
            win_length: if self.win_length < MIN_WIN_LENGTH {
                DEFAULT_WIN_LENGTH
            } else {
                self.win_length
            },
            variation: self.variation,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.width >= MIN_WIDTH && self.height >= MIN_HEIGHT && self.win_length >= MIN_WIN_LENGTH
    }
}
