use crate::connect_four::grid::Color;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::ops::Index;
use thiserror::Error;

#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    pub fn color(self) -> Color {
        match self {
            Slot::A => Color::Yellow,
            Slot::B => Color::Red,
        }
    }
}

// Decides which slot the first player to join takes
pub trait SlotRng {
    fn first_slot(&mut self) -> Slot;
}

#[derive(Debug)]
pub struct CoinFlip {
    rng: StdRng,
}

impl Default for CoinFlip {
    fn default() -> Self {
        CoinFlip {
            rng: StdRng::from_entropy(),
        }
    }
}

impl SlotRng for CoinFlip {
    fn first_slot(&mut self) -> Slot {
        if self.rng.gen_bool(0.5) {
            Slot::A
        } else {
            Slot::B
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    #[error("The game already has two players.")]
    GameFull,
    #[error("Player {0} has already joined this game.")]
    AlreadyJoined(String),
    #[error("The game has been closed.")]
    GameClosed,
}

// Binds the two slots to the host's player ids. A binding is never undone.
#[derive(Clone, Debug, Default)]
pub struct Slots([Option<String>; 2]);

impl Index<Slot> for Slots {
    type Output = Option<String>;
    fn index(&self, index: Slot) -> &Self::Output {
        match index {
            Slot::A => &self.0[0],
            Slot::B => &self.0[1],
        }
    }
}

impl Slots {
    pub fn assign(&mut self, player_id: &str, rng: &mut impl SlotRng) -> Result<Slot, JoinError> {
        if self.slot_of(player_id).is_some() {
            return Err(JoinError::AlreadyJoined(player_id.to_string()));
        }
        let slot = match (&self[Slot::A], &self[Slot::B]) {
            (None, None) => rng.first_slot(),
            (Some(_), None) => Slot::B,
            (None, Some(_)) => Slot::A,
            (Some(_), Some(_)) => return Err(JoinError::GameFull),
        };
        let idx = match slot {
            Slot::A => 0,
            Slot::B => 1,
        };
        self.0[idx] = Some(player_id.to_string());
        Ok(slot)
    }

    pub fn slot_of(&self, player_id: &str) -> Option<Slot> {
        [Slot::A, Slot::B]
            .into_iter()
            .find(|slot| self[*slot].as_deref() == Some(player_id))
    }

    pub fn is_full(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    // Player ids with their colors, once both slots are bound
    pub fn colors(&self) -> Option<[(String, Color); 2]> {
        match (&self[Slot::A], &self[Slot::B]) {
            (Some(a), Some(b)) => Some([
                (a.clone(), Slot::A.color()),
                (b.clone(), Slot::B.color()),
            ]),
            _ => None,
        }
    }
}
