use crate::connect_four::grid::Color;

pub const FIRST_COLOR: Color = Color::Yellow;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TurnController {
    current: Color,
}

impl TurnController {
    // Seeded with the second color and advanced once, so the first color
    // always opens the game
    pub fn primed() -> Self {
        let mut turn = TurnController {
            current: FIRST_COLOR.opponent(),
        };
        turn.advance();
        turn
    }

    pub fn advance(&mut self) {
        self.current = self.current.opponent();
    }

    pub fn is_active(&self, color: Color) -> bool {
        self.current == color
    }

    pub fn current(&self) -> Color {
        self.current
    }
}
