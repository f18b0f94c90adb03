use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    // Empty cell
    None,
    // Color A, drops the first disc
    Yellow,
    // Color B
    Red,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Yellow => Color::Red,
            Color::Red => Color::Yellow,
            Color::None => Color::None,
        }
    }

    pub fn is_none(self) -> bool {
        matches!(self, Color::None)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::None => write!(f, "none"),
            Color::Yellow => write!(f, "yellow"),
            Color::Red => write!(f, "red"),
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub column: usize,
    pub color: Color,
}

// Rows top to bottom, each holding its columns left to right
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(transparent)]
pub struct Grid(Vec<Vec<Cell>>);

impl Grid {
    pub fn new(height: usize, width: usize) -> Self {
        let rows = (0..height)
            .map(|row| {
                (0..width)
                    .map(|column| Cell {
                        row,
                        column,
                        color: Color::None,
                    })
                    .collect()
            })
            .collect();
        Grid(rows)
    }

    pub fn height(&self) -> usize {
        self.0.len()
    }

    pub fn width(&self) -> usize {
        self.0.first().map_or(0, |row| row.len())
    }

    // The row nearest the floor, where discs settle first
    pub fn bottom_row(&self) -> usize {
        self.height() - 1
    }

    pub fn rows(&self) -> &Vec<Vec<Cell>> {
        &self.0
    }

    // Out-of-range positions are a bug in the caller and panic
    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.0[row][column]
    }

    pub fn set(&mut self, row: usize, column: usize, color: Color) {
        self.0[row][column].color = color;
    }

    pub fn is_full(&self) -> bool {
        self.0
            .iter()
            .all(|row| row.iter().all(|cell| !cell.color.is_none()))
    }
}
