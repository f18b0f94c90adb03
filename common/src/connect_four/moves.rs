use crate::connect_four::config::{GameConfig, Variation};
use crate::connect_four::grid::{Cell, Color, Grid};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("Column out of range. The grid only consists of {width} columns.")]
    ColumnOutOfRange { column: i64, width: usize },
    #[error("Column {0} is already full.")]
    ColumnFull(usize),
    #[error("You can only pop out your own discs.")]
    NotYourDisc,
    #[error("`pop_out` is not allowed in rule variation `{0}`.")]
    UnsupportedVariation(Variation),
}

// Ensure that the column given by the player exists on the grid
fn column_index(config: &GameConfig, column: i64) -> Result<usize, MoveError> {
    usize::try_from(column)
        .ok()
        .filter(|c| *c < config.width)
        .ok_or(MoveError::ColumnOutOfRange {
            column,
            width: config.width,
        })
}

// Puts a disc on the lowest empty cell of the column and returns that cell
pub fn drop_disc(
    grid: &mut Grid,
    config: &GameConfig,
    color: Color,
    column: i64,
) -> Result<Cell, MoveError> {
    let column = column_index(config, column)?;
    let row = (0..grid.height())
        .rev()
        .find(|row| grid.get(*row, column).color.is_none())
        .ok_or(MoveError::ColumnFull(column))?;
    grid.set(row, column, color);
    Ok(grid.get(row, column))
}

// Removes the mover's disc from the bottom of the column. Everything above it
// falls one row and the top cell of the column becomes empty.
pub fn pop_out(
    grid: &mut Grid,
    config: &GameConfig,
    color: Color,
    column: i64,
) -> Result<(), MoveError> {
    if !config.variation.allows_pop_out() {
        return Err(MoveError::UnsupportedVariation(config.variation));
    }
    let column = column_index(config, column)?;
    if grid.get(grid.bottom_row(), column).color != color {
        return Err(MoveError::NotYourDisc);
    }
    for row in (1..=grid.bottom_row()).rev() {
        let above = grid.get(row - 1, column).color;
        grid.set(row, column, above);
    }
    grid.set(0, column, Color::None);
    Ok(())
}
