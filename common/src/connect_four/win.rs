use crate::connect_four::grid::{Cell, Grid};

// Row and column step of a scan direction
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Direction(isize, isize);

pub const HORIZONTAL: Direction = Direction(0, 1);
pub const VERTICAL: Direction = Direction(1, 0);
pub const DIAGONAL_DOWN_RIGHT: Direction = Direction(1, 1);
pub const DIAGONAL_UP_RIGHT: Direction = Direction(-1, 1);

// Order matters: it breaks ties between lines starting on the same cell
pub const DIRECTIONS: [Direction; 4] = [HORIZONTAL, VERTICAL, DIAGONAL_DOWN_RIGHT, DIAGONAL_UP_RIGHT];

#[derive(Clone, Debug, PartialEq)]
pub struct WinningLine {
    direction: Direction,
    cells: Vec<Cell>,
}

impl WinningLine {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

// Scans rows top to bottom, columns left to right and returns the first line
// found. Each cell is only ever considered as the start of a line.
pub fn find_winning_line(grid: &Grid, win_length: usize) -> Option<WinningLine> {
    (0..grid.height())
        .flat_map(|row| (0..grid.width()).map(move |column| (row, column)))
        .find_map(|(row, column)| {
            DIRECTIONS
                .iter()
                .find_map(|&direction| line_from(grid, row, column, direction, win_length))
        })
}

fn line_from(
    grid: &Grid,
    row: usize,
    column: usize,
    direction: Direction,
    win_length: usize,
) -> Option<WinningLine> {
    let first = grid.get(row, column);
    if first.color.is_none() || win_length == 0 {
        return None;
    }
    let Direction(dr, dc) = direction;
    let cells = (0..win_length)
        .map(|i| {
            let r = offset(row, dr, i, grid.height())?;
            let c = offset(column, dc, i, grid.width())?;
            let cell = grid.get(r, c);
            (cell.color == first.color).then_some(cell)
        })
        .collect::<Option<Vec<Cell>>>()?;
    Some(WinningLine { direction, cells })
}

// base + step * i, if it lands inside 0..limit
fn offset(base: usize, step: isize, i: usize, limit: usize) -> Option<usize> {
    let i = isize::try_from(i).ok()?;
    let base = isize::try_from(base).ok()?;
    let pos = usize::try_from(base.checked_add(step.checked_mul(i)?)?).ok()?;
    (pos < limit).then_some(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connect_four::grid::Color;

    const Y: Color = Color::Yellow;
    const R: Color = Color::Red;
    const E: Color = Color::None;

    fn grid_from(rows: &[&[Color]]) -> Grid {
        let mut grid = Grid::new(rows.len(), rows[0].len());
        for (r, row) in rows.iter().enumerate() {
            for (c, color) in row.iter().enumerate() {
                grid.set(r, c, *color);
            }
        }
        grid
    }

    fn positions(line: &WinningLine) -> Vec<(usize, usize)> {
        line.cells().iter().map(|c| (c.row, c.column)).collect()
    }

    #[test]
    fn test_empty_grid_has_no_win() {
        assert!(find_winning_line(&Grid::new(6, 7), 4).is_none());
    }

    #[test]
    fn test_three_in_a_row_is_not_a_win() {
        let grid = grid_from(&[
            &[E, E, E, E],
            &[E, E, E, E],
            &[Y, Y, Y, R],
        ]);
        assert!(find_winning_line(&grid, 4).is_none());
    }

    #[test]
    fn test_horizontal() {
        let grid = grid_from(&[
            &[E, E, E, E, E],
            &[E, E, E, E, E],
            &[R, Y, Y, Y, Y],
        ]);
        let line = find_winning_line(&grid, 4).unwrap();
        assert_eq!(line.direction(), HORIZONTAL);
        assert_eq!(positions(&line), vec![(2, 1), (2, 2), (2, 3), (2, 4)]);
        assert!(line.cells().iter().all(|c| c.color == Y));
    }

    #[test]
    fn test_vertical_is_ordered_top_down() {
        let grid = grid_from(&[
            &[E, E, E],
            &[E, R, E],
            &[E, R, E],
            &[E, R, E],
            &[E, R, Y],
        ]);
        let line = find_winning_line(&grid, 4).unwrap();
        assert_eq!(line.direction(), VERTICAL);
        assert_eq!(positions(&line), vec![(1, 1), (2, 1), (3, 1), (4, 1)]);
    }

    #[test]
    fn test_diagonal_down_right_among_other_discs() {
        let grid = grid_from(&[
            &[E, E, E, E, E, E, E],
            &[E, E, E, E, E, E, E],
            &[Y, R, E, E, E, E, E],
            &[R, Y, R, E, E, E, E],
            &[Y, R, Y, R, E, E, E],
            &[R, Y, R, Y, E, E, E],
        ]);
        let line = find_winning_line(&grid, 4).unwrap();
        assert_eq!(line.direction(), DIAGONAL_DOWN_RIGHT);
        assert_eq!(positions(&line), vec![(2, 0), (3, 1), (4, 2), (5, 3)]);
        assert!(line.cells().iter().all(|c| c.color == Y));
    }

    #[test]
    fn test_diagonal_up_right_among_other_discs() {
        let grid = grid_from(&[
            &[E, E, E, E, E, E, E],
            &[E, E, E, E, E, E, E],
            &[E, E, E, R, E, E, E],
            &[E, E, R, Y, E, E, E],
            &[E, R, Y, Y, E, E, E],
            &[R, Y, Y, R, E, E, E],
        ]);
        let line = find_winning_line(&grid, 4).unwrap();
        assert_eq!(line.direction(), DIAGONAL_UP_RIGHT);
        assert_eq!(positions(&line), vec![(5, 0), (4, 1), (3, 2), (2, 3)]);
        assert!(line.cells().iter().all(|c| c.color == R));
    }

    #[test]
    fn test_tie_break_prefers_lowest_row() {
        // Two horizontal lines; the upper one is reported
        let grid = grid_from(&[
            &[E, E, E, E],
            &[R, R, R, E],
            &[Y, Y, Y, E],
        ]);
        let line = find_winning_line(&grid, 3).unwrap();
        assert_eq!(positions(&line), vec![(1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_tie_break_prefers_direction_order() {
        // Cell (0, 0) starts a horizontal, a vertical and a diagonal line
        let grid = grid_from(&[
            &[Y, Y, Y],
            &[Y, Y, E],
            &[Y, E, Y],
        ]);
        let line = find_winning_line(&grid, 3).unwrap();
        assert_eq!(line.direction(), HORIZONTAL);

        let grid = grid_from(&[
            &[Y, R, E],
            &[Y, Y, E],
            &[Y, R, Y],
        ]);
        let line = find_winning_line(&grid, 3).unwrap();
        assert_eq!(line.direction(), VERTICAL);
        assert_eq!(positions(&line), vec![(0, 0), (1, 0), (2, 0)]);

        let grid = grid_from(&[
            &[Y, R, E],
            &[R, Y, E],
            &[Y, R, Y],
        ]);
        let line = find_winning_line(&grid, 3).unwrap();
        assert_eq!(line.direction(), DIAGONAL_DOWN_RIGHT);
    }

    #[test]
    fn test_tie_break_prefers_lowest_column() {
        let grid = grid_from(&[
            &[E, E, E, E],
            &[E, R, E, Y],
            &[E, R, E, Y],
        ]);
        let line = find_winning_line(&grid, 2).unwrap();
        assert_eq!(positions(&line), vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn test_line_longer_than_grid() {
        let grid = grid_from(&[
            &[Y, Y, Y],
            &[Y, Y, Y],
            &[Y, Y, Y],
        ]);
        assert!(find_winning_line(&grid, 4).is_none());
    }
}
