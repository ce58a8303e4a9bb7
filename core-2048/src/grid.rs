use std::{array, fmt};

use rand::{seq::SliceRandom, Rng};

use crate::{Cell, Direction, GameError, Position, Result, Surface, Tile, GRID_SIZE};

/// Cells of one row or column, ordered so index 0 is the edge tiles slide
/// toward.
pub type Group = [Position; GRID_SIZE];

/// Tile values by position, `0` marking an empty cell.
pub type Values = [[u32; GRID_SIZE]; GRID_SIZE];

/// The fixed square board. Cells are stored row-major and live as long as
/// the grid.
#[derive(Debug)]
pub struct Grid {
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new() -> Self {
        let cells = (0..GRID_SIZE * GRID_SIZE)
            .map(|i| Cell::new(Position::new(i / GRID_SIZE, i % GRID_SIZE)))
            .collect();

        Self { cells }
    }

    /// Builds a board from tile values, `0` meaning empty.
    ///
    /// Every other value must be a power of two no smaller than 2.
    pub fn from_values(values: Values, surface: &mut dyn Surface) -> Result<Self> {
        let mut grid = Self::new();

        for (row, row_values) in values.into_iter().enumerate() {
            for (column, value) in row_values.into_iter().enumerate() {
                let position = Position::new(row, column);

                match value {
                    0 => {}
                    value if value >= 2 && value.is_power_of_two() => {
                        let tile = Tile::with_value(value, surface);
                        grid.cell_mut(position).link_tile(tile, surface)?;
                    }
                    _ => {
                        return Err(GameError::invalid_state(
                            position,
                            "tile values must be powers of two from 2",
                        ))
                    }
                }
            }
        }

        Ok(grid)
    }

    pub fn cell(&self, position: Position) -> &Cell {
        &self.cells[Self::index(position)]
    }

    pub fn cell_mut(&mut self, position: Position) -> &mut Cell {
        &mut self.cells[Self::index(position)]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    pub fn empty_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .filter(|cell| cell.is_empty())
            .map(Cell::position)
    }

    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    pub fn random_empty_cell(&mut self, rng: &mut impl Rng) -> Result<&mut Cell> {
        let empty: Vec<Position> = self.empty_positions().collect();
        let &position = empty.choose(rng).ok_or(GameError::NoEmptyCell)?;

        Ok(self.cell_mut(position))
    }

    /// Rows or columns traversed toward the edge `direction` points at.
    ///
    /// | direction | group `k`                  |
    /// |-----------|----------------------------|
    /// | `Up`      | column `k`, top to bottom  |
    /// | `Down`    | column `k`, bottom to top  |
    /// | `Left`    | row `k`, left to right     |
    /// | `Right`   | row `k`, right to left     |
    pub fn groups(direction: Direction) -> [Group; GRID_SIZE] {
        array::from_fn(|k| {
            array::from_fn(|i| {
                let far = GRID_SIZE - 1 - i;

                match direction {
                    Direction::Up => Position::new(i, k),
                    Direction::Down => Position::new(far, k),
                    Direction::Left => Position::new(k, i),
                    Direction::Right => Position::new(k, far),
                }
            })
        })
    }

    pub fn values(&self) -> Values {
        array::from_fn(|row| {
            array::from_fn(|column| self.cell(Position::new(row, column)).value().unwrap_or(0))
        })
    }

    const fn index(position: Position) -> usize {
        assert!(position.row < GRID_SIZE && position.column < GRID_SIZE);

        position.row * GRID_SIZE + position.column
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.values() {
            for (column, value) in row.into_iter().enumerate() {
                if column != 0 {
                    f.write_str(" ")?;
                }

                match value {
                    0 => write!(f, "{:>5}", ".")?,
                    value => write!(f, "{value:>5}")?,
                }
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::NullSurface;

    #[test]
    fn one_cell_per_position() {
        let grid = Grid::new();

        let positions: Vec<Position> = grid.cells().map(Cell::position).collect();
        let expected: Vec<Position> = (0..GRID_SIZE)
            .flat_map(|row| (0..GRID_SIZE).map(move |column| Position::new(row, column)))
            .collect();

        assert_eq!(positions, expected);
        assert_eq!(grid.tile_count(), 0);
    }

    #[test]
    fn groups_start_at_the_target_edge() {
        let up = Grid::groups(Direction::Up);
        assert_eq!(up[1][0], Position::new(0, 1));
        assert_eq!(up[1][3], Position::new(3, 1));

        let down = Grid::groups(Direction::Down);
        assert_eq!(down[2][0], Position::new(3, 2));
        assert_eq!(down[2][3], Position::new(0, 2));

        let left = Grid::groups(Direction::Left);
        assert_eq!(left[3], [0, 1, 2, 3].map(|column| Position::new(3, column)));

        let right = Grid::groups(Direction::Right);
        assert_eq!(right[0], [3, 2, 1, 0].map(|column| Position::new(0, column)));
    }

    #[test]
    fn every_grouping_covers_the_board_once() {
        for direction in Direction::iter() {
            let mut positions: Vec<Position> =
                Grid::groups(direction).into_iter().flatten().collect();
            positions.sort();
            positions.dedup();

            assert_eq!(positions.len(), GRID_SIZE * GRID_SIZE, "{direction}");
        }
    }

    #[test]
    fn from_values_round_trips_through_values() {
        let values = [[2, 0, 0, 4], [0, 8, 0, 0], [0, 0, 0, 0], [2048, 0, 0, 2]];
        let grid = Grid::from_values(values, &mut NullSurface).unwrap();

        assert_eq!(grid.values(), values);
        assert_eq!(grid.tile_count(), 5);
    }

    #[test]
    fn from_values_rejects_non_powers_of_two() {
        let mut values = [[0; GRID_SIZE]; GRID_SIZE];
        values[2][1] = 6;

        let err = Grid::from_values(values, &mut NullSurface).unwrap_err();
        assert_eq!(
            err,
            GameError::invalid_state(Position::new(2, 1), "tile values must be powers of two from 2")
        );

        values[2][1] = 1;
        assert!(Grid::from_values(values, &mut NullSurface).is_err());
    }

    #[test]
    fn random_empty_cell_only_picks_empty_cells() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let grid_values = [[2, 4, 2, 4], [4, 0, 4, 2], [2, 4, 0, 4], [4, 2, 4, 2]];
        let mut grid = Grid::from_values(grid_values, &mut NullSurface).unwrap();

        let mut seen = Vec::new();
        for _ in 0..64 {
            let position = grid.random_empty_cell(&mut rng).unwrap().position();
            assert!(grid.cell(position).is_empty());
            seen.push(position);
        }

        seen.sort();
        seen.dedup();
        assert_eq!(seen, [Position::new(1, 1), Position::new(2, 2)]);
    }

    #[test]
    fn random_empty_cell_fails_on_a_full_board() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut grid = Grid::from_values([[2; GRID_SIZE]; GRID_SIZE], &mut NullSurface).unwrap();

        assert_eq!(
            grid.random_empty_cell(&mut rng).map(|cell| cell.position()),
            Err(GameError::NoEmptyCell)
        );
    }

    #[test]
    fn display_marks_empty_cells() {
        let grid = Grid::from_values(
            [[2, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 128]],
            &mut NullSurface,
        )
        .unwrap();

        let text = grid.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), GRID_SIZE);
        assert_eq!(lines[0], "    2     .     .     .");
        assert_eq!(lines[3], "    .     .     .   128");
    }
}
