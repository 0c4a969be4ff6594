//! Static tile lookup built from level text.

use macan_run_core::{Aabb, TILE_SIZE};

/// Symbol stored in padded cells and returned for out-of-range queries.
pub const EMPTY_TILE: char = '.';

/// Symbols that mark entity spawns rather than terrain.
pub const ENTITY_MARKERS: [char; 10] = ['P', 'E', 'F', 'C', '^', 'G', 'S', 'H', 'J', 'D'];

/// Rectangular grid of tile symbols, immutable once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    cells: Vec<char>,
    columns: usize,
    rows: usize,
    tile_size: f32,
}

impl TileGrid {
    /// Parses level text into a grid, right-padding ragged rows with
    /// [`EMPTY_TILE`].
    ///
    /// Leading and trailing blank lines are ignored; every other row is kept.
    #[must_use]
    pub fn load(text: &str) -> Self {
        let trimmed = text.trim_matches(|c| c == '\n' || c == '\r');
        let lines: Vec<Vec<char>> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.lines().map(|line| line.chars().collect()).collect()
        };

        let columns = lines.iter().map(Vec::len).max().unwrap_or(0);
        let rows = lines.len();
        let mut cells = Vec::with_capacity(columns * rows);
        for mut line in lines {
            line.resize(columns, EMPTY_TILE);
            cells.extend(line);
        }

        Self {
            cells,
            columns,
            rows,
            tile_size: TILE_SIZE,
        }
    }

    /// Number of columns (the longest input row).
    #[must_use]
    pub const fn width(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.rows
    }

    /// Side length of one cell in world units.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Width of the whole grid in world units.
    #[must_use]
    pub fn pixel_width(&self) -> f32 {
        self.columns as f32 * self.tile_size
    }

    /// Height of the whole grid in world units.
    #[must_use]
    pub fn pixel_height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// Symbol at the provided cell; anything outside the grid reads as
    /// [`EMPTY_TILE`].
    #[must_use]
    pub fn get(&self, column: i64, row: i64) -> char {
        self.index(column, row)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(EMPTY_TILE)
    }

    /// Reports whether the symbol blocks the player's body.
    #[must_use]
    pub fn is_solid(symbol: char) -> bool {
        symbol != EMPTY_TILE && symbol != ' ' && !ENTITY_MARKERS.contains(&symbol)
    }

    /// Reports whether the cell at the provided coordinates is solid.
    #[must_use]
    pub fn is_solid_at(&self, column: i64, row: i64) -> bool {
        Self::is_solid(self.get(column, row))
    }

    /// World-space rectangle covered by the cell.
    #[must_use]
    pub fn cell_bounds(&self, column: i64, row: i64) -> Aabb {
        Aabb::new(
            column as f32 * self.tile_size,
            row as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// Iterates over every cell in row-major order as `(column, row, symbol)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        let columns = self.columns.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, symbol)| (index % columns, index / columns, *symbol))
    }

    fn index(&self, column: i64, row: i64) -> Option<usize> {
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        if column < self.columns && row < self.rows {
            Some(row * self.columns + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ragged_rows_are_padded_with_empty_tiles() {
        let grid = TileGrid::load("##\n#####\n#");
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(4, 0), EMPTY_TILE);
        assert_eq!(grid.get(4, 1), '#');
        assert_eq!(grid.get(1, 2), EMPTY_TILE);
    }

    #[test]
    fn interior_blank_rows_are_kept() {
        let grid = TileGrid::load("\n##\n\n##\n");
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(0, 1), EMPTY_TILE);
        assert_eq!(grid.get(0, 2), '#');
    }

    #[test]
    fn out_of_range_queries_read_as_empty() {
        let grid = TileGrid::load("###\n###");
        assert_eq!(grid.get(-1, 0), EMPTY_TILE);
        assert_eq!(grid.get(0, -1), EMPTY_TILE);
        assert_eq!(grid.get(3, 0), EMPTY_TILE);
        assert_eq!(grid.get(0, 2), EMPTY_TILE);
        assert!(!grid.is_solid_at(10, 10));
    }

    #[test]
    fn terrain_is_solid_and_markers_are_not() {
        for symbol in ['#', '=', '|'] {
            assert!(TileGrid::is_solid(symbol), "{symbol} should be solid");
        }
        for symbol in ['.', ' ']
            .into_iter()
            .chain(ENTITY_MARKERS.into_iter())
        {
            assert!(!TileGrid::is_solid(symbol), "{symbol} should not be solid");
        }
    }

    #[test]
    fn cells_iterate_in_row_major_order() {
        let grid = TileGrid::load("ab\ncd");
        let visited: Vec<_> = grid.cells().collect();
        assert_eq!(
            visited,
            vec![(0, 0, 'a'), (1, 0, 'b'), (0, 1, 'c'), (1, 1, 'd')]
        );
    }

    #[test]
    fn empty_text_yields_an_empty_grid() {
        let grid = TileGrid::load("");
        assert_eq!(grid.width(), 0);
        assert_eq!(grid.height(), 0);
        assert_eq!(grid.cells().count(), 0);
        assert_eq!(grid.get(0, 0), EMPTY_TILE);
    }

    #[test]
    fn cell_bounds_use_fixed_tile_size() {
        let grid = TileGrid::load("#");
        assert_eq!(grid.cell_bounds(2, 3), Aabb::new(96.0, 144.0, 48.0, 48.0));
    }
}
