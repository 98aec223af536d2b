//! Grid module - the fixed 10x16 cell matrix
//!
//! The grid is a flat, row-major array of cells (`y * WIDTH + x`).
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..15 (top to bottom).
//! A cell's coordinate never changes after construction; only its value does.

use crate::types::{Coord, GRID_HEIGHT, GRID_SIZE, GRID_WIDTH};

/// One grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// `None` is the empty sentinel
    pub value: Option<u32>,
    /// Identity for animation correlation, unique within one grid generation
    pub id: u32,
    pub x: i8,
    pub y: i8,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }
}

/// The game grid - 10 columns x 16 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cells: [Cell; GRID_SIZE],
    generation: u32,
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self::with_generation(0)
    }

    fn with_generation(generation: u32) -> Self {
        let base = generation.wrapping_mul(GRID_SIZE as u32);
        let cells = std::array::from_fn(|idx| Cell {
            value: None,
            id: base.wrapping_add(idx as u32),
            x: (idx % GRID_WIDTH as usize) as i8,
            y: (idx / GRID_WIDTH as usize) as i8,
        });
        Self { cells, generation }
    }

    /// Create an empty grid that replaces this one wholesale.
    ///
    /// Cell ids of the new grid never collide with the previous generation.
    pub fn next_generation(&self) -> Self {
        Self::with_generation(self.generation.wrapping_add(1))
    }

    /// Build a grid from `(x, y, value)` triples. Out-of-bounds entries are skipped.
    pub fn with_values(values: &[(i8, i8, u32)]) -> Self {
        let mut grid = Self::new();
        for &(x, y, value) in values {
            grid.set(x, y, Some(value));
        }
        grid
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if !Self::is_within_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (GRID_WIDTH as usize) + (x as usize))
    }

    #[inline]
    pub fn is_within_bounds(x: i8, y: i8) -> bool {
        x >= 0 && x < GRID_WIDTH as i8 && y >= 0 && y < GRID_HEIGHT as i8
    }

    pub fn width(&self) -> u8 {
        GRID_WIDTH
    }

    pub fn height(&self) -> u8 {
        GRID_HEIGHT
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Get the value at (x, y).
    /// Returns None if out of bounds, `Some(None)` if the cell is empty.
    pub fn get(&self, x: i8, y: i8) -> Option<Option<u32>> {
        Self::index(x, y).map(|idx| self.cells[idx].value)
    }

    /// Value at (x, y), flattening out-of-bounds and empty into `None`.
    pub fn value(&self, x: i8, y: i8) -> Option<u32> {
        self.get(x, y).flatten()
    }

    pub fn cell(&self, x: i8, y: i8) -> Option<&Cell> {
        Self::index(x, y).map(|idx| &self.cells[idx])
    }

    /// Set the value at (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, value: Option<u32>) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx].value = value;
                true
            }
            None => false,
        }
    }

    /// Empty every listed coordinate.
    pub fn clear_cells(&mut self, coords: &[Coord]) {
        for &(x, y) in coords {
            self.set(x, y, None);
        }
    }

    /// Within bounds and empty
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Within bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Number of non-empty cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Non-empty values of column `x`, read bottom to top.
    pub fn column_bottom_up(&self, x: i8) -> Vec<u32> {
        (0..GRID_HEIGHT as i8)
            .rev()
            .filter_map(|y| self.value(x, y))
            .collect()
    }

    /// Row-major view of every cell
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Values as a row-major 2D array (`rows[y][x]`).
    pub fn to_rows(&self) -> [[Option<u32>; GRID_WIDTH as usize]; GRID_HEIGHT as usize] {
        let mut rows = [[None; GRID_WIDTH as usize]; GRID_HEIGHT as usize];
        for cell in &self.cells {
            rows[cell.y as usize][cell.x as usize] = cell.value;
        }
        rows
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
