//! Gravity resolver - compacts every column downward after cells are removed

use crate::grid::Grid;
use crate::types::{GRID_HEIGHT, GRID_WIDTH};

/// Build a new grid where each column's values sit contiguously at the bottom.
///
/// Values keep their bottom-to-top order. The old grid is left untouched; the
/// result is a fresh generation (new cell ids).
pub fn apply_gravity(grid: &Grid) -> Grid {
    let mut next = grid.next_generation();
    for x in 0..GRID_WIDTH as i8 {
        let mut write_y = GRID_HEIGHT as i8 - 1;
        for read_y in (0..GRID_HEIGHT as i8).rev() {
            if let Some(value) = grid.value(x, read_y) {
                next.set(x, write_y, Some(value));
                write_y -= 1;
            }
        }
    }
    next
}

/// Whether applying gravity would move anything.
pub fn is_settled(grid: &Grid) -> bool {
    (0..GRID_WIDTH as i8).all(|x| {
        let mut seen_gap = false;
        for y in (0..GRID_HEIGHT as i8).rev() {
            match grid.value(x, y) {
                None => seen_gap = true,
                Some(_) if seen_gap => return false,
                Some(_) => {}
            }
        }
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_compacts_to_bottom() {
        let grid = Grid::with_values(&[(2, 3, 11), (2, 9, 22), (2, 14, 33)]);
        let settled = apply_gravity(&grid);
        assert_eq!(settled.value(2, 15), Some(33));
        assert_eq!(settled.value(2, 14), Some(22));
        assert_eq!(settled.value(2, 13), Some(11));
        assert_eq!(settled.value(2, 12), None);
        assert_eq!(settled.filled_count(), 3);
        assert!(is_settled(&settled));
        assert!(!is_settled(&grid));
    }

    #[test]
    fn test_columns_are_independent() {
        let grid = Grid::with_values(&[(0, 0, 1), (1, 15, 2)]);
        let settled = apply_gravity(&grid);
        assert_eq!(settled.value(0, 15), Some(1));
        assert_eq!(settled.value(1, 15), Some(2));
    }

    #[test]
    fn test_gravity_produces_new_generation() {
        let grid = Grid::new();
        assert_eq!(apply_gravity(&grid).generation(), grid.generation() + 1);
    }
}
