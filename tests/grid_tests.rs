//! Grid tests - bounds, occupancy and identity

use prime_drop::core::{apply_gravity, Grid};
use prime_drop::types::{GRID_HEIGHT, GRID_SIZE, GRID_WIDTH};

#[test]
fn test_grid_new_empty() {
    let grid = Grid::new();
    assert_eq!(grid.width(), GRID_WIDTH);
    assert_eq!(grid.height(), GRID_HEIGHT);
    assert_eq!(grid.cells().len(), GRID_SIZE);

    for y in 0..GRID_HEIGHT as i8 {
        for x in 0..GRID_WIDTH as i8 {
            assert_eq!(grid.get(x, y), Some(None), "cell ({x}, {y}) should be empty");
            assert!(grid.is_free(x, y));
        }
    }
}

#[test]
fn test_grid_get_out_of_bounds() {
    let grid = Grid::new();

    assert_eq!(grid.get(-1, 0), None);
    assert_eq!(grid.get(0, -1), None);
    assert_eq!(grid.get(GRID_WIDTH as i8, 0), None);
    assert_eq!(grid.get(0, GRID_HEIGHT as i8), None);

    // Out of bounds is neither free nor occupied.
    assert!(!grid.is_free(-1, 5));
    assert!(!grid.is_occupied(-1, 5));
}

#[test]
fn test_grid_set_and_get() {
    let mut grid = Grid::new();

    assert!(grid.set(5, 10, Some(42)));
    assert_eq!(grid.get(5, 10), Some(Some(42)));
    assert_eq!(grid.value(5, 10), Some(42));
    assert!(grid.is_occupied(5, 10));

    assert!(grid.set(5, 10, None));
    assert!(grid.is_free(5, 10));

    assert!(!grid.set(10, 0, Some(1)));
    assert!(!grid.set(0, 16, Some(1)));
    assert_eq!(grid.filled_count(), 0);
}

#[test]
fn test_cell_ids_are_unique_within_and_across_generations() {
    let grid = Grid::new();
    let next = apply_gravity(&grid);

    let mut ids: Vec<u32> = grid
        .cells()
        .iter()
        .chain(next.cells().iter())
        .map(|c| c.id)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), GRID_SIZE * 2);
}

#[test]
fn test_cells_know_their_coordinates() {
    let grid = Grid::new();
    let cell = grid.cell(7, 3).unwrap();
    assert_eq!((cell.x, cell.y), (7, 3));
    assert!(cell.is_empty());
}

#[test]
fn test_to_rows_is_row_major() {
    let grid = Grid::with_values(&[(9, 0, 1), (0, 15, 2)]);
    let rows = grid.to_rows();
    assert_eq!(rows[0][9], Some(1));
    assert_eq!(rows[15][0], Some(2));
    assert_eq!(rows[15][9], None);
}
