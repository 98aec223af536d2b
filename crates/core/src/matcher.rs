//! Match detector - adjacency flood-fill and prime-cross explosions
//!
//! Two rules are evaluated for a seed cell:
//!
//! 1. **Adjacency**: a match triggers when the seed has an equal value directly
//!    below, left or right of it. The exploded set is then the four-direction
//!    connected component of equal values (which may reach upward).
//! 2. **Prime cross**: when the triggering value is prime, every non-empty cell
//!    of the seed's row and column explodes instead. The value 2 is the
//!    stronger `Prime2` variant.
//!
//! [`detect`] both classifies and applies: exploded cells are emptied in place.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::types::{
    Coord, ExplosionKind, COMBO_BONUS, GRID_HEIGHT, GRID_SIZE, GRID_WIDTH, NORMAL_CELL_SCORE,
    PRIME2_BONUS, PRIME_CELL_SCORE,
};

/// Neighbours that can trigger a match. Up is deliberately absent.
const TRIGGER_DIRECTIONS: [Coord; 3] = [(0, 1), (-1, 0), (1, 0)];

/// Directions the flood fill expands in.
const FLOOD_DIRECTIONS: [Coord; 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Set of exploded coordinates. A whole grid always fits, so this never allocates.
pub type CellSet = ArrayVec<Coord, GRID_SIZE>;

/// Result of one detect-and-apply step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: bool,
    pub score_gained: u32,
    pub cells: CellSet,
    pub kind: ExplosionKind,
    /// Seed coordinate
    pub origin: Coord,
    /// Seed value
    pub value: u32,
}

impl MatchResult {
    fn no_match(origin: Coord, value: u32) -> Self {
        Self {
            matched: false,
            score_gained: 0,
            cells: CellSet::new(),
            kind: ExplosionKind::Normal,
            origin,
            value,
        }
    }
}

/// Primality by trial division up to √n.
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u32;
    while d.saturating_mul(d) <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Whether `value` at (x, y) has an equal neighbour below, left or right.
pub fn has_neighbor_match(grid: &Grid, x: i8, y: i8, value: u32) -> bool {
    TRIGGER_DIRECTIONS
        .iter()
        .any(|&(dx, dy)| grid.value(x + dx, y + dy) == Some(value))
}

/// Four-direction connected component of cells equal to `value`, starting at the seed.
///
/// The seed itself is always part of the component. Uses an explicit stack
/// and a visited bitmap, so board size never threatens the call stack.
pub fn connected_component(grid: &Grid, x: i8, y: i8, value: u32) -> CellSet {
    let mut component = CellSet::new();
    if !Grid::is_within_bounds(x, y) {
        return component;
    }

    let mut visited = [false; GRID_SIZE];
    let mut stack: ArrayVec<Coord, GRID_SIZE> = ArrayVec::new();

    visited[flat(x, y)] = true;
    stack.push((x, y));

    while let Some((cx, cy)) = stack.pop() {
        component.push((cx, cy));
        for (dx, dy) in FLOOD_DIRECTIONS {
            let (nx, ny) = (cx + dx, cy + dy);
            if !Grid::is_within_bounds(nx, ny) || visited[flat(nx, ny)] {
                continue;
            }
            if grid.value(nx, ny) == Some(value) {
                visited[flat(nx, ny)] = true;
                stack.push((nx, ny));
            }
        }
    }

    component
}

/// Every non-empty cell in row `y` and column `x` (the crossing cell once).
pub fn prime_cross(grid: &Grid, x: i8, y: i8) -> CellSet {
    let mut cells = CellSet::new();
    for cx in 0..GRID_WIDTH as i8 {
        if grid.is_occupied(cx, y) {
            cells.push((cx, y));
        }
    }
    for cy in 0..GRID_HEIGHT as i8 {
        if cy != y && grid.is_occupied(x, cy) {
            cells.push((x, cy));
        }
    }
    cells
}

/// Detect a match at (x, y) for `value` and explode it.
///
/// On a match the exploded cells are emptied in `grid`. `is_combo` adds the
/// combo bonus and tags the explosion as [`ExplosionKind::Combo`]; the score
/// of the underlying rule still applies.
pub fn detect(grid: &mut Grid, x: i8, y: i8, value: u32, is_combo: bool) -> MatchResult {
    if !has_neighbor_match(grid, x, y, value) {
        return MatchResult::no_match((x, y), value);
    }

    let (cells, mut kind, mut score) = if is_prime(value) {
        let cells = prime_cross(grid, x, y);
        let mut score = PRIME_CELL_SCORE * cells.len() as u32;
        let kind = if value == 2 {
            score += PRIME2_BONUS;
            ExplosionKind::Prime2
        } else {
            ExplosionKind::Prime
        };
        (cells, kind, score)
    } else {
        let cells = connected_component(grid, x, y, value);
        let score = NORMAL_CELL_SCORE * cells.len() as u32;
        (cells, ExplosionKind::Normal, score)
    };

    if is_combo {
        score += COMBO_BONUS;
        kind = ExplosionKind::Combo;
    }

    grid.clear_cells(&cells);

    MatchResult {
        matched: true,
        score_gained: score,
        cells,
        kind,
        origin: (x, y),
        value,
    }
}

/// Row-major scan (row 0 first, column 0 first) for the first non-empty cell
/// whose value would trigger a match. Returns its coordinate and value.
pub fn find_first_match(grid: &Grid) -> Option<(i8, i8, u32)> {
    for y in 0..GRID_HEIGHT as i8 {
        for x in 0..GRID_WIDTH as i8 {
            if let Some(value) = grid.value(x, y) {
                if has_neighbor_match(grid, x, y, value) {
                    return Some((x, y, value));
                }
            }
        }
    }
    None
}

#[inline(always)]
fn flat(x: i8, y: i8) -> usize {
    y as usize * GRID_WIDTH as usize + x as usize
}
