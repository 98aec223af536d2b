//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are pure data with no external dependencies, so they can be used
//! by the core rules, the async session, input mapping and rendering alike.
//!
//! # Grid Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 16 rows (indexed 0-15, row 0 is the top)
//! - **Spawn position**: (5, 0), the horizontal center column
//!
//! # Block Values
//!
//! Falling blocks carry a number in `MIN_NUMBER..=MAX_NUMBER` (1..=78). Values
//! written by the operation engine may leave that range (`add` can exceed 78,
//! `subtract` can produce 0).
//!
//! # Scoring
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `NORMAL_CELL_SCORE` | 40 | Per exploded cell of an adjacency match |
//! | `PRIME_CELL_SCORE` | 30 | Per exploded cell of a prime cross |
//! | `PRIME2_BONUS` | 200 | Flat bonus when the prime is exactly 2 |
//! | `COMBO_BONUS` | 150 | Flat bonus for the second and later post-gravity match |
//!
//! # Progression
//!
//! Level is `score / 1300 + 1`. The drop interval starts at 900ms and falls
//! 90ms per level up to level 5, then 50ms per level, floored at 200ms.
//!
//! # Examples
//!
//! ```
//! use prime_drop_types::{GameAction, Operation, GRID_HEIGHT, GRID_WIDTH, SPAWN_X};
//!
//! let action = GameAction::SelectOperation(Operation::Add);
//! assert!(matches!(action, GameAction::SelectOperation(op) if op.is_selectable()));
//! assert!(!Operation::Multiply.is_selectable());
//!
//! assert_eq!(GRID_WIDTH, 10);
//! assert_eq!(GRID_HEIGHT, 16);
//! assert_eq!(SPAWN_X, 5);
//! ```

/// Grid width in cells (10 columns)
pub const GRID_WIDTH: u8 = 10;

/// Grid height in cells (16 rows)
pub const GRID_HEIGHT: u8 = 16;

/// Total number of cells in the grid
pub const GRID_SIZE: usize = GRID_WIDTH as usize * GRID_HEIGHT as usize;

/// Spawn column for new falling blocks (`floor(W / 2)`)
pub const SPAWN_X: i8 = (GRID_WIDTH / 2) as i8;

/// Spawn row for new falling blocks
pub const SPAWN_Y: i8 = 0;

/// Smallest value a generated block can carry
pub const MIN_NUMBER: u32 = 1;

/// Largest value a generated block can carry
pub const MAX_NUMBER: u32 = 78;

/// Points per exploded cell of a plain adjacency match
pub const NORMAL_CELL_SCORE: u32 = 40;

/// Points per exploded cell of a prime cross
pub const PRIME_CELL_SCORE: u32 = 30;

/// Flat bonus for a prime cross triggered by the value 2
pub const PRIME2_BONUS: u32 = 200;

/// Flat bonus for every combo match within one drop cycle
pub const COMBO_BONUS: u32 = 150;

/// Score needed per level
pub const SCORE_PER_LEVEL: u32 = 1300;

/// Drop interval before any level reduction (ms per row)
pub const BASE_SPEED_MS: u32 = 900;

/// Speed reduction per level for levels 1..=5
pub const EARLY_LEVEL_STEP_MS: u32 = 90;

/// Speed reduction per level above level 5
pub const LATE_LEVEL_STEP_MS: u32 = 50;

/// Level at which the reduction step switches from early to late
pub const EARLY_LEVEL_CAP: u32 = 5;

/// Fastest drop interval (ms per row)
pub const MIN_SPEED_MS: u32 = 200;

/// Explosion wait for a plain adjacency match
pub const EXPLOSION_WAIT_NORMAL_MS: u64 = 450;

/// Explosion wait for a prime cross
pub const EXPLOSION_WAIT_PRIME_MS: u64 = 700;

/// Explosion wait for a prime cross of value 2
pub const EXPLOSION_WAIT_PRIME2_MS: u64 = 900;

/// Explosion wait for a combo match
pub const EXPLOSION_WAIT_COMBO_MS: u64 = 600;

/// Maximum time the level-transition overlay holds the game
pub const LEVEL_TRANSITION_MS: u64 = 1500;

/// Bound on the game-over score persistence call
pub const SCORE_SAVE_TIMEOUT_MS: u64 = 5000;

/// A grid coordinate. (0, 0) is the top-left cell; `y` grows downward.
pub type Coord = (i8, i8);

/// Arithmetic operation applied when a falling block lands on an occupied cell.
///
/// `Multiply` and `Divide` are part of the domain but not implemented; they can
/// never be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Operation {
    #[default]
    None,
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::None => "none",
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    /// Short symbol for display
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::None => " ",
            Operation::Add => "+",
            Operation::Subtract => "-",
            Operation::Multiply => "*",
            Operation::Divide => "/",
        }
    }

    /// Whether the player may select this operation.
    pub fn is_selectable(&self) -> bool {
        matches!(self, Operation::None | Operation::Add | Operation::Subtract)
    }

    /// Whether landing with this operation combines two values.
    pub fn combines(&self) -> bool {
        matches!(self, Operation::Add | Operation::Subtract)
    }
}

/// Presentation class of one explosion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExplosionKind {
    /// Flood-fill adjacency match
    Normal,
    /// Prime cross (full row and column)
    Prime,
    /// Prime cross triggered by the value 2
    Prime2,
    /// Second or later post-gravity match in one drop cycle
    Combo,
}

impl ExplosionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExplosionKind::Normal => "normal",
            ExplosionKind::Prime => "prime",
            ExplosionKind::Prime2 => "prime2",
            ExplosionKind::Combo => "combo",
        }
    }

    /// How long the orchestrator waits for the explosion animation to finish.
    pub fn wait_ms(&self) -> u64 {
        match self {
            ExplosionKind::Normal => EXPLOSION_WAIT_NORMAL_MS,
            ExplosionKind::Prime => EXPLOSION_WAIT_PRIME_MS,
            ExplosionKind::Prime2 => EXPLOSION_WAIT_PRIME2_MS,
            ExplosionKind::Combo => EXPLOSION_WAIT_COMBO_MS,
        }
    }
}

/// Input commands accepted by the game
///
/// Each command is validated against the busy/pause/game-over flags before it
/// touches the state; rejected commands are silent no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the falling block one column left
    MoveLeft,
    /// Move the falling block one column right
    MoveRight,
    /// Choose the operation used on the next landing
    SelectOperation(Operation),
    /// Hard-drop to the lowest legal row and land
    Drop,
    /// Soft automatic descent by one row
    Tick,
    /// Toggle user pause
    Pause,
    /// Start a fresh game
    Restart,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_geometry_defaults() {
        assert_eq!(GRID_SIZE, 160);
        assert_eq!(SPAWN_X, 5);
        assert_eq!(SPAWN_Y, 0);
        assert_eq!((MIN_NUMBER, MAX_NUMBER), (1, 78));
    }

    #[test]
    fn only_add_and_subtract_combine() {
        assert!(!Operation::None.combines());
        assert!(Operation::Add.combines());
        assert!(Operation::Subtract.combines());
        assert!(!Operation::Multiply.combines());
        assert!(!Operation::Divide.combines());
    }

    #[test]
    fn reserved_operations_are_not_selectable() {
        assert!(!Operation::Multiply.is_selectable());
        assert!(!Operation::Divide.is_selectable());
    }

    #[test]
    fn explosion_waits_scale_with_kind() {
        assert!(ExplosionKind::Normal.wait_ms() < ExplosionKind::Prime.wait_ms());
        assert!(ExplosionKind::Prime.wait_ms() < ExplosionKind::Prime2.wait_ms());
        assert_eq!(ExplosionKind::Combo.as_str(), "combo");
    }
}
