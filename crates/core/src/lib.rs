//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the rules of the falling-number puzzle: the grid, block
//! generation, operations, match detection, gravity, progression and the
//! cascade state machine that ties one drop cycle together.
//! It has **no dependencies** on UI, timers, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical block sequences
//! - **Testable**: Every rule is a plain function or a synchronous state transition
//! - **Portable**: The async session, the terminal binary and benches all drive the same code
//!
//! # Module Structure
//!
//! - [`grid`]: 10x16 cell matrix with bounds and occupancy queries
//! - [`rng`]: LCG random source and the block generator
//! - [`operation`]: add/subtract combination of a landing block with the cell below
//! - [`matcher`]: adjacency flood-fill and prime-cross detection (detect-and-apply)
//! - [`gravity`]: column compaction producing a new grid
//! - [`scoring`]: level, drop interval and player title derived from score
//! - [`cascade`]: the drop-cycle state machine and its busy flags
//! - [`game_state`]: the owned game aggregate and its input entry points
//! - [`snapshot`]: read-only copy of the state for renderers
//!
//! # Drop Cycle
//!
//! A landing never blocks. When it produces an explosion, the state machine
//! stops in a waiting phase and hands back an [`ExplosionEvent`]. The caller
//! animates it (or times out) and then calls
//! [`GameState::resume_cascade`](game_state::GameState::resume_cascade), which
//! applies gravity and rescans for the next match.
//!
//! # Example
//!
//! ```
//! use prime_drop_core::{ActionOutcome, CascadeStep, GameState};
//! use prime_drop_types::GameAction;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveLeft);
//! let outcome = game.apply_action(GameAction::Drop);
//!
//! // Nothing to match on an empty grid: the block settles and the next one spawns.
//! assert!(matches!(outcome, ActionOutcome::Landed(CascadeStep::Settled { .. })));
//! assert!(game.falling().is_some());
//! ```

pub mod cascade;
pub mod game_state;
pub mod gravity;
pub mod grid;
pub mod matcher;
pub mod operation;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use prime_drop_types as types;

// Re-export commonly used types for convenience
pub use cascade::{BusyFlags, Cascade, CascadePhase, CascadeStep, ExplosionEvent};
pub use game_state::{ActionOutcome, FallingBlock, GameState};
pub use gravity::apply_gravity;
pub use grid::{Cell, Grid};
pub use matcher::{detect, find_first_match, is_prime, MatchResult};
pub use rng::{BlockGenerator, SimpleRng};
pub use scoring::{game_speed_ms, level_for_score, title_for_level};
pub use snapshot::{FallingSnapshot, GameSnapshot};
