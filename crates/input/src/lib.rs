//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. The game has
//! no held-key movement, so every press maps to exactly one action and no
//! repeat handling is needed.

pub mod map;

pub use prime_drop_types as types;

pub use map::{handle_key_event, should_quit};
