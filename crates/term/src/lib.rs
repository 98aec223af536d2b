//! Terminal rendering for the demo binary.
//!
//! [`GameView`] turns a snapshot into a [`Frame`] of styled text lines and is
//! pure. [`TerminalRenderer`] flushes frames to a real terminal with crossterm.

pub mod game_view;
pub mod renderer;

pub use prime_drop_core as core;
pub use prime_drop_types as types;

pub use game_view::{Frame, GameView, Line, Overlay, Popup, Segment, Tone};
pub use renderer::{encode_frame_into, TerminalRenderer};
