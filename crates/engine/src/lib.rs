//! Async session engine
//!
//! Drives the synchronous core on a single tokio task and exposes it through
//! channels:
//!
//! - [`session`]: the task owning the game state, its drop timer and the
//!   bounded suspension points of the drop cycle
//! - [`events`]: outbound explosion, popup, level-up and game-over events
//! - [`reporter`]: score persistence at game over
//! - [`config`]: environment-driven session settings
//!
//! # Example
//!
//! ```no_run
//! use prime_drop_engine::{spawn, GameEvent, MemoryReporter, SessionConfig};
//! use prime_drop_types::GameAction;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut session = spawn(SessionConfig::from_env(), MemoryReporter::new());
//! session.send(GameAction::Drop).await;
//!
//! while let Some(event) = session.next_event().await {
//!     match event {
//!         GameEvent::Explosion { ack, .. } => ack.done(),
//!         GameEvent::LevelUp { ack, .. } => ack.done(),
//!         GameEvent::GameOver { .. } => break,
//!         GameEvent::ScorePopup { .. } => {}
//!     }
//! }
//! session.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod events;
pub mod reporter;
pub mod session;

pub use prime_drop_core as core;
pub use prime_drop_types as types;

pub use config::SessionConfig;
pub use events::{Acknowledge, GameEvent};
pub use reporter::{JsonLinesReporter, MemoryReporter, ScoreRecord, ScoreReporter};
pub use session::{spawn, spawn_with_state, SessionCommand, SessionHandle, SessionSummary};
