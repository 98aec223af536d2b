//! Outbound events for renderers and sound.

use tokio::sync::oneshot;

use crate::core::ExplosionEvent;
use crate::types::ExplosionKind;

/// One-shot completion signal handed out with events the session waits on.
///
/// Call [`Acknowledge::done`] when the animation has finished. Dropping it
/// counts as done as well; the session never waits longer than the event's
/// bound either way.
#[derive(Debug)]
pub struct Acknowledge(oneshot::Sender<()>);

impl Acknowledge {
    pub(crate) fn new() -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (Self(tx), rx)
    }

    pub fn done(self) {
        let _ = self.0.send(());
    }
}

#[derive(Debug)]
pub enum GameEvent {
    /// Cells were removed. The cascade resumes after `ack` or the kind's wait.
    Explosion {
        event: ExplosionEvent,
        ack: Acknowledge,
    },
    /// Floating score text at the explosion origin
    ScorePopup {
        x: i8,
        y: i8,
        kind: ExplosionKind,
        amount: u32,
    },
    /// The level rose; input and the drop timer stay off until `ack`.
    LevelUp {
        level: u32,
        game_speed_ms: u32,
        ack: Acknowledge,
    },
    GameOver {
        final_score: u32,
        score_saved: bool,
    },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Explosion { .. } => "explosion",
            GameEvent::ScorePopup { .. } => "score_popup",
            GameEvent::LevelUp { .. } => "level_up",
            GameEvent::GameOver { .. } => "game_over",
        }
    }
}
