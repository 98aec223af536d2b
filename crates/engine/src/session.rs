//! Async game session.
//!
//! One tokio task owns the [`GameState`] and is the only place it is mutated.
//! It multiplexes three sources:
//!
//! | Source | Effect |
//! |--------|--------|
//! | command queue | `GameAction`s from the input layer |
//! | drop timer | `Tick` every `game_speed_ms`, armed only while `drop_timer_active()` |
//! | acknowledgements | resume a cascade suspended on an explosion or level-up |
//!
//! While a cascade or level-up is suspended the task keeps draining commands.
//! Only pause reaches the state; every other action is discarded, so nothing
//! can land or restart until the wait is over. Every wait is bounded, so a
//! renderer that never acknowledges only slows the game down to the fixed
//! per-kind waits.
//!
//! Events go out on a bounded queue of `SessionConfig::event_buffer`. When it
//! is full the session treats the event as undelivered and does not wait for
//! it, so callers holding a [`SessionHandle`] should keep draining events.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, sleep_until, timeout, Instant};

use crate::config::{now_ms, SessionConfig};
use crate::core::{ActionOutcome, CascadeStep, GameSnapshot, GameState};
use crate::events::{Acknowledge, GameEvent};
use crate::reporter::{ScoreRecord, ScoreReporter};
use crate::types::{GameAction, LEVEL_TRANSITION_MS};

/// Inbound message to the session task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Action(GameAction),
    Shutdown,
}

/// State of the session when its task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: u32,
    pub level: u32,
    pub game_over: bool,
    pub score_save_error: bool,
    pub episode_id: u32,
}

/// Handle to a running session.
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
    events: mpsc::Receiver<GameEvent>,
    snapshots: watch::Receiver<GameSnapshot>,
    task: JoinHandle<SessionSummary>,
}

impl SessionHandle {
    /// Queue an action, waiting for room in the command queue.
    ///
    /// Returns false once the session has stopped.
    pub async fn send(&self, action: GameAction) -> bool {
        self.commands
            .send(SessionCommand::Action(action))
            .await
            .is_ok()
    }

    /// Queue an action without waiting. Returns false if the queue is full or closed.
    pub fn try_send(&self, action: GameAction) -> bool {
        self.commands
            .try_send(SessionCommand::Action(action))
            .is_ok()
    }

    pub async fn next_event(&mut self) -> Option<GameEvent> {
        self.events.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<GameEvent> {
        self.events.try_recv().ok()
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        *self.snapshots.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    /// Stop the session after any in-flight cascade and return its summary.
    pub async fn shutdown(self) -> Result<SessionSummary> {
        let _ = self.commands.send(SessionCommand::Shutdown).await;
        Ok(self.task.await?)
    }
}

/// Start a session with a fresh game seeded from `config`.
///
/// Must be called from within a tokio runtime.
pub fn spawn<R: ScoreReporter>(config: SessionConfig, reporter: R) -> SessionHandle {
    let state = GameState::new(config.seed);
    spawn_with_state(config, state, reporter)
}

/// Start a session around an existing game state (started if it is not yet).
pub fn spawn_with_state<R: ScoreReporter>(
    config: SessionConfig,
    mut state: GameState,
    reporter: R,
) -> SessionHandle {
    state.start();

    let (cmd_tx, cmd_rx) = mpsc::channel(config.command_buffer.max(1));
    let (event_tx, event_rx) = mpsc::channel(config.event_buffer.max(1));
    let (snap_tx, snap_rx) = watch::channel(state.snapshot());

    let session = Session {
        state,
        config,
        reporter,
        commands: cmd_rx,
        events: event_tx,
        snapshots: snap_tx,
        closing: false,
    };
    let task = tokio::spawn(session.run());

    SessionHandle {
        commands: cmd_tx,
        events: event_rx,
        snapshots: snap_rx,
        task,
    }
}

struct Session<R> {
    state: GameState,
    config: SessionConfig,
    reporter: R,
    commands: mpsc::Receiver<SessionCommand>,
    events: mpsc::Sender<GameEvent>,
    snapshots: watch::Sender<GameSnapshot>,
    /// Shutdown was requested or every sender is gone
    closing: bool,
}

impl<R: ScoreReporter> Session<R> {
    async fn run(mut self) -> SessionSummary {
        log::info!("session started (seed {})", self.config.seed);

        let mut next_tick = Instant::now();
        let mut armed = false;

        while !self.closing {
            let active = self.state.drop_timer_active();
            if active && !armed {
                next_tick = Instant::now() + self.tick_interval();
            }
            armed = active;

            tokio::select! {
                cmd = self.commands.recv() => match cmd {
                    Some(SessionCommand::Action(action)) => {
                        if self.handle_action(action).await {
                            armed = false;
                        }
                    }
                    Some(SessionCommand::Shutdown) | None => self.closing = true,
                },
                _ = sleep_until(next_tick), if active => {
                    self.handle_action(GameAction::Tick).await;
                    armed = false;
                }
            }
        }

        log::info!(
            "session stopped at score {} (episode {})",
            self.state.score(),
            self.state.episode_id()
        );
        self.summary()
    }

    /// Apply one action and drive any drop cycle it starts to completion.
    ///
    /// Returns true when the drop timer must be re-armed.
    async fn handle_action(&mut self, action: GameAction) -> bool {
        let outcome = self.state.apply_action(action);
        let rearm = match outcome {
            ActionOutcome::Ignored => return false,
            ActionOutcome::Applied => {
                matches!(action, GameAction::Tick | GameAction::Pause | GameAction::Restart)
            }
            ActionOutcome::Landed(step) => {
                self.drive_cascade(step).await;
                true
            }
        };
        self.publish();
        rearm
    }

    async fn drive_cascade(&mut self, mut step: CascadeStep) {
        loop {
            match step {
                CascadeStep::Exploding(event) => {
                    self.publish();
                    let wait = Duration::from_millis(event.kind.wait_ms());
                    let (x, y) = event.origin;
                    let popup = GameEvent::ScorePopup {
                        x,
                        y,
                        kind: event.kind,
                        amount: event.score_delta,
                    };

                    let (ack, done) = Acknowledge::new();
                    if self.emit(GameEvent::Explosion { event, ack }) {
                        self.emit(popup);
                        self.wait_for(done, wait).await;
                    }

                    let Some(next) = self.state.resume_cascade() else {
                        log::error!("cascade stopped waiting without settling");
                        return;
                    };
                    step = next;
                }
                CascadeStep::Settled {
                    score_gained,
                    level_up,
                } => {
                    if score_gained > 0 {
                        log::debug!("drop cycle settled: +{score_gained}");
                    }
                    if level_up {
                        self.publish();
                        let (ack, done) = Acknowledge::new();
                        let event = GameEvent::LevelUp {
                            level: self.state.level(),
                            game_speed_ms: self.state.game_speed_ms(),
                            ack,
                        };
                        if self.emit(event) {
                            self.wait_for(done, Duration::from_millis(LEVEL_TRANSITION_MS))
                                .await;
                        }
                        self.state.dismiss_level_transition();
                    }
                    return;
                }
                CascadeStep::GameOver { final_score } => {
                    self.finish_game(final_score).await;
                    return;
                }
            }
        }
    }

    /// Suspend until `done` fires, its sender is dropped, or `limit` elapses.
    async fn wait_for(&mut self, mut done: oneshot::Receiver<()>, limit: Duration) {
        let deadline = sleep(limit);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = &mut done => return,
                _ = &mut deadline => {
                    log::debug!("wait elapsed after {}ms", limit.as_millis());
                    return;
                }
                cmd = self.commands.recv(), if !self.closing => match cmd {
                    Some(SessionCommand::Action(GameAction::Pause)) => {
                        let outcome = self.state.apply_action(GameAction::Pause);
                        debug_assert!(!matches!(outcome, ActionOutcome::Landed(_)));
                        if outcome != ActionOutcome::Ignored {
                            self.publish();
                        }
                    }
                    Some(SessionCommand::Action(action)) => {
                        log::trace!("discarded {action:?} during wait");
                    }
                    Some(SessionCommand::Shutdown) | None => self.closing = true,
                },
            }
        }
    }

    /// Persist the final score under a timeout, then announce game over.
    async fn finish_game(&mut self, final_score: u32) {
        self.publish();

        let record = ScoreRecord::new(self.config.nickname.clone(), final_score, now_ms());
        let saved = match timeout(self.config.save_timeout, self.reporter.save(&record)).await {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                log::warn!("failed to save score {final_score}: {err:#}");
                false
            }
            Err(_) => {
                log::warn!(
                    "saving score {final_score} timed out after {}ms",
                    self.config.save_timeout.as_millis()
                );
                false
            }
        };
        if !saved {
            self.state.mark_score_save_failed();
        }

        self.emit(GameEvent::GameOver {
            final_score,
            score_saved: saved,
        });
    }

    fn tick_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.state.game_speed_ms()))
    }

    /// Returns false when nobody is listening or the event queue is full.
    fn emit(&self, event: GameEvent) -> bool {
        let name = event.name();
        match self.events.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!("event queue full, dropped {name}");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    fn publish(&self) {
        self.snapshots
            .send_modify(|snapshot| self.state.snapshot_into(snapshot));
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary {
            score: self.state.score(),
            level: self.state.level(),
            game_over: self.state.game_over(),
            score_save_error: self.state.score_save_error(),
            episode_id: self.state.episode_id(),
        }
    }
}
