//! Terminal Prime Drop runner (default binary).
//!
//! The game runs as an async session on a tokio runtime; this thread only
//! polls crossterm for keys, draws snapshots, and acknowledges explosion and
//! level-up events once they have been on screen long enough.

mod logging;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tokio::runtime::Runtime;

use prime_drop::engine::{self, Acknowledge, GameEvent, JsonLinesReporter, SessionConfig, SessionHandle};
use prime_drop::input::{handle_key_event, should_quit};
use prime_drop::term::{GameView, Overlay, Popup, TerminalRenderer};

/// How long exploded cells flash before the cascade may continue.
const FLASH_MS: u64 = 300;
const POPUP_MS: u64 = 900;
const LEVEL_BANNER_MS: u64 = 1200;
const FRAME_MS: u64 = 16;

fn main() -> Result<()> {
    logging::init_from_env()?;

    let config = SessionConfig::from_env();
    let rt = Runtime::new().context("creating tokio runtime")?;
    let _guard = rt.enter();

    let reporter = JsonLinesReporter::new(config.score_path.clone());
    let mut session = engine::spawn(config, reporter);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();

    let summary = rt.block_on(session.shutdown())?;
    log::info!("final score {} (level {})", summary.score, summary.level);
    result
}

/// Acknowledgements held until their deadlines, released in arrival order.
struct AckQueue<A> {
    pending: VecDeque<(A, Instant)>,
}

impl<A> AckQueue<A> {
    fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    fn push(&mut self, ack: A, until: Instant) {
        self.pending.push_back((ack, until));
    }

    /// Hand every ack whose deadline has passed to `release`.
    ///
    /// An ack is never released ahead of one queued before it.
    fn release_due(&mut self, now: Instant, mut release: impl FnMut(A)) -> usize {
        let mut released = 0;
        while self.pending.front().is_some_and(|(_, until)| now >= *until) {
            if let Some((ack, _)) = self.pending.pop_front() {
                release(ack);
                released += 1;
            }
        }
        released
    }

    fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

fn run(term: &mut TerminalRenderer, session: &mut SessionHandle) -> Result<()> {
    let view = GameView::default();
    let mut overlay = Overlay::default();
    let mut pending: AckQueue<Acknowledge> = AckQueue::new();
    let mut popup_until = Instant::now();

    loop {
        // Events.
        while let Some(event) = session.try_next_event() {
            let now = Instant::now();
            match event {
                GameEvent::Explosion { event, ack } => {
                    overlay.flash = event.cells.to_vec();
                    pending.push(ack, now + Duration::from_millis(FLASH_MS));
                }
                GameEvent::ScorePopup { x, y, kind, amount } => {
                    overlay.popup = Some(Popup {
                        origin: (x, y),
                        amount,
                        kind,
                    });
                    popup_until = now + Duration::from_millis(POPUP_MS);
                }
                GameEvent::LevelUp { ack, .. } => {
                    pending.push(ack, now + Duration::from_millis(LEVEL_BANNER_MS));
                }
                GameEvent::GameOver { .. } => {}
            }
        }

        let now = Instant::now();
        if pending.release_due(now, Acknowledge::done) > 0 && pending.is_empty() {
            overlay.flash.clear();
        }
        if overlay.popup.is_some() && now >= popup_until {
            overlay.popup = None;
        }

        // Render.
        term.draw(view.render(&session.snapshot(), &overlay))?;

        // Input.
        if event::poll(Duration::from_millis(FRAME_MS))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        session.try_send(action);
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }
    }
}
