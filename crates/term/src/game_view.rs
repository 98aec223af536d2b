//! GameView: maps a `GameSnapshot` into styled text lines.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{is_prime, title_for_level, GameSnapshot};
use crate::types::{Coord, ExplosionKind, GRID_HEIGHT, GRID_WIDTH};

/// Colour class of a text segment; the renderer picks the actual colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Plain,
    Dim,
    Border,
    Prime,
    Falling,
    Flash,
    Accent,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line(pub Vec<Segment>);

impl Line {
    fn push(&mut self, text: impl Into<String>, tone: Tone) {
        self.0.push(Segment {
            text: text.into(),
            tone,
        });
    }

    /// Unstyled text of the line
    pub fn text(&self) -> String {
        self.0.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<Line>,
}

impl Frame {
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Floating score text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Popup {
    pub origin: Coord,
    pub amount: u32,
    pub kind: ExplosionKind,
}

/// Transient decorations owned by the render loop, not the game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    /// Cells of the explosion currently being shown
    pub flash: Vec<Coord>,
    pub popup: Option<Popup>,
}

/// A lightweight text renderer for the puzzle grid.
pub struct GameView {
    /// Terminal columns per grid cell
    cell_w: usize,
}

impl Default for GameView {
    fn default() -> Self {
        Self { cell_w: 3 }
    }
}

impl GameView {
    pub fn new(cell_w: usize) -> Self {
        Self {
            cell_w: cell_w.max(2),
        }
    }

    pub fn render(&self, snap: &GameSnapshot, overlay: &Overlay) -> Frame {
        let panel = self.side_panel(snap, overlay);
        let border = format!("+{}+", "-".repeat(GRID_WIDTH as usize * self.cell_w));

        let mut lines = Vec::with_capacity(GRID_HEIGHT as usize + 2);
        let mut top = Line::default();
        top.push(border.clone(), Tone::Border);
        lines.push(top);

        for y in 0..GRID_HEIGHT as i8 {
            let mut line = Line::default();
            line.push("|", Tone::Border);
            for x in 0..GRID_WIDTH as i8 {
                let (text, tone) = self.cell(snap, overlay, x, y);
                line.push(text, tone);
            }
            line.push("|", Tone::Border);
            if let Some((text, tone)) = panel.get(y as usize) {
                line.push("  ", Tone::Plain);
                line.push(text.clone(), *tone);
            }
            lines.push(line);
        }

        let mut bottom = Line::default();
        bottom.push(border, Tone::Border);
        lines.push(bottom);

        Frame { lines }
    }

    fn cell(&self, snap: &GameSnapshot, overlay: &Overlay, x: i8, y: i8) -> (String, Tone) {
        let w = self.cell_w;
        if overlay.flash.contains(&(x, y)) {
            return ("*".repeat(w), Tone::Flash);
        }
        if let Some(f) = snap.falling.filter(|f| (f.x, f.y) == (x, y)) {
            return (format!("{:>w$}", f.value), Tone::Falling);
        }
        if let Some(value) = snap.grid[y as usize][x as usize] {
            let tone = if is_prime(value) { Tone::Prime } else { Tone::Plain };
            return (format!("{value:>w$}"), tone);
        }
        let ghost = snap
            .falling
            .zip(snap.ghost_y)
            .is_some_and(|(f, gy)| f.x == x && gy == y && f.y != y);
        if ghost {
            return (format!("{:>w$}", ":"), Tone::Dim);
        }
        (format!("{:>w$}", "."), Tone::Dim)
    }

    fn side_panel(&self, snap: &GameSnapshot, overlay: &Overlay) -> Vec<(String, Tone)> {
        let mut rows = vec![
            (format!("SCORE  {}", snap.score), Tone::Accent),
            (format!("LEVEL  {}", snap.level), Tone::Plain),
            (format!("TITLE  {}", title_for_level(snap.level)), Tone::Plain),
            (format!("SPEED  {}ms", snap.game_speed_ms), Tone::Dim),
            (String::new(), Tone::Plain),
            (format!("NEXT   {}", snap.next_value), Tone::Plain),
            (
                format!("OP     [{}]", snap.operation.symbol()),
                Tone::Accent,
            ),
            (String::new(), Tone::Plain),
        ];

        if snap.pending_score > 0 {
            rows.push((format!("+{} pending", snap.pending_score), Tone::Accent));
        }
        if let Some(popup) = overlay.popup {
            rows.push((
                format!("{} +{}", popup.kind.as_str().to_uppercase(), popup.amount),
                Tone::Flash,
            ));
        }
        if snap.level_transition {
            rows.push((format!("LEVEL {}!", snap.level), Tone::Flash));
        }
        if snap.paused {
            rows.push(("PAUSED".to_string(), Tone::Warn));
        }
        if snap.game_over {
            rows.push(("GAME OVER  (r to restart)".to_string(), Tone::Warn));
            if snap.score_save_error {
                rows.push(("score not saved".to_string(), Tone::Warn));
            }
        }

        rows.push((String::new(), Tone::Plain));
        rows.push(("<- -> move  space drop".to_string(), Tone::Dim));
        rows.push(("+ add  - sub  0 none".to_string(), Tone::Dim));
        rows.push(("p pause  r restart  q quit".to_string(), Tone::Dim));
        rows
    }
}
