//! TerminalRenderer: flushes a frame to a real terminal.
//!
//! Every draw is a full redraw; identical consecutive frames are skipped.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::game_view::{Frame, Tone};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<Frame>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to go out even if the frame is unchanged.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn draw(&mut self, frame: Frame) -> Result<()> {
        if self.last.as_ref() == Some(&frame) {
            return Ok(());
        }
        self.buf.clear();
        encode_frame_into(&frame, &mut self.buf)?;
        self.flush_buf()?;
        self.last = Some(frame);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`.
///
/// This builds a sequence of crossterm commands without writing to stdout.
pub fn encode_frame_into(frame: &Frame, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    let mut current: Option<Tone> = None;
    for (i, line) in frame.lines.iter().enumerate() {
        for segment in &line.0 {
            if current != Some(segment.tone) {
                apply_tone_into(out, segment.tone)?;
                current = Some(segment.tone);
            }
            out.queue(Print(&segment.text))?;
        }
        if i + 1 < frame.lines.len() {
            out.queue(Print("\r\n"))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_tone_into(out: &mut Vec<u8>, tone: Tone) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(tone_color(tone)))?;
    match tone {
        Tone::Falling | Tone::Flash | Tone::Warn => {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        Tone::Dim => {
            out.queue(SetAttribute(Attribute::Dim))?;
        }
        _ => {}
    }
    Ok(())
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Plain => Color::Rgb { r: 220, g: 220, b: 220 },
        Tone::Dim => Color::Rgb { r: 90, g: 90, b: 100 },
        Tone::Border => Color::Rgb { r: 200, g: 200, b: 200 },
        Tone::Prime => Color::Rgb { r: 240, g: 200, b: 60 },
        Tone::Falling => Color::Rgb { r: 80, g: 200, b: 255 },
        Tone::Flash => Color::Rgb { r: 255, g: 120, b: 40 },
        Tone::Accent => Color::Rgb { r: 120, g: 230, b: 140 },
        Tone::Warn => Color::Rgb { r: 255, g: 80, b: 80 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_view::{Line, Segment};

    fn frame(text: &str) -> Frame {
        Frame {
            lines: vec![Line(vec![
                Segment {
                    text: text.to_string(),
                    tone: Tone::Plain,
                },
                Segment {
                    text: "!".to_string(),
                    tone: Tone::Warn,
                },
            ])],
        }
    }

    #[test]
    fn encodes_text_of_every_segment() {
        let mut out = Vec::new();
        encode_frame_into(&frame("hello"), &mut out).unwrap();
        let encoded = String::from_utf8_lossy(&out);
        assert!(encoded.contains("hello"));
        assert!(encoded.contains('!'));
    }

    #[test]
    fn tones_map_to_distinct_colors() {
        assert_ne!(tone_color(Tone::Prime), tone_color(Tone::Plain));
        assert_ne!(tone_color(Tone::Flash), tone_color(Tone::Warn));
    }
}
