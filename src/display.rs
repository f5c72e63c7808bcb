//! Rendering layer.  All terminal I/O lives here.
//!
//! `TerminalPresenter` turns a `Frame` into crossterm commands.  Each row is
//! encoded to bytes first and only rewritten when it differs from what is
//! already on screen, which keeps redraws cheap and flicker-free.

use std::io::{self, Write};

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::frame::{Cell, ColorId, Frame, FrameSink, TextLine};

/// Terminal colour for a palette entry.
pub fn to_color(color: ColorId) -> Color {
    match color {
        ColorId::Default => Color::Reset,
        ColorId::White => Color::White,
        ColorId::Cyan => Color::Cyan,
        ColorId::Blue => Color::Blue,
        ColorId::LightGray => Color::Grey,
        ColorId::DarkGray => Color::DarkGrey,
        ColorId::Green => Color::Green,
        ColorId::Yellow => Color::Yellow,
        ColorId::Red => Color::Red,
        ColorId::Magenta => Color::Magenta,
    }
}

pub struct TerminalPresenter<W: Write> {
    out: W,
    /// Encoded bytes of every row currently on screen.
    previous: Vec<Vec<u8>>,
    /// Rows rewritten by the last `present` call.
    last_written: usize,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: Vec::new(),
            last_written: 0,
        }
    }

    pub fn last_written(&self) -> usize {
        self.last_written
    }

    /// Forget what is on screen so the next frame is drawn in full.
    pub fn invalidate(&mut self) {
        self.previous.clear();
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_row(&mut self, y: usize, encoded: Vec<u8>) -> io::Result<()> {
        if self.previous.get(y) == Some(&encoded) {
            return Ok(());
        }
        self.out.write_all(&encoded)?;
        if y < self.previous.len() {
            self.previous[y] = encoded;
        } else {
            self.previous.push(encoded);
        }
        self.last_written += 1;
        Ok(())
    }
}

impl<W: Write> FrameSink for TerminalPresenter<W> {
    type Error = io::Error;

    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        self.last_written = 0;

        let mut y = 0;
        for row in 0..frame.height() {
            let encoded = encode_cells(y as u16, frame.row(row))?;
            self.write_row(y, encoded)?;
            y += 1;
        }
        for line in &frame.lines {
            let encoded = encode_line(y as u16, line)?;
            self.write_row(y, encoded)?;
            y += 1;
        }

        // Blank out rows left over from a taller previous frame
        while self.previous.len() > y {
            let row = self.previous.len() - 1;
            self.out.queue(cursor::MoveTo(0, row as u16))?;
            self.out.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
            self.previous.pop();
        }

        if frame.alert {
            self.out.queue(Print('\x07'))?;
        }

        // Park cursor below the frame and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, y as u16))?;
        self.out.flush()
    }
}

// ── Row encoding ─────────────────────────────────────────────────────────────

fn encode_cells(y: u16, cells: &[Cell]) -> io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(cells.len() * 2);
    buf.queue(cursor::MoveTo(0, y))?;
    let mut current = None;
    for cell in cells {
        if current != Some(cell.color) {
            buf.queue(style::SetForegroundColor(to_color(cell.color)))?;
            current = Some(cell.color);
        }
        buf.queue(Print(cell.glyph))?;
    }
    buf.queue(style::ResetColor)?;
    Ok(buf)
}

fn encode_line(y: u16, line: &TextLine) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.queue(cursor::MoveTo(0, y))?;
    buf.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
    for span in &line.spans {
        buf.queue(style::SetForegroundColor(to_color(span.color)))?;
        buf.queue(Print(&span.text))?;
    }
    buf.queue(style::ResetColor)?;
    Ok(buf)
}
