//! The frame handed to a presenter each tick.
//!
//! A frame is a grid of `(glyph, colour)` cells plus auxiliary text lines.
//! How colours become escape sequences is entirely the presenter's business.

/// Small palette the compositor draws with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ColorId {
    #[default]
    Default,
    White,
    Cyan,
    Blue,
    LightGray,
    DarkGray,
    Green,
    Yellow,
    Red,
    Magenta,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: ColorId,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: ' ',
        color: ColorId::Default,
    };

    pub const fn new(glyph: char, color: ColorId) -> Self {
        Self { glyph, color }
    }
}

/// One run of same-coloured text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub color: ColorId,
}

/// An auxiliary line (HUD, minimap row, status) made of coloured spans.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TextLine {
    pub spans: Vec<Span>,
}

impl TextLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::colored(text, ColorId::Default)
    }

    pub fn colored(text: impl Into<String>, color: ColorId) -> Self {
        let mut line = Self::default();
        line.push(text, color);
        line
    }

    /// Append text, merging it into the last span when the colour matches.
    pub fn push(&mut self, text: impl Into<String>, color: ColorId) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.color == color => last.text.push_str(&text),
            _ => self.spans.push(Span { text, color }),
        }
    }

    /// The line without colour information.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    pub lines: Vec<TextLine>,
    /// Set when something happened this tick that deserves a beep.
    pub alert: bool,
}

impl Frame {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
            lines: Vec::new(),
            alert: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Write a cell; out-of-range coordinates are ignored.
    pub fn set(&mut self, x: i64, y: i64, cell: Cell) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    pub fn row(&self, y: usize) -> &[Cell] {
        if y >= self.height {
            return &[];
        }
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// A grid row as plain text.
    pub fn row_text(&self, y: usize) -> String {
        self.row(y).iter().map(|c| c.glyph).collect()
    }

    /// Write `text` starting at `(x, y)`, clipping at the right edge.
    pub fn put_str(&mut self, x: i64, y: i64, text: &str, color: ColorId) {
        for (i, glyph) in text.chars().enumerate() {
            self.set(x + i as i64, y, Cell::new(glyph, color));
        }
    }

    /// Write `text` horizontally centred on row `y`.
    pub fn put_centered(&mut self, y: i64, text: &str, color: ColorId) {
        let len = text.chars().count() as i64;
        let x = (self.width as i64 - len) / 2;
        self.put_str(x.max(0), y, text, color);
    }
}

/// Anything that can show a frame: a terminal, a test recorder, ...
pub trait FrameSink {
    type Error;

    fn present(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}
