//! Strip: a horizontal run of styled terminal cells.
//!
//! A `Strip` is what every surface write turns into before it lands in the
//! compositor's staging buffer. It has no notion of clipping; the compositor
//! decides which of its cells fit on screen.
//!
//! Cells are measured by display width: a double-width character (CJK text,
//! for instance) takes its own cell plus a tail cell, and zero-width
//! characters take none.

use unicode_width::UnicodeWidthChar;

// ---------------------------------------------------------------------------
// CellStyle
// ---------------------------------------------------------------------------

/// Text attributes for a single cell.
///
/// The dashboard only distinguishes normal text, dimmed placeholders and
/// bold titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub bold: bool,
    pub dim: bool,
}

impl CellStyle {
    pub const PLAIN: CellStyle = CellStyle { bold: false, dim: false };
    pub const BOLD: CellStyle = CellStyle { bold: true, dim: false };
    pub const DIM: CellStyle = CellStyle { bold: false, dim: true };
}

// ---------------------------------------------------------------------------
// StyledCell
// ---------------------------------------------------------------------------

/// Marks the right half of a double-width character.
const WIDE_TAIL: char = '\0';

/// One character with its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledCell {
    pub ch: char,
    pub style: CellStyle,
}

impl StyledCell {
    pub fn new(ch: char, style: CellStyle) -> Self {
        Self { ch, style }
    }

    /// A blank (space) cell with default style.
    pub fn blank() -> Self {
        Self { ch: ' ', style: CellStyle::PLAIN }
    }

    /// The cell covered by the right half of the wide character before it.
    pub fn wide_tail(style: CellStyle) -> Self {
        Self { ch: WIDE_TAIL, style }
    }

    pub fn is_wide_tail(&self) -> bool {
        self.ch == WIDE_TAIL
    }
}

impl Default for StyledCell {
    fn default() -> Self {
        Self::blank()
    }
}

// ---------------------------------------------------------------------------
// Width helpers
// ---------------------------------------------------------------------------

/// Display width of `ch` in cells, after control characters become `?`.
pub fn char_width(ch: char) -> usize {
    if ch.is_control() {
        1
    } else {
        ch.width().unwrap_or(1)
    }
}

/// Display width of `text` in cells.
pub fn text_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// The characters of `text` whose cells fall inside columns
/// `skip..skip + cells`. A wide character straddling either edge is dropped.
pub fn columns(text: &str, skip: usize, cells: usize) -> String {
    let end = skip.saturating_add(cells);
    let mut column = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let width = char_width(ch);
        let start = column;
        column += width;
        if start >= end {
            break;
        }
        if start >= skip && column <= end {
            out.push(ch);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Strip
// ---------------------------------------------------------------------------

/// A row of cells starting at `(x_offset, y)` in absolute screen coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strip {
    pub y: i32,
    pub x_offset: i32,
    pub cells: Vec<StyledCell>,
}

impl Strip {
    pub fn new(y: i32, x_offset: i32) -> Self {
        Self { y, x_offset, cells: Vec::new() }
    }

    /// Build a strip from text in one style.
    ///
    /// Control characters are replaced with `?` so that nothing written to the
    /// terminal can move its cursor behind the compositor's back.
    pub fn from_text(y: i32, x_offset: i32, text: &str, style: CellStyle) -> Self {
        let mut strip = Self::new(y, x_offset);
        strip.push_str(text, style);
        strip
    }

    pub fn push(&mut self, ch: char, style: CellStyle) {
        let ch = if ch.is_control() { '?' } else { ch };
        match char_width(ch) {
            0 => {}
            1 => self.cells.push(StyledCell::new(ch, style)),
            _ => {
                self.cells.push(StyledCell::new(ch, style));
                self.cells.push(StyledCell::wide_tail(style));
            }
        }
    }

    pub fn push_str(&mut self, text: &str, style: CellStyle) {
        for ch in text.chars() {
            self.push(ch, style);
        }
    }

    /// Width in cells.
    pub fn width(&self) -> i32 {
        self.cells.len() as i32
    }

    /// The rightmost x position (exclusive).
    pub fn right(&self) -> i32 {
        self.x_offset + self.width()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
