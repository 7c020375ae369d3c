//! Viewport renderer: line wrapping and vertical scroll-offset math.
//!
//! A document is a list of logical lines. For display each line is wrapped to
//! the viewport's interior width and followed by one blank row, giving a flat
//! list of display rows. The offset says where display row 0 lands relative to
//! the viewport's top border: `1` puts it on the first interior row, smaller
//! values scroll the document up.
//!
//! The scroll bounds are computed from the raw logical line count, assuming
//! two display rows per line (text + spacer). This is an approximation: long
//! lines wrap into more rows than that, so the bottom of a document with
//! long lines can stay out of reach, and documents of short lines may scroll
//! a little past their end.

use crate::geometry::Region;
use crate::render::strip::{columns, CellStyle};
use crate::render::surface::Surface;

// ---------------------------------------------------------------------------
// Wrapping
// ---------------------------------------------------------------------------

/// Wrap and flatten `lines` into display rows of at most `columns` cells.
///
/// Every logical line is followed by one blank spacer row.
pub fn wrap_lines<S: AsRef<str>>(lines: &[S], columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut rows = Vec::with_capacity(lines.len() * 2);
    for line in lines {
        rows.extend(
            textwrap::wrap(line.as_ref(), columns)
                .into_iter()
                .map(|row| row.into_owned()),
        );
        rows.push(String::new());
    }
    rows
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Scroll position and dimensions of a bordered, scrollable text area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: i32,
    height: i32,
    offset: i32,
}

impl Viewport {
    /// Offset that aligns the first display row with the top interior row.
    pub const TOP: i32 = 1;

    /// `width` and `height` include the one-cell border on each side.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            offset: Self::TOP,
        }
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Rows available between the top and bottom borders.
    pub fn interior_height(&self) -> i32 {
        (self.height - 2).max(0)
    }

    /// Columns available between the left and right borders.
    pub fn interior_width(&self) -> i32 {
        (self.width - 2).max(0)
    }

    /// Whether a document of `line_count` logical lines is taller than the
    /// viewport (using the two-rows-per-line approximation).
    pub fn is_scrollable(&self, line_count: usize) -> bool {
        2 * line_count as i32 > self.height - 2
    }

    /// Lowest offset allowed for a document of `line_count` lines.
    pub fn floor(&self, line_count: usize) -> i32 {
        -2 * line_count as i32 + self.height
    }

    /// `offset` pulled into bounds for a document of `line_count` lines:
    /// top-aligned when it fits, otherwise within `[floor, TOP]`.
    pub fn bounded(&self, offset: i32, line_count: usize) -> i32 {
        if self.is_scrollable(line_count) {
            offset.min(Self::TOP).max(self.floor(line_count))
        } else {
            Self::TOP
        }
    }

    /// Move the offset by `step` rows (positive scrolls towards the top).
    ///
    /// The current offset is first pulled back into bounds for `line_count`,
    /// since the document may have been swapped since the last scroll.
    /// Returns whether the offset changed.
    pub fn scroll(&mut self, step: i32, line_count: usize) -> bool {
        let before = self.offset;
        let current = self.bounded(self.offset, line_count);
        self.offset = self.bounded(current.saturating_add(step), line_count);
        self.offset != before
    }

    /// Back to the top of the document.
    pub fn reset(&mut self) {
        self.offset = Self::TOP;
    }

    /// Adopt new dimensions and pull the offset back into bounds.
    pub fn resize(&mut self, width: i32, height: i32, line_count: usize) {
        self.width = width;
        self.height = height;
        self.offset = self.bounded(self.offset, line_count);
    }

    /// Paint the border, the optional title and the visible display rows of
    /// `lines` into `area` (whose size should match the viewport's).
    ///
    /// Rows landing on or beyond the borders are skipped. A row whose write
    /// fails is dropped without affecting the others.
    pub fn render<S: AsRef<str>>(
        &self,
        surface: &mut dyn Surface,
        area: Region,
        title: Option<&str>,
        lines: &[S],
    ) {
        surface.clear(area);
        if surface.draw_border(area).is_err() {
            log::trace!("viewport border clipped at {area:?}");
        }
        if let Some(title) = title {
            let clipped = columns(title, 0, (self.interior_width() - 2).max(0) as usize);
            if !clipped.is_empty() {
                let _ = surface.put_str(area.x + 2, area.y, &clipped, CellStyle::BOLD);
            }
        }

        let interior = area.inset(1);
        if interior.is_empty() {
            return;
        }
        // Relative to the interior's first row.
        let first = self.bounded(self.offset, lines.len()) - Self::TOP;
        let rows = wrap_lines(lines, interior.width as usize);
        for (i, row) in rows.iter().enumerate() {
            let y = first + i as i32;
            if y < 0 || row.is_empty() {
                continue;
            }
            if y >= interior.height {
                break;
            }
            if let Err(err) = surface.put_str(interior.x, interior.y + y, row, CellStyle::PLAIN) {
                log::trace!("dropped display row {i}: {err}");
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
