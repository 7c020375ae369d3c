//! The drawing surface every widget renders through.
//!
//! A [`Surface`] is a staging buffer plus a flush. Widgets stage writes with
//! [`Surface::put_str`], [`Surface::draw_border`] and [`Surface::clear`];
//! nothing reaches the terminal until [`Surface::flush`], which the screen
//! calls exactly once per render pass.

use std::io;

use super::compositor::Compositor;
use super::driver::Driver;
use super::strip::{CellStyle, Strip};
use crate::geometry::{Offset, Region, Size};

// ---------------------------------------------------------------------------
// RenderError
// ---------------------------------------------------------------------------

/// Failure of a single drawing operation.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A write touched cells outside the screen. Whatever fitted was staged.
    #[error("write at ({x}, {y}) falls outside the screen")]
    OutOfBounds { x: i32, y: i32 },
    /// The terminal rejected the flush.
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Box drawing
// ---------------------------------------------------------------------------

const TOP_LEFT: char = '┌';
const TOP_RIGHT: char = '┐';
const BOTTOM_LEFT: char = '└';
const BOTTOM_RIGHT: char = '┘';
const HORIZONTAL: char = '─';
const VERTICAL: char = '│';

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// An opaque drawing target with stage-then-flush semantics.
///
/// Implementors provide the staging buffer, the cursor, the bell and the
/// flush; the drawing primitives are shared.
pub trait Surface {
    /// The staged frame.
    fn staging(&self) -> &Compositor;

    /// The staged frame, mutably.
    fn staging_mut(&mut self) -> &mut Compositor;

    /// Where the cursor should sit after the next flush. `None` hides it.
    fn set_cursor(&mut self, position: Option<Offset>);

    /// Ring the terminal bell on the next flush.
    fn bell(&mut self);

    /// Adopt new screen dimensions. The staged frame is blanked.
    fn resize(&mut self, size: Size);

    /// Push every staged change to the output in one go.
    fn flush(&mut self) -> Result<(), RenderError>;

    /// Current screen dimensions.
    fn size(&self) -> Size {
        let frame = self.staging();
        Size::new(frame.width as i32, frame.height as i32)
    }

    /// Stage `text` starting at cell (x, y).
    ///
    /// Text running off the right edge is cut; the visible prefix is still
    /// staged but the call reports [`RenderError::OutOfBounds`].
    fn put_str(&mut self, x: i32, y: i32, text: &str, style: CellStyle) -> Result<(), RenderError> {
        let strip = Strip::from_text(y, x, text, style);
        if self.staging_mut().place_strip(&strip) {
            Ok(())
        } else {
            Err(RenderError::OutOfBounds { x, y })
        }
    }

    /// Stage a single-line box border around the edge of `region`.
    fn draw_border(&mut self, region: Region) -> Result<(), RenderError> {
        if region.width < 2 || region.height < 2 {
            return Ok(());
        }

        let inner = (region.width - 2) as usize;
        let mut top = String::with_capacity(region.width as usize);
        top.push(TOP_LEFT);
        top.extend(std::iter::repeat_n(HORIZONTAL, inner));
        top.push(TOP_RIGHT);

        let mut bottom = String::with_capacity(region.width as usize);
        bottom.push(BOTTOM_LEFT);
        bottom.extend(std::iter::repeat_n(HORIZONTAL, inner));
        bottom.push(BOTTOM_RIGHT);

        let vertical = VERTICAL.to_string();
        let mut result = Ok(());
        let mut keep_first = |r: Result<(), RenderError>| {
            if result.is_ok() {
                result = r;
            }
        };

        keep_first(self.put_str(region.x, region.y, &top, CellStyle::PLAIN));
        for y in region.y + 1..region.bottom() - 1 {
            keep_first(self.put_str(region.x, y, &vertical, CellStyle::PLAIN));
            keep_first(self.put_str(region.right() - 1, y, &vertical, CellStyle::PLAIN));
        }
        keep_first(self.put_str(region.x, region.bottom() - 1, &bottom, CellStyle::PLAIN));

        result
    }

    /// Blank the on-screen part of `region`.
    fn clear(&mut self, region: Region) {
        self.staging_mut().clear(region);
    }
}

// ---------------------------------------------------------------------------
// TerminalSurface
// ---------------------------------------------------------------------------

/// A [`Surface`] backed by the real terminal.
///
/// Keeps the last flushed frame so that each flush only emits the cells that
/// changed since.
pub struct TerminalSurface {
    driver: Driver,
    staged: Compositor,
    flushed: Compositor,
    cursor: Option<Offset>,
    bell_pending: bool,
    needs_clear: bool,
}

impl TerminalSurface {
    /// Take over the terminal: alternate screen, raw mode, hidden cursor.
    pub fn open() -> Result<Self, RenderError> {
        let (width, height) = Driver::terminal_size()?;
        let mut driver = Driver::new()?;
        driver.enter()?;
        Ok(Self {
            driver,
            staged: Compositor::new(width, height),
            flushed: Compositor::new(width, height),
            cursor: None,
            bell_pending: false,
            needs_clear: true,
        })
    }

    /// Give the terminal back.
    pub fn close(&mut self) -> Result<(), RenderError> {
        self.driver.leave()?;
        Ok(())
    }
}

impl Surface for TerminalSurface {
    fn staging(&self) -> &Compositor {
        &self.staged
    }

    fn staging_mut(&mut self) -> &mut Compositor {
        &mut self.staged
    }

    fn set_cursor(&mut self, position: Option<Offset>) {
        self.cursor = position;
    }

    fn bell(&mut self) {
        self.bell_pending = true;
    }

    fn resize(&mut self, size: Size) {
        let width = size.width.max(0) as u16;
        let height = size.height.max(0) as u16;
        self.staged.resize(width, height);
        self.needs_clear = true;
    }

    fn flush(&mut self) -> Result<(), RenderError> {
        if self.needs_clear {
            self.driver.clear_all()?;
            // Force a full repaint: diffing against a differently sized
            // frame reports every cell.
            self.flushed = Compositor::new(0, 0);
            self.needs_clear = false;
        }

        let updates = self.staged.diff(&self.flushed);
        self.driver.apply_updates(&updates)?;
        self.driver.place_cursor(self.cursor)?;
        if std::mem::take(&mut self.bell_pending) {
            self.driver.bell()?;
        }
        self.driver.flush()?;

        self.flushed = self.staged.clone();
        Ok(())
    }
}
