//! Crossterm terminal output backend.
//!
//! The `Driver` wraps a buffered stdout writer. Everything is queued with
//! `queue!` and only reaches the terminal on [`Driver::flush`], so one render
//! pass turns into one write.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use super::compositor::CellUpdate;
use super::strip::CellStyle;
use crate::geometry::Offset;

/// ASCII BEL.
const BELL: char = '\u{7}';

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Terminal output backend using crossterm.
///
/// Creating a driver does not touch the terminal; call [`Driver::enter`]
/// explicitly and pair it with [`Driver::leave`].
pub struct Driver {
    writer: BufWriter<Stdout>,
}

impl Driver {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            writer: BufWriter::new(io::stdout()),
        })
    }

    /// Enter alternate screen, enable raw mode and hide the cursor.
    pub fn enter(&mut self) -> io::Result<()> {
        execute!(self.writer, EnterAlternateScreen, cursor::Hide)?;
        terminal::enable_raw_mode()?;
        Ok(())
    }

    /// Disable raw mode, show the cursor and leave alternate screen.
    pub fn leave(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.writer, cursor::Show, LeaveAlternateScreen)?;
        Ok(())
    }

    /// Queue a batch of cell updates.
    pub fn apply_updates(&mut self, updates: &[CellUpdate]) -> io::Result<()> {
        for update in updates {
            // The terminal already painted it along with its wide head.
            if update.cell.is_wide_tail() {
                continue;
            }
            queue!(self.writer, cursor::MoveTo(update.x, update.y))?;
            self.apply_cell_style(update.cell.style)?;
            queue!(
                self.writer,
                Print(update.cell.ch),
                SetAttribute(Attribute::Reset)
            )?;
        }
        Ok(())
    }

    /// Queue a full clear. Used after a resize, when the terminal contents
    /// no longer match the last flushed frame.
    pub fn clear_all(&mut self) -> io::Result<()> {
        queue!(self.writer, terminal::Clear(ClearType::All))
    }

    /// Queue cursor placement; `None` hides the cursor.
    pub fn place_cursor(&mut self, position: Option<Offset>) -> io::Result<()> {
        match position {
            Some(pos) if pos.x >= 0 && pos.y >= 0 => queue!(
                self.writer,
                cursor::MoveTo(pos.x as u16, pos.y as u16),
                cursor::Show
            ),
            _ => queue!(self.writer, cursor::Hide),
        }
    }

    /// Queue an audible bell.
    pub fn bell(&mut self) -> io::Result<()> {
        queue!(self.writer, Print(BELL))
    }

    /// Send everything queued so far to the terminal.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Terminal size (columns, rows).
    pub fn terminal_size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn apply_cell_style(&mut self, style: CellStyle) -> io::Result<()> {
        if style.bold {
            queue!(self.writer, SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            queue!(self.writer, SetAttribute(Attribute::Dim))?;
        }
        Ok(())
    }
}

/// Best-effort terminal restore for panic hooks and error exits.
///
/// Errors are ignored: there is nothing left to report them to.
pub fn restore_terminal() {
    let mut stdout = io::stdout();
    let _ = terminal::disable_raw_mode();
    let _ = execute!(stdout, cursor::Show, LeaveAlternateScreen);
}

/// Ring the bell right away, outside any render pass.
pub fn ring_bell() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, Print(BELL));
}
