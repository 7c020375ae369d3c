//! RecordingSurface: an in-memory [`Surface`] that remembers every flush.

use std::io;

use crate::geometry::{Offset, Size};
use crate::render::compositor::Compositor;
use crate::render::surface::{RenderError, Surface};

/// A [`Surface`] with no terminal behind it.
///
/// Flushing snapshots the staged frame instead of writing escape codes, and
/// counts flushes and bells so tests can check the one-flush-per-pass rule.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    staged: Compositor,
    flushed: Option<Compositor>,
    pending_cursor: Option<Offset>,
    cursor: Option<Offset>,
    bell_pending: bool,
    flushes: usize,
    bells: usize,
    fail_flush: bool,
}

impl RecordingSurface {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            staged: Compositor::new(width, height),
            flushed: None,
            pending_cursor: None,
            cursor: None,
            bell_pending: false,
            flushes: 0,
            bells: 0,
            fail_flush: false,
        }
    }

    /// Successful flushes so far.
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Bells that reached a flush.
    pub fn bells(&self) -> usize {
        self.bells
    }

    /// Cursor position as of the last flush.
    pub fn cursor(&self) -> Option<Offset> {
        self.cursor
    }

    /// The frame as of the last flush.
    pub fn last_frame(&self) -> Option<&Compositor> {
        self.flushed.as_ref()
    }

    /// Make every following flush fail with an I/O error.
    pub fn fail_flushes(&mut self, fail: bool) {
        self.fail_flush = fail;
    }
}

impl Surface for RecordingSurface {
    fn staging(&self) -> &Compositor {
        &self.staged
    }

    fn staging_mut(&mut self) -> &mut Compositor {
        &mut self.staged
    }

    fn set_cursor(&mut self, position: Option<Offset>) {
        self.pending_cursor = position;
    }

    fn bell(&mut self) {
        self.bell_pending = true;
    }

    fn resize(&mut self, size: Size) {
        self.staged
            .resize(size.width.max(0) as u16, size.height.max(0) as u16);
    }

    fn flush(&mut self) -> Result<(), RenderError> {
        if self.fail_flush {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "recording surface closed").into());
        }
        self.flushes += 1;
        if std::mem::take(&mut self.bell_pending) {
            self.bells += 1;
        }
        self.cursor = self.pending_cursor;
        self.flushed = Some(self.staged.clone());
        Ok(())
    }
}
