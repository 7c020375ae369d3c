//! Entry widget: a modal single-line text input.
//!
//! An `Entry` shows a title label followed by a bordered one-line box. While
//! unfocused and empty the box shows the prompt (placeholder). Focusing the
//! entry starts a capture: every key goes to the entry until an exit key
//! commits the text.
//!
//! State machine: `Idle -> Capturing -> Committed -> Capturing -> ...`.
//! The capture has no timeout; only the exit keys end it. A finished entry
//! stays focused but idle until focus moves elsewhere, so a lone entry on a
//! screen does not re-arm by itself.

use std::any::Any;

use crate::event::input::{Key, KeyEvent};
use crate::geometry::{Offset, Region};
use crate::render::strip::{columns, text_width, CellStyle};
use crate::render::surface::Surface;
use crate::widget::traits::{Completion, FocusOutcome, Handled, Widget};

/// Keys that end a capture (Ctrl chords are matched separately).
const EXIT_KEYS: &[Key] = &[Key::Enter, Key::Tab, Key::Escape];

/// Ctrl chords that submit: line feed, carriage return, and the classic
/// Ctrl+G terminator.
const SUBMIT_CHORDS: &[char] = &['j', 'm', 'g'];

/// Interrupt chord. Never captured, so the application can still quit.
const INTERRUPT: char = 'c';

// ---------------------------------------------------------------------------
// EditState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditState {
    /// Never focused.
    Idle,
    /// Keys are being captured.
    Capturing,
    /// A capture ended; `contents` holds the committed text or the prompt.
    Committed,
}

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A modal text input with a title, a prompt, and an edit cursor.
///
/// `contents` is public so the application can clear or preset it between
/// searches. It always holds either real text or exactly the prompt. The
/// edit cursor is re-validated against it before every use, so it may be
/// replaced at any time, even mid-capture.
///
/// ```ignore
/// let mut search = Entry::new(2, 0, 24, "Search", "i.e. John 3");
/// ```
#[derive(Debug)]
pub struct Entry {
    x: i32,
    y: i32,
    width: i32,
    title: String,
    prompt: String,
    /// The current text, or the prompt when there is none.
    pub contents: String,
    state: EditState,
    focused: bool,
    /// Byte offset of the edit cursor in `contents`.
    cursor: usize,
}

impl Entry {
    /// `width` is the number of text cells inside the box.
    pub fn new(
        x: i32,
        y: i32,
        width: i32,
        title: impl AsRef<str>,
        prompt: impl Into<String>,
    ) -> Self {
        let prompt = prompt.into();
        Self {
            x,
            y,
            width: width.max(1),
            title: format!("{}: ", title.as_ref()),
            contents: prompt.clone(),
            prompt,
            state: EditState::Idle,
            focused: false,
            cursor: 0,
        }
    }

    /// The label drawn left of the box, including its `": "` suffix.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    /// Whether a capture is running.
    pub fn is_editing(&self) -> bool {
        self.state == EditState::Capturing
    }

    /// The entered text, or `""` while the prompt is showing.
    pub fn value(&self) -> &str {
        if self.contents == self.prompt {
            ""
        } else {
            &self.contents
        }
    }

    /// Reset to the prompt.
    pub fn clear(&mut self) {
        self.contents = self.prompt.clone();
        self.cursor = 0;
    }

    /// The bordered box, three rows tall, right of the title.
    pub fn box_region(&self) -> Region {
        Region::new(
            self.x + text_width(&self.title) as i32,
            self.y,
            self.width + 2,
            3,
        )
    }

    /// Screen area covered by label and box.
    pub fn region(&self) -> Region {
        let bx = self.box_region();
        Region::new(self.x, self.y, bx.right() - self.x, bx.height)
    }

    // -----------------------------------------------------------------------
    // Line editing
    // -----------------------------------------------------------------------

    /// The edit cursor clamped to `contents` and snapped back to a char
    /// boundary.
    fn cursor_byte(&self) -> usize {
        let mut at = self.cursor.min(self.contents.len());
        while !self.contents.is_char_boundary(at) {
            at -= 1;
        }
        at
    }

    fn insert_char(&mut self, ch: char) {
        let at = self.cursor_byte();
        self.contents.insert(at, ch);
        self.cursor = at + ch.len_utf8();
    }

    fn delete_back(&mut self) {
        let at = self.cursor_byte();
        if at == 0 {
            return;
        }
        let prev = self.prev_char_boundary();
        self.contents.drain(prev..at);
        self.cursor = prev;
    }

    fn delete_forward(&mut self) {
        let at = self.cursor_byte();
        if at >= self.contents.len() {
            return;
        }
        let next = self.next_char_boundary();
        self.contents.drain(at..next);
        self.cursor = at;
    }

    fn kill_to_end(&mut self) {
        let at = self.cursor_byte();
        self.contents.truncate(at);
        self.cursor = at;
    }

    fn prev_char_boundary(&self) -> usize {
        self.contents[..self.cursor_byte()]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_char_boundary(&self) -> usize {
        let at = self.cursor_byte();
        self.contents[at..]
            .chars()
            .next()
            .map_or(at, |ch| at + ch.len_utf8())
    }

    /// Cursor position in cells from the start of the text.
    fn cursor_column(&self) -> usize {
        text_width(&self.contents[..self.cursor_byte()])
    }

    /// First cell shown in the box: keeps the cursor visible while editing
    /// text longer than the box.
    fn scroll_column(&self) -> usize {
        if self.is_editing() {
            self.cursor_column()
                .saturating_sub((self.width - 1).max(0) as usize)
        } else {
            0
        }
    }

    fn edit(&mut self, event: &KeyEvent) {
        if event.is_ctrl('a') {
            self.cursor = 0;
            return;
        }
        if event.is_ctrl('e') {
            self.cursor = self.contents.len();
            return;
        }
        if event.is_ctrl('k') {
            self.kill_to_end();
            return;
        }
        if let Some(ch) = event.text_char() {
            self.insert_char(ch);
            return;
        }
        match event.code {
            Key::Backspace => self.delete_back(),
            Key::Delete => self.delete_forward(),
            Key::Left => self.cursor = self.prev_char_boundary(),
            Key::Right => self.cursor = self.next_char_boundary(),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = self.contents.len(),
            _ => {}
        }
    }

    fn exit_kind(event: &KeyEvent) -> Option<bool> {
        if event.code == Key::Escape {
            return Some(false);
        }
        if EXIT_KEYS.contains(&event.code) && event.modifiers.is_empty() {
            return Some(true);
        }
        if SUBMIT_CHORDS.iter().any(|&ch| event.is_ctrl(ch)) {
            return Some(true);
        }
        None
    }

    /// End the capture: commit trimmed text through `unfocus`, then stay
    /// focused (idle) until the screen moves focus on.
    fn finish(&mut self, submitted: bool) -> Handled {
        let text = self.contents.trim().to_owned();
        self.contents = text.clone();
        self.unfocus();
        self.focused = true;
        log::debug!("entry {:?} finished (submitted: {submitted})", self.title);
        if submitted {
            Handled::Finished(Completion::Submitted(text))
        } else {
            Handled::Finished(Completion::Cancelled)
        }
    }
}

impl Widget for Entry {
    fn widget_type(&self) -> &str {
        "Entry"
    }

    fn position(&self) -> Offset {
        Offset::new(self.x, self.y)
    }

    fn binds(&self) -> &[Key] {
        EXIT_KEYS
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn update(&self, surface: &mut dyn Surface) {
        let _ = surface.put_str(self.x, self.y + 1, &self.title, CellStyle::BOLD);

        let bx = self.box_region();
        if surface.draw_border(bx).is_err() {
            log::trace!("entry border clipped at {bx:?}");
        }

        let showing_prompt = !self.is_editing() && self.contents == self.prompt;
        let display = if self.contents.is_empty() && !self.is_editing() {
            &self.prompt
        } else {
            &self.contents
        };
        let width = self.width as usize;
        let mut padded = columns(display, self.scroll_column(), width);
        let used = text_width(&padded);
        padded.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
        let style = if showing_prompt { CellStyle::DIM } else { CellStyle::PLAIN };
        let _ = surface.put_str(bx.x + 1, bx.y + 1, &padded, style);
    }

    fn handle_event(&mut self, event: &KeyEvent) -> Handled {
        if !self.focused || !self.is_editing() || event.is_ctrl(INTERRUPT) {
            return Handled::Ignored;
        }
        match Self::exit_kind(event) {
            Some(submitted) => self.finish(submitted),
            None => {
                // Modal: everything else is line editing or swallowed.
                self.edit(event);
                Handled::Consumed
            }
        }
    }

    fn focus(&mut self) -> FocusOutcome {
        self.focused = true;
        if self.contents == self.prompt {
            self.contents.clear();
        }
        self.cursor = self.contents.len();
        self.state = EditState::Capturing;
        FocusOutcome::Capturing
    }

    fn unfocus(&mut self) {
        self.focused = false;
        if self.state == EditState::Capturing {
            self.state = EditState::Committed;
        }
        let trimmed = self.contents.trim();
        if trimmed.is_empty() {
            self.contents = self.prompt.clone();
        } else if trimmed.len() != self.contents.len() {
            self.contents = trimmed.to_owned();
        }
        self.cursor = 0;
    }

    fn is_capturing(&self) -> bool {
        self.focused && self.is_editing()
    }

    fn handle_paste(&mut self, text: &str) -> bool {
        if !self.is_capturing() {
            return false;
        }
        for ch in text.chars() {
            self.insert_char(if ch.is_control() { ' ' } else { ch });
        }
        true
    }

    fn cursor(&self) -> Option<Offset> {
        if !self.is_capturing() {
            return None;
        }
        let bx = self.box_region();
        let column = (self.cursor_column() - self.scroll_column()) as i32;
        Some(Offset::new(bx.x + 1 + column, bx.y + 1))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
