//! ScrollableFrame widget: a bordered, scrollable view over a text document.

use std::any::Any;

use crate::event::input::{Key, KeyEvent};
use crate::geometry::{Offset, Region};
use crate::render::surface::Surface;
use crate::widget::traits::{FocusOutcome, Handled, Widget};
use crate::widget::viewport::Viewport;

const BINDS: &[Key] = &[
    Key::Up,
    Key::Down,
    Key::PageUp,
    Key::PageDown,
    Key::Char('k'),
    Key::Char('j'),
];

/// A bordered text area that wraps and scrolls its `lines`.
///
/// The application owns the content: it replaces `lines` wholesale on every
/// navigation, preferably through [`ScrollableFrame::set_lines`] so the view
/// returns to the top.
#[derive(Debug)]
pub struct ScrollableFrame {
    x: i32,
    y: i32,
    /// The document, one logical line per entry.
    pub lines: Vec<String>,
    title: Option<String>,
    viewport: Viewport,
    focused: bool,
}

impl ScrollableFrame {
    /// `width` and `height` include the border.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            lines: Vec::new(),
            title: None,
            viewport: Viewport::new(width, height),
            focused: false,
        }
    }

    /// Set the title drawn into the top border (builder pattern).
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Replace the document and scroll back to the top.
    pub fn set_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.viewport.reset();
    }

    /// Current scroll offset; `1` is top-aligned.
    pub fn offset(&self) -> i32 {
        self.viewport.offset()
    }

    pub fn width(&self) -> i32 {
        self.viewport.width()
    }

    pub fn height(&self) -> i32 {
        self.viewport.height()
    }

    pub fn region(&self) -> Region {
        Region::new(self.x, self.y, self.viewport.width(), self.viewport.height())
    }

    /// Change the frame's dimensions, keeping the scroll offset in bounds.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.viewport.resize(width, height, self.lines.len());
    }

    /// Scroll by a signed number of rows (positive moves towards the top).
    /// Returns whether the offset moved.
    pub fn scroll(&mut self, step: i32) -> bool {
        self.viewport.scroll(step, self.lines.len())
    }

    /// Scroll `n` rows towards the start of the document.
    pub fn scroll_up(&mut self, n: u32) -> bool {
        self.scroll(n.min(i32::MAX as u32) as i32)
    }

    /// Scroll `n` rows towards the end of the document.
    pub fn scroll_down(&mut self, n: u32) -> bool {
        self.scroll(-(n.min(i32::MAX as u32) as i32))
    }

    pub fn page_up(&mut self) -> bool {
        self.scroll(self.viewport.interior_height())
    }

    pub fn page_down(&mut self) -> bool {
        self.scroll(-self.viewport.interior_height())
    }
}

impl Widget for ScrollableFrame {
    fn widget_type(&self) -> &str {
        "ScrollableFrame"
    }

    fn position(&self) -> Offset {
        Offset::new(self.x, self.y)
    }

    fn binds(&self) -> &[Key] {
        BINDS
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn update(&self, surface: &mut dyn Surface) {
        self.viewport
            .render(surface, self.region(), self.title.as_deref(), &self.lines);
    }

    fn handle_event(&mut self, event: &KeyEvent) -> Handled {
        if !self.focused || !event.modifiers.is_empty() || !BINDS.contains(&event.code) {
            return Handled::Ignored;
        }
        match event.code {
            Key::Up | Key::Char('k') => self.scroll_up(1),
            Key::Down | Key::Char('j') => self.scroll_down(1),
            Key::PageUp => self.page_up(),
            Key::PageDown => self.page_down(),
            _ => false,
        };
        Handled::Consumed
    }

    fn focus(&mut self) -> FocusOutcome {
        self.focused = true;
        FocusOutcome::Focused
    }

    fn unfocus(&mut self) {
        self.focused = false;
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
