//! ProbeWidget: a minimal focusable widget that records what it was sent.

use std::any::Any;

use crate::event::input::{Key, KeyEvent};
use crate::geometry::Offset;
use crate::render::strip::CellStyle;
use crate::render::surface::Surface;
use crate::widget::traits::{FocusOutcome, Handled, Widget};

const BINDS: &[Key] = &[Key::Enter, Key::Char(' ')];

/// Draws its name (with a `*` while focused) and consumes Enter and Space.
#[derive(Debug, Clone)]
pub struct ProbeWidget {
    pub name: String,
    x: i32,
    y: i32,
    focused: bool,
    /// Keys this probe consumed, in order.
    pub handled: Vec<KeyEvent>,
    /// Number of times `focus` was called.
    pub focus_count: usize,
}

impl ProbeWidget {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            x: 0,
            y: 0,
            focused: false,
            handled: Vec::new(),
            focus_count: 0,
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

impl Widget for ProbeWidget {
    fn widget_type(&self) -> &str {
        "Probe"
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
        let marker = if self.focused { "*" } else { " " };
        let _ = surface.put_str(self.x, self.y, &format!("{}{marker}", self.name), CellStyle::PLAIN);
    }

    fn handle_event(&mut self, event: &KeyEvent) -> Handled {
        if self.focused && BINDS.contains(&event.code) {
            self.handled.push(*event);
            Handled::Consumed
        } else {
            Handled::Ignored
        }
    }

    fn focus(&mut self) -> FocusOutcome {
        self.focused = true;
        self.focus_count += 1;
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
