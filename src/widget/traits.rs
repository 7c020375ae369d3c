//! Widget trait: the capability contract every focus-ring member satisfies.
//!
//! The screen holds widgets as `Box<dyn Widget>` and drives them through four
//! operations: `update` (repaint), `handle_event` (consume a key), `focus` and
//! `unfocus`. Modal widgets additionally report `is_capturing`, which makes
//! the screen route every key to them until they finish.

use std::any::Any;

use crate::event::input::{Key, KeyEvent};
use crate::geometry::Offset;
use crate::render::surface::Surface;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// How a modal capture ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// A submit key ended the capture; carries the trimmed text (may be empty).
    Submitted(String),
    /// The cancel key ended the capture.
    Cancelled,
}

/// Result of offering a key to a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handled {
    /// Not focused, or not one of the widget's keys.
    Ignored,
    /// The key was used.
    Consumed,
    /// The key was used and ended a modal capture. The widget has committed
    /// its edits and stays focused, but idle, until focus moves on.
    Finished(Completion),
}

impl Handled {
    pub fn is_consumed(&self) -> bool {
        !matches!(self, Handled::Ignored)
    }
}

/// What a widget did when it received focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Plain focus: keys go through normal dispatch.
    Focused,
    /// The widget started a modal capture and wants every key until it
    /// reports [`Handled::Finished`].
    Capturing,
}

// ---------------------------------------------------------------------------
// Widget trait
// ---------------------------------------------------------------------------

/// Core trait implemented by every interactive widget.
///
/// Object-safe so the screen can keep a homogeneous registry. `update` takes
/// `&self`: painting never changes widget state.
pub trait Widget {
    /// Short type name, used in logs.
    fn widget_type(&self) -> &str;

    /// Top-left corner of the widget's screen area.
    fn position(&self) -> Offset;

    /// Keys this widget recognises when focused.
    fn binds(&self) -> &[Key];

    fn is_focused(&self) -> bool;

    /// Repaint the widget's area from its current state.
    ///
    /// Must tolerate being called every frame and must not fail: individual
    /// out-of-bounds writes are dropped.
    fn update(&self, surface: &mut dyn Surface);

    /// Offer one key. Only a focused widget may consume it.
    fn handle_event(&mut self, event: &KeyEvent) -> Handled;

    /// Become the active widget.
    fn focus(&mut self) -> FocusOutcome;

    /// Stop being the active widget, committing anything pending.
    /// Calling it on an unfocused widget is harmless.
    fn unfocus(&mut self);

    /// Whether a modal capture is running.
    fn is_capturing(&self) -> bool {
        false
    }

    /// Offer pasted text. Returns whether it was accepted.
    fn handle_paste(&mut self, _text: &str) -> bool {
        false
    }

    /// Where the terminal cursor should be shown, if anywhere.
    fn cursor(&self) -> Option<Offset> {
        None
    }

    /// Downcast to `&dyn Any` for typed access through the screen.
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ===========================================================================
// Tests
// ===========================================================================
