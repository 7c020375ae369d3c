//! Screen: widget registry, focus ring, render pass.
//!
//! [`Screen`] owns the drawing surface, the decorative windows, and every
//! widget. Registration order is both render order and focus-ring order.
//! Exactly one widget is focused whenever any are registered; every focus
//! change unfocuses the old widget before focusing the new one.

use std::ops::BitOr;

use slotmap::{new_key_type, SlotMap};

use crate::event::input::{InputEvent, Key, KeyEvent};
use crate::geometry::{Region, Size};
use crate::render::strip::{columns, CellStyle};
use crate::render::surface::Surface;
use crate::widget::traits::{Completion, FocusOutcome, Handled, Widget};

new_key_type! {
    /// Handle to a widget registered with a [`Screen`].
    pub struct WidgetId;
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Misuse of the focus API. Focus is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FocusError {
    #[error("widget index {index} is outside the {count} registered widgets")]
    OutOfBounds { index: usize, count: usize },
    #[error("widget was never registered with this screen")]
    NotRegistered,
}

// ---------------------------------------------------------------------------
// Fill
// ---------------------------------------------------------------------------

/// Which screen dimensions a decorative window tracks on resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fill(pub u8);

impl Fill {
    pub const NONE: Fill = Fill(0);
    pub const HORIZONTAL: Fill = Fill(1);
    pub const VERTICAL: Fill = Fill(2);

    pub fn contains(self, other: Fill) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for Fill {
    type Output = Fill;
    fn bitor(self, rhs: Self) -> Self::Output {
        Fill(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// A decorative bordered region: drawn every pass, never focused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub region: Region,
    pub title: Option<String>,
}

impl Window {
    pub fn new(region: Region) -> Self {
        Self { region, title: None }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn draw(&self, surface: &mut dyn Surface) {
        if let Err(err) = surface.draw_border(self.region) {
            log::trace!("window border clipped: {err}");
        }
        if let Some(title) = &self.title {
            let room = (self.region.width - 4).max(0) as usize;
            let clipped = columns(title, 0, room);
            if !clipped.is_empty() {
                let _ = surface.put_str(self.region.x + 2, self.region.y, &clipped, CellStyle::BOLD);
            }
        }
    }
}

#[derive(Debug)]
struct WindowEntry {
    window: Window,
    fill: Fill,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// What [`Screen::handle_event`] did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The focused widget used the event.
    Consumed,
    /// Nobody used the key; the application may act on it.
    Unhandled(KeyEvent),
    /// Tab moved the focus.
    FocusMoved(WidgetId),
    /// A modal capture finished. Focus moved on, unless the finished widget
    /// is the only one registered.
    Completed { widget: WidgetId, completion: Completion },
    /// The screen adopted a new size.
    Resized(Size),
    /// Nothing to do (no widgets, or a paste nobody wanted).
    Ignored,
}

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// The focus coordinator and render driver.
///
/// Single-threaded: one event in, one full render pass out.
pub struct Screen<S: Surface> {
    surface: S,
    widgets: SlotMap<WidgetId, Box<dyn Widget>>,
    order: Vec<WidgetId>,
    windows: Vec<WindowEntry>,
    current: usize,
}

impl<S: Surface> Screen<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            widgets: SlotMap::with_key(),
            order: Vec::new(),
            windows: Vec::new(),
            current: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Give the surface back, e.g. to restore the terminal.
    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn size(&self) -> Size {
        self.surface.size()
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register a decorative window and the dimensions it tracks.
    pub fn add_window(&mut self, window: Window, fill: Fill) {
        self.windows.push(WindowEntry { window, fill });
    }

    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.iter().map(|entry| &entry.window)
    }

    /// Append a widget to the focus ring.
    ///
    /// The first widget registered is focused immediately.
    pub fn add_widget(&mut self, widget: impl Widget + 'static) -> WidgetId {
        let id = self.widgets.insert(Box::new(widget));
        self.order.push(id);
        if self.order.len() == 1 {
            self.current = 0;
            self.widgets[id].focus();
        }
        id
    }

    pub fn widget_count(&self) -> usize {
        self.order.len()
    }

    /// Widget ids in focus-ring order.
    pub fn widget_ids(&self) -> &[WidgetId] {
        &self.order
    }

    /// Typed access to a registered widget.
    pub fn widget<T: Widget + 'static>(&self, id: WidgetId) -> Option<&T> {
        self.widgets.get(id)?.as_any().downcast_ref::<T>()
    }

    /// Typed mutable access to a registered widget.
    pub fn widget_mut<T: Widget + 'static>(&mut self, id: WidgetId) -> Option<&mut T> {
        self.widgets.get_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    /// Untyped access, for inspecting focus state.
    pub fn widget_dyn(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.widgets.get(id).map(|w| w.as_ref())
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// One render pass: windows, then widgets, then a single flush.
    ///
    /// Drawing errors are contained. A failed flush is logged; the next pass
    /// tries again.
    pub fn update(&mut self) {
        for entry in &self.windows {
            entry.window.draw(&mut self.surface);
        }
        for id in &self.order {
            self.widgets[*id].update(&mut self.surface);
        }
        let cursor = self.focused_widget().and_then(|w| w.cursor());
        self.surface.set_cursor(cursor);

        if let Err(err) = self.surface.flush() {
            log::warn!("screen flush failed: {err}");
        }
    }

    /// Stretch windows to the current screen size according to their fill.
    ///
    /// Widgets keep their size; the application resizes them if it wants.
    pub fn resize_all(&mut self) {
        let screen = self.surface.size();
        for entry in &mut self.windows {
            let mut region = entry.window.region;
            if entry.fill.contains(Fill::HORIZONTAL) {
                region.width = (screen.width - region.x).max(0);
            }
            if entry.fill.contains(Fill::VERTICAL) {
                region.height = (screen.height - region.y).max(0);
            }
            entry.window.region = region;
        }
    }

    /// Ring the bell on the next flush.
    pub fn bell(&mut self) {
        self.surface.bell();
    }

    // -----------------------------------------------------------------------
    // Focus
    // -----------------------------------------------------------------------

    /// Index of the focused widget in the ring.
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The focused widget, if any are registered.
    pub fn focused(&self) -> Option<WidgetId> {
        self.order.get(self.current).copied()
    }

    fn focused_widget(&self) -> Option<&dyn Widget> {
        self.focused().map(|id| self.widgets[id].as_ref())
    }

    /// Move focus to `index`, or to the next widget in the ring when `None`.
    ///
    /// The index is validated before anything is unfocused, so an error
    /// leaves the current focus in place. With no widgets this is a no-op.
    pub fn focus_next(&mut self, index: Option<usize>) -> Result<FocusOutcome, FocusError> {
        let count = self.order.len();
        if count == 0 {
            return Ok(FocusOutcome::Focused);
        }
        let target = match index {
            None => (self.current + 1) % count,
            Some(index) if index < count => index,
            Some(index) => return Err(FocusError::OutOfBounds { index, count }),
        };
        Ok(self.move_focus(target))
    }

    /// Move focus one widget back in the ring.
    pub fn focus_previous(&mut self) -> FocusOutcome {
        let count = self.order.len();
        if count == 0 {
            return FocusOutcome::Focused;
        }
        self.move_focus((self.current + count - 1) % count)
    }

    /// Move focus to a specific widget.
    pub fn focus_to(&mut self, id: WidgetId) -> Result<FocusOutcome, FocusError> {
        let index = self
            .order
            .iter()
            .position(|&candidate| candidate == id)
            .ok_or(FocusError::NotRegistered)?;
        self.focus_next(Some(index))
    }

    fn move_focus(&mut self, target: usize) -> FocusOutcome {
        let old = self.order[self.current];
        self.widgets[old].unfocus();

        self.current = target;
        let new = self.order[target];
        let widget = &mut self.widgets[new];
        let outcome = widget.focus();
        log::debug!("focus -> {} #{target} ({outcome:?})", widget.widget_type());
        outcome
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Route one input event, then render.
    pub fn handle_event(&mut self, event: InputEvent) -> Dispatch {
        let dispatch = self.route(event);
        self.update();
        dispatch
    }

    /// Route one input event without rendering. The caller owns the render
    /// pass and must call [`Screen::update`] once it has acted on the result.
    ///
    /// Order: resize is handled by the screen; a capturing widget gets every
    /// key; otherwise Tab/BackTab move focus; everything else goes to the
    /// focused widget. When a capture finishes, focus advances to the next
    /// widget. A lone widget keeps the focus, idle.
    pub fn route(&mut self, event: InputEvent) -> Dispatch {
        let key = match event {
            InputEvent::Resize { width, height } => {
                let size = Size::new(width as i32, height as i32);
                self.surface.resize(size);
                self.resize_all();
                return Dispatch::Resized(size);
            }
            InputEvent::Paste(text) => {
                let accepted = match self.focused() {
                    Some(id) => self.widgets[id].handle_paste(&text),
                    None => false,
                };
                return if accepted { Dispatch::Consumed } else { Dispatch::Ignored };
            }
            InputEvent::Key(key) => key,
        };

        let Some(id) = self.focused() else {
            return Dispatch::Unhandled(key);
        };

        if !self.widgets[id].is_capturing() {
            match key.code {
                Key::Tab if key.modifiers.is_empty() => {
                    let _ = self.focus_next(None);
                    return self.focus_moved();
                }
                Key::BackTab => {
                    self.focus_previous();
                    return self.focus_moved();
                }
                _ => {}
            }
        }

        match self.widgets[id].handle_event(&key) {
            Handled::Ignored => Dispatch::Unhandled(key),
            Handled::Consumed => Dispatch::Consumed,
            Handled::Finished(completion) => {
                if self.order.len() > 1 {
                    let _ = self.focus_next(None);
                }
                Dispatch::Completed { widget: id, completion }
            }
        }
    }

    fn focus_moved(&self) -> Dispatch {
        match self.focused() {
            Some(id) => Dispatch::FocusMoved(id),
            None => Dispatch::Ignored,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
