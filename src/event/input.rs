//! Input event types wrapping crossterm for decoupling.
//!
//! Defines [`InputEvent`], [`KeyEvent`], [`Key`] and [`Modifiers`]. Crossterm
//! events are converted at the edge by [`from_crossterm`] so widgets and the
//! screen never see crossterm types, and tests can feed synthetic keys.

use std::collections::VecDeque;
use std::io;
use std::ops::{BitAnd, BitOr};
use std::time::Duration;

use crossterm::event as ct;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key with no modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }

    /// `Ctrl` + a character key.
    pub fn ctrl(ch: char) -> Self {
        Self::new(Key::Char(ch), Modifiers::CTRL)
    }

    pub fn is_ctrl(&self, ch: char) -> bool {
        self.code == Key::Char(ch) && self.modifiers.contains(Modifiers::CTRL)
    }

    /// The character this key would insert into a text field, if any.
    ///
    /// Shift is allowed (it is how upper-case arrives); Ctrl and Alt chords
    /// are commands, not text.
    pub fn text_char(&self) -> Option<char> {
        match self.code {
            Key::Char(ch)
                if !ch.is_control()
                    && !self.modifiers.contains(Modifiers::CTRL)
                    && !self.modifiers.contains(Modifiers::ALT) =>
            {
                Some(ch)
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    Paste(String),
}

// ---------------------------------------------------------------------------
// Crossterm conversion
// ---------------------------------------------------------------------------

fn convert_modifiers(m: ct::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(ct::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(ct::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(ct::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

fn convert_key(code: ct::KeyCode) -> Option<Key> {
    let key = match code {
        ct::KeyCode::Char(c) => Key::Char(c),
        ct::KeyCode::Enter => Key::Enter,
        ct::KeyCode::Esc => Key::Escape,
        ct::KeyCode::Tab => Key::Tab,
        ct::KeyCode::BackTab => Key::BackTab,
        ct::KeyCode::Backspace => Key::Backspace,
        ct::KeyCode::Delete => Key::Delete,
        ct::KeyCode::Left => Key::Left,
        ct::KeyCode::Right => Key::Right,
        ct::KeyCode::Up => Key::Up,
        ct::KeyCode::Down => Key::Down,
        ct::KeyCode::Home => Key::Home,
        ct::KeyCode::End => Key::End,
        ct::KeyCode::PageUp => Key::PageUp,
        ct::KeyCode::PageDown => Key::PageDown,
        ct::KeyCode::F(n) => Key::F(n),
        _ => return None,
    };
    Some(key)
}

/// Convert a crossterm event.
///
/// Returns `None` for events the dashboard does not act on: mouse input,
/// focus changes, key releases and keys without a [`Key`] equivalent.
pub fn from_crossterm(event: ct::Event) -> Option<InputEvent> {
    match event {
        ct::Event::Key(ke) if ke.kind != ct::KeyEventKind::Release => {
            let code = convert_key(ke.code)?;
            Some(InputEvent::Key(KeyEvent::new(code, convert_modifiers(ke.modifiers))))
        }
        ct::Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
        ct::Event::Paste(text) => Some(InputEvent::Paste(text)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// EventSource
// ---------------------------------------------------------------------------

/// Where the application's outer loop gets its events from.
///
/// `poll` never blocks longer than `timeout`; `Ok(None)` means "idle".
pub trait EventSource {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>>;
}

/// Events from the real terminal.
#[derive(Debug, Default)]
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        if !ct::poll(timeout)? {
            return Ok(None);
        }
        Ok(from_crossterm(ct::read()?))
    }
}

/// A fixed script of events, replayed in order. Idle once exhausted.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    queue: VecDeque<InputEvent>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            queue: events.into_iter().collect(),
        }
    }

    /// Script typing `text` one character at a time.
    pub fn push_text(&mut self, text: &str) {
        self.queue.extend(
            text.chars()
                .map(|ch| InputEvent::Key(KeyEvent::plain(Key::Char(ch)))),
        );
    }

    pub fn push_key(&mut self, key: KeyEvent) {
        self.queue.push_back(InputEvent::Key(key));
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self, _timeout: Duration) -> io::Result<Option<InputEvent>> {
        Ok(self.queue.pop_front())
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn modifiers_none_is_empty() {
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
    }

    // ── KeyEvent ─────────────────────────────────────────────────────

    #[test]
    fn text_char_accepts_printable() {
        assert_eq!(KeyEvent::plain(Key::Char('a')).text_char(), Some('a'));
        assert_eq!(
            KeyEvent::new(Key::Char('A'), Modifiers::SHIFT).text_char(),
            Some('A')
        );
    }

    #[test]
    fn text_char_rejects_chords_and_specials() {
        assert_eq!(KeyEvent::ctrl('a').text_char(), None);
        assert_eq!(KeyEvent::new(Key::Char('x'), Modifiers::ALT).text_char(), None);
        assert_eq!(KeyEvent::plain(Key::Enter).text_char(), None);
        assert_eq!(KeyEvent::plain(Key::Char('\u{7}')).text_char(), None);
    }

    #[test]
    fn is_ctrl_matches_chord_only() {
        assert!(KeyEvent::ctrl('g').is_ctrl('g'));
        assert!(!KeyEvent::plain(Key::Char('g')).is_ctrl('g'));
    }

    // ── from_crossterm ───────────────────────────────────────────────

    #[test]
    fn from_crossterm_key_char() {
        let event = ct::Event::Key(ct::KeyEvent::new(
            ct::KeyCode::Char('x'),
            ct::KeyModifiers::CONTROL,
        ));
        assert_eq!(from_crossterm(event), Some(InputEvent::Key(KeyEvent::ctrl('x'))));
    }

    #[test]
    fn from_crossterm_special_keys() {
        let cases = [
            (ct::KeyCode::Enter, Key::Enter),
            (ct::KeyCode::Esc, Key::Escape),
            (ct::KeyCode::Tab, Key::Tab),
            (ct::KeyCode::PageDown, Key::PageDown),
        ];
        for (code, expected) in cases {
            let event = ct::Event::Key(ct::KeyEvent::new(code, ct::KeyModifiers::NONE));
            assert_eq!(
                from_crossterm(event),
                Some(InputEvent::Key(KeyEvent::plain(expected)))
            );
        }
    }

    #[test]
    fn from_crossterm_ignores_release() {
        let mut ke = ct::KeyEvent::new(ct::KeyCode::Char('a'), ct::KeyModifiers::NONE);
        ke.kind = ct::KeyEventKind::Release;
        assert_eq!(from_crossterm(ct::Event::Key(ke)), None);
    }

    #[test]
    fn from_crossterm_unknown_key_is_dropped() {
        let event = ct::Event::Key(ct::KeyEvent::new(
            ct::KeyCode::CapsLock,
            ct::KeyModifiers::NONE,
        ));
        assert_eq!(from_crossterm(event), None);
    }

    #[test]
    fn from_crossterm_resize() {
        assert_eq!(
            from_crossterm(ct::Event::Resize(100, 30)),
            Some(InputEvent::Resize { width: 100, height: 30 })
        );
    }

    #[test]
    fn from_crossterm_focus_is_dropped() {
        assert_eq!(from_crossterm(ct::Event::FocusGained), None);
    }

    // ── ScriptedEvents ───────────────────────────────────────────────

    #[test]
    fn scripted_events_replay_in_order() {
        let mut events = ScriptedEvents::default();
        events.push_text("ab");
        events.push_key(KeyEvent::plain(Key::Enter));

        let mut seen = Vec::new();
        while let Some(event) = events.poll(Duration::ZERO).unwrap() {
            seen.push(event);
        }
        assert_eq!(
            seen,
            vec![
                InputEvent::Key(KeyEvent::plain(Key::Char('a'))),
                InputEvent::Key(KeyEvent::plain(Key::Char('b'))),
                InputEvent::Key(KeyEvent::plain(Key::Enter)),
            ]
        );
        assert!(events.is_empty());
    }
}
