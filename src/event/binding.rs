//! Key binding registry and resolution.
//!
//! [`KeyBindingRegistry`] maps key+modifier combinations to the dashboard's
//! top-level commands. Only keys the focused widget did not consume ever
//! reach it.

use std::collections::HashMap;

use super::input::{Key, KeyEvent, Modifiers};

// ---------------------------------------------------------------------------
// BindingAction
// ---------------------------------------------------------------------------

/// Top-level command triggered by a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingAction {
    /// Save the reading position and exit.
    Quit,
    /// Jump to the search entry.
    Find,
    /// Advance to the next chapter (crossing into the next book if needed).
    NextChapter,
    /// Go back one chapter.
    PreviousChapter,
    /// Show a random verse.
    RandomVerse,
}

// ---------------------------------------------------------------------------
// KeyBindingRegistry
// ---------------------------------------------------------------------------

/// Registry of key bindings, mapping (Key, Modifiers) -> BindingAction.
#[derive(Debug)]
pub struct KeyBindingRegistry {
    bindings: HashMap<(Key, Modifiers), BindingAction>,
}

impl KeyBindingRegistry {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// The dashboard's standard bindings.
    ///
    /// - `q`, `Ctrl+C` -> Quit
    /// - `f`, `/` -> Find
    /// - `n`, `Right` -> NextChapter
    /// - `p`, `Left` -> PreviousChapter
    /// - `r` -> RandomVerse
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.bind(Key::Char('q'), Modifiers::NONE, BindingAction::Quit);
        registry.bind(Key::Char('c'), Modifiers::CTRL, BindingAction::Quit);
        registry.bind(Key::Char('f'), Modifiers::NONE, BindingAction::Find);
        registry.bind(Key::Char('/'), Modifiers::NONE, BindingAction::Find);
        registry.bind(Key::Char('n'), Modifiers::NONE, BindingAction::NextChapter);
        registry.bind(Key::Right, Modifiers::NONE, BindingAction::NextChapter);
        registry.bind(Key::Char('p'), Modifiers::NONE, BindingAction::PreviousChapter);
        registry.bind(Key::Left, Modifiers::NONE, BindingAction::PreviousChapter);
        registry.bind(Key::Char('r'), Modifiers::NONE, BindingAction::RandomVerse);
        registry
    }

    /// Register a binding, replacing any existing one for the same chord.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: BindingAction) {
        self.bindings.insert((key, modifiers), action);
    }

    /// Remove a binding, returning the action it had.
    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<BindingAction> {
        self.bindings.remove(&(key, modifiers))
    }

    /// Exact key + modifiers lookup.
    ///
    /// Shift is ignored for character keys since terminals already fold it
    /// into the character itself.
    pub fn resolve(&self, event: &KeyEvent) -> Option<BindingAction> {
        let modifiers = match event.code {
            Key::Char(_) => Modifiers(event.modifiers.0 & !Modifiers::SHIFT.0),
            _ => event.modifiers,
        };
        self.bindings.get(&(event.code, modifiers)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyBindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_registry_is_empty() {
        let reg = KeyBindingRegistry::new();
        assert!(reg.is_empty());
        assert_eq!(reg.len(), 0);
    }

    #[test]
    fn defaults_cover_every_command() {
        let reg = KeyBindingRegistry::with_defaults();
        assert_eq!(reg.len(), 9);
        let resolve = |key: KeyEvent| reg.resolve(&key);
        assert_eq!(resolve(KeyEvent::plain(Key::Char('q'))), Some(BindingAction::Quit));
        assert_eq!(resolve(KeyEvent::ctrl('c')), Some(BindingAction::Quit));
        assert_eq!(resolve(KeyEvent::plain(Key::Char('/'))), Some(BindingAction::Find));
        assert_eq!(resolve(KeyEvent::plain(Key::Right)), Some(BindingAction::NextChapter));
        assert_eq!(resolve(KeyEvent::plain(Key::Left)), Some(BindingAction::PreviousChapter));
        assert_eq!(resolve(KeyEvent::plain(Key::Char('r'))), Some(BindingAction::RandomVerse));
    }

    #[test]
    fn resolve_unbound_key() {
        let reg = KeyBindingRegistry::with_defaults();
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Char('z'))), None);
    }

    #[test]
    fn resolve_requires_exact_non_shift_modifiers() {
        let reg = KeyBindingRegistry::with_defaults();
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Char('c'))), None);
        assert_eq!(
            reg.resolve(&KeyEvent::new(Key::Char('q'), Modifiers::ALT)),
            None
        );
    }

    #[test]
    fn resolve_ignores_shift_on_characters() {
        let reg = KeyBindingRegistry::with_defaults();
        assert_eq!(
            reg.resolve(&KeyEvent::new(Key::Char('/'), Modifiers::SHIFT)),
            Some(BindingAction::Find)
        );
    }

    #[test]
    fn bind_replaces_existing() {
        let mut reg = KeyBindingRegistry::with_defaults();
        reg.bind(Key::Char('q'), Modifiers::NONE, BindingAction::Find);
        assert_eq!(
            reg.resolve(&KeyEvent::plain(Key::Char('q'))),
            Some(BindingAction::Find)
        );
        assert_eq!(reg.len(), 9);
    }

    #[test]
    fn unbind_removes() {
        let mut reg = KeyBindingRegistry::with_defaults();
        assert_eq!(
            reg.unbind(Key::Char('r'), Modifiers::NONE),
            Some(BindingAction::RandomVerse)
        );
        assert_eq!(reg.resolve(&KeyEvent::plain(Key::Char('r'))), None);
        assert_eq!(reg.unbind(Key::Char('r'), Modifiers::NONE), None);
    }
}
