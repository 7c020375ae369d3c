//! Event system: input events, event sources, key bindings.

pub mod binding;
pub mod input;

pub use binding::{BindingAction, KeyBindingRegistry};
pub use input::{
    from_crossterm, EventSource, InputEvent, Key, KeyEvent, Modifiers, ScriptedEvents,
    TerminalEvents,
};
