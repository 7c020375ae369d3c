//! Built-in widgets: Entry and ScrollableFrame.

pub mod entry;
pub mod frame;

pub use entry::Entry;
pub use frame::ScrollableFrame;
