//! Headless testing helpers: a recording surface, a probe widget, snapshots.
//!
//! [`RecordingSurface`] stands in for the terminal so widgets and whole
//! screens can be driven without a tty. [`surface_to_string`] turns the staged
//! frame into plain text for assertions and insta snapshots.

pub mod probe;
pub mod recording;
pub mod snapshot;

pub use probe::ProbeWidget;
pub use recording::RecordingSurface;
pub use snapshot::{frame_to_string, surface_to_string};
