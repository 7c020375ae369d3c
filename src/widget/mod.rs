//! Widget system: the capability trait and the scrollable viewport renderer.

pub mod traits;
pub mod viewport;

pub use traits::{Completion, FocusOutcome, Handled, Widget};
pub use viewport::{wrap_lines, Viewport};
