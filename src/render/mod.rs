//! Rendering pipeline: strips, staging compositor, surfaces, terminal driver.

pub mod compositor;
pub mod driver;
pub mod strip;
pub mod surface;

pub use compositor::{CellUpdate, Compositor};
pub use driver::Driver;
pub use strip::{CellStyle, Strip, StyledCell};
pub use surface::{RenderError, Surface, TerminalSurface};
