//! Snapshot rendering helpers.
//!
//! Convert a staged frame into plain text: one line per row, trailing spaces
//! trimmed, rows joined with `'\n'` and no final newline. Styles are dropped.

use crate::render::compositor::Compositor;
use crate::render::surface::Surface;

/// Plain text of a compositor frame.
pub fn frame_to_string(frame: &Compositor) -> String {
    (0..frame.height)
        .map(|y| frame.row_text(y))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain text of everything currently staged on `surface`.
///
/// ```ignore
/// let mut surface = RecordingSurface::new(20, 3);
/// entry.update(&mut surface);
/// insta::assert_snapshot!(surface_to_string(&surface));
/// ```
pub fn surface_to_string<S: Surface + ?Sized>(surface: &S) -> String {
    frame_to_string(surface.staging())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::strip::CellStyle;
    use crate::testing::RecordingSurface;

    #[test]
    fn empty_frame() {
        assert_eq!(frame_to_string(&Compositor::new(0, 0)), "");
        assert_eq!(frame_to_string(&Compositor::new(3, 2)), "\n");
    }

    #[test]
    fn rows_are_trimmed_and_joined() {
        let mut surface = RecordingSurface::new(6, 3);
        surface.put_str(1, 0, "ab", CellStyle::PLAIN).unwrap();
        surface.put_str(0, 2, "cd", CellStyle::BOLD).unwrap();
        assert_eq!(surface_to_string(&surface), " ab\n\ncd");
    }

    #[test]
    fn works_through_trait_object() {
        let mut surface = RecordingSurface::new(3, 1);
        surface.put_str(0, 0, "x", CellStyle::PLAIN).unwrap();
        let dynamic: &dyn Surface = &surface;
        assert_eq!(surface_to_string(dynamic), "x");
    }
}
