//! Staging screen buffer and frame diffing.
//!
//! The `Compositor` holds a full 2D grid of `StyledCell`s for one frame.
//! Surfaces stage every write into it during a render pass; at flush time the
//! staged frame is compared with the last flushed one and only the changed
//! cells are sent to the terminal.

use super::strip::{char_width, Strip, StyledCell};
use crate::geometry::Region;

// ---------------------------------------------------------------------------
// CellUpdate
// ---------------------------------------------------------------------------

/// A single cell that changed between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellUpdate {
    pub x: u16,
    pub y: u16,
    pub cell: StyledCell,
}

// ---------------------------------------------------------------------------
// Compositor
// ---------------------------------------------------------------------------

/// A frame of terminal cells. `screen[y][x]` is column x of row y.
#[derive(Debug, Clone)]
pub struct Compositor {
    screen: Vec<Vec<StyledCell>>,
    pub width: u16,
    pub height: u16,
}

impl Compositor {
    /// A blank frame of the given dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            screen: Self::blank_screen(width, height),
            width,
            height,
        }
    }

    /// Resize the frame. All cells are reset to blank.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.screen = Self::blank_screen(width, height);
    }

    /// The whole frame as a region.
    pub fn bounds(&self) -> Region {
        Region::new(0, 0, self.width as i32, self.height as i32)
    }

    /// Stage a strip into the frame.
    ///
    /// Cells outside the frame are dropped. Returns `false` if any cell had
    /// to be dropped, so callers can report the write as out of bounds.
    pub fn place_strip(&mut self, strip: &Strip) -> bool {
        let bounds = self.bounds();
        let mut complete = true;

        let mut placed: Option<(i32, i32)> = None;
        for (i, cell) in strip.cells.iter().enumerate() {
            let x = strip.x_offset + i as i32;
            if !bounds.contains(x, strip.y) {
                complete = false;
                continue;
            }
            self.screen[strip.y as usize][x as usize] = *cell;
            placed = Some(placed.map_or((x, x), |(first, _)| (first, x)));
        }

        if let Some((first, last)) = placed {
            self.split_wide_chars(strip.y, first, last);
        }
        complete
    }

    /// Blank the halves of wide characters cut by a write over
    /// `first..=last` on row `y`.
    fn split_wide_chars(&mut self, y: i32, first: i32, last: i32) {
        let row = &mut self.screen[y as usize];
        let (first, last) = (first as usize, last as usize);
        let is_head = |cell: &StyledCell| !cell.is_wide_tail() && char_width(cell.ch) > 1;

        // A tail whose head was clipped off the left edge.
        if row[first].is_wide_tail() {
            row[first] = StyledCell::blank();
        }
        // A head left of the write that lost its tail.
        if first > 0 && is_head(&row[first - 1]) {
            row[first - 1] = StyledCell::blank();
        }
        // A tail right of the write that lost its head.
        if row.get(last + 1).is_some_and(|cell| cell.is_wide_tail()) && !is_head(&row[last]) {
            row[last + 1] = StyledCell::blank();
        }
        // A head at the right edge with no room for its tail.
        if last + 1 == row.len() && is_head(&row[last]) {
            row[last] = StyledCell::blank();
        }
    }

    /// Blank every cell of `region` that lies on screen.
    pub fn clear(&mut self, region: Region) {
        let clip = region.intersection(self.bounds());
        for y in clip.y..clip.bottom() {
            for x in clip.x..clip.right() {
                self.screen[y as usize][x as usize] = StyledCell::blank();
            }
        }
    }

    /// Cell at (x, y), or `None` off screen.
    pub fn get_cell(&self, x: u16, y: u16) -> Option<&StyledCell> {
        self.screen
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
    }

    /// The characters of row `y` with trailing spaces trimmed.
    pub fn row_text(&self, y: u16) -> String {
        match self.screen.get(y as usize) {
            Some(row) => {
                let s: String = row
                    .iter()
                    .filter(|c| !c.is_wide_tail())
                    .map(|c| c.ch)
                    .collect();
                s.trim_end().to_owned()
            }
            None => String::new(),
        }
    }

    /// Cells of this frame that differ from `previous`.
    ///
    /// When the frames have different dimensions every cell of this frame is
    /// reported, since the terminal has been cleared by the resize.
    pub fn diff(&self, previous: &Compositor) -> Vec<CellUpdate> {
        let same_size = self.width == previous.width && self.height == previous.height;
        let mut updates = Vec::new();

        for (y, row) in self.screen.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if same_size && previous.screen[y][x] == *cell {
                    continue;
                }
                updates.push(CellUpdate {
                    x: x as u16,
                    y: y as u16,
                    cell: *cell,
                });
            }
        }

        updates
    }

    fn blank_screen(width: u16, height: u16) -> Vec<Vec<StyledCell>> {
        vec![vec![StyledCell::blank(); width as usize]; height as usize]
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::strip::CellStyle;

    #[test]
    fn new_compositor_is_blank() {
        let c = Compositor::new(10, 5);
        assert_eq!(c.width, 10);
        assert_eq!(c.height, 5);
        for y in 0..5u16 {
            assert_eq!(c.row_text(y), "");
        }
    }

    #[test]
    fn get_cell_out_of_bounds() {
        let c = Compositor::new(10, 5);
        assert!(c.get_cell(10, 0).is_none());
        assert!(c.get_cell(0, 5).is_none());
    }

    #[test]
    fn place_strip_inside() {
        let mut c = Compositor::new(10, 3);
        let placed = c.place_strip(&Strip::from_text(1, 2, "abc", CellStyle::PLAIN));
        assert!(placed);
        assert_eq!(c.row_text(1), "  abc");
    }

    #[test]
    fn place_strip_clips_right_edge() {
        let mut c = Compositor::new(5, 1);
        let placed = c.place_strip(&Strip::from_text(0, 3, "abcdef", CellStyle::PLAIN));
        assert!(!placed);
        assert_eq!(c.row_text(0), "   ab");
    }

    #[test]
    fn place_strip_off_screen_rows() {
        let mut c = Compositor::new(5, 2);
        assert!(!c.place_strip(&Strip::from_text(-1, 0, "x", CellStyle::PLAIN)));
        assert!(!c.place_strip(&Strip::from_text(2, 0, "x", CellStyle::PLAIN)));
        assert_eq!(c.row_text(0), "");
        assert_eq!(c.row_text(1), "");
    }

    #[test]
    fn wide_chars_fill_two_cells() {
        let mut c = Compositor::new(6, 1);
        assert!(c.place_strip(&Strip::from_text(0, 0, "神a", CellStyle::PLAIN)));
        assert_eq!(c.row_text(0), "神a");
        assert!(c.get_cell(1, 0).unwrap().is_wide_tail());
    }

    #[test]
    fn overwriting_half_a_wide_char_blanks_the_other_half() {
        let mut c = Compositor::new(6, 1);
        c.place_strip(&Strip::from_text(0, 0, "神神", CellStyle::PLAIN));
        c.place_strip(&Strip::from_text(0, 1, "x", CellStyle::PLAIN));
        assert_eq!(c.row_text(0), " x神");
        c.place_strip(&Strip::from_text(0, 2, "y", CellStyle::PLAIN));
        assert_eq!(c.row_text(0), " xy");
    }

    #[test]
    fn wide_char_cut_at_right_edge_is_dropped() {
        let mut c = Compositor::new(3, 1);
        assert!(!c.place_strip(&Strip::from_text(0, 1, "神神", CellStyle::PLAIN)));
        assert_eq!(c.row_text(0), " 神");
        let mut c = Compositor::new(2, 1);
        assert!(!c.place_strip(&Strip::from_text(0, 1, "神", CellStyle::PLAIN)));
        assert_eq!(c.row_text(0), "");
    }

    #[test]
    fn clear_region_is_clipped() {
        let mut c = Compositor::new(4, 2);
        c.place_strip(&Strip::from_text(0, 0, "abcd", CellStyle::PLAIN));
        c.place_strip(&Strip::from_text(1, 0, "efgh", CellStyle::PLAIN));
        c.clear(Region::new(2, -3, 10, 4));
        assert_eq!(c.row_text(0), "ab");
        assert_eq!(c.row_text(1), "efgh");
    }

    #[test]
    fn diff_identical_frames_is_empty() {
        let a = Compositor::new(4, 2);
        let b = Compositor::new(4, 2);
        assert!(a.diff(&b).is_empty());
    }

    #[test]
    fn diff_reports_changed_cells_only() {
        let previous = Compositor::new(4, 2);
        let mut current = previous.clone();
        current.place_strip(&Strip::from_text(1, 1, "xy", CellStyle::BOLD));

        let updates = current.diff(&previous);
        assert_eq!(updates.len(), 2);
        assert_eq!((updates[0].x, updates[0].y, updates[0].cell.ch), (1, 1, 'x'));
        assert_eq!((updates[1].x, updates[1].y, updates[1].cell.ch), (2, 1, 'y'));
        assert!(updates[0].cell.style.bold);
    }

    #[test]
    fn diff_after_resize_reports_everything() {
        let previous = Compositor::new(2, 2);
        let current = Compositor::new(3, 2);
        assert_eq!(current.diff(&previous).len(), 6);
    }

    #[test]
    fn resize_blanks_frame() {
        let mut c = Compositor::new(4, 1);
        c.place_strip(&Strip::from_text(0, 0, "abcd", CellStyle::PLAIN));
        c.resize(6, 2);
        assert_eq!((c.width, c.height), (6, 2));
        assert_eq!(c.row_text(0), "");
    }
}
