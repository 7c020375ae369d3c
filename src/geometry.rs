//! Cell-coordinate primitives: Offset, Size, Region.
//!
//! Everything on screen is addressed in whole terminal cells. Coordinates are
//! signed so that scrolled content can sit above or left of its viewport
//! without wrapping around.

// ---------------------------------------------------------------------------
// Offset
// ---------------------------------------------------------------------------

/// A position (or displacement) in terminal cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A size in terminal cells (width x height).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// A rectangle of cells: top-left corner plus size.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const EMPTY: Region = Region { x: 0, y: 0, width: 0, height: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// The right edge (exclusive).
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    /// The bottom edge (exclusive).
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Overlap of two regions, or [`Region::EMPTY`] if they do not touch.
    #[inline]
    pub const fn intersection(self, other: Region) -> Region {
        let x1 = if self.x > other.x { self.x } else { other.x };
        let y1 = if self.y > other.y { self.y } else { other.y };

        let sr = self.right();
        let or = other.right();
        let x2 = if sr < or { sr } else { or };

        let sb = self.bottom();
        let ob = other.bottom();
        let y2 = if sb < ob { sb } else { ob };

        let w = x2 - x1;
        let h = y2 - y1;

        if w <= 0 || h <= 0 {
            Region::EMPTY
        } else {
            Region { x: x1, y: y1, width: w, height: h }
        }
    }

    /// Shrink by `cells` on every side. Dimensions clamp at zero.
    #[inline]
    pub const fn inset(self, cells: i32) -> Region {
        let w = self.width - 2 * cells;
        let h = self.height - 2 * cells;
        Region {
            x: self.x + cells,
            y: self.y + cells,
            width: if w > 0 { w } else { 0 },
            height: if h > 0 { h } else { 0 },
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
