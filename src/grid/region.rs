// Region geometry in grid coordinates: tile positions, rectangles, and fill state.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Global monotonically increasing content item counter.
static NEXT_ITEM_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of a content item hosted by a region.
///
/// The grid never owns the content itself; hosts map an `ItemId` to whatever
/// widget or payload they render inside the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Generate a new unique ItemId.
    pub fn next() -> Self {
        Self(NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single cell position in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TilePos {
    pub row: usize,
    pub column: usize,
}

impl TilePos {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Whether a region hosts a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillState {
    /// An empty 1×1 placeholder.
    Empty,
    /// The region hosts a content item.
    Filled,
}

/// A rectangle of grid cells. Spans are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub from_row: usize,
    pub from_column: usize,
    pub row_span: usize,
    pub column_span: usize,
}

impl Region {
    /// Create a region. Spans below 1 are raised to 1.
    pub fn new(from_row: usize, from_column: usize, row_span: usize, column_span: usize) -> Self {
        Self {
            from_row,
            from_column,
            row_span: row_span.max(1),
            column_span: column_span.max(1),
        }
    }

    /// A 1×1 region at the given cell.
    pub fn unit(pos: TilePos) -> Self {
        Self::new(pos.row, pos.column, 1, 1)
    }

    /// Build a region from signed coordinates, as produced by pointer math.
    /// Returns None for a negative origin or a span below 1.
    pub fn from_signed(from_row: i64, from_column: i64, row_span: i64, column_span: i64) -> Option<Self> {
        if from_row < 0 || from_column < 0 || row_span < 1 || column_span < 1 {
            return None;
        }
        Some(Self {
            from_row: from_row as usize,
            from_column: from_column as usize,
            row_span: row_span as usize,
            column_span: column_span as usize,
        })
    }

    /// The origin cell.
    pub fn origin(&self) -> TilePos {
        TilePos::new(self.from_row, self.from_column)
    }

    /// One past the last covered row.
    pub fn end_row(&self) -> usize {
        self.from_row + self.row_span
    }

    /// One past the last covered column.
    pub fn end_column(&self) -> usize {
        self.from_column + self.column_span
    }

    /// Number of cells covered.
    pub fn area(&self) -> usize {
        self.row_span * self.column_span
    }

    /// Whether this region covers more than one cell.
    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.column_span > 1
    }

    /// Check if a cell lies inside this region.
    pub fn contains(&self, pos: TilePos) -> bool {
        pos.row >= self.from_row
            && pos.row < self.end_row()
            && pos.column >= self.from_column
            && pos.column < self.end_column()
    }
    /// Whether the region is a real rectangle inside a `rows × columns` grid.
    pub fn fits_within(&self, rows: usize, columns: usize) -> bool {
        self.row_span >= 1 && self.column_span >= 1 && self.end_row() <= rows && self.end_column() <= columns
    }

    /// All covered cells in row-major order, origin first.
    pub fn cells(&self) -> impl Iterator<Item = TilePos> + '_ {
        (self.from_row..self.end_row())
            .flat_map(move |row| (self.from_column..self.end_column()).map(move |column| TilePos::new(row, column)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.from_row, self.from_column, self.row_span, self.column_span
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_ids_are_unique() {
        let a = ItemId::next();
        let b = ItemId::next();
        assert_ne!(a, b);
        assert!(b.0 > a.0);
    }

    #[test]
    fn new_clamps_zero_spans() {
        let r = Region::new(2, 3, 0, 0);
        assert_eq!(r.row_span, 1);
        assert_eq!(r.column_span, 1);
    }

    #[test]
    fn from_signed_rejects_negative_origin() {
        assert_eq!(Region::from_signed(-1, 0, 1, 1), None);
        assert_eq!(Region::from_signed(0, -2, 1, 1), None);
    }

    #[test]
    fn from_signed_rejects_empty_span() {
        assert_eq!(Region::from_signed(0, 0, 0, 1), None);
        assert_eq!(Region::from_signed(0, 0, 1, -3), None);
    }

    #[test]
    fn from_signed_accepts_valid_rectangle() {
        assert_eq!(Region::from_signed(1, 2, 3, 4), Some(Region::new(1, 2, 3, 4)));
    }

    #[test]
    fn cells_are_row_major_with_origin_first() {
        let r = Region::new(1, 1, 2, 2);
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(
            cells,
            vec![
                TilePos::new(1, 1),
                TilePos::new(1, 2),
                TilePos::new(2, 1),
                TilePos::new(2, 2),
            ]
        );
        assert_eq!(cells.len(), r.area());
    }

    #[test]
    fn contains_is_exclusive_on_far_edges() {
        let r = Region::new(0, 0, 2, 3);
        assert!(r.contains(TilePos::new(1, 2)));
        assert!(!r.contains(TilePos::new(2, 0)));
        assert!(!r.contains(TilePos::new(0, 3)));
    }

    #[test]
    fn fits_within_checks_far_edges() {
        let r = Region::new(2, 2, 2, 2);
        assert!(r.fits_within(4, 4));
        assert!(!r.fits_within(3, 4));
        assert!(!r.fits_within(4, 3));
    }

    #[test]
    fn fits_within_rejects_zero_spans() {
        let flat = Region {
            from_row: 1,
            from_column: 1,
            row_span: 0,
            column_span: 1,
        };
        let thin = Region {
            column_span: 0,
            row_span: 1,
            ..flat
        };
        assert!(!flat.fits_within(4, 4));
        assert!(!thin.fits_within(4, 4));
    }

    #[test]
    fn display_shows_origin_and_span() {
        assert_eq!(Region::new(1, 2, 3, 4).to_string(), "(1, 2) 3x4");
    }
}
