// Resize resolution: how many tiles an edge drag annexes or releases.

use crate::error::GridError;
use crate::events::{GridEvent, Highlight};
use crate::grid::{GridModel, ItemId, Region, TilePos};

/// The edge of a region being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    West,
    East,
    North,
    South,
}

impl Direction {
    /// Unit vector as (dx, dy), y growing downwards.
    pub fn vector(self) -> (i32, i32) {
        match self {
            Direction::West => (-1, 0),
            Direction::East => (1, 0),
            Direction::North => (0, -1),
            Direction::South => (0, 1),
        }
    }

    /// Inverse of [`vector`](Self::vector). Only the four unit vectors map.
    pub fn from_vector(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (-1, 0) => Some(Direction::West),
            (1, 0) => Some(Direction::East),
            (0, -1) => Some(Direction::North),
            (0, 1) => Some(Direction::South),
            _ => None,
        }
    }

    /// True for west/east.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::West | Direction::East)
    }

    /// -1 towards the grid origin (west/north), +1 away from it.
    pub fn sign(self) -> i32 {
        let (dx, dy) = self.vector();
        dx + dy
    }
}

/// Outcome of resolving a resize request against the current grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeResolution {
    /// Cells to merge into (growth) or split off (shrink) the region.
    pub tiles: Vec<TilePos>,
    pub growth: bool,
    /// The region's extent once the resize is applied.
    pub region: Region,
}

impl ResizeResolution {
    /// An empty resolution means the gesture has no effect.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Scan outward from `region`'s `direction` edge, one band at a time, for
/// up to `requested` bands. Stops at the grid boundary or at the first band
/// touching a filled tile. Returns the number of bands and their cells.
pub fn tiles_to_merge(
    grid: &GridModel,
    direction: Direction,
    region: &Region,
    requested: usize,
) -> (usize, Vec<TilePos>) {
    let room = match direction {
        Direction::West => region.from_column,
        Direction::North => region.from_row,
        Direction::East => grid.column_count().saturating_sub(region.end_column()),
        Direction::South => grid.row_count().saturating_sub(region.end_row()),
    };
    let mut tiles = Vec::new();
    let mut available = 0;
    for step in 0..requested.min(room) {
        let band = match direction {
            Direction::West => Region::new(region.from_row, region.from_column - step - 1, region.row_span, 1),
            Direction::East => Region::new(region.from_row, region.end_column() + step, region.row_span, 1),
            Direction::North => Region::new(region.from_row - step - 1, region.from_column, 1, region.column_span),
            Direction::South => Region::new(region.end_row() + step, region.from_column, 1, region.column_span),
        };
        if grid.check_area(&band).is_err() {
            break;
        }
        tiles.extend(band.cells());
        available += 1;
    }
    (available, tiles)
}

/// The largest shrink of at most `requested` bands from `region`'s
/// `direction` edge that still leaves one band. Returns the number of bands
/// and the cells they cover.
pub fn tiles_to_split(direction: Direction, region: &Region, requested: usize) -> (usize, Vec<TilePos>) {
    let span = if direction.is_horizontal() {
        region.column_span
    } else {
        region.row_span
    };
    let count = requested.min(span.saturating_sub(1));
    if count == 0 {
        return (0, Vec::new());
    }
    let band = match direction {
        Direction::West => Region::new(region.from_row, region.from_column, region.row_span, count),
        Direction::East => Region::new(region.from_row, region.end_column() - count, region.row_span, count),
        Direction::North => Region::new(region.from_row, region.from_column, count, region.column_span),
        Direction::South => Region::new(region.end_row() - count, region.from_column, count, region.column_span),
    };
    (count, band.cells().collect())
}

/// Resolve a resize of the region covering `anchor`.
///
/// `tile_count` is signed along the axis: a value with the same sign as the
/// direction grows the region, the opposite sign shrinks it. Zero resolves
/// to an empty result.
pub fn resolve(
    grid: &GridModel,
    direction: Direction,
    anchor: TilePos,
    tile_count: i32,
) -> Result<ResizeResolution, GridError> {
    let tile = grid
        .tile_at(anchor.row, anchor.column)
        .ok_or(GridError::OutOfBounds {
            region: Region::unit(anchor),
            rows: grid.row_count(),
            columns: grid.column_count(),
        })?;
    if !tile.is_filled() {
        return Err(GridError::EmptyAnchor(anchor));
    }
    let region = tile.region;
    let signed = i64::from(tile_count) * i64::from(direction.sign());
    let growth = signed > 0;
    let requested = usize::try_from(signed.unsigned_abs()).unwrap_or(usize::MAX);

    let (count, tiles) = if growth {
        tiles_to_merge(grid, direction, &region, requested)
    } else {
        tiles_to_split(direction, &region, requested)
    };
    Ok(ResizeResolution {
        tiles,
        growth,
        region: resized_region(&region, direction, count, growth),
    })
}

/// Extent of `region` after moving its `direction` edge by `count` bands.
fn resized_region(region: &Region, direction: Direction, count: usize, growth: bool) -> Region {
    let mut r = *region;
    match (direction, growth) {
        (Direction::West, true) => {
            r.from_column -= count;
            r.column_span += count;
        }
        (Direction::West, false) => {
            r.from_column += count;
            r.column_span -= count;
        }
        (Direction::East, true) => r.column_span += count,
        (Direction::East, false) => r.column_span -= count,
        (Direction::North, true) => {
            r.from_row -= count;
            r.row_span += count;
        }
        (Direction::North, false) => {
            r.from_row += count;
            r.row_span -= count;
        }
        (Direction::South, true) => r.row_span += count,
        (Direction::South, false) => r.row_span -= count,
    }
    r
}

impl GridModel {
    /// Preview a resize without committing it. Highlights the resulting
    /// region and reports it as a resize preview when non-empty.
    pub fn highlight(
        &mut self,
        direction: Direction,
        anchor: TilePos,
        tile_count: i32,
    ) -> Result<ResizeResolution, GridError> {
        if !self.resizing_enabled() {
            return Err(GridError::ResizingDisabled);
        }
        let resolution = resolve(self, direction, anchor, tile_count)?;
        self.highlight_all(Highlight::Resize);
        if !resolution.is_empty() {
            self.emit(GridEvent::ResizePreview {
                grid: self.id(),
                region: resolution.region,
            });
            self.highlight_region(resolution.region, Highlight::EmptyCheck);
        }
        Ok(resolution)
    }

    /// Resolve and commit a resize. An empty resolution commits nothing.
    pub fn resize(
        &mut self,
        direction: Direction,
        anchor: TilePos,
        tile_count: i32,
    ) -> Result<ResizeResolution, GridError> {
        if !self.resizing_enabled() {
            return Err(GridError::ResizingDisabled);
        }
        let resolution = resolve(self, direction, anchor, tile_count)?;
        if resolution.is_empty() {
            log::debug!("grid {}: resize {direction:?} by {tile_count} has no effect", self.id().short());
            return Ok(resolution);
        }

        let host = self
            .tile_id_at(anchor.row, anchor.column)
            .ok_or(GridError::EmptyAnchor(anchor))?;
        let item = self.item_at(anchor.row, anchor.column).ok_or(GridError::EmptyAnchor(anchor))?;
        if resolution.growth {
            self.merge_tiles(host, &resolution.tiles, resolution.region)?;
        } else {
            self.split_tiles(host, &resolution.tiles, resolution.region)?;
        }

        log::info!("grid {}: resized {item} to {}", self.id().short(), resolution.region);
        self.emit(GridEvent::RegionResized {
            grid: self.id(),
            item,
            region: resolution.region,
        });
        Ok(resolution)
    }

    /// Resize the region hosting `item`.
    pub fn resize_item(
        &mut self,
        item: ItemId,
        direction: Direction,
        tile_count: i32,
    ) -> Result<ResizeResolution, GridError> {
        let region = self.region_of(item).ok_or(GridError::UnknownItem(item))?;
        self.resize(direction, region.origin(), tile_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{ItemId, TileGeometry};
    use rstest::rstest;

    fn grid(rows: usize, columns: usize) -> GridModel {
        GridModel::new(rows, columns, TileGeometry::default())
    }

    // ── Direction ────────────────────────────────────────────────────

    #[rstest]
    #[case(Direction::West)]
    #[case(Direction::East)]
    #[case(Direction::North)]
    #[case(Direction::South)]
    fn direction_vector_round_trips(#[case] direction: Direction) {
        let (dx, dy) = direction.vector();
        assert_eq!(Direction::from_vector(dx, dy), Some(direction));
    }

    #[test]
    fn diagonal_vector_is_not_a_direction() {
        assert_eq!(Direction::from_vector(1, 1), None);
        assert_eq!(Direction::from_vector(0, 0), None);
    }

    // ── Growth ───────────────────────────────────────────────────────

    #[rstest]
    #[case(Direction::East, 1, Region::new(1, 1, 1, 2))]
    #[case(Direction::West, -1, Region::new(1, 0, 1, 2))]
    #[case(Direction::South, 1, Region::new(1, 1, 2, 1))]
    #[case(Direction::North, -1, Region::new(0, 1, 2, 1))]
    fn growth_by_one_in_each_direction(
        #[case] direction: Direction,
        #[case] tile_count: i32,
        #[case] expected: Region,
    ) {
        let mut g = grid(3, 3);
        g.place(ItemId(1), Region::new(1, 1, 1, 1)).unwrap();
        let resolution = resolve(&g, direction, TilePos::new(1, 1), tile_count).unwrap();
        assert!(resolution.growth);
        assert_eq!(resolution.tiles.len(), 1);
        assert_eq!(resolution.region, expected);
    }

    #[test]
    fn growth_is_capped_by_grid_edge() {
        let mut g = grid(3, 3);
        g.place(ItemId(1), Region::new(0, 0, 1, 1)).unwrap();
        let east = resolve(&g, Direction::East, TilePos::new(0, 0), 10).unwrap();
        assert_eq!(east.region, Region::new(0, 0, 1, 3));
        let west = resolve(&g, Direction::West, TilePos::new(0, 0), -10).unwrap();
        assert!(west.is_empty());
        assert_eq!(west.region, Region::new(0, 0, 1, 1));
    }

    #[test]
    fn growth_stops_at_filled_neighbor() {
        let mut g = grid(2, 5);
        g.place(ItemId(1), Region::new(0, 0, 2, 1)).unwrap();
        g.place(ItemId(2), Region::new(1, 3, 1, 1)).unwrap();
        let resolution = resolve(&g, Direction::East, TilePos::new(0, 0), 4).unwrap();
        assert_eq!(resolution.region, Region::new(0, 0, 2, 3));
        assert_eq!(resolution.tiles.len(), 4);
        assert!(resolution.tiles.iter().all(|p| p.column < 3));
    }

    #[test]
    fn growth_blocked_immediately_is_empty() {
        let mut g = grid(1, 3);
        g.place(ItemId(1), Region::new(0, 0, 1, 1)).unwrap();
        g.place(ItemId(2), Region::new(0, 1, 1, 1)).unwrap();
        let resolution = resolve(&g, Direction::East, TilePos::new(0, 0), 2).unwrap();
        assert!(resolution.is_empty());
    }

    #[rstest]
    #[case(Direction::West, i32::MIN, true, Region::new(1, 0, 2, 3))]
    #[case(Direction::West, i32::MAX, false, Region::new(1, 2, 2, 1))]
    #[case(Direction::East, i32::MAX, true, Region::new(1, 1, 2, 3))]
    #[case(Direction::East, i32::MIN, false, Region::new(1, 1, 2, 1))]
    #[case(Direction::North, i32::MIN, true, Region::new(0, 1, 3, 2))]
    #[case(Direction::North, i32::MAX, false, Region::new(2, 1, 1, 2))]
    #[case(Direction::South, i32::MAX, true, Region::new(1, 1, 3, 2))]
    #[case(Direction::South, i32::MIN, false, Region::new(1, 1, 1, 2))]
    fn extreme_tile_counts_clamp_to_grid_and_span(
        #[case] direction: Direction,
        #[case] tile_count: i32,
        #[case] growth: bool,
        #[case] expected: Region,
    ) {
        let mut g = grid(4, 4);
        g.place(ItemId(1), Region::new(1, 1, 2, 2)).unwrap();
        let resolution = resolve(&g, direction, TilePos::new(1, 1), tile_count).unwrap();
        assert_eq!(resolution.growth, growth);
        assert_eq!(resolution.region, expected);
        assert!(resolution.region.fits_within(4, 4));

        let committed = g.resize_item(ItemId(1), direction, tile_count).unwrap();
        assert_eq!(committed.region, expected);
        assert_eq!(g.region_of(ItemId(1)), Some(expected));
    }

    // ── Shrink ───────────────────────────────────────────────────────

    #[rstest]
    #[case(Direction::East, -1, Region::new(0, 0, 3, 2), 3)]
    #[case(Direction::West, 1, Region::new(0, 1, 3, 2), 3)]
    #[case(Direction::South, -2, Region::new(0, 0, 1, 3), 6)]
    #[case(Direction::North, 2, Region::new(2, 0, 1, 3), 6)]
    fn shrink_releases_the_dragged_edge(
        #[case] direction: Direction,
        #[case] tile_count: i32,
        #[case] expected: Region,
        #[case] released: usize,
    ) {
        let mut g = grid(4, 4);
        g.place(ItemId(1), Region::new(0, 0, 3, 3)).unwrap();
        let resolution = resolve(&g, direction, TilePos::new(0, 0), tile_count).unwrap();
        assert!(!resolution.growth);
        assert_eq!(resolution.region, expected);
        assert_eq!(resolution.tiles.len(), released);
        assert!(resolution.tiles.iter().all(|p| !expected.contains(*p)));
    }

    #[test]
    fn shrink_never_goes_below_one_band() {
        let mut g = grid(4, 4);
        g.place(ItemId(1), Region::new(0, 0, 1, 3)).unwrap();
        let resolution = resolve(&g, Direction::East, TilePos::new(0, 0), -10).unwrap();
        assert_eq!(resolution.region, Region::new(0, 0, 1, 1));
        let unit = resolve(&g, Direction::South, TilePos::new(0, 0), -1).unwrap();
        assert!(unit.is_empty());
    }

    #[test]
    fn zero_tile_count_is_empty() {
        let mut g = grid(3, 3);
        g.place(ItemId(1), Region::new(0, 0, 2, 2)).unwrap();
        assert!(resolve(&g, Direction::East, TilePos::new(0, 0), 0).unwrap().is_empty());
    }

    #[test]
    fn resolve_on_empty_tile_is_refused() {
        let g = grid(3, 3);
        assert_eq!(
            resolve(&g, Direction::East, TilePos::new(1, 1), 1),
            Err(GridError::EmptyAnchor(TilePos::new(1, 1)))
        );
    }

    // ── Commit ───────────────────────────────────────────────────────

    #[test]
    fn resize_commits_growth_and_emits_resized() {
        let mut g = grid(4, 4);
        g.place(ItemId(1), Region::new(0, 0, 2, 2)).unwrap();
        let rx = g.subscribe();
        let resolution = g.resize(Direction::East, TilePos::new(1, 1), 1).unwrap();
        assert_eq!(resolution.region, Region::new(0, 0, 2, 3));
        assert_eq!(g.region_of(ItemId(1)), Some(Region::new(0, 0, 2, 3)));
        let host = g.tile_id_at(0, 0);
        assert_eq!(g.tile_id_at(1, 2), host);
        let resized = rx
            .try_iter()
            .find(|e| matches!(e, GridEvent::RegionResized { .. }))
            .unwrap();
        assert_eq!(
            resized,
            GridEvent::RegionResized {
                grid: g.id(),
                item: ItemId(1),
                region: Region::new(0, 0, 2, 3),
            }
        );
    }

    #[test]
    fn west_shrink_moves_origin_and_frees_cells() {
        let mut g = grid(2, 4);
        g.place(ItemId(1), Region::new(0, 0, 2, 3)).unwrap();
        g.resize(Direction::West, TilePos::new(0, 0), 2).unwrap();
        assert_eq!(g.region_of(ItemId(1)), Some(Region::new(0, 2, 2, 1)));
        assert!(g.is_area_empty(0, 0, 2, 2));
        assert_eq!(g.item_at(1, 2), Some(ItemId(1)));
        assert_eq!(g.tile_at(0, 0).unwrap().region, Region::new(0, 0, 1, 1));
    }

    #[test]
    fn growth_then_equal_shrink_restores_region() {
        let mut g = grid(5, 5);
        let original = Region::new(1, 1, 2, 2);
        g.place(ItemId(1), original).unwrap();
        g.resize_item(ItemId(1), Direction::North, -1).unwrap();
        g.resize_item(ItemId(1), Direction::North, 1).unwrap();
        assert_eq!(g.region_of(ItemId(1)), Some(original));
    }

    #[test]
    fn empty_resize_changes_nothing() {
        let mut g = grid(2, 2);
        g.place(ItemId(1), Region::new(0, 0, 2, 2)).unwrap();
        let rx = g.subscribe();
        let resolution = g.resize(Direction::East, TilePos::new(0, 0), 3).unwrap();
        assert!(resolution.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn resize_disabled_is_refused() {
        let mut g = grid(3, 3);
        g.place(ItemId(1), Region::new(0, 0, 1, 1)).unwrap();
        g.accept_resizing(false);
        assert_eq!(
            g.resize(Direction::East, TilePos::new(0, 0), 1),
            Err(GridError::ResizingDisabled)
        );
        assert_eq!(
            g.highlight(Direction::East, TilePos::new(0, 0), 1),
            Err(GridError::ResizingDisabled)
        );
    }

    // ── Preview ──────────────────────────────────────────────────────

    #[test]
    fn highlight_previews_without_committing() {
        let mut g = grid(3, 3);
        g.place(ItemId(1), Region::new(0, 0, 1, 1)).unwrap();
        let rx = g.subscribe();
        let resolution = g.highlight(Direction::South, TilePos::new(0, 0), 2).unwrap();
        assert_eq!(resolution.region, Region::new(0, 0, 3, 1));
        assert_eq!(g.region_of(ItemId(1)), Some(Region::new(0, 0, 1, 1)));
        let events: Vec<_> = rx.try_iter().collect();
        assert!(events.contains(&GridEvent::ResizePreview {
            grid: g.id(),
            region: Region::new(0, 0, 3, 1),
        }));
        assert!(events.contains(&GridEvent::Highlight {
            grid: g.id(),
            region: Region::new(0, 0, 3, 1),
            highlight: Highlight::EmptyCheck,
        }));
    }
}
