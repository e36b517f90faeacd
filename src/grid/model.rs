// Grid model: the row × column tile map, band growth/removal, and area queries.

use std::collections::BTreeMap;
use std::fmt;

use crossbeam_channel::Receiver;

use super::arena::{Tile, TileArena, TileId};
use super::geometry::{Rect, TileGeometry};
use super::region::{FillState, ItemId, Region, TilePos};
use super::GridId;
use crate::config::types::Config;
use crate::error::GridError;
use crate::events::{EventBus, GridEvent, Highlight};

/// An item detached by a drag, waiting to be dropped or rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDrop {
    pub item: ItemId,
    /// Where the item sat before the drag started.
    pub region: Region,
}

/// A rectangular grid of tiles.
///
/// Every in-bounds cell of `tile_map` holds exactly one [`TileId`]. A merged
/// region is one tile whose id is stored at every covered cell.
pub struct GridModel {
    pub(super) id: GridId,
    pub(super) rows: usize,
    pub(super) columns: usize,
    pub(super) arena: TileArena,
    pub(super) tile_map: Vec<Vec<TileId>>,
    /// Item → hosting tile. At most one entry per item.
    pub(super) occupancy: BTreeMap<ItemId, TileId>,
    pub(super) geometry: TileGeometry,
    pub(super) drag_and_drop: bool,
    pub(super) resizable: bool,
    pub(super) pending: Option<PendingDrop>,
    pub(super) events: EventBus,
}

impl GridModel {
    /// Create a grid with every cell holding a unit placeholder tile.
    pub fn new(rows: usize, columns: usize, geometry: TileGeometry) -> Self {
        let mut grid = Self {
            id: GridId::new(),
            rows: 0,
            columns,
            arena: TileArena::new(),
            tile_map: Vec::with_capacity(rows),
            occupancy: BTreeMap::new(),
            geometry,
            drag_and_drop: true,
            resizable: true,
            pending: None,
            events: EventBus::new(),
        };
        for row in 0..rows {
            let cells = (0..columns).map(|column| grid.alloc_unit(TilePos::new(row, column))).collect();
            grid.tile_map.push(cells);
        }
        grid.rows = rows;
        log::debug!("grid {} created with {rows}x{columns} tiles", grid.id.short());
        grid
    }

    /// Create a grid from the `[grid]`, `[geometry]` and `[interaction]` config sections.
    pub fn from_config(config: &Config) -> Self {
        let mut grid = Self::new(
            config.grid.rows,
            config.grid.columns,
            TileGeometry::from_config(&config.geometry),
        );
        grid.drag_and_drop = config.interaction.drag_and_drop;
        grid.resizable = config.interaction.resizing;
        grid
    }

    pub fn id(&self) -> GridId {
        self.id
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// The whole grid as one region, or None for a grid without cells.
    pub fn full_region(&self) -> Option<Region> {
        (self.rows > 0 && self.columns > 0).then(|| Region::new(0, 0, self.rows, self.columns))
    }

    // ── Tile lookup ──────────────────────────────────────────────────

    /// Identity of the tile covering a cell.
    pub fn tile_id_at(&self, row: usize, column: usize) -> Option<TileId> {
        self.tile_map.get(row)?.get(column).copied()
    }

    /// The tile covering a cell. For a merged region every covered cell
    /// yields the same tile.
    pub fn tile_at(&self, row: usize, column: usize) -> Option<&Tile> {
        self.tile_id_at(row, column).and_then(|id| self.arena.get(id))
    }

    /// The item hosted at a cell, if any.
    pub fn item_at(&self, row: usize, column: usize) -> Option<ItemId> {
        self.tile_at(row, column).and_then(|tile| tile.item)
    }

    /// Cell drawn under a grid-relative pixel. Points in the spacing between
    /// tiles, or outside the grid, hit nothing.
    pub fn cell_at_point(&self, x: f32, y: f32) -> Option<TilePos> {
        let pos = self.geometry.tile_at_point(x, y, self.row_count(), self.column_count())?;
        self.geometry.tile_rect(pos).contains_point(x, y).then_some(pos)
    }

    /// Number of distinct live tiles.
    pub fn tile_count(&self) -> usize {
        self.arena.len()
    }

    // ── Occupancy queries ────────────────────────────────────────────

    /// Current extent of an item's region.
    pub fn region_of(&self, item: ItemId) -> Option<Region> {
        let id = self.occupancy.get(&item)?;
        self.arena.get(*id).map(|tile| tile.region)
    }

    /// Snapshot of the occupancy table, ordered by item.
    pub fn items(&self) -> BTreeMap<ItemId, Region> {
        self.occupancy
            .iter()
            .filter_map(|(item, id)| self.arena.get(*id).map(|tile| (*item, tile.region)))
            .collect()
    }

    pub fn contains_item(&self, item: ItemId) -> bool {
        self.occupancy.contains_key(&item)
    }

    // ── Area queries ─────────────────────────────────────────────────

    /// True when the rectangle lies inside the grid and every covered tile
    /// is an empty placeholder. Negative origins and spans below 1 are
    /// never empty.
    pub fn is_area_empty(&self, from_row: i64, from_column: i64, row_span: i64, column_span: i64) -> bool {
        Region::from_signed(from_row, from_column, row_span, column_span)
            .is_some_and(|region| self.check_area(&region).is_ok())
    }

    /// Like [`is_area_empty`](Self::is_area_empty), reporting why an area is unusable.
    pub fn check_area(&self, region: &Region) -> Result<(), GridError> {
        if !region.fits_within(self.rows, self.columns) {
            return Err(GridError::OutOfBounds {
                region: *region,
                rows: self.rows,
                columns: self.columns,
            });
        }
        let occupied = region
            .cells()
            .any(|pos| self.tile_at(pos.row, pos.column).is_some_and(Tile::is_filled));
        if occupied {
            return Err(GridError::OccupiedArea { region: *region });
        }
        Ok(())
    }

    // ── Band growth and removal ──────────────────────────────────────

    /// Append `count` rows of placeholder tiles at the bottom.
    pub fn add_rows(&mut self, count: usize) -> Result<(), GridError> {
        if count == 0 {
            return Err(GridError::InvalidCount);
        }
        let first = self.rows;
        for row in first..first + count {
            let cells = (0..self.columns).map(|column| self.alloc_unit(TilePos::new(row, column))).collect();
            self.tile_map.push(cells);
        }
        self.rows += count;
        log::debug!("grid {}: added {count} row(s), now {}x{}", self.id.short(), self.rows, self.columns);
        if self.columns > 0 {
            self.emit_changed(Region::new(first, 0, count, self.columns), FillState::Empty);
        }
        Ok(())
    }

    /// Append `count` columns of placeholder tiles on the right.
    pub fn add_columns(&mut self, count: usize) -> Result<(), GridError> {
        if count == 0 {
            return Err(GridError::InvalidCount);
        }
        let first = self.columns;
        for row in 0..self.rows {
            for column in first..first + count {
                let id = self.alloc_unit(TilePos::new(row, column));
                self.tile_map[row].push(id);
            }
        }
        self.columns += count;
        log::debug!("grid {}: added {count} column(s), now {}x{}", self.id.short(), self.rows, self.columns);
        if self.rows > 0 {
            self.emit_changed(Region::new(0, first, self.rows, count), FillState::Empty);
        }
        Ok(())
    }

    /// Remove the last `count` rows. Refused unless the band is entirely empty.
    pub fn remove_rows(&mut self, count: usize) -> Result<(), GridError> {
        if count == 0 {
            return Err(GridError::InvalidCount);
        }
        let band = self.trailing_band(count, self.rows, |first| Region::new(first, 0, count, self.columns.max(1)))?;
        for cells in self.tile_map.drain(band.from_row..) {
            for id in cells {
                self.arena.remove(id);
            }
        }
        self.rows -= count;
        log::debug!("grid {}: removed {count} row(s), now {}x{}", self.id.short(), self.rows, self.columns);
        if self.columns > 0 {
            self.emit_changed(band, FillState::Empty);
        }
        Ok(())
    }

    /// Remove the last `count` columns. Refused unless the band is entirely empty.
    pub fn remove_columns(&mut self, count: usize) -> Result<(), GridError> {
        if count == 0 {
            return Err(GridError::InvalidCount);
        }
        let band = self.trailing_band(count, self.columns, |first| Region::new(0, first, self.rows.max(1), count))?;
        for cells in &mut self.tile_map {
            for id in cells.drain(band.from_column..) {
                self.arena.remove(id);
            }
        }
        self.columns -= count;
        log::debug!("grid {}: removed {count} column(s), now {}x{}", self.id.short(), self.rows, self.columns);
        if self.rows > 0 {
            self.emit_changed(band, FillState::Empty);
        }
        Ok(())
    }

    /// The trailing band of `count` rows or columns, checked for emptiness.
    fn trailing_band(
        &self,
        count: usize,
        total: usize,
        band: impl Fn(usize) -> Region,
    ) -> Result<Region, GridError> {
        let first = total.checked_sub(count);
        let region = band(first.unwrap_or(0));
        match first {
            None => Err(GridError::OutOfBounds {
                region,
                rows: self.rows,
                columns: self.columns,
            }),
            Some(_) if self.rows == 0 || self.columns == 0 => Ok(region),
            Some(_) => self.check_area(&region).map(|()| region),
        }
    }

    // ── Feature toggles ──────────────────────────────────────────────

    pub fn accept_drag_and_drop(&mut self, value: bool) {
        self.drag_and_drop = value;
    }

    pub fn accept_resizing(&mut self, value: bool) {
        self.resizable = value;
    }

    pub fn drag_and_drop_enabled(&self) -> bool {
        self.drag_and_drop
    }

    pub fn resizing_enabled(&self) -> bool {
        self.resizable
    }

    // ── Geometry ─────────────────────────────────────────────────────

    pub fn geometry(&self) -> &TileGeometry {
        &self.geometry
    }

    /// Pixel rect of the tile covering a cell (the full merged extent for a
    /// merged region).
    pub fn tile_rect(&self, row: usize, column: usize) -> Option<Rect> {
        self.tile_at(row, column).map(|tile| self.geometry.region_rect(&tile.region))
    }

    /// Set the height of every row. Rejected below the minimum height.
    pub fn set_rows_height(&mut self, height: u32) -> bool {
        if height < self.geometry.min_tile_height {
            return false;
        }
        self.geometry.tile_height = height;
        self.recompute_all_tile_geometry();
        true
    }

    /// Set the width of every column. Rejected below the minimum width.
    pub fn set_columns_width(&mut self, width: u32) -> bool {
        if width < self.geometry.min_tile_width {
            return false;
        }
        self.geometry.tile_width = width;
        self.recompute_all_tile_geometry();
        true
    }

    /// Set the minimum row height, growing the rows if they are now too short.
    pub fn set_rows_minimum_height(&mut self, height: u32) {
        self.geometry.min_tile_height = height;
        if height > self.geometry.tile_height {
            self.geometry.tile_height = height;
            self.recompute_all_tile_geometry();
        }
    }

    /// Set the minimum column width, widening the columns if they are now too narrow.
    pub fn set_columns_minimum_width(&mut self, width: u32) {
        self.geometry.min_tile_width = width;
        if width > self.geometry.tile_width {
            self.geometry.tile_width = width;
            self.recompute_all_tile_geometry();
        }
    }

    pub fn set_vertical_spacing(&mut self, spacing: u32) {
        self.geometry.vertical_spacing = spacing;
        self.recompute_all_tile_geometry();
    }

    pub fn set_horizontal_spacing(&mut self, spacing: u32) {
        self.geometry.horizontal_spacing = spacing;
        self.recompute_all_tile_geometry();
    }

    /// Resize tiles so the grid fills a `width × height` viewport, never
    /// shrinking tiles below their minimum size.
    pub fn fit_to_viewport(&mut self, width: u32, height: u32) {
        let g = &mut self.geometry;
        g.tile_height = TileGeometry::fitted_size(height, self.rows, g.vertical_spacing, g.min_tile_height);
        g.tile_width = TileGeometry::fitted_size(width, self.columns, g.horizontal_spacing, g.min_tile_width);
        self.recompute_all_tile_geometry();
    }

    /// Single funnel for every geometry change.
    pub fn recompute_all_tile_geometry(&mut self) {
        let geometry = self.geometry;
        log::debug!(
            "grid {}: tiles now {}x{}px, spacing {}/{}px",
            self.id.short(),
            geometry.tile_width,
            geometry.tile_height,
            geometry.horizontal_spacing,
            geometry.vertical_spacing
        );
        self.events.emit(GridEvent::GeometryChanged { grid: self.id, geometry });
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Subscribe to this grid's events.
    pub fn subscribe(&mut self) -> Receiver<GridEvent> {
        self.events.subscribe()
    }

    /// Set the highlight state of every empty tile in the grid.
    pub fn highlight_all(&mut self, highlight: Highlight) {
        if let Some(region) = self.full_region() {
            self.highlight_region(region, highlight);
        }
    }

    pub(crate) fn highlight_region(&mut self, region: Region, highlight: Highlight) {
        self.events.emit(GridEvent::Highlight {
            grid: self.id,
            region,
            highlight,
        });
    }

    pub(crate) fn emit(&mut self, event: GridEvent) {
        self.events.emit(event);
    }

    pub(super) fn emit_changed(&mut self, region: Region, fill: FillState) {
        self.events.emit(GridEvent::RegionChanged {
            grid: self.id,
            region,
            fill,
        });
    }

    // ── Pending drop slot ────────────────────────────────────────────

    /// The item currently detached by a drag, if any.
    pub fn pending_drop(&self) -> Option<&PendingDrop> {
        self.pending.as_ref()
    }

    /// Store a detached item. The slot holds one item; a previous occupant is
    /// overwritten and returned.
    pub(crate) fn put_pending(&mut self, pending: PendingDrop) -> Option<PendingDrop> {
        self.pending.replace(pending)
    }

    /// Empty the slot.
    pub(crate) fn take_pending(&mut self) -> Option<PendingDrop> {
        self.pending.take()
    }

    // ── Tile allocation ──────────────────────────────────────────────

    /// Allocate a fresh unit placeholder. Does not touch `tile_map`.
    pub(super) fn alloc_unit(&mut self, pos: TilePos) -> TileId {
        self.arena.insert(Tile::placeholder(Region::unit(pos)))
    }
}

/// One line per row; each cell shows the hosted item number or `.`.
impl fmt::Display for GridModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: Vec<String> = (0..self.columns)
                .map(|column| match self.item_at(row, column) {
                    Some(item) => item.0.to_string(),
                    None => ".".to_string(),
                })
                .map(|cell| format!("{cell:>3}"))
                .collect();
            writeln!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}
