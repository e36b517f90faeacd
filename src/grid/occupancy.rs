// Region occupancy: placing items, and the merge/split passes that keep the tile map consistent.
//
// These are the only functions that rewrite `tile_map` after construction
// (band growth and removal aside). Each validates everything up front and
// only then mutates, so a refused call leaves the grid untouched.

use super::arena::{Tile, TileId};
use super::model::GridModel;
use super::region::{FillState, ItemId, Region, TilePos};
use crate::error::GridError;

impl GridModel {
    /// Place `item` over `region`, merging its cells into one tile.
    pub fn place(&mut self, item: ItemId, region: Region) -> Result<(), GridError> {
        if self.occupancy.contains_key(&item) {
            return Err(GridError::DuplicateItem(item));
        }
        self.check_area(&region)?;

        let host = self.tile_map[region.from_row][region.from_column];
        if let Some(tile) = self.arena.get_mut(host) {
            tile.item = Some(item);
            tile.region = Region::unit(region.origin());
        }
        if region.is_merged() {
            let cells: Vec<TilePos> = region.cells().skip(1).collect();
            self.merge_cells(host, &cells, region);
        }
        self.occupancy.insert(item, host);

        log::debug!("grid {}: placed {item} at {region}", self.id.short());
        self.emit_changed(region, FillState::Filled);
        Ok(())
    }

    /// Remove `item`, splitting its region back into fresh unit placeholders.
    /// Returns the region it occupied.
    pub fn remove(&mut self, item: ItemId) -> Result<Region, GridError> {
        let host = *self.occupancy.get(&item).ok_or(GridError::UnknownItem(item))?;
        let region = self
            .arena
            .remove(host)
            .map(|tile| tile.region)
            .ok_or(GridError::UnknownItem(item))?;
        self.occupancy.remove(&item);

        // The old tile is gone; every cell gets a new identity.
        for pos in region.cells() {
            let fresh = self.alloc_unit(pos);
            self.tile_map[pos.row][pos.column] = fresh;
        }

        log::debug!("grid {}: removed {item} from {region}", self.id.short());
        self.emit_changed(region, FillState::Empty);
        Ok(region)
    }

    /// Annex `cells` into the tile `host`, whose extent becomes `extent`.
    ///
    /// Every cell must currently hold an empty placeholder (or `host` itself).
    pub(crate) fn merge_tiles(&mut self, host: TileId, cells: &[TilePos], extent: Region) -> Result<(), GridError> {
        if !extent.fits_within(self.rows, self.columns) {
            return Err(GridError::OutOfBounds {
                region: extent,
                rows: self.rows,
                columns: self.columns,
            });
        }
        for pos in cells {
            let id = self.tile_id_at(pos.row, pos.column).ok_or(GridError::OutOfBounds {
                region: Region::unit(*pos),
                rows: self.rows,
                columns: self.columns,
            })?;
            if id != host && self.arena.get(id).is_some_and(Tile::is_filled) {
                return Err(GridError::OccupiedArea {
                    region: Region::unit(*pos),
                });
            }
        }
        self.merge_cells(host, cells, extent);
        log::debug!("grid {}: merged {} tile(s) into {extent}", self.id.short(), cells.len());
        self.emit_changed(extent, FillState::Filled);
        Ok(())
    }

    /// Release `cells` from the tile `host`, whose extent becomes `extent`.
    ///
    /// Every cell must currently belong to `host` and lie outside `extent`.
    pub(crate) fn split_tiles(&mut self, host: TileId, cells: &[TilePos], extent: Region) -> Result<(), GridError> {
        let current = self
            .arena
            .get(host)
            .map(|tile| tile.region)
            .ok_or(GridError::OccupiedArea { region: extent })?;
        let foreign = cells
            .iter()
            .any(|pos| !current.contains(*pos) || extent.contains(*pos) || self.tile_id_at(pos.row, pos.column) != Some(host));
        if foreign {
            return Err(GridError::OccupiedArea { region: current });
        }

        for pos in cells {
            let fresh = self.alloc_unit(*pos);
            self.tile_map[pos.row][pos.column] = fresh;
        }
        if let Some(tile) = self.arena.get_mut(host) {
            tile.region = extent;
        }

        log::debug!("grid {}: split {} tile(s) off, now {extent}", self.id.short(), cells.len());
        if let Some(band) = bounding_region(cells) {
            self.emit_changed(band, FillState::Empty);
        }
        self.emit_changed(extent, FillState::Filled);
        Ok(())
    }

    /// Write `host` into every cell, discarding the tiles it replaces.
    fn merge_cells(&mut self, host: TileId, cells: &[TilePos], extent: Region) {
        for pos in cells {
            let old = std::mem::replace(&mut self.tile_map[pos.row][pos.column], host);
            if old != host {
                self.arena.remove(old);
            }
        }
        if let Some(tile) = self.arena.get_mut(host) {
            tile.region = extent;
        }
    }
}

/// Smallest region covering every cell.
pub(crate) fn bounding_region(cells: &[TilePos]) -> Option<Region> {
    let first = cells.first()?;
    let (mut top, mut left, mut bottom, mut right) = (first.row, first.column, first.row, first.column);
    for pos in cells {
        top = top.min(pos.row);
        left = left.min(pos.column);
        bottom = bottom.max(pos.row);
        right = right.max(pos.column);
    }
    Some(Region::new(top, left, bottom - top + 1, right - left + 1))
}
