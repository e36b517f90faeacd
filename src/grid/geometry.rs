// Pixel geometry: tile sizes, spacing, and pointer-to-tile conversions.

use super::region::{Region, TilePos};
use crate::config::types::GeometryConfig;
use crate::resize::Direction;

/// A rectangle in pixel coordinates, relative to the grid's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point (px, py) is inside this rectangle.
    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Size of one unit tile and the gaps between tiles, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGeometry {
    pub tile_height: u32,
    pub tile_width: u32,
    pub vertical_spacing: u32,
    pub horizontal_spacing: u32,
    pub min_tile_height: u32,
    pub min_tile_width: u32,
}

impl TileGeometry {
    /// Geometry whose minimum sizes equal the initial sizes.
    pub fn new(tile_height: u32, tile_width: u32, vertical_spacing: u32, horizontal_spacing: u32) -> Self {
        Self {
            tile_height,
            tile_width,
            vertical_spacing,
            horizontal_spacing,
            min_tile_height: tile_height,
            min_tile_width: tile_width,
        }
    }

    pub fn from_config(config: &GeometryConfig) -> Self {
        Self {
            tile_height: config.tile_height_px.max(config.min_tile_height_px),
            tile_width: config.tile_width_px.max(config.min_tile_width_px),
            vertical_spacing: config.vertical_spacing_px,
            horizontal_spacing: config.horizontal_spacing_px,
            min_tile_height: config.min_tile_height_px,
            min_tile_width: config.min_tile_width_px,
        }
    }

    /// Distance between the top edges of two consecutive rows.
    pub fn row_pitch(&self) -> f32 {
        (self.tile_height + self.vertical_spacing) as f32
    }

    /// Distance between the left edges of two consecutive columns.
    pub fn column_pitch(&self) -> f32 {
        (self.tile_width + self.horizontal_spacing) as f32
    }

    /// Pixel rect of a region, spacing between its own cells included.
    pub fn region_rect(&self, region: &Region) -> Rect {
        let rows = region.row_span as f32;
        let columns = region.column_span as f32;
        Rect::new(
            region.from_column as f32 * self.column_pitch(),
            region.from_row as f32 * self.row_pitch(),
            columns * self.tile_width as f32 + (columns - 1.0) * self.horizontal_spacing as f32,
            rows * self.tile_height as f32 + (rows - 1.0) * self.vertical_spacing as f32,
        )
    }

    /// Pixel rect of a single cell.
    pub fn tile_rect(&self, pos: TilePos) -> Rect {
        self.region_rect(&Region::unit(pos))
    }

    /// Cell under a grid-relative pixel. A point in the gap after a cell maps
    /// to that cell.
    pub fn tile_at_point(&self, x: f32, y: f32, rows: usize, columns: usize) -> Option<TilePos> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let row = (y / self.row_pitch()) as usize;
        let column = (x / self.column_pitch()) as usize;
        (row < rows && column < columns).then(|| TilePos::new(row, column))
    }

    /// How many tiles a pointer at region-local `(x, y)` asks for while
    /// dragging the `direction` edge of `region`.
    ///
    /// The offset is measured from the dragged edge and rounded to the
    /// nearest whole pitch, so the count changes once the pointer crosses
    /// half a tile. The sign follows the axis: negative means towards the
    /// grid origin.
    pub fn resize_tile_count(&self, direction: Direction, region: &Region, x: f32, y: f32) -> i32 {
        let rect = self.region_rect(region);
        let (position, extent, pitch) = if direction.is_horizontal() {
            (x, rect.width, self.column_pitch())
        } else {
            (y, rect.height, self.row_pitch())
        };
        let edge = if direction.sign() > 0 { extent } else { 0.0 };
        ((position - edge) / pitch).round() as i32
    }

    /// Which cell of `region` (as row/column offsets from its origin) lies
    /// under the region-local pixel `(x, y)`.
    pub fn grab_offsets(&self, region: &Region, x: f32, y: f32) -> (usize, usize) {
        let row = (y.max(0.0) / self.row_pitch()) as usize;
        let column = (x.max(0.0) / self.column_pitch()) as usize;
        (
            row.min(region.row_span.saturating_sub(1)),
            column.min(region.column_span.saturating_sub(1)),
        )
    }

    /// Tile size that spreads `count` tiles over `viewport` pixels, never
    /// below `minimum`.
    pub(crate) fn fitted_size(viewport: u32, count: usize, spacing: u32, minimum: u32) -> u32 {
        if count == 0 {
            return minimum;
        }
        let gaps = (count as u32 - 1).saturating_mul(spacing);
        (viewport.saturating_sub(gaps) / count as u32).max(minimum)
    }
}

impl Default for TileGeometry {
    fn default() -> Self {
        Self::new(100, 150, 5, 5)
    }
}
