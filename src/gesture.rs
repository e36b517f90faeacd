// Gesture state machine: turns tile-local pointer events into resize and drag actions.

use crate::config::types::InteractionConfig;
use crate::events::Highlight;
use crate::grid::{GridModel, ItemId, Region, TilePos};
use crate::resize::{Direction, ResizeResolution};

/// Where a pointer gesture currently stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureState {
    /// No button held.
    Idle,
    /// Pressed inside a filled region; becomes a drag past the threshold.
    Pressed { anchor: TilePos, press: (f32, f32) },
    /// Pressed on a region edge; the direction is locked until release.
    EdgeArmed { anchor: TilePos, direction: Direction },
    /// Resize preview shown for `tile_count` tiles.
    Previewing {
        anchor: TilePos,
        direction: Direction,
        tile_count: i32,
    },
    /// Handed over to the transfer protocol; waits for [`GestureController::drag_finished`].
    Dragging { anchor: TilePos },
}

/// Semantic pointer hint. The host picks the matching cursor icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerHint {
    Idle,
    Grab,
    ResizeHorizontal,
    ResizeVertical,
}

/// What the host should do after feeding an event to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureEffect {
    None,
    SetPointerHint(PointerHint),
    /// A resize preview changed; the grid already emitted the highlight.
    Preview(ResizeResolution),
    /// A resize was committed.
    Resized(ResizeResolution),
    /// The resize gesture ended without a model change.
    ResizeCancelled,
    /// The press became a drag; start the transfer protocol with these offsets.
    StartDrag {
        item: ItemId,
        grab_row_offset: usize,
        grab_column_offset: usize,
    },
}

/// Pointer state machine for one grid.
///
/// Coordinates are local to the top-left corner of the region under the
/// pointer, and `tile` is any cell of that region.
pub struct GestureController {
    state: GestureState,
    hint: PointerHint,
    resize_margin: f32,
    drag_threshold: f32,
}

impl GestureController {
    pub fn new(resize_margin: u32, drag_threshold: u32) -> Self {
        Self {
            state: GestureState::Idle,
            hint: PointerHint::Idle,
            resize_margin: resize_margin as f32,
            drag_threshold: drag_threshold as f32,
        }
    }

    pub fn from_config(config: &InteractionConfig) -> Self {
        Self::new(config.resize_margin_px, config.drag_threshold_px)
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn hint(&self) -> PointerHint {
        self.hint
    }

    /// Process a button press.
    pub fn on_pointer_down(&mut self, grid: &mut GridModel, tile: TilePos, x: f32, y: f32) -> GestureEffect {
        if self.state != GestureState::Idle {
            return GestureEffect::None;
        }
        let Some(region) = filled_region(grid, tile) else {
            return GestureEffect::None;
        };
        let anchor = region.origin();

        if let Some(direction) = self.edge_at(grid, &region, x, y) {
            log::debug!("grid {}: resize armed {direction:?} at {region}", grid.id().short());
            self.state = GestureState::EdgeArmed { anchor, direction };
            grid.highlight_all(Highlight::Resize);
            return self.set_hint(resize_hint(direction));
        }
        if grid.drag_and_drop_enabled() {
            self.state = GestureState::Pressed { anchor, press: (x, y) };
            return self.set_hint(PointerHint::Grab);
        }
        GestureEffect::None
    }

    /// Process a pointer move.
    pub fn on_pointer_move(&mut self, grid: &mut GridModel, tile: TilePos, x: f32, y: f32) -> GestureEffect {
        match self.state {
            GestureState::Idle => {
                let hint = match filled_region(grid, tile) {
                    Some(region) => match self.edge_at(grid, &region, x, y) {
                        Some(direction) => resize_hint(direction),
                        None if grid.drag_and_drop_enabled() => PointerHint::Grab,
                        None => PointerHint::Idle,
                    },
                    None => PointerHint::Idle,
                };
                self.set_hint(hint)
            }
            GestureState::Pressed { anchor, press } => {
                let moved = (x - press.0).abs() + (y - press.1).abs();
                if moved <= self.drag_threshold || !grid.drag_and_drop_enabled() {
                    return GestureEffect::None;
                }
                let (Some(item), Some(region)) = (
                    grid.item_at(anchor.row, anchor.column),
                    grid.tile_at(anchor.row, anchor.column).map(|t| t.region),
                ) else {
                    self.reset();
                    return GestureEffect::None;
                };
                let (grab_row_offset, grab_column_offset) = grid.geometry().grab_offsets(&region, press.0, press.1);
                self.state = GestureState::Dragging { anchor };
                GestureEffect::StartDrag {
                    item,
                    grab_row_offset,
                    grab_column_offset,
                }
            }
            GestureState::EdgeArmed { anchor, direction } => self.preview(grid, anchor, direction, None, x, y),
            GestureState::Previewing {
                anchor,
                direction,
                tile_count,
            } => self.preview(grid, anchor, direction, Some(tile_count), x, y),
            GestureState::Dragging { .. } => GestureEffect::None,
        }
    }

    /// Process a button release. Commits a previewed resize.
    pub fn on_pointer_up(&mut self, grid: &mut GridModel, _tile: TilePos, x: f32, y: f32) -> GestureEffect {
        match self.state {
            GestureState::EdgeArmed { .. } => {
                grid.highlight_all(Highlight::Idle);
                self.reset();
                GestureEffect::ResizeCancelled
            }
            GestureState::Previewing { anchor, direction, .. } => {
                let tile_count = match grid.tile_at(anchor.row, anchor.column) {
                    Some(tile) => grid.geometry().resize_tile_count(direction, &tile.region, x, y),
                    None => 0,
                };
                let result = grid.resize(direction, anchor, tile_count);
                grid.highlight_all(Highlight::Idle);
                self.reset();
                match result {
                    Ok(resolution) if !resolution.is_empty() => GestureEffect::Resized(resolution),
                    Ok(_) => GestureEffect::ResizeCancelled,
                    Err(err) => {
                        log::warn!("grid {}: resize refused: {err}", grid.id().short());
                        GestureEffect::ResizeCancelled
                    }
                }
            }
            GestureState::Pressed { .. } => {
                self.reset();
                GestureEffect::None
            }
            // The transfer protocol owns the release of a drag.
            GestureState::Dragging { .. } | GestureState::Idle => GestureEffect::None,
        }
    }

    /// The transfer protocol closed the drag started by this controller.
    pub fn drag_finished(&mut self) {
        if matches!(self.state, GestureState::Dragging { .. }) {
            self.reset();
        }
    }

    /// Abandon the current gesture without committing anything.
    pub fn cancel(&mut self, grid: &mut GridModel) {
        if matches!(
            self.state,
            GestureState::EdgeArmed { .. } | GestureState::Previewing { .. }
        ) {
            grid.highlight_all(Highlight::Idle);
        }
        self.reset();
    }

    fn preview(
        &mut self,
        grid: &mut GridModel,
        anchor: TilePos,
        direction: Direction,
        previous: Option<i32>,
        x: f32,
        y: f32,
    ) -> GestureEffect {
        let Some(region) = grid.tile_at(anchor.row, anchor.column).map(|t| t.region) else {
            self.cancel(grid);
            return GestureEffect::ResizeCancelled;
        };
        let tile_count = grid.geometry().resize_tile_count(direction, &region, x, y);
        if previous == Some(tile_count) {
            return GestureEffect::None;
        }
        match grid.highlight(direction, anchor, tile_count) {
            Ok(resolution) => {
                self.state = GestureState::Previewing {
                    anchor,
                    direction,
                    tile_count,
                };
                GestureEffect::Preview(resolution)
            }
            Err(err) => {
                log::warn!("grid {}: resize preview refused: {err}", grid.id().short());
                self.cancel(grid);
                GestureEffect::ResizeCancelled
            }
        }
    }

    /// The edge of `region` under region-local `(x, y)`, if resizing is on.
    fn edge_at(&self, grid: &GridModel, region: &Region, x: f32, y: f32) -> Option<Direction> {
        if !grid.resizing_enabled() {
            return None;
        }
        let rect = grid.geometry().region_rect(region);
        let m = self.resize_margin;
        if x < m {
            Some(Direction::West)
        } else if x > rect.width - m {
            Some(Direction::East)
        } else if y < m {
            Some(Direction::North)
        } else if y > rect.height - m {
            Some(Direction::South)
        } else {
            None
        }
    }

    fn set_hint(&mut self, hint: PointerHint) -> GestureEffect {
        if self.hint == hint {
            return GestureEffect::None;
        }
        self.hint = hint;
        GestureEffect::SetPointerHint(hint)
    }

    fn reset(&mut self) {
        self.state = GestureState::Idle;
    }
}

fn filled_region(grid: &GridModel, tile: TilePos) -> Option<Region> {
    grid.tile_at(tile.row, tile.column)
        .filter(|t| t.is_filled())
        .map(|t| t.region)
}

fn resize_hint(direction: Direction) -> PointerHint {
    if direction.is_horizontal() {
        PointerHint::ResizeHorizontal
    } else {
        PointerHint::ResizeVertical
    }
}
