// Transfer protocol: moving a region between linked grids by drag and drop.

pub mod registry;

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::events::{GridEvent, Highlight, RegionMove};
use crate::grid::{GridId, ItemId, PendingDrop, Region, TilePos};
use crate::workspace::Workspace;

/// Drag payload as carried by the host's drag-and-drop system.
///
/// Offsets record which cell of the region the pointer grabbed, relative to
/// the region's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferPayload {
    pub origin_grid_id: GridId,
    pub from_row: i64,
    pub from_column: i64,
    pub row_span: i64,
    pub column_span: i64,
    pub pointer_row_offset: i64,
    pub pointer_column_offset: i64,
}

impl TransferPayload {
    pub fn new(origin: GridId, region: Region, grab_row_offset: usize, grab_column_offset: usize) -> Self {
        Self {
            origin_grid_id: origin,
            from_row: region.from_row as i64,
            from_column: region.from_column as i64,
            row_span: region.row_span as i64,
            column_span: region.column_span as i64,
            pointer_row_offset: grab_row_offset.min(region.row_span.saturating_sub(1)) as i64,
            pointer_column_offset: grab_column_offset.min(region.column_span.saturating_sub(1)) as i64,
        }
    }

    /// JSON wire form. Empty if serialization fails, which `decode` rejects.
    pub fn encode(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("payload from grid {} failed to serialize: {e}", self.origin_grid_id.short());
                String::new()
            }
        }
    }

    /// Parse and sanity-check a JSON payload.
    pub fn decode(raw: &str) -> Result<Self, GridError> {
        let payload: Self = serde_json::from_str(raw).map_err(|e| GridError::InvalidPayload(e.to_string()))?;
        if payload.region().is_none() {
            return Err(GridError::InvalidPayload(format!(
                "region ({}, {}) {}x{} is not a valid rectangle",
                payload.from_row, payload.from_column, payload.row_span, payload.column_span
            )));
        }
        if !(0..payload.row_span).contains(&payload.pointer_row_offset)
            || !(0..payload.column_span).contains(&payload.pointer_column_offset)
        {
            return Err(GridError::InvalidPayload(format!(
                "pointer offset ({}, {}) outside {}x{} region",
                payload.pointer_row_offset, payload.pointer_column_offset, payload.row_span, payload.column_span
            )));
        }
        Ok(payload)
    }

    /// The dragged region at its origin.
    pub fn region(&self) -> Option<Region> {
        Region::from_signed(self.from_row, self.from_column, self.row_span, self.column_span)
    }

    /// The region a drop with the pointer over `pointer` would occupy.
    /// None when its origin would be negative.
    pub fn target_region(&self, pointer: TilePos) -> Option<Region> {
        Region::from_signed(
            pointer.row as i64 - self.pointer_row_offset,
            pointer.column as i64 - self.pointer_column_offset,
            self.row_span,
            self.column_span,
        )
    }
}

/// How a drag gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// A drop consumed the pending item.
    Dropped,
    /// No drop happened; the item went back to its original region.
    RolledBack(Region),
}

impl Workspace {
    /// Detach `item` from `source` and start a drag.
    ///
    /// The item leaves the occupancy table and waits in the source grid's
    /// pending slot until a drop or [`finish_drag`](Self::finish_drag).
    pub fn begin_drag(
        &mut self,
        source: GridId,
        item: ItemId,
        grab_row_offset: usize,
        grab_column_offset: usize,
    ) -> Result<TransferPayload, GridError> {
        let grid = self.grid_mut(source)?;
        if !grid.drag_and_drop_enabled() {
            return Err(GridError::DragAndDropDisabled);
        }
        if grid.pending_drop().is_some() {
            return Err(GridError::DragInProgress);
        }
        let region = grid.remove(item)?;
        grid.put_pending(PendingDrop { item, region });

        let payload = TransferPayload::new(source, region, grab_row_offset, grab_column_offset);
        log::info!("grid {}: drag of {item} started from {region}", source.short());
        self.highlight_linked(source, Highlight::DragAndDrop);
        Ok(payload)
    }

    /// Check whether `raw` may be dropped on `target` with the pointer over
    /// `pointer`. Returns the candidate region and highlights it.
    pub fn drag_over(&mut self, target: GridId, raw: &str, pointer: TilePos) -> Result<Region, GridError> {
        let (_, _, region) = self.validate_drop(target, raw, pointer).inspect_err(|err| {
            log::debug!("grid {}: drop refused: {err}", target.short());
        })?;
        let grid = self.grid_mut(target)?;
        grid.highlight_all(Highlight::DragAndDrop);
        grid.highlight_region(region, Highlight::EmptyCheck);
        Ok(region)
    }

    /// Commit a drop. On failure nothing changes and the drag stays open.
    pub fn drop_payload(&mut self, target: GridId, raw: &str, pointer: TilePos) -> Result<RegionMove, GridError> {
        let (payload, _, region) = self.validate_drop(target, raw, pointer).inspect_err(|err| {
            log::warn!("grid {}: drop refused: {err}", target.short());
        })?;
        let origin = payload.origin_grid_id;

        let pending = self.grid_mut(origin)?.take_pending().ok_or(GridError::NothingToDrop)?;
        if let Err(err) = self.grid_mut(target)?.place(pending.item, region) {
            log::warn!("grid {}: drop of {} failed: {err}", target.short(), pending.item);
            self.grid_mut(origin)?.put_pending(pending);
            return Err(err);
        }

        let moved = RegionMove {
            item: pending.item,
            origin,
            target,
            from_row: pending.region.from_row,
            from_column: pending.region.from_column,
            to_row: region.from_row,
            to_column: region.from_column,
        };
        log::info!(
            "moved {} from grid {} {} to grid {} {region}",
            pending.item,
            origin.short(),
            pending.region,
            target.short()
        );
        self.grid_mut(target)?.emit(GridEvent::RegionMoved(moved));
        if origin != target {
            self.grid_mut(origin)?.emit(GridEvent::RegionMoved(moved));
        }
        self.highlight_linked(origin, Highlight::Idle);
        if origin != target {
            self.highlight_linked(target, Highlight::Idle);
        }
        Ok(moved)
    }

    /// Close the drag started on `source`. Rolls the pending item back to its
    /// original region when no drop consumed it.
    ///
    /// If that region has been filled in the meantime the item stays pending
    /// and the error is returned. The drag is then still open: linked grids
    /// keep their drag highlight until a later drop or `finish_drag` succeeds.
    pub fn finish_drag(&mut self, source: GridId) -> Result<DragOutcome, GridError> {
        let grid = self.grid_mut(source)?;
        let Some(pending) = grid.take_pending() else {
            return Ok(DragOutcome::Dropped);
        };
        if let Err(err) = grid.place(pending.item, pending.region) {
            log::warn!("grid {}: rollback of {} failed: {err}", source.short(), pending.item);
            grid.put_pending(pending);
            return Err(err);
        }
        log::warn!("grid {}: drag of {} rolled back to {}", source.short(), pending.item, pending.region);
        self.highlight_linked(source, Highlight::Idle);
        Ok(DragOutcome::RolledBack(pending.region))
    }

    /// Decode a payload and check it against `target`: link, pending item and free area.
    fn validate_drop(
        &self,
        target: GridId,
        raw: &str,
        pointer: TilePos,
    ) -> Result<(TransferPayload, PendingDrop, Region), GridError> {
        let payload = TransferPayload::decode(raw)?;
        let target_grid = self.grid(target)?;
        if !target_grid.drag_and_drop_enabled() {
            return Err(GridError::DragAndDropDisabled);
        }
        let origin = self
            .links()
            .resolve(target, payload.origin_grid_id)
            .ok_or_else(|| GridError::UnknownOrigin(payload.origin_grid_id.to_string()))?;
        let pending = *self.grid(origin)?.pending_drop().ok_or(GridError::NothingToDrop)?;
        if payload.region() != Some(pending.region) {
            return Err(GridError::InvalidPayload(format!(
                "payload does not describe the pending region {}",
                pending.region
            )));
        }
        let region = payload.target_region(pointer).ok_or(GridError::OutOfBounds {
            region: pending.region,
            rows: target_grid.row_count(),
            columns: target_grid.column_count(),
        })?;
        target_grid.check_area(&region)?;
        Ok((payload, pending, region))
    }

    /// Set the highlight of every drag-and-drop grid linked with `id`.
    fn highlight_linked(&mut self, id: GridId, highlight: Highlight) {
        for peer in self.linked_grids(id) {
            if let Ok(grid) = self.grid_mut(peer) {
                if grid.drag_and_drop_enabled() {
                    grid.highlight_all(highlight);
                }
            }
        }
    }
}
