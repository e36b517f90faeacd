// Error taxonomy for grid mutation, resize, and transfer operations.

use crate::grid::{GridId, ItemId, Region, TilePos};

/// Every condition under which a grid operation is refused.
///
/// All variants are local and recoverable: the refused operation leaves the
/// grid exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("area {region} is occupied")]
    OccupiedArea { region: Region },
    #[error("area {region} lies outside the {rows}x{columns} grid")]
    OutOfBounds {
        region: Region,
        rows: usize,
        columns: usize,
    },
    #[error("transfer origin {0} is not linked to the target grid")]
    UnknownOrigin(String),
    #[error("invalid transfer payload: {0}")]
    InvalidPayload(String),
    #[error("item {0} is already placed in this grid")]
    DuplicateItem(ItemId),
    #[error("item {0} is not placed in this grid")]
    UnknownItem(ItemId),
    #[error("tile ({}, {}) does not host an item", .0.row, .0.column)]
    EmptyAnchor(TilePos),
    #[error("band count must be > 0")]
    InvalidCount,
    #[error("grid does not accept drag and drop")]
    DragAndDropDisabled,
    #[error("grid does not accept resizing")]
    ResizingDisabled,
    #[error("a drag is already in progress on this grid")]
    DragInProgress,
    #[error("origin grid has no item waiting to be dropped")]
    NothingToDrop,
    #[error("grid {0} is not registered")]
    UnknownGrid(GridId),
}
