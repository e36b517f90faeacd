// Event bus: render notifications and host-facing events written to channels.

use crossbeam_channel::{Receiver, Sender};

use crate::grid::{FillState, GridId, ItemId, Region, TileGeometry};

/// Semantic highlight state of the empty tiles in a region. The view decides
/// what each state looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Resting state.
    Idle,
    /// A resize gesture is in progress on this grid.
    Resize,
    /// A drag is in progress somewhere in this grid's link set.
    DragAndDrop,
    /// The region is the candidate of a resize or drop and is free.
    EmptyCheck,
}

/// A completed move of an item from one grid to another (or within one grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionMove {
    pub item: ItemId,
    pub origin: GridId,
    pub target: GridId,
    pub from_row: usize,
    pub from_column: usize,
    pub to_row: usize,
    pub to_column: usize,
}

/// Everything a grid reports to its observers.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// Cells of `region` were rewritten; repaint them.
    RegionChanged {
        grid: GridId,
        region: Region,
        fill: FillState,
    },
    /// The region a pending resize would produce.
    ResizePreview { grid: GridId, region: Region },
    /// Highlight state change for the empty tiles of `region`.
    Highlight {
        grid: GridId,
        region: Region,
        highlight: Highlight,
    },
    /// Tile sizes or spacing changed; every tile must be re-laid out.
    GeometryChanged { grid: GridId, geometry: TileGeometry },
    /// A resize was committed.
    RegionResized {
        grid: GridId,
        item: ItemId,
        region: Region,
    },
    /// A drag-and-drop transfer was committed.
    RegionMoved(RegionMove),
}

/// Fan-out of grid events to any number of channel subscribers.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Sender<GridEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new subscription. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<GridEvent> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver an event to every live subscriber, pruning disconnected ones.
    pub fn emit(&mut self, event: GridEvent) {
        log::trace!("event: {event:?}");
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of live subscriptions as of the last emission.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
