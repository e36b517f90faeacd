// Tile arena: generational slots so merged cells can share one tile by index.

use super::region::{ItemId, Region};

/// Handle to a tile record in the arena.
///
/// A freed slot is reused with a bumped generation, so a handle to a
/// discarded tile never resolves to its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    slot: u32,
    generation: u32,
}

impl TileId {
    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// A tile record: its full extent and the item it hosts, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub region: Region,
    pub item: Option<ItemId>,
}

impl Tile {
    /// An empty unit placeholder covering one cell.
    pub fn placeholder(region: Region) -> Self {
        Self { region, item: None }
    }

    pub fn is_filled(&self) -> bool {
        self.item.is_some()
    }
}

struct Slot {
    generation: u32,
    tile: Option<Tile>,
}

/// Storage for every live tile of one grid.
pub(crate) struct TileArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl TileArena {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store a tile and return its handle.
    pub fn insert(&mut self, tile: Tile) -> TileId {
        if let Some(slot) = self.free.pop() {
            let entry = &mut self.slots[slot as usize];
            entry.tile = Some(tile);
            TileId {
                slot,
                generation: entry.generation,
            }
        } else {
            let slot = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                tile: Some(tile),
            });
            TileId { slot, generation: 0 }
        }
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.slots
            .get(id.slot as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.tile.as_ref())
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.slots
            .get_mut(id.slot as usize)
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.tile.as_mut())
    }

    /// Discard a tile. Stale handles are ignored.
    pub fn remove(&mut self, id: TileId) -> Option<Tile> {
        let entry = self.slots.get_mut(id.slot as usize)?;
        if entry.generation != id.generation {
            return None;
        }
        let tile = entry.tile.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.slot);
        Some(tile)
    }

    /// Number of live tiles.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}
