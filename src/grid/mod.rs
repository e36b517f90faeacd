// Tile grid engine: tile map, occupancy, and pixel geometry of a single grid.

pub mod arena;
pub mod geometry;
pub mod model;
pub mod occupancy;
pub mod region;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use arena::{Tile, TileId};
pub use geometry::{Rect, TileGeometry};
pub use model::{GridModel, PendingDrop};
pub use region::{FillState, ItemId, Region, TilePos};

/// Process-unique identity of a grid, minted at construction (UUIDv4).
///
/// Serializes as the hyphenated UUID string, which is the form carried by
/// transfer payloads.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridId(uuid::Uuid);

impl GridId {
    /// Mint a new random id.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse the hyphenated (or simple hex) UUID form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        uuid::Uuid::parse_str(s).map(Self)
    }

    /// First 8 hex characters, for log lines only.
    pub fn short(&self) -> String {
        self.0.as_simple().to_string()[..8].to_string()
    }
}

impl Default for GridId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl fmt::Debug for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GridId({})", self.short())
    }
}
