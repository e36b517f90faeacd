// Link registry: which grids may exchange regions by drag and drop.

use std::collections::{BTreeSet, HashMap};

use crate::error::GridError;
use crate::grid::GridId;

/// Symmetric link sets keyed by grid id.
///
/// Every registered grid's set contains the grid itself, and `a ∈ links[b]`
/// iff `b ∈ links[a]`.
#[derive(Debug, Default)]
pub struct LinkRegistry {
    links: HashMap<GridId, BTreeSet<GridId>>,
}

impl LinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a grid with a link set holding only itself.
    pub fn register(&mut self, id: GridId) {
        self.links.entry(id).or_insert_with(|| BTreeSet::from([id]));
    }

    /// Drop a grid and every link pointing at it.
    pub fn deregister(&mut self, id: GridId) {
        if let Some(peers) = self.links.remove(&id) {
            for peer in peers {
                if let Some(set) = self.links.get_mut(&peer) {
                    set.remove(&id);
                }
            }
        }
    }

    pub fn contains(&self, id: GridId) -> bool {
        self.links.contains_key(&id)
    }

    /// Link two grids both ways. Linking a grid to itself is a no-op.
    pub fn link(&mut self, a: GridId, b: GridId) -> Result<(), GridError> {
        self.require(a)?;
        self.require(b)?;
        if a == b {
            return Ok(());
        }
        self.links.entry(a).or_default().insert(b);
        self.links.entry(b).or_default().insert(a);
        log::debug!("linked grids {} and {}", a.short(), b.short());
        Ok(())
    }

    /// Remove the link between two grids both ways. The self-entry stays.
    pub fn unlink(&mut self, a: GridId, b: GridId) -> Result<(), GridError> {
        self.require(a)?;
        self.require(b)?;
        if a == b {
            return Ok(());
        }
        if let Some(set) = self.links.get_mut(&a) {
            set.remove(&b);
        }
        if let Some(set) = self.links.get_mut(&b) {
            set.remove(&a);
        }
        log::debug!("unlinked grids {} and {}", a.short(), b.short());
        Ok(())
    }

    /// Resolve `origin` as seen from grid `from`: known only if linked (or equal).
    pub fn resolve(&self, from: GridId, origin: GridId) -> Option<GridId> {
        self.links.get(&from)?.get(&origin).copied()
    }

    pub fn is_linked(&self, a: GridId, b: GridId) -> bool {
        self.resolve(a, b).is_some()
    }

    /// Every grid in `id`'s link set, itself included, in id order.
    pub fn linked(&self, id: GridId) -> Vec<GridId> {
        self.links
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn require(&self, id: GridId) -> Result<(), GridError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(GridError::UnknownGrid(id))
        }
    }
}
