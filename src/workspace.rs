// Workspace: owns every grid and the link registry they share.

use std::collections::HashMap;

use crate::config::types::Config;
use crate::error::GridError;
use crate::grid::{GridId, GridModel};
use crate::transfer::registry::LinkRegistry;

/// The set of grids a host manages together.
///
/// Cross-grid operations take `&mut Workspace`, so a transfer is never
/// validated against links that are being changed at the same time.
#[derive(Default)]
pub struct Workspace {
    grids: HashMap<GridId, GridModel>,
    links: LinkRegistry,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a grid and register it. Returns its id.
    pub fn add_grid(&mut self, grid: GridModel) -> GridId {
        let id = grid.id();
        self.links.register(id);
        self.grids.insert(id, grid);
        log::debug!("workspace: added grid {}", id.short());
        id
    }

    /// Build a grid from config and add it.
    pub fn create_grid(&mut self, config: &Config) -> GridId {
        self.add_grid(GridModel::from_config(config))
    }

    /// Remove a grid and its links, handing it back to the caller.
    pub fn remove_grid(&mut self, id: GridId) -> Option<GridModel> {
        let grid = self.grids.remove(&id)?;
        self.links.deregister(id);
        if let Some(pending) = grid.pending_drop() {
            log::warn!("workspace: grid {} removed while {} was pending", id.short(), pending.item);
        }
        Some(grid)
    }

    pub fn grid(&self, id: GridId) -> Result<&GridModel, GridError> {
        self.grids.get(&id).ok_or(GridError::UnknownGrid(id))
    }

    pub fn grid_mut(&mut self, id: GridId) -> Result<&mut GridModel, GridError> {
        self.grids.get_mut(&id).ok_or(GridError::UnknownGrid(id))
    }

    /// Ids of every grid, in id order.
    pub fn grid_ids(&self) -> Vec<GridId> {
        let mut ids: Vec<GridId> = self.grids.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn grid_count(&self) -> usize {
        self.grids.len()
    }

    pub fn link(&mut self, a: GridId, b: GridId) -> Result<(), GridError> {
        self.links.link(a, b)
    }

    pub fn unlink(&mut self, a: GridId, b: GridId) -> Result<(), GridError> {
        self.links.unlink(a, b)
    }

    /// Every grid linked with `id`, itself included.
    pub fn linked_grids(&self, id: GridId) -> Vec<GridId> {
        self.links.linked(id)
    }

    pub fn links(&self) -> &LinkRegistry {
        &self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileGeometry;

    #[test]
    fn added_grid_is_reachable_and_self_linked() {
        let mut ws = Workspace::new();
        let id = ws.add_grid(GridModel::new(2, 2, TileGeometry::default()));
        assert_eq!(ws.grid(id).unwrap().row_count(), 2);
        assert_eq!(ws.linked_grids(id), vec![id]);
        assert_eq!(ws.grid_count(), 1);
    }

    #[test]
    fn create_grid_uses_config_dimensions() {
        let mut ws = Workspace::new();
        let id = ws.create_grid(&Config::default());
        let grid = ws.grid(id).unwrap();
        assert_eq!((grid.row_count(), grid.column_count()), (6, 5));
    }

    #[test]
    fn unknown_grid_lookup_fails() {
        let mut ws = Workspace::new();
        let id = GridId::new();
        assert_eq!(ws.grid(id).err(), Some(GridError::UnknownGrid(id)));
        assert!(ws.grid_mut(id).is_err());
    }

    #[test]
    fn remove_grid_drops_its_links() {
        let mut ws = Workspace::new();
        let a = ws.add_grid(GridModel::new(1, 1, TileGeometry::default()));
        let b = ws.add_grid(GridModel::new(1, 1, TileGeometry::default()));
        ws.link(a, b).unwrap();
        assert!(ws.remove_grid(b).is_some());
        assert_eq!(ws.linked_grids(a), vec![a]);
        assert!(ws.remove_grid(b).is_none());
    }

    #[test]
    fn grid_ids_are_sorted() {
        let mut ws = Workspace::new();
        for _ in 0..4 {
            ws.add_grid(GridModel::new(1, 1, TileGeometry::default()));
        }
        let ids = ws.grid_ids();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
