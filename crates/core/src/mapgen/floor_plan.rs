//! Grid plus floor registry behind one mutation path so the two never drift.

use super::grid::Grid;
use super::registry::FloorRegistry;
use crate::error::MapGenError;
use crate::types::Cell;

#[derive(Clone, Debug)]
pub struct FloorPlan {
    grid: Grid,
    registry: FloorRegistry,
}

impl FloorPlan {
    pub fn new(width: usize, height: usize) -> Self {
        Self { grid: Grid::new(width, height), registry: FloorRegistry::new(width, height) }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn registry(&self) -> &FloorRegistry {
        &self.registry
    }

    pub fn walkable_count(&self) -> usize {
        self.grid.walkable_count()
    }

    /// Marks `cell` walkable. Returns whether it was newly carved.
    pub fn carve(&mut self, cell: Cell) -> Result<bool, MapGenError> {
        let was_walkable = self.grid.set(cell, true)?;
        if !was_walkable {
            self.registry.insert(cell);
        }
        self.debug_check_cell(cell, true);
        Ok(!was_walkable)
    }

    /// Like [`Self::carve`] but silently skips cells outside the grid, for brushes
    /// that overhang the edge.
    pub fn carve_clipped(&mut self, cell: Cell) -> bool {
        self.grid.contains(cell) && self.carve(cell).unwrap_or(false)
    }

    /// Turns `cell` into an obstacle. Returns whether it was walkable before.
    pub fn block(&mut self, cell: Cell) -> Result<bool, MapGenError> {
        let was_walkable = self.grid.set(cell, false)?;
        if was_walkable {
            self.registry.remove(cell);
        }
        self.debug_check_cell(cell, false);
        Ok(was_walkable)
    }

    fn debug_check_cell(&self, cell: Cell, walkable: bool) {
        debug_assert_eq!(self.registry.contains(cell), walkable, "registry drifted at {cell:?}");
        debug_assert_eq!(self.registry.len(), self.grid.walkable_count(), "registry size drifted");
    }

    pub fn is_consistent(&self) -> bool {
        self.registry.matches_grid(&self.grid)
    }

    pub fn into_parts(self) -> (Grid, FloorRegistry) {
        (self.grid, self.registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carve_and_block_keep_registry_in_step() {
        let mut plan = FloorPlan::new(5, 5);
        assert_eq!(plan.carve(Cell::new(2, 2)), Ok(true));
        assert_eq!(plan.carve(Cell::new(2, 2)), Ok(false));
        assert_eq!(plan.carve(Cell::new(3, 2)), Ok(true));
        assert!(plan.is_consistent());

        assert_eq!(plan.block(Cell::new(2, 2)), Ok(true));
        assert_eq!(plan.block(Cell::new(2, 2)), Ok(false));
        assert!(plan.is_consistent());
        assert_eq!(plan.registry().as_slice(), &[Cell::new(3, 2)]);
    }

    #[test]
    fn carve_clipped_ignores_cells_off_the_map() {
        let mut plan = FloorPlan::new(3, 3);
        assert!(!plan.carve_clipped(Cell::new(-1, 1)));
        assert!(plan.carve_clipped(Cell::new(0, 0)));
        assert!(plan.carve(Cell::new(3, 0)).is_err());
        assert_eq!(plan.walkable_count(), 1);
    }
}
