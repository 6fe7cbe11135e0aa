//! Live index of walkable cells kept in step with the grid.

use super::grid::Grid;
use super::seed::MapRng;
use crate::types::Cell;

/// Walkable cells as a dense vector plus a per-cell slot table, so inserts,
/// removals and uniform sampling are all O(1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloorRegistry {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    slots: Vec<Option<usize>>,
}

impl FloorRegistry {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: Vec::new(), slots: vec![None; width * height] }
    }

    fn slot_index(&self, cell: Cell) -> Option<usize> {
        let in_bounds = cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height;
        in_bounds.then(|| (cell.y as usize) * self.width + (cell.x as usize))
    }

    /// Returns `false` when the cell was already registered or lies outside.
    pub fn insert(&mut self, cell: Cell) -> bool {
        let Some(slot) = self.slot_index(cell) else {
            return false;
        };
        if self.slots[slot].is_some() {
            return false;
        }
        self.slots[slot] = Some(self.cells.len());
        self.cells.push(cell);
        true
    }

    pub fn remove(&mut self, cell: Cell) -> bool {
        let Some(slot) = self.slot_index(cell) else {
            return false;
        };
        let Some(position) = self.slots[slot].take() else {
            return false;
        };
        self.cells.swap_remove(position);
        if let Some(&moved) = self.cells.get(position) {
            if let Some(moved_slot) = self.slot_index(moved) {
                self.slots[moved_slot] = Some(position);
            }
        }
        true
    }

    /// Drops every cell matching `predicate`, keeping the survivors' relative
    /// order. Returns the removed cells.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(Cell) -> bool) -> Vec<Cell> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.cells.len());
        for cell in self.cells.drain(..) {
            if predicate(cell) {
                removed.push(cell);
            } else {
                kept.push(cell);
            }
        }
        self.cells = kept;
        for &cell in &removed {
            if let Some(slot) = self.slot_index(cell) {
                self.slots[slot] = None;
            }
        }
        for position in 0..self.cells.len() {
            if let Some(slot) = self.slot_index(self.cells[position]) {
                self.slots[slot] = Some(position);
            }
        }
        removed
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.slot_index(cell).is_some_and(|slot| self.slots[slot].is_some())
    }

    pub fn sample(&self, rng: &mut MapRng) -> Option<Cell> {
        if self.cells.is_empty() {
            return None;
        }
        Some(self.cells[rng.below(self.cells.len())])
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Full check that the registry holds exactly the walkable cells of `grid`.
    pub fn matches_grid(&self, grid: &Grid) -> bool {
        grid.width() == self.width
            && grid.height() == self.height
            && self.cells.len() == grid.walkable_count()
            && self.cells.iter().all(|&cell| grid.walkable_or_false(cell))
            && self.cells.iter().enumerate().all(|(position, &cell)| {
                self.slot_index(cell).is_some_and(|slot| self.slots[slot] == Some(position))
            })
    }
}
