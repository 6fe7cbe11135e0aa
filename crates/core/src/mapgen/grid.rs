//! Walkability buffer with bounds-checked cell access.

use serde::Serialize;

use crate::error::MapGenError;
use crate::types::Cell;

/// `width × height` walkability matrix; `true` is floor, `false` is obstacle.
/// Not deserializable: `walkable` must always equal the number of `true` cells.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    walkable: usize,
}

impl Grid {
    /// Creates an all-obstacle grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![false; width * height], walkable: 0 }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height
    }

    pub(crate) fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell).then(|| (cell.y as usize) * self.width + (cell.x as usize))
    }

    fn checked_index(&self, cell: Cell) -> Result<usize, MapGenError> {
        self.index(cell).ok_or(MapGenError::OutOfBounds {
            cell,
            width: self.width,
            height: self.height,
        })
    }

    /// Sets one cell and returns its previous state.
    pub fn set(&mut self, cell: Cell, walkable: bool) -> Result<bool, MapGenError> {
        let index = self.checked_index(cell)?;
        let previous = self.cells[index];
        match (previous, walkable) {
            (false, true) => self.walkable += 1,
            (true, false) => self.walkable -= 1,
            _ => {}
        }
        self.cells[index] = walkable;
        Ok(previous)
    }

    pub fn is_walkable(&self, cell: Cell) -> Result<bool, MapGenError> {
        Ok(self.cells[self.checked_index(cell)?])
    }

    /// Out-of-bounds cells read as obstacles.
    pub fn walkable_or_false(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|index| self.cells[index])
    }

    pub fn walkable_count(&self) -> usize {
        self.walkable
    }

    pub fn is_border(&self, cell: Cell) -> bool {
        self.contains(cell)
            && (cell.x == 0
                || cell.y == 0
                || cell.x as usize == self.width - 1
                || cell.y as usize == self.height - 1)
    }

    /// Every cell in row-major order (`y` outer, `x` inner).
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Cell::new(x as i32, y as i32)))
    }

    pub fn walkable_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells().filter(|&cell| self.walkable_or_false(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_fully_solid() {
        let grid = Grid::new(6, 4);
        assert_eq!(grid.walkable_count(), 0);
        assert!(grid.cells().all(|cell| !grid.walkable_or_false(cell)));
        assert_eq!(grid.cells().count(), 24);
    }

    #[test]
    fn set_tracks_walkable_count_and_previous_state() {
        let mut grid = Grid::new(5, 5);
        let cell = Cell::new(2, 3);
        assert_eq!(grid.set(cell, true), Ok(false));
        assert_eq!(grid.set(cell, true), Ok(true));
        assert_eq!(grid.walkable_count(), 1);
        assert_eq!(grid.is_walkable(cell), Ok(true));
        assert_eq!(grid.set(cell, false), Ok(true));
        assert_eq!(grid.walkable_count(), 0);
    }

    #[test]
    fn out_of_bounds_access_is_reported() {
        let mut grid = Grid::new(3, 2);
        for cell in [Cell::new(-1, 0), Cell::new(3, 0), Cell::new(0, 2), Cell::new(0, -5)] {
            assert_eq!(
                grid.set(cell, true),
                Err(MapGenError::OutOfBounds { cell, width: 3, height: 2 })
            );
            assert!(grid.is_walkable(cell).is_err());
            assert!(!grid.walkable_or_false(cell));
        }
    }

    #[test]
    fn serialized_grid_carries_dimensions_cells_and_count() {
        let mut grid = Grid::new(2, 2);
        grid.set(Cell::new(1, 0), true).expect("in bounds");
        let json = serde_json::to_value(&grid).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "width": 2,
                "height": 2,
                "cells": [false, true, false, false],
                "walkable": 1
            })
        );
    }

    #[test]
    fn border_detection_covers_all_four_edges() {
        let grid = Grid::new(4, 3);
        let border = grid.cells().filter(|&cell| grid.is_border(cell)).count();
        assert_eq!(border, 4 + 4 + 1 + 1);
        assert!(!grid.is_border(Cell::new(1, 1)));
        assert!(!grid.is_border(Cell::new(9, 9)));
    }
}
