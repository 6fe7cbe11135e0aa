//! Public data models for generated maps and their placements.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use super::grid::Grid;
use crate::error::MapGenError;
use crate::types::{Cell, Team};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnOutcome {
    /// No player existed; the host should create one here.
    Spawned(Cell),
    /// The existing player moves from `from` to `to`.
    Relocated { from: Cell, to: Cell },
}

impl SpawnOutcome {
    pub fn cell(self) -> Cell {
        match self {
            Self::Spawned(cell) | Self::Relocated { to: cell, .. } => cell,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TeamSpawn {
    pub team: Team,
    pub base: Cell,
    pub companion: Option<Cell>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementStage {
    Objects,
    TeamBases,
    Companion(Team),
}

/// A placement the generator skipped instead of failing the whole map.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacementIssue {
    pub stage: PlacementStage,
    pub error: MapGenError,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneratedMap {
    pub seed: u64,
    pub grid: Grid,
    /// Walkable cells in registry order.
    pub floor_cells: Vec<Cell>,
    pub spawn: SpawnOutcome,
    pub objects: Vec<Cell>,
    pub teams: Vec<TeamSpawn>,
    pub issues: Vec<PlacementIssue>,
}

impl GeneratedMap {
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.grid.walkable_or_false(cell)
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        fn push_cell(bytes: &mut Vec<u8>, cell: Cell) {
            bytes.extend(cell.x.to_le_bytes());
            bytes.extend(cell.y.to_le_bytes());
        }

        let mut bytes = Vec::new();
        bytes.extend(self.seed.to_le_bytes());
        bytes.extend((self.width() as u32).to_le_bytes());
        bytes.extend((self.height() as u32).to_le_bytes());
        for cell in self.grid.cells() {
            bytes.push(u8::from(self.grid.walkable_or_false(cell)));
        }

        bytes.extend((self.floor_cells.len() as u32).to_le_bytes());
        for &cell in &self.floor_cells {
            push_cell(&mut bytes, cell);
        }

        match self.spawn {
            SpawnOutcome::Spawned(cell) => {
                bytes.push(0);
                push_cell(&mut bytes, cell);
            }
            SpawnOutcome::Relocated { from, to } => {
                bytes.push(1);
                push_cell(&mut bytes, from);
                push_cell(&mut bytes, to);
            }
        }

        bytes.extend((self.objects.len() as u32).to_le_bytes());
        for &cell in &self.objects {
            push_cell(&mut bytes, cell);
        }

        bytes.extend((self.teams.len() as u32).to_le_bytes());
        for team in &self.teams {
            bytes.push(match team.team {
                Team::Blue => 0,
                Team::Red => 1,
            });
            push_cell(&mut bytes, team.base);
            match team.companion {
                Some(cell) => {
                    bytes.push(1);
                    push_cell(&mut bytes, cell);
                }
                None => bytes.push(0),
            }
        }

        bytes.extend((self.issues.len() as u32).to_le_bytes());
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// One text row per grid row, top row first (`y = height - 1`).
    ///
    /// `#` obstacle, `.` floor, `@` player, `o` object, `B`/`R` team bases,
    /// `c` companions.
    pub fn render_ascii(&self) -> String {
        let mut rows = Vec::with_capacity(self.height());
        for y in (0..self.height() as i32).rev() {
            let mut row = String::with_capacity(self.width());
            for x in 0..self.width() as i32 {
                row.push(self.glyph(Cell::new(x, y)));
            }
            rows.push(row);
        }
        rows.join("\n")
    }

    fn glyph(&self, cell: Cell) -> char {
        if self.spawn.cell() == cell {
            return '@';
        }
        if self.objects.contains(&cell) {
            return 'o';
        }
        for team in &self.teams {
            if team.base == cell {
                return match team.team {
                    Team::Blue => 'B',
                    Team::Red => 'R',
                };
            }
            if team.companion == Some(cell) {
                return 'c';
            }
        }
        if self.grid.walkable_or_false(cell) { '.' } else { '#' }
    }
}
