use serde::{Deserialize, Serialize};

/// One grid coordinate. `x` grows along the width, `y` along the height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, offset: CellOffset) -> Self {
        Self { x: self.x + offset.dx, y: self.y + offset.dy }
    }

    pub fn step(self, direction: Direction) -> Self {
        self.offset(direction.delta())
    }

    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Self) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellOffset {
    pub dx: i32,
    pub dy: i32,
}

impl CellOffset {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn length_squared(self) -> i64 {
        i64::from(self.dx) * i64::from(self.dx) + i64::from(self.dy) * i64::from(self.dy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    pub const fn delta(self) -> CellOffset {
        match self {
            Self::North => CellOffset::new(0, 1),
            Self::East => CellOffset::new(1, 0),
            Self::South => CellOffset::new(0, -1),
            Self::West => CellOffset::new(-1, 0),
        }
    }

    /// Unit offset across the direction of travel.
    pub const fn perpendicular(self) -> CellOffset {
        match self {
            Self::North | Self::South => CellOffset::new(1, 0),
            Self::East | Self::West => CellOffset::new(0, 1),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    pub const ALL: [Self; 2] = [Self::Blue, Self::Red];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perpendicular_is_orthogonal_to_travel() {
        for direction in Direction::ALL {
            let delta = direction.delta();
            let across = direction.perpendicular();
            assert_eq!(delta.dx * across.dx + delta.dy * across.dy, 0, "{direction:?}");
        }
    }

    #[test]
    fn distance_matches_pythagoras() {
        let a = Cell::new(1, 2);
        let b = Cell::new(4, 6);
        assert_eq!(a.distance_squared(b), 25);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }
}
