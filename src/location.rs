use serde::{Deserialize, Serialize};

/// Integer block position in a world.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
    z: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Position { x, y, z }
    }

    #[inline]
    pub fn x(self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(self) -> i32 {
        self.y
    }

    #[inline]
    pub fn z(self) -> i32 {
        self.z
    }

    #[inline]
    pub fn coord(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Copy of this position with one coordinate replaced.
    pub fn with_coord(self, axis: Axis, value: i32) -> Self {
        let mut out = self;
        match axis {
            Axis::X => out.x = value,
            Axis::Y => out.y = value,
            Axis::Z => out.z = value,
        }
        out
    }

    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Position {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Move `steps` blocks along `axis` (negative steps move backwards).
    pub fn step_along(self, axis: Axis, steps: i32) -> Self {
        let value = self.coord(axis) + steps;
        self.with_coord(axis, value)
    }

    pub fn relative(self, direction: Direction) -> Self {
        let (dx, dy, dz) = direction.offset();
        self.offset(dx, dy, dz)
    }

    /// Chebyshev distance (largest per-axis delta).
    pub fn distance_to(self, other: Self) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        let dz = (self.z - other.z).unsigned_abs();
        dx.max(dy).max(dz)
    }

    /// Per-axis absolute deltas to `other`.
    pub fn abs_delta(self, other: Self) -> (u32, u32, u32) {
        (
            (other.x - self.x).unsigned_abs(),
            (other.y - self.y).unsigned_abs(),
            (other.z - self.z).unsigned_abs(),
        )
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// The two axes spanning the plane perpendicular to this one.
    pub fn perpendicular(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

/// One of the six block faces.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Direction::Down => (0, -1, 0),
            Direction::Up => (0, 1, 0),
            Direction::North => (0, 0, -1),
            Direction::South => (0, 0, 1),
            Direction::West => (-1, 0, 0),
            Direction::East => (1, 0, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Down | Direction::Up => Axis::Y,
            Direction::North | Direction::South => Axis::Z,
            Direction::West | Direction::East => Axis::X,
        }
    }

    /// The eight neighbor offsets lying in the plane perpendicular to this
    /// face: four orthogonal and four diagonal.
    pub fn plane_neighbors(self) -> [(i32, i32, i32); 8] {
        let (a, b) = self.axis().perpendicular();
        let mut out = [(0, 0, 0); 8];
        for (slot, &(da, db)) in out.iter_mut().zip(NEIGHBORS_8.iter()) {
            let origin = Position::new(0, 0, 0)
                .step_along(a, da)
                .step_along(b, db);
            *slot = (origin.x(), origin.y(), origin.z());
        }
        out
    }
}

/// Neighbor offsets for 8-directional movement within a plane.
pub const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.opposite().axis(), dir.axis());
        }
    }

    #[test]
    fn test_plane_neighbors_stay_in_plane() {
        for dir in Direction::ALL {
            let neighbors = dir.plane_neighbors();
            let axis = dir.axis();
            for (dx, dy, dz) in neighbors {
                let p = Position::new(dx, dy, dz);
                assert_eq!(p.coord(axis), 0, "{:?} leaked off-plane: {:?}", dir, p);
                assert_eq!(p.distance_to(Position::new(0, 0, 0)), 1);
            }
            let mut unique = neighbors.to_vec();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), 8);
        }
    }

    #[test]
    fn test_distance_is_chebyshev() {
        let a = Position::new(0, 0, 0);
        assert_eq!(a.distance_to(Position::new(3, -1, 2)), 3);
        assert_eq!(a.distance_to(a), 0);
    }

    #[test]
    fn test_relative_moves_one_block() {
        let p = Position::new(5, 5, 5);
        assert_eq!(p.relative(Direction::Up), Position::new(5, 6, 5));
        assert_eq!(p.relative(Direction::West), Position::new(4, 5, 5));
    }
}
