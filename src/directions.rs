use smallvec::SmallVec;

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub enum CompassPrimary {
    North,
    East,
    South,
    West,
}

pub type DirectionSmallVec = SmallVec<[CompassPrimary; 4]>;

pub const DIRECTIONS_COUNT: usize = 4;

const DIRECTIONS: [CompassPrimary; DIRECTIONS_COUNT] = [CompassPrimary::North,
                                                        CompassPrimary::East,
                                                        CompassPrimary::South,
                                                        CompassPrimary::West];

// (dx, dz) indexed by `CompassPrimary::index`
const DELTAS: [(i32, i32); DIRECTIONS_COUNT] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

impl CompassPrimary {
    /// Every direction in a fixed order: North, East, South, West.
    #[inline]
    pub fn all() -> &'static [CompassPrimary; DIRECTIONS_COUNT] {
        &DIRECTIONS
    }

    /// Position of this direction in `all()`, used as the edge slot index of a cell.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            CompassPrimary::North => 0,
            CompassPrimary::East => 1,
            CompassPrimary::South => 2,
            CompassPrimary::West => 3,
        }
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<CompassPrimary> {
        DIRECTIONS.get(index).cloned()
    }

    /// Unit offset `(dx, dz)` of a single step in this direction.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        DELTAS[self.index()]
    }

    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        DIRECTIONS[(self.index() + DIRECTIONS_COUNT / 2) % DIRECTIONS_COUNT]
    }
}
