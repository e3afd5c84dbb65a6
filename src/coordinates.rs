use std::convert::From;
use std::fmt;

use crate::directions::CompassPrimary;

/// A grid position. Signed so that stepping off the grid edge is representable and can be
/// rejected by a bounds check rather than wrapping around.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub x: i32,
    pub z: i32,
}

impl GridCoordinate {
    pub fn new(x: i32, z: i32) -> GridCoordinate {
        GridCoordinate { x, z }
    }

    /// The coordinate one cell away in the given direction, whether or not it is on the grid.
    #[inline]
    pub fn offset(self, direction: CompassPrimary) -> GridCoordinate {
        let (dx, dz) = direction.delta();
        GridCoordinate::new(self.x + dx, self.z + dz)
    }
}

impl From<(i32, i32)> for GridCoordinate {
    fn from(x_z_pair: (i32, i32)) -> GridCoordinate {
        GridCoordinate::new(x_z_pair.0, x_z_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_follows_direction_deltas() {
        let c = GridCoordinate::new(2, 2);
        assert_eq!(c.offset(CompassPrimary::North), GridCoordinate::new(2, 3));
        assert_eq!(c.offset(CompassPrimary::East), GridCoordinate::new(3, 2));
        assert_eq!(c.offset(CompassPrimary::South), GridCoordinate::new(2, 1));
        assert_eq!(c.offset(CompassPrimary::West), GridCoordinate::new(1, 2));
    }

    #[test]
    fn offset_can_leave_the_grid() {
        let origin = GridCoordinate::new(0, 0);
        assert_eq!(origin.offset(CompassPrimary::West), GridCoordinate::new(-1, 0));
        assert_eq!(origin.offset(CompassPrimary::South), GridCoordinate::new(0, -1));
    }

    #[test]
    fn from_pair() {
        assert_eq!(GridCoordinate::from((4, 7)), GridCoordinate::new(4, 7));
    }
}
