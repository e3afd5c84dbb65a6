use crate::coordinates::GridCoordinate;
use crate::directions::CompassPrimary;
use crate::units::WallVariant;

/// The plain tag of an edge, without any per-kind payload.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub enum EdgeKind {
    Passage,
    Door,
    Wall,
}

/// Which side of a door an edge instance is. The cell that discovered its neighbour through the
/// door holds the `Front`; the mirror on the neighbour holds the `Back`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum DoorSide {
    Front,
    Back,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Connection {
    Passage,
    Door { side: DoorSide },
    Wall { variant: WallVariant },
}

/// One edge instance, bound to exactly one `(cell, direction)` slot.
///
/// An interior edge has a mirror instance of the same kind on `(neighbour, direction.opposite())`.
/// A boundary edge has no neighbour and is always a wall.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Edge {
    cell: GridCoordinate,
    direction: CompassPrimary,
    neighbour: Option<GridCoordinate>,
    connection: Connection,
}

impl Edge {
    pub fn passage(cell: GridCoordinate,
                   direction: CompassPrimary,
                   neighbour: GridCoordinate)
                   -> Edge {
        Edge {
            cell,
            direction,
            neighbour: Some(neighbour),
            connection: Connection::Passage,
        }
    }

    pub fn door(cell: GridCoordinate,
                direction: CompassPrimary,
                neighbour: GridCoordinate,
                side: DoorSide)
                -> Edge {
        Edge {
            cell,
            direction,
            neighbour: Some(neighbour),
            connection: Connection::Door { side },
        }
    }

    pub fn wall(cell: GridCoordinate,
                direction: CompassPrimary,
                neighbour: Option<GridCoordinate>,
                variant: WallVariant)
                -> Edge {
        Edge {
            cell,
            direction,
            neighbour,
            connection: Connection::Wall { variant },
        }
    }

    #[inline]
    pub fn cell(&self) -> GridCoordinate {
        self.cell
    }

    #[inline]
    pub fn direction(&self) -> CompassPrimary {
        self.direction
    }

    /// The cell on the other side, `None` for an edge on the grid boundary.
    #[inline]
    pub fn neighbour(&self) -> Option<GridCoordinate> {
        self.neighbour
    }

    #[inline]
    pub fn connection(&self) -> Connection {
        self.connection
    }

    pub fn kind(&self) -> EdgeKind {
        match self.connection {
            Connection::Passage => EdgeKind::Passage,
            Connection::Door { .. } => EdgeKind::Door,
            Connection::Wall { .. } => EdgeKind::Wall,
        }
    }

    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.neighbour.is_none()
    }

    /// Can the edge be walked through - a passage or a door.
    pub fn is_open(&self) -> bool {
        match self.connection {
            Connection::Passage | Connection::Door { .. } => true,
            Connection::Wall { .. } => false,
        }
    }

    /// The slot holding the mirror instance of this edge.
    pub fn mirror(&self) -> Option<(GridCoordinate, CompassPrimary)> {
        self.neighbour.map(|n| (n, self.direction.opposite()))
    }

    /// For a door, the slot holding the other side of the same door.
    pub fn other_side_of_door(&self) -> Option<(GridCoordinate, CompassPrimary)> {
        match self.connection {
            Connection::Door { .. } => self.mirror(),
            _ => None,
        }
    }
}
