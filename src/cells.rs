use error_chain::bail;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::coordinates::GridCoordinate;
use crate::directions::{CompassPrimary, DirectionSmallVec, DIRECTIONS_COUNT};
use crate::edges::Edge;
use crate::errors::*;
use crate::rooms::RoomId;

/// One grid position with a fixed slot per direction.
///
/// Slots start empty and each is filled exactly once during generation. A cell is fully
/// initialized when every slot holds an edge, after which the generator never looks at it again.
#[derive(Clone, Debug)]
pub struct MazeCell {
    coordinates: GridCoordinate,
    room: RoomId,
    edges: [Option<Edge>; DIRECTIONS_COUNT],
    initialized_count: usize,
    backtrack_count: u32,
}

impl MazeCell {
    pub(crate) fn new(coordinates: GridCoordinate, room: RoomId) -> MazeCell {
        MazeCell {
            coordinates,
            room,
            edges: [None; DIRECTIONS_COUNT],
            initialized_count: 0,
            backtrack_count: 0,
        }
    }

    #[inline]
    pub fn coordinates(&self) -> GridCoordinate {
        self.coordinates
    }

    #[inline]
    pub fn room(&self) -> RoomId {
        self.room
    }

    #[inline]
    pub(crate) fn set_room(&mut self, room: RoomId) {
        self.room = room;
    }

    #[inline]
    pub fn edge(&self, direction: CompassPrimary) -> Option<&Edge> {
        self.edges[direction.index()].as_ref()
    }

    /// The edges set so far, in `CompassPrimary::all()` order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter_map(Option::as_ref)
    }

    #[inline]
    pub fn initialized_count(&self) -> usize {
        self.initialized_count
    }

    #[inline]
    pub fn is_initialized(&self, direction: CompassPrimary) -> bool {
        self.edges[direction.index()].is_some()
    }

    #[inline]
    pub fn is_fully_initialized(&self) -> bool {
        self.initialized_count == DIRECTIONS_COUNT
    }

    pub fn uninitialized_directions(&self) -> DirectionSmallVec {
        CompassPrimary::all()
            .iter()
            .cloned()
            .filter(|dir| !self.is_initialized(*dir))
            .collect()
    }

    /// Uniformly pick one of the directions whose slot is still empty.
    pub fn random_uninitialized_direction<R: Rng>(&self, rng: &mut R) -> Option<CompassPrimary> {
        self.uninitialized_directions().choose(rng).cloned()
    }

    /// How many times generation backtracked onto this cell after finishing a later cell.
    #[inline]
    pub fn backtrack_count(&self) -> u32 {
        self.backtrack_count
    }

    #[inline]
    pub(crate) fn record_backtrack(&mut self) {
        self.backtrack_count += 1;
    }

    pub(crate) fn set_edge(&mut self, edge: Edge) -> Result<()> {
        debug_assert_eq!(edge.cell(), self.coordinates);
        let slot = &mut self.edges[edge.direction().index()];
        if slot.is_some() {
            bail!(ErrorKind::EdgeAlreadySet(self.coordinates, edge.direction()));
        }
        *slot = Some(edge);
        self.initialized_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::WallVariant;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn cell() -> MazeCell {
        MazeCell::new(GridCoordinate::new(1, 1), RoomId(0))
    }

    fn boundary_wall(dir: CompassPrimary) -> Edge {
        Edge::wall(GridCoordinate::new(1, 1), dir, None, WallVariant(0))
    }

    #[test]
    fn new_cell_has_empty_slots() {
        let c = cell();
        assert_eq!(c.initialized_count(), 0);
        assert!(!c.is_fully_initialized());
        assert_eq!(c.edges().count(), 0);
        assert_eq!(&*c.uninitialized_directions(), CompassPrimary::all());
    }

    #[test]
    fn setting_edges_counts_up_to_fully_initialized() {
        let mut c = cell();
        for (n, &dir) in CompassPrimary::all().iter().enumerate() {
            c.set_edge(boundary_wall(dir)).expect("slot should be empty");
            assert_eq!(c.initialized_count(), n + 1);
            assert!(c.is_initialized(dir));
        }
        assert!(c.is_fully_initialized());
        assert!(c.uninitialized_directions().is_empty());
    }

    #[test]
    fn slot_cannot_be_set_twice() {
        let mut c = cell();
        c.set_edge(boundary_wall(CompassPrimary::East)).expect("slot should be empty");
        let err = c.set_edge(boundary_wall(CompassPrimary::East)).unwrap_err();
        match *err.kind() {
            ErrorKind::EdgeAlreadySet(coord, dir) => {
                assert_eq!(coord, GridCoordinate::new(1, 1));
                assert_eq!(dir, CompassPrimary::East);
            }
            ref other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(c.initialized_count(), 1);
    }

    #[test]
    fn random_direction_skips_initialized_slots() {
        let mut rng = XorShiftRng::seed_from_u64(11);
        let mut c = cell();
        c.set_edge(boundary_wall(CompassPrimary::North)).unwrap();
        c.set_edge(boundary_wall(CompassPrimary::West)).unwrap();
        for _ in 0..100 {
            let dir = c.random_uninitialized_direction(&mut rng).unwrap();
            assert!(dir == CompassPrimary::East || dir == CompassPrimary::South);
        }
        c.set_edge(boundary_wall(CompassPrimary::East)).unwrap();
        c.set_edge(boundary_wall(CompassPrimary::South)).unwrap();
        assert_eq!(c.random_uninitialized_direction(&mut rng), None);
    }

    #[test]
    fn backtracks_are_counted() {
        let mut c = cell();
        c.record_backtrack();
        c.record_backtrack();
        assert_eq!(c.backtrack_count(), 2);
    }
}
