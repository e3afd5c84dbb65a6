use std::fmt;
use std::rc::Rc;

use error_chain::bail;
use rand::Rng;

use crate::cells::MazeCell;
use crate::coordinates::GridCoordinate;
use crate::errors::*;
use crate::grid_traits::GridDisplay;
use crate::rooms::RoomId;
use crate::units::{CellsCount, Depth, Width};

/// Fixed capacity store of maze cells keyed by coordinate.
///
/// Every position starts empty and is filled at most once. Cells are never removed and the grid
/// is never resized.
pub struct Grid {
    width: Width,
    depth: Depth,
    cells: Vec<Option<MazeCell>>,
    cells_count: usize,
    grid_display: Option<Rc<dyn GridDisplay>>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Grid :: width: {:?}, depth: {:?}, cells created: {:?}",
               self.width,
               self.depth,
               self.cells_count)
    }
}

impl Grid {
    pub fn new(width: Width, depth: Depth) -> Grid {
        let positions = width.0 * depth.0;
        Grid {
            width,
            depth,
            cells: vec![None; positions],
            cells_count: 0,
            grid_display: None,
        }
    }

    #[inline]
    pub fn set_grid_display(&mut self, grid_display: Option<Rc<dyn GridDisplay>>) {
        self.grid_display = grid_display;
    }

    #[inline]
    pub fn grid_display(&self) -> &Option<Rc<dyn GridDisplay>> {
        &self.grid_display
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Number of positions on the grid, occupied or not.
    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells created so far.
    #[inline]
    pub fn cells_count(&self) -> CellsCount {
        CellsCount(self.cells_count)
    }

    /// Is the coordinate within `0 <= x < width` and `0 <= z < depth`.
    #[inline]
    pub fn contains(&self, coord: GridCoordinate) -> bool {
        coord.x >= 0 && coord.z >= 0 && (coord.x as usize) < self.width.0 &&
        (coord.z as usize) < self.depth.0
    }

    /// Convert a grid coordinate to a one dimensional row major index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.z as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_coordinate(&self, index: usize) -> GridCoordinate {
        let x = index % self.width.0;
        let z = index / self.width.0;
        GridCoordinate::new(x as i32, z as i32)
    }

    pub fn random_coordinates<R: Rng>(&self, rng: &mut R) -> GridCoordinate {
        GridCoordinate::new(rng.gen_range(0..self.width.0) as i32,
                            rng.gen_range(0..self.depth.0) as i32)
    }

    /// The cell at `coord`, `None` if nothing has been created there yet.
    /// Asking about a coordinate off the grid is an error, not an empty result.
    pub fn get(&self, coord: GridCoordinate) -> Result<Option<&MazeCell>> {
        let index = self.checked_index(coord)?;
        Ok(self.cells[index].as_ref())
    }

    pub fn get_mut(&mut self, coord: GridCoordinate) -> Result<Option<&mut MazeCell>> {
        let index = self.checked_index(coord)?;
        Ok(self.cells[index].as_mut())
    }

    /// The cell at `coord`, which must already exist.
    pub(crate) fn existing_mut(&mut self, coord: GridCoordinate) -> Result<&mut MazeCell> {
        let index = self.checked_index(coord)?;
        self.cells[index]
            .as_mut()
            .ok_or_else(|| ErrorKind::MissingCell(coord).into())
    }

    pub fn create(&mut self, coord: GridCoordinate, room: RoomId) -> Result<&mut MazeCell> {
        let index = self.checked_index(coord)?;
        if self.cells[index].is_some() {
            bail!(ErrorKind::DuplicateCell(coord));
        }
        self.cells_count += 1;
        Ok(self.cells[index].get_or_insert(MazeCell::new(coord, room)))
    }

    /// Is there a cell at `coord`. False for coordinates off the grid.
    pub fn is_occupied(&self, coord: GridCoordinate) -> bool {
        self.coordinate_to_index(coord)
            .map_or(false, |index| self.cells[index].is_some())
    }

    /// Created cells in row major order.
    pub fn iter(&self) -> impl Iterator<Item = &MazeCell> {
        self.cells.iter().filter_map(Option::as_ref)
    }

    /// Every position on the grid is occupied and every edge slot is set.
    pub fn is_complete(&self) -> bool {
        self.cells
            .iter()
            .all(|cell_opt| cell_opt.as_ref().map_or(false, MazeCell::is_fully_initialized))
    }

    fn checked_index(&self, coord: GridCoordinate) -> Result<usize> {
        self.coordinate_to_index(coord)
            .ok_or_else(|| ErrorKind::OutOfBounds(coord).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn grid(w: usize, d: usize) -> Grid {
        Grid::new(Width(w), Depth(d))
    }

    fn gc(x: i32, z: i32) -> GridCoordinate {
        GridCoordinate::new(x, z)
    }

    fn assert_out_of_bounds<T: fmt::Debug>(result: Result<T>, expected: GridCoordinate) {
        match result {
            Err(Error(ErrorKind::OutOfBounds(coord), _)) => assert_eq!(coord, expected),
            other => panic!("expected out of bounds, got {:?}", other),
        }
    }

    #[test]
    fn grid_size() {
        let g = grid(10, 4);
        assert_eq!(g.size(), 40);
        assert_eq!(g.cells_count(), CellsCount(0));
    }

    #[test]
    fn contains_coordinates() {
        let g = grid(3, 2);
        assert!(g.contains(gc(0, 0)));
        assert!(g.contains(gc(2, 1)));
        assert!(!g.contains(gc(3, 1)));
        assert!(!g.contains(gc(2, 2)));
        assert!(!g.contains(gc(-1, 0)));
        assert!(!g.contains(gc(0, -1)));
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = grid(3, 3);
        let coords = &[gc(0, 0), gc(1, 0), gc(2, 0), gc(0, 1), gc(1, 1), gc(2, 1), gc(0, 2),
                       gc(1, 2), gc(2, 2)];
        let indices: Vec<Option<usize>> =
            coords.iter().map(|coord| g.coordinate_to_index(*coord)).collect();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);
        for (i, coord) in coords.iter().enumerate() {
            assert_eq!(g.index_to_coordinate(i), *coord);
        }

        assert_eq!(g.coordinate_to_index(gc(2, 3)), None);
        assert_eq!(g.coordinate_to_index(gc(3, 2)), None);
        assert_eq!(g.coordinate_to_index(gc(i32::MIN, i32::MAX)), None);
    }

    #[test]
    fn random_coordinates_are_on_the_grid() {
        let g = grid(4, 7);
        let mut rng = XorShiftRng::seed_from_u64(3);
        for _ in 0..1000 {
            assert!(g.contains(g.random_coordinates(&mut rng)));
        }
    }

    #[test]
    fn get_is_empty_until_created() {
        let mut g = grid(2, 2);
        assert!(g.get(gc(1, 1)).unwrap().is_none());
        assert!(!g.is_occupied(gc(1, 1)));

        g.create(gc(1, 1), RoomId(4)).expect("create failed");
        let cell = g.get(gc(1, 1)).unwrap().expect("cell should exist");
        assert_eq!(cell.coordinates(), gc(1, 1));
        assert_eq!(cell.room(), RoomId(4));
        assert!(g.is_occupied(gc(1, 1)));
        assert_eq!(g.cells_count(), CellsCount(1));
    }

    #[test]
    fn get_off_grid_is_an_error() {
        let mut g = grid(2, 2);
        assert_out_of_bounds(g.get(gc(2, 0)), gc(2, 0));
        assert_out_of_bounds(g.get_mut(gc(0, -1)), gc(0, -1));
    }

    #[test]
    fn create_off_grid_is_an_error() {
        let mut g = grid(2, 2);
        assert_out_of_bounds(g.create(gc(5, 5), RoomId(0)).map(|_| ()), gc(5, 5));
        assert_eq!(g.cells_count(), CellsCount(0));
    }

    #[test]
    fn duplicate_create_is_an_error() {
        let mut g = grid(2, 2);
        g.create(gc(0, 1), RoomId(0)).expect("create failed");
        match g.create(gc(0, 1), RoomId(1)) {
            Err(Error(ErrorKind::DuplicateCell(coord), _)) => assert_eq!(coord, gc(0, 1)),
            other => panic!("expected duplicate cell, got {:?}", other.map(|_| ())),
        }
        assert_eq!(g.get(gc(0, 1)).unwrap().unwrap().room(), RoomId(0));
        assert_eq!(g.cells_count(), CellsCount(1));
    }

    #[test]
    fn cell_iter_is_row_major() {
        let mut g = grid(2, 2);
        g.create(gc(1, 1), RoomId(0)).unwrap();
        g.create(gc(0, 0), RoomId(0)).unwrap();
        g.create(gc(1, 0), RoomId(0)).unwrap();
        let coords: Vec<GridCoordinate> = g.iter().map(MazeCell::coordinates).collect();
        assert_eq!(coords, vec![gc(0, 0), gc(1, 0), gc(1, 1)]);
    }

    #[test]
    fn incomplete_until_every_cell_exists() {
        let g = grid(1, 1);
        assert!(!g.is_complete());
    }
}
