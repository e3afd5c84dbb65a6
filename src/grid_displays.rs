use std::collections::HashMap;
use std::fmt;

use crate::cells::MazeCell;
use crate::coordinates::GridCoordinate;
use crate::directions::CompassPrimary;
use crate::edges::EdgeKind;
use crate::grid::Grid;
use crate::grid_traits::GridDisplay;
use crate::rooms::{RoomId, Rooms};
use crate::units::SettingsIndex;
use crate::utils::{self, FnvHashMap};

const DEFAULT_CELL_BODY: &str = "   ";

/// Shows the palette entry of each cell's room.
#[derive(Debug)]
pub struct RoomDisplay {
    settings: FnvHashMap<RoomId, SettingsIndex>,
}

impl RoomDisplay {
    pub fn new(rooms: &Rooms) -> RoomDisplay {
        let mut settings = utils::fnv_hashmap(rooms.len());
        for room in rooms.iter() {
            settings.insert(room.id(), room.settings_index());
        }
        RoomDisplay { settings }
    }
}

impl GridDisplay for RoomDisplay {
    fn render_cell_body(&self, cell: &MazeCell) -> String {
        match self.settings.get(&cell.room()) {
            Some(&SettingsIndex(index)) => format!("{:^3}", index),
            None => String::from(DEFAULT_CELL_BODY),
        }
    }
}

/// Shows how many times the walk came back to a cell.
#[derive(Debug, Default, Copy, Clone)]
pub struct BacktrackDisplay;

impl GridDisplay for BacktrackDisplay {
    fn render_cell_body(&self, cell: &MazeCell) -> String {
        match cell.backtrack_count() {
            0 => String::from(DEFAULT_CELL_BODY),
            count => format!("{:^3x}", count),
        }
    }
}

#[derive(Debug)]
pub struct DistancesDisplay {
    distances: HashMap<GridCoordinate, usize>,
}

impl DistancesDisplay {
    pub fn new(distances: HashMap<GridCoordinate, usize>) -> DistancesDisplay {
        DistancesDisplay { distances }
    }
}

impl GridDisplay for DistancesDisplay {
    fn render_cell_body(&self, cell: &MazeCell) -> String {
        if let Some(d) = self.distances.get(&cell.coordinates()) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from(DEFAULT_CELL_BODY)
        }
    }
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
enum Segment {
    Open,
    Door,
    Wall,
}

impl Segment {
    fn is_closed(self) -> bool {
        self != Segment::Open
    }
}

impl Grid {
    // The edge between a cell and the position in `direction`, read from whichever side has it.
    // Anything not known to be open is drawn closed.
    fn segment(&self, coord: GridCoordinate, direction: CompassPrimary) -> Segment {
        let from_side = |c: GridCoordinate, d: CompassPrimary| {
            self.get(c)
                .ok()
                .and_then(|cell| cell)
                .and_then(|cell| cell.edge(d))
                .map(|edge| edge.kind())
        };
        let kind = from_side(coord, direction)
            .or_else(|| from_side(coord.offset(direction), direction.opposite()));
        match kind {
            Some(EdgeKind::Passage) => Segment::Open,
            Some(EdgeKind::Door) => Segment::Door,
            Some(EdgeKind::Wall) | None => Segment::Wall,
        }
    }

    // Horizontal line `k` runs along the south side of row `k`, `k == depth` is the north boundary.
    fn horizontal_segment(&self, x: usize, k: usize) -> Segment {
        if k == self.depth().0 {
            self.segment(GridCoordinate::new(x as i32, k as i32 - 1), CompassPrimary::North)
        } else {
            self.segment(GridCoordinate::new(x as i32, k as i32), CompassPrimary::South)
        }
    }

    // Vertical line `j` runs along the west side of column `j`, `j == width` is the east boundary.
    fn vertical_segment(&self, j: usize, z: usize) -> Segment {
        if j == self.width().0 {
            self.segment(GridCoordinate::new(j as i32 - 1, z as i32), CompassPrimary::East)
        } else {
            self.segment(GridCoordinate::new(j as i32, z as i32), CompassPrimary::West)
        }
    }

    fn corner(&self, j: usize, k: usize) -> &'static str {
        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";

        let left = j > 0 && self.horizontal_segment(j - 1, k).is_closed();
        let right = j < self.width().0 && self.horizontal_segment(j, k).is_closed();
        let up = k < self.depth().0 && self.vertical_segment(j, k).is_closed();
        let down = k > 0 && self.vertical_segment(j, k - 1).is_closed();

        match (left, right, up, down) {
            (true, true, true, true) => WALL_LRUD,
            (true, true, true, false) => WALL_LRU,
            (true, true, false, true) => WALL_LRD,
            (true, false, true, true) => WALL_LUD,
            (false, true, true, true) => WALL_RUD,
            (true, true, false, false) => WALL_LR,
            (false, false, true, true) => WALL_UD,
            (false, true, true, false) => WALL_RU,
            (true, false, false, true) => WALL_LD,
            (true, false, true, false) => WALL_LU,
            (false, true, false, true) => WALL_RD,
            (true, false, false, false) => WALL_L,
            (false, true, false, false) => WALL_R,
            (false, false, true, false) => WALL_U,
            (false, false, false, true) => WALL_D,
            (false, false, false, false) => " ",
        }
    }

    fn cell_body(&self, coord: GridCoordinate) -> String {
        let cell = self.get(coord).ok().and_then(|cell| cell);
        match (cell, self.grid_display()) {
            (Some(cell), Some(displayer)) => displayer.render_cell_body(cell),
            _ => String::from(DEFAULT_CELL_BODY),
        }
    }
}

/// North is drawn at the top, so rows are written from the highest `z` down.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        const WALL_LR_3: &str = "───";
        const DOOR_LR_3: &str = "╌╌╌";
        const WALL_UD: &str = "│";
        const DOOR_UD: &str = "╎";

        let width = self.width().0;
        let depth = self.depth().0;
        let mut output = String::new();

        for k in (0..depth + 1).rev() {
            for j in 0..width + 1 {
                output.push_str(self.corner(j, k));
                if j < width {
                    output.push_str(match self.horizontal_segment(j, k) {
                        Segment::Open => DEFAULT_CELL_BODY,
                        Segment::Door => DOOR_LR_3,
                        Segment::Wall => WALL_LR_3,
                    });
                }
            }
            output.push('\n');

            if k > 0 {
                let z = k - 1;
                for j in 0..width + 1 {
                    output.push_str(match self.vertical_segment(j, z) {
                        Segment::Open => " ",
                        Segment::Door => DOOR_UD,
                        Segment::Wall => WALL_UD,
                    });
                    if j < width {
                        output.push_str(&self.cell_body(GridCoordinate::new(j as i32, z as i32)));
                    }
                }
                output.push('\n');
            }
        }

        write!(f, "{}", output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::{DoorSide, Edge};
    use crate::units::{Depth, WallVariant, Width};
    use std::rc::Rc;

    fn gc(x: i32, z: i32) -> GridCoordinate {
        GridCoordinate::new(x, z)
    }

    fn set(grid: &mut Grid, edge: Edge) {
        grid.existing_mut(edge.cell()).unwrap().set_edge(edge).unwrap();
    }

    // A 2x1 grid with boundary walls all round and the given pair between the two cells.
    fn pair_grid(rooms: &mut Rooms, kind: EdgeKind) -> Grid {
        let mut grid = Grid::new(Width(2), Depth(1));
        let a = rooms.create(SettingsIndex(3));
        let b = rooms.create(SettingsIndex(7));
        for &(coord, room) in &[(gc(0, 0), a), (gc(1, 0), b)] {
            let cell = grid.create(coord, room).unwrap();
            rooms.get_mut(room).unwrap().add_cell(cell);
        }
        for &(coord, dir) in &[(gc(0, 0), CompassPrimary::North),
                               (gc(0, 0), CompassPrimary::South),
                               (gc(0, 0), CompassPrimary::West),
                               (gc(1, 0), CompassPrimary::North),
                               (gc(1, 0), CompassPrimary::South),
                               (gc(1, 0), CompassPrimary::East)] {
            set(&mut grid, Edge::wall(coord, dir, None, WallVariant(0)));
        }
        let (east, west) = match kind {
            EdgeKind::Passage => (Edge::passage(gc(0, 0), CompassPrimary::East, gc(1, 0)),
                                  Edge::passage(gc(1, 0), CompassPrimary::West, gc(0, 0))),
            EdgeKind::Door => {
                (Edge::door(gc(0, 0), CompassPrimary::East, gc(1, 0), DoorSide::Front),
                 Edge::door(gc(1, 0), CompassPrimary::West, gc(0, 0), DoorSide::Back))
            }
            EdgeKind::Wall => {
                (Edge::wall(gc(0, 0), CompassPrimary::East, Some(gc(1, 0)), WallVariant(0)),
                 Edge::wall(gc(1, 0), CompassPrimary::West, Some(gc(0, 0)), WallVariant(0)))
            }
        };
        set(&mut grid, east);
        set(&mut grid, west);
        grid
    }

    #[test]
    fn single_walled_cell() {
        let mut grid = Grid::new(Width(1), Depth(1));
        let mut rooms = Rooms::new();
        let room = rooms.create(SettingsIndex(0));
        grid.create(gc(0, 0), room).unwrap();
        for &dir in CompassPrimary::all().iter() {
            set(&mut grid, Edge::wall(gc(0, 0), dir, None, WallVariant(0)));
        }
        assert_eq!(grid.to_string(), "┌───┐\n│   │\n└───┘\n");
    }

    #[test]
    fn passages_are_gaps() {
        let grid = pair_grid(&mut Rooms::new(), EdgeKind::Passage);
        assert_eq!(grid.to_string(), "┌───────┐\n│       │\n└───────┘\n");
    }

    #[test]
    fn doors_are_dashed() {
        let grid = pair_grid(&mut Rooms::new(), EdgeKind::Door);
        assert_eq!(grid.to_string(), "┌───┬───┐\n│   ╎   │\n└───┴───┘\n");
    }

    #[test]
    fn walls_join_the_boundary() {
        let grid = pair_grid(&mut Rooms::new(), EdgeKind::Wall);
        assert_eq!(grid.to_string(), "┌───┬───┐\n│   │   │\n└───┴───┘\n");
    }

    #[test]
    fn north_is_drawn_on_top() {
        let mut grid = Grid::new(Width(1), Depth(2));
        let mut rooms = Rooms::new();
        let room = rooms.create(SettingsIndex(0));
        grid.create(gc(0, 0), room).unwrap();
        grid.create(gc(0, 1), room).unwrap();
        for &(coord, dir) in &[(gc(0, 0), CompassPrimary::South),
                               (gc(0, 0), CompassPrimary::East),
                               (gc(0, 0), CompassPrimary::West),
                               (gc(0, 1), CompassPrimary::North),
                               (gc(0, 1), CompassPrimary::East),
                               (gc(0, 1), CompassPrimary::West)] {
            set(&mut grid, Edge::wall(coord, dir, None, WallVariant(0)));
        }
        set(&mut grid, Edge::passage(gc(0, 0), CompassPrimary::North, gc(0, 1)));
        set(&mut grid, Edge::passage(gc(0, 1), CompassPrimary::South, gc(0, 0)));
        let distances = [(gc(0, 1), 1usize)].iter().cloned().collect();
        grid.set_grid_display(Some(Rc::new(DistancesDisplay::new(distances)) as Rc<dyn GridDisplay>));
        assert_eq!(grid.to_string(), "┌───┐\n│ 1 │\n│   │\n│   │\n└───┘\n");
    }

    #[test]
    fn room_display_shows_settings() {
        let mut rooms = Rooms::new();
        let mut grid = pair_grid(&mut rooms, EdgeKind::Door);
        grid.set_grid_display(Some(Rc::new(RoomDisplay::new(&rooms)) as Rc<dyn GridDisplay>));
        assert_eq!(grid.to_string(), "┌───┬───┐\n│ 3 ╎ 7 │\n└───┴───┘\n");
    }

    #[test]
    fn unresolved_edges_are_drawn_closed() {
        let mut grid = Grid::new(Width(2), Depth(1));
        let mut rooms = Rooms::new();
        let room = rooms.create(SettingsIndex(0));
        grid.create(gc(0, 0), room).unwrap();
        assert_eq!(grid.to_string(), "┌───┬───┐\n│   │   │\n└───┴───┘\n");
    }
}
