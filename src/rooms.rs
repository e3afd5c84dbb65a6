use std::fmt;

use error_chain::bail;
use itertools::Itertools;
use log::debug;

use crate::cells::MazeCell;
use crate::coordinates::GridCoordinate;
use crate::errors::*;
use crate::grid::Grid;
use crate::units::SettingsIndex;
use crate::utils::{self, FnvHashMap};

/// Identity of a room. Ids are handed out in creation order and never reused, so a dissolved
/// room's id stays dead.
#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Debug)]
pub struct RoomId(pub(crate) usize);

impl RoomId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A group of cells that share one palette entry and are treated as one open area.
#[derive(Clone, Debug)]
pub struct Room {
    id: RoomId,
    settings_index: SettingsIndex,
    cells: Vec<GridCoordinate>,
}

impl Room {
    pub fn new(id: RoomId, settings_index: SettingsIndex) -> Room {
        Room {
            id,
            settings_index,
            cells: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> RoomId {
        self.id
    }

    #[inline]
    pub fn settings_index(&self) -> SettingsIndex {
        self.settings_index
    }

    #[inline]
    pub fn cells(&self) -> &[GridCoordinate] {
        &self.cells
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, coord: GridCoordinate) -> bool {
        self.cells.contains(&coord)
    }

    /// Make `cell` a member of this room. The cell must not be counted in any other live room.
    pub fn add_cell(&mut self, cell: &mut MazeCell) {
        cell.set_room(self.id);
        self.cells.push(cell.coordinates());
    }

    /// Move every cell of `other` into this room, reassigning their ownership on the grid.
    /// Returns the id of the now empty, dissolved room.
    pub fn assimilate(&mut self, mut other: Room, grid: &mut Grid) -> Result<RoomId> {
        debug_assert_ne!(self.id, other.id);
        for coord in other.cells.drain(..) {
            grid.existing_mut(coord)?.set_room(self.id);
            self.cells.push(coord);
        }
        Ok(other.id)
    }
}

/// The registry of live rooms.
#[derive(Debug)]
pub struct Rooms {
    live: FnvHashMap<RoomId, Room>,
    next_id: usize,
}

impl Default for Rooms {
    fn default() -> Self {
        Rooms::new()
    }
}

impl Rooms {
    pub fn new() -> Rooms {
        Rooms {
            live: utils::fnv_hashmap(16),
            next_id: 0,
        }
    }

    pub fn create(&mut self, settings_index: SettingsIndex) -> RoomId {
        let id = RoomId(self.next_id);
        self.next_id += 1;
        self.live.insert(id, Room::new(id, settings_index));
        debug!("room {} created with settings {:?}", id, settings_index);
        id
    }

    #[inline]
    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.live.get(&id)
    }

    pub fn get_mut(&mut self, id: RoomId) -> Result<&mut Room> {
        self.live
            .get_mut(&id)
            .ok_or_else(|| ErrorKind::UnknownRoom(id).into())
    }

    pub fn settings_of(&self, id: RoomId) -> Result<SettingsIndex> {
        self.get(id)
            .map(Room::settings_index)
            .ok_or_else(|| ErrorKind::UnknownRoom(id).into())
    }

    #[inline]
    pub fn is_live(&self, id: RoomId) -> bool {
        self.live.contains_key(&id)
    }

    /// Fold the `absorb` room into `keep`, dropping `absorb` from the registry.
    ///
    /// Returns the dissolved room's id, or `None` when both ids name the same room and
    /// nothing had to happen.
    pub fn merge(&mut self, keep: RoomId, absorb: RoomId, grid: &mut Grid) -> Result<Option<RoomId>> {
        if keep == absorb {
            return Ok(None);
        }
        if !self.is_live(keep) {
            bail!(ErrorKind::UnknownRoom(keep));
        }
        let absorbed = self.live
            .remove(&absorb)
            .ok_or_else(|| Error::from(ErrorKind::UnknownRoom(absorb)))?;
        let dissolved = self.get_mut(keep)?.assimilate(absorbed, grid)?;
        debug!("room {} assimilated into room {}", dissolved, keep);
        Ok(Some(dissolved))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Live rooms in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.live.values().sorted_by_key(|room| room.id())
    }

    /// Total number of cells across every live room.
    pub fn cells_total(&self) -> usize {
        self.live.values().map(Room::len).sum()
    }
}
