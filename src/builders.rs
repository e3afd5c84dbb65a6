use crate::coordinates::GridCoordinate;
use crate::edges::Edge;
use crate::rooms::RoomId;
use crate::units::SettingsIndex;

/// Receiver of the structural events of a generation run.
///
/// Callbacks are made synchronously from inside a generation step, so the grid and rooms are
/// mid-update while they run and must not be inspected through the generator from here.
pub trait MazeBuilder {
    /// Whatever the builder wants to keep per cell, e.g. an id in a scene graph.
    type Handle;

    fn on_cell_created(&mut self, coords: GridCoordinate, room: RoomId) -> Self::Handle;

    /// Called once per edge instance: twice for an interior connection, once on the boundary.
    fn on_edge_created(&mut self, _edge: &Edge) {}

    fn on_room_created(&mut self, _room: RoomId, _settings: SettingsIndex) {}

    fn on_room_dissolved(&mut self, _room: RoomId) {}
}

#[derive(Debug, Default, Copy, Clone)]
pub struct NullBuilder;

impl MazeBuilder for NullBuilder {
    type Handle = ();

    fn on_cell_created(&mut self, _: GridCoordinate, _: RoomId) {}
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum MazeEvent {
    CellCreated { coords: GridCoordinate, room: RoomId },
    EdgeCreated(Edge),
    RoomCreated { room: RoomId, settings: SettingsIndex },
    RoomDissolved(RoomId),
}

/// Records every event in the order it was emitted. Cell handles are the position of the cell's
/// creation event in the log.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<MazeEvent>,
}

impl EventLog {
    pub fn new() -> EventLog {
        EventLog { events: Vec::new() }
    }

    #[inline]
    pub fn events(&self) -> &[MazeEvent] {
        &self.events
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.events.iter().filter_map(|event| match *event {
            MazeEvent::EdgeCreated(ref edge) => Some(edge),
            _ => None,
        })
    }
}

impl MazeBuilder for EventLog {
    type Handle = usize;

    fn on_cell_created(&mut self, coords: GridCoordinate, room: RoomId) -> usize {
        self.events.push(MazeEvent::CellCreated { coords, room });
        self.events.len() - 1
    }

    fn on_edge_created(&mut self, edge: &Edge) {
        self.events.push(MazeEvent::EdgeCreated(*edge));
    }

    fn on_room_created(&mut self, room: RoomId, settings: SettingsIndex) {
        self.events.push(MazeEvent::RoomCreated { room, settings });
    }

    fn on_room_dissolved(&mut self, room: RoomId) {
        self.events.push(MazeEvent::RoomDissolved(room));
    }
}
