// `error_chain!` creates the Error, ErrorKind, ResultExt and Result types for the library.
// Everything other than `InvalidConfiguration` and `GenerationFinished` is an invariant violation:
// the generator checks bounds and occupancy before acting, so these only surface on a defect.
use error_chain::*;

use crate::coordinates::GridCoordinate;
use crate::directions::CompassPrimary;
use crate::rooms::RoomId;

error_chain! {
    errors {
        InvalidConfiguration(reason: String) {
            description("invalid maze configuration")
            display("invalid maze configuration: {}", reason)
        }
        OutOfBounds(coord: GridCoordinate) {
            description("grid coordinate out of bounds")
            display("grid coordinate {} is out of bounds", coord)
        }
        DuplicateCell(coord: GridCoordinate) {
            description("cell already exists")
            display("a cell already exists at {}", coord)
        }
        MissingCell(coord: GridCoordinate) {
            description("no cell at coordinate")
            display("no cell has been created at {}", coord)
        }
        EdgeAlreadySet(coord: GridCoordinate, direction: CompassPrimary) {
            description("edge slot already initialized")
            display("the {:?} edge of cell {} is already initialized", direction, coord)
        }
        UnknownRoom(room: RoomId) {
            description("room is not live")
            display("room {} is not a live room", room)
        }
        GenerationFinished {
            description("maze generation has already finished")
            display("maze generation has already finished")
        }
    }
}
