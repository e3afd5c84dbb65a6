//! **maze_rooms** grows room based mazes on a rectangular grid, one step at a time.
//!
//! A `generators::MazeGenerator` walks the grid with a randomized growing tree, splitting it into
//! rooms joined by doors and folding together neighbouring rooms that share a palette entry. A
//! `builders::MazeBuilder` hears about every cell, edge and room as it happens.

pub mod builders;
pub mod cells;
pub mod coordinates;
pub mod directions;
pub mod edges;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grid_traits;
pub mod rooms;
pub mod topology;
pub mod units;
mod utils;
