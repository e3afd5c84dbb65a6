use error_chain::bail;
use log::{debug, info, trace};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

use crate::builders::{MazeBuilder, NullBuilder};
use crate::cells::MazeCell;
use crate::coordinates::GridCoordinate;
use crate::directions::CompassPrimary;
use crate::edges::{DoorSide, Edge, EdgeKind};
use crate::errors::*;
use crate::grid::Grid;
use crate::rooms::{RoomId, Rooms};
use crate::units::{Depth, PaletteSize, SettingsIndex, WallVariant, Width};
use crate::utils::{self, FnvHashMap};

/// Largest number of cells a grid may have.
pub const MAX_CELLS: usize = 1 << 24;

/// Validated generation settings. Only obtainable through `MazeConfigBuilder::build`.
#[derive(Debug, Copy, Clone)]
pub struct MazeConfig {
    width: Width,
    depth: Depth,
    door_probability: f64,
    palette_size: PaletteSize,
    wall_variants: usize,
    seed: Option<u64>,
}

impl MazeConfig {
    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn depth(&self) -> Depth {
        self.depth
    }

    #[inline]
    pub fn door_probability(&self) -> f64 {
        self.door_probability
    }

    #[inline]
    pub fn palette_size(&self) -> PaletteSize {
        self.palette_size
    }

    #[inline]
    pub fn wall_variants(&self) -> usize {
        self.wall_variants
    }

    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[derive(Debug, Copy, Clone)]
pub struct MazeConfigBuilder {
    width: Width,
    depth: Depth,
    door_probability: f64,
    palette_size: usize,
    wall_variants: usize,
    seed: Option<u64>,
}

impl Default for MazeConfigBuilder {
    fn default() -> Self {
        MazeConfigBuilder::new()
    }
}

impl MazeConfigBuilder {
    pub fn new() -> MazeConfigBuilder {
        MazeConfigBuilder {
            width: Width(20),
            depth: Depth(20),
            door_probability: 0.1,
            palette_size: 4,
            wall_variants: 1,
            seed: None,
        }
    }

    pub fn size(mut self, width: Width, depth: Depth) -> MazeConfigBuilder {
        self.width = width;
        self.depth = depth;
        self
    }

    pub fn door_probability(mut self, probability: f64) -> MazeConfigBuilder {
        self.door_probability = probability;
        self
    }

    pub fn palette_size(mut self, palette_size: usize) -> MazeConfigBuilder {
        self.palette_size = palette_size;
        self
    }

    pub fn wall_variants(mut self, wall_variants: usize) -> MazeConfigBuilder {
        self.wall_variants = wall_variants;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> MazeConfigBuilder {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<MazeConfig> {
        if self.width.0 == 0 || self.depth.0 == 0 {
            bail!(ErrorKind::InvalidConfiguration(format!("grid size {}x{} has no cells",
                                                          self.width.0,
                                                          self.depth.0)));
        }
        let too_large = self.width.0 > i32::MAX as usize || self.depth.0 > i32::MAX as usize ||
                        self.width.0.checked_mul(self.depth.0).map_or(true, |cells| cells > MAX_CELLS);
        if too_large {
            bail!(ErrorKind::InvalidConfiguration(format!("grid size {}x{} is over the {} cell limit",
                                                          self.width.0,
                                                          self.depth.0,
                                                          MAX_CELLS)));
        }
        // written so that NaN fails too
        if !(self.door_probability >= 0.0 && self.door_probability <= 1.0) {
            bail!(ErrorKind::InvalidConfiguration(format!("door probability {} is not within [0, 1]",
                                                          self.door_probability)));
        }
        if self.palette_size == 0 {
            bail!(ErrorKind::InvalidConfiguration(String::from("the room palette is empty")));
        }
        if self.wall_variants == 0 {
            bail!(ErrorKind::InvalidConfiguration(String::from("at least one wall variant is required")));
        }

        Ok(MazeConfig {
            width: self.width,
            depth: self.depth,
            door_probability: self.door_probability,
            palette_size: PaletteSize(self.palette_size),
            wall_variants: self.wall_variants,
            seed: self.seed,
        })
    }
}

/// How a growth step resolved the chosen edge.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum EdgeOutcome {
    /// The direction led off the grid.
    BoundaryWall,
    /// A new cell was created, joined by a passage (same room) or a door (new room).
    NewCell {
        neighbour: GridCoordinate,
        kind: EdgeKind,
        room: RoomId,
    },
    /// An existing neighbour with the same room settings was opened up and its room folded
    /// into the current one.
    Merged {
        neighbour: GridCoordinate,
        dissolved: RoomId,
    },
    /// An existing neighbour in the same room or with different settings was walled off.
    Walled { neighbour: GridCoordinate },
}

#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum GenerationStep {
    Seeded { cell: GridCoordinate, room: RoomId },
    Grew {
        cell: GridCoordinate,
        direction: CompassPrimary,
        outcome: EdgeOutcome,
        /// Fully initialized cells removed from the active list at the end of the step.
        backtracked: usize,
    },
}

/// The generated layout once no active cells remain.
#[derive(Debug)]
pub struct Maze {
    pub grid: Grid,
    pub rooms: Rooms,
}

impl Maze {
    pub fn room_of(&self, coord: GridCoordinate) -> Result<RoomId> {
        self.grid
            .get(coord)?
            .map(MazeCell::room)
            .ok_or_else(|| ErrorKind::MissingCell(coord).into())
    }
}

/// Randomized growing tree maze generation with rooms and doors.
///
/// The generator keeps a stack of active cells and only ever works on the last one. Each growth
/// step picks one of that cell's unresolved directions at random and resolves it:
/// - off the grid it places a boundary wall.
/// - onto an empty position it creates a cell there. Usually the new cell joins the current
///   room through a passage, but with the door probability it starts a new room (with different
///   settings when the palette allows) behind a door.
/// - onto an existing cell with the same room settings but a different room it opens a passage
///   and assimilates that room. This is the only way a cycle can appear.
/// - onto any other existing cell it places a wall, including cells already in the same room.
/// Mirrored edges are set on both cells, so a cell can also be finished by its neighbours' steps.
/// Finished cells are dropped from the stack in the step that finishes or uncovers them, so
/// every growth step resolves a direction and a run takes at most `width * depth * 4` of them.
///
/// Steps are driven one at a time by the caller (`step`), which may pause between them, e.g. to
/// animate progress. `run` drives to completion.
pub struct MazeGenerator<B: MazeBuilder = NullBuilder> {
    config: MazeConfig,
    grid: Grid,
    rooms: Rooms,
    active: Vec<GridCoordinate>,
    rng: XorShiftRng,
    builder: B,
    handles: FnvHashMap<GridCoordinate, B::Handle>,
    seeded: bool,
    growth_steps: usize,
}

impl MazeGenerator<NullBuilder> {
    pub fn without_builder(config: MazeConfig) -> MazeGenerator<NullBuilder> {
        MazeGenerator::new(config, NullBuilder)
    }
}

impl<B: MazeBuilder> MazeGenerator<B> {
    pub fn new(config: MazeConfig, builder: B) -> MazeGenerator<B> {
        let rng = match config.seed() {
            Some(seed) => XorShiftRng::seed_from_u64(seed),
            None => XorShiftRng::from_entropy(),
        };
        MazeGenerator::with_rng(config, rng, builder)
    }

    pub fn with_rng(config: MazeConfig, rng: XorShiftRng, builder: B) -> MazeGenerator<B> {
        let positions = config.width().0 * config.depth().0;
        MazeGenerator {
            config,
            grid: Grid::new(config.width(), config.depth()),
            rooms: Rooms::new(),
            active: Vec::with_capacity(positions),
            rng,
            builder,
            handles: utils::fnv_hashmap(positions),
            seeded: false,
            growth_steps: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn rooms(&self) -> &Rooms {
        &self.rooms
    }

    #[inline]
    pub fn builder(&self) -> &B {
        &self.builder
    }

    #[inline]
    pub fn builder_mut(&mut self) -> &mut B {
        &mut self.builder
    }

    /// The handle the builder returned when the cell at `coords` was created.
    #[inline]
    pub fn handle(&self, coords: GridCoordinate) -> Option<&B::Handle> {
        self.handles.get(&coords)
    }

    /// The active cells, oldest first. The last one is worked on next.
    #[inline]
    pub fn active_cells(&self) -> &[GridCoordinate] {
        &self.active
    }

    /// Growth steps taken so far, not counting the seed step.
    #[inline]
    pub fn growth_steps(&self) -> usize {
        self.growth_steps
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        !self.seeded || !self.active.is_empty()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.seeded && self.active.is_empty()
    }

    /// Perform the seed step if it has not run yet, otherwise one growth step.
    pub fn step(&mut self) -> Result<GenerationStep> {
        if !self.seeded {
            return self.seed_step();
        }
        if self.active.is_empty() {
            bail!(ErrorKind::GenerationFinished);
        }
        let step = self.growth_step()?;
        self.growth_steps += 1;
        trace!("growth step {}: {:?}", self.growth_steps, step);
        if self.active.is_empty() {
            info!("maze generation complete: {} cells, {} rooms, {} growth steps",
                  self.grid.cells_count().0,
                  self.rooms.len(),
                  self.growth_steps);
        }
        Ok(step)
    }

    /// Step until complete. Returns the total number of steps taken by this call.
    pub fn run(&mut self) -> Result<usize> {
        let mut steps = 0;
        while self.has_next() {
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    pub fn into_maze(self) -> Maze {
        self.into_parts().0
    }

    pub fn into_parts(self) -> (Maze, B) {
        (Maze {
            grid: self.grid,
            rooms: self.rooms,
        },
         self.builder)
    }

    fn seed_step(&mut self) -> Result<GenerationStep> {
        let coord = self.grid.random_coordinates(&mut self.rng);
        let settings = self.random_settings(None);
        let room = self.create_room(settings);
        self.create_cell(coord, room)?;
        self.active.push(coord);
        self.seeded = true;
        debug!("maze seeded at {} in room {}", coord, room);
        Ok(GenerationStep::Seeded { cell: coord, room })
    }

    fn growth_step(&mut self) -> Result<GenerationStep> {
        let current = match self.active.last() {
            Some(coord) => *coord,
            None => bail!(ErrorKind::GenerationFinished),
        };
        let (direction, current_room) = {
            let cell = match self.grid.get(current)? {
                Some(cell) => cell,
                None => bail!(ErrorKind::MissingCell(current)),
            };
            match cell.random_uninitialized_direction(&mut self.rng) {
                Some(direction) => (direction, cell.room()),
                // finished cells never stay on the active list between steps
                None => bail!("active cell {} has no unresolved directions", current),
            }
        };

        let neighbour = current.offset(direction);
        let (outcome, pushed) = if !self.grid.contains(neighbour) {
            let variant = self.random_wall_variant();
            self.set_edge(Edge::wall(current, direction, None, variant))?;
            (EdgeOutcome::BoundaryWall, None)
        } else {
            let neighbour_room = self.grid.get(neighbour)?.map(MazeCell::room);
            match neighbour_room {
                None => {
                    let outcome = self.grow_into(current, current_room, direction, neighbour)?;
                    (outcome, Some(neighbour))
                }
                Some(room) => {
                    if room != current_room && self.share_settings(room, current_room)? {
                        (self.merge_through(current, current_room, direction, neighbour, room)?,
                         None)
                    } else {
                        self.set_wall_pair(current, direction, neighbour)?;
                        (EdgeOutcome::Walled { neighbour }, None)
                    }
                }
            }
        };

        let backtracked = self.drop_finished_cells()?;
        if let Some(new_cell) = pushed {
            self.active.push(new_cell);
        } else if backtracked > 0 {
            if let Some(&resumed) = self.active.last() {
                self.grid.existing_mut(resumed)?.record_backtrack();
            }
        }

        Ok(GenerationStep::Grew {
            cell: current,
            direction,
            outcome,
            backtracked,
        })
    }

    fn grow_into(&mut self,
                 current: GridCoordinate,
                 current_room: RoomId,
                 direction: CompassPrimary,
                 neighbour: GridCoordinate)
                 -> Result<EdgeOutcome> {
        let through_door = self.rng.gen_bool(self.config.door_probability());
        let room = if through_door {
            let current_settings = self.rooms.settings_of(current_room)?;
            let settings = self.random_settings(Some(current_settings));
            self.create_room(settings)
        } else {
            current_room
        };
        self.create_cell(neighbour, room)?;

        let (edge, mirror, kind) = if through_door {
            (Edge::door(current, direction, neighbour, DoorSide::Front),
             Edge::door(neighbour, direction.opposite(), current, DoorSide::Back),
             EdgeKind::Door)
        } else {
            (Edge::passage(current, direction, neighbour),
             Edge::passage(neighbour, direction.opposite(), current),
             EdgeKind::Passage)
        };
        self.set_edge_pair(edge, mirror)?;

        Ok(EdgeOutcome::NewCell {
            neighbour,
            kind,
            room,
        })
    }

    fn merge_through(&mut self,
                     current: GridCoordinate,
                     current_room: RoomId,
                     direction: CompassPrimary,
                     neighbour: GridCoordinate,
                     neighbour_room: RoomId)
                     -> Result<EdgeOutcome> {
        if current_room == neighbour_room {
            bail!("room {} cannot be merged into itself", current_room);
        }
        self.set_edge_pair(Edge::passage(current, direction, neighbour),
                           Edge::passage(neighbour, direction.opposite(), current))?;
        let dissolved = match self.rooms.merge(current_room, neighbour_room, &mut self.grid)? {
            Some(dissolved) => dissolved,
            None => bail!("room {} cannot be merged into itself", current_room),
        };
        self.builder.on_room_dissolved(dissolved);
        Ok(EdgeOutcome::Merged {
            neighbour,
            dissolved,
        })
    }

    fn set_wall_pair(&mut self,
                     current: GridCoordinate,
                     direction: CompassPrimary,
                     neighbour: GridCoordinate)
                     -> Result<()> {
        let variant = self.random_wall_variant();
        let mirror_variant = self.random_wall_variant();
        self.set_edge_pair(Edge::wall(current, direction, Some(neighbour), variant),
                           Edge::wall(neighbour, direction.opposite(), Some(current), mirror_variant))
    }

    fn share_settings(&self, a: RoomId, b: RoomId) -> Result<bool> {
        Ok(self.rooms.settings_of(a)? == self.rooms.settings_of(b)?)
    }

    /// Pop every fully initialized cell off the top of the active list.
    fn drop_finished_cells(&mut self) -> Result<usize> {
        let mut popped = 0;
        while let Some(&top) = self.active.last() {
            let finished = self.grid
                .get(top)?
                .map_or(false, MazeCell::is_fully_initialized);
            if !finished {
                break;
            }
            self.active.pop();
            popped += 1;
        }
        Ok(popped)
    }

    fn create_room(&mut self, settings: SettingsIndex) -> RoomId {
        let room = self.rooms.create(settings);
        self.builder.on_room_created(room, settings);
        room
    }

    fn create_cell(&mut self, coord: GridCoordinate, room: RoomId) -> Result<()> {
        let cell = self.grid.create(coord, room)?;
        self.rooms.get_mut(room)?.add_cell(cell);
        let handle = self.builder.on_cell_created(coord, room);
        self.handles.insert(coord, handle);
        Ok(())
    }

    fn set_edge(&mut self, edge: Edge) -> Result<()> {
        self.grid.existing_mut(edge.cell())?.set_edge(edge)?;
        self.builder.on_edge_created(&edge);
        Ok(())
    }

    fn set_edge_pair(&mut self, edge: Edge, mirror: Edge) -> Result<()> {
        // check the mirror slot first so a broken invariant cannot leave half a connection behind
        let mirror_taken = self.grid
            .existing_mut(mirror.cell())?
            .is_initialized(mirror.direction());
        if mirror_taken {
            bail!(ErrorKind::EdgeAlreadySet(mirror.cell(), mirror.direction()));
        }
        self.set_edge(edge)?;
        self.set_edge(mirror)
    }

    /// Pick a palette entry, avoiding `exclude` whenever the palette has another entry to offer.
    fn random_settings(&mut self, exclude: Option<SettingsIndex>) -> SettingsIndex {
        let PaletteSize(palette) = self.config.palette_size();
        match exclude {
            Some(SettingsIndex(excluded)) if palette > 1 => {
                let index = self.rng.gen_range(0..palette - 1);
                SettingsIndex(if index >= excluded { index + 1 } else { index })
            }
            _ => SettingsIndex(self.rng.gen_range(0..palette)),
        }
    }

    fn random_wall_variant(&mut self) -> WallVariant {
        WallVariant(self.rng.gen_range(0..self.config.wall_variants()))
    }
}
