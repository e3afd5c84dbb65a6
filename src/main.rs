use docopt::Docopt;
use log::{debug, info};
use maze_rooms::{
    coordinates::GridCoordinate,
    generators::{GenerationStep, Maze, MazeConfigBuilder, MazeGenerator},
    grid::Grid,
    grid_displays::{BacktrackDisplay, DistancesDisplay, RoomDisplay},
    grid_traits::GridDisplay,
    topology::LinkGraph,
    units::{Depth, Width},
};
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
    rc::Rc,
    thread,
    time::Duration,
};

const USAGE: &str = "Maze Rooms

Usage:
    maze_rooms_driver -h | --help
    maze_rooms_driver [(--grid-size=<n>|[--grid-width=<w> --grid-depth=<d>])] [--door-probability=<p>] [--palette-size=<n>] [--wall-variants=<n>] [--seed=<s>] [--step-delay=<ms>] [(--show-rooms|--show-backtracks|--show-distances)] [--text-out=<path>] [--save-edges=<path>]

Options:
    -h --help                 Show this screen.
    --grid-size=<n>           The grid size is n * n.
    --grid-width=<w>          The grid width in a w*d grid [default: 20].
    --grid-depth=<d>          The grid depth in a w*d grid [default: 20].
    --door-probability=<p>    Chance that a newly reached cell starts a new room behind a door [default: 0.1].
    --palette-size=<n>        Number of room settings to pick from [default: 4].
    --wall-variants=<n>       Number of wall variants to pick from [default: 1].
    --seed=<s>                Seed for a repeatable maze. Random if not given.
    --step-delay=<ms>         Pause between generation steps, logging progress as it goes.
    --show-rooms              Show each cell's room settings index.
    --show-backtracks         Show how many times the walk came back to each cell.
    --show-distances          Show the distance of every cell from the seed cell.
    --text-out=<path>         Output file path for a textual rendering of the maze.
    --save-edges=<path>       Serialize the maze to a text file. Line 1: n(#vertices) m(#edges). Line 2+: an edge between vertices and its kind. Uses 1-based vertex indices.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_depth: usize,
    flag_door_probability: f64,
    flag_palette_size: usize,
    flag_wall_variants: usize,
    flag_seed: Option<u64>,
    flag_step_delay: Option<u64>,
    flag_show_rooms: bool,
    flag_show_backtracks: bool,
    flag_show_distances: bool,
    flag_text_out: String,
    flag_save_edges: String,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::maze_rooms::errors::Error, ::maze_rooms::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (width, depth) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_depth)
    };

    let config = MazeConfigBuilder::new()
        .size(Width(width), Depth(depth))
        .door_probability(args.flag_door_probability)
        .palette_size(args.flag_palette_size)
        .wall_variants(args.flag_wall_variants)
        .seed(args.flag_seed)
        .build()
        .chain_err(|| "Invalid maze options")?;

    let mut generator = MazeGenerator::without_builder(config);
    let seed_cell = generate(&mut generator, args.flag_step_delay)?;
    let mut maze = generator.into_maze();

    let links = LinkGraph::from_grid(&maze.grid);
    set_maze_griddisplay(&mut maze, &args, &links, seed_cell)?;

    if args.flag_text_out.is_empty() {
        println!("{}", maze.grid);
    } else {
        write_text_to_file(&format!("{}", maze.grid), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }
    print_summary(&maze, &links)?;

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze.grid, &links, &args.flag_save_edges)?;
    }

    Ok(())
}

/// Drive the generator to completion, pausing between steps if asked to.
/// Returns where the maze was seeded.
fn generate(generator: &mut MazeGenerator, step_delay: Option<u64>) -> Result<GridCoordinate> {
    let mut seed_cell = None;
    while generator.has_next() {
        let step = generator.step()?;
        if let GenerationStep::Seeded { cell, .. } = step {
            seed_cell = Some(cell);
        }

        if let Some(delay_ms) = step_delay {
            info!("step {}: {:?}, {} cells, {} rooms, {} active",
                  generator.growth_steps(),
                  step,
                  generator.grid().cells_count().0,
                  generator.rooms().len(),
                  generator.active_cells().len());
            thread::sleep(Duration::from_millis(delay_ms));
        }
    }

    seed_cell.ok_or_else(|| "The maze was never seeded".into())
}

fn set_maze_griddisplay(maze: &mut Maze,
                        args: &MazeArgs,
                        links: &LinkGraph,
                        seed_cell: GridCoordinate)
                        -> Result<()> {
    let display: Option<Rc<dyn GridDisplay>> = if args.flag_show_rooms {
        Some(Rc::new(RoomDisplay::new(&maze.rooms)) as Rc<dyn GridDisplay>)
    } else if args.flag_show_backtracks {
        Some(Rc::new(BacktrackDisplay) as Rc<dyn GridDisplay>)
    } else if args.flag_show_distances {
        Some(Rc::new(DistancesDisplay::new(links.distances_from(seed_cell)?)) as Rc<dyn GridDisplay>)
    } else {
        None
    };
    maze.grid.set_grid_display(display);
    Ok(())
}

fn print_summary(maze: &Maze, links: &LinkGraph) -> Result<()> {
    if let Some(first) = maze.grid.iter().next() {
        let (furthest, distance) = links.furthest_from(first.coordinates())?;
        debug!("furthest cell from {} is {} at {} steps", first.coordinates(), furthest, distance);
    }

    println!("cells: {}, rooms: {}, links: {}",
             maze.grid.cells_count().0,
             maze.rooms.len(),
             links.links_count());
    for room in maze.rooms.iter() {
        println!("  room {} settings {} cells {}",
                 room.id(),
                 room.settings_index().0,
                 room.len());
    }
    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &Grid, links: &LinkGraph, file_path: &str) -> Result<()> {

    let mut graph_data = String::new();
    graph_data.push_str(&format!("{} {}\n", maze_grid.size(), links.links_count()));

    for (src, dst, kind) in links.iter_links() {
        let index_a = maze_grid.coordinate_to_index(src)
            .ok_or_else(|| format!("Link from {} is off the grid", src))?;
        let index_b = maze_grid.coordinate_to_index(dst)
            .ok_or_else(|| format!("Link to {} is off the grid", dst))?;
        let src_as_1_based_index = index_a + 1;
        let dst_as_1_based_index = index_b + 1;

        graph_data.push_str(&format!("{} {} {:?}\n", src_as_1_based_index, dst_as_1_based_index, kind));
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
