use criterion::{criterion_group, criterion_main, Criterion};
use maze_rooms::{
    builders::EventLog,
    generators::{MazeConfig, MazeConfigBuilder, MazeGenerator},
    topology::LinkGraph,
    units::{Depth, Width},
};

fn config_32(door_probability: f64, palette_size: usize) -> MazeConfig {
    MazeConfigBuilder::new()
        .size(Width(32), Depth(32))
        .door_probability(door_probability)
        .palette_size(palette_size)
        .seed(Some(32))
        .build()
        .unwrap()
}

fn bench_single_room_maze_32(c: &mut Criterion) {
    let config = config_32(0.0, 1);
    c.bench_function("single_room_maze_32", move |b| {
        b.iter(|| MazeGenerator::without_builder(config).run().unwrap())
    });
}

fn bench_rooms_maze_32(c: &mut Criterion) {
    let config = config_32(0.1, 4);
    c.bench_function("rooms_maze_32", move |b| {
        b.iter(|| MazeGenerator::without_builder(config).run().unwrap())
    });
}

fn bench_doors_everywhere_maze_32(c: &mut Criterion) {
    let config = config_32(1.0, 2);
    c.bench_function("doors_everywhere_maze_32", move |b| {
        b.iter(|| MazeGenerator::without_builder(config).run().unwrap())
    });
}

fn bench_event_log_maze_32(c: &mut Criterion) {
    let config = config_32(0.1, 4);
    c.bench_function("event_log_maze_32", move |b| {
        b.iter(|| MazeGenerator::new(config, EventLog::new()).run().unwrap())
    });
}

fn bench_link_graph_32(c: &mut Criterion) {
    let mut generator = MazeGenerator::without_builder(config_32(0.1, 4));
    generator.run().unwrap();
    let maze = generator.into_maze();
    c.bench_function("link_graph_32", move |b| {
        b.iter(|| LinkGraph::from_grid(&maze.grid).is_connected())
    });
}

criterion_group!(
    benches,
    bench_single_room_maze_32,
    bench_rooms_maze_32,
    bench_doors_everywhere_maze_32,
    bench_event_log_maze_32,
    bench_link_graph_32
);
criterion_main!(benches);
