use std::collections::HashMap;

use petgraph::algo;
use petgraph::graph::NodeIndex;
use petgraph::visit::{Bfs, EdgeFiltered, EdgeRef};
use petgraph::{Graph, Undirected};
use smallvec::SmallVec;

use crate::coordinates::GridCoordinate;
use crate::edges::EdgeKind;
use crate::errors::*;
use crate::grid::Grid;
use crate::rooms::Room;
use crate::units::{Depth, Width};

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

/// Walkable connections of a grid as an undirected graph.
///
/// Every grid position is a node, in the grid's row major order, and every passage or door is
/// one edge weighted by its kind. Walls are not in the graph. Asking about a coordinate off the
/// grid is an `OutOfBounds` error.
#[derive(Debug)]
pub struct LinkGraph {
    graph: Graph<GridCoordinate, EdgeKind, Undirected>,
    width: Width,
    depth: Depth,
}

impl LinkGraph {
    pub fn from_grid(grid: &Grid) -> LinkGraph {
        let size = grid.size();
        let mut graph = Graph::with_capacity(size, size * 2);
        for index in 0..size {
            let _ = graph.add_node(grid.index_to_coordinate(index));
        }

        let mut links = LinkGraph {
            graph,
            width: grid.width(),
            depth: grid.depth(),
        };
        for cell in grid.iter() {
            for edge in cell.edges().filter(|e| e.is_open()) {
                let ends = edge.neighbour()
                    .and_then(|neighbour| links.node(neighbour).ok())
                    .and_then(|b| links.node(cell.coordinates()).ok().map(|a| (a, b)));
                if let Some((a, b)) = ends {
                    // mirrored edges land on the same undirected link
                    let _ = links.graph.update_edge(a, b, edge.kind());
                }
            }
        }
        links
    }

    /// Cells reachable in one move from `coord`, through a passage or a door.
    pub fn links(&self, coord: GridCoordinate) -> Result<CoordinateSmallVec> {
        Ok(self.graph
            .neighbors(self.node(coord)?)
            .map(|node| self.graph[node])
            .collect())
    }

    pub fn is_linked(&self, a: GridCoordinate, b: GridCoordinate) -> Result<bool> {
        Ok(self.link_kind(a, b)?.is_some())
    }

    pub fn link_kind(&self, a: GridCoordinate, b: GridCoordinate) -> Result<Option<EdgeKind>> {
        Ok(self.graph
            .find_edge(self.node(a)?, self.node(b)?)
            .map(|edge| self.graph[edge]))
    }

    #[inline]
    pub fn links_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Every connection once, as its two end points and its kind.
    pub fn iter_links(&self) -> impl Iterator<Item = (GridCoordinate, GridCoordinate, EdgeKind)> + '_ {
        self.graph
            .edge_references()
            .map(move |edge| (self.graph[edge.source()], self.graph[edge.target()], *edge.weight()))
    }

    /// Number of undirected connections of the given kind.
    pub fn connections_count(&self, kind: EdgeKind) -> usize {
        self.graph
            .edge_references()
            .filter(|edge| *edge.weight() == kind)
            .count()
    }

    /// Is every position reachable from every other one?
    pub fn is_connected(&self) -> bool {
        algo::connected_components(&self.graph) <= 1
    }

    /// Can every cell of the room be reached from any other without leaving through a door?
    /// A room holding a cell off this grid is not connected.
    pub fn room_is_connected(&self, room: &Room) -> bool {
        let start = match room.cells().first().map(|&coord| self.node(coord)) {
            Some(Ok(node)) => node,
            Some(Err(_)) => return false,
            None => return true,
        };
        let passages = EdgeFiltered::from_fn(&self.graph, |edge| *edge.weight() == EdgeKind::Passage);
        let mut bfs = Bfs::new(&passages, start);
        let mut reached = 0;
        while let Some(node) = bfs.next(&passages) {
            if room.contains(self.graph[node]) {
                reached += 1;
            }
        }
        reached == room.len()
    }

    /// Steps from `start` to every reachable position.
    pub fn distances_from(&self, start: GridCoordinate) -> Result<HashMap<GridCoordinate, usize>> {
        Ok(algo::dijkstra(&self.graph, self.node(start)?, None, |_| 1usize)
            .into_iter()
            .map(|(node, distance)| (self.graph[node], distance))
            .collect())
    }

    /// The position furthest from `start` and its distance. Ties go to the lowest coordinate.
    pub fn furthest_from(&self, start: GridCoordinate) -> Result<(GridCoordinate, usize)> {
        Ok(self.distances_from(start)?
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
            .unwrap_or((start, 0)))
    }

    fn node(&self, coord: GridCoordinate) -> Result<NodeIndex> {
        let on_grid = coord.x >= 0 && coord.z >= 0 && (coord.x as usize) < self.width.0 &&
                      (coord.z as usize) < self.depth.0;
        if !on_grid {
            return Err(ErrorKind::OutOfBounds(coord).into());
        }
        Ok(NodeIndex::new(coord.z as usize * self.width.0 + coord.x as usize))
    }
}
