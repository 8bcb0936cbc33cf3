//! Shortest paths on the tile grid
//!
//! 4-connected search with uniform step cost. Dijkstra and A* (Manhattan
//! heuristic) are both available; the heuristic is admissible and
//! consistent on this grid, so both return paths of the same length.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::world::{Grid, TileCoord};

/// Search algorithm used by [`find_path`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Uniform-cost search, no heuristic
    Dijkstra,
    /// Manhattan-guided search
    #[default]
    AStar,
}

impl SearchStrategy {
    fn heuristic(self, tile: TileCoord, goal: TileCoord) -> u32 {
        match self {
            Self::Dijkstra => 0,
            Self::AStar => tile.manhattan(goal),
        }
    }
}

/// An ordered list of tiles from start to goal, both inclusive.
///
/// Consumers pop cells off the front as they are reached. An empty path
/// means "no route", never "already there".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    cells: VecDeque<TileCoord>,
}

impl Path {
    /// Path with no cells
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if path was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells, endpoints included
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Number of steps between cells
    #[must_use]
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// Next cell still to be reached
    #[must_use]
    pub fn front(&self) -> Option<TileCoord> {
        self.cells.front().copied()
    }

    /// Last cell of the path
    #[must_use]
    pub fn goal(&self) -> Option<TileCoord> {
        self.cells.back().copied()
    }

    /// Drop the head cell once it has been reached
    pub fn pop_front(&mut self) -> Option<TileCoord> {
        self.cells.pop_front()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Iterate over the remaining cells
    pub fn iter(&self) -> impl Iterator<Item = &TileCoord> {
        self.cells.iter()
    }

    #[must_use]
    pub fn contains(&self, tile: TileCoord) -> bool {
        self.cells.contains(&tile)
    }
}

impl FromIterator<TileCoord> for Path {
    fn from_iter<I: IntoIterator<Item = TileCoord>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Open-set entry
#[derive(Debug, Clone, Copy)]
struct Node {
    tile: TileCoord,
    g_cost: u32,
    f_cost: u32,
    /// Insertion order; earlier entries win ties
    sequence: u64,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a shortest path between two tiles.
///
/// Returns an empty path when either endpoint is solid or out of bounds,
/// or when the goal cannot be reached. `start == goal` yields a one-cell
/// path.
#[must_use]
pub fn find_path(grid: &Grid, start: TileCoord, goal: TileCoord, strategy: SearchStrategy) -> Path {
    if !grid.is_walkable(start) || !grid.is_walkable(goal) {
        return Path::empty();
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: FxHashMap<TileCoord, TileCoord> = FxHashMap::default();
    let mut g_score: FxHashMap<TileCoord, u32> = FxHashMap::default();
    let mut sequence = 0_u64;

    g_score.insert(start, 0);
    open_set.push(Node {
        tile: start,
        g_cost: 0,
        f_cost: strategy.heuristic(start, goal),
        sequence,
    });

    while let Some(current) = open_set.pop() {
        if current.tile == goal {
            return reconstruct(&came_from, start, goal);
        }

        // Stale entry superseded by a cheaper one
        if g_score
            .get(&current.tile)
            .is_some_and(|&best| current.g_cost > best)
        {
            continue;
        }

        for next in grid.neighbors(current.tile) {
            let tentative_g = current.g_cost + 1;
            if g_score.get(&next).is_none_or(|&g| tentative_g < g) {
                came_from.insert(next, current.tile);
                g_score.insert(next, tentative_g);
                sequence += 1;
                open_set.push(Node {
                    tile: next,
                    g_cost: tentative_g,
                    f_cost: tentative_g + strategy.heuristic(next, goal),
                    sequence,
                });
            }
        }
    }

    // No path found
    Path::empty()
}

fn reconstruct(came_from: &FxHashMap<TileCoord, TileCoord>, start: TileCoord, goal: TileCoord) -> Path {
    let mut cells = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current) {
            Some(&previous) => {
                cells.push(previous);
                current = previous;
            }
            None => return Path::empty(),
        }
    }
    cells.into_iter().rev().collect()
}
