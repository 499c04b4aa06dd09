//! Pathfinding algorithms
//!
//! Hop-bounded breadth-first search. The bound keeps traversal finite on
//! category graphs, which are allowed to contain cycles.

use super::common::{GraphView, NodeId};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

/// Which edges a traversal may follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Follow edges from source to target
    Outgoing,
    /// Follow edges backwards, from target to source
    Incoming,
    /// Ignore edge direction
    Both,
}

/// Result of a pathfinding algorithm
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathResult {
    pub source: NodeId,
    pub target: NodeId,
    /// Visited nodes from source to target
    pub path: Vec<NodeId>,
    /// One `(start, end)` pair per hop, in the edge's stored orientation.
    /// For `Direction::Both` a hop may therefore read `(next, prev)`.
    pub edges: Vec<(NodeId, NodeId)>,
}

impl PathResult {
    /// Number of hops
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// How a node was reached: parent index and the stored edge `(start, end)` in indices
type Visit = Option<(usize, (usize, usize))>;

fn neighbours(
    view: &GraphView,
    idx: usize,
    direction: Direction,
) -> impl Iterator<Item = (usize, (usize, usize))> + '_ {
    let forward: &[usize] = match direction {
        Direction::Outgoing | Direction::Both => view.successors(idx),
        Direction::Incoming => &[],
    };
    let backward: &[usize] = match direction {
        Direction::Incoming | Direction::Both => view.predecessors(idx),
        Direction::Outgoing => &[],
    };
    forward
        .iter()
        .map(move |&next| (next, (idx, next)))
        .chain(backward.iter().map(move |&prev| (prev, (prev, idx))))
}

/// Breadth-First Search limited to `max_hops` edges.
///
/// A path of exactly `max_hops` edges is still found. Returns `None` when
/// either endpoint is missing from the view or no path fits the bound.
pub fn bounded_bfs(
    view: &GraphView,
    source: NodeId,
    target: NodeId,
    direction: Direction,
    max_hops: usize,
) -> Option<PathResult> {
    let source_idx = *view.node_to_index.get(&source)?;
    let target_idx = *view.node_to_index.get(&target)?;

    let mut queue = VecDeque::new();
    let mut visited: FxHashMap<usize, (Visit, usize)> = FxHashMap::default(); // index -> (parent, depth)

    queue.push_back(source_idx);
    visited.insert(source_idx, (None, 0));

    while let Some(current_idx) = queue.pop_front() {
        if current_idx == target_idx {
            return Some(reconstruct(view, &visited, source, target, target_idx));
        }

        let depth = visited[&current_idx].1;
        if depth >= max_hops {
            continue;
        }

        for (next_idx, edge) in neighbours(view, current_idx, direction) {
            if !visited.contains_key(&next_idx) {
                visited.insert(next_idx, (Some((current_idx, edge)), depth + 1));
                queue.push_back(next_idx);
            }
        }
    }

    None
}

fn reconstruct(
    view: &GraphView,
    visited: &FxHashMap<usize, (Visit, usize)>,
    source: NodeId,
    target: NodeId,
    target_idx: usize,
) -> PathResult {
    let mut path = vec![view.index_to_node[target_idx]];
    let mut edges = Vec::new();
    let mut curr = target_idx;
    while let Some(&(Some((parent, (start, end))), _)) = visited.get(&curr) {
        path.push(view.index_to_node[parent]);
        edges.push((view.index_to_node[start], view.index_to_node[end]));
        curr = parent;
    }
    path.reverse();
    edges.reverse();
    PathResult {
        source,
        target,
        path,
        edges,
    }
}

/// All nodes reachable from `start` within `max_level` hops.
///
/// The start node comes first, the rest follow in breadth-first discovery
/// order. Unknown start nodes yield an empty list.
pub fn bounded_reach(
    view: &GraphView,
    start: NodeId,
    direction: Direction,
    max_level: usize,
) -> Vec<NodeId> {
    let Some(&start_idx) = view.node_to_index.get(&start) else {
        return Vec::new();
    };

    let mut order = vec![start_idx];
    let mut depth = FxHashMap::default();
    depth.insert(start_idx, 0usize);

    let mut cursor = 0;
    while cursor < order.len() {
        let current_idx = order[cursor];
        cursor += 1;

        let level = depth[&current_idx];
        if level >= max_level {
            continue;
        }
        for (next_idx, _) in neighbours(view, current_idx, direction) {
            if !depth.contains_key(&next_idx) {
                depth.insert(next_idx, level + 1);
                order.push(next_idx);
            }
        }
    }

    order.into_iter().map(|idx| view.index_to_node[idx]).collect()
}
