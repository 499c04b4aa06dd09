pub mod common;
pub mod pathfinding;

pub use common::{GraphView, NodeId};
pub use pathfinding::{bounded_bfs, bounded_reach, Direction, PathResult};
