//! Generic directed graph library
//!
//! [`DirectedGraph`] is the algorithmic core of toolgraph. It is generic over
//! any hashable node key; the tool domain instantiates it as
//! [`ToolGraph`](crate::ToolGraph) (`DirectedGraph<ToolId>`).
//!
//! ```text
//!   ┌──────┐      ┌──────┐      ┌──────┐
//!   │  A   │─────▶│  B   │─────▶│  C   │     edge = "B depends on A"
//!   └──────┘      └──────┘      └──────┘
//!   incoming(B) = {A}   outgoing(B) = {C}
//! ```
//!
//! # Algorithms
//!
//! | Query | Method | Algorithm |
//! |-------|--------|-----------|
//! | Ordering | [`DirectedGraph::topological_sort`] | DFS over incoming edges (explicit stack) |
//! | Ordering | [`DirectedGraph::topological_sort_kahn`] | Kahn's in-degree counting |
//! | Cycles | [`DirectedGraph::has_cycles`] | DFS temporary marks |
//! | Components | [`DirectedGraph::strongly_connected_components`] | Kosaraju |
//! | Cycles | [`DirectedGraph::find_all_cycles`] | Johnson, per component |
//! | Reachability | [`DirectedGraph::transitive_closure`] | BFS over outgoing edges |
//! | Reachability | [`DirectedGraph::reverse_transitive_closure`] | BFS over incoming edges |
//! | Paths | [`DirectedGraph::shortest_path`] | BFS |
//! | Paths | [`DirectedGraph::shortest_paths_from_source`] | Dijkstra |
//! | Spanning | [`DirectedGraph::minimum_spanning_tree`] | Prim (undirected view) |

mod components;
mod directed;
mod error;
mod ordering;
mod weighted;

pub use directed::DirectedGraph;
pub use error::GraphError;
pub use weighted::{ShortestPaths, WeightedEdge};
