//! Graph primitives built on adjacency lists and in-degree bookkeeping:
//!
//! * [`DirectedGraph::find_root`]: the value of the single vertex without
//!   incoming edges, if there's exactly one.
//! * [`can_finish`]: whether a set of prerequisites admits a topological order
//!   (Kahn's algorithm).
//! * [`num_groups`]: the number of connected components of an undirected graph
//!   given as an adjacency matrix.
//!
//! Cycles, missing roots and the like are ordinary results, never errors.
//! [`GraphError`] is reserved for bad sizes and out-of-range vertices.

pub mod components;
pub mod digraph;
pub mod error;
pub mod logical_matrix;
pub mod prerequisites;

#[cfg(test)]
mod test_events;

pub type Vertex = usize;

pub type VertexValue = i32;

pub use components::{
    arb_adjacency_matrix, connected_components, num_groups, UndirectedAdjacencyList,
};
pub use digraph::{arb_directed_graph, DirectedGraph};
pub use error::{GraphError, Result};
pub use logical_matrix::LogicalMatrix;
pub use prerequisites::{
    arb_acyclic_prerequisites, arb_prerequisites, can_finish, topological_order,
};
