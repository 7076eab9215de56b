//! A fixed-size directed graph stored as adjacency lists, with an integer
//! value attached to every vertex.
//!
//! The number of vertices is determined at construction time; neither the
//! adjacency lists nor the values can grow or shrink afterwards.  Self-loops
//! and parallel edges are kept as inserted.

use proptest::prelude::*;
use tracing::{debug, trace};

use crate::error::{GraphError, Result};
use crate::logical_matrix::LogicalMatrix;
use crate::{Vertex, VertexValue};

/// A mutable, single-threaded directed graph.
#[derive(Clone, PartialEq, Eq)]
pub struct DirectedGraph {
    adjacency_lists: Box<[Vec<Vertex>]>,
    values: Box<[VertexValue]>,
}

impl std::fmt::Debug for DirectedGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let edges: Vec<(Vertex, Vertex)> = self.iter_edges().collect();
        f.debug_struct("DirectedGraph")
            .field("vertex_count", &self.vertex_count())
            .field("edges", &edges)
            .field("values", &self.values)
            .finish()
    }
}

impl DirectedGraph {
    /// Constructs a graph of `vertex_count` vertices, no edges and every value
    /// set to 0.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency_lists: vec![Vec::new(); vertex_count].into_boxed_slice(),
            values: vec![0; vertex_count].into_boxed_slice(),
        }
    }

    /// Like [`Self::new`] for a count coming from a signed source.  Fails with
    /// [`GraphError::InvalidArgument`] if it is negative.
    pub fn try_new(vertex_count: i64) -> Result<Self> {
        let count = usize::try_from(vertex_count)
            .map_err(|_| GraphError::InvalidArgument { vertex_count })?;
        Ok(Self::new(count))
    }

    pub fn from_edges_iter<I: Iterator<Item = (Vertex, Vertex)>>(
        vertex_count: usize,
        edges: I,
    ) -> Result<Self> {
        let mut graph = Self::new(vertex_count);
        for (src, dest) in edges {
            graph.add_edge(src, dest)?;
        }
        Ok(graph)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.values.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency_lists.iter().map(Vec::len).sum()
    }

    fn check_vertex(&self, vertex: Vertex) -> Result<Vertex> {
        if vertex < self.vertex_count() {
            Ok(vertex)
        } else {
            Err(GraphError::OutOfRange {
                vertex,
                vertex_count: self.vertex_count(),
            })
        }
    }

    pub fn value(&self, vertex: Vertex) -> Result<VertexValue> {
        let vertex = self.check_vertex(vertex)?;
        Ok(self.values[vertex])
    }

    pub fn set_value(&mut self, vertex: Vertex, value: VertexValue) -> Result<()> {
        let vertex = self.check_vertex(vertex)?;
        self.values[vertex] = value;
        Ok(())
    }

    /// Appends `dest` to the adjacency list of `src`.
    ///
    /// Both endpoints are validated: an out-of-range vertex yields
    /// [`GraphError::OutOfRange`] and leaves the graph untouched.
    pub fn add_edge(&mut self, src: Vertex, dest: Vertex) -> Result<()> {
        let src = self.check_vertex(src)?;
        let dest = self.check_vertex(dest)?;
        self.adjacency_lists[src].push(dest);
        Ok(())
    }

    /// Edges `(src, dest)` ordered by `src`, then by insertion.
    pub fn iter_edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        self.adjacency_lists
            .iter()
            .enumerate()
            .flat_map(|(src, dests)| dests.iter().map(move |dest| (src, *dest)))
    }

    /// Iterates over vertices `v` such that there's an edge `(u, v)`, in
    /// insertion order and with repetitions.
    ///
    /// Requires `u < vertex_count`.  Panics otherwise.
    pub fn iter_children(&self, u: Vertex) -> impl Iterator<Item = Vertex> + '_ {
        assert!(u < self.vertex_count());
        self.adjacency_lists[u].iter().copied()
    }

    /// Number of edges ending at each vertex.  Recomputed on every call.
    pub fn in_degrees(&self) -> Vec<usize> {
        let mut in_degrees = vec![0; self.vertex_count()];
        for (_, dest) in self.iter_edges() {
            in_degrees[dest] += 1;
        }
        in_degrees
    }

    /// The `vertex_count × vertex_count` matrix with a one at `(u, v)` iff
    /// there's at least one edge `(u, v)`.  Fails with
    /// [`GraphError::MatrixTooLarge`] above [`LogicalMatrix::MAX_SIZE`]
    /// vertices.
    pub fn render_adjacency_view(&self) -> Result<LogicalMatrix> {
        if self.vertex_count() > LogicalMatrix::MAX_SIZE {
            return Err(GraphError::MatrixTooLarge {
                size: self.vertex_count(),
            });
        }
        let mut matrix = LogicalMatrix::zeroed(self.vertex_count());
        for (src, dest) in self.iter_edges() {
            matrix.set(src, dest);
        }
        Ok(matrix)
    }

    /// Returns the value of the only vertex without incoming edges.  Returns
    /// `None` if there's no such vertex or more than one.
    pub fn find_root(&self) -> Option<VertexValue> {
        let root = self.find_root_vertex().map(|vertex| self.values[vertex]);
        debug!(
            vertex_count = self.vertex_count(),
            edge_count = self.edge_count(),
            ?root,
            "find_root"
        );
        root
    }

    fn find_root_vertex(&self) -> Option<Vertex> {
        let mut root: Option<Vertex> = None;
        for (vertex, in_degree) in self.in_degrees().into_iter().enumerate() {
            if in_degree != 0 {
                continue;
            }
            if root.is_some() {
                cov_mark::hit!(second_root_candidate);
                trace!(vertex, "second vertex without incoming edges");
                return None;
            }
            trace!(vertex, "root candidate");
            root = Some(vertex);
        }
        root
    }
}

/// Graphs of fewer than `max_vertex_count` vertices with arbitrary values and
/// up to twice as many edges as vertices, self-loops and parallel edges
/// included.
pub fn arb_directed_graph(max_vertex_count: usize) -> BoxedStrategy<DirectedGraph> {
    (0..max_vertex_count)
        .prop_flat_map(|vertex_count| {
            if vertex_count == 0 {
                return Just(DirectedGraph::new(0)).boxed();
            }
            let values = proptest::collection::vec(any::<VertexValue>(), vertex_count);
            let edges = proptest::collection::vec(
                (0..vertex_count, 0..vertex_count),
                0..2 * vertex_count,
            );
            (values, edges)
                .prop_map(move |(values, edges)| {
                    let mut graph = DirectedGraph::new(vertex_count);
                    graph.values = values.into_boxed_slice();
                    for (src, dest) in edges {
                        graph.adjacency_lists[src].push(dest);
                    }
                    graph
                })
                .boxed()
        })
        .boxed()
}
