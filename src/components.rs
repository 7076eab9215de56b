//! Connected components ("groups") of an undirected graph given as an
//! adjacency matrix.

use std::collections::BTreeMap;
use std::ops::Range;

use proptest::prelude::*;
use proptest::test_runner::TestRunner;
use rand::distributions::Uniform;
use rand::prelude::Distribution;
use rand::Rng;
use roaring::RoaringBitmap;
use tracing::{debug, trace};

use crate::logical_matrix::LogicalMatrix;
use crate::Vertex;

/// Neighbour lists of an undirected graph.  Every vertex has an entry, possibly
/// an empty one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndirectedAdjacencyList {
    neighbours: BTreeMap<Vertex, Vec<Vertex>>,
}

impl UndirectedAdjacencyList {
    /// Records both directions of every cell `(i, j)` with `i != j`.
    ///
    /// Requires `vertex_count <= u32::MAX`.  Panics otherwise.
    fn from_cells<I: Iterator<Item = (Vertex, Vertex)>>(vertex_count: usize, cells: I) -> Self {
        assert!(vertex_count <= u32::MAX as usize, "too many vertices");
        let mut neighbours: BTreeMap<Vertex, Vec<Vertex>> = BTreeMap::new();
        for (i, j) in cells {
            if i == j {
                continue;
            }
            neighbours.entry(i).or_default().push(j);
            neighbours.entry(j).or_default().push(i);
        }
        for vertex in 0..vertex_count {
            neighbours.entry(vertex).or_default();
        }
        Self { neighbours }
    }

    /// The diagonal is ignored.  Symmetric input lists every neighbour twice,
    /// which traversal doesn't care about.
    pub fn from_matrix(matrix: &LogicalMatrix) -> Self {
        Self::from_cells(matrix.size(), matrix.iter_ones())
    }

    /// A cell connects its row and column iff its value is exactly `1`.
    ///
    /// Requires every row to have `rows.len()` cells.  Panics otherwise.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Self {
        let cells = rows.iter().enumerate().flat_map(|(i, row)| {
            let row = row.as_ref();
            assert_eq!(row.len(), rows.len(), "matrix is not square");
            row.iter()
                .enumerate()
                .filter(|(_, cell)| **cell == 1)
                .map(move |(j, _)| (i, j))
        });
        Self::from_cells(rows.len(), cells)
    }

    pub fn vertex_count(&self) -> usize {
        self.neighbours.len()
    }

    pub fn iter_neighbours(&self, u: Vertex) -> impl Iterator<Item = Vertex> + '_ {
        self.neighbours[&u].iter().copied()
    }

    /// Visit all vertices reachable from `vertex` in a depth-first-search (DFS)
    /// order, skipping those already in `visited` and adding the rest to it.
    fn iter_component_dfs<'a>(
        &'a self,
        vertex: Vertex,
        visited: &'a mut RoaringBitmap,
    ) -> DfsVerticesIterator<'a> {
        DfsVerticesIterator {
            graph: self,
            visited,
            to_visit: vec![vertex],
        }
    }

    /// Starts a traversal from every vertex not reached yet, in ascending
    /// order, and calls `visit(group, vertex)` for every vertex reached.
    /// Returns the number of groups.
    fn visit_components<F: FnMut(usize, Vertex)>(&self, mut visit: F) -> usize {
        let mut visited = RoaringBitmap::new();
        let mut groups = 0;
        for &start in self.neighbours.keys() {
            if visited.contains(bit(start)) {
                continue;
            }
            trace!(start, group = groups, "new group");
            for vertex in self.iter_component_dfs(start, &mut visited) {
                visit(groups, vertex);
            }
            groups += 1;
        }
        debug!(vertex_count = self.vertex_count(), groups, "counted groups");
        groups
    }

    /// Each component's vertices in ascending order, components ordered by
    /// their smallest vertex.
    pub fn connected_components(&self) -> Vec<Vec<Vertex>> {
        let mut components: Vec<Vec<Vertex>> = Vec::new();
        self.visit_components(|group, vertex| {
            if group == components.len() {
                components.push(Vec::new());
            }
            components[group].push(vertex);
        });
        for component in &mut components {
            component.sort_unstable();
        }
        components
    }

    pub fn count_components(&self) -> usize {
        self.visit_components(|_, _| {})
    }
}

// Vertices are below `u32::MAX`, see `UndirectedAdjacencyList::from_cells`.
#[inline]
fn bit(vertex: Vertex) -> u32 {
    vertex as u32
}

/// See [`UndirectedAdjacencyList::connected_components`].  An explicit stack
/// stands in for recursion so that long paths don't exhaust the call stack.
struct DfsVerticesIterator<'a> {
    graph: &'a UndirectedAdjacencyList,
    visited: &'a mut RoaringBitmap,
    to_visit: Vec<Vertex>,
}

impl<'a> Iterator for DfsVerticesIterator<'a> {
    type Item = Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(u) = self.to_visit.pop() {
            if !self.visited.insert(bit(u)) {
                continue;
            }
            let visited = &*self.visited;
            self.to_visit.extend(
                self.graph
                    .iter_neighbours(u)
                    .filter(|v| !visited.contains(bit(*v))),
            );
            return Some(u);
        }
        None
    }
}

/// Number of groups of vertices connected through cells equal to `1`.
///
/// Requires a square matrix.  Panics otherwise.
pub fn num_groups<R: AsRef<[u8]>>(rows: &[R]) -> usize {
    UndirectedAdjacencyList::from_rows(rows).count_components()
}

/// Vertices of every group, see
/// [`UndirectedAdjacencyList::connected_components`].
///
/// Requires a square matrix.  Panics otherwise.
pub fn connected_components<R: AsRef<[u8]>>(rows: &[R]) -> Vec<Vec<Vertex>> {
    UndirectedAdjacencyList::from_rows(rows).connected_components()
}

/// Symmetric `0`/`1` matrices with a zero diagonal.
pub fn arb_adjacency_matrix(
    size: impl Into<Range<Vertex>>,
    ones_probability: f64,
) -> AdjacencyMatrixStrategy {
    AdjacencyMatrixStrategy {
        size: size.into(),
        ones_probability,
    }
}

#[derive(Debug, Clone)]
pub struct AdjacencyMatrixStrategy {
    size: Range<Vertex>,
    ones_probability: f64,
}

impl Strategy for AdjacencyMatrixStrategy {
    type Tree = Just<Vec<Vec<u8>>>;

    type Value = Vec<Vec<u8>>;

    fn new_tree(&self, runner: &mut TestRunner) -> proptest::strategy::NewTree<Self> {
        if self.size.is_empty() {
            panic!(
                "Invalid use of empty size range. (hint: did you \
                 accidentally write {}..{} where you meant {}..={} \
                 somewhere?)",
                self.size.start, self.size.end, self.size.start, self.size.end
            );
        }
        if !(0.0..=1.0).contains(&self.ones_probability) {
            panic!(
                "Invalid probability set for generating ones. \
                 Needs to be a number between 0 and 1, but got {}",
                self.ones_probability
            );
        }
        let size = Uniform::new(self.size.start, self.size.end).sample(runner.rng());
        let mut rows = vec![vec![0u8; size]; size];
        for i in 0..size {
            for j in (i + 1)..size {
                if runner.rng().gen_bool(self.ones_probability) {
                    rows[i][j] = 1;
                    rows[j][i] = 1;
                }
            }
        }
        Ok(Just(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_groups() {
        assert_eq!(num_groups(&[[0u8, 1, 0], [1, 0, 0], [0, 0, 0]]), 2);
        assert_eq!(
            connected_components(&[[0u8, 1, 0], [1, 0, 0], [0, 0, 0]]),
            vec![vec![0, 1], vec![2]]
        );
    }

    #[test]
    fn no_edges_every_vertex_is_a_group() {
        assert_eq!(num_groups(&[[0u8, 0, 0], [0, 0, 0], [0, 0, 0]]), 3);
    }

    #[test]
    fn asymmetric_cell_connects_both_ways() {
        assert_eq!(num_groups(&[[0u8, 1, 0], [1, 0, 0], [0, 1, 0]]), 1);
    }

    #[test]
    fn diagonal_is_ignored() {
        let adjacency = UndirectedAdjacencyList::from_rows(&[[1u8, 0], [0, 1]]);
        assert_eq!(adjacency.iter_neighbours(0).count(), 0);
        assert_eq!(adjacency.iter_neighbours(1).count(), 0);
        assert_eq!(adjacency.count_components(), 2);
    }

    #[test]
    fn isolated_vertices_have_entries() {
        let adjacency = UndirectedAdjacencyList::from_rows(&[[0u8, 0, 0], [0, 0, 1], [0, 1, 0]]);
        assert_eq!(adjacency.vertex_count(), 3);
        assert_eq!(adjacency.iter_neighbours(0).collect::<Vec<Vertex>>(), vec![]);
        assert_eq!(adjacency.iter_neighbours(1).collect::<Vec<Vertex>>(), vec![2, 2]);
    }

    #[test]
    fn empty_matrix_has_no_groups() {
        let rows: Vec<Vec<u8>> = vec![];
        assert_eq!(num_groups(&rows), 0);
    }

    #[test]
    fn long_path_does_not_overflow_the_stack() {
        let size = 20_000;
        let mut matrix = LogicalMatrix::zeroed(size);
        for i in 1..size {
            matrix.set(i - 1, i);
        }
        let adjacency = UndirectedAdjacencyList::from_matrix(&matrix);
        assert_eq!(adjacency.count_components(), 1);
    }

    #[test]
    fn counts_groups_of_a_directed_adjacency_view() {
        let graph = crate::DirectedGraph::from_edges_iter(
            5,
            vec![(0, 1), (2, 1), (3, 4)].into_iter(),
        )
        .unwrap();
        let view = graph.render_adjacency_view().unwrap();
        assert_eq!(num_groups(&view.to_rows()), 2);
        assert_eq!(UndirectedAdjacencyList::from_matrix(&view).count_components(), 2);
    }

    #[test]
    fn components_and_count_agree_on_groups() {
        let rows = [
            [0u8, 0, 0, 1, 0],
            [0, 0, 0, 0, 1],
            [0, 0, 0, 0, 0],
            [1, 0, 0, 0, 0],
            [0, 1, 0, 0, 0],
        ];
        let adjacency = UndirectedAdjacencyList::from_rows(&rows);
        let components = adjacency.connected_components();
        assert_eq!(components, vec![vec![0, 3], vec![1, 4], vec![2]]);
        assert_eq!(adjacency.count_components(), components.len());
        assert_eq!(
            UndirectedAdjacencyList::from_matrix(&LogicalMatrix::from_rows(&rows)),
            adjacency
        );
    }

    fn permute(rows: &[Vec<u8>], permutation: &[usize]) -> Vec<Vec<u8>> {
        let size = rows.len();
        let mut result = vec![vec![0u8; size]; size];
        for i in 0..size {
            for j in 0..size {
                result[permutation[i]][permutation[j]] = rows[i][j];
            }
        }
        result
    }

    proptest! {
        #[test]
        fn group_count_is_within_bounds(rows in arb_adjacency_matrix(0..40, 0.1)) {
            let groups = num_groups(&rows);
            if rows.is_empty() {
                prop_assert_eq!(groups, 0);
            } else {
                prop_assert!(1 <= groups && groups <= rows.len());
            }
        }

        #[test]
        fn components_partition_the_vertices(rows in arb_adjacency_matrix(0..40, 0.1)) {
            let components = connected_components(&rows);
            prop_assert_eq!(components.len(), num_groups(&rows));
            let mut all: Vec<Vertex> = components.iter().flatten().copied().collect();
            all.sort_unstable();
            prop_assert_eq!(all, (0..rows.len() as Vertex).collect::<Vec<Vertex>>());
            for (i, j) in LogicalMatrix::from_rows(&rows).iter_ones() {
                let same = components.iter().any(|c| c.contains(&i) && c.contains(&j));
                prop_assert!(same);
            }
        }

        #[test]
        fn group_count_is_invariant_under_relabelling(
            (rows, permutation) in arb_adjacency_matrix(1..30, 0.1).prop_flat_map(|rows| {
                let size = rows.len();
                (Just(rows), Just((0..size).collect::<Vec<usize>>()).prop_shuffle())
            }),
        ) {
            prop_assert_eq!(num_groups(&rows), num_groups(&permute(&rows, &permutation)));
        }
    }
}
