//! Topological feasibility of a set of exams with prerequisites.
//!
//! A pair `(a, b)` means exam `a` requires exam `b` to be taken first, which is
//! stored as an edge `b -> a`: edges point from the prerequisite towards what
//! it unlocks.  Duplicate pairs are kept as independent edges.

use std::collections::VecDeque;

use proptest::prelude::*;
use tracing::{debug, trace};

use crate::Vertex;

/// Adjacency lists for `exam_count` exams, one edge per pair.
///
/// Requires both exams of every pair to be below `exam_count`.  Panics
/// otherwise.
fn get_adjacency_lists(exam_count: usize, prerequisites: &[(Vertex, Vertex)]) -> Vec<Vec<Vertex>> {
    let mut adjacency_lists: Vec<Vec<Vertex>> = vec![Vec::new(); exam_count];
    for &(exam, prerequisite) in prerequisites {
        assert!(exam < exam_count);
        assert!(prerequisite < exam_count);
        adjacency_lists[prerequisite].push(exam);
    }
    adjacency_lists
}

fn get_in_degrees(adjacency_lists: &[Vec<Vertex>]) -> Vec<usize> {
    let mut in_degrees = vec![0; adjacency_lists.len()];
    for neighbours in adjacency_lists {
        for v in neighbours {
            in_degrees[*v] += 1;
        }
    }
    in_degrees
}

/// Kahn's algorithm: repeatedly takes an exam with no unmet prerequisite,
/// releasing the exams that depend on it.  Calls `visit` on every exam in the
/// order it gets taken and returns how many were taken.
fn kahn<F: FnMut(Vertex)>(adjacency_lists: &[Vec<Vertex>], mut visit: F) -> usize {
    let mut in_degrees = get_in_degrees(adjacency_lists);

    let mut to_visit: VecDeque<Vertex> = in_degrees
        .iter()
        .enumerate()
        .filter(|(_, in_degree)| **in_degree == 0)
        .map(|(u, _)| u)
        .collect();

    let mut processed = 0;
    while let Some(u) = to_visit.pop_front() {
        trace!(exam = u, "taken");
        processed += 1;
        visit(u);
        for &v in &adjacency_lists[u] {
            let in_degree = &mut in_degrees[v];
            *in_degree -= 1;
            if *in_degree == 0 {
                to_visit.push_back(v);
            }
        }
    }

    if processed < adjacency_lists.len() {
        cov_mark::hit!(unprocessed_exams_remain);
        trace!(
            unprocessed = adjacency_lists.len() - processed,
            "prerequisites form a cycle"
        );
    }
    processed
}

/// Returns `true` iff all `exam_count` exams can be taken in some order
/// that respects every `(exam, prerequisite)` pair, i.e. the prerequisites
/// contain no cycle.
///
/// Requires both exams of every pair to be below `exam_count`.  Panics
/// otherwise.
pub fn can_finish(exam_count: usize, prerequisites: &[(Vertex, Vertex)]) -> bool {
    let adjacency_lists = get_adjacency_lists(exam_count, prerequisites);
    let processed = kahn(&adjacency_lists, |_| {});
    let feasible = processed == exam_count;
    debug!(
        exam_count,
        prerequisite_count = prerequisites.len(),
        processed,
        feasible,
        "can_finish"
    );
    feasible
}

/// The order in which [`can_finish`] takes the exams: every exam with no
/// prerequisites in ascending order first, then each exam as soon as its last
/// prerequisite has been taken.  Returns `None` if there's a cycle.
///
/// Requires both exams of every pair to be below `exam_count`.  Panics
/// otherwise.
pub fn topological_order(
    exam_count: usize,
    prerequisites: &[(Vertex, Vertex)],
) -> Option<Vec<Vertex>> {
    let adjacency_lists = get_adjacency_lists(exam_count, prerequisites);
    let mut order: Vec<Vertex> = Vec::with_capacity(exam_count);
    kahn(&adjacency_lists, |u| order.push(u));
    debug!(
        exam_count,
        prerequisite_count = prerequisites.len(),
        processed = order.len(),
        "topological_order"
    );
    if order.len() == exam_count {
        Some(order)
    } else {
        None
    }
}

/// An exam count below `max_exam_count` together with up to twice as many
/// prerequisite pairs, self-referencing and duplicate pairs included.
pub fn arb_prerequisites(
    max_exam_count: usize,
) -> BoxedStrategy<(usize, Vec<(Vertex, Vertex)>)> {
    (0..max_exam_count)
        .prop_flat_map(|exam_count| {
            if exam_count == 0 {
                return Just((0, Vec::new())).boxed();
            }
            let pairs = proptest::collection::vec(
                (0..exam_count, 0..exam_count),
                0..2 * exam_count,
            );
            (Just(exam_count), pairs).boxed()
        })
        .boxed()
}

/// Pairs that always admit an order: every prerequisite has a smaller number
/// than the exam requiring it.
pub fn arb_acyclic_prerequisites(
    max_exam_count: usize,
) -> BoxedStrategy<(usize, Vec<(Vertex, Vertex)>)> {
    arb_prerequisites(max_exam_count)
        .prop_map(|(exam_count, pairs)| {
            let pairs = pairs
                .into_iter()
                .filter(|(exam, prerequisite)| exam != prerequisite)
                .map(|(a, b)| (a.max(b), a.min(b)))
                .collect();
            (exam_count, pairs)
        })
        .boxed()
}
