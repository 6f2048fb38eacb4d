//! The activation step.
//!
//! Every active node passes its activity to all of its neighbors and then goes
//! quiet itself. The new state is the union of the neighborhoods of the
//! previously active nodes and nothing else, so activity requires a neighbor to
//! persist: an isolated node that is active dies after one step, and the fully
//! inactive state never changes again.

use log::trace;

use crate::{
    error::{AutomatonError, Result},
    graph::{EdgeSet, Graph},
};

/// Computes the activity vector that follows `activity` on the graph given by `edges`.
///
/// Every edge is visited once and an active endpoint reaches the other one,
/// which yields the union of [`crate::graph::neighbors`] over the active nodes.
/// Edges reaching past the end of `activity` are ignored.
pub fn next_activity(edges: &EdgeSet, activity: &[bool]) -> Vec<bool> {
    let is_active = |node: usize| activity.get(node).copied().unwrap_or(false);

    let mut next = vec![false; activity.len()];
    for edge in edges.iter() {
        let (low, high): (usize, usize) = (*edge).into();
        if is_active(low) {
            if let Some(slot) = next.get_mut(high) {
                *slot = true;
            }
        }
        if is_active(high) {
            if let Some(slot) = next.get_mut(low) {
                *slot = true;
            }
        }
    }
    next
}

/// Advances `graph.activity` by one step in place.
pub fn advance(graph: &mut Graph) -> Result<()> {
    if graph.activity.len() != graph.node_count() {
        return Err(AutomatonError::InvalidState {
            expected: graph.node_count(),
            actual: graph.activity.len(),
        });
    }

    let next = next_activity(graph.edges(), &graph.activity);
    trace!(
        "advance: {} active -> {} active",
        graph.activity.iter().filter(|a| **a).count(),
        next.iter().filter(|a| **a).count()
    );
    graph.activity = next;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn path_graph() -> Graph {
        Graph::from_edges(4, [(0, 1), (1, 2)]).unwrap()
    }

    fn bits(v: &[u8]) -> Vec<bool> {
        v.iter().map(|b| *b == 1).collect()
    }

    #[test]
    fn test_end_node_activates_its_only_neighbor() {
        let mut g = path_graph();
        g.activity = bits(&[1, 0, 0, 0]);
        advance(&mut g).unwrap();
        assert_eq!(g.activity, bits(&[0, 1, 0, 0]));
    }

    #[test]
    fn test_middle_node_spreads_both_ways() {
        let mut g = path_graph();
        g.activity = bits(&[0, 1, 0, 0]);
        advance(&mut g).unwrap();
        assert_eq!(g.activity, bits(&[1, 0, 1, 0]));
    }

    #[test]
    fn test_isolated_node_dies() {
        let mut g = path_graph();
        g.activity = bits(&[0, 0, 0, 1]);
        advance(&mut g).unwrap();
        assert_eq!(g.activity, bits(&[0, 0, 0, 0]));
    }

    #[test]
    fn test_empty_state_is_absorbing() {
        let mut g = Graph::builder()
            .node_count(49)
            .edge_probability(0.3)
            .seed(11)
            .build()
            .unwrap();
        for _ in 0..3 {
            advance(&mut g).unwrap();
            assert!(g.activity.iter().all(|a| !a));
        }
    }

    #[test]
    fn test_shared_neighbor_counted_once() {
        // 0 - 1 - 2, both ends active
        let g = path_graph();
        let next = next_activity(g.edges(), &bits(&[1, 0, 1, 0]));
        assert_eq!(next, bits(&[0, 1, 0, 0]));
    }

    #[test]
    fn test_wrong_activity_length_is_rejected() {
        let mut g = path_graph();
        g.activity = vec![true; 3];
        assert_eq!(
            advance(&mut g),
            Err(AutomatonError::InvalidState {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(g.activity, vec![true; 3]);
    }

    #[test]
    fn test_step_equals_union_of_neighborhoods() {
        use std::collections::BTreeSet;

        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(21);
        let g = Graph::generate(225, 0.03, &mut rng).unwrap();
        let activity: Vec<bool> = (0..225).map(|_| rng.gen_bool(0.1)).collect();

        let reached: BTreeSet<usize> = activity
            .iter()
            .enumerate()
            .filter(|(_, active)| **active)
            .flat_map(|(node, _)| g.neighbors(node))
            .collect();
        let expected: Vec<bool> = (0..225).map(|node| reached.contains(&node)).collect();

        assert_eq!(next_activity(g.edges(), &activity), expected);
    }
}
