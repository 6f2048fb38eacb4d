use std::collections::{BTreeSet, HashMap};

use log::debug;
use petgraph::{
    graph::{IndexType, UnGraph},
    EdgeType,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{AutomatonError, Result};

/// Probability with which each node pair gets connected.
pub const DEFAULT_EDGE_PROBABILITY: f64 = 0.01;

/// 20 x 20 grid.
pub const DEFAULT_NODE_COUNT: usize = 400;

/// Undirected edge between two distinct nodes.
/// The smaller index is always stored first, so `(a, b)` and `(b, a)` are the same edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(usize, usize);

impl Edge {
    /// Returns `None` for self-loops.
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self(a, b)),
            std::cmp::Ordering::Greater => Some(Self(b, a)),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> usize {
        self.0
    }

    pub fn high(&self) -> usize {
        self.1
    }

    /// The endpoint opposite to `node`, if `node` is part of this edge.
    pub fn other(&self, node: usize) -> Option<usize> {
        if self.0 == node {
            Some(self.1)
        } else if self.1 == node {
            Some(self.0)
        } else {
            None
        }
    }
}

impl From<Edge> for (usize, usize) {
    fn from(edge: Edge) -> Self {
        (edge.0, edge.1)
    }
}

pub type EdgeSet = BTreeSet<Edge>;

/// Read-only access to everything needed to draw a graph.
pub trait GraphView {
    fn node_count(&self) -> usize;
    fn activity(&self) -> &[bool];
    fn edges(&self) -> &EdgeSet;
}

/// Every node connected to `node` by an edge in `edges`.
pub fn neighbors(edges: &EdgeSet, node: usize) -> BTreeSet<usize> {
    edges.iter().filter_map(|edge| edge.other(node)).collect()
}

/// Fixed-size undirected graph with one binary activity value per node.
///
/// Edges never change after construction. `activity` is owned by the caller:
/// seed it with [`Graph::activate`] or by writing the field, then move it forward
/// with [`crate::automaton::advance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    node_count: usize,
    pub activity: Vec<bool>,
    edges: EdgeSet,
}

impl Graph {
    /// Random graph with the default edge probability, seeded from the thread rng.
    pub fn new(node_count: usize) -> Result<Self> {
        Self::generate(
            node_count,
            DEFAULT_EDGE_PROBABILITY,
            &mut rand::thread_rng(),
        )
    }

    pub fn builder() -> GraphBuilder {
        GraphBuilder::default()
    }

    /// Includes every pair `i < j` independently with probability `edge_probability`.
    /// Runs in `O(n^2)`, which is fine for a few hundred nodes.
    pub fn generate<R>(node_count: usize, edge_probability: f64, rng: &mut R) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        check_node_count(node_count)?;
        if !(0.0..=1.0).contains(&edge_probability) {
            return Err(AutomatonError::InvalidArgument(format!(
                "edge probability must be within [0, 1], got {edge_probability}"
            )));
        }

        let mut edges = EdgeSet::new();
        for i in 0..node_count {
            for j in (i + 1)..node_count {
                if rng.gen_bool(edge_probability) {
                    edges.insert(Edge(i, j));
                }
            }
        }

        debug!(
            "generated {} edges for {} nodes (p = {})",
            edges.len(),
            node_count,
            edge_probability
        );

        Ok(Self {
            node_count,
            activity: vec![false; node_count],
            edges,
        })
    }

    /// Builds a graph from a fixed list of node pairs.
    /// Pairs may be given in either orientation; duplicates collapse.
    pub fn from_edges<I>(node_count: usize, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        check_node_count(node_count)?;

        let mut edges = EdgeSet::new();
        for (a, b) in pairs {
            if a >= node_count || b >= node_count {
                return Err(AutomatonError::InvalidArgument(format!(
                    "edge ({a}, {b}) references a node outside 0..{node_count}"
                )));
            }
            let edge = Edge::new(a, b).ok_or_else(|| {
                AutomatonError::InvalidArgument(format!("self-loop on node {a} is not allowed"))
            })?;
            edges.insert(edge);
        }

        Ok(Self {
            node_count,
            activity: vec![false; node_count],
            edges,
        })
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn neighbors(&self, node: usize) -> BTreeSet<usize> {
        neighbors(&self.edges, node)
    }

    /// The node the demo activates before the first frame.
    pub fn center_node(&self) -> usize {
        self.node_count / 2
    }

    pub fn activate(&mut self, node: usize) -> Result<()> {
        self.set_active(node, true)
    }

    pub fn deactivate(&mut self, node: usize) -> Result<()> {
        self.set_active(node, false)
    }

    fn set_active(&mut self, node: usize, active: bool) -> Result<()> {
        let slot = self.activity.get_mut(node).ok_or_else(|| {
            AutomatonError::InvalidArgument(format!(
                "node {node} is outside 0..{}",
                self.node_count
            ))
        })?;
        *slot = active;
        Ok(())
    }

    pub fn active_nodes(&self) -> Vec<usize> {
        self.activity
            .iter()
            .enumerate()
            .filter_map(|(i, active)| active.then_some(i))
            .collect()
    }

    /// Exports the graph with each node weighted by its activity.
    pub fn to_petgraph(&self) -> UnGraph<bool, ()> {
        let mut graph = UnGraph::with_capacity(self.node_count, self.edges.len());
        let indices: Vec<_> = (0..self.node_count)
            .map(|i| graph.add_node(self.activity.get(i).copied().unwrap_or(false)))
            .collect();
        for edge in self.edges.iter() {
            let (low, high): (usize, usize) = (*edge).into();
            graph.add_edge(indices[low], indices[high], ());
        }
        graph
    }
}

impl GraphView for Graph {
    fn node_count(&self) -> usize {
        self.node_count
    }

    fn activity(&self) -> &[bool] {
        &self.activity
    }

    fn edges(&self) -> &EdgeSet {
        &self.edges
    }
}

/// Imports any petgraph graph. Edge direction and weights are dropped.
impl<N, E, Ty, Ix> TryFrom<&petgraph::Graph<N, E, Ty, Ix>> for Graph
where
    Ty: EdgeType,
    Ix: IndexType,
{
    type Error = AutomatonError;

    fn try_from(graph: &petgraph::Graph<N, E, Ty, Ix>) -> Result<Self> {
        let pairs = graph
            .raw_edges()
            .iter()
            .map(|e| (e.source().index(), e.target().index()));
        Self::from_edges(graph.node_count(), pairs)
    }
}

fn check_node_count(node_count: usize) -> Result<()> {
    if node_count == 0 {
        return Err(AutomatonError::InvalidArgument(
            "node count must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Builder for a random `Graph`
pub struct GraphBuilder {
    node_count: usize,
    edge_probability: f64,
    seed: Option<u64>,
}

impl GraphBuilder {
    /// Get a Instance of `GraphBuilder` with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes. Use a perfect square to get a regular grid.
    pub fn node_count(mut self, node_count: usize) -> Self {
        self.node_count = node_count;
        self
    }

    /// Chance that any given pair of nodes is connected.
    /// Value should be between 0.0 and 1.0.
    pub fn edge_probability(mut self, edge_probability: f64) -> Self {
        self.edge_probability = edge_probability;
        self
    }

    /// Makes generation reproducible.
    /// Without a seed every build draws a different graph.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generates the graph
    pub fn build(self) -> Result<Graph> {
        match self.seed {
            Some(seed) => Graph::generate(
                self.node_count,
                self.edge_probability,
                &mut StdRng::seed_from_u64(seed),
            ),
            None => Graph::generate(
                self.node_count,
                self.edge_probability,
                &mut rand::thread_rng(),
            ),
        }
    }
}

impl Default for GraphBuilder {
    /// Get a Instance of `GraphBuilder` with default values
    fn default() -> Self {
        Self {
            node_count: DEFAULT_NODE_COUNT,
            edge_probability: DEFAULT_EDGE_PROBABILITY,
            seed: None,
        }
    }
}

/// Degree of every node that has at least one edge.
pub fn degrees(edges: &EdgeSet) -> HashMap<usize, usize> {
    let mut degrees = HashMap::new();
    for edge in edges.iter() {
        *degrees.entry(edge.0).or_insert(0) += 1;
        *degrees.entry(edge.1).or_insert(0) += 1;
    }
    degrees
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_edge_is_canonical() {
        assert_eq!(Edge::new(3, 1), Edge::new(1, 3));
        let edge = Edge::new(5, 2).unwrap();
        assert_eq!((edge.low(), edge.high()), (2, 5));
        assert_eq!(Edge::new(4, 4), None);
    }

    #[test]
    fn test_generated_graph_is_well_formed() {
        for n in [1, 2, 17, 100] {
            let g = Graph::new(n).unwrap();
            assert_eq!(g.activity.len(), n);
            assert!(g.activity.iter().all(|a| !a));
            for edge in g.edges() {
                assert!(edge.low() < edge.high());
                assert!(edge.high() < n);
            }
        }
    }

    #[test]
    fn test_zero_nodes_rejected() {
        assert!(matches!(
            Graph::new(0),
            Err(AutomatonError::InvalidArgument(_))
        ));
        assert!(Graph::from_edges(0, []).is_err());
    }

    #[test]
    fn test_probability_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(Graph::generate(10, 1.5, &mut rng).is_err());
        assert!(Graph::generate(10, -0.1, &mut rng).is_err());

        let empty = Graph::generate(10, 0.0, &mut rng).unwrap();
        assert_eq!(empty.edge_count(), 0);

        let complete = Graph::generate(10, 1.0, &mut rng).unwrap();
        assert_eq!(complete.edge_count(), 10 * 9 / 2);
    }

    #[test]
    fn test_seeded_builder_is_deterministic() {
        let a = Graph::builder().node_count(100).seed(42).build().unwrap();
        let b = Graph::builder().node_count(100).seed(42).build().unwrap();
        assert_eq!(a.edges(), b.edges());
    }

    #[test]
    fn test_from_edges_validation() {
        let g = Graph::from_edges(4, [(1, 0), (0, 1), (2, 1)]).unwrap();
        assert_eq!(g.edge_count(), 2);
        assert!(g.edges().contains(&Edge::new(0, 1).unwrap()));

        assert!(Graph::from_edges(4, [(2, 2)]).is_err());
        assert!(Graph::from_edges(4, [(0, 4)]).is_err());
    }

    #[test]
    fn test_neighbors_exclude_self() {
        let g = Graph::from_edges(4, [(0, 1), (1, 2)]).unwrap();
        assert_eq!(g.neighbors(1), BTreeSet::from([0, 2]));
        assert_eq!(g.neighbors(0), BTreeSet::from([1]));
        assert!(g.neighbors(3).is_empty());

        let random = Graph::builder()
            .node_count(64)
            .edge_probability(0.2)
            .seed(3)
            .build()
            .unwrap();
        for i in 0..64 {
            assert!(!random.neighbors(i).contains(&i));
        }
    }

    #[test]
    fn test_activate_and_active_nodes() {
        let mut g = Graph::from_edges(9, []).unwrap();
        assert_eq!(g.center_node(), 4);
        g.activate(g.center_node()).unwrap();
        g.activate(8).unwrap();
        assert_eq!(g.active_nodes(), vec![4, 8]);
        g.deactivate(8).unwrap();
        assert_eq!(g.active_nodes(), vec![4]);
        assert!(g.activate(9).is_err());
    }

    #[test]
    fn test_petgraph_export() {
        let mut g = Graph::from_edges(3, [(0, 2)]).unwrap();
        g.activate(2).unwrap();
        let pg = g.to_petgraph();
        assert_eq!(pg.node_count(), 3);
        assert_eq!(pg.edge_count(), 1);
        assert_eq!(
            pg.node_weights().copied().collect::<Vec<_>>(),
            vec![false, false, true]
        );
    }

    #[test]
    fn test_degrees() {
        let g = Graph::from_edges(4, [(0, 1), (1, 2)]).unwrap();
        let d = degrees(g.edges());
        assert_eq!(d.get(&1), Some(&2));
        assert_eq!(d.get(&3), None);
    }
}
