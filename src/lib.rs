//! # Example
//! ```rust
//! use automaton::{automaton::advance, graph::Graph};
//!
//! let mut graph = Graph::builder().node_count(400).seed(7).build().unwrap();
//! let center = graph.center_node();
//! graph.activate(center).unwrap();
//! advance(&mut graph).unwrap();
//! assert_eq!(graph.active_nodes(), graph.neighbors(center).into_iter().collect::<Vec<_>>());
//! ```

pub mod automaton;
pub mod error;
pub mod graph;
pub mod layout;
pub mod renderer;

pub use error::{AutomatonError, Result};
