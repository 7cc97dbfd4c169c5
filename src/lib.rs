//! # simnet
//!
//! Sparse similarity networks from all-vs-all score matrices.
//!
//! Given pairwise scores over one set of items (for example spectral
//! similarities between samples), `simnet` keeps for every item its strongest
//! neighbours and assembles them into an undirected weighted graph:
//!
//! 1. `tophits::select_top_hits` ranks every item's counterparts and keeps the top N.
//! 2. `builder::SimilarityNetwork` filters those candidates by score cutoff,
//!    caps outgoing links per item, optionally requires reciprocity
//!    ("mutual" linking) and merges everything into a `graph::NetworkGraph`.
//!
//! ```
//! use simnet::builder::{LinkMethod, SimilarityNetworkBuilder};
//! use simnet::core::{MetadataItem, SimilarityScores};
//! use smartcore::linalg::basic::arrays::Array2;
//! use smartcore::linalg::basic::matrix::DenseMatrix;
//!
//! let items: Vec<MetadataItem> = ["A", "B", "C"]
//!     .iter()
//!     .map(|id| MetadataItem::new().with("spectrumid", *id))
//!     .collect();
//! let matrix = DenseMatrix::from_iterator(
//!     vec![1.0, 0.9, 0.5, 0.9, 1.0, 0.3, 0.5, 0.3, 1.0].into_iter(),
//!     3,
//!     3,
//!     0,
//! );
//! let scores = SimilarityScores::from_items(items, matrix).unwrap();
//!
//! let mut network = SimilarityNetworkBuilder::new(LinkMethod::Single)
//!     .with_top_n(2)
//!     .with_max_links(2)
//!     .with_score_cutoff(0.7)
//!     .build()
//!     .unwrap();
//! let graph = network.create_network(&scores).unwrap();
//!
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edge_count(), 1);
//! assert_eq!(graph.weight("A", "B"), Some(0.9));
//! ```
//!
//! The library logs through the `log` facade and never installs a logger.

pub mod builder;
pub mod core;
pub mod error;
pub mod graph;
pub mod tophits;

#[cfg(test)]
mod tests;
