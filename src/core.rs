//! Items and all-vs-all similarity scores.
//!
//! This module provides the two input abstractions consumed by network
//! construction:
//!
//! - `Item`: anything that exposes attribute lookup by key. The builder reads
//!   the configured identifier through it and never probes items otherwise.
//! - `SimilarityScores`: ordered query items, ordered reference items and a
//!   dense `queries × references` score matrix.
//!
//! # Examples
//!
//! Build an all-vs-all score object over three items:
//!
//! ```
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
//!
//! let scores = SimilarityScores::from_items(items, matrix).unwrap();
//! assert!(scores.is_symmetric("spectrumid"));
//! assert_eq!(scores.score(0, 1), 0.9);
//! ```
//!
//! # Errors
//!
//! Constructors return `NetworkError::ShapeMismatch` when the matrix shape
//! disagrees with the item collections.

use std::collections::BTreeMap;

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::error::{NetworkError, Result};

/// Attribute lookup by key.
///
/// Implementors return `None` when the attribute is absent.
pub trait Item {
    fn get(&self, key: &str) -> Option<&str>;
}

/// An item backed by a string metadata map.
///
/// ```
/// use simnet::core::{Item, MetadataItem};
///
/// let item = MetadataItem::new()
///     .with("spectrumid", "CCMSLIB0001")
///     .with("compound_name", "caffeine");
/// assert_eq!(item.get("spectrumid"), Some("CCMSLIB0001"));
/// assert_eq!(item.get("precursor_mz"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataItem {
    pub metadata: BTreeMap<String, String>,
}

impl MetadataItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an attribute, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl From<BTreeMap<String, String>> for MetadataItem {
    fn from(metadata: BTreeMap<String, String>) -> Self {
        Self { metadata }
    }
}

impl Item for MetadataItem {
    fn get(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

impl<T: Item + ?Sized> Item for &T {
    fn get(&self, key: &str) -> Option<&str> {
        (**self).get(key)
    }
}

/// Pairwise scores between an ordered set of queries and an ordered set of
/// references.
///
/// `matrix` is `queries.len() × references.len()`; entry `(i, j)` is the
/// similarity of query `i` with reference `j`.
#[derive(Clone, Debug)]
pub struct SimilarityScores<I: Item> {
    pub queries: Vec<I>,
    pub references: Vec<I>,
    pub matrix: DenseMatrix<f64>,
}

impl<I: Item> SimilarityScores<I> {
    /// Creates a score object, checking that the matrix shape matches
    /// `(queries.len(), references.len())`.
    pub fn new(queries: Vec<I>, references: Vec<I>, matrix: DenseMatrix<f64>) -> Result<Self> {
        let (rows, cols) = matrix.shape();
        if rows != queries.len() || cols != references.len() {
            return Err(NetworkError::ShapeMismatch {
                rows,
                cols,
                queries: queries.len(),
                references: references.len(),
            });
        }
        debug!("Similarity scores: {} queries x {} references", rows, cols);
        Ok(Self { queries, references, matrix })
    }

    /// All-vs-all scores: the same items serve as queries and references.
    pub fn from_items(items: Vec<I>, matrix: DenseMatrix<f64>) -> Result<Self>
    where
        I: Clone,
    {
        let references = items.clone();
        Self::new(items, references, matrix)
    }

    pub fn n_queries(&self) -> usize {
        self.queries.len()
    }

    pub fn n_references(&self) -> usize {
        self.references.len()
    }

    /// Score between query `i` and reference `j`.
    ///
    /// # Panics
    ///
    /// Panics on out-of-bounds indices.
    #[inline]
    pub fn score(&self, i: usize, j: usize) -> f64 {
        *self.matrix.get((i, j))
    }

    /// Scores of query `i` against every reference, in reference order.
    pub fn row(&self, i: usize) -> Vec<f64> {
        (0..self.n_references()).map(|j| self.score(i, j)).collect()
    }

    /// Scores of every query against reference `j`, in query order.
    pub fn col(&self, j: usize) -> Vec<f64> {
        (0..self.n_queries()).map(|i| self.score(i, j)).collect()
    }

    /// True when queries and references carry the same identifiers in the
    /// same order. Items lacking `key` compare as absent on both sides.
    pub fn is_symmetric(&self, key: &str) -> bool {
        if self.queries.len() != self.references.len() {
            return false;
        }
        let same = self
            .queries
            .iter()
            .zip(self.references.iter())
            .all(|(q, r)| q.get(key) == r.get(key));
        trace!("Symmetry check on '{}': {}", key, same);
        same
    }

    /// Identifier of every query, in order.
    pub fn query_ids(&self, key: &str) -> Result<Vec<String>> {
        collect_ids(&self.queries, key)
    }

    /// Identifier of every reference, in order.
    pub fn reference_ids(&self, key: &str) -> Result<Vec<String>> {
        collect_ids(&self.references, key)
    }
}

fn collect_ids<I: Item>(items: &[I], key: &str) -> Result<Vec<String>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.get(key)
                .map(str::to_owned)
                .ok_or_else(|| NetworkError::MissingIdentifier { key: key.to_owned(), index })
        })
        .collect()
}
