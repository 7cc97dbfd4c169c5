//! Per-item top-N candidate selection over a score matrix.
//!
//! For every item along the chosen axis, all counterparts are ranked by
//! descending score and the first `top_n` are kept. Sorting is stable so
//! equal scores keep ascending index order, which makes the output fully
//! deterministic. NaN scores rank after every finite score.
//!
//! Rows (or columns) are ranked independently in parallel and collected in
//! order before being keyed by identifier.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use log::{debug, trace, warn};
use rayon::prelude::*;

use crate::core::{Item, SimilarityScores};
use crate::error::{NetworkError, Result};

/// Axis along which candidates are ranked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchBy {
    /// Rank references for every query row
    #[default]
    Queries,
    /// Rank queries for every reference column
    References,
}

/// Highest-scoring counterparts of every item, keyed by identifier.
///
/// `indices[id]` holds positions on the opposite axis, `scores[id]` the
/// matching scores; both share ordering (descending score).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopHits {
    pub indices: BTreeMap<String, Vec<usize>>,
    pub scores: BTreeMap<String, Vec<f64>>,
}

impl TopHits {
    /// Ranked `(index, score)` pairs for `id`, empty if the id is unknown.
    pub fn candidates(&self, id: &str) -> Vec<(usize, f64)> {
        match (self.indices.get(id), self.scores.get(id)) {
            (Some(idx), Some(sc)) => idx.iter().copied().zip(sc.iter().copied()).collect(),
            _ => Vec::new(),
        }
    }

    /// True if `index` is among the top hits of `id`.
    pub fn contains(&self, id: &str, index: usize) -> bool {
        self.indices
            .get(id)
            .map(|idx| idx.contains(&index))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Descending order on scores with NaN sorted last.
#[inline]
fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Rank `values` (indexed by position) and keep the first `top_n`,
/// optionally skipping position `skip`.
pub(crate) fn rank_top_n(values: &[f64], top_n: usize, skip: Option<usize>) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = values
        .iter()
        .copied()
        .enumerate()
        .filter(|&(j, _)| Some(j) != skip)
        .collect();

    // stable: ties keep ascending index
    ranked.sort_by(|a, b| descending(a.1, b.1));
    ranked.truncate(top_n);
    ranked
}

/// Select the `top_n` highest-scoring counterparts of every item.
///
/// - `identifier`: attribute key used to label each item in the result.
/// - `search_by`: rank along query rows or reference columns.
/// - `ignore_diagonal`: skip the entry at the item's own position; use for
///   all-vs-all scores.
///
/// Returns fewer than `top_n` hits per item when not enough counterparts
/// exist. Items sharing an identifier collapse to a single entry, the last
/// one in axis order wins.
///
/// # Errors
///
/// - `InvalidParameter` if `top_n < 1`.
/// - `MissingIdentifier` if an item on the search axis lacks `identifier`.
pub fn select_top_hits<I: Item + Sync>(
    scores: &SimilarityScores<I>,
    identifier: &str,
    top_n: usize,
    search_by: SearchBy,
    ignore_diagonal: bool,
) -> Result<TopHits> {
    if top_n < 1 {
        return Err(NetworkError::InvalidParameter {
            name: "top_n",
            reason: format!("must be >= 1, got {top_n}"),
        });
    }

    let ids = match search_by {
        SearchBy::Queries => scores.query_ids(identifier)?,
        SearchBy::References => scores.reference_ids(identifier)?,
    };
    debug!(
        "Selecting top {} hits for {} items by {:?} (ignore_diagonal={})",
        top_n,
        ids.len(),
        search_by,
        ignore_diagonal
    );

    let ranked: Vec<Vec<(usize, f64)>> = (0..ids.len())
        .into_par_iter()
        .map(|i| {
            let values = match search_by {
                SearchBy::Queries => scores.row(i),
                SearchBy::References => scores.col(i),
            };
            let skip = if ignore_diagonal { Some(i) } else { None };
            rank_top_n(&values, top_n, skip)
        })
        .collect();

    let mut hits = TopHits::default();
    for (id, row) in ids.into_iter().zip(ranked) {
        trace!("Top hits for '{}': {:?}", id, row);
        let (idx, sc): (Vec<usize>, Vec<f64>) = row.into_iter().unzip();
        if hits.indices.insert(id.clone(), idx).is_some() {
            warn!("Duplicate identifier '{}': keeping the later item's hits", id);
        }
        hits.scores.insert(id, sc);
    }

    debug!("Top hits collected for {} unique identifiers", hits.len());
    Ok(hits)
}
