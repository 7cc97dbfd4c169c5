use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use log::{debug, info, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smartcore::linalg::basic::arrays::Array;

use crate::core::{Item, SimilarityScores};
use crate::error::{NetworkError, Result};
use crate::graph::NetworkGraph;
use crate::tophits::{select_top_hits, SearchBy, TopHits};

pub const DEFAULT_IDENTIFIER: &str = "spectrumid";
pub const DEFAULT_TOP_N: usize = 20;
pub const DEFAULT_MAX_LINKS: usize = 10;
pub const DEFAULT_SCORE_CUTOFF: f64 = 0.7;

/// How candidate links are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMethod {
    /// Link A -> B whenever B is in A's top-N
    Single,
    /// Link A -> B only if A is also in B's top-N
    Mutual,
}

impl FromStr for LinkMethod {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "single" => Ok(LinkMethod::Single),
            "mutual" => Ok(LinkMethod::Mutual),
            other => Err(NetworkError::UnsupportedLinkMethod(other.to_owned())),
        }
    }
}

impl fmt::Display for LinkMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkMethod::Single => write!(f, "single"),
            LinkMethod::Mutual => write!(f, "mutual"),
        }
    }
}

fn default_identifier() -> String {
    DEFAULT_IDENTIFIER.to_owned()
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_max_links() -> usize {
    DEFAULT_MAX_LINKS
}

fn default_score_cutoff() -> f64 {
    DEFAULT_SCORE_CUTOFF
}

fn default_keep_unconnected() -> bool {
    true
}

/// Network construction parameters.
///
/// `link_method` has no default and must be given; every other field falls
/// back to its default when deserialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkParams {
    #[serde(default = "default_identifier")]
    pub identifier: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_max_links")]
    pub max_links: usize,
    #[serde(default = "default_score_cutoff")]
    pub score_cutoff: f64,
    pub link_method: LinkMethod,
    #[serde(default = "default_keep_unconnected")]
    pub keep_unconnected_nodes: bool,
}

// Approximate equality on the cutoff, exact on the rest
impl PartialEq for NetworkParams {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
            && self.top_n == other.top_n
            && self.max_links == other.max_links
            && approx::relative_eq!(self.score_cutoff, other.score_cutoff)
            && self.link_method == other.link_method
            && self.keep_unconnected_nodes == other.keep_unconnected_nodes
    }
}

impl NetworkParams {
    /// Defaults for everything except the link method.
    pub fn new(link_method: LinkMethod) -> Self {
        Self {
            identifier: default_identifier(),
            top_n: DEFAULT_TOP_N,
            max_links: DEFAULT_MAX_LINKS,
            score_cutoff: DEFAULT_SCORE_CUTOFF,
            link_method,
            keep_unconnected_nodes: true,
        }
    }

    /// Check ranges and consistency.
    pub fn validate(&self) -> Result<()> {
        if self.identifier.is_empty() {
            return Err(NetworkError::InvalidParameter {
                name: "identifier",
                reason: "must not be empty".to_owned(),
            });
        }
        if self.top_n < 1 {
            return Err(NetworkError::InvalidParameter {
                name: "top_n",
                reason: format!("must be >= 1, got {}", self.top_n),
            });
        }
        if self.max_links < 1 {
            return Err(NetworkError::InvalidParameter {
                name: "max_links",
                reason: format!("must be >= 1, got {}", self.max_links),
            });
        }
        if !self.score_cutoff.is_finite() {
            return Err(NetworkError::InvalidParameter {
                name: "score_cutoff",
                reason: format!("must be a finite number, got {}", self.score_cutoff),
            });
        }
        if self.top_n < self.max_links {
            return Err(NetworkError::TopNBelowMaxLinks {
                top_n: self.top_n,
                max_links: self.max_links,
            });
        }
        Ok(())
    }
}

/// Outgoing links proposed by one item before merging into the graph.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkProposal {
    pub source: String,
    pub targets: Vec<(String, f64)>,
}

pub struct SimilarityNetworkBuilder {
    params: NetworkParams,
}

impl SimilarityNetworkBuilder {
    /// The link method is the only mandatory setting.
    pub fn new(link_method: LinkMethod) -> Self {
        info!("Initializing SimilarityNetworkBuilder ({})", link_method);
        Self { params: NetworkParams::new(link_method) }
    }

    pub fn from_params(params: NetworkParams) -> Self {
        debug!("SimilarityNetworkBuilder from params: {:?}", params);
        Self { params }
    }

    /// Attribute key used to read each item's unique id (node name).
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.params.identifier = identifier.into();
        self
    }

    /// Size of each item's candidate list. Must be >= `max_links`.
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.params.top_n = top_n;
        self
    }

    /// Maximum links added per item. Incoming links from other items can
    /// still push a node's degree above this.
    pub fn with_max_links(mut self, max_links: usize) -> Self {
        self.params.max_links = max_links;
        self
    }

    /// Links are only made for scores >= `score_cutoff`.
    ///
    /// The cutoff must be finite: NaN and ±inf are rejected by `build()`.
    /// Use a very low finite value (e.g. `f64::MIN`) to keep every candidate.
    pub fn with_score_cutoff(mut self, score_cutoff: f64) -> Self {
        self.params.score_cutoff = score_cutoff;
        self
    }

    pub fn with_keep_unconnected_nodes(mut self, keep: bool) -> Self {
        self.params.keep_unconnected_nodes = keep;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// `TopNBelowMaxLinks` or `InvalidParameter`, see [`NetworkParams::validate`].
    pub fn build(self) -> Result<SimilarityNetwork> {
        self.params.validate()?;
        info!(
            "SimilarityNetwork configured: identifier='{}', top_n={}, max_links={}, score_cutoff={}, link_method={}",
            self.params.identifier,
            self.params.top_n,
            self.params.max_links,
            self.params.score_cutoff,
            self.params.link_method
        );
        Ok(SimilarityNetwork { params: self.params, graph: None })
    }
}

/// Builds similarity networks from all-vs-all scores and keeps the last
/// successfully built graph.
#[derive(Debug, Clone)]
pub struct SimilarityNetwork {
    params: NetworkParams,
    graph: Option<NetworkGraph>,
}

impl SimilarityNetwork {
    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// Last graph produced by [`create_network`](Self::create_network).
    pub fn graph(&self) -> Option<&NetworkGraph> {
        self.graph.as_ref()
    }

    /// Build the network from symmetric (all-vs-all) scores and store it,
    /// replacing any previous graph.
    ///
    /// On error nothing is stored and the previous graph stays in place.
    ///
    /// # Errors
    ///
    /// - `AsymmetricScores` if queries and references differ.
    /// - `ShapeMismatch` if the matrix is not `n × n`.
    /// - `MissingIdentifier` if an item lacks the identifier.
    pub fn create_network<I: Item + Sync>(
        &mut self,
        scores: &SimilarityScores<I>,
    ) -> Result<&NetworkGraph> {
        let graph = self.build_graph(scores)?;
        let stored: &NetworkGraph = self.graph.insert(graph);
        Ok(stored)
    }

    /// Per-item outgoing links after self-exclusion, cutoff, degree cap and
    /// link-method filtering, in query order.
    pub fn propose_links<I: Item + Sync>(
        &self,
        scores: &SimilarityScores<I>,
    ) -> Result<Vec<LinkProposal>> {
        let ids = self.checked_ids(scores)?;
        let hits = select_top_hits(
            scores,
            &self.params.identifier,
            self.params.top_n,
            SearchBy::Queries,
            true,
        )?;
        Ok(self.proposals_from_hits(&ids, &hits))
    }

    fn build_graph<I: Item + Sync>(&self, scores: &SimilarityScores<I>) -> Result<NetworkGraph> {
        self.params.validate()?;
        info!("Creating network from {} items", scores.n_queries());

        let ids = self.checked_ids(scores)?;
        let hits = select_top_hits(
            scores,
            &self.params.identifier,
            self.params.top_n,
            SearchBy::Queries,
            true,
        )?;

        // 1) nodes: every unique id, isolated or not
        let unique: BTreeSet<&str> = ids.iter().map(String::as_str).collect();
        let mut graph = NetworkGraph::new();
        graph.add_nodes_from(unique.iter().copied());
        debug!("Added {} nodes ({} items)", graph.node_count(), ids.len());

        // 2) edges from per-item proposals
        let proposals = self.proposals_from_hits(&ids, &hits);
        let mut n_proposed = 0usize;
        for proposal in proposals {
            n_proposed += proposal.targets.len();
            for (target, score) in proposal.targets {
                graph.add_weighted_edge(&proposal.source, &target, score);
            }
        }
        debug!("{} links proposed, {} edges in graph", n_proposed, graph.edge_count());

        if !self.params.keep_unconnected_nodes {
            let removed = graph.remove_isolated_nodes();
            debug!("Removed {} unconnected nodes", removed);
        }

        info!(
            "Network built: {} nodes, {} edges ({} linking)",
            graph.node_count(),
            graph.edge_count(),
            self.params.link_method
        );
        Ok(graph)
    }

    /// Identifiers in query order, after checking the all-vs-all contract.
    fn checked_ids<I: Item>(&self, scores: &SimilarityScores<I>) -> Result<Vec<String>> {
        let key = &self.params.identifier;
        let query_ids = scores.query_ids(key)?;
        let reference_ids = scores.reference_ids(key)?;
        if !scores.is_symmetric(key) {
            return Err(NetworkError::AsymmetricScores {
                queries: query_ids.len(),
                references: reference_ids.len(),
            });
        }

        let n = query_ids.len();
        let (rows, cols) = scores.matrix.shape();
        if rows != n || cols != n {
            return Err(NetworkError::ShapeMismatch {
                rows,
                cols,
                queries: n,
                references: n,
            });
        }
        Ok(query_ids)
    }

    fn proposals_from_hits(&self, ids: &[String], hits: &TopHits) -> Vec<LinkProposal> {
        (0..ids.len())
            .into_par_iter()
            .map(|i| self.propose_for(i, ids, hits))
            .collect()
    }

    /// Outgoing links for query `i`.
    fn propose_for(&self, i: usize, ids: &[String], hits: &TopHits) -> LinkProposal {
        let query_id = &ids[i];

        let targets: Vec<(String, f64)> = hits
            .candidates(query_id)
            .into_iter()
            .map(|(j, score)| (&ids[j], score))
            .filter(|(candidate, score)| *candidate != query_id && *score >= self.params.score_cutoff)
            .take(self.params.max_links)
            .filter(|(candidate, _)| match self.params.link_method {
                LinkMethod::Single => true,
                LinkMethod::Mutual => hits.contains(candidate, i),
            })
            .map(|(candidate, score)| (candidate.clone(), score))
            .collect();

        trace!("'{}' proposes {:?}", query_id, targets);
        LinkProposal { source: query_id.clone(), targets }
    }
}
