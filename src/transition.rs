//! Transition probabilities of an order-k network
//!
//! For a node `u` with outgoing weight `W(u)`, the maximum-likelihood estimate
//! is `P(v | u) = w(u -> v) / W(u)`. With smoothing `s > 0` every *possible*
//! successor of `u` receives a pseudo-count `s` first:
//!
//! ```text
//! P(v | u) = (w(u -> v) + s) / (W(u) + s * |succ(u)|)
//! ```
//!
//! The possible successors of `(x1, .., xk)` are all nodes `(x2, .., xk, y)` of
//! the same network, observed or not. Nodes without outgoing weight are
//! absorbing: their distribution is empty regardless of smoothing.
//!
//! Order 0 has no transitions; its model is the entity frequency distribution,
//! exposed through [`TransitionModel::initial_probability`].

use crate::error::{PathOrderError, Result};
use crate::network::{HigherOrderNetwork, NodeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Per-node successor distributions derived from a network's edge weights
#[derive(Debug, Clone)]
pub struct TransitionModel {
    network: Arc<HigherOrderNetwork>,
    smoothing: f64,
    /// Successor distribution per node, indexed by `NodeId`
    distributions: Vec<Vec<(NodeId, f64)>>,
    /// Order 0 only: probability of each entity
    initial: Vec<f64>,
}

impl TransitionModel {
    /// Estimate transition probabilities from `network`
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `smoothing` is negative or not finite.
    ///
    /// # Example
    /// ```
    /// use pathorder::network::build_network;
    /// use pathorder::paths::{PathStatistics, Sequence};
    /// use pathorder::transition::TransitionModel;
    ///
    /// let mut stats = PathStatistics::new(1);
    /// stats.ingest(&Sequence::new(["a", "b", "c"])).unwrap();
    /// stats.ingest(&Sequence::new(["a", "b", "d"])).unwrap();
    ///
    /// let model = TransitionModel::estimate(build_network(1, &stats).unwrap(), 0.0).unwrap();
    /// let b = vec!["b".to_string()];
    /// assert_eq!(model.probability(&b, &["c".to_string()]), 0.5);
    /// ```
    pub fn estimate(network: impl Into<Arc<HigherOrderNetwork>>, smoothing: f64) -> Result<Self> {
        if !smoothing.is_finite() || smoothing < 0.0 {
            return Err(PathOrderError::InvalidConfig {
                reason: format!("smoothing must be finite and non-negative, got {}", smoothing),
            });
        }

        let network = network.into();

        let (distributions, initial) = if network.order() == 0 {
            (vec![Vec::new(); network.node_count()], initial_distribution(&network, smoothing))
        } else if smoothing > 0.0 {
            (smoothed_distributions(&network, smoothing), Vec::new())
        } else {
            (observed_distributions(&network), Vec::new())
        };

        Ok(Self {
            network,
            smoothing,
            distributions,
            initial,
        })
    }

    pub fn order(&self) -> usize {
        self.network.order()
    }

    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    pub fn network(&self) -> &HigherOrderNetwork {
        &self.network
    }

    /// Successor distribution of `node` (empty for absorbing nodes)
    pub fn successors(&self, node: NodeId) -> &[(NodeId, f64)] {
        self.distributions
            .get(node.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Successor distribution keyed by k-gram, or `None` for unknown k-grams
    pub fn distribution(&self, source: &[String]) -> Option<Vec<(&[String], f64)>> {
        let id = self.network.node_id(source)?;
        Some(
            self.successors(id)
                .iter()
                .filter_map(|&(target, p)| self.network.node(target).map(|n| (n.kgram(), p)))
                .collect(),
        )
    }

    /// Probability of moving from k-gram `source` to k-gram `target`
    ///
    /// Unknown k-grams and unobserved transitions have probability 0.
    pub fn probability(&self, source: &[String], target: &[String]) -> f64 {
        let (Some(s), Some(t)) = (self.network.node_id(source), self.network.node_id(target))
        else {
            return 0.0;
        };

        self.successors(s)
            .iter()
            .find(|(id, _)| *id == t)
            .map_or(0.0, |&(_, p)| p)
    }

    /// Order-0 probability of observing `entity`
    pub fn initial_probability(&self, entity: &str) -> f64 {
        self.network
            .node_id(&[entity.to_string()])
            .and_then(|id| self.initial.get(id.index()).copied())
            .unwrap_or(0.0)
    }

    /// Nodes with no successors
    pub fn is_absorbing(&self, node: NodeId) -> bool {
        self.successors(node).is_empty()
    }
}

fn initial_distribution(network: &HigherOrderNetwork, smoothing: f64) -> Vec<f64> {
    let n = network.node_count() as f64;
    let total: f64 = network.nodes().map(|(_, node)| node.frequency()).sum::<f64>() + smoothing * n;

    if total <= 0.0 {
        return vec![0.0; network.node_count()];
    }

    network
        .nodes()
        .map(|(_, node)| (node.frequency() + smoothing) / total)
        .collect()
}

fn observed_distributions(network: &HigherOrderNetwork) -> Vec<Vec<(NodeId, f64)>> {
    network
        .nodes()
        .map(|(id, node)| {
            let total = node.out_weight();
            if total <= 0.0 {
                return Vec::new();
            }
            network
                .outgoing(id)
                .map(|edge| (edge.target, edge.weight / total))
                .collect()
        })
        .collect()
}

fn smoothed_distributions(network: &HigherOrderNetwork, smoothing: f64) -> Vec<Vec<(NodeId, f64)>> {
    // Nodes grouped by their first k-1 entities: the successors of (x1..xk)
    // are exactly the nodes whose prefix is (x2..xk)
    let mut by_prefix: HashMap<&[String], Vec<NodeId>> = HashMap::new();
    for (id, node) in network.nodes() {
        let kgram = node.kgram();
        by_prefix
            .entry(&kgram[..kgram.len() - 1])
            .or_default()
            .push(id);
    }

    network
        .nodes()
        .map(|(id, node)| {
            let observed = node.out_weight();
            if observed <= 0.0 {
                return Vec::new();
            }

            let kgram = node.kgram();
            let candidates = by_prefix
                .get(&kgram[1..])
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            let total = observed + smoothing * candidates.len() as f64;

            let weights: HashMap<NodeId, f64> = network
                .outgoing(id)
                .map(|edge| (edge.target, edge.weight))
                .collect();

            candidates
                .iter()
                .map(|&target| {
                    let w = weights.get(&target).copied().unwrap_or(0.0);
                    (target, (w + smoothing) / total)
                })
                .collect()
        })
        .collect()
}
