use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Ordered tuple of k entities identifying a node of an order-k network
pub type KGram = Vec<String>;

/// Dense node index, assigned in insertion order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A k-gram node with its accumulated edge weights
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HigherOrderNode {
    kgram: KGram,
    /// Observed frequency of the k-gram itself as a subpath
    frequency: f64,
    in_weight: f64,
    out_weight: f64,
}

impl HigherOrderNode {
    pub fn kgram(&self) -> &[String] {
        &self.kgram
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn in_weight(&self) -> f64 {
        self.in_weight
    }

    pub fn out_weight(&self) -> f64 {
        self.out_weight
    }

    /// Last entity of the k-gram (the entity the walker currently occupies)
    pub fn focal(&self) -> Option<&str> {
        self.kgram.last().map(String::as_str)
    }
}

/// Directed transition between two k-grams
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HigherOrderEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f64,
}

/// Network of k-gram nodes and weighted transitions at a fixed order
///
/// Nodes and edges iterate in insertion order. Construction is restricted to
/// the builder, so every edge comes from an observed window.
#[derive(Debug, Clone)]
pub struct HigherOrderNetwork {
    order: usize,
    nodes: Vec<HigherOrderNode>,
    node_index: HashMap<KGram, NodeId>,
    edges: Vec<HigherOrderEdge>,
    edge_index: HashMap<(NodeId, NodeId), usize>,
    /// Outgoing edge indices per node
    outgoing: Vec<Vec<usize>>,
}

impl HigherOrderNetwork {
    pub(crate) fn empty(order: usize) -> Self {
        Self {
            order,
            nodes: Vec::new(),
            node_index: HashMap::new(),
            edges: Vec::new(),
            edge_index: HashMap::new(),
            outgoing: Vec::new(),
        }
    }

    /// Get or insert the node for `kgram`
    pub(crate) fn insert_node(&mut self, kgram: &[String], frequency: f64) -> NodeId {
        if let Some(&id) = self.node_index.get(kgram) {
            return id;
        }

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(HigherOrderNode {
            kgram: kgram.to_vec(),
            frequency,
            in_weight: 0.0,
            out_weight: 0.0,
        });
        self.node_index.insert(kgram.to_vec(), id);
        self.outgoing.push(Vec::new());
        id
    }

    /// Add `weight` to the edge `source -> target`, creating it if absent
    pub(crate) fn add_edge_weight(&mut self, source: NodeId, target: NodeId, weight: f64) {
        match self.edge_index.get(&(source, target)) {
            Some(&idx) => self.edges[idx].weight += weight,
            None => {
                let idx = self.edges.len();
                self.edges.push(HigherOrderEdge {
                    source,
                    target,
                    weight,
                });
                self.edge_index.insert((source, target), idx);
                self.outgoing[source.index()].push(idx);
            }
        }

        self.nodes[source.index()].out_weight += weight;
        self.nodes[target.index()].in_weight += weight;
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&HigherOrderNode> {
        self.nodes.get(id.index())
    }

    pub fn node_id(&self, kgram: &[String]) -> Option<NodeId> {
        self.node_index.get(kgram).copied()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &HigherOrderNode)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (NodeId(idx as u32), node))
    }

    /// Edges in insertion order
    pub fn edges(&self) -> &[HigherOrderEdge] {
        &self.edges
    }

    /// Outgoing edges of `id`
    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &HigherOrderEdge> + '_ {
        self.outgoing
            .get(id.index())
            .into_iter()
            .flatten()
            .map(|&idx| &self.edges[idx])
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.outgoing.get(id.index()).map_or(0, Vec::len)
    }

    pub fn edge_weight(&self, source: &[String], target: &[String]) -> f64 {
        let (Some(s), Some(t)) = (self.node_id(source), self.node_id(target)) else {
            return 0.0;
        };
        self.edge_index
            .get(&(s, t))
            .map_or(0.0, |&idx| self.edges[idx].weight)
    }

    /// Sum of all edge weights (observed transitions at this order)
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.weight).sum()
    }

    /// Expand an edge into the first-order path it represents
    ///
    /// The edge `(a,b) -> (b,c)` expands to `[a, b, c]`.
    pub fn first_order_path(&self, edge: &HigherOrderEdge) -> Vec<String> {
        let source = &self.nodes[edge.source.index()].kgram;
        let target = &self.nodes[edge.target.index()].kgram;

        let mut path = source.clone();
        path.extend(target.last().cloned());
        path
    }

    /// Edge weights keyed by endpoint k-grams, independent of insertion order
    pub fn edge_weights(&self) -> BTreeMap<(KGram, KGram), f64> {
        self.edges
            .iter()
            .map(|e| {
                (
                    (
                        self.nodes[e.source.index()].kgram.clone(),
                        self.nodes[e.target.index()].kgram.clone(),
                    ),
                    e.weight,
                )
            })
            .collect()
    }
}
