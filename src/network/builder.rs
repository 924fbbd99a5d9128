use crate::error::{PathOrderError, Result};
use crate::network::HigherOrderNetwork;
use crate::paths::{PathStatistics, SubpathCounts};
use tracing::debug;

/// Construction path, chosen once per build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Order 0: one node per entity weighted by its frequency, no edges
    DegenerateOrder,
    /// Order k >= 1: k-gram nodes joined by observed (k+1)-subpaths
    GeneralOrder { order: usize },
}

impl BuildMode {
    pub fn for_order(order: usize) -> Self {
        if order == 0 {
            BuildMode::DegenerateOrder
        } else {
            BuildMode::GeneralOrder { order }
        }
    }
}

/// Build the order-`order` network from subpath statistics
///
/// For order 1 this is the ordinary first-order network of the paths.
///
/// # Errors
/// Returns `InsufficientData` if no ingested sequence is long enough to hold a
/// window of `order + 1` entities, or if the statistics do not record that
/// order.
///
/// # Example
/// ```
/// use pathorder::network::build_network;
/// use pathorder::paths::{PathStatistics, Sequence};
///
/// let mut stats = PathStatistics::new(2);
/// stats.ingest(&Sequence::new(["a", "b", "c"])).unwrap();
///
/// let net = build_network(2, &stats).unwrap();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 1);
/// ```
pub fn build_network(order: usize, statistics: &PathStatistics) -> Result<HigherOrderNetwork> {
    let counts = match statistics.subpaths(order) {
        Some(counts) if !counts.is_empty() => counts,
        _ => {
            return Err(PathOrderError::InsufficientData {
                order,
                longest: statistics.longest_path(),
            })
        }
    };

    let network = match BuildMode::for_order(order) {
        BuildMode::DegenerateOrder => build_degenerate(counts),
        BuildMode::GeneralOrder { order } => {
            // Node frequencies come from the k-gram counts one order below
            let lower = statistics.subpaths(order - 1).unwrap_or(counts);
            build_general(order, counts, lower)
        }
    };

    debug!(
        order,
        nodes = network.node_count(),
        edges = network.edge_count(),
        "built higher-order network"
    );

    Ok(network)
}

fn build_degenerate(counts: &SubpathCounts) -> HigherOrderNetwork {
    let mut network = HigherOrderNetwork::empty(0);
    for (key, &count) in counts {
        network.insert_node(key, count);
    }
    network
}

fn build_general(order: usize, counts: &SubpathCounts, lower: &SubpathCounts) -> HigherOrderNetwork {
    let mut network = HigherOrderNetwork::empty(order);

    for (key, &count) in counts {
        let source_kgram = &key[..order];
        let target_kgram = &key[1..];

        let source = network.insert_node(
            source_kgram,
            lower.get(source_kgram).copied().unwrap_or(0.0),
        );
        let target = network.insert_node(
            target_kgram,
            lower.get(target_kgram).copied().unwrap_or(0.0),
        );
        network.add_edge_weight(source, target, count);
    }

    network
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::Sequence;

    #[test]
    fn test_build_mode_dispatch() {
        assert_eq!(BuildMode::for_order(0), BuildMode::DegenerateOrder);
        assert_eq!(
            BuildMode::for_order(3),
            BuildMode::GeneralOrder { order: 3 }
        );
    }

    #[test]
    fn test_degenerate_order_has_no_edges() {
        let stats =
            PathStatistics::from_sequences([&Sequence::new(["a", "b", "a"])], 1).unwrap();
        let net = build_network(0, &stats).unwrap();

        assert_eq!(net.order(), 0);
        assert_eq!(net.node_count(), 2);
        assert_eq!(net.edge_count(), 0);

        let a = net.node_id(&["a".to_string()]).unwrap();
        assert_eq!(net.node(a).unwrap().frequency(), 2.0);
    }

    #[test]
    fn test_insufficient_data_for_long_windows() {
        let stats = PathStatistics::from_sequences([&Sequence::new(["a", "b"])], 3).unwrap();

        assert_eq!(
            build_network(2, &stats).unwrap_err(),
            PathOrderError::InsufficientData {
                order: 2,
                longest: 2
            }
        );
    }

    #[test]
    fn test_order_beyond_capacity_is_insufficient() {
        let stats =
            PathStatistics::from_sequences([&Sequence::new(["a", "b", "c", "d"])], 1).unwrap();

        assert!(matches!(
            build_network(2, &stats),
            Err(PathOrderError::InsufficientData { order: 2, .. })
        ));
    }
}
