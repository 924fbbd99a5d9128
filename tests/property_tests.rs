//! Property-based tests for subpath statistics, networks and transition models

use pathorder::likelihood::log_likelihood;
use pathorder::network::build_network;
use pathorder::paths::{PathStatistics, Sequence};
use pathorder::selection::{ModelOrderSelector, SelectionConfig};
use pathorder::transition::TransitionModel;
use proptest::prelude::*;

fn corpus_strategy() -> impl Strategy<Value = Vec<Sequence>> {
    prop::collection::vec(
        (prop::collection::vec("[a-d]", 1..10), 1u32..5),
        1..20,
    )
    .prop_map(|paths| {
        paths
            .into_iter()
            .map(|(entities, weight)| Sequence::new(entities).with_weight(weight as f64))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_sequence_contributes_length_minus_order_windows(
        entities in prop::collection::vec("[a-e]", 1..15),
    ) {
        let seq = Sequence::new(entities.clone());
        let stats = PathStatistics::from_sequences([&seq], 4).unwrap();

        for order in 0..=4usize {
            let expected = entities.len().saturating_sub(order) as f64;
            prop_assert_eq!(stats.total_weight_at(order), expected);
        }
    }

    #[test]
    fn prop_ingestion_is_commutative(corpus in corpus_strategy()) {
        let forward = PathStatistics::from_sequences(&corpus, 3).unwrap();
        let backward = PathStatistics::from_sequences(corpus.iter().rev(), 3).unwrap();

        for order in 0..=3 {
            prop_assert_eq!(forward.subpaths(order), backward.subpaths(order));
        }
    }

    #[test]
    fn prop_distributions_sum_to_one(corpus in corpus_strategy(), smoothing in 0.0f64..2.0) {
        let stats = PathStatistics::from_sequences(&corpus, 2).unwrap();

        for order in 1..=2 {
            let Ok(network) = build_network(order, &stats) else { continue };
            let model = TransitionModel::estimate(network, smoothing).unwrap();

            for (id, _) in model.network().nodes() {
                let successors = model.successors(id);
                if successors.is_empty() {
                    continue;
                }
                let total: f64 = successors.iter().map(|(_, p)| p).sum();
                prop_assert!((total - 1.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn prop_layer_likelihood_monotone_in_order(corpus in corpus_strategy()) {
        let stats = PathStatistics::from_sequences(&corpus, 3).unwrap();

        for order in 1..3 {
            let (Ok(lower), Ok(higher)) = (build_network(order, &stats), build_network(order + 1, &stats)) else {
                continue;
            };
            let lower = TransitionModel::estimate(lower, 0.0).unwrap();
            let higher = TransitionModel::estimate(higher, 0.0).unwrap();

            let ll_lower = log_likelihood(&lower, &stats, order).unwrap();
            let ll_higher = log_likelihood(&higher, &stats, order + 1).unwrap();
            prop_assert!(ll_higher >= ll_lower - 1e-9 * (1.0 + ll_lower.abs()));
        }
    }

    #[test]
    fn prop_rebuild_is_idempotent(corpus in corpus_strategy()) {
        let stats = PathStatistics::from_sequences(&corpus, 2).unwrap();

        for order in 0..=2 {
            if let (Ok(first), Ok(second)) = (build_network(order, &stats), build_network(order, &stats)) {
                prop_assert_eq!(first.edge_weights(), second.edge_weights());
                prop_assert_eq!(first.node_count(), second.node_count());
            }
        }
    }

    #[test]
    fn prop_selection_stays_in_range(corpus in corpus_strategy()) {
        let stats = PathStatistics::from_sequences(&corpus, 3).unwrap();
        let result = ModelOrderSelector::new(&stats, SelectionConfig::default())
            .unwrap()
            .select()
            .unwrap();

        prop_assert!(result.optimal_order >= 1 && result.optimal_order <= 3);
        prop_assert!(result.tests.len() <= 2);
        for test in &result.tests {
            prop_assert!(test.statistic >= 0.0);
            prop_assert!((0.0..=1.0).contains(&test.p_value));
        }
    }
}
