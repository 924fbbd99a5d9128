//! Log-likelihood of observed paths under an order-k transition model
//!
//! Three evaluations are provided:
//!
//! - [`log_likelihood`] scores every window of length k+1 with the order-k
//!   model alone (`sum count * ln p(source -> target)`).
//! - [`multi_order_log_likelihood`] scores the first k positions of each path
//!   with the lower-order models and the remaining positions with the order-k
//!   model, so models of successive orders explain exactly the same
//!   observations.
//! - [`conditional_log_likelihood`] scores the last entity of every window of
//!   a fixed length from the k entities before it. All orders up to that
//!   length see the same observations.
//!
//! A zero modeled probability for an observed transition is reported as
//! `DegenerateLikelihood`; the sums never become `-inf` or `NaN`.

use crate::error::{PathOrderError, Result};
use crate::network::HigherOrderNetwork;
use crate::paths::{PathStatistics, SubpathCounts};
use crate::transition::TransitionModel;
use std::collections::HashMap;

/// Log-likelihood of the order-`order` windows under `model`
///
/// # Errors
/// - `InvalidConfig` if the model was estimated for a different order
/// - `InsufficientData` if the statistics do not record `order`
/// - `DegenerateLikelihood` if an observed window has zero probability
pub fn log_likelihood(
    model: &TransitionModel,
    statistics: &PathStatistics,
    order: usize,
) -> Result<f64> {
    check_order(model, order)?;

    let counts = statistics
        .subpaths(order)
        .ok_or(PathOrderError::InsufficientData {
            order,
            longest: statistics.longest_path(),
        })?;

    sum_log_terms(model, counts)
}

/// Log-likelihood of the multi-order model combining layers `0..=order`
///
/// `models[j]` must be the order-j model for every `j <= order`. Position `j`
/// of a path (`j < order`) is predicted by `models[j]` from the prefix
/// statistics; every later position by `models[order]` from the windows.
///
/// # Example
/// ```
/// use pathorder::likelihood::multi_order_log_likelihood;
/// use pathorder::network::build_network;
/// use pathorder::paths::{PathStatistics, Sequence};
/// use pathorder::transition::TransitionModel;
///
/// let stats = PathStatistics::from_sequences(
///     &[Sequence::new(["a", "b"]), Sequence::new(["b", "a"])],
///     1,
/// ).unwrap();
/// let models: Vec<TransitionModel> = (0..=1)
///     .map(|k| TransitionModel::estimate(build_network(k, &stats).unwrap(), 0.0).unwrap())
///     .collect();
///
/// // Each first entity has probability 1/2, every continuation is certain
/// let ll = multi_order_log_likelihood(&models, &stats, 1).unwrap();
/// assert!((ll - 2.0 * 0.5f64.ln()).abs() < 1e-12);
/// ```
pub fn multi_order_log_likelihood(
    models: &[TransitionModel],
    statistics: &PathStatistics,
    order: usize,
) -> Result<f64> {
    if models.len() <= order {
        return Err(PathOrderError::InvalidConfig {
            reason: format!(
                "multi-order likelihood of order {} needs {} layers, got {}",
                order,
                order + 1,
                models.len()
            ),
        });
    }

    let mut total = 0.0;
    for (j, model) in models.iter().enumerate().take(order) {
        check_order(model, j)?;
        if let Some(prefixes) = statistics.prefixes(j) {
            total += sum_log_terms(model, prefixes)?;
        }
    }

    Ok(total + log_likelihood(&models[order], statistics, order)?)
}

/// Log-likelihood of the last entity of each `window_order` window given the
/// `order` entities before it
///
/// Probabilities are the maximum-likelihood estimate over the same windows,
/// so for a fixed `window_order` the value never decreases with `order` and
/// two orders can be compared by a likelihood-ratio test. Smoothing does not
/// apply.
///
/// # Errors
/// - `InvalidConfig` if `order > window_order`
/// - `InsufficientData` if the statistics do not record `window_order`
///
/// # Example
/// ```
/// use pathorder::likelihood::conditional_log_likelihood;
/// use pathorder::paths::{PathStatistics, Sequence};
///
/// let stats = PathStatistics::from_sequences(
///     &[Sequence::new(["a", "b", "c"]), Sequence::new(["a", "b", "d"])],
///     2,
/// ).unwrap();
///
/// // Given b the next entity is a coin flip; given (a, b) as well
/// let first = conditional_log_likelihood(&stats, 1, 2).unwrap();
/// let second = conditional_log_likelihood(&stats, 2, 2).unwrap();
/// assert!((first - 2.0 * 0.5f64.ln()).abs() < 1e-12);
/// assert!((second - first).abs() < 1e-12);
/// ```
pub fn conditional_log_likelihood(
    statistics: &PathStatistics,
    order: usize,
    window_order: usize,
) -> Result<f64> {
    if order > window_order {
        return Err(PathOrderError::InvalidConfig {
            reason: format!(
                "order {} cannot be scored on windows of order {}",
                order, window_order
            ),
        });
    }

    let windows = statistics
        .subpaths(window_order)
        .ok_or(PathOrderError::InsufficientData {
            order: window_order,
            longest: statistics.longest_path(),
        })?;

    // Suffix of length order+1: `order` context entities, then the target
    let start = window_order - order;
    let mut transitions: HashMap<&[String], f64> = HashMap::new();
    let mut contexts: HashMap<&[String], f64> = HashMap::new();
    for (key, &count) in windows {
        if count <= 0.0 {
            continue;
        }
        *transitions.entry(&key[start..]).or_insert(0.0) += count;
        *contexts.entry(&key[start..window_order]).or_insert(0.0) += count;
    }

    Ok(transitions
        .iter()
        .map(|(suffix, &count)| match contexts.get(&suffix[..order]) {
            Some(&total) => count * (count / total).ln(),
            None => 0.0,
        })
        .sum())
}

/// Free parameters of a network's transition model
///
/// Each node with out-degree `d >= 1` contributes `d - 1`. Order 0 has
/// `entities - 1`.
pub fn degrees_of_freedom(network: &HigherOrderNetwork) -> usize {
    if network.order() == 0 {
        return network.node_count().saturating_sub(1);
    }

    network
        .nodes()
        .map(|(id, _)| network.out_degree(id).saturating_sub(1))
        .sum()
}

fn check_order(model: &TransitionModel, order: usize) -> Result<()> {
    if model.order() != order {
        return Err(PathOrderError::InvalidConfig {
            reason: format!(
                "model of order {} cannot score windows of order {}",
                model.order(),
                order
            ),
        });
    }
    Ok(())
}

fn sum_log_terms(model: &TransitionModel, counts: &SubpathCounts) -> Result<f64> {
    let order = model.order();
    let mut total = 0.0;

    for (key, &count) in counts {
        if count <= 0.0 {
            continue;
        }

        let p = if order == 0 {
            model.initial_probability(&key[0])
        } else {
            model.probability(&key[..order], &key[1..])
        };

        if p <= 0.0 {
            return Err(PathOrderError::DegenerateLikelihood {
                order,
                from: key[..order].join(","),
                to: key[order.min(1)..].join(","),
            });
        }

        total += count * p.ln();
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::build_network;
    use crate::paths::Sequence;

    fn corpus() -> Vec<Sequence> {
        vec![
            Sequence::new(["a", "c", "d"]).with_weight(3.0),
            Sequence::new(["b", "c", "e"]).with_weight(2.0),
            Sequence::new(["a", "c", "e"]),
            Sequence::new(["e", "a", "c", "d", "d"]),
        ]
    }

    fn models(stats: &PathStatistics, max: usize) -> Vec<TransitionModel> {
        (0..=max)
            .map(|k| TransitionModel::estimate(build_network(k, stats).unwrap(), 0.0).unwrap())
            .collect()
    }

    #[test]
    fn test_first_order_likelihood_by_hand() {
        let stats = PathStatistics::from_sequences(
            &[Sequence::new(["a", "b", "c"]), Sequence::new(["a", "b", "d"])],
            1,
        )
        .unwrap();
        let m = models(&stats, 1);

        // (a,b) twice with p = 1, (b,c) and (b,d) once each with p = 1/2
        let ll = log_likelihood(&m[1], &stats, 1).unwrap();
        assert!((ll - 2.0 * 0.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_order_zero_likelihood() {
        let stats = PathStatistics::from_sequences([&Sequence::new(["a", "a", "b", "a"])], 1).unwrap();
        let m = models(&stats, 0);

        let ll = log_likelihood(&m[0], &stats, 0).unwrap();
        let expected = 3.0 * 0.75f64.ln() + 0.25f64.ln();
        assert!((ll - expected).abs() < 1e-12);
    }

    #[test]
    fn test_layer_likelihood_never_decreases_with_order() {
        let stats = PathStatistics::from_sequences(&corpus(), 3).unwrap();
        let m = models(&stats, 3);

        // Layer k+1 is scored on fewer windows, each at least as well predicted
        for k in 1..3 {
            let lower = log_likelihood(&m[k], &stats, k).unwrap();
            let higher = log_likelihood(&m[k + 1], &stats, k + 1).unwrap();
            assert!(higher >= lower - 1e-9, "order {}", k);
        }
    }

    #[test]
    fn test_multi_order_likelihood_never_decreases_with_order() {
        let stats = PathStatistics::from_sequences(&corpus(), 3).unwrap();
        let m = models(&stats, 3);

        let values: Vec<f64> = (0..=3)
            .map(|k| multi_order_log_likelihood(&m, &stats, k).unwrap())
            .collect();
        for pair in values.windows(2) {
            assert!(pair[1] >= pair[0] - 1e-9, "{:?}", values);
        }
    }

    #[test]
    fn test_conditional_likelihood_never_decreases_with_order() {
        let stats = PathStatistics::from_sequences(&corpus(), 3).unwrap();

        let values: Vec<f64> = (0..=3)
            .map(|k| conditional_log_likelihood(&stats, k, 3).unwrap())
            .collect();
        for pair in values.windows(2) {
            assert!(pair[1] >= pair[0] - 1e-9, "{:?}", values);
        }
    }

    #[test]
    fn test_conditional_likelihood_shares_observations() {
        // Windows of length 3: (a,c,d) x3, (b,c,e) x2, (a,c,e), (e,a,c), (a,c,d), (c,d,d)
        let stats = PathStatistics::from_sequences(&corpus(), 2).unwrap();

        // Order 0 predicts the last entity from its frequency among 9 windows
        let zero = conditional_log_likelihood(&stats, 0, 2).unwrap();
        let expected = 5.0 * (5.0f64 / 9.0).ln() + 3.0 * (3.0f64 / 9.0).ln() + (1.0f64 / 9.0).ln();
        assert!((zero - expected).abs() < 1e-12);

        // Order 2 is deterministic except after (a,c): d x4, e x1
        let two = conditional_log_likelihood(&stats, 2, 2).unwrap();
        let expected = 4.0 * 0.8f64.ln() + 0.2f64.ln();
        assert!((two - expected).abs() < 1e-12);
    }

    #[test]
    fn test_conditional_likelihood_rejects_order_above_window() {
        let stats = PathStatistics::from_sequences(&corpus(), 2).unwrap();

        assert!(matches!(
            conditional_log_likelihood(&stats, 3, 2),
            Err(PathOrderError::InvalidConfig { .. })
        ));
        assert!(matches!(
            conditional_log_likelihood(&stats, 1, 3),
            Err(PathOrderError::InsufficientData { order: 3, .. })
        ));
    }

    #[test]
    fn test_multi_order_zero_equals_layer_zero() {
        let stats = PathStatistics::from_sequences(&corpus(), 2).unwrap();
        let m = models(&stats, 2);

        assert_eq!(
            multi_order_log_likelihood(&m, &stats, 0).unwrap(),
            log_likelihood(&m[0], &stats, 0).unwrap()
        );
    }

    #[test]
    fn test_unseen_transition_is_degenerate() {
        let train = PathStatistics::from_sequences([&Sequence::new(["a", "b", "c"])], 1).unwrap();
        let test = PathStatistics::from_sequences([&Sequence::new(["a", "c"])], 1).unwrap();
        let model = TransitionModel::estimate(build_network(1, &train).unwrap(), 0.0).unwrap();

        assert_eq!(
            log_likelihood(&model, &test, 1).unwrap_err(),
            PathOrderError::DegenerateLikelihood {
                order: 1,
                from: "a".to_string(),
                to: "c".to_string(),
            }
        );
    }

    #[test]
    fn test_smoothing_does_not_rescue_unknown_nodes() {
        let train = PathStatistics::from_sequences([&Sequence::new(["a", "b"])], 1).unwrap();
        let test = PathStatistics::from_sequences([&Sequence::new(["a", "z"])], 1).unwrap();
        let model = TransitionModel::estimate(build_network(1, &train).unwrap(), 1.0).unwrap();

        assert!(matches!(
            log_likelihood(&model, &test, 1),
            Err(PathOrderError::DegenerateLikelihood { .. })
        ));
    }

    #[test]
    fn test_order_mismatch_rejected() {
        let stats = PathStatistics::from_sequences(&corpus(), 2).unwrap();
        let m = models(&stats, 2);

        assert!(matches!(
            log_likelihood(&m[1], &stats, 2),
            Err(PathOrderError::InvalidConfig { .. })
        ));
        assert!(matches!(
            multi_order_log_likelihood(&m[..2], &stats, 2),
            Err(PathOrderError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_degrees_of_freedom() {
        let stats = PathStatistics::from_sequences(&corpus(), 2).unwrap();

        // Entities a, b, c, d, e
        assert_eq!(degrees_of_freedom(&build_network(0, &stats).unwrap()), 4);
        // c -> {d, e}, d -> {d}, e -> {a}, a -> {c}, b -> {c}
        assert_eq!(degrees_of_freedom(&build_network(1, &stats).unwrap()), 1);
        // (a,c) -> {(c,d), (c,e)}, everything else deterministic
        assert_eq!(degrees_of_freedom(&build_network(2, &stats).unwrap()), 1);
    }
}
