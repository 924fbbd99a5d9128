use crate::cache::NetworkCache;
use crate::error::{PathOrderError, Result};
use crate::likelihood::{
    conditional_log_likelihood, degrees_of_freedom, multi_order_log_likelihood,
};
use crate::network::possible_degrees_of_freedom;
use crate::paths::PathStatistics;
use crate::selection::config::{DofMode, LikelihoodMode, SelectionConfig};
use crate::selection::result::{ModelSelectionResult, OrderEvaluation, SelectionStatus};
use crate::selection::statistics::likelihood_ratio_test;
use crate::transition::TransitionModel;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Likelihood-ratio model-order selection over one set of path statistics
///
/// Orders `0..=max_order` are built and evaluated as independent tasks; the
/// pairwise tests then run sequentially in increasing order.
///
/// # Example
/// ```
/// use pathorder::paths::{PathStatistics, Sequence};
/// use pathorder::selection::{ModelOrderSelector, SelectionConfig};
///
/// let corpus: Vec<Sequence> = (0..50)
///     .flat_map(|_| [Sequence::new(["a", "c", "d"]), Sequence::new(["b", "c", "e"])])
///     .collect();
/// let stats = PathStatistics::from_sequences(&corpus, 2).unwrap();
///
/// let config = SelectionConfig { max_order: 2, ..SelectionConfig::default() };
/// let result = ModelOrderSelector::new(&stats, config).unwrap().select().unwrap();
/// assert_eq!(result.optimal_order, 2);
/// ```
#[derive(Debug, Clone)]
pub struct ModelOrderSelector<'a> {
    statistics: &'a PathStatistics,
    config: SelectionConfig,
    cancel: Option<Arc<AtomicBool>>,
    cache: Arc<NetworkCache>,
}

impl<'a> ModelOrderSelector<'a> {
    /// Create a selector for `statistics`
    ///
    /// # Errors
    /// Returns `InvalidConfig` if the configuration is invalid or asks for
    /// orders the statistics do not record.
    pub fn new(statistics: &'a PathStatistics, config: SelectionConfig) -> Result<Self> {
        config.validate()?;

        if config.max_order > statistics.max_order() {
            return Err(PathOrderError::InvalidConfig {
                reason: format!(
                    "max_order {} exceeds the order recorded by the statistics ({})",
                    config.max_order,
                    statistics.max_order()
                ),
            });
        }

        Ok(Self {
            statistics,
            config,
            cancel: None,
            cache: Arc::new(NetworkCache::new()),
        })
    }

    /// Cooperative cancellation flag checked before each order evaluation
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Share a network cache between selectors over the same statistics
    pub fn with_cache(mut self, cache: Arc<NetworkCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Transition model of `order` with the configured smoothing
    pub fn transition_model(&self, order: usize) -> Result<TransitionModel> {
        let network = self.cache.get_or_build(self.statistics, order)?;
        TransitionModel::estimate(network, self.config.smoothing)
    }

    /// Run the selection
    ///
    /// Insufficient data, degenerate likelihoods and cancellation truncate
    /// the order range and are reported in the result status.
    pub fn select(&self) -> Result<ModelSelectionResult> {
        let max_order = self.config.max_order;
        info!(
            max_order,
            alpha = self.config.significance_level,
            mode = ?self.config.likelihood_mode,
            "starting order selection"
        );

        // Phase 1: one model per order, lowest failure caps the range
        let prepared = self.map_orders((0..=max_order).collect(), |order| self.prepare(order));

        let mut models = Vec::new();
        let mut failure = None;
        for outcome in prepared {
            match outcome {
                Ok(model) if failure.is_none() => models.push(model),
                Ok(_) => {}
                Err(err) => {
                    if failure.is_none() {
                        failure = Some(err);
                    }
                }
            }
        }

        // Phase 2: likelihoods of every order that has all its layers
        let dofs = self.degrees_of_freedom(&models);
        let mut outcomes =
            self.map_orders((1..models.len()).collect(), |order| self.evaluate(order, &models, &dofs));
        if let Some(err) = failure {
            outcomes.push(Err(err));
        }

        let result = decide(outcomes, &self.config)?;

        info!(
            optimal_order = result.optimal_order,
            status = ?result.status,
            "order selection finished"
        );
        Ok(result)
    }

    fn prepare(&self, order: usize) -> Result<TransitionModel> {
        self.check_cancelled(order)?;
        self.transition_model(order)
    }

    fn evaluate(
        &self,
        order: usize,
        models: &[TransitionModel],
        dofs: &LayerDofs,
    ) -> Result<OrderEvaluation> {
        self.check_cancelled(order)?;
        debug!(order, "evaluating order");

        // Layer mode scores every order on the windows of the highest prepared order
        let (log_likelihood, observed_at) = match self.config.likelihood_mode {
            LikelihoodMode::MultiOrder => (
                multi_order_log_likelihood(models, self.statistics, order)?,
                order,
            ),
            LikelihoodMode::Layer => {
                let top = models.len() - 1;
                (conditional_log_likelihood(self.statistics, order, top)?, top)
            }
        };

        let network = models[order].network();
        let evaluation = OrderEvaluation {
            order,
            log_likelihood,
            degrees_of_freedom: dofs.model(order, &self.config),
            layer_degrees_of_freedom: dofs.observed[order],
            possible_degrees_of_freedom: dofs.possible[order],
            observations: self.statistics.total_weight_at(observed_at),
            node_count: network.node_count(),
            edge_count: network.edge_count(),
        };

        debug!(
            order,
            log_likelihood,
            dof = evaluation.degrees_of_freedom,
            "order evaluated"
        );
        Ok(evaluation)
    }

    fn degrees_of_freedom(&self, models: &[TransitionModel]) -> LayerDofs {
        let observed: Vec<usize> = models.iter().map(|m| degrees_of_freedom(m.network())).collect();
        // Order 0 counts every entity, including those only seen in single-entity paths
        let possible = observed
            .iter()
            .enumerate()
            .map(|(order, &layer)| match models.get(1) {
                Some(first) if order > 0 => possible_degrees_of_freedom(first.network(), order),
                _ => layer,
            })
            .collect();
        LayerDofs { observed, possible }
    }

    fn check_cancelled(&self, order: usize) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(PathOrderError::Cancelled { order }),
            _ => Ok(()),
        }
    }

    fn map_orders<T, F>(&self, orders: Vec<usize>, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        if self.config.parallel {
            orders.into_par_iter().map(f).collect()
        } else {
            orders.into_iter().map(f).collect()
        }
    }
}

/// Per-layer degrees of freedom, indexed by order
struct LayerDofs {
    observed: Vec<usize>,
    possible: Vec<usize>,
}

impl LayerDofs {
    fn layer(&self, order: usize, mode: DofMode) -> usize {
        match mode {
            DofMode::Observed => self.observed[order],
            DofMode::Possible => self.possible[order],
        }
    }

    fn model(&self, order: usize, config: &SelectionConfig) -> usize {
        match config.likelihood_mode {
            LikelihoodMode::MultiOrder => (0..=order)
                .map(|j| self.layer(j, config.dof_mode))
                .fold(0usize, usize::saturating_add),
            LikelihoodMode::Layer => self.layer(order, config.dof_mode),
        }
    }
}

/// Turn per-order outcomes (order 1 upwards) into a selection result
///
/// Evaluations are kept up to the first failed order. Tests start at order 1
/// and stop at the first one that keeps the null order.
pub fn decide(
    outcomes: Vec<Result<OrderEvaluation>>,
    config: &SelectionConfig,
) -> Result<ModelSelectionResult> {
    let mut evaluations = Vec::new();
    let mut failure = None;
    for outcome in outcomes {
        match outcome {
            Ok(evaluation) => evaluations.push(evaluation),
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }

    let mut tests = Vec::new();
    let mut optimal_order = evaluations.first().map_or(1, |e| e.order);
    let mut converged = false;

    for pair in evaluations.windows(2) {
        let test = likelihood_ratio_test(&pair[0], &pair[1], config.significance_level)?;
        info!(
            null = test.null_order,
            alternative = test.alternative_order,
            statistic = test.statistic,
            dof = test.degrees_of_freedom,
            p_value = test.p_value,
            accept = test.accept_higher_order,
            "likelihood ratio test"
        );

        let accept = test.accept_higher_order;
        tests.push(test);
        if accept {
            optimal_order = pair[1].order;
        } else {
            converged = true;
            break;
        }
    }

    let status = match failure {
        _ if converged => SelectionStatus::Converged,
        Some(cause) => {
            warn!(optimal_order, %cause, "order selection truncated");
            SelectionStatus::Truncated { cause }
        }
        None => SelectionStatus::MaxOrderReached,
    };

    Ok(ModelSelectionResult {
        optimal_order,
        evaluations,
        tests,
        status,
        config: config.clone(),
    })
}
