// Model-Order Selection via Likelihood-Ratio Tests
//
// Starting at order 1, each order k is compared against k+1 with the
// statistic L = -2 * (loglik(k) - loglik(k+1)), which is asymptotically
// chi-squared distributed with dof(k+1) - dof(k) degrees of freedom under the
// null hypothesis that order k suffices. Rejecting the null advances the
// candidate; the first non-rejection stops the search.
//
// Terminal states:
// - Converged: a test kept the null order
// - MaxOrderReached: every test up to the maximum order rejected the null
// - Truncated: an order could not be evaluated (insufficient data,
//   degenerate likelihood, cancellation); the optimum is the last
//   well-defined order
//
// Chi-squared tail probabilities come from statrs.

mod config;
mod result;
mod selector;
mod statistics;

pub use config::{DofMode, LikelihoodMode, SelectionConfig};
pub use result::{ModelSelectionResult, OrderEvaluation, SelectionStatus};
pub use selector::{decide, ModelOrderSelector};
pub use statistics::{chi_squared_sf, likelihood_ratio_test, LikelihoodRatioTest};
