// Likelihood-ratio test between two nested orders using statrs
//
// The test statistic L = -2 * (loglik(null) - loglik(alternative)) is compared
// against a chi-squared distribution with dof(alternative) - dof(null)
// degrees of freedom. The alternative (higher) order is accepted when the
// p-value falls below the significance level.

use crate::error::{PathOrderError, Result};
use crate::selection::result::OrderEvaluation;
use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Statistics below this magnitude are floating-point noise
const STATISTIC_TOLERANCE: f64 = 1e-9;

/// Outcome of one pairwise likelihood-ratio test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikelihoodRatioTest {
    /// Order of the null model
    pub null_order: usize,

    /// Order of the alternative model (null + 1)
    pub alternative_order: usize,

    /// -2 * (loglik(null) - loglik(alternative)), clamped at 0
    pub statistic: f64,

    /// Additional degrees of freedom of the alternative model
    ///
    /// Signed: an observed higher-order network can have fewer free
    /// parameters than the lower one.
    pub degrees_of_freedom: i64,

    /// Upper-tail probability of the statistic
    /// - p < alpha: higher order explains the data significantly better
    /// - p >= alpha: stay at the null order
    pub p_value: f64,

    /// Whether the null hypothesis was rejected in favour of the higher order
    pub accept_higher_order: bool,
}

/// Test `null` against `alternative` at the given significance level
///
/// When the alternative adds no degrees of freedom the chi-squared
/// distribution is undefined: a positive statistic then gives p = 0 (the
/// higher order fits better for free) and anything else p = 1.
///
/// # Example
/// ```
/// use pathorder::selection::{likelihood_ratio_test, OrderEvaluation};
///
/// let null = OrderEvaluation::new(1, -120.0, 2);
/// let alternative = OrderEvaluation::new(2, -100.0, 4);
///
/// let test = likelihood_ratio_test(&null, &alternative, 0.05).unwrap();
/// assert_eq!(test.statistic, 40.0);
/// assert!(test.accept_higher_order);
/// ```
pub fn likelihood_ratio_test(
    null: &OrderEvaluation,
    alternative: &OrderEvaluation,
    significance_level: f64,
) -> Result<LikelihoodRatioTest> {
    let raw = -2.0 * (null.log_likelihood - alternative.log_likelihood);
    let statistic = if raw < STATISTIC_TOLERANCE { 0.0 } else { raw };

    let degrees_of_freedom =
        alternative.degrees_of_freedom as i64 - null.degrees_of_freedom as i64;

    let p_value = if degrees_of_freedom <= 0 {
        if statistic > 0.0 {
            0.0
        } else {
            1.0
        }
    } else {
        chi_squared_sf(statistic, degrees_of_freedom as f64)?
    };

    Ok(LikelihoodRatioTest {
        null_order: null.order,
        alternative_order: alternative.order,
        statistic,
        degrees_of_freedom,
        p_value,
        accept_higher_order: p_value < significance_level,
    })
}

/// Upper-tail probability P(X >= x) for X ~ chi-squared(dof)
pub fn chi_squared_sf(x: f64, dof: f64) -> Result<f64> {
    let dist = ChiSquared::new(dof).map_err(|e| PathOrderError::InvalidConfig {
        reason: format!("invalid chi-squared degrees of freedom {}: {}", dof, e),
    })?;
    Ok(dist.sf(x))
}
