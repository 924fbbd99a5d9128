// Selection results: per-order evaluations, pairwise tests and the decision
//
// Everything here is produced once per selection run and read-only
// afterwards. Reports render as text, JSON (serde_json) or CSV rows.

use crate::error::{PathOrderError, Result};
use crate::selection::config::SelectionConfig;
use crate::selection::statistics::LikelihoodRatioTest;
use serde::Serialize;

/// Likelihood and model size of a single order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderEvaluation {
    pub order: usize,

    /// Log-likelihood of the corpus under this order's model
    pub log_likelihood: f64,

    /// Degrees of freedom entering the likelihood-ratio test
    ///
    /// In multi-order mode these accumulate the layer counts of orders
    /// `0..=order`; in layer mode they equal the layer count.
    pub degrees_of_freedom: usize,

    /// Free parameters of the observed order-k network alone
    pub layer_degrees_of_freedom: usize,

    /// Free parameters over every k-gram that is a first-order walk
    pub possible_degrees_of_freedom: usize,

    /// Total weight of the observed transitions at this order
    pub observations: f64,

    pub node_count: usize,
    pub edge_count: usize,
}

impl OrderEvaluation {
    /// Evaluation carrying only the values a likelihood-ratio test needs
    pub fn new(order: usize, log_likelihood: f64, degrees_of_freedom: usize) -> Self {
        Self {
            order,
            log_likelihood,
            degrees_of_freedom,
            layer_degrees_of_freedom: degrees_of_freedom,
            possible_degrees_of_freedom: 0,
            observations: 0.0,
            node_count: 0,
            edge_count: 0,
        }
    }
}

/// How a selection run ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SelectionStatus {
    /// A test failed to reject the null order
    Converged,

    /// Every test up to the maximum order rejected the null
    ///
    /// The data may carry correlations beyond the maximum order considered.
    MaxOrderReached,

    /// An evaluation could not be completed; the optimum is the last
    /// well-defined order
    Truncated { cause: PathOrderError },
}

/// Outcome of a model-order selection run
#[derive(Debug, Clone, Serialize)]
pub struct ModelSelectionResult {
    /// Minimal order that captures the correlation structure
    pub optimal_order: usize,

    /// Evaluations in increasing order, starting at order 1
    pub evaluations: Vec<OrderEvaluation>,

    /// Pairwise tests (k vs k+1) in the order they were performed
    pub tests: Vec<LikelihoodRatioTest>,

    pub status: SelectionStatus,

    /// Configuration the run used
    pub config: SelectionConfig,
}

impl ModelSelectionResult {
    /// True unless a test failed to reject, i.e. a higher order may have been
    /// cut off
    pub fn possibly_truncated(&self) -> bool {
        !matches!(self.status, SelectionStatus::Converged)
    }

    /// Optimal order, or `Truncated` if an evaluation could not be completed
    pub fn check(&self) -> Result<usize> {
        match &self.status {
            SelectionStatus::Truncated { cause } => Err(PathOrderError::Truncated {
                order: self.optimal_order,
                reason: cause.to_string(),
            }),
            _ => Ok(self.optimal_order),
        }
    }

    pub fn evaluation(&self, order: usize) -> Option<&OrderEvaluation> {
        self.evaluations.iter().find(|e| e.order == order)
    }

    /// Test whose alternative is `order`
    pub fn test_for(&self, order: usize) -> Option<&LikelihoodRatioTest> {
        self.tests.iter().find(|t| t.alternative_order == order)
    }

    /// Generate human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Model Order Selection ===\n\n");
        report.push_str(&format!("Optimal order: {}\n", self.optimal_order));
        report.push_str(&format!("Status: {}\n", self.status_label()));
        if let SelectionStatus::Truncated { cause } = &self.status {
            report.push_str(&format!("Cause: {}\n", cause));
        }
        if matches!(self.status, SelectionStatus::MaxOrderReached) {
            report.push_str(&format!(
                "Warning: every order up to {} was accepted; a higher order may be truncated\n",
                self.config.max_order
            ));
        }
        report.push_str(&format!(
            "Significance level: {} ({}% confidence)\n\n",
            self.config.significance_level,
            (1.0 - self.config.significance_level) * 100.0
        ));

        report.push_str(&format!(
            "{:>5}  {:>16}  {:>8}  {:>12}  {:>8}  {:>8}\n",
            "order", "log L", "dof", "observations", "nodes", "edges"
        ));
        for eval in &self.evaluations {
            let marker = if eval.order == self.optimal_order { " *" } else { "" };
            report.push_str(&format!(
                "{:>5}  {:>16.4}  {:>8}  {:>12.1}  {:>8}  {:>8}{}\n",
                eval.order,
                eval.log_likelihood,
                eval.degrees_of_freedom,
                eval.observations,
                eval.node_count,
                eval.edge_count,
                marker
            ));
        }

        if !self.tests.is_empty() {
            report.push_str("\nLikelihood ratio tests:\n");
            for test in &self.tests {
                report.push_str(&format!(
                    "  {} vs {}: statistic={:.4}, delta dof={}, p={:.6} -> {}\n",
                    test.null_order,
                    test.alternative_order,
                    test.statistic,
                    test.degrees_of_freedom,
                    test.p_value,
                    if test.accept_higher_order {
                        "accept higher order"
                    } else {
                        "keep null order"
                    }
                ));
            }
        }

        report
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One CSV row per evaluated order; test columns are empty for the first
    pub fn to_csv(&self) -> String {
        let mut csv =
            String::from("order,log_likelihood,dof,observations,statistic,p_value,decision\n");

        for eval in &self.evaluations {
            let (statistic, p_value, decision) = match self.test_for(eval.order) {
                Some(test) => (
                    test.statistic.to_string(),
                    test.p_value.to_string(),
                    if test.accept_higher_order { "accept" } else { "reject" },
                ),
                None => (String::new(), String::new(), ""),
            };

            csv.push_str(&format!(
                "{},{},{},{},{},{},{}\n",
                eval.order,
                eval.log_likelihood,
                eval.degrees_of_freedom,
                eval.observations,
                statistic,
                p_value,
                decision
            ));
        }

        csv
    }

    fn status_label(&self) -> &'static str {
        match self.status {
            SelectionStatus::Converged => "converged",
            SelectionStatus::MaxOrderReached => "max order reached",
            SelectionStatus::Truncated { .. } => "truncated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: SelectionStatus) -> ModelSelectionResult {
        let evaluations = vec![
            OrderEvaluation::new(1, -120.0, 2),
            OrderEvaluation::new(2, -100.0, 4),
        ];
        let tests = vec![LikelihoodRatioTest {
            null_order: 1,
            alternative_order: 2,
            statistic: 40.0,
            degrees_of_freedom: 2,
            p_value: 2.0e-9,
            accept_higher_order: true,
        }];

        ModelSelectionResult {
            optimal_order: 2,
            evaluations,
            tests,
            status,
            config: SelectionConfig::default(),
        }
    }

    #[test]
    fn test_converged_is_not_truncated() {
        let r = result(SelectionStatus::Converged);
        assert!(!r.possibly_truncated());
        assert_eq!(r.check().unwrap(), 2);
    }

    #[test]
    fn test_max_order_reached_flags_truncation() {
        let r = result(SelectionStatus::MaxOrderReached);
        assert!(r.possibly_truncated());
        assert_eq!(r.check().unwrap(), 2);
        assert!(r.to_report_string().contains("higher order may be truncated"));
    }

    #[test]
    fn test_truncated_check_returns_error() {
        let cause = PathOrderError::InsufficientData {
            order: 3,
            longest: 3,
        };
        let r = result(SelectionStatus::Truncated { cause });

        match r.check() {
            Err(PathOrderError::Truncated { order, reason }) => {
                assert_eq!(order, 2);
                assert!(reason.contains("Insufficient data for order 3"));
            }
            other => panic!("expected Truncated, got {:?}", other),
        }
    }

    #[test]
    fn test_report_lists_orders_and_tests() {
        let report = result(SelectionStatus::Converged).to_report_string();

        assert!(report.contains("Optimal order: 2"));
        assert!(report.contains("Status: converged"));
        assert!(report.contains("1 vs 2: statistic=40.0000"));
        assert!(report.contains("accept higher order"));
    }

    #[test]
    fn test_csv_rows() {
        let csv = result(SelectionStatus::Converged).to_csv();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "order,log_likelihood,dof,observations,statistic,p_value,decision"
        );
        assert_eq!(lines[1], "1,-120,2,0,,,");
        assert!(lines[2].starts_with("2,-100,4,0,40,"));
        assert!(lines[2].ends_with(",accept"));
    }

    #[test]
    fn test_json_carries_status_and_cause() {
        let cause = PathOrderError::Cancelled { order: 2 };
        let json = result(SelectionStatus::Truncated { cause }).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["optimal_order"], 2);
        assert_eq!(value["status"]["status"], "truncated");
        assert_eq!(value["status"]["cause"]["kind"], "cancelled");
        assert_eq!(value["evaluations"].as_array().unwrap().len(), 2);
        assert_eq!(value["config"]["likelihood_mode"], "multi_order");
    }
}
