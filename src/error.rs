//! Error taxonomy for path statistics, network construction and order selection
//!
//! Only `InvalidWeight` and `InvalidConfig` abort an operation outright.
//! `DegenerateLikelihood`, `InsufficientData` and `Cancelled` are recovered by
//! the order selector, which caps the usable order range and reports the cause
//! in its result.

use serde::Serialize;
use thiserror::Error;

/// Errors produced by the statistical core
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathOrderError {
    #[error("Invalid weight {weight}: weights must be finite and non-negative")]
    InvalidWeight { weight: f64 },

    #[error("Degenerate likelihood at order {order}: transition {from} -> {to} has zero probability")]
    DegenerateLikelihood {
        order: usize,
        from: String,
        to: String,
    },

    #[error("Insufficient data for order {order}: longest observed path has {longest} entities")]
    InsufficientData { order: usize, longest: usize },

    #[error("Order selection truncated at order {order}: {reason}")]
    Truncated { order: usize, reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Evaluation of order {order} was cancelled")]
    Cancelled { order: usize },
}

/// Result type for the statistical core
pub type Result<T> = std::result::Result<T, PathOrderError>;
