//! Pathorder - higher-order network models of path data and Markov order selection
//!
//! This library aggregates observed paths (click-streams, itineraries,
//! citation chains) into subpath statistics, builds higher-order networks of
//! increasing order from them, and selects the minimal order that explains
//! the data using likelihood-ratio tests.
//!
//! ```
//! use pathorder::paths::{PathStatistics, Sequence};
//! use pathorder::selection::{ModelOrderSelector, SelectionConfig, SelectionStatus};
//!
//! let corpus = [
//!     Sequence::new(["a", "c", "d"]).with_weight(50.0),
//!     Sequence::new(["b", "c", "e"]).with_weight(50.0),
//! ];
//! let stats = PathStatistics::from_sequences(&corpus, 2).unwrap();
//!
//! let config = SelectionConfig { max_order: 2, ..SelectionConfig::default() };
//! let result = ModelOrderSelector::new(&stats, config).unwrap().select().unwrap();
//!
//! assert_eq!(result.optimal_order, 2);
//! assert_eq!(result.status, SelectionStatus::MaxOrderReached);
//! ```

pub mod attributes;
pub mod cache;
pub mod cli;
pub mod error;
pub mod likelihood;
pub mod network;
pub mod paths;
pub mod selection;
pub mod transition;

pub use error::{PathOrderError, Result};
pub use network::{build_network, HigherOrderNetwork};
pub use paths::{PathStatistics, Sequence};
pub use selection::{ModelOrderSelector, ModelSelectionResult, SelectionConfig, SelectionStatus};
pub use transition::TransitionModel;
