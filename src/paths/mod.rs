// Path Statistics: Subpath Frequency Mining over Observed Sequences
//
// This module turns raw sequences of visited entities (click-streams,
// itineraries, citation chains) into subpath frequency statistics for every
// order up to a configured maximum.
//
// For a sequence of length L and order k (0 <= k < L) a window of k+1
// entities slides across the sequence, producing L-k overlapping subpaths.
// Each subpath count accumulates the sequence weight (multiplicity).
//
// Prefix statistics (start-anchored subpaths) are kept alongside the sliding
// windows so that the first positions of every path can be explained by lower
// order models during multi-order likelihood evaluation.

mod reader;
mod sequence;
mod statistics;

pub use reader::{parse_paths, read_paths};
pub use sequence::Sequence;
pub use statistics::{Entity, PathStatistics, SubpathCounts, SubpathKey};
