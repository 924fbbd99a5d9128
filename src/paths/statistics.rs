use crate::error::{PathOrderError, Result};
use crate::paths::Sequence;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of statistics versions, shared by every instance in the process
static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

fn next_version() -> u64 {
    NEXT_VERSION.fetch_add(1, Ordering::Relaxed)
}

/// Entity identifier (a node of the underlying first-order network)
pub type Entity = String;

/// Ordered tuple of k+1 entities observed as a contiguous window
pub type SubpathKey = Vec<Entity>;

/// Subpath frequency map for a single order
///
/// Keys are kept sorted so that everything derived from the statistics
/// (networks, likelihood sums, reports) is reproducible.
pub type SubpathCounts = BTreeMap<SubpathKey, f64>;

/// Aggregated subpath statistics for orders `0..=max_order`
///
/// # Example
/// ```
/// use pathorder::paths::{PathStatistics, Sequence};
///
/// let mut stats = PathStatistics::new(2);
/// stats.ingest(&Sequence::new(["a", "b", "c"])).unwrap();
/// stats.ingest(&Sequence::new(["a", "b", "d"])).unwrap();
///
/// let pairs = stats.subpaths(1).unwrap();
/// assert_eq!(pairs.get(&vec!["a".to_string(), "b".to_string()]), Some(&2.0));
/// assert_eq!(stats.max_observed_order(), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PathStatistics {
    max_order: usize,
    /// Sliding-window counts, indexed by order
    subpaths: Vec<SubpathCounts>,
    /// Start-anchored counts, indexed by order (prefix length - 1)
    prefixes: Vec<SubpathCounts>,
    /// Unweighted number of windows per order
    windows: Vec<usize>,
    /// Path length -> accumulated weight
    path_lengths: BTreeMap<usize, f64>,
    sequence_count: usize,
    total_weight: f64,
    version: u64,
}

impl PathStatistics {
    /// Create empty statistics recording subpaths up to `max_order`
    pub fn new(max_order: usize) -> Self {
        Self {
            max_order,
            subpaths: vec![SubpathCounts::new(); max_order + 1],
            prefixes: vec![SubpathCounts::new(); max_order + 1],
            windows: vec![0; max_order + 1],
            path_lengths: BTreeMap::new(),
            sequence_count: 0,
            total_weight: 0.0,
            version: 0,
        }
    }

    /// Build statistics from a batch of sequences
    pub fn from_sequences<'a, I>(sequences: I, max_order: usize) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Sequence>,
    {
        let mut stats = Self::new(max_order);
        for sequence in sequences {
            stats.ingest(sequence)?;
        }
        Ok(stats)
    }

    /// Build statistics in parallel from partitioned accumulators
    ///
    /// Each rayon task ingests a slice of the input into its own accumulator;
    /// the partial statistics are merged at the end, so no count map is ever
    /// written by more than one thread.
    pub fn from_sequences_par(sequences: &[Sequence], max_order: usize) -> Result<Self> {
        sequences
            .par_iter()
            .try_fold(
                || Self::new(max_order),
                |mut acc, sequence| {
                    acc.ingest(sequence)?;
                    Ok(acc)
                },
            )
            .try_reduce(
                || Self::new(max_order),
                |mut left, right| {
                    left.merge(right)?;
                    Ok(left)
                },
            )
    }

    /// Add one sequence's contribution
    ///
    /// Empty sequences and zero weights are no-ops. Negative or non-finite
    /// weights fail with `InvalidWeight` and leave the statistics untouched.
    pub fn ingest(&mut self, sequence: &Sequence) -> Result<()> {
        let weight = sequence.weight();
        if !weight.is_finite() || weight < 0.0 {
            return Err(PathOrderError::InvalidWeight { weight });
        }

        if sequence.is_empty() || weight == 0.0 {
            return Ok(());
        }

        let entities = sequence.entities();
        let top = (entities.len() - 1).min(self.max_order);

        for order in 0..=top {
            let counts = &mut self.subpaths[order];
            for window in entities.windows(order + 1) {
                *counts.entry(window.to_vec()).or_insert(0.0) += weight;
            }
            self.windows[order] += entities.len() - order;

            *self.prefixes[order]
                .entry(entities[..=order].to_vec())
                .or_insert(0.0) += weight;
        }

        *self.path_lengths.entry(entities.len()).or_insert(0.0) += weight;
        self.sequence_count += 1;
        self.total_weight += weight;
        self.version = next_version();

        Ok(())
    }

    /// Merge another accumulator into this one
    ///
    /// Both sides must record the same maximum order.
    pub fn merge(&mut self, other: PathStatistics) -> Result<()> {
        if other.max_order != self.max_order {
            return Err(PathOrderError::InvalidConfig {
                reason: format!(
                    "cannot merge statistics with max_order {} into max_order {}",
                    other.max_order, self.max_order
                ),
            });
        }

        if other.sequence_count == 0 {
            return Ok(());
        }

        for (mine, theirs) in self.subpaths.iter_mut().zip(other.subpaths) {
            merge_counts(mine, theirs);
        }
        for (mine, theirs) in self.prefixes.iter_mut().zip(other.prefixes) {
            merge_counts(mine, theirs);
        }
        for (mine, theirs) in self.windows.iter_mut().zip(other.windows) {
            *mine += theirs;
        }
        for (length, weight) in other.path_lengths {
            *self.path_lengths.entry(length).or_insert(0.0) += weight;
        }

        self.sequence_count += other.sequence_count;
        self.total_weight += other.total_weight;
        self.version = next_version();

        Ok(())
    }

    /// Subpath counts of length `order + 1`
    ///
    /// Returns `None` for orders beyond the recorded maximum.
    pub fn subpaths(&self, order: usize) -> Option<&SubpathCounts> {
        self.subpaths.get(order)
    }

    /// Start-anchored subpath counts of length `order + 1`
    pub fn prefixes(&self, order: usize) -> Option<&SubpathCounts> {
        self.prefixes.get(order)
    }

    /// Highest order with at least one recorded window
    ///
    /// Bounded by the configured maximum order; `None` when nothing was ingested.
    pub fn max_observed_order(&self) -> Option<usize> {
        self.longest_path()
            .checked_sub(1)
            .map(|order| order.min(self.max_order))
    }

    /// Maximum order these statistics record
    pub fn max_order(&self) -> usize {
        self.max_order
    }

    /// Number of entities in the longest ingested sequence
    pub fn longest_path(&self) -> usize {
        self.path_lengths.keys().next_back().copied().unwrap_or(0)
    }

    /// Total weight accumulated over all windows of `order`
    pub fn total_weight_at(&self, order: usize) -> f64 {
        self.subpaths
            .get(order)
            .map(|counts| counts.values().sum())
            .unwrap_or(0.0)
    }

    /// Unweighted number of windows observed at `order`
    pub fn window_count(&self, order: usize) -> usize {
        self.windows.get(order).copied().unwrap_or(0)
    }

    /// Distinct entities observed in any sequence
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.subpaths[0].keys().filter_map(|key| key.first())
    }

    pub fn entity_count(&self) -> usize {
        self.subpaths[0].len()
    }

    pub fn sequence_count(&self) -> usize {
        self.sequence_count
    }

    /// Sum of sequence weights
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Version of the recorded counts, 0 while nothing was ingested
    ///
    /// Every ingestion or merge draws a fresh value from a process-wide
    /// counter, so two instances share a version only when one is an
    /// unmodified clone of the other. Used as the cache key for memoized
    /// networks.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.sequence_count == 0
    }

    /// Path length -> accumulated weight
    pub fn path_lengths(&self) -> &BTreeMap<usize, f64> {
        &self.path_lengths
    }

    /// Human-readable summary of the path and subpath statistics
    pub fn summary(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Subpath Statistics ===\n");
        report.push_str(&format!("Sequences:        {}\n", self.sequence_count));
        report.push_str(&format!("Total weight:     {:.1}\n", self.total_weight));
        report.push_str(&format!("Unique entities:  {}\n", self.entity_count()));

        if !self.path_lengths.is_empty() {
            let weighted_sum: f64 = self
                .path_lengths
                .iter()
                .map(|(length, weight)| *length as f64 * weight)
                .sum();
            let shortest = self.path_lengths.keys().next().copied().unwrap_or(0);
            report.push_str(&format!(
                "Path length:      mean={:.2} min={} max={}\n",
                weighted_sum / self.total_weight,
                shortest,
                self.longest_path()
            ));
        }

        report.push_str("\n order |   windows |  unique |       weight\n");
        report.push_str("-------+-----------+---------+-------------\n");
        for order in 0..=self.max_order {
            report.push_str(&format!(
                "{:>6} | {:>9} | {:>7} | {:>12.1}\n",
                order,
                self.windows[order],
                self.subpaths[order].len(),
                self.total_weight_at(order)
            ));
        }

        report
    }
}

fn merge_counts(into: &mut SubpathCounts, from: SubpathCounts) {
    for (key, count) in from {
        *into.entry(key).or_insert(0.0) += count;
    }
}
