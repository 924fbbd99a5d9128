use serde::{Deserialize, Serialize};

/// One observed path: an ordered list of entity identifiers with a multiplicity
///
/// A sequence is immutable once built. The weight counts how many times the
/// path was observed and defaults to 1.
///
/// # Example
/// ```
/// use pathorder::paths::Sequence;
///
/// let seq = Sequence::new(["home", "search", "product"]).with_weight(3.0);
/// assert_eq!(seq.len(), 3);
/// assert_eq!(seq.weight(), 3.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    entities: Vec<String>,
    weight: f64,
}

impl Sequence {
    /// Create a sequence with weight 1
    pub fn new<I, S>(entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entities: entities.into_iter().map(Into::into).collect(),
            weight: 1.0,
        }
    }

    /// Set the observation multiplicity
    ///
    /// The weight is validated on ingestion, not here.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
