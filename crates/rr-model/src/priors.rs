//! Fixed conditional-probability tables and class prior.
//!
//! All values are empirical fractions from the 10-record training set
//! (4 accident, 6 safe). Two zero-count cells (road `Average`, traffic
//! `Normal`) carry the smoothing constant on the accident branch only;
//! that asymmetry comes straight from the training-set counts and is
//! pinned by tests, so keep it when touching these numbers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fallback probability used for both branches when a category is missing
/// from its table (unknown label, empty string, or absent field).
pub const SMOOTHING: f64 = 0.01;

/// Training-set size behind the builtin tables.
pub const TRAINING_RECORDS: usize = 10;
/// Accident-class records in the training set.
pub const ACCIDENT_RECORDS: usize = 4;
/// Safe-class records in the training set.
pub const SAFE_RECORDS: usize = 6;

/// The four observed features, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Weather,
    Road,
    Traffic,
    Engine,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::Weather,
        Feature::Road,
        Feature::Traffic,
        Feature::Engine,
    ];

    /// Wire name used in request/response JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Weather => "weather",
            Feature::Road => "road",
            Feature::Traffic => "traffic",
            Feature::Engine => "engine",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conditional probabilities of one category under each class:
/// `P(value | accident)` and `P(value | safe)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LikelihoodPair {
    pub p_accident: f64,
    pub p_safe: f64,
}

impl LikelihoodPair {
    pub fn new(p_accident: f64, p_safe: f64) -> Self {
        Self { p_accident, p_safe }
    }

    /// The pair substituted for any category the table does not know.
    pub fn smoothed() -> Self {
        Self {
            p_accident: SMOOTHING,
            p_safe: SMOOTHING,
        }
    }
}

/// Category label -> likelihood pair for a single feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    entries: BTreeMap<String, LikelihoodPair>,
}

impl FeatureTable {
    pub fn new<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, LikelihoodPair)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, pair)| (label.to_string(), pair))
                .collect(),
        }
    }

    /// Look up a category, falling back to the smoothing pair on any miss.
    ///
    /// The miss branch is part of the model contract, not an incidental
    /// default: absent fields and unknown labels must behave identically
    /// across all four tables.
    pub fn lookup(&self, value: Option<&str>) -> LikelihoodPair {
        match value {
            Some(label) => self
                .entries
                .get(label)
                .copied()
                .unwrap_or_else(LikelihoodPair::smoothed),
            None => LikelihoodPair::smoothed(),
        }
    }

    /// Known category labels, in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Unconditional class probabilities. Fixed at 4/10 accident, 6/10 safe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassPrior {
    pub p_accident: f64,
    pub p_safe: f64,
}

/// The full model: one table per feature plus the class prior.
///
/// Constructed once at startup and shared by reference; nothing in here is
/// ever mutated, so concurrent scoring needs no synchronization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPriors {
    pub prior: ClassPrior,
    pub weather: FeatureTable,
    pub road: FeatureTable,
    pub traffic: FeatureTable,
    pub engine: FeatureTable,
}

impl RiskPriors {
    /// The builtin tables, as exact training-set fractions.
    pub fn builtin() -> Self {
        Self {
            prior: ClassPrior {
                p_accident: 4.0 / 10.0,
                p_safe: 6.0 / 10.0,
            },
            weather: FeatureTable::new([
                ("Rain", LikelihoodPair::new(1.0 / 4.0, 2.0 / 6.0)),
                ("Snow", LikelihoodPair::new(1.0 / 4.0, 2.0 / 6.0)),
                ("Clear", LikelihoodPair::new(2.0 / 4.0, 2.0 / 6.0)),
            ]),
            road: FeatureTable::new([
                ("Good", LikelihoodPair::new(1.0 / 4.0, 3.0 / 6.0)),
                ("Bad", LikelihoodPair::new(2.0 / 4.0, 1.0 / 6.0)),
                // zero accident count in the training set
                ("Average", LikelihoodPair::new(SMOOTHING, 2.0 / 6.0)),
            ]),
            traffic: FeatureTable::new([
                ("High", LikelihoodPair::new(3.0 / 4.0, 1.0 / 6.0)),
                // zero accident count in the training set
                ("Normal", LikelihoodPair::new(SMOOTHING, 3.0 / 6.0)),
                ("Light", LikelihoodPair::new(1.0 / 4.0, 2.0 / 6.0)),
            ]),
            engine: FeatureTable::new([
                ("No", LikelihoodPair::new(2.0 / 4.0, 4.0 / 6.0)),
                ("Yes", LikelihoodPair::new(2.0 / 4.0, 2.0 / 6.0)),
            ]),
        }
    }

    pub fn table(&self, feature: Feature) -> &FeatureTable {
        match feature {
            Feature::Weather => &self.weather,
            Feature::Road => &self.road,
            Feature::Traffic => &self.traffic,
            Feature::Engine => &self.engine,
        }
    }
}
