//! Road Risk model library.
//!
//! A two-class (accident / safe) Naive Bayes model over four categorical
//! features, with fixed conditional-probability tables derived from the
//! 10-record training set. The scoring operation is pure and total: any
//! observation, including an empty one, produces a well-formed prediction.

pub mod classify;
pub mod priors;

pub use classify::{classify, ClassScores, FeatureTerm, Observation, Prediction};
pub use priors::{
    ClassPrior, Feature, FeatureTable, LikelihoodPair, RiskPriors, ACCIDENT_RECORDS,
    SAFE_RECORDS, SMOOTHING, TRAINING_RECORDS,
};
