//! Naive Bayes scoring: P(class | observation).
//!
//! Multiplies the class prior by one conditional probability per feature,
//! then normalizes the two raw scores into percentages. Ties resolve to
//! safe, so `is_accident` holds only on a strict score majority.

use crate::priors::{Feature, LikelihoodPair, RiskPriors};
use serde::{Deserialize, Serialize};

/// One request's raw categorical inputs. Values outside the known
/// categories are allowed and handled via the smoothing fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub weather: Option<String>,
    pub road: Option<String>,
    pub traffic: Option<String>,
    pub engine: Option<String>,
}

impl Observation {
    pub fn value(&self, feature: Feature) -> Option<&str> {
        match feature {
            Feature::Weather => self.weather.as_deref(),
            Feature::Road => self.road.as_deref(),
            Feature::Traffic => self.traffic.as_deref(),
            Feature::Engine => self.engine.as_deref(),
        }
    }
}

/// Per-class values, used both for raw scores and normalized percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    pub accident: f64,
    pub safe: f64,
}

/// Breakdown entry: the raw observed value for one feature and the
/// likelihood pair the scorer used for it (unrounded).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTerm {
    pub feature: Feature,
    pub value: Option<String>,
    pub likelihood: LikelihoodPair,
}

/// Classifier output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Strict `scores.accident > scores.safe`; a tie is safe.
    pub is_accident: bool,
    /// Unnormalized products of prior and likelihoods.
    pub scores: ClassScores,
    /// Scores normalized to percentages; both zero if the total is zero.
    pub percent: ClassScores,
    /// The larger of the two percentages.
    pub confidence: f64,
    /// One term per feature, in wire order.
    pub terms: Vec<FeatureTerm>,
}

/// Score an observation against the given tables.
///
/// Total over its input domain: unknown and absent categories fall back to
/// the smoothing pair, so there is no error path. Pure given `priors`, so
/// repeated calls with the same observation return identical predictions.
pub fn classify(priors: &RiskPriors, obs: &Observation) -> Prediction {
    let mut scores = ClassScores {
        accident: priors.prior.p_accident,
        safe: priors.prior.p_safe,
    };
    let mut terms = Vec::with_capacity(Feature::ALL.len());

    for feature in Feature::ALL {
        let value = obs.value(feature);
        let likelihood = priors.table(feature).lookup(value);
        scores.accident *= likelihood.p_accident;
        scores.safe *= likelihood.p_safe;
        terms.push(FeatureTerm {
            feature,
            value: value.map(str::to_owned),
            likelihood,
        });
    }

    // Unreachable with the builtin tables (every factor is >= 0.01), but
    // the guard keeps the output well-formed for any custom tables.
    let total = scores.accident + scores.safe;
    let percent = if total > 0.0 {
        ClassScores {
            accident: 100.0 * scores.accident / total,
            safe: 100.0 * scores.safe / total,
        }
    } else {
        ClassScores::default()
    };

    Prediction {
        is_accident: scores.accident > scores.safe,
        scores,
        percent,
        confidence: percent.accident.max(percent.safe),
        terms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priors::{ClassPrior, FeatureTable, SMOOTHING};
    use proptest::prelude::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn obs(
        weather: Option<&str>,
        road: Option<&str>,
        traffic: Option<&str>,
        engine: Option<&str>,
    ) -> Observation {
        Observation {
            weather: weather.map(str::to_owned),
            road: road.map(str::to_owned),
            traffic: traffic.map(str::to_owned),
            engine: engine.map(str::to_owned),
        }
    }

    #[test]
    fn high_risk_observation_predicts_accident() {
        let priors = RiskPriors::builtin();
        let result = classify(
            &priors,
            &obs(Some("Rain"), Some("Bad"), Some("High"), Some("Yes")),
        );

        // 0.25 * 0.5 * 0.75 * 0.5 * 0.4
        assert!(approx_eq(result.scores.accident, 0.01875, 1e-15));
        // (2/6) * (1/6) * (1/6) * (2/6) * 0.6 = 1/540
        assert!(approx_eq(result.scores.safe, 1.0 / 540.0, 1e-15));

        assert!(result.is_accident);
        assert!(approx_eq(result.percent.accident, 91.011_235_955_056_18, 1e-9));
        assert!(approx_eq(
            result.percent.safe,
            100.0 - result.percent.accident,
            1e-9
        ));
        assert_eq!(result.confidence, result.percent.accident);
    }

    #[test]
    fn empty_observation_falls_back_to_prior_ratio() {
        let priors = RiskPriors::builtin();
        let result = classify(&priors, &Observation::default());

        // All four features smoothed: 0.01^4 * prior.
        assert!(approx_eq(result.scores.accident, 4e-10, 1e-22));
        assert!(approx_eq(result.scores.safe, 6e-10, 1e-22));
        assert!(!result.is_accident);
        assert!(approx_eq(result.percent.accident, 40.0, 1e-9));
        assert!(approx_eq(result.percent.safe, 60.0, 1e-9));
        assert!(approx_eq(result.confidence, 60.0, 1e-9));

        for term in &result.terms {
            assert_eq!(term.value, None);
            assert_eq!(term.likelihood, LikelihoodPair::smoothed());
        }
    }

    #[test]
    fn low_risk_observation_predicts_safe() {
        let priors = RiskPriors::builtin();
        let result = classify(
            &priors,
            &obs(Some("Clear"), Some("Good"), Some("Light"), Some("No")),
        );

        assert!(!result.is_accident);
        assert!(result.percent.safe > 60.0);
        assert_eq!(result.confidence, result.percent.safe);
    }

    #[test]
    fn asymmetric_smoothing_flows_into_terms() {
        let priors = RiskPriors::builtin();
        let result = classify(
            &priors,
            &obs(Some("Clear"), Some("Average"), Some("Normal"), Some("No")),
        );

        let road = &result.terms[1];
        assert_eq!(road.likelihood.p_accident, SMOOTHING);
        assert!(approx_eq(road.likelihood.p_safe, 2.0 / 6.0, 1e-12));

        let traffic = &result.terms[2];
        assert_eq!(traffic.likelihood.p_accident, SMOOTHING);
        assert!(approx_eq(traffic.likelihood.p_safe, 3.0 / 6.0, 1e-12));

        // Both zero-count cells push hard toward safe.
        assert!(!result.is_accident);
        assert!(result.percent.safe > 99.0);
    }

    #[test]
    fn terms_follow_wire_order_and_echo_raw_values() {
        let priors = RiskPriors::builtin();
        let result = classify(
            &priors,
            &obs(Some("Snow"), None, Some("nonsense"), Some("Yes")),
        );

        let order: Vec<Feature> = result.terms.iter().map(|t| t.feature).collect();
        assert_eq!(order, Feature::ALL.to_vec());
        assert_eq!(result.terms[0].value.as_deref(), Some("Snow"));
        assert_eq!(result.terms[1].value, None);
        assert_eq!(result.terms[2].value.as_deref(), Some("nonsense"));
        assert_eq!(result.terms[2].likelihood, LikelihoodPair::smoothed());
    }

    #[test]
    fn tied_scores_resolve_to_safe() {
        // Symmetric tables force scores.accident == scores.safe exactly.
        let pair = LikelihoodPair::new(0.5, 0.5);
        let table = || FeatureTable::new([("X", pair)]);
        let priors = RiskPriors {
            prior: ClassPrior {
                p_accident: 0.5,
                p_safe: 0.5,
            },
            weather: table(),
            road: table(),
            traffic: table(),
            engine: table(),
        };

        let result = classify(&priors, &obs(Some("X"), Some("X"), Some("X"), Some("X")));
        assert_eq!(result.scores.accident, result.scores.safe);
        assert!(!result.is_accident);
        assert!(approx_eq(result.percent.accident, 50.0, 1e-12));
        assert!(approx_eq(result.confidence, 50.0, 1e-12));
    }

    #[test]
    fn zero_total_yields_zero_percentages() {
        let pair = LikelihoodPair::new(0.0, 0.0);
        let table = || FeatureTable::new([("X", pair)]);
        let priors = RiskPriors {
            prior: ClassPrior {
                p_accident: 0.4,
                p_safe: 0.6,
            },
            weather: table(),
            road: table(),
            traffic: table(),
            engine: table(),
        };

        let result = classify(&priors, &obs(Some("X"), Some("X"), Some("X"), Some("X")));
        assert_eq!(result.scores.accident, 0.0);
        assert_eq!(result.scores.safe, 0.0);
        assert_eq!(result.percent.accident, 0.0);
        assert_eq!(result.percent.safe, 0.0);
        assert_eq!(result.confidence, 0.0);
        assert!(!result.is_accident);
    }

    #[test]
    fn classification_is_deterministic() {
        let priors = RiskPriors::builtin();
        let observation = obs(Some("Rain"), Some("Average"), None, Some("No"));
        let first = classify(&priors, &observation);
        let second = classify(&priors, &observation);
        assert_eq!(first, second);
    }

    fn known_or_unknown_label() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None::<String>),
            Just(Some(String::new())),
            "[A-Za-z]{0,12}".prop_map(Some),
            proptest::sample::select(vec![
                "Rain", "Snow", "Clear", "Good", "Bad", "Average", "High", "Normal",
                "Light", "No", "Yes",
            ])
            .prop_map(|s| Some(s.to_string())),
        ]
    }

    proptest! {
        #[test]
        fn percentages_always_sum_to_one_hundred(
            weather in known_or_unknown_label(),
            road in known_or_unknown_label(),
            traffic in known_or_unknown_label(),
            engine in known_or_unknown_label(),
        ) {
            let priors = RiskPriors::builtin();
            let result = classify(&priors, &Observation { weather, road, traffic, engine });

            // Builtin tables keep every factor >= 0.01, so the total is
            // always positive and normalization applies.
            prop_assert!((result.percent.accident + result.percent.safe - 100.0).abs() < 1e-9);
            prop_assert!((result.confidence - result.percent.accident.max(result.percent.safe)).abs() < 1e-12);
            prop_assert_eq!(result.is_accident, result.scores.accident > result.scores.safe);
        }

        #[test]
        fn unknown_labels_always_use_the_smoothing_pair(
            label in "[a-z0-9 ]{1,16}",
        ) {
            let priors = RiskPriors::builtin();
            // Lowercase labels never collide with the Capitalized categories.
            for feature in Feature::ALL {
                let pair = priors.table(feature).lookup(Some(&label));
                prop_assert_eq!(pair, LikelihoodPair::smoothed());
            }
        }
    }
}
