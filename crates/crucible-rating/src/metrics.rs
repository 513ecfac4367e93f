//! Boundary adapter for the trainer's flat custom-metrics channel.
//!
//! The external trainer reports evaluation results as a flat string-keyed
//! mapping in which each roster competitor owns one `Rank_<name>` key
//! holding a per-instance series of ordinal ranks (0 = best). That
//! flattening is an artifact of the metrics collaborator's interface; this
//! module is the only place that knows about it. Everything downstream
//! works with typed [`RankObservation`] values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crucible_types::{CompetitorId, Placing, RankObservation};

use crate::error::RatingError;

/// Metric key prefix under which per-competitor rank series arrive.
pub const RANK_METRIC_PREFIX: &str = "Rank_";

/// Metric key prefix under which mean skills are reported back.
pub const SKILL_METRIC_PREFIX: &str = "SR_";

/// Tolerance when checking that a rank value is integral.
const RANK_INTEGRALITY_EPSILON: f64 = 1e-6;

/// One value in the flat metrics mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetricValue {
    /// A single aggregated number.
    Scalar(f64),
    /// One number per parallel episode instance.
    Series(Vec<f64>),
}

/// Un-flatten `Rank_<name>` series back into one [`RankObservation`] per
/// episode instance, in index order.
///
/// # Errors
///
/// Returns [`RatingError::MissingRankMetric`] when a roster competitor has
/// no rank key, [`RatingError::ScalarRankMetric`] when a rank key holds a
/// scalar (the metrics source is incompatible with batched evaluation),
/// [`RatingError::MismatchedInstanceCount`] when series lengths disagree,
/// and [`RatingError::MalformedRank`] for values that are not non-negative
/// integers.
pub fn extract_ranks_from_metrics(
    metrics: &BTreeMap<String, MetricValue>,
    roster: &[CompetitorId],
) -> Result<Vec<RankObservation>, RatingError> {
    let mut series_per_competitor: Vec<(&CompetitorId, &[f64])> =
        Vec::with_capacity(roster.len());
    let mut instances: Option<usize> = None;

    for competitor in roster {
        let key = format!("{RANK_METRIC_PREFIX}{competitor}");
        let Some(value) = metrics.get(&key) else {
            return Err(RatingError::MissingRankMetric(competitor.clone()));
        };
        let series = match value {
            MetricValue::Scalar(_) => {
                return Err(RatingError::ScalarRankMetric { key });
            }
            MetricValue::Series(series) => series.as_slice(),
        };

        match instances {
            None => instances = Some(series.len()),
            Some(expected) if expected != series.len() => {
                return Err(RatingError::MismatchedInstanceCount {
                    key,
                    expected,
                    found: series.len(),
                });
            }
            Some(_) => {}
        }

        series_per_competitor.push((competitor, series));
    }

    let instance_count = instances.unwrap_or(0);
    let mut observations = Vec::with_capacity(instance_count);
    for instance in 0..instance_count {
        let mut placings = Vec::with_capacity(series_per_competitor.len());
        for &(competitor, series) in &series_per_competitor {
            let value = series.get(instance).copied().unwrap_or(f64::NAN);
            let rank = rank_from_metric(competitor, value)?;
            placings.push(Placing {
                competitor: competitor.clone(),
                rank,
            });
        }
        observations.push(RankObservation::new(placings));
    }

    Ok(observations)
}

/// Convert a rank reported as a float back into its ordinal form.
fn rank_from_metric(competitor: &CompetitorId, value: f64) -> Result<u32, RatingError> {
    let malformed = || RatingError::MalformedRank {
        key: format!("{RANK_METRIC_PREFIX}{competitor}"),
        value,
    };

    if !value.is_finite() || value < 0.0 {
        return Err(malformed());
    }
    let rounded = value.round();
    if (value - rounded).abs() > RANK_INTEGRALITY_EPSILON {
        return Err(malformed());
    }
    if rounded > f64::from(u32::MAX) {
        return Err(malformed());
    }
    // Range and integrality checked above; truncation cannot occur.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rank = rounded as u32;
    Ok(rank)
}

/// Collapse every series metric to its arithmetic mean, in place.
///
/// The trainer applies this to custom metrics after each training cycle
/// so downstream logging sees scalars. Scalar entries and empty series are
/// left untouched.
pub fn collapse_series_means(metrics: &mut BTreeMap<String, MetricValue>) {
    for value in metrics.values_mut() {
        if let MetricValue::Series(series) = value {
            if series.is_empty() {
                continue;
            }
            let count = f64::from(u32::try_from(series.len()).unwrap_or(u32::MAX));
            let mean = series.iter().sum::<f64>() / count;
            *value = MetricValue::Scalar(mean);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn roster() -> Vec<CompetitorId> {
        vec![CompetitorId::from("alpha"), CompetitorId::from("beta")]
    }

    fn series(values: &[f64]) -> MetricValue {
        MetricValue::Series(values.to_vec())
    }

    #[test]
    fn extracts_one_observation_per_instance() {
        let metrics = BTreeMap::from([
            ("Rank_alpha".to_owned(), series(&[0.0, 1.0])),
            ("Rank_beta".to_owned(), series(&[1.0, 0.0])),
            ("Task_Reward".to_owned(), MetricValue::Scalar(3.5)),
        ]);

        let observations = extract_ranks_from_metrics(&metrics, &roster()).unwrap();
        assert_eq!(observations.len(), 2);

        let first = observations.first().unwrap();
        let ranks: Vec<(String, u32)> = first
            .placings()
            .iter()
            .map(|p| (p.competitor.to_string(), p.rank))
            .collect();
        assert_eq!(
            ranks,
            vec![("alpha".to_owned(), 0), ("beta".to_owned(), 1)]
        );

        let second = observations.get(1).unwrap();
        let ranks: Vec<u32> = second.placings().iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![1, 0]);
    }

    #[test]
    fn missing_competitor_key_is_fatal() {
        let metrics = BTreeMap::from([("Rank_alpha".to_owned(), series(&[0.0]))]);
        let result = extract_ranks_from_metrics(&metrics, &roster());
        assert!(matches!(result, Err(RatingError::MissingRankMetric(id)) if id.as_str() == "beta"));
    }

    #[test]
    fn scalar_rank_value_is_fatal() {
        let metrics = BTreeMap::from([
            ("Rank_alpha".to_owned(), MetricValue::Scalar(0.0)),
            ("Rank_beta".to_owned(), series(&[1.0])),
        ]);
        let result = extract_ranks_from_metrics(&metrics, &roster());
        assert!(matches!(result, Err(RatingError::ScalarRankMetric { .. })));
    }

    #[test]
    fn mismatched_series_lengths_are_fatal() {
        let metrics = BTreeMap::from([
            ("Rank_alpha".to_owned(), series(&[0.0, 1.0])),
            ("Rank_beta".to_owned(), series(&[1.0])),
        ]);
        let result = extract_ranks_from_metrics(&metrics, &roster());
        assert!(matches!(
            result,
            Err(RatingError::MismatchedInstanceCount {
                expected: 2,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn fractional_or_negative_ranks_are_fatal() {
        let metrics = BTreeMap::from([
            ("Rank_alpha".to_owned(), series(&[0.5])),
            ("Rank_beta".to_owned(), series(&[1.0])),
        ]);
        assert!(matches!(
            extract_ranks_from_metrics(&metrics, &roster()),
            Err(RatingError::MalformedRank { .. })
        ));

        let metrics = BTreeMap::from([
            ("Rank_alpha".to_owned(), series(&[-1.0])),
            ("Rank_beta".to_owned(), series(&[0.0])),
        ]);
        assert!(matches!(
            extract_ranks_from_metrics(&metrics, &roster()),
            Err(RatingError::MalformedRank { .. })
        ));
    }

    #[test]
    fn empty_series_yield_no_observations() {
        let metrics = BTreeMap::from([
            ("Rank_alpha".to_owned(), series(&[])),
            ("Rank_beta".to_owned(), series(&[])),
        ]);
        let observations = extract_ranks_from_metrics(&metrics, &roster()).unwrap();
        assert!(observations.is_empty());
    }

    #[test]
    fn metric_value_serde_roundtrip() {
        let metrics = BTreeMap::from([
            ("Rank_alpha".to_owned(), series(&[0.0, 1.0])),
            ("Task_Reward".to_owned(), MetricValue::Scalar(3.5)),
        ]);
        let json = serde_json::to_string(&metrics).unwrap();
        let restored: BTreeMap<String, MetricValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, metrics);
    }

    #[test]
    fn collapse_replaces_series_with_means() {
        let mut metrics = BTreeMap::from([
            ("survival".to_owned(), series(&[1.0, 2.0, 3.0])),
            ("already_scalar".to_owned(), MetricValue::Scalar(9.0)),
            ("empty".to_owned(), series(&[])),
        ]);
        collapse_series_means(&mut metrics);

        assert_eq!(
            metrics.get("survival"),
            Some(&MetricValue::Scalar(2.0))
        );
        assert_eq!(
            metrics.get("already_scalar"),
            Some(&MetricValue::Scalar(9.0))
        );
        assert_eq!(metrics.get("empty"), Some(&series(&[])));
    }
}
