//! Rule table evaluation: scalar metric values and their explanations.

use super::FeedbackInput;
use crate::analysis::geometry::tilt_from_horizontal;
use crate::analysis::signal::nan_mean;
use crate::config::{FeedbackMetric, RatingRule};
use crate::models::{ExplainedMetric, Metric, Rating};

/// Scalar value of a rated metric; `NaN` when it cannot be measured.
pub fn metric_value(metric: FeedbackMetric, input: &FeedbackInput<'_>) -> f64 {
    let mean_of = |m: Metric| input.aggregates.get(&m).map_or(f64::NAN, |s| s.mean);
    match metric {
        // Primary pair first; the summary carries the same value
        FeedbackMetric::SymmetryIndex => input
            .symmetry
            .first()
            .map_or(input.summary.symmetry_index, |s| s.index),
        FeedbackMetric::StrokeRate => {
            if input.cycles.is_empty() {
                f64::NAN
            } else {
                input.summary.stroke_rate
            }
        }
        FeedbackMetric::BodyRoll => input
            .series
            .get(Metric::BodyRoll)
            .map_or(f64::NAN, |roll| nan_mean(roll.iter().map(|&r| tilt_from_horizontal(r)))),
        FeedbackMetric::ElbowLeft => mean_of(Metric::ElbowLeft),
        FeedbackMetric::ElbowRight => mean_of(Metric::ElbowRight),
        FeedbackMetric::VelocityConsistency => {
            velocity_consistency(input.summary.max_velocity, input.summary.avg_velocity)
        }
    }
}

/// Peak over mean speed; `NaN` unless the mean is positive.
pub fn velocity_consistency(max: f64, avg: f64) -> f64 {
    if avg.is_finite() && max.is_finite() && avg > 0.0 {
        max / avg
    } else {
        f64::NAN
    }
}

pub fn format_value(value: f64, precision: usize) -> String {
    format!("{value:.precision$}")
}

/// Rate `value` against `rule`.
pub fn explain(rule: &RatingRule, value: f64) -> ExplainedMetric {
    match rule.band_for(value) {
        Some(band) => ExplainedMetric {
            name: rule.name.clone(),
            technical_name: rule.technical_name.clone(),
            value,
            rating: band.rating,
            explanation: band
                .explanation
                .replace("{value}", &format_value(value, rule.precision)),
            what_it_means: band.what_it_means.clone(),
            how_to_improve: band.how_to_improve.clone(),
        },
        None => ExplainedMetric {
            name: rule.name.clone(),
            technical_name: rule.technical_name.clone(),
            value,
            rating: Rating::InsufficientData,
            explanation: format!(
                "{} could not be measured from this footage.",
                rule.name
            ),
            what_it_means: "Too few frames showed the body points this metric needs.".to_string(),
            how_to_improve: Some(
                "Film side-on with the whole body in frame and good lighting.".to_string(),
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeedbackConfig;

    #[test]
    fn test_explain_fills_template() {
        let cfg = FeedbackConfig::default();
        let rule = cfg.rule(FeedbackMetric::SymmetryIndex).unwrap();
        let explained = explain(rule, 0.934);
        assert_eq!(explained.rating, Rating::Excellent);
        assert!(explained.explanation.contains("0.93/1.0"), "{}", explained.explanation);
        assert!(explained.how_to_improve.is_none());
    }

    #[test]
    fn test_nan_is_insufficient_data() {
        let cfg = FeedbackConfig::default();
        let rule = cfg.rule(FeedbackMetric::StrokeRate).unwrap();
        let explained = explain(rule, f64::NAN);
        assert_eq!(explained.rating, Rating::InsufficientData);
        assert!(explained.value.is_nan());
    }

    #[test]
    fn test_velocity_consistency() {
        assert_eq!(velocity_consistency(3.0, 1.5), 2.0);
        assert!(velocity_consistency(3.0, 0.0).is_nan());
        assert!(velocity_consistency(f64::NAN, 1.0).is_nan());
        assert_eq!(format_value(31.6, 0), "32");
    }
}
