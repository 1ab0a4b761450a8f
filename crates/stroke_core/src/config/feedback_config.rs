//! Feedback Configuration
//!
//! The coaching rule table and scoring knobs. Ratings come from an ordered
//! band list per metric instead of nested conditionals, so the mapping can be
//! inspected, tested and swapped without touching control flow.
//!
//! ## Score
//!
//! `score = metrics_weight * metric_score + timeline_weight * timeline_score`
//! (normalized by the weights actually available), where each part is a
//! weighted mean of [`RatingPoints`].

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::Rating;

/// Scalar metrics the feedback synthesizer rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackMetric {
    /// Elbow pair symmetry index
    SymmetryIndex,
    /// Strokes per minute
    StrokeRate,
    /// Mean shoulder-line tilt from horizontal (degrees)
    BodyRoll,
    /// Mean left elbow angle (degrees)
    ElbowLeft,
    /// Mean right elbow angle (degrees)
    ElbowRight,
    /// Max / mean hand speed
    VelocityConsistency,
}

/// One value range of a rating rule: `min <= value < max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingBand {
    /// Inclusive lower bound, open when `None`
    #[serde(default)]
    pub min: Option<f64>,
    /// Exclusive upper bound, open when `None`
    #[serde(default)]
    pub max: Option<f64>,
    pub rating: Rating,
    /// `{value}` is replaced by the formatted metric value
    pub explanation: String,
    pub what_it_means: String,
    #[serde(default)]
    pub how_to_improve: Option<String>,
}

impl RatingBand {
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value < max)
    }
}

/// Ordered bands for one metric. The first matching band wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRule {
    pub metric: FeedbackMetric,
    /// Swimmer-facing name
    pub name: String,
    pub technical_name: String,
    /// Decimals used when rendering `{value}`
    #[serde(default)]
    pub precision: usize,
    /// Contribution to the metric score
    #[serde(default = "default_rule_weight")]
    pub weight: f64,
    pub bands: Vec<RatingBand>,
}

fn default_rule_weight() -> f64 {
    1.0
}

impl RatingRule {
    /// Band containing `value`, if any.
    pub fn band_for(&self, value: f64) -> Option<&RatingBand> {
        if !value.is_finite() {
            return None;
        }
        self.bands.iter().find(|band| band.contains(value))
    }
}

/// Points awarded per rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RatingPoints {
    #[validate(range(min = 0.0, max = 10.0))]
    pub excellent: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub good: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub needs_work: f64,
    #[validate(range(min = 0.0, max = 10.0))]
    pub poor: f64,
}

impl Default for RatingPoints {
    fn default() -> Self {
        Self {
            excellent: 10.0,
            good: 7.0,
            needs_work: 4.0,
            poor: 0.0,
        }
    }
}

impl RatingPoints {
    /// Points for a rating; `None` when the metric was not rated.
    pub fn points(&self, rating: Rating) -> Option<f64> {
        match rating {
            Rating::Excellent => Some(self.excellent),
            Rating::Good => Some(self.good),
            Rating::NeedsWork => Some(self.needs_work),
            Rating::Poor => Some(self.poor),
            Rating::InsufficientData => None,
        }
    }
}

/// Blend between rated metrics and timeline windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ScoreWeights {
    #[validate(range(min = 0.0))]
    pub metrics: f64,
    #[validate(range(min = 0.0))]
    pub timeline: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            metrics: 0.5,
            timeline: 0.5,
        }
    }
}

/// Minimum score for each grade; below `d` is F.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_grade_bands"))]
pub struct GradeBands {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Default for GradeBands {
    fn default() -> Self {
        Self {
            a: 8.5,
            b: 7.0,
            c: 5.5,
            d: 4.0,
        }
    }
}

fn validate_grade_bands(bands: &GradeBands) -> Result<(), ValidationError> {
    if !(bands.a > bands.b && bands.b > bands.c && bands.c > bands.d) {
        return Err(ValidationError::new("grade_bands_not_descending"));
    }
    Ok(())
}

/// Per-window quantities checked on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMetric {
    /// Mean shoulder-line tilt from horizontal
    BodyTilt,
    ElbowLeft,
    ElbowRight,
    /// Max / mean hand speed within the window
    VelocityConsistency,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowCondition {
    Below(f64),
    Above(f64),
    /// Inclusive on both ends
    Between(f64, f64),
}

impl WindowCondition {
    pub fn is_finite(&self) -> bool {
        match *self {
            WindowCondition::Below(limit) | WindowCondition::Above(limit) => limit.is_finite(),
            WindowCondition::Between(low, high) => low.is_finite() && high.is_finite(),
        }
    }

    pub fn holds(&self, value: f64) -> bool {
        match *self {
            WindowCondition::Below(limit) => value < limit,
            WindowCondition::Above(limit) => value > limit,
            WindowCondition::Between(low, high) => value >= low && value <= high,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteKind {
    Issue,
    Positive,
}

/// One timeline check: when `condition` holds for `metric`, note `note`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRule {
    pub metric: WindowMetric,
    pub condition: WindowCondition,
    pub kind: NoteKind,
    pub note: String,
}

impl WindowRule {
    fn new(metric: WindowMetric, condition: WindowCondition, kind: NoteKind, note: &str) -> Self {
        Self {
            metric,
            condition,
            kind,
            note: note.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TimelineConfig {
    /// Window length used when no cycles were detected
    #[validate(range(min = 0.1))]
    pub window_seconds: f64,
    pub rules: Vec<WindowRule>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        use NoteKind::{Issue, Positive};
        use WindowCondition::{Above, Below, Between};
        use WindowMetric::*;
        Self {
            window_seconds: 10.0,
            rules: vec![
                WindowRule::new(BodyTilt, Below(15.0), Issue, "body swimming flat"),
                WindowRule::new(BodyTilt, Above(50.0), Issue, "over-rotating"),
                WindowRule::new(BodyTilt, Between(15.0, 50.0), Positive, "good rotation"),
                WindowRule::new(ElbowLeft, Above(150.0), Issue, "left elbow dropping"),
                WindowRule::new(ElbowLeft, Below(60.0), Issue, "left arm too bent"),
                WindowRule::new(ElbowRight, Above(150.0), Issue, "right elbow dropping"),
                WindowRule::new(ElbowRight, Below(60.0), Issue, "right arm too bent"),
                WindowRule::new(VelocityConsistency, Above(3.0), Issue, "inconsistent stroke power"),
                WindowRule::new(VelocityConsistency, Below(1.5), Positive, "consistent power"),
            ],
        }
    }
}

/// Everything the feedback synthesizer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FeedbackConfig {
    pub rules: Vec<RatingRule>,
    #[validate]
    pub points: RatingPoints,
    #[validate]
    pub weights: ScoreWeights,
    #[validate]
    pub grades: GradeBands,
    /// Ratings worth at least this many points are strengths
    #[validate(range(min = 0.0, max = 10.0))]
    pub strength_min_points: f64,
    /// Ratings worth at most this many points are improvements
    #[validate(range(min = 0.0, max = 10.0))]
    pub improvement_max_points: f64,
    /// Cap on listed strengths and on listed improvements
    #[validate(range(min = 1))]
    pub max_listed: usize,
    /// Score when nothing could be rated
    #[validate(range(min = 0.0, max = 10.0))]
    pub neutral_score: f64,
    #[validate]
    pub timeline: TimelineConfig,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            points: RatingPoints::default(),
            weights: ScoreWeights::default(),
            grades: GradeBands::default(),
            strength_min_points: 7.0,
            improvement_max_points: 4.0,
            max_listed: 3,
            neutral_score: 5.0,
            timeline: TimelineConfig::default(),
        }
    }
}

impl FeedbackConfig {
    pub fn rule(&self, metric: FeedbackMetric) -> Option<&RatingRule> {
        self.rules.iter().find(|rule| rule.metric == metric)
    }

    /// Cross-field checks the derive cannot express.
    pub fn check_rules(&self) -> Result<(), String> {
        if self.strength_min_points <= self.improvement_max_points {
            return Err(format!(
                "strength_min_points ({}) must exceed improvement_max_points ({})",
                self.strength_min_points, self.improvement_max_points
            ));
        }
        for rule in &self.rules {
            if rule.bands.is_empty() {
                return Err(format!("rule '{}' has no bands", rule.name));
            }
            if !(rule.weight.is_finite() && rule.weight >= 0.0) {
                return Err(format!("rule '{}' has invalid weight {}", rule.name, rule.weight));
            }
            for band in &rule.bands {
                if band.min.into_iter().chain(band.max).any(|v| !v.is_finite()) {
                    return Err(format!("rule '{}' has a non-finite band bound", rule.name));
                }
                if band.rating == Rating::InsufficientData {
                    return Err(format!("rule '{}' assigns insufficient_data", rule.name));
                }
                if let (Some(min), Some(max)) = (band.min, band.max) {
                    if min >= max {
                        return Err(format!("rule '{}' has empty band [{min}, {max})", rule.name));
                    }
                }
            }
        }
        for check in &self.timeline.rules {
            if !check.condition.is_finite() {
                return Err(format!("timeline check '{}' has a non-finite limit", check.note));
            }
        }
        Ok(())
    }
}

fn band(
    min: Option<f64>,
    max: Option<f64>,
    rating: Rating,
    explanation: &str,
    what_it_means: &str,
    how_to_improve: Option<&str>,
) -> RatingBand {
    RatingBand {
        min,
        max,
        rating,
        explanation: explanation.to_string(),
        what_it_means: what_it_means.to_string(),
        how_to_improve: how_to_improve.map(str::to_string),
    }
}

fn elbow_rule(metric: FeedbackMetric, side: &str, title: &str) -> RatingRule {
    RatingRule {
        metric,
        name: format!("{title} Elbow Position"),
        technical_name: format!("Elbow Angle ({side})"),
        precision: 0,
        weight: 1.0,
        bands: vec![
            band(
                None,
                Some(70.0),
                Rating::NeedsWork,
                &format!("Your {side} elbow averages {{value}}° - bent further than it needs to be."),
                "An over-bent arm tends to slip through the water instead of pressing it back.",
                Some("Think about pressing back rather than down, as if pulling over a barrel."),
            ),
            band(
                Some(70.0),
                Some(90.0),
                Rating::Good,
                &format!("Your {side} elbow averages {{value}}° - a solid bend with room to open slightly."),
                "You are holding water well; a touch more angle enlarges the paddle.",
                Some("Fingertip-drag drill, keeping the elbow high through recovery and entry."),
            ),
            band(
                Some(90.0),
                Some(120.0),
                Rating::Excellent,
                &format!("Your {side} elbow averages {{value}}° through the pull - a strong high-elbow catch."),
                "A bent elbow lets the forearm grip more water and drive you forward.",
                None,
            ),
            band(
                Some(120.0),
                None,
                Rating::NeedsWork,
                &format!("Your {side} elbow averages {{value}}° - a straight, dropped-elbow pull."),
                "A straight arm pushes water down instead of back, costing effort without speed.",
                Some("Sculling and catch-up with a pause build the high-elbow feel."),
            ),
        ],
    }
}

/// Built-in rule table.
pub fn default_rules() -> Vec<RatingRule> {
    vec![
        RatingRule {
            metric: FeedbackMetric::SymmetryIndex,
            name: "Stroke Balance".to_string(),
            technical_name: "Symmetry Index".to_string(),
            precision: 2,
            weight: 1.0,
            bands: vec![
                band(
                    None,
                    Some(0.7),
                    Rating::Poor,
                    "Left and right strokes differ markedly. Score: {value}/1.0",
                    "The imbalance is likely slowing you down and loads one shoulder more than the other.",
                    Some("Work on bilateral breathing and symmetry drills, ideally with filming from both sides."),
                ),
                band(
                    Some(0.7),
                    Some(0.8),
                    Rating::NeedsWork,
                    "There is a visible difference between your left and right strokes. Score: {value}/1.0",
                    "One arm carries more of the work, which wastes energy and brings on fatigue.",
                    Some("Catch-up drill and single-arm freestyle to even out the two sides."),
                ),
                band(
                    Some(0.8),
                    Some(0.9),
                    Rating::Good,
                    "Your arms move fairly evenly. Score: {value}/1.0",
                    "Sides are well balanced; small differences are normal.",
                    Some("Single-arm drills help find which side needs attention."),
                ),
                band(
                    Some(0.9),
                    None,
                    Rating::Excellent,
                    "Your left and right arms move almost identically. Score: {value}/1.0",
                    "A balanced stroke is efficient and spreads the load evenly.",
                    None,
                ),
            ],
        },
        RatingRule {
            metric: FeedbackMetric::StrokeRate,
            name: "Stroke Tempo".to_string(),
            technical_name: "Stroke Rate (SPM)".to_string(),
            precision: 0,
            weight: 1.0,
            bands: vec![
                band(
                    None,
                    Some(18.0),
                    Rating::Poor,
                    "Your stroke rate is {value} strokes per minute - very slow.",
                    "Long glides without propulsion are likely hiding in your stroke.",
                    Some("Remove dead spots: start with catch-up drill and blend into full freestyle."),
                ),
                band(
                    Some(18.0),
                    Some(24.0),
                    Rating::NeedsWork,
                    "Your stroke rate is {value} strokes per minute - on the slow side.",
                    "Long strokes are good, but too slow a tempo leaves gaps in propulsion.",
                    Some("Keep propulsion continuous: one arm catches as the other finishes."),
                ),
                band(
                    Some(24.0),
                    Some(28.0),
                    Rating::Good,
                    "Your stroke rate is {value} strokes per minute - a comfortable pace.",
                    "Good for training and distance; racing usually asks for a little more.",
                    Some("For race pace, use a tempo trainer at 1.8-2.0 seconds per stroke."),
                ),
                band(
                    Some(28.0),
                    Some(35.0),
                    Rating::Excellent,
                    "Your stroke rate is {value} strokes per minute - in the competitive range.",
                    "Typical of efficient distance freestyle: neither rushed nor dragging.",
                    None,
                ),
                band(
                    Some(35.0),
                    None,
                    Rating::NeedsWork,
                    "Your stroke rate is {value} strokes per minute - very quick.",
                    "High turnover often means short strokes; check you keep distance per stroke.",
                    Some("Front-quadrant swimming: keep one hand extended while the other catches."),
                ),
            ],
        },
        RatingRule {
            metric: FeedbackMetric::BodyRoll,
            name: "Body Rotation".to_string(),
            technical_name: "Body Roll (degrees)".to_string(),
            precision: 0,
            weight: 1.0,
            bands: vec![
                band(
                    None,
                    Some(20.0),
                    Rating::NeedsWork,
                    "Your body rotation averages only {value}° - you are swimming flat.",
                    "Flat swimming puts the work on the shoulders and shortens your reach.",
                    Some("Side-kick drills; show your belly button to the side walls as you rotate."),
                ),
                band(
                    Some(20.0),
                    Some(30.0),
                    Rating::Good,
                    "Your body rotation averages {value}° - decent, with room for more.",
                    "More roll would lengthen your reach and add power from the trunk.",
                    Some("6-kick switch drill: six kicks on one side, then rotate to the other."),
                ),
                band(
                    Some(30.0),
                    Some(45.0),
                    Rating::Excellent,
                    "Your body rotation averages {value}° - textbook.",
                    "Good rotation brings the core and back muscles into the stroke.",
                    None,
                ),
                band(
                    Some(45.0),
                    None,
                    Rating::NeedsWork,
                    "Your body rotation averages {value}° - more than you need.",
                    "Over-rotation wastes energy and disturbs timing.",
                    Some("Rotate from the hips rather than the shoulders and keep the head still."),
                ),
            ],
        },
        elbow_rule(FeedbackMetric::ElbowLeft, "left", "Left"),
        elbow_rule(FeedbackMetric::ElbowRight, "right", "Right"),
        RatingRule {
            metric: FeedbackMetric::VelocityConsistency,
            name: "Power Consistency".to_string(),
            technical_name: "Peak / Mean Hand Speed".to_string(),
            precision: 1,
            weight: 1.0,
            bands: vec![
                band(
                    None,
                    Some(1.8),
                    Rating::Excellent,
                    "Your hand speed peaks at {value}x its average - very even power.",
                    "Power is applied smoothly through the whole stroke.",
                    None,
                ),
                band(
                    Some(1.8),
                    Some(2.5),
                    Rating::Good,
                    "Your hand speed peaks at {value}x its average - fairly even power.",
                    "Some surging within the stroke, within the normal range.",
                    Some("Build-up swims focusing on a steady press from catch to finish."),
                ),
                band(
                    Some(2.5),
                    Some(3.5),
                    Rating::NeedsWork,
                    "Your hand speed peaks at {value}x its average - power comes in bursts.",
                    "Bursty power means parts of the stroke contribute little propulsion.",
                    Some("Fist drill and sculling to feel pressure through the whole pull."),
                ),
                band(
                    Some(3.5),
                    None,
                    Rating::Poor,
                    "Your hand speed peaks at {value}x its average - very uneven power.",
                    "Most of the propulsion comes from a short part of the stroke.",
                    Some("Slow, long-stroke swimming with constant pressure before adding speed."),
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_well_formed() {
        let cfg = FeedbackConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.check_rules().is_ok());
        assert_eq!(cfg.rules.len(), 6);
    }

    #[test]
    fn test_band_lookup_half_open() {
        let cfg = FeedbackConfig::default();
        let rate = cfg.rule(FeedbackMetric::StrokeRate).unwrap();
        assert_eq!(rate.band_for(28.0).unwrap().rating, Rating::Excellent);
        assert_eq!(rate.band_for(27.99).unwrap().rating, Rating::Good);
        assert_eq!(rate.band_for(34.9).unwrap().rating, Rating::Excellent);
        assert_eq!(rate.band_for(35.0).unwrap().rating, Rating::NeedsWork);
        assert_eq!(rate.band_for(5.0).unwrap().rating, Rating::Poor);
        assert!(rate.band_for(f64::NAN).is_none());
    }

    #[test]
    fn test_default_bands_cover_real_line() {
        let cfg = FeedbackConfig::default();
        for rule in &cfg.rules {
            for value in [-1000.0, -1.0, 0.0, 0.5, 1.0, 17.9, 45.0, 90.0, 150.0, 1000.0] {
                assert!(rule.band_for(value).is_some(), "{} has a gap at {value}", rule.name);
            }
        }
    }

    #[test]
    fn test_grade_bands_must_descend() {
        let bands = GradeBands {
            a: 5.0,
            b: 7.0,
            c: 5.5,
            d: 4.0,
        };
        assert!(bands.validate().is_err());
    }

    #[test]
    fn test_cut_points_must_separate() {
        let cfg = FeedbackConfig {
            strength_min_points: 4.0,
            improvement_max_points: 4.0,
            ..FeedbackConfig::default()
        };
        assert!(cfg.check_rules().is_err());
    }

    #[test]
    fn test_window_conditions() {
        assert!(WindowCondition::Below(15.0).holds(10.0));
        assert!(!WindowCondition::Below(15.0).holds(15.0));
        assert!(WindowCondition::Between(15.0, 50.0).holds(50.0));
        assert!(WindowCondition::Above(3.0).holds(3.1));
    }
}
