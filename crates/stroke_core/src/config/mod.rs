//! # Analysis Configuration
//!
//! Every tunable the engine reads, passed explicitly into each call.
//!
//! ## Presets
//! - [`AnalysisConfig::realistic`] - default, recreational to club footage
//! - [`AnalysisConfig::sprint`] - high stroke tempo, shorter peak spacing
//! - [`AnalysisConfig::noisy_capture`] - poor visibility or shaky tracking
//!
//! ```rust
//! use stroke_core::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::default();
//! assert!(config.validate_all().is_ok());
//! let sprint = AnalysisConfig::sprint();
//! assert!(sprint.cycles.min_cycle_seconds < config.cycles.min_cycle_seconds);
//! ```

mod detection_config;
mod feedback_config;

pub use detection_config::{
    CycleConfig, CycleSignal, EventConfig, LandmarkConfig, LengthReference, PeakConfig,
    PhaseConfig, SymmetryConfig,
};
pub use feedback_config::{
    default_rules, FeedbackConfig, FeedbackMetric, GradeBands, NoteKind, RatingBand, RatingPoints,
    RatingRule, ScoreWeights, TimelineConfig, WindowCondition, WindowMetric, WindowRule,
};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AnalysisError, Result};

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    #[validate]
    pub landmarks: LandmarkConfig,
    #[validate]
    pub cycles: CycleConfig,
    #[validate]
    pub phases: PhaseConfig,
    #[validate]
    pub events: EventConfig,
    #[validate]
    pub symmetry: SymmetryConfig,
    #[validate]
    pub feedback: FeedbackConfig,
}

impl AnalysisConfig {
    /// Default tuning
    pub fn realistic() -> Self {
        Self::default()
    }

    /// Sprint footage: tempo up to 200 strokes per minute
    pub fn sprint() -> Self {
        let mut cfg = Self::default();
        cfg.cycles.min_cycle_seconds = 0.3;
        cfg.events.kick.min_distance = 5;
        cfg.events.breath.min_distance = 20;
        cfg
    }

    /// Shaky or partially occluded footage
    pub fn noisy_capture() -> Self {
        let mut cfg = Self::default();
        cfg.landmarks.visibility_threshold = 0.65;
        cfg.landmarks.max_interpolation_gap = 2;
        cfg.cycles.peaks.min_prominence = 0.04;
        cfg.events.breath.min_prominence = 0.02;
        cfg.events.kick.min_prominence = 0.1;
        cfg.phases.hysteresis = 0.1;
        cfg
    }

    /// Preset by name (`realistic`, `default`, `sprint`, `noisy_capture`).
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "realistic" | "default" => Some(Self::realistic()),
            "sprint" => Some(Self::sprint()),
            "noisy_capture" | "noisy" => Some(Self::noisy_capture()),
            _ => None,
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(text)
            .map_err(|e| AnalysisError::InvalidConfig(format!("YAML: {e}")))?;
        cfg.validate_all()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| AnalysisError::InvalidConfig(format!("JSON: {e}")))?;
        cfg.validate_all()?;
        Ok(cfg)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| AnalysisError::InvalidConfig(format!("YAML: {e}")))
    }

    /// Scalar float settings by path.
    fn float_settings(&self) -> [(&'static str, f64); 22] {
        let fb = &self.feedback;
        [
            ("landmarks.visibility_threshold", self.landmarks.visibility_threshold),
            ("cycles.peaks.min_prominence", self.cycles.peaks.min_prominence),
            ("cycles.min_cycle_seconds", self.cycles.min_cycle_seconds),
            ("phases.catch_to_pull", self.phases.catch_to_pull),
            ("phases.pull_to_push", self.phases.pull_to_push),
            ("phases.hysteresis", self.phases.hysteresis),
            ("events.breath.min_prominence", self.events.breath.min_prominence),
            ("events.kick.min_prominence", self.events.kick.min_prominence),
            ("feedback.points.excellent", fb.points.excellent),
            ("feedback.points.good", fb.points.good),
            ("feedback.points.needs_work", fb.points.needs_work),
            ("feedback.points.poor", fb.points.poor),
            ("feedback.weights.metrics", fb.weights.metrics),
            ("feedback.weights.timeline", fb.weights.timeline),
            ("feedback.grades.a", fb.grades.a),
            ("feedback.grades.b", fb.grades.b),
            ("feedback.grades.c", fb.grades.c),
            ("feedback.grades.d", fb.grades.d),
            ("feedback.strength_min_points", fb.strength_min_points),
            ("feedback.improvement_max_points", fb.improvement_max_points),
            ("feedback.neutral_score", fb.neutral_score),
            ("feedback.timeline.window_seconds", fb.timeline.window_seconds),
        ]
    }

    /// Field ranges plus cross-field rules.
    ///
    /// Range checks pass `NaN`, so every float setting is checked for
    /// finiteness first.
    pub fn validate_all(&self) -> Result<()> {
        if let Some((name, value)) = self.float_settings().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(AnalysisError::InvalidConfig(format!("{name} must be finite, got {value}")));
        }
        self.validate()
            .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;
        self.feedback
            .check_rules()
            .map_err(AnalysisError::InvalidConfig)?;
        if self.symmetry.pairs.iter().any(|(left, right)| left == right) {
            return Err(AnalysisError::InvalidConfig(
                "symmetry pair must name two different metrics".to_string(),
            ));
        }
        Ok(())
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metric;

    #[test]
    fn test_default_config() {
        let cfg = AnalysisConfig::default();
        assert!((cfg.landmarks.visibility_threshold - 0.5).abs() < 1e-9);
        assert_eq!(cfg.landmarks.max_interpolation_gap, 3);
        assert_eq!(cfg.cycles.peaks.min_distance, 1);
        assert!((cfg.cycles.min_cycle_seconds - 0.4).abs() < 1e-9);
        assert!(cfg.validate_all().is_ok());
    }

    #[test]
    fn test_presets_validate() {
        for cfg in [
            AnalysisConfig::realistic(),
            AnalysisConfig::sprint(),
            AnalysisConfig::noisy_capture(),
        ] {
            assert!(cfg.validate_all().is_ok(), "{cfg:?}");
        }
    }

    #[test]
    fn test_noisy_capture_is_stricter() {
        let base = AnalysisConfig::realistic();
        let noisy = AnalysisConfig::noisy_capture();
        assert!(noisy.landmarks.visibility_threshold > base.landmarks.visibility_threshold);
        assert!(noisy.cycles.peaks.min_prominence > base.cycles.peaks.min_prominence);
        assert!(noisy.phases.hysteresis > base.phases.hysteresis);
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(AnalysisConfig::preset("Sprint"), Some(AnalysisConfig::sprint()));
        assert_eq!(
            AnalysisConfig::preset("noisy-capture"),
            Some(AnalysisConfig::noisy_capture())
        );
        assert!(AnalysisConfig::preset("arcade").is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "phases:\n  hysteresis: 0.08\ncycles:\n  peaks:\n    min_distance: 20\n    min_prominence: 0.05\n";
        let cfg = AnalysisConfig::from_yaml_str(yaml).unwrap();
        assert!((cfg.phases.hysteresis - 0.08).abs() < 1e-9);
        assert!((cfg.phases.catch_to_pull - 0.2).abs() < 1e-9);
        assert_eq!(cfg.cycles.peaks.min_distance, 20);
        assert_eq!(cfg.feedback.rules.len(), 6);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AnalysisConfig::from_json_str(r#"{"phases":{"catch_to_pull":0.9,"pull_to_push":0.5}}"#)
            .unwrap_err();
        assert_eq!(err.code(), "E_INVALID_CONFIG");

        let mut cfg = AnalysisConfig::default();
        cfg.symmetry.pairs.push((Metric::ElbowLeft, Metric::ElbowLeft));
        assert!(cfg.validate_all().is_err());
    }

    #[test]
    fn test_non_finite_settings_rejected() {
        for yaml in [
            "phases:\n  catch_to_pull: .nan\n",
            "phases:\n  hysteresis: .nan\n",
            "landmarks:\n  visibility_threshold: .nan\n",
            "cycles:\n  min_cycle_seconds: .inf\n",
            "feedback:\n  timeline:\n    window_seconds: .inf\n",
            "feedback:\n  grades:\n    a: .inf\n",
        ] {
            let err = AnalysisConfig::from_yaml_str(yaml).unwrap_err();
            assert_eq!(err.code(), "E_INVALID_CONFIG", "{yaml}");
        }

        let mut cfg = AnalysisConfig::default();
        cfg.feedback.rules[0].bands[0].max = Some(f64::NAN);
        assert!(cfg.validate_all().is_err());

        let mut cfg = AnalysisConfig::default();
        cfg.feedback.timeline.rules[0].condition = WindowCondition::Below(f64::NAN);
        assert!(cfg.validate_all().is_err());
    }

    #[test]
    fn test_config_yaml_round_trip() {
        let cfg = AnalysisConfig::noisy_capture();
        let yaml = cfg.to_yaml_string().unwrap();
        let parsed = AnalysisConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, cfg);
    }
}
