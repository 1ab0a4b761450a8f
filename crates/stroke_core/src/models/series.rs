//! # Metric Series
//!
//! Per-frame metric values, index-aligned with the processed frames.
//!
//! Every series in a [`MetricSeries`] has exactly one sample per processed
//! frame. Undefined samples are `NaN`; the length never changes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::landmarks::BodySide;

/// Named per-frame metrics.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Shoulder-elbow-wrist angle (degrees)
    ElbowLeft,
    ElbowRight,
    /// Hip-shoulder-elbow angle (degrees)
    ShoulderLeft,
    ShoulderRight,
    /// Hip-knee-ankle angle (degrees)
    KneeLeft,
    KneeRight,
    /// Wrist speed (normalized units / s)
    HandLeftVelocity,
    HandRightVelocity,
    /// Ankle speed (normalized units / s)
    AnkleLeftVelocity,
    AnkleRightVelocity,
    /// Mean of the two hand speeds
    AvgVelocity,
    /// Max of the two hand speeds
    MaxVelocity,
    /// Shoulder line against the horizontal (degrees, (-180, 180])
    BodyRoll,
    /// Shoulder line against hip line (degrees, [0, 180])
    BodyAlignment,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::ElbowLeft => "elbow_left",
            Metric::ElbowRight => "elbow_right",
            Metric::ShoulderLeft => "shoulder_left",
            Metric::ShoulderRight => "shoulder_right",
            Metric::KneeLeft => "knee_left",
            Metric::KneeRight => "knee_right",
            Metric::HandLeftVelocity => "hand_left_velocity",
            Metric::HandRightVelocity => "hand_right_velocity",
            Metric::AnkleLeftVelocity => "ankle_left_velocity",
            Metric::AnkleRightVelocity => "ankle_right_velocity",
            Metric::AvgVelocity => "avg_velocity",
            Metric::MaxVelocity => "max_velocity",
            Metric::BodyRoll => "body_roll",
            Metric::BodyAlignment => "body_alignment",
        }
    }

    /// Joint-angle metrics, bounded to [0, 180].
    pub fn is_joint_angle(self) -> bool {
        matches!(
            self,
            Metric::ElbowLeft
                | Metric::ElbowRight
                | Metric::ShoulderLeft
                | Metric::ShoulderRight
                | Metric::KneeLeft
                | Metric::KneeRight
        )
    }

    pub fn elbow(side: BodySide) -> Self {
        match side {
            BodySide::Left => Metric::ElbowLeft,
            BodySide::Right => Metric::ElbowRight,
        }
    }

    pub fn shoulder(side: BodySide) -> Self {
        match side {
            BodySide::Left => Metric::ShoulderLeft,
            BodySide::Right => Metric::ShoulderRight,
        }
    }

    pub fn knee(side: BodySide) -> Self {
        match side {
            BodySide::Left => Metric::KneeLeft,
            BodySide::Right => Metric::KneeRight,
        }
    }

    pub fn hand_velocity(side: BodySide) -> Self {
        match side {
            BodySide::Left => Metric::HandLeftVelocity,
            BodySide::Right => Metric::HandRightVelocity,
        }
    }

    pub fn ankle_velocity(side: BodySide) -> Self {
        match side {
            BodySide::Left => Metric::AnkleLeftVelocity,
            BodySide::Right => Metric::AnkleRightVelocity,
        }
    }
}

/// Metric name -> per-frame samples, aligned with `frame_indices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricSeries {
    frame_indices: Vec<u64>,
    #[serde(deserialize_with = "super::nan::series_or_nan")]
    #[schemars(with = "BTreeMap<Metric, Vec<Option<f64>>>")]
    values: BTreeMap<Metric, Vec<f64>>,
}

impl MetricSeries {
    pub fn new(frame_indices: Vec<u64>) -> Self {
        Self {
            frame_indices,
            values: BTreeMap::new(),
        }
    }

    /// Insert a series, padding with `NaN` or truncating to the frame count.
    pub fn insert(&mut self, metric: Metric, mut samples: Vec<f64>) {
        debug_assert_eq!(
            samples.len(),
            self.frame_indices.len(),
            "series {} misaligned",
            metric.name()
        );
        samples.resize(self.frame_indices.len(), f64::NAN);
        self.values.insert(metric, samples);
    }

    pub fn get(&self, metric: Metric) -> Option<&[f64]> {
        self.values.get(&metric).map(Vec::as_slice)
    }

    pub fn frame_indices(&self) -> &[u64] {
        &self.frame_indices
    }

    /// Number of processed frames.
    pub fn len(&self) -> usize {
        self.frame_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &[f64])> {
        self.values.iter().map(|(m, v)| (*m, v.as_slice()))
    }

    pub fn metric_count(&self) -> usize {
        self.values.len()
    }
}

/// Aggregate statistics over the finite samples of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SeriesStats {
    #[serde(deserialize_with = "super::nan::f64_or_nan")]
    #[schemars(with = "Option<f64>")]
    pub mean: f64,
    #[serde(deserialize_with = "super::nan::f64_or_nan")]
    #[schemars(with = "Option<f64>")]
    pub min: f64,
    #[serde(deserialize_with = "super::nan::f64_or_nan")]
    #[schemars(with = "Option<f64>")]
    pub max: f64,
    /// Population standard deviation
    #[serde(deserialize_with = "super::nan::f64_or_nan")]
    #[schemars(with = "Option<f64>")]
    pub std: f64,
    /// Number of finite samples
    pub valid_samples: usize,
}

impl SeriesStats {
    pub fn undefined() -> Self {
        Self {
            mean: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            std: f64::NAN,
            valid_samples: 0,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.valid_samples > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_length_invariant() {
        let mut series = MetricSeries::new(vec![0, 1, 2]);
        series.insert(Metric::BodyRoll, vec![1.0, 2.0, 3.0]);
        assert_eq!(series.get(Metric::BodyRoll).map(<[f64]>::len), Some(3));
        assert_eq!(series.len(), 3);
        assert!(series.get(Metric::ElbowLeft).is_none());
    }

    #[test]
    fn test_json_round_trip_keeps_nan() {
        let mut series = MetricSeries::new(vec![4, 5]);
        series.insert(Metric::ElbowLeft, vec![f64::NAN, 90.0]);
        let json = serde_json::to_string(&series).unwrap();
        assert!(json.contains("\"elbow_left\":[null,90.0]"), "{json}");

        let back: MetricSeries = serde_json::from_str(&json).unwrap();
        let samples = back.get(Metric::ElbowLeft).unwrap();
        assert!(samples[0].is_nan());
        assert_eq!(samples[1], 90.0);
    }

    #[test]
    fn test_joint_angle_classification() {
        assert!(Metric::KneeRight.is_joint_angle());
        assert!(!Metric::BodyRoll.is_joint_angle());
        assert_eq!(Metric::elbow(BodySide::Right), Metric::ElbowRight);
    }
}
