//! # Stroke Structures
//!
//! Cycles, phases, discrete events and bilateral symmetry records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::landmarks::BodySide;
use super::series::Metric;

/// Propulsive state within a stroke cycle.
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
    strum_macros::EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum StrokePhase {
    Catch,
    Pull,
    Push,
    Recovery,
}

/// Contiguous run of frames in one phase. Bounds are inclusive frame indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PhaseSegment {
    pub phase: StrokePhase,
    pub start_frame: u64,
    pub end_frame: u64,
}

impl PhaseSegment {
    /// Frame-index span, counting skipped indices.
    pub fn span(&self) -> u64 {
        self.end_frame - self.start_frame + 1
    }
}

/// One stroke repetition between two consecutive reference peaks.
///
/// `phases` are contiguous and exactly cover `[start_frame, end_frame]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StrokeCycle {
    pub cycle_id: u32,
    pub start_frame: u64,
    pub end_frame: u64,
    pub phases: Vec<PhaseSegment>,
}

impl StrokeCycle {
    pub fn span(&self) -> u64 {
        self.end_frame - self.start_frame + 1
    }
}

/// Share of cycled frames spent in one phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PhaseShare {
    pub phase: StrokePhase,
    /// Frame-index span summed over all cycles
    pub frames: u64,
    /// Percentage of all cycled frames
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Head rise (local minimum of the head's image height)
    Breath,
    /// Ankle speed peak
    Kick,
}

/// A discrete biomechanical event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    pub kind: EventKind,
    pub frame_index: u64,
    /// Peak prominence in the detection signal's units
    pub strength: f64,
    /// Leg for kicks; `None` for breaths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<BodySide>,
}

/// Why a symmetry value is or is not available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SymmetryStatus {
    Ok,
    /// Too few frames where both sides are defined
    InsufficientPairedSamples,
    /// One side is constant while the sides differ
    ZeroVariance,
}

/// Bilateral correlation for a left/right metric pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SymmetryStat {
    pub metric_pair: (Metric, Metric),
    /// Pearson correlation in [-1, 1], `NaN` when unavailable
    #[serde(deserialize_with = "super::nan::f64_or_nan")]
    #[schemars(with = "Option<f64>")]
    pub correlation: f64,
    /// `(correlation + 1) / 2` in [0, 1], `NaN` when unavailable
    #[serde(deserialize_with = "super::nan::f64_or_nan")]
    #[schemars(with = "Option<f64>")]
    pub index: f64,
    pub paired_samples: usize,
    pub status: SymmetryStatus,
}

impl SymmetryStat {
    pub fn is_available(&self) -> bool {
        self.status == SymmetryStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_json_snapshot;

    #[test]
    fn test_spans_count_skipped_indices() {
        let cycle = StrokeCycle {
            cycle_id: 0,
            start_frame: 10,
            end_frame: 19,
            phases: vec![
                PhaseSegment {
                    phase: StrokePhase::Catch,
                    start_frame: 10,
                    end_frame: 12,
                },
                PhaseSegment {
                    phase: StrokePhase::Pull,
                    start_frame: 13,
                    end_frame: 19,
                },
            ],
        };
        let phase_span: u64 = cycle.phases.iter().map(PhaseSegment::span).sum();
        assert_eq!(cycle.phases[0].span(), 3);
        assert_eq!(phase_span, cycle.span());
        assert_eq!(cycle.span(), 10);
    }

    #[test]
    fn test_kick_event_json_shape() {
        let event = Event {
            kind: EventKind::Kick,
            frame_index: 42,
            strength: 0.5,
            side: Some(BodySide::Left),
        };
        assert_json_snapshot!(event, @r###"
        {
          "kind": "kick",
          "frame_index": 42,
          "strength": 0.5,
          "side": "left"
        }
        "###);
    }

    #[test]
    fn test_breath_event_omits_side() {
        let event = Event {
            kind: EventKind::Breath,
            frame_index: 7,
            strength: 0.25,
            side: None,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"kind":"breath","frame_index":7,"strength":0.25}"#);
    }
}
