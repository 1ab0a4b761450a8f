//! # Phase Segmenter
//!
//! Assigns every frame of a cycle to catch, pull, push or recovery.
//!
//! The primary signal (mean hand speed) is min-max normalized within the
//! cycle and fed through [`PhaseMachine`], one step per processed frame.
//!
//! | From | To | Condition |
//! |------|----|-----------|
//! | catch | pull | `v >= catch_to_pull` |
//! | pull | push | `v >= pull_to_push` |
//! | pull | catch | `v < catch_to_pull - hysteresis` |
//! | push | recovery | `v < pull_to_push - hysteresis` |
//!
//! Recovery holds until the cycle ends. `NaN` samples hold the current phase.

use strum::IntoEnumIterator;

use super::cycles::CycleBounds;
use super::signal::min_max_normalize;
use crate::config::PhaseConfig;
use crate::models::{PhaseSegment, PhaseShare, StrokeCycle, StrokePhase};

/// Hysteresis state machine over normalized speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseMachine {
    state: StrokePhase,
    config: PhaseConfig,
}

impl PhaseMachine {
    pub fn new(config: PhaseConfig) -> Self {
        Self {
            state: StrokePhase::Catch,
            config,
        }
    }

    pub fn state(&self) -> StrokePhase {
        self.state
    }

    /// Advance one frame. At most one transition per call.
    pub fn step(&mut self, v: f64) -> StrokePhase {
        if v.is_nan() {
            return self.state;
        }
        let c = &self.config;
        self.state = match self.state {
            StrokePhase::Catch if v >= c.catch_to_pull => StrokePhase::Pull,
            StrokePhase::Pull if v >= c.pull_to_push => StrokePhase::Push,
            StrokePhase::Pull if v < c.catch_to_pull - c.hysteresis => StrokePhase::Catch,
            StrokePhase::Push if v < c.pull_to_push - c.hysteresis => StrokePhase::Recovery,
            state => state,
        };
        self.state
    }
}

/// Segment one cycle. `speed` and `frames` cover the whole sequence.
pub fn segment_cycle(
    bounds: &CycleBounds,
    speed: &[f64],
    frames: &[u64],
    config: &PhaseConfig,
) -> StrokeCycle {
    let normalized = min_max_normalize(&speed[bounds.start_pos..=bounds.end_pos]);
    let mut machine = PhaseMachine::new(*config);

    let mut phases: Vec<PhaseSegment> = vec![PhaseSegment {
        phase: StrokePhase::Catch,
        start_frame: bounds.start_frame,
        end_frame: bounds.end_frame,
    }];

    // The cycle's first frame is always catch
    for (offset, &v) in normalized.iter().enumerate().skip(1) {
        let before = machine.state();
        let after = machine.step(v);
        if after != before {
            let frame = frames[bounds.start_pos + offset];
            if let Some(current) = phases.last_mut() {
                current.end_frame = frame - 1;
            }
            phases.push(PhaseSegment {
                phase: after,
                start_frame: frame,
                end_frame: bounds.end_frame,
            });
        }
    }

    StrokeCycle {
        cycle_id: bounds.cycle_id,
        start_frame: bounds.start_frame,
        end_frame: bounds.end_frame,
        phases,
    }
}

/// Segment every cycle.
pub fn segment_cycles(
    bounds: &[CycleBounds],
    speed: &[f64],
    frames: &[u64],
    config: &PhaseConfig,
) -> Vec<StrokeCycle> {
    bounds
        .iter()
        .map(|b| segment_cycle(b, speed, frames, config))
        .collect()
}

/// Frame totals and percentages per phase, in phase order.
///
/// Empty when there are no cycles.
pub fn phase_breakdown(cycles: &[StrokeCycle]) -> Vec<PhaseShare> {
    let total: u64 = cycles.iter().map(StrokeCycle::span).sum();
    if total == 0 {
        return Vec::new();
    }
    StrokePhase::iter()
        .map(|phase| {
            let frames: u64 = cycles
                .iter()
                .flat_map(|c| &c.phases)
                .filter(|seg| seg.phase == phase)
                .map(PhaseSegment::span)
                .sum();
            PhaseShare {
                phase,
                frames,
                percentage: frames as f64 / total as f64 * 100.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bounds(start: usize, end: usize, frames: &[u64]) -> CycleBounds {
        CycleBounds {
            cycle_id: 0,
            start_pos: start,
            end_pos: end,
            start_frame: frames[start],
            end_frame: frames[end],
        }
    }

    fn assert_covers(cycle: &StrokeCycle) {
        assert_eq!(cycle.phases[0].phase, StrokePhase::Catch);
        assert_eq!(cycle.phases[0].start_frame, cycle.start_frame);
        assert_eq!(cycle.phases.last().map(|s| s.end_frame), Some(cycle.end_frame));
        for pair in cycle.phases.windows(2) {
            assert_eq!(pair[0].end_frame + 1, pair[1].start_frame);
            assert_ne!(pair[0].phase, pair[1].phase);
        }
    }

    #[test]
    fn test_full_progression() {
        let speed = [0.0, 0.1, 0.3, 0.5, 0.8, 1.0, 0.7, 0.4, 0.2, 0.1];
        let frames: Vec<u64> = (0..10).collect();
        let cycle = segment_cycle(&bounds(0, 9, &frames), &speed, &frames, &PhaseConfig::default());
        let phases: Vec<StrokePhase> = cycle.phases.iter().map(|s| s.phase).collect();
        assert_eq!(
            phases,
            vec![
                StrokePhase::Catch,
                StrokePhase::Pull,
                StrokePhase::Push,
                StrokePhase::Recovery
            ]
        );
        assert_covers(&cycle);
        assert_eq!(cycle.phases[1].start_frame, 2);
        assert_eq!(cycle.phases[2].start_frame, 4);
        // 0.7 is within the hysteresis band of 0.6; 0.4 drops out of it
        assert_eq!(cycle.phases[3].start_frame, 7);
    }

    #[test]
    fn test_hysteresis_suppresses_chatter() {
        let cfg = PhaseConfig::default();
        let mut m = PhaseMachine::new(cfg);
        assert_eq!(m.step(0.21), StrokePhase::Pull);
        // Dips just under the threshold but inside the margin
        assert_eq!(m.step(0.17), StrokePhase::Pull);
        assert_eq!(m.step(0.22), StrokePhase::Pull);
        assert_eq!(m.step(0.1), StrokePhase::Catch);
    }

    #[test]
    fn test_nan_holds_state() {
        let mut m = PhaseMachine::new(PhaseConfig::default());
        m.step(0.5);
        assert_eq!(m.step(f64::NAN), StrokePhase::Pull);
    }

    #[test]
    fn test_one_transition_per_frame() {
        let mut m = PhaseMachine::new(PhaseConfig::default());
        assert_eq!(m.step(1.0), StrokePhase::Pull);
        assert_eq!(m.step(1.0), StrokePhase::Push);
    }

    #[test]
    fn test_skipped_indices_are_covered() {
        let speed = [0.0, 0.5, 1.0, 0.0];
        let frames = vec![10, 14, 20, 27];
        let cycle = segment_cycle(&bounds(0, 3, &frames), &speed, &frames, &PhaseConfig::default());
        assert_covers(&cycle);
        let span: u64 = cycle.phases.iter().map(PhaseSegment::span).sum();
        assert_eq!(span, cycle.span());
    }

    #[test]
    fn test_breakdown_percentages() {
        let cycle = StrokeCycle {
            cycle_id: 0,
            start_frame: 0,
            end_frame: 9,
            phases: vec![
                PhaseSegment {
                    phase: StrokePhase::Catch,
                    start_frame: 0,
                    end_frame: 1,
                },
                PhaseSegment {
                    phase: StrokePhase::Pull,
                    start_frame: 2,
                    end_frame: 4,
                },
                PhaseSegment {
                    phase: StrokePhase::Push,
                    start_frame: 5,
                    end_frame: 9,
                },
            ],
        };
        let shares = phase_breakdown(&[cycle]);
        assert_eq!(shares.len(), 4);
        assert_eq!(shares[2].frames, 5);
        assert!((shares[2].percentage - 50.0).abs() < 1e-9);
        assert_eq!(shares[3].frames, 0);
        assert!(phase_breakdown(&[]).is_empty());
    }

    proptest! {
        #[test]
        fn prop_phases_cover_cycle(
            speed in prop::collection::vec(prop_oneof![Just(f64::NAN), 0.0f64..5.0], 1..120),
            gaps in prop::collection::vec(1u64..4, 120),
        ) {
            let mut frames = Vec::with_capacity(speed.len());
            let mut f = 100u64;
            for g in gaps.iter().take(speed.len()) {
                frames.push(f);
                f += g;
            }
            let b = CycleBounds {
                cycle_id: 3,
                start_pos: 0,
                end_pos: speed.len() - 1,
                start_frame: frames[0],
                end_frame: frames[speed.len() - 1] + 2,
            };
            let cycle = segment_cycle(&b, &speed, &frames, &PhaseConfig::default());
            prop_assert_eq!(cycle.phases[0].start_frame, cycle.start_frame);
            prop_assert_eq!(cycle.phases.last().map(|s| s.end_frame), Some(cycle.end_frame));
            for pair in cycle.phases.windows(2) {
                prop_assert_eq!(pair[0].end_frame + 1, pair[1].start_frame);
                prop_assert!(pair[0].start_frame <= pair[0].end_frame);
            }
            let span: u64 = cycle.phases.iter().map(PhaseSegment::span).sum();
            prop_assert_eq!(span, cycle.span());
        }
    }
}
