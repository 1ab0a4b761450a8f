//! # Analysis Pipeline
//!
//! `analyze(frames, fps, config) -> AnalysisResult`, strictly forward:
//!
//! 1. [`kinematics`] - joint angles, speeds, roll, alignment
//! 2. [`cycles`] - reference peaks -> stroke cycles, rate, length
//! 3. [`phases`] - per-cycle phase state machine
//! 4. [`events`] - breaths and kicks
//! 5. [`symmetry`] - bilateral correlation, aggregates
//! 6. [`crate::feedback`] - graded coaching narrative
//!
//! Only bad input (frame rate, frame order, landmark count, too few valid
//! frames) or an invalid config aborts. Everything else degrades locally and
//! is reported through [`AnalysisFlags`].

pub mod cycles;
pub mod events;
pub mod kinematics;
pub mod phases;
pub mod signal;
pub mod symmetry;

pub use kinematics::geometry;

use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::feedback::{synthesize, FeedbackInput};
use crate::models::{
    AnalysisFlags, AnalysisResult, EventKind, LandmarkFrame, LandmarkSequence, Metric,
    StrokeSummary,
};
use crate::SCHEMA_VERSION;

/// Analyze one landmark sequence.
///
/// Deterministic: identical `frames`, `fps` and `config` give identical
/// results, bit for bit.
pub fn analyze(frames: &[LandmarkFrame], fps: f64, config: &AnalysisConfig) -> Result<AnalysisResult> {
    run(frames, fps, config, None)
}

/// [`analyze`] with the sequence's own frame rate and label.
pub fn analyze_sequence(sequence: &LandmarkSequence, config: &AnalysisConfig) -> Result<AnalysisResult> {
    run(&sequence.frames, sequence.fps, config, sequence.label.as_deref())
}

/// Analyze independent sequences in parallel. Results keep input order.
pub fn analyze_batch(
    sequences: &[LandmarkSequence],
    config: &AnalysisConfig,
) -> Vec<Result<AnalysisResult>> {
    sequences
        .par_iter()
        .map(|seq| analyze_sequence(seq, config))
        .collect()
}

/// Hard input checks. Returns the number of valid frames.
pub fn validate_input(frames: &[LandmarkFrame], fps: f64, config: &AnalysisConfig) -> Result<usize> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(AnalysisError::InvalidFrameRate { fps });
    }
    config.validate_all()?;

    let expected = config.landmarks.model.point_count();
    for (position, frame) in frames.iter().enumerate() {
        if frame.landmarks.len() != expected {
            return Err(AnalysisError::LandmarkCount {
                position,
                expected,
                found: frame.landmarks.len(),
            });
        }
        if position > 0 {
            let previous = frames[position - 1].frame_index;
            if frame.frame_index <= previous {
                return Err(AnalysisError::NonMonotonicFrames {
                    position,
                    previous,
                    current: frame.frame_index,
                });
            }
        }
    }

    let valid_frames = frames
        .iter()
        .filter(|f| f.has_visible_landmark(config.landmarks.visibility_threshold))
        .count();
    if valid_frames < 2 {
        return Err(AnalysisError::InsufficientData { valid_frames });
    }
    Ok(valid_frames)
}

fn run(
    frames: &[LandmarkFrame],
    fps: f64,
    config: &AnalysisConfig,
    label: Option<&str>,
) -> Result<AnalysisResult> {
    let span = info_span!("analyze", frames = frames.len(), fps, label = label.unwrap_or(""));
    let _guard = span.enter();

    let valid_frames = validate_input(frames, fps, config)?;
    if valid_frames * 2 < frames.len() {
        warn!(valid_frames, total = frames.len(), "more than half of the frames are occluded");
    }

    // 1. Kinematics
    let kinematics = kinematics::extract(frames, fps, &config.landmarks);
    let frame_indices = kinematics.series.frame_indices();

    // 2. Cycles
    let signal = cycles::cycle_signal(&kinematics, config.cycles.signal);
    let detection = cycles::detect_cycles(&signal, &kinematics, fps, &config.cycles);

    // 3. Phases
    let speed = kinematics
        .series
        .get(Metric::AvgVelocity)
        .map(<[f64]>::to_vec)
        .unwrap_or_else(|| vec![f64::NAN; frame_indices.len()]);
    let stroke_cycles = phases::segment_cycles(&detection.cycles, &speed, frame_indices, &config.phases);
    let phase_breakdown = phases::phase_breakdown(&stroke_cycles);

    // 4. Events
    let events = events::detect_events(&kinematics, &config.events);

    // 5. Symmetry & aggregates
    let symmetry = symmetry::compute_symmetry(&kinematics.series, &config.symmetry);
    let aggregates = symmetry::aggregate(&kinematics.series);

    let breath_count = events::count(&events, EventKind::Breath);
    let summary = StrokeSummary {
        stroke_rate: detection.stroke_rate,
        stroke_length: detection.stroke_length,
        cycle_count: stroke_cycles.len(),
        avg_velocity: aggregates.get(&Metric::AvgVelocity).map_or(f64::NAN, |s| s.mean),
        max_velocity: aggregates.get(&Metric::MaxVelocity).map_or(f64::NAN, |s| s.max),
        symmetry_index: symmetry.first().map_or(f64::NAN, |s| s.index),
        breath_count,
        breathing_rate: per_minute(breath_count, frame_indices, fps),
        kick_count: events::count(&events, EventKind::Kick),
    };

    let flags = AnalysisFlags {
        no_cycles_detected: !detection.has_cycles(),
        occluded_frames: kinematics.occluded_frames,
        interpolated_samples: kinematics.tracks.interpolated_samples(),
        unavailable_symmetry_pairs: symmetry.iter().filter(|s| !s.is_available()).count(),
    };

    // 6. Feedback
    let feedback = synthesize(
        &FeedbackInput {
            series: &kinematics.series,
            aggregates: &aggregates,
            summary: &summary,
            cycles: &stroke_cycles,
            symmetry: &symmetry,
            events: &events,
            fps,
        },
        &config.feedback,
    );

    debug!(
        cycles = summary.cycle_count,
        breaths = summary.breath_count,
        kicks = summary.kick_count,
        symmetry_pairs = symmetry.len(),
        "analysis stages complete"
    );
    info!(
        score = feedback.score,
        grade = feedback.grade.label(),
        stroke_rate = summary.stroke_rate,
        "analysis complete"
    );

    Ok(AnalysisResult {
        schema_version: SCHEMA_VERSION,
        label: label.map(str::to_string),
        fps,
        frame_count: frames.len(),
        series: kinematics.series,
        aggregates,
        summary,
        cycles: stroke_cycles,
        phase_breakdown,
        events,
        symmetry,
        feedback,
        flags,
    })
}

/// Events per minute over the processed span.
fn per_minute(count: usize, frame_indices: &[u64], fps: f64) -> f64 {
    match (frame_indices.first(), frame_indices.last()) {
        (Some(&first), Some(&last)) if last > first => {
            count as f64 / ((last - first) as f64 / fps) * 60.0
        }
        _ => 0.0,
    }
}
