//! # Feedback Timeline
//!
//! One segment per detected cycle (or per fixed window when no cycles were
//! found), each checked against the [`TimelineConfig`] rule list.
//!
//! | Issues | Status | Title |
//! |--------|--------|-------|
//! | 0 | excellent (with positives) / good | Looking Good! |
//! | 1 | needs work | Minor Adjustment Needed |
//! | 2+ | needs work | Focus Area |

use super::rules::velocity_consistency;
use super::FeedbackInput;
use crate::analysis::geometry::tilt_from_horizontal;
use crate::analysis::signal::{nan_max, nan_mean};
use crate::config::{NoteKind, RatingPoints, TimelineConfig, WindowMetric};
use crate::models::{Metric, TimelineSegment, TimelineStatus};

/// Inclusive frame window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start_frame: u64,
    pub end_frame: u64,
}

/// Cycle windows, or fixed-length windows over the processed span.
pub fn windows(input: &FeedbackInput<'_>, config: &TimelineConfig) -> Vec<Window> {
    if !input.cycles.is_empty() {
        return input
            .cycles
            .iter()
            .map(|c| Window {
                start_frame: c.start_frame,
                end_frame: c.end_frame,
            })
            .collect();
    }

    let frames = input.series.frame_indices();
    let (Some(&first), Some(&last)) = (frames.first(), frames.last()) else {
        return Vec::new();
    };
    let width = ((config.window_seconds * input.fps).round() as u64).max(1);
    let mut out = Vec::new();
    let mut start = first;
    loop {
        let end = start.saturating_add(width - 1).min(last);
        out.push(Window {
            start_frame: start,
            end_frame: end,
        });
        match end.checked_add(1) {
            Some(next) if next <= last => start = next,
            _ => break,
        }
    }
    out
}

/// Value of a window metric over the processed frames inside `window`.
pub fn window_value(input: &FeedbackInput<'_>, window: Window, metric: WindowMetric) -> f64 {
    let frames = input.series.frame_indices();
    let lo = frames.partition_point(|&f| f < window.start_frame);
    let hi = frames.partition_point(|&f| f <= window.end_frame);
    let slice = |m: Metric| input.series.get(m).map(|s| &s[lo..hi]).unwrap_or(&[]);

    match metric {
        WindowMetric::BodyTilt => {
            nan_mean(slice(Metric::BodyRoll).iter().map(|&r| tilt_from_horizontal(r)))
        }
        WindowMetric::ElbowLeft => nan_mean(slice(Metric::ElbowLeft).iter().copied()),
        WindowMetric::ElbowRight => nan_mean(slice(Metric::ElbowRight).iter().copied()),
        WindowMetric::VelocityConsistency => velocity_consistency(
            nan_max(slice(Metric::MaxVelocity).iter().copied()),
            nan_mean(slice(Metric::AvgVelocity).iter().copied()),
        ),
    }
}

/// Build the full timeline.
pub fn build_timeline(input: &FeedbackInput<'_>, config: &TimelineConfig) -> Vec<TimelineSegment> {
    windows(input, config)
        .into_iter()
        .map(|w| segment(input, w, config))
        .collect()
}

fn segment(input: &FeedbackInput<'_>, window: Window, config: &TimelineConfig) -> TimelineSegment {
    let mut issues: Vec<&str> = Vec::new();
    let mut positives: Vec<&str> = Vec::new();
    let mut measured = false;

    for rule in &config.rules {
        let value = window_value(input, window, rule.metric);
        if !value.is_finite() {
            continue;
        }
        measured = true;
        if rule.condition.holds(value) {
            let list = match rule.kind {
                NoteKind::Issue => &mut issues,
                NoteKind::Positive => &mut positives,
            };
            if !list.contains(&rule.note.as_str()) {
                list.push(&rule.note);
            }
        }
    }

    let (status, title, text) = if !measured {
        (
            TimelineStatus::InsufficientData,
            "Not Enough Data",
            "Too few visible frames in this section to judge technique.".to_string(),
        )
    } else {
        match issues.as_slice() {
            [] => (
                if positives.is_empty() {
                    TimelineStatus::Good
                } else {
                    TimelineStatus::Excellent
                },
                "Looking Good!",
                if positives.is_empty() {
                    "Strong technique in this section. Keep it up!".to_string()
                } else {
                    format!("Strong technique in this section. {}.", capitalize(&positives.join(", ")))
                },
            ),
            [only] => (
                TimelineStatus::NeedsWork,
                "Minor Adjustment Needed",
                format!(
                    "Watch for {only}. {}.",
                    positives
                        .first()
                        .map_or("Other aspects look fine".to_string(), |p| capitalize(p))
                ),
            ),
            many => (
                TimelineStatus::NeedsWork,
                "Focus Area",
                format!(
                    "Issues spotted: {}. Work on these in your next session.",
                    many.join(", ")
                ),
            ),
        }
    };

    TimelineSegment {
        start_time: window.start_frame as f64 / input.fps,
        end_time: (window.end_frame + 1) as f64 / input.fps,
        start_frame: window.start_frame,
        end_frame: window.end_frame,
        status,
        title: title.to_string(),
        text,
        focus: issues.first().map(|s| s.to_string()),
    }
}

/// Points for a timeline status; `None` when not rated.
pub fn status_points(status: TimelineStatus, points: &RatingPoints) -> Option<f64> {
    match status {
        TimelineStatus::Excellent => Some(points.excellent),
        TimelineStatus::Good => Some(points.good),
        TimelineStatus::NeedsWork => Some(points.needs_work),
        TimelineStatus::InsufficientData => None,
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
