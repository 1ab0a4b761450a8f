//! # Feedback Synthesizer
//!
//! Pure mapping from analysis outputs to a [`FeedbackBundle`].
//!
//! ## Algorithm
//! 1. Rate every rule in the table ([`explain`])
//! 2. Metric score: weighted mean of rating points over rated rules
//! 3. Timeline score: mean of window points over rated windows
//! 4. Overall score: blend of the available parts, neutral when neither is
//! 5. Grade from the configured bands
//! 6. Strengths / improvements filtered by cut points, capped in length
//! 7. Executive summary from the tone, strongest and weakest items

use super::rules::{explain, metric_value};
use super::timeline::{build_timeline, status_points};
use super::FeedbackInput;
use crate::config::{FeedbackConfig, GradeBands};
use crate::models::{
    EventKind, ExplainedMetric, FeedbackBundle, Grade, Improvement, Strength, TimelineSegment,
};

/// Build the complete feedback bundle.
pub fn synthesize(input: &FeedbackInput<'_>, config: &FeedbackConfig) -> FeedbackBundle {
    let rated: Vec<(ExplainedMetric, f64)> = config
        .rules
        .iter()
        .map(|rule| (explain(rule, metric_value(rule.metric, input)), rule.weight))
        .collect();

    let timeline = build_timeline(input, &config.timeline);

    let metric_score = weighted_mean(rated.iter().filter_map(|(m, weight)| {
        config.points.points(m.rating).map(|p| (p, *weight))
    }));
    let timeline_score = weighted_mean(
        timeline
            .iter()
            .filter_map(|seg| status_points(seg.status, &config.points).map(|p| (p, 1.0))),
    );

    let blended = weighted_mean(
        [
            metric_score.map(|s| (s, config.weights.metrics)),
            timeline_score.map(|s| (s, config.weights.timeline)),
        ]
        .into_iter()
        .flatten(),
    );
    let insufficient_data = blended.is_none();
    let score = round1(blended.unwrap_or(config.neutral_score).clamp(0.0, 10.0));
    let grade = grade_for(score, &config.grades);

    let (strengths, improvements) = rank(&rated, config);
    let metrics_explained: Vec<ExplainedMetric> = rated.into_iter().map(|(m, _)| m).collect();
    let executive_summary =
        executive_summary(input, &strengths, &improvements, &timeline, insufficient_data);

    FeedbackBundle {
        score,
        grade,
        grade_text: grade.description().to_string(),
        executive_summary,
        strengths,
        improvements,
        timeline_segments: timeline,
        metrics_explained,
        insufficient_data,
    }
}

/// Letter grade for a 0-10 score.
pub fn grade_for(score: f64, bands: &GradeBands) -> Grade {
    if score >= bands.a {
        Grade::A
    } else if score >= bands.b {
        Grade::B
    } else if score >= bands.c {
        Grade::C
    } else if score >= bands.d {
        Grade::D
    } else {
        Grade::F
    }
}

fn weighted_mean(items: impl Iterator<Item = (f64, f64)>) -> Option<f64> {
    let (sum, weight) = items
        .filter(|(_, w)| *w > 0.0)
        .fold((0.0, 0.0), |(s, tw), (v, w)| (s + v * w, tw + w));
    (weight > 0.0).then(|| sum / weight)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn rank(rated: &[(ExplainedMetric, f64)], config: &FeedbackConfig) -> (Vec<Strength>, Vec<Improvement>) {
    let mut scored: Vec<(f64, &ExplainedMetric)> = rated
        .iter()
        .filter_map(|(m, _)| config.points.points(m.rating).map(|p| (p, m)))
        .collect();

    // Stable sorts keep table order among equal points
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    let strengths = scored
        .iter()
        .filter(|(p, _)| *p >= config.strength_min_points)
        .take(config.max_listed)
        .map(|(_, m)| Strength {
            name: m.name.clone(),
            explanation: m.explanation.clone(),
        })
        .collect();

    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    let improvements = scored
        .iter()
        .filter(|(p, _)| *p <= config.improvement_max_points)
        .take(config.max_listed)
        .map(|(_, m)| Improvement {
            name: m.name.clone(),
            explanation: format!("{} {}", m.explanation, m.what_it_means),
            drill: m.how_to_improve.clone(),
        })
        .collect();

    (strengths, improvements)
}

fn executive_summary(
    input: &FeedbackInput<'_>,
    strengths: &[Strength],
    improvements: &[Improvement],
    timeline: &[TimelineSegment],
    insufficient_data: bool,
) -> String {
    if insufficient_data {
        return "Not enough clear footage to rate your technique. Try filming side-on with the \
                whole body in view."
            .to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    parts.push(
        match (strengths.is_empty(), improvements.is_empty()) {
            (false, true) => "Your technique is in great shape across the board.",
            (true, false) => "There is clear room to improve; the points below are the place to start.",
            (false, false) => "A solid base with a few areas to sharpen.",
            (true, true) => "Analysis complete.",
        }
        .to_string(),
    );
    if let Some(best) = strengths.first() {
        parts.push(format!("Your {} is particularly strong.", best.name.to_lowercase()));
    }
    if let Some(worst) = improvements.first() {
        parts.push(format!("Priority focus: {}.", worst.name.to_lowercase()));
    }
    if input.cycles.is_empty() {
        parts.push("No full stroke cycles were detected, so tempo could not be measured.".to_string());
    }
    let breaths = input
        .events
        .iter()
        .filter(|e| e.kind == EventKind::Breath)
        .count();
    if breaths > 0 {
        parts.push(format!(
            "{breaths} breath{} detected ({:.0} per minute).",
            if breaths == 1 { "" } else { "s" },
            input.summary.breathing_rate
        ));
    }
    let focus_windows = timeline.iter().filter(|s| s.focus.is_some()).count();
    if focus_windows > 0 {
        parts.push(format!(
            "{focus_windows} of {} timeline section{} flagged.",
            timeline.len(),
            if timeline.len() == 1 { "" } else { "s" }
        ));
    }
    parts.join(" ")
}
