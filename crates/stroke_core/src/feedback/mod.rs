//! # Coaching Feedback
//!
//! Table-driven translation of analysis numbers into a graded, swimmer
//! readable [`FeedbackBundle`](crate::models::FeedbackBundle).
//!
//! - `rules` - scalar metric values, band lookup, explanations
//! - `timeline` - per-cycle (or fixed window) status segments
//! - `synthesizer` - score, grade, strengths, improvements, summary

pub mod rules;
pub mod synthesizer;
pub mod timeline;

use std::collections::BTreeMap;

pub use synthesizer::{grade_for, synthesize};

use crate::models::{Event, Metric, MetricSeries, SeriesStats, StrokeCycle, StrokeSummary, SymmetryStat};

/// Read-only view of everything the synthesizer looks at.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackInput<'a> {
    pub series: &'a MetricSeries,
    pub aggregates: &'a BTreeMap<Metric, SeriesStats>,
    pub summary: &'a StrokeSummary,
    pub cycles: &'a [StrokeCycle],
    pub symmetry: &'a [SymmetryStat],
    pub events: &'a [Event],
    pub fps: f64,
}
