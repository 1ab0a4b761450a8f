//! # Feedback Model
//!
//! Coaching output: overall grade, strengths, improvements, timeline and
//! plain-language metric explanations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Qualitative rating of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    NeedsWork,
    Poor,
    /// Metric could not be computed from the footage
    InsufficientData,
}

/// Overall letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn label(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Grade::A => "Excellent",
            Grade::B => "Good",
            Grade::C => "Average",
            Grade::D => "Needs Work",
            Grade::F => "Significant Improvement Needed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Strength {
    pub name: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Improvement {
    pub name: String,
    pub explanation: String,
    /// Suggested drill
    pub drill: Option<String>,
}

/// Qualitative status of a timeline window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimelineStatus {
    Excellent,
    Good,
    NeedsWork,
    /// Window had no usable samples
    InsufficientData,
}

/// Feedback for one time window of the footage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimelineSegment {
    /// Seconds (`frame_index / fps`)
    pub start_time: f64,
    pub end_time: f64,
    pub start_frame: u64,
    pub end_frame: u64,
    pub status: TimelineStatus,
    pub title: String,
    pub text: String,
    /// First issue spotted, if any
    pub focus: Option<String>,
}

/// A metric explained for a swimmer rather than an analyst.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExplainedMetric {
    pub name: String,
    pub technical_name: String,
    #[serde(deserialize_with = "super::nan::f64_or_nan")]
    #[schemars(with = "Option<f64>")]
    pub value: f64,
    pub rating: Rating,
    pub explanation: String,
    pub what_it_means: String,
    pub how_to_improve: Option<String>,
}

/// Complete coaching feedback for one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeedbackBundle {
    /// 0-10
    pub score: f64,
    pub grade: Grade,
    pub grade_text: String,
    pub executive_summary: String,
    pub strengths: Vec<Strength>,
    pub improvements: Vec<Improvement>,
    pub timeline_segments: Vec<TimelineSegment>,
    pub metrics_explained: Vec<ExplainedMetric>,
    /// Nothing could be rated; `score` is the neutral default
    pub insufficient_data: bool,
}
