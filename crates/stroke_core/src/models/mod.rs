//! # Models
//!
//! Input contract and result types.
//!
//! - `landmarks` - landmark frames, named body points, upstream layouts
//! - `series` - per-frame metric series and aggregates
//! - `stroke` - cycles, phases, events, symmetry
//! - `feedback` - coaching feedback bundle
//! - `result` - the analysis result value

pub mod feedback;
pub mod landmarks;
pub mod nan;
pub mod result;
pub mod series;
pub mod stroke;

pub use feedback::{
    ExplainedMetric, FeedbackBundle, Grade, Improvement, Rating, Strength, TimelineSegment,
    TimelineStatus,
};
pub use landmarks::{
    AngleSpace, BodyPoint, BodySide, Landmark, LandmarkFrame, LandmarkModel, LandmarkSequence,
    Skeleton,
};
pub use result::{result_schema, AnalysisFlags, AnalysisResult, StrokeSummary};
pub use series::{Metric, MetricSeries, SeriesStats};
pub use stroke::{
    Event, EventKind, PhaseSegment, PhaseShare, StrokeCycle, StrokePhase, SymmetryStat,
    SymmetryStatus,
};
