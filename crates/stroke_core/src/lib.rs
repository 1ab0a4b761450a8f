//! # stroke_core - Deterministic Swim Stroke Analysis Engine
//!
//! Turns per-frame pose landmarks from a swimming video into biomechanical
//! metrics, stroke cycles and phases, breath and kick events, left/right
//! symmetry and table-driven coaching feedback.
//!
//! ## Features
//! - Same frames + same configuration = byte-identical result
//! - Local degradation: occlusion or a flat signal never aborts a run
//! - MediaPipe (33 point) and COCO (17 point) landmark layouts
//! - JSON API for embedding behind another runtime

// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]
// Config structs are filled field by field in presets and tests
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod feedback;
pub mod models;

#[cfg(test)]
pub(crate) mod fixtures;

pub use analysis::{analyze, analyze_batch, analyze_sequence, validate_input};
pub use api::{analyze_json, result_schema_json, AnalysisRequest};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use models::{AnalysisResult, LandmarkFrame, LandmarkSequence};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
