//! JSON entry points for embedding the engine behind another runtime.

pub mod json_api;

pub use json_api::{analyze_json, config_preset_json, result_schema_json, AnalysisRequest};
