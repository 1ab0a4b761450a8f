use serde::Deserialize;

use crate::analysis::analyze_sequence;
use crate::config::AnalysisConfig;
use crate::error::error_codes;
use crate::models::{result_schema, LandmarkFrame, LandmarkSequence};
use crate::SCHEMA_VERSION;

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

/// JSON request for one analysis.
#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    pub schema_version: u8,
    pub fps: f64,
    pub frames: Vec<LandmarkFrame>,
    #[serde(default)]
    pub total_frames: Option<u64>,
    #[serde(default)]
    pub duration_s: Option<f64>,
    /// Caller tag echoed into logs and the result
    #[serde(default)]
    pub label: Option<String>,
    /// Preset name; ignored when `config` is present
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub config: Option<AnalysisConfig>,
}

impl AnalysisRequest {
    fn resolve_config(&self) -> Result<AnalysisConfig, String> {
        match (&self.config, &self.profile) {
            (Some(cfg), _) => Ok(cfg.clone()),
            (None, Some(name)) => AnalysisConfig::preset(name)
                .ok_or_else(|| err_code(error_codes::INVALID_CONFIG, format!("unknown profile '{name}'"))),
            (None, None) => Ok(AnalysisConfig::default()),
        }
    }

    fn into_sequence(self) -> LandmarkSequence {
        LandmarkSequence {
            fps: self.fps,
            frames: self.frames,
            total_frames: self.total_frames,
            duration_s: self.duration_s,
            label: self.label,
        }
    }
}

/// Analyze a JSON request and return the result as JSON.
///
/// Errors are `"CODE: message"` strings with codes from
/// [`error_codes`](crate::error::error_codes).
pub fn analyze_json(request_json: &str) -> Result<String, String> {
    let request: AnalysisRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_REQUEST, e))?;

    if request.schema_version != SCHEMA_VERSION {
        return Err(err_code(
            error_codes::SCHEMA_VERSION,
            format!(
                "unsupported schema_version {}, expected {SCHEMA_VERSION}",
                request.schema_version
            ),
        ));
    }

    let config = request.resolve_config()?;
    let sequence = request.into_sequence();
    let result = analyze_sequence(&sequence, &config).map_err(|e| err_code(e.code(), e))?;

    serde_json::to_string(&result).map_err(|e| err_code(error_codes::SERIALIZATION, e))
}

/// JSON schema of the analysis result.
pub fn result_schema_json() -> Result<String, String> {
    serde_json::to_string_pretty(&result_schema()).map_err(|e| err_code(error_codes::SERIALIZATION, e))
}

/// A named configuration preset as JSON.
pub fn config_preset_json(name: &str) -> Result<String, String> {
    let cfg = AnalysisConfig::preset(name)
        .ok_or_else(|| err_code(error_codes::INVALID_CONFIG, format!("unknown profile '{name}'")))?;
    serde_json::to_string_pretty(&cfg).map_err(|e| err_code(error_codes::SERIALIZATION, e))
}
