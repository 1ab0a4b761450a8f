use thiserror::Error;

/// Stable machine-readable codes for API consumers.
pub mod error_codes {
    pub const INSUFFICIENT_DATA: &str = "E_INSUFFICIENT_DATA";
    pub const INVALID_FPS: &str = "E_INVALID_FPS";
    pub const NON_MONOTONIC_FRAMES: &str = "E_NON_MONOTONIC_FRAMES";
    pub const LANDMARK_COUNT: &str = "E_LANDMARK_COUNT";
    pub const INVALID_CONFIG: &str = "E_INVALID_CONFIG";
    pub const SERIALIZATION: &str = "E_SERIALIZATION";
    pub const INVALID_REQUEST: &str = "E_INVALID_REQUEST";
    pub const SCHEMA_VERSION: &str = "E_SCHEMA_VERSION";
}

/// Failures that abort a whole analysis.
///
/// Everything else (missing landmarks, no cycles, unavailable symmetry pairs)
/// degrades locally and is reported through result flags.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Insufficient data: {valid_frames} valid frame(s), at least 2 required")]
    InsufficientData { valid_frames: usize },

    #[error("Invalid frame rate: {fps} (must be finite and > 0)")]
    InvalidFrameRate { fps: f64 },

    #[error("Frame indices not strictly increasing at position {position}: {previous} then {current}")]
    NonMonotonicFrames {
        position: usize,
        previous: u64,
        current: u64,
    },

    #[error("Frame at position {position} has {found} landmarks, layout expects {expected}")]
    LandmarkCount {
        position: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AnalysisError {
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::InsufficientData { .. } => error_codes::INSUFFICIENT_DATA,
            AnalysisError::InvalidFrameRate { .. } => error_codes::INVALID_FPS,
            AnalysisError::NonMonotonicFrames { .. } => error_codes::NON_MONOTONIC_FRAMES,
            AnalysisError::LandmarkCount { .. } => error_codes::LANDMARK_COUNT,
            AnalysisError::InvalidConfig(_) => error_codes::INVALID_CONFIG,
            AnalysisError::Serialization(_) => error_codes::SERIALIZATION,
        }
    }

    /// True when the caller's input (frames, fps, config) is at fault.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, AnalysisError::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
