//! Stroke CLI library
//!
//! Landmark files in, analysis result files out. Every written result gets
//! a SHA-256 checksum so downstream consumers can verify what they load.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use stroke_core::models::{result_schema, Grade, LandmarkFrame, LandmarkSequence};
use stroke_core::{analyze_batch, analyze_sequence, AnalysisConfig, AnalysisResult};

/// Metadata written next to (or instead of printing) an analysis result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMetadata {
    pub schema_version: u8,
    pub engine_version: String,
    pub label: Option<String>,
    /// SHA-256 of the written result file (hex)
    pub checksum: String,
    /// [`AnalysisResult::fingerprint`]
    pub fingerprint: String,
    pub size_bytes: u64,
    pub frame_count: usize,
    pub cycle_count: usize,
    pub stroke_rate: f64,
    pub score: f64,
    pub grade: Grade,
}

/// Outcome of one input in a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub metadata: Option<ResultMetadata>,
    pub error: Option<String>,
}

/// Accepted landmark file shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum LandmarkFile {
    Sequence(LandmarkSequence),
    /// Bare frame list; the frame rate comes from the command line
    Frames(Vec<LandmarkFrame>),
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Load a landmark sequence from a JSON or YAML file.
///
/// `fps` overrides the file's frame rate and is required for bare frame
/// lists. Sequences without a label are labelled with the file stem.
pub fn load_sequence(path: &Path, fps: Option<f64>) -> Result<LandmarkSequence> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read landmark file: {}", path.display()))?;

    let parsed: LandmarkFile = if is_yaml(path) {
        serde_yaml::from_str(&text).context("Failed to parse landmark YAML")?
    } else {
        serde_json::from_str(&text).context("Failed to parse landmark JSON")?
    };

    let mut sequence = match (parsed, fps) {
        (LandmarkFile::Sequence(mut seq), Some(fps)) => {
            seq.fps = fps;
            seq
        }
        (LandmarkFile::Sequence(seq), None) => seq,
        (LandmarkFile::Frames(frames), Some(fps)) => LandmarkSequence::new(fps, frames),
        (LandmarkFile::Frames(_), None) => {
            bail!("{} is a bare frame list; pass --fps", path.display())
        }
    };

    if sequence.label.is_none() {
        sequence.label = path.file_stem().and_then(|s| s.to_str()).map(str::to_string);
    }
    Ok(sequence)
}

/// Resolve the analysis configuration: a file wins over a preset name,
/// which wins over the defaults.
pub fn load_config(path: Option<&Path>, profile: Option<&str>) -> Result<AnalysisConfig> {
    let config = match (path, profile) {
        (Some(path), _) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            if is_yaml(path) {
                AnalysisConfig::from_yaml_str(&text)
            } else {
                AnalysisConfig::from_json_str(&text)
            }
            .with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        (None, Some(name)) => AnalysisConfig::preset(name)
            .with_context(|| format!("Unknown profile '{name}' (realistic, sprint, noisy_capture)"))?,
        (None, None) => AnalysisConfig::default(),
    };

    config.validate_all().context("Configuration failed validation")?;
    Ok(config)
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(path, text)
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}

/// Write `result` as pretty JSON and describe what was written.
pub fn write_result(result: &AnalysisResult, out: &Path) -> Result<ResultMetadata> {
    let json = result.to_json_pretty().context("Failed to encode analysis result")?;
    write_text(out, &json)?;

    Ok(ResultMetadata {
        schema_version: result.schema_version,
        engine_version: stroke_core::VERSION.to_string(),
        label: result.label.clone(),
        checksum: sha256_hex(json.as_bytes()),
        fingerprint: result.fingerprint().context("Failed to fingerprint result")?,
        size_bytes: json.len() as u64,
        frame_count: result.frame_count,
        cycle_count: result.summary.cycle_count,
        stroke_rate: result.summary.stroke_rate,
        score: result.feedback.score,
        grade: result.feedback.grade,
    })
}

pub fn write_metadata(path: &Path, meta: &ResultMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(meta).context("Failed to encode metadata")?;
    write_text(path, &json)
}

/// Check a written result file against its checksum.
pub fn verify_output(path: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read result file: {}", path.display()))?;
    Ok(sha256_hex(&bytes) == expected_checksum)
}

/// Re-run the analysis and compare fingerprints.
pub fn check_determinism(
    sequence: &LandmarkSequence,
    config: &AnalysisConfig,
    result: &AnalysisResult,
) -> Result<bool> {
    let again = analyze_sequence(sequence, config).context("Repeat analysis failed")?;
    Ok(again.fingerprint()? == result.fingerprint()?)
}

/// Load, analyze and write one file.
pub fn analyze_file(
    input: &Path,
    out: &Path,
    config: &AnalysisConfig,
    fps: Option<f64>,
) -> Result<(AnalysisResult, ResultMetadata)> {
    let sequence = load_sequence(input, fps)?;
    let result = analyze_sequence(&sequence, config)
        .with_context(|| format!("Analysis failed for {}", input.display()))?;
    let meta = write_result(&result, out)?;
    info!(
        input = %input.display(),
        out = %out.display(),
        score = meta.score,
        grade = ?meta.grade,
        "analysis written"
    );
    Ok((result, meta))
}

/// `<out_dir>/<input stem>.analysis.json`
pub fn output_path_for(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sequence");
    out_dir.join(format!("{stem}.analysis.json"))
}

/// Analyze many files in parallel. A failing input is reported in its
/// outcome and does not stop the others; outcomes keep input order.
pub fn analyze_files(
    inputs: &[PathBuf],
    out_dir: &Path,
    config: &AnalysisConfig,
    fps: Option<f64>,
) -> Result<Vec<BatchOutcome>> {
    let loaded: Vec<Result<LandmarkSequence>> =
        inputs.iter().map(|p| load_sequence(p, fps)).collect();
    let sequences: Vec<LandmarkSequence> = loaded
        .iter()
        .filter_map(|r| r.as_ref().ok().cloned())
        .collect();
    let mut results = analyze_batch(&sequences, config).into_iter();

    let mut outcomes = Vec::with_capacity(inputs.len());
    for (input, load) in inputs.iter().zip(loaded) {
        let outcome = match load {
            Err(e) => failed(input, format!("{e:#}")),
            Ok(_) => match results.next() {
                Some(Ok(result)) => {
                    let out = output_path_for(input, out_dir);
                    let meta = write_result(&result, &out)?;
                    BatchOutcome {
                        input: input.clone(),
                        output: Some(out),
                        metadata: Some(meta),
                        error: None,
                    }
                }
                Some(Err(e)) => failed(input, format!("{}: {e}", e.code())),
                None => failed(input, "missing batch result".to_string()),
            },
        };
        if let Some(err) = &outcome.error {
            warn!(input = %input.display(), error = %err, "batch item failed");
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

fn failed(input: &Path, error: String) -> BatchOutcome {
    BatchOutcome {
        input: input.to_path_buf(),
        output: None,
        metadata: None,
        error: Some(error),
    }
}

/// Pretty JSON schema of the analysis result.
pub fn schema_json() -> Result<String> {
    serde_json::to_string_pretty(&result_schema()).context("Failed to encode result schema")
}

/// Write `text` to `out`, or print it when no path is given.
pub fn emit(text: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => write_text(path, text),
        None => {
            println!("{text}");
            Ok(())
        }
    }
}
