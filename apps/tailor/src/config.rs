use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only the candidate profile path is required; everything else has a
/// working default so a local run needs a single variable.
#[derive(Debug, Clone)]
pub struct Config {
    /// Marker-delimited candidate background source.
    pub profile_path: PathBuf,
    /// Where assembled `.tex` documents are persisted.
    pub artifact_dir: PathBuf,
    /// Failure archive: source + compiler transcript per hard failure.
    pub failed_dir: PathBuf,
    /// External LaTeX compiler binary.
    pub latex_bin: String,
    /// Minimum overall quality score for submission.
    pub quality_threshold: u8,
    /// Allowed open/close brace imbalance before the assembler warns.
    pub brace_tolerance: usize,
    /// Timeout for the startup toolchain probe.
    pub probe_timeout_secs: u64,
    /// Timeout per production compile pass.
    pub pass_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            profile_path: PathBuf::from(require_env("TAILOR_PROFILE_PATH")?),
            artifact_dir: PathBuf::from(
                std::env::var("TAILOR_ARTIFACT_DIR").unwrap_or_else(|_| "artifacts/tex".to_string()),
            ),
            failed_dir: PathBuf::from(
                std::env::var("TAILOR_FAILED_DIR").unwrap_or_else(|_| "artifacts/failed".to_string()),
            ),
            latex_bin: std::env::var("TAILOR_LATEX_BIN").unwrap_or_else(|_| "pdflatex".to_string()),
            quality_threshold: env_parse("TAILOR_QUALITY_THRESHOLD", 60)?,
            brace_tolerance: env_parse("TAILOR_BRACE_TOLERANCE", 5)?,
            probe_timeout_secs: env_parse("TAILOR_PROBE_TIMEOUT_SECS", 30)?,
            pass_timeout_secs: env_parse("TAILOR_PASS_TIMEOUT_SECS", 60)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("'{key}' must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
